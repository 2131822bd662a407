//! Frame clock and the time sources that drive it
//!
//! [`FrameClock`] reads time through a [`TimeSource`] so tests can step time
//! by hand with [`ManualTimeSource`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic "now", measured from an arbitrary origin
pub trait TimeSource {
    fn now(&self) -> Duration;
}

/// Wall clock time since the source was created
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven time; clones share the same reading
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<Duration>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_secs(&self, secs: f32) {
        self.advance(Duration::from_secs_f32(secs.max(0.0)));
    }

    /// Jumps to an absolute reading, backwards included
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Delta and elapsed time between frames
///
/// The first [`sample`](FrameClock::sample) returns the time since the clock
/// was constructed. A source that goes backwards yields a zero delta.
pub struct FrameClock {
    source: Box<dyn TimeSource>,
    last: Duration,
    delta: f32,
    elapsed: Duration,
}

impl FrameClock {
    pub fn new(source: impl TimeSource + 'static) -> Self {
        let last = source.now();
        Self {
            source: Box::new(source),
            last,
            delta: 0.0,
            elapsed: Duration::ZERO,
        }
    }

    /// Clock on the wall time source
    pub fn system() -> Self {
        Self::new(SystemTimeSource::new())
    }

    /// Seconds since the previous sample; advances elapsed time
    pub fn sample(&mut self) -> f32 {
        let now = self.source.now();
        let delta = now.saturating_sub(self.last);
        // Keep the latest reading even when it went backwards so the next
        // delta is measured from it instead of from a future timestamp
        self.last = now;
        // Summed as Duration; an f32 total drifts over long sessions
        self.elapsed += delta;
        self.delta = delta.as_secs_f32();
        self.delta
    }

    /// Cumulative seconds across all samples
    pub fn elapsed(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Delta returned by the most recent sample
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Forgets the time since the last sample, keeping elapsed time
    ///
    /// Used when a stopped loop restarts so the pause is not one huge delta.
    pub fn resync(&mut self) {
        self.last = self.source.now();
        self.delta = 0.0;
    }
}

impl std::fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameClock")
            .field("delta", &self.delta)
            .field("elapsed", &self.elapsed.as_secs_f32())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn manual_clock() -> (ManualTimeSource, FrameClock) {
        let source = ManualTimeSource::new();
        let clock = FrameClock::new(source.clone());
        (source, clock)
    }

    #[test]
    fn test_first_sample_measures_from_construction() {
        let (source, mut clock) = manual_clock();
        source.advance_secs(0.25);
        assert!((clock.sample() - 0.25).abs() < EPS);
        assert!((clock.elapsed() - 0.25).abs() < EPS);
    }

    #[test]
    fn test_first_sample_without_time_passing_is_zero() {
        let (_source, mut clock) = manual_clock();
        assert_eq!(clock.sample(), 0.0);
    }

    #[test]
    fn test_elapsed_does_not_advance_on_read() {
        let (source, mut clock) = manual_clock();
        source.advance_secs(1.0);
        clock.sample();
        source.advance_secs(1.0);
        assert!((clock.elapsed() - 1.0).abs() < EPS);
        assert!((clock.elapsed() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_delta_non_negative_and_elapsed_monotone() {
        let (source, mut clock) = manual_clock();
        let readings = [0.5, 0.2, 1.0, 1.0, 0.0, 3.0];
        let mut previous_elapsed = 0.0;
        for secs in readings {
            source.set(Duration::from_secs_f32(secs));
            let delta = clock.sample();
            assert!(delta >= 0.0);
            assert!(clock.elapsed() >= previous_elapsed);
            previous_elapsed = clock.elapsed();
        }
    }

    #[test]
    fn test_backwards_source_then_forward_measures_from_latest() {
        let (source, mut clock) = manual_clock();
        source.set(Duration::from_secs(5));
        clock.sample();
        source.set(Duration::from_secs(2));
        assert_eq!(clock.sample(), 0.0);
        source.set(Duration::from_secs(3));
        assert!((clock.sample() - 1.0).abs() < EPS);
        assert!((clock.elapsed() - 6.0).abs() < EPS);
    }

    #[test]
    fn test_resync_drops_pause() {
        let (source, mut clock) = manual_clock();
        source.advance_secs(1.0);
        clock.sample();
        source.advance_secs(10.0);
        clock.resync();
        source.advance_secs(0.5);
        assert!((clock.sample() - 0.5).abs() < EPS);
        assert!((clock.elapsed() - 1.5).abs() < EPS);
    }

    #[test]
    fn test_elapsed_tracks_source_over_hours_at_60fps() {
        let (source, mut clock) = manual_clock();
        let frame = Duration::from_nanos(16_666_667);
        let frames = 6 * 60 * 60 * 60;
        for _ in 0..frames {
            source.advance(frame);
            clock.sample();
        }
        let wall = source.now().as_secs_f32();
        assert!((clock.elapsed() - wall).abs() < 0.1, "elapsed {} vs wall {}", clock.elapsed(), wall);
        assert!((clock.elapsed() - 21_600.0).abs() < 0.1);
    }

    #[test]
    fn test_elapsed_excludes_resynced_pause_over_many_frames() {
        let (source, mut clock) = manual_clock();
        let frame = Duration::from_millis(10);
        for _ in 0..1000 {
            source.advance(frame);
            clock.sample();
        }
        source.advance(Duration::from_secs(60));
        clock.resync();
        for _ in 0..1000 {
            source.advance(frame);
            clock.sample();
        }
        assert!((clock.elapsed() - 20.0).abs() < 1e-3);
    }
}
