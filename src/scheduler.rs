//! Frame scheduler
//!
//! Replaces a self-rescheduling callback with an explicit start/stop state
//! machine. The host calls [`FrameScheduler::tick`] on every redraw; the
//! scheduler samples its clock once and runs the frame closure.

use log::{error, info};

use crate::timing::FrameClock;

/// Timing handed to one frame step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the previous frame
    pub delta: f32,
    /// Seconds since the scheduler first started
    pub elapsed: f32,
    /// Number of frames run before this one
    pub frame: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
    /// A frame step failed; the scheduler will not run again
    Halted,
}

#[derive(Debug)]
pub struct FrameScheduler {
    clock: FrameClock,
    state: SchedulerState,
    frame: u64,
}

impl FrameScheduler {
    pub fn new(clock: FrameClock) -> Self {
        Self {
            clock,
            state: SchedulerState::Stopped,
            frame: 0,
        }
    }

    /// Starts or resumes scheduling
    ///
    /// Time spent stopped is not counted as frame time. A halted scheduler
    /// stays halted.
    pub fn start(&mut self) {
        if self.state == SchedulerState::Stopped {
            self.clock.resync();
            self.state = SchedulerState::Running;
            info!("Frame scheduler started");
        }
    }

    pub fn stop(&mut self) {
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Stopped;
            info!("Frame scheduler stopped after {} frames", self.frame);
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Runs one frame if the scheduler is running
    ///
    /// Returns `Ok(None)` when stopped or halted. An error from `step` halts
    /// the scheduler and is returned to the caller.
    pub fn tick<F, E>(&mut self, step: F) -> Result<Option<FrameTime>, E>
    where
        F: FnOnce(FrameTime) -> Result<(), E>,
        E: std::fmt::Display,
    {
        if self.state != SchedulerState::Running {
            return Ok(None);
        }

        let delta = self.clock.sample();
        let time = FrameTime {
            delta,
            elapsed: self.clock.elapsed(),
            frame: self.frame,
        };

        match step(time) {
            Ok(()) => {
                self.frame += 1;
                Ok(Some(time))
            }
            Err(e) => {
                error!("Frame {} failed, halting the frame loop: {}", self.frame, e);
                self.state = SchedulerState::Halted;
                Err(e)
            }
        }
    }

    /// Runs `count` frames, calling `before_frame` ahead of each tick
    ///
    /// `before_frame` is where tests advance a manual time source. Stops
    /// early on the first failing frame.
    pub fn run_frames<B, F, E>(&mut self, count: usize, mut before_frame: B, mut step: F) -> Result<usize, E>
    where
        B: FnMut(u64),
        F: FnMut(FrameTime) -> Result<(), E>,
        E: std::fmt::Display,
    {
        let mut ran = 0;
        for _ in 0..count {
            before_frame(self.frame);
            if self.tick(&mut step)?.is_none() {
                break;
            }
            ran += 1;
        }
        Ok(ran)
    }
}
