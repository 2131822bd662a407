/// Latest pointer position and viewport size
///
/// Written by window events between frames, read by the update step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputState {
    /// Normalized pointer coordinates, about `[-0.5, 0.5]` on each axis
    pub pointer: (f32, f32),
    pub viewport: (u32, u32),
    pub aspect: f32,
}

impl InputState {
    pub fn new(width: u32, height: u32) -> Self {
        let mut state = Self {
            pointer: (0.0, 0.0),
            viewport: (0, 0),
            aspect: 1.0,
        };
        state.on_resize(width, height);
        state
    }

    /// Records a pointer position in physical pixels
    ///
    /// Ignored while the viewport has no area.
    pub fn on_pointer_move(&mut self, px: f64, py: f64) {
        let (width, height) = self.viewport;
        if width == 0 || height == 0 {
            return;
        }
        self.pointer = (
            (px / width as f64 - 0.5) as f32,
            (py / height as f64 - 0.5) as f32,
        );
    }

    /// Records a new viewport size, returning the new aspect ratio
    pub fn on_resize(&mut self, width: u32, height: u32) -> f32 {
        self.viewport = (width, height);
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
        self.aspect
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
