/// Fixed per-tick time increment. The animation advances by this amount on
/// every frame regardless of real elapsed time, so animation speed is coupled
/// to the display refresh rate rather than the wall clock.
pub const TIME_STEP: f32 = 0.05;

/// Scale applied to accumulated time before it reaches shader uniforms.
pub const TIME_SCALE: f32 = 0.5;

/// Frame metadata - carries frame number and the accumulated animation time
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo {
    pub number: u64,
    pub time: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32) -> Self {
        Self { number, time }
    }

    /// Time value as seen by the shaders.
    pub fn scaled_time(&self) -> f32 {
        self.time * TIME_SCALE
    }
}

/// Fixed-step clock driving the render loop.
///
/// Stepping is explicit so tests can advance frames deterministically
/// without a live display.
#[derive(Debug)]
pub struct FrameClock {
    frame_number: u64,
    time: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            frame_number: 0,
            time: 0.0,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Accumulated animation time, unscaled.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance by one fixed step and return the new frame's metadata.
    pub fn tick(&mut self) -> FrameInfo {
        self.time += TIME_STEP;
        let info = FrameInfo::new(self.frame_number, self.time);
        self.frame_number += 1;
        info
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameClock {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        Some(self.tick())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_advances_by_fixed_step() {
        let mut clock = FrameClock::new();

        let first = clock.tick();
        assert!((first.time - TIME_STEP).abs() < 1e-6);

        let second = clock.tick();
        assert!((second.time - first.time - TIME_STEP).abs() < 1e-6);
    }

    #[test]
    fn clock_step_is_independent_of_wall_time() {
        let mut clock = FrameClock::new();

        clock.tick();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let frame = clock.tick();

        // Sleeping between ticks must not change the accumulated time.
        assert!((frame.time - 2.0 * TIME_STEP).abs() < 1e-6);
    }

    #[test]
    fn clock_numbers_frames() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().number, 0);
        assert_eq!(clock.tick().number, 1);
        assert_eq!(clock.frame_number(), 2);
    }

    #[test]
    fn scaled_time_halves_accumulated_time() {
        let info = FrameInfo::new(0, 1.0);
        assert!((info.scaled_time() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn clock_iterates_forever() {
        let clock = FrameClock::new();
        let frames: Vec<FrameInfo> = clock.take(100).collect();

        assert_eq!(frames.len(), 100);
        assert!((frames[99].time - 100.0 * TIME_STEP).abs() < 1e-4);
    }
}
