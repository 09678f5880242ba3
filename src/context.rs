use glam::Vec2;

use crate::frame::{FrameClock, FrameInfo};

/// Device pixel ratio contribution is capped to bound GPU cost on hidpi
/// displays.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Logical viewport dimensions plus the window's scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Scale factor actually applied to the surface, capped at
    /// [`MAX_PIXEL_RATIO`].
    pub fn pixel_ratio(&self) -> f64 {
        self.scale_factor.min(MAX_PIXEL_RATIO)
    }

    /// Surface size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        (
            (self.width as f64 * ratio).round() as u32,
            (self.height as f64 * ratio).round() as u32,
        )
    }

    /// Normalize a pointer position to [-1, 1] on both axes, +y up.
    /// The viewport center maps to (0, 0).
    pub fn normalize_pointer(&self, x: f64, y: f64) -> Vec2 {
        Vec2::new(
            (x / self.width as f64) as f32 * 2.0 - 1.0,
            -((y / self.height as f64) as f32 * 2.0 - 1.0),
        )
    }
}

/// Host events that affect the frame state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f64, y: f64 },
    Resized { width: u32, height: u32, scale_factor: f64 },
}

/// All mutable per-frame state, passed by reference into the tick instead of
/// living as ambient globals. Event callbacks push into the queue; the queue
/// is drained exactly once per tick so ordering stays deterministic.
#[derive(Debug)]
pub struct RenderContext {
    clock: FrameClock,
    queue: Vec<InputEvent>,
    pub viewport: Viewport,
    pub pointer: Vec2,
    pub progress: f32,
}

/// Outcome of one tick: the frame to render and whether the viewport changed.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    pub frame: FrameInfo,
    pub resized: bool,
}

impl RenderContext {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            clock: FrameClock::new(),
            queue: Vec::new(),
            viewport,
            pointer: Vec2::ZERO,
            progress: 0.0,
        }
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.queue.push(event);
    }

    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    /// Drain queued input in arrival order, then advance the clock one step.
    pub fn tick(&mut self) -> Tick {
        let mut resized = false;

        for event in self.queue.drain(..) {
            match event {
                InputEvent::PointerMoved { x, y } => {
                    self.pointer = self.viewport.normalize_pointer(x, y);
                }
                InputEvent::Resized {
                    width,
                    height,
                    scale_factor,
                } => {
                    if width > 0 && height > 0 {
                        self.viewport = Viewport::new(width, height, scale_factor);
                        resized = true;
                    }
                }
            }
        }

        Tick {
            frame: self.clock.tick(),
            resized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::TIME_STEP;

    fn context() -> RenderContext {
        RenderContext::new(Viewport::new(800, 600, 1.0))
    }

    #[test]
    fn pointer_center_maps_to_origin() {
        let viewport = Viewport::new(800, 600, 1.0);
        let p = viewport.normalize_pointer(400.0, 300.0);
        assert!(p.x.abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn pointer_corners_map_to_unit_range() {
        let viewport = Viewport::new(800, 600, 1.0);

        let top_left = viewport.normalize_pointer(0.0, 0.0);
        assert!((top_left.x + 1.0).abs() < 1e-6);
        assert!((top_left.y - 1.0).abs() < 1e-6);

        let bottom_right = viewport.normalize_pointer(800.0, 600.0);
        assert!((bottom_right.x - 1.0).abs() < 1e-6);
        assert!((bottom_right.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn physical_size_scales_by_pixel_ratio() {
        let viewport = Viewport::new(800, 600, 1.5);
        assert_eq!(viewport.physical_size(), (1200, 900));
    }

    #[test]
    fn pixel_ratio_is_capped() {
        let viewport = Viewport::new(800, 600, 3.0);
        assert!((viewport.pixel_ratio() - MAX_PIXEL_RATIO).abs() < f64::EPSILON);
        assert_eq!(viewport.physical_size(), (1600, 1200));
    }

    #[test]
    fn tick_advances_time_by_fixed_step() {
        let mut ctx = context();
        let t1 = ctx.tick();
        let t2 = ctx.tick();
        assert!((t2.frame.time - t1.frame.time - TIME_STEP).abs() < 1e-6);
    }

    #[test]
    fn tick_drains_pointer_events() {
        let mut ctx = context();
        ctx.push_input(InputEvent::PointerMoved { x: 800.0, y: 0.0 });
        ctx.tick();

        assert!((ctx.pointer.x - 1.0).abs() < 1e-6);
        assert!((ctx.pointer.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn tick_applies_events_in_arrival_order() {
        let mut ctx = context();

        // A resize queued before a pointer move must affect its normalization.
        ctx.push_input(InputEvent::Resized {
            width: 400,
            height: 400,
            scale_factor: 1.0,
        });
        ctx.push_input(InputEvent::PointerMoved { x: 200.0, y: 200.0 });
        let tick = ctx.tick();

        assert!(tick.resized);
        assert!(ctx.pointer.x.abs() < 1e-6);
        assert!(ctx.pointer.y.abs() < 1e-6);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut ctx = context();
        ctx.push_input(InputEvent::Resized {
            width: 1024,
            height: 512,
            scale_factor: 1.0,
        });
        ctx.tick();

        assert!((ctx.viewport.aspect() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn zero_size_resize_is_ignored() {
        let mut ctx = context();
        ctx.push_input(InputEvent::Resized {
            width: 0,
            height: 0,
            scale_factor: 1.0,
        });
        let tick = ctx.tick();

        assert!(!tick.resized);
        assert_eq!(ctx.viewport.width, 800);
    }
}
