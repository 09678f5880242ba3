use trefoil::context::{InputEvent, RenderContext, Viewport};
use trefoil::frame::TIME_STEP;
use trefoil::geometry::{
    CURVE_SAMPLES, PARTICLE_COUNT, QUAD_Z, RADIAL_SEGMENTS, TUBULAR_SEGMENTS,
};
use trefoil::scene::SceneGeometry;

#[cfg(test)]
mod scene_tests {
    use super::*;

    #[test]
    fn test_scene_builds_all_three_drawables() {
        let scene = SceneGeometry::build();

        assert_eq!(scene.particles.len(), PARTICLE_COUNT);
        assert_eq!(scene.curve_points.len(), CURVE_SAMPLES);
        assert_eq!(
            scene.tube.vertices.len(),
            (TUBULAR_SEGMENTS + 1) * (RADIAL_SEGMENTS + 1)
        );
        assert_eq!(scene.quad.vertices.len(), 4);
    }

    #[test]
    fn test_quad_sits_behind_the_scene_center() {
        let scene = SceneGeometry::build();
        for v in &scene.quad.vertices {
            assert!((v.position[2] - QUAD_Z).abs() < 1e-6);
            assert!(v.position[2] < 0.0);
        }
    }

    #[test]
    fn test_standard_viewport_maps_to_surface_pixels() {
        // An 800x600 host on a 1x display renders 1:1.
        let viewport = Viewport::new(800, 600, 1.0);
        assert_eq!(viewport.physical_size(), (800, 600));

        // A 3x display is capped at the 2x pixel ratio bound.
        let hidpi = Viewport::new(800, 600, 3.0);
        assert_eq!(hidpi.physical_size(), (1600, 1200));
    }

    #[test]
    fn test_full_tick_pipeline_is_deterministic() {
        let mut ctx = RenderContext::new(Viewport::new(800, 600, 1.0));

        ctx.push_input(InputEvent::PointerMoved { x: 400.0, y: 300.0 });
        ctx.push_input(InputEvent::Resized {
            width: 1000,
            height: 500,
            scale_factor: 2.0,
        });
        ctx.push_input(InputEvent::PointerMoved { x: 1000.0, y: 0.0 });

        let tick = ctx.tick();

        assert!(tick.resized);
        assert!((ctx.pointer.x - 1.0).abs() < 1e-6);
        assert!((ctx.pointer.y - 1.0).abs() < 1e-6);
        assert!((ctx.viewport.aspect() - 2.0).abs() < 1e-6);
        assert!((tick.frame.time - TIME_STEP).abs() < 1e-6);

        // A second tick with no input leaves pointer and viewport untouched.
        let tick2 = ctx.tick();
        assert!(!tick2.resized);
        assert!((tick2.frame.time - 2.0 * TIME_STEP).abs() < 1e-6);
    }
}
