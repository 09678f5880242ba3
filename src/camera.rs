use glam::{Mat4, Vec2, Vec3};
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

use crate::core::uniforms::CameraUniform;

pub const FOV_Y: f32 = 70.0 * std::f32::consts::PI / 180.0;
pub const NEAR_PLANE: f32 = 0.01;
pub const FAR_PLANE: f32 = 1000.0;

const ROTATE_SPEED: f32 = 0.005;
const PAN_SPEED: f32 = 0.002;
const ZOOM_SPEED: f32 = 0.25;
const MIN_RADIUS: f32 = 0.5;
const MAX_RADIUS: f32 = 50.0;
// Keep pitch shy of the poles so the view axis never collinears with +Y.
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Orbit camera: rotates around a target point with drag, zooms with the
/// scroll wheel, pans with right-drag. Starts at z = 4 framing the knot.
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub aspect: f32,
    rotating: bool,
    panning: bool,
    last_cursor: Option<Vec2>,
}

impl OrbitCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            radius: 4.0,
            yaw: 0.0,
            pitch: 0.0,
            aspect,
            rotating: false,
            panning: false,
            last_cursor: None,
        }
    }

    /// Eye position derived from the orbit parameters.
    pub fn position(&self) -> Vec3 {
        let offset = Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        ) * self.radius;
        self.target + offset
    }

    /// Resize only changes the aspect ratio; fov and clip planes stay fixed.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(FOV_Y, self.aspect, NEAR_PLANE, FAR_PLANE)
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view: self.view().to_cols_array_2d(),
            proj: self.projection().to_cols_array_2d(),
        }
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state.is_pressed();
        match button {
            MouseButton::Left => self.rotating = pressed,
            MouseButton::Right => self.panning = pressed,
            _ => {}
        }
        if !pressed {
            self.last_cursor = None;
        }
    }

    pub fn process_cursor(&mut self, x: f64, y: f64) {
        let cursor = Vec2::new(x as f32, y as f32);
        let delta = match self.last_cursor {
            Some(last) => cursor - last,
            None => Vec2::ZERO,
        };

        if self.rotating {
            self.yaw -= delta.x * ROTATE_SPEED;
            self.pitch = (self.pitch + delta.y * ROTATE_SPEED).clamp(-MAX_PITCH, MAX_PITCH);
        } else if self.panning {
            let view = self.view();
            let right = Vec3::new(view.x_axis.x, view.y_axis.x, view.z_axis.x);
            let up = Vec3::new(view.x_axis.y, view.y_axis.y, view.z_axis.y);
            self.target += (-right * delta.x + up * delta.y) * PAN_SPEED * self.radius;
        }

        if self.rotating || self.panning {
            self.last_cursor = Some(cursor);
        }
    }

    pub fn process_scroll(&mut self, delta: MouseScrollDelta) {
        let amount = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
        };
        self.radius = (self.radius - amount * ZOOM_SPEED).clamp(MIN_RADIUS, MAX_RADIUS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_sits_on_positive_z() {
        let camera = OrbitCamera::new(800.0 / 600.0);
        let pos = camera.position();

        assert!(pos.x.abs() < 1e-6);
        assert!(pos.y.abs() < 1e-6);
        assert!((pos.z - 4.0).abs() < 1e-6);
    }

    #[test]
    fn set_aspect_leaves_fov_and_planes_alone() {
        let mut camera = OrbitCamera::new(800.0 / 600.0);
        camera.set_aspect(1024.0 / 512.0);

        assert!((camera.aspect - 2.0).abs() < 1e-6);
        // Projection is rebuilt from the same fixed fov/near/far constants.
        let proj = camera.projection();
        let expected = Mat4::perspective_rh(FOV_Y, 2.0, NEAR_PLANE, FAR_PLANE);
        assert!((proj.to_cols_array()
            .iter()
            .zip(expected.to_cols_array().iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max))
            < 1e-6);
    }

    #[test]
    fn orbit_keeps_distance_to_target() {
        let mut camera = OrbitCamera::new(1.0);
        camera.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        camera.process_cursor(0.0, 0.0);
        camera.process_cursor(120.0, 80.0);

        let distance = camera.position().distance(camera.target);
        assert!((distance - camera.radius).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped_at_the_poles() {
        let mut camera = OrbitCamera::new(1.0);
        camera.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        camera.process_cursor(0.0, 0.0);
        camera.process_cursor(0.0, 1e6);

        assert!(camera.pitch <= MAX_PITCH);
    }

    #[test]
    fn scroll_zooms_within_bounds() {
        let mut camera = OrbitCamera::new(1.0);
        for _ in 0..1000 {
            camera.process_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        }
        assert!(camera.radius >= MIN_RADIUS);

        for _ in 0..1000 {
            camera.process_scroll(MouseScrollDelta::LineDelta(0.0, -1.0));
        }
        assert!(camera.radius <= MAX_RADIUS);
    }

    #[test]
    fn releasing_button_resets_drag_anchor() {
        let mut camera = OrbitCamera::new(1.0);
        camera.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        camera.process_cursor(0.0, 0.0);
        camera.process_cursor(50.0, 0.0);
        let yaw = camera.yaw;

        camera.process_mouse_button(MouseButton::Left, ElementState::Released);
        camera.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        // First sample after re-press must not apply a jump delta.
        camera.process_cursor(500.0, 500.0);

        assert!((camera.yaw - yaw).abs() < 1e-6);
    }
}
