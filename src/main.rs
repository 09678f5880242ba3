use clap::Parser;
use log::{error, info, warn};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use trefoil::camera::OrbitCamera;
use trefoil::cli::Cli;
use trefoil::context::{InputEvent, RenderContext, Viewport};
use trefoil::renderer::Sketch;
use trefoil::scene::SceneGeometry;

const INITIAL_WIDTH: u32 = 800;
const INITIAL_HEIGHT: u32 = 600;

type Result<T> = anyhow::Result<T>;

struct App {
    cli: Cli,
    window: Option<Arc<Window>>,
    sketch: Option<Sketch>,
    camera: OrbitCamera,
    context: RenderContext,
}

impl App {
    fn new(cli: Cli) -> Self {
        let viewport = Viewport::new(INITIAL_WIDTH, INITIAL_HEIGHT, 1.0);
        Self {
            cli,
            window: None,
            sketch: None,
            camera: OrbitCamera::new(viewport.aspect()),
            context: RenderContext::new(viewport),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Trefoil")
                .with_inner_size(winit::dpi::LogicalSize::new(INITIAL_WIDTH, INITIAL_HEIGHT)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                error!("failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.context = RenderContext::new(Viewport::new(
            INITIAL_WIDTH,
            INITIAL_HEIGHT,
            window.scale_factor(),
        ));
        self.camera = OrbitCamera::new(self.context.viewport.aspect());

        let scene = SceneGeometry::build();
        let sketch = match pollster::block_on(Sketch::new(
            window.clone(),
            &self.context.viewport,
            &scene,
            self.cli.gui,
        )) {
            Ok(s) => s,
            Err(e) => {
                error!("failed to initialize scene: {:#}", e);
                event_loop.exit();
                return;
            }
        };

        info!("scene initialized");
        self.window = Some(window);
        self.sketch = Some(sketch);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // The settings overlay gets first refusal on events.
        if let (Some(sketch), Some(window)) = (&mut self.sketch, &self.window) {
            if sketch.handle_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                let scale_factor = self
                    .window
                    .as_ref()
                    .map(|w| w.scale_factor())
                    .unwrap_or(1.0);
                let logical: winit::dpi::LogicalSize<f64> = size.to_logical(scale_factor);
                self.context.push_input(InputEvent::Resized {
                    width: logical.width.round() as u32,
                    height: logical.height.round() as u32,
                    scale_factor,
                });
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.context.push_input(InputEvent::Resized {
                    width: self.context.viewport.width,
                    height: self.context.viewport.height,
                    scale_factor,
                });
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale_factor = self
                    .window
                    .as_ref()
                    .map(|w| w.scale_factor())
                    .unwrap_or(1.0);
                let logical: winit::dpi::LogicalPosition<f64> =
                    position.to_logical(scale_factor);
                self.context.push_input(InputEvent::PointerMoved {
                    x: logical.x,
                    y: logical.y,
                });
                self.camera.process_cursor(logical.x, logical.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.camera.process_mouse_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.camera.process_scroll(delta);
            }
            WindowEvent::RedrawRequested => {
                let tick = self.context.tick();

                if tick.resized {
                    self.camera.set_aspect(self.context.viewport.aspect());
                    if let Some(sketch) = &mut self.sketch {
                        sketch.resize(&self.context.viewport);
                    }
                }

                if let (Some(sketch), Some(window)) = (&mut self.sketch, &self.window) {
                    match sketch.render(window, &self.camera, &mut self.context, &tick.frame) {
                        Ok(()) => {}
                        // Stale swapchain: reconfigure and let the next frame retry.
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            warn!("surface lost, reconfiguring");
                            sketch.resize(&self.context.viewport);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            error!("out of GPU memory, exiting");
                            event_loop.exit();
                        }
                        Err(e) => warn!("render error: {:?}", e),
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Reschedule unconditionally, the native analogue of
        // requestAnimationFrame.
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli);

    info!("drag to orbit, scroll to zoom, right-drag to pan, Escape quits");
    event_loop.run_app(&mut app)?;

    Ok(())
}
