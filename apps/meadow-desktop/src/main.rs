use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use meadow_assets::FileSystemSource;
use meadow_common::Viewport;
use meadow_input::{PointerButton, PointerEvent};
use meadow_orchestrator::{Host, HostEvent, SceneConfig, SceneOrchestrator};
use meadow_render_wgpu::{GuiFrame, WgpuRenderer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Pixels per wheel "line", matching what browsers report for one notch.
const LINE_HEIGHT: f32 = 100.0;

#[derive(Parser)]
#[command(name = "meadow-desktop", about = "Meadow scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config (YAML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Asset root directory; overrides the config
    #[arg(long)]
    assets: Option<PathBuf>,
}

/// The window seen through the orchestrator's host interface.
struct WindowHost {
    window: Arc<Window>,
}

impl Host for WindowHost {
    fn viewport(&self) -> Viewport {
        let size: LogicalSize<u32> = self.window.inner_size().to_logical(self.window.scale_factor());
        Viewport::new(size.width, size.height)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.scale_factor()
    }

    fn request_animation_frame(&mut self) {
        self.window.request_redraw();
    }
}

type Orchestrator = SceneOrchestrator<WindowHost, WgpuRenderer>;

/// Events the orbit controls must see even when egui took them, so a drag
/// released over the panel does not keep rotating the camera.
fn ends_drag(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::MouseInput {
            state: ElementState::Released,
            ..
        } | WindowEvent::CursorLeft { .. }
    )
}

struct App {
    config: SceneConfig,
    window: Option<Arc<Window>>,
    orchestrator: Option<Orchestrator>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    cursor: PhysicalPosition<f64>,
}

impl App {
    fn new(config: SceneConfig) -> Self {
        Self {
            config,
            window: None,
            orchestrator: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            cursor: PhysicalPosition::new(0.0, 0.0),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Meadow")
            .with_inner_size(LogicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let source = Arc::new(FileSystemSource::new(self.config.assets.root.clone()));
        let host = WindowHost {
            window: window.clone(),
        };
        let orchestrator = SceneOrchestrator::new(host, self.config.clone(), source, |settings| {
            WgpuRenderer::new(window.clone(), settings)
        })?;

        self.egui_winit = Some(egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        ));
        window.request_redraw();
        self.window = Some(window);
        self.orchestrator = Some(orchestrator);
        Ok(())
    }

    /// Translate a window event into pointer input for the orbit controls.
    fn pointer_event(&mut self, window: &Window, event: &WindowEvent) -> Option<PointerEvent> {
        let scale = window.scale_factor();
        match *event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
                let p = position.to_logical::<f32>(scale);
                Some(PointerEvent::moved(p.x, p.y))
            }
            WindowEvent::CursorLeft { .. } => Some(PointerEvent::Left),
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    MouseButton::Middle => PointerButton::Middle,
                    _ => return None,
                };
                Some(match state {
                    ElementState::Pressed => {
                        let p = self.cursor.to_logical::<f32>(scale);
                        PointerEvent::down(button, p.x, p.y)
                    }
                    ElementState::Released => PointerEvent::up(button),
                })
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(p) => -p.to_logical::<f32>(scale).y,
                };
                Some(PointerEvent::Wheel { delta_y })
            }
            _ => None,
        }
    }

    fn redraw(&mut self, window: &Window) {
        let (Some(orchestrator), Some(egui_winit)) =
            (self.orchestrator.as_mut(), self.egui_winit.as_mut())
        else {
            return;
        };
        let raw_input = egui_winit.take_egui_input(window);
        let mut full_output = self
            .egui_ctx
            .run(raw_input, |ctx| orchestrator.show_gui(ctx));
        let platform_output = std::mem::take(&mut full_output.platform_output);
        egui_winit.handle_platform_output(window, platform_output);

        orchestrator
            .renderer_mut()
            .set_gui(GuiFrame::from_output(&self.egui_ctx, full_output));
        orchestrator.frame();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            tracing::error!("startup failed: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };
        if let Some(egui_winit) = &mut self.egui_winit {
            let response = egui_winit.on_window_event(&window, &event);
            if response.consumed && !ends_drag(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("window closed");
                if let Some(orchestrator) = &mut self.orchestrator {
                    orchestrator.remove_event_listeners();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(orchestrator) = &mut self.orchestrator {
                    orchestrator.handle_event(HostEvent::Resized);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(&window),
            ref other => {
                let Some(pointer) = self.pointer_event(&window, other) else {
                    return;
                };
                if let Some(orchestrator) = &mut self.orchestrator {
                    orchestrator.handle_event(HostEvent::Pointer(pointer));
                }
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("meadow-desktop starting");

    let mut config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    if let Some(root) = cli.assets {
        config.assets.root = root;
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::DeviceId;

    fn mouse(state: ElementState) -> WindowEvent {
        WindowEvent::MouseInput {
            device_id: unsafe { DeviceId::dummy() },
            state,
            button: MouseButton::Left,
        }
    }

    #[test]
    fn release_reaches_controls_when_gui_consumes_it() {
        assert!(ends_drag(&mouse(ElementState::Released)));
        assert!(ends_drag(&WindowEvent::CursorLeft {
            device_id: unsafe { DeviceId::dummy() },
        }));
    }

    #[test]
    fn press_over_gui_stays_with_gui() {
        assert!(!ends_drag(&mouse(ElementState::Pressed)));
        assert!(!ends_drag(&WindowEvent::CursorMoved {
            device_id: unsafe { DeviceId::dummy() },
            position: PhysicalPosition::new(10.0, 10.0),
        }));
    }
}
