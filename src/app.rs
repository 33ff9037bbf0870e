//! Windowed application: winit event loop, GPU presentation, input wiring.
//!
//! All canvas state lives in the [`CanvasController`]. This module only
//! translates window events into controller calls, uploads the buffer when
//! it changes, and draws each [`crate::controller::FramePlan`].

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::CanvasConfig;
use crate::controller::CanvasController;
use crate::error::AppError;
use crate::gpu::GpuState;
use crate::input::{Command, Input};
use crate::shader::frame_quads;
use crate::time::FrameClock;

#[cfg(feature = "egui")]
use crate::gpu::EguiIntegration;
#[cfg(feature = "egui")]
use crate::overlay::{self, OverlayAction, OverlayState};

/// Open a window and run the canvas until it is closed.
pub fn run(config: CanvasConfig) -> Result<(), AppError> {
    config.validate()?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    config: CanvasConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    canvas: Option<CanvasController>,
    input: Input,
    clock: FrameClock,
    /// Commands from overlay buttons, run at the start of the next frame.
    pending: Vec<Command>,
    error: Option<AppError>,
    #[cfg(feature = "egui")]
    egui: Option<EguiIntegration>,
    #[cfg(feature = "egui")]
    overlay: OverlayState,
}

impl App {
    fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            window: None,
            gpu: None,
            canvas: None,
            input: Input::new(),
            clock: FrameClock::new(),
            pending: Vec::new(),
            error: None,
            #[cfg(feature = "egui")]
            egui: None,
            #[cfg(feature = "egui")]
            overlay: OverlayState::default(),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window_title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();

        let gpu = pollster::block_on(GpuState::new(window.clone(), self.config.background))?;
        let canvas = CanvasController::new(size.width.max(1), size.height.max(1), self.config.clone())?;

        #[cfg(feature = "egui")]
        {
            let egui = EguiIntegration::new(gpu.device(), gpu.format(), &window);
            if let Some(path) = &self.config.font_path {
                egui.load_font(path);
            }
            self.egui = Some(egui);
        }
        #[cfg(not(feature = "egui"))]
        {
            if self.config.font_path.is_some() {
                log::warn!("font_path is set but the overlay is disabled; ignoring it");
            }
        }

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.canvas = Some(canvas);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn apply(&mut self, command: Command) {
        let pointer = self.input.mouse_position();
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };
        match command {
            Command::Create(kind) => {
                canvas.add_at_pointer(kind, pointer);
            }
            Command::ZoomIn => {
                canvas.step_zoom(1.0);
            }
            Command::ZoomOut => {
                canvas.step_zoom(-1.0);
            }
            Command::Recenter => canvas.recenter(),
            Command::Cycle(mutation) => {
                canvas.mutate_selected(mutation);
            }
            Command::DeleteSelected => {
                canvas.delete_selected();
            }
            Command::Restart => canvas.delete_all(),
            Command::Export => match canvas.export() {
                Ok(summary) => log::info!(
                    "Saved {} and {}",
                    summary.image_path.display(),
                    summary.legend_path.display()
                ),
                Err(e) => log::error!("Export failed: {}", e),
            },
            Command::ToggleInfo => {
                #[cfg(feature = "egui")]
                {
                    self.overlay.show_info = !self.overlay.show_info;
                }
                #[cfg(not(feature = "egui"))]
                log::info!("Info overlay needs the `egui` feature");
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now_ms = self.clock.update();
        let mut commands = std::mem::take(&mut self.pending);
        commands.extend(self.input.commands());
        for command in commands {
            self.apply(command);
        }

        let (Some(window), Some(gpu), Some(canvas)) =
            (self.window.clone(), self.gpu.as_mut(), self.canvas.as_mut())
        else {
            return;
        };

        let scroll = self.input.scroll_delta();
        if scroll != 0.0 {
            canvas.step_zoom(scroll.signum());
        }
        canvas.set_key_pan(self.input.pan_direction());
        let plan = canvas.frame(now_ms);

        if let Err(e) = gpu.sync_world(canvas.compositor().raster(), plan.generation) {
            log::error!("Failed to upload world: {}", e);
        }
        let quads = frame_quads(&plan, canvas.world().size(), true);

        #[cfg(feature = "egui")]
        let result = match self.egui.as_mut() {
            Some(egui) => {
                let has_selection = canvas.selected().is_some();
                let size = [gpu.config.width, gpu.config.height];
                egui.begin_frame(&window);
                let actions = overlay::draw(&egui.ctx, &plan, &mut self.overlay, has_selection);
                let output = egui.end_frame(&window);
                for action in actions {
                    match action {
                        OverlayAction::CreateAtCentre(kind) => {
                            canvas.add_at_centre(kind);
                        }
                        OverlayAction::Run(command) => self.pending.push(command),
                    }
                }
                gpu.render_with(&quads, |device, queue, encoder, view| {
                    egui.paint(device, queue, encoder, view, &output, size);
                })
            }
            None => gpu.render(&quads),
        };
        #[cfg(not(feature = "egui"))]
        let result = gpu.render(&quads);

        match result {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
            Err(e) => log::error!("Render error: {:?}", e),
        }

        self.input.begin_frame();
        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        {
            if let (Some(egui), Some(window)) = (self.egui.as_mut(), self.window.as_ref()) {
                if egui.on_window_event(window, &event) {
                    return;
                }
            }
        }

        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(physical_size.width, physical_size.height);
                }
                if physical_size.width > 0 && physical_size.height > 0 {
                    if let Some(canvas) = self.canvas.as_mut() {
                        if let Err(e) = canvas.resize(physical_size.width, physical_size.height) {
                            self.fail(event_loop, e.into());
                        }
                    }
                }
            }
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                let pointer = self.input.mouse_position();
                let now_ms = self.clock.now_ms();
                if let Some(canvas) = self.canvas.as_mut() {
                    match state {
                        ElementState::Pressed => canvas.pointer_down(pointer, now_ms),
                        ElementState::Released => canvas.pointer_up(),
                    }
                }
            }
            WindowEvent::CursorMoved { .. } => {
                let pointer = self.input.mouse_position();
                if let Some(canvas) = self.canvas.as_mut() {
                    canvas.pointer_move(pointer);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
