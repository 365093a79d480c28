use std::{sync::Arc, time::Instant};

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorIcon, Window, WindowAttributes, WindowId},
};

use crate::{
    config::ViewerConfig,
    gfx::{camera::Viewport, rendering::RenderEngine, scene::Scene},
    input::InputEvent,
};

pub struct ViewerApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Option<Scene>,
    start: Instant,
    /// First fatal error; ends the event loop.
    error: Option<anyhow::Error>,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                scene: None,
                start: Instant::now(),
                error: None,
            },
        })
    }

    /// Run the application (consumes self and starts the event loop)
    ///
    /// Returns the load error, if any, once the loop has stopped.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("Event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("Event loop terminated abnormally")?;

        match self.app_state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_config = &self.config.window;
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(window_config.title.clone())
                    .with_inner_size(PhysicalSize::new(window_config.width, window_config.height)),
            )
            .context("Failed to create window")?;
        let window = Arc::new(window);
        self.window = Some(window.clone());

        let PhysicalSize { width, height } = window.inner_size();
        let mut render_engine = pollster::block_on(RenderEngine::new(window, width, height))?;

        let scene = Scene::load(render_engine.resources_mut(), &self.config)
            .context("Failed to load the scene")?;

        self.render_engine = Some(render_engine);
        self.scene = Some(scene);
        self.start = Instant::now();
        Ok(())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let (Some(scene), Some(render_engine)) = (self.scene.take(), self.render_engine.as_mut()) {
            scene.destroy(render_engine.resources_mut());
            log::debug!(
                "Released scene resources, {} still alive",
                render_engine.resources_mut().live_count()
            );
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.initialize(event_loop) {
            log::error!("{:#}", err);
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let (Some(render_engine), Some(window)) = (self.render_engine.as_mut(), self.window.as_ref())
        else {
            return;
        };

        if let (Some(scene), Some(input)) = (self.scene.as_mut(), InputEvent::from_window_event(&event)) {
            scene.push_event(input);
        }

        match event {
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                render_engine.resize(width, height);
            }
            WindowEvent::CloseRequested => {
                self.shutdown(event_loop);
            }
            WindowEvent::RedrawRequested => {
                let Some(scene) = self.scene.as_mut() else {
                    return;
                };
                let viewport = Viewport::from(window.inner_size());
                let elapsed = self.start.elapsed().as_secs_f32();

                if let Some(report) =
                    render_engine.render_frame(|pass| scene.frame(pass, viewport, elapsed))
                {
                    window.set_cursor(CursorIcon::from(report.cursor));
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
