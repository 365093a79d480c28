use crate::{
    assets,
    config::ViewerConfig,
    error::ViewerError,
    gfx::{
        camera::{CameraManager, Viewport},
        material::LightConfig,
        rendering::binding::{BindingContext, CLEAR_COLOR},
        resources::ResourceFactory,
    },
    input::{CursorRequest, EventQueue, InputEvent},
};

use super::{object::SceneObject, pause_overlay::PauseOverlay};

/// What the windowing layer should apply after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub cursor: CursorRequest,
}

/// Frame orchestrator: owns the camera, the fixed object list, the pause
/// overlay and the queue of input events waiting for the next frame.
pub struct Scene {
    pub camera_manager: CameraManager,
    pub objects: Vec<SceneObject>,
    pub light: LightConfig,
    pause_overlay: PauseOverlay,
    events: EventQueue,
}

impl Scene {
    pub fn new(
        camera_manager: CameraManager,
        objects: Vec<SceneObject>,
        pause_overlay: PauseOverlay,
        light: LightConfig,
    ) -> Self {
        Self {
            camera_manager,
            objects,
            light,
            pause_overlay,
            events: EventQueue::new(),
        }
    }

    /// Loads every object described by `config` plus the pause overlay.
    ///
    /// Any failure releases what was already created and returns the error.
    pub fn load(factory: &mut impl ResourceFactory, config: &ViewerConfig) -> Result<Self, ViewerError> {
        let mut objects = Vec::with_capacity(config.objects.len());

        for descriptor in &config.objects {
            let loaded = assets::load_mesh(&config.asset_path(&descriptor.mesh))
                .and_then(|mesh| {
                    let image = assets::load_texture(&config.asset_path(&descriptor.texture))?;
                    Ok((mesh, image))
                })
                .and_then(|(loaded, image)| {
                    SceneObject::load(
                        factory,
                        &descriptor.name,
                        &descriptor.shader,
                        &loaded.mesh,
                        &image,
                        loaded.material,
                    )
                });

            match loaded {
                Ok(mut object) => {
                    object.translation = descriptor.translation;
                    object.angle = descriptor.angle;
                    object.scale = descriptor.scale;
                    objects.push(object);
                }
                Err(err) => {
                    release_all(factory, objects);
                    return Err(err);
                }
            }
        }

        let overlay = assets::load_texture(&config.asset_path(&config.overlay_texture))
            .and_then(|image| PauseOverlay::load(factory, &image));
        let pause_overlay = match overlay {
            Ok(overlay) => overlay,
            Err(err) => {
                release_all(factory, objects);
                return Err(err);
            }
        };

        log::info!("Scene loaded with {} objects", objects.len());

        Ok(Self::new(
            CameraManager::from_config(&config.camera),
            objects,
            pause_overlay,
            config.light,
        ))
    }

    /// Queues an event for the next frame.
    pub fn push_event(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn is_paused(&self) -> bool {
        self.camera_manager.is_paused()
    }

    /// Runs one frame: input, camera update, clear, objects, overlay.
    pub fn frame(
        &mut self,
        ctx: &mut impl BindingContext,
        viewport: Viewport,
        elapsed: f32,
    ) -> FrameReport {
        for event in self.events.drain() {
            self.camera_manager.process_event(&event);
        }
        let input = self.camera_manager.update();

        let projection = self.camera_manager.camera.projection(viewport);
        let view_state = self.camera_manager.camera.compute_view_state();

        ctx.clear(CLEAR_COLOR);

        for object in &self.objects {
            object.render(ctx, &view_state, projection, elapsed, &self.light);
        }

        if self.is_paused() {
            self.pause_overlay.render(ctx);
        }

        FrameReport {
            cursor: input.cursor,
        }
    }

    /// Releases every GPU resource the scene created.
    pub fn destroy(self, factory: &mut impl ResourceFactory) {
        release_all(factory, self.objects);
        self.pause_overlay.destroy(factory);
    }
}

fn release_all(factory: &mut impl ResourceFactory, objects: Vec<SceneObject>) {
    for object in objects {
        object.destroy(factory);
    }
}
