//! The configurator session: configuration, live scene and pointer handling.

use bookcase_core::{ConfigPatch, Configuration, RenderError};
use bookcase_render_3d::{
    fit_camera, Camera, ResourceBackend, SceneGraph, SceneOptions, SceneSynchronizer, SyncReport,
    Viewport,
};
use glam::Vec3;
use tracing::{debug, error, info};

use crate::controller::{InteractionController, InteractionOutcome, PointerEvent};

type ChangeCallback = Box<dyn FnMut(&Configuration)>;
type RootMovedCallback = Box<dyn FnMut(Vec3)>;
type FatalCallback = Box<dyn FnMut(&RenderError)>;

/// One configurator session.
///
/// Every edit, whether from form controls or from a click, replaces the
/// configuration and rebuilds the scene before returning, so the next
/// pointer event always tests against current hit-regions.
pub struct Configurator<B: ResourceBackend> {
    config: Configuration,
    scene: SceneGraph,
    sync: SceneSynchronizer<B>,
    controller: InteractionController,
    camera: Camera,
    viewport: Viewport,
    on_change: Option<ChangeCallback>,
    on_root_moved: Option<RootMovedCallback>,
    on_fatal: Option<FatalCallback>,
    fatal_reported: bool,
}

impl<B: ResourceBackend> Configurator<B> {
    /// Start a session with the default configuration.
    pub fn new(backend: B) -> Result<Self, RenderError> {
        Self::with_config(backend, SceneOptions::default(), Configuration::default())
    }

    /// Start a session and build the first scene.
    pub fn with_config(
        backend: B,
        options: SceneOptions,
        config: Configuration,
    ) -> Result<Self, RenderError> {
        let mut sync = SceneSynchronizer::with_options(backend, options);
        let mut scene = SceneGraph::new();
        sync.sync(&mut scene, &config)?;

        let mut camera = Camera::default();
        fit_camera(&mut camera, &scene);

        info!(solids = scene.solids().len(), "configurator started");
        Ok(Self {
            config,
            scene,
            sync,
            controller: InteractionController::new(),
            camera,
            viewport: Viewport::new(800.0, 600.0),
            on_change: None,
            on_root_moved: None,
            on_fatal: None,
            fatal_reported: false,
        })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn synchronizer(&self) -> &SceneSynchronizer<B> {
        &self.sync
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Aim the camera at the whole model.
    pub fn fit_camera(&mut self) {
        fit_camera(&mut self.camera, &self.scene);
    }

    /// Called with every configuration that was applied successfully.
    pub fn on_change(&mut self, callback: impl FnMut(&Configuration) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Called with the new root position while the model is dragged.
    pub fn on_root_moved(&mut self, callback: impl FnMut(Vec3) + 'static) {
        self.on_root_moved = Some(Box::new(callback));
    }

    /// Called once, with the first resource failure.
    pub fn on_fatal(&mut self, callback: impl FnMut(&RenderError) + 'static) {
        self.on_fatal = Some(Box::new(callback));
    }

    /// Replace the configuration and rebuild.
    ///
    /// On failure the previous configuration and scene stay in place.
    pub fn set_config(&mut self, config: Configuration) -> Result<SyncReport, RenderError> {
        let report = match self.sync.sync(&mut self.scene, &config) {
            Ok(report) => report,
            Err(err) => return Err(self.report_failure(err)),
        };
        self.config = config;
        debug!(generation = report.generation, "configuration applied");
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.config);
        }
        Ok(report)
    }

    /// Merge a form-control update into the configuration and rebuild.
    pub fn apply_patch(&mut self, patch: &ConfigPatch) -> Result<SyncReport, RenderError> {
        self.set_config(self.config.with_patch(patch))
    }

    /// Feed one pointer event through the interaction controller.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<InteractionOutcome, RenderError> {
        let outcome = self.controller.handle(
            event,
            &mut self.scene,
            &self.config,
            &self.camera,
            &self.viewport,
        );

        if let Some(config) = outcome.config.clone() {
            self.set_config(config)?;
        }
        if let Some(position) = outcome.root_position {
            if let Some(callback) = self.on_root_moved.as_mut() {
                callback(position);
            }
        }
        Ok(outcome)
    }

    /// Release every resource. The session keeps its configuration and can
    /// be rebuilt with [`set_config`](Self::set_config).
    pub fn shutdown(&mut self) -> usize {
        self.sync.teardown(&mut self.scene)
    }

    fn report_failure(&mut self, err: RenderError) -> RenderError {
        error!(error = %err, "rebuild failed");
        if !self.fatal_reported {
            self.fatal_reported = true;
            if let Some(callback) = self.on_fatal.as_mut() {
                callback(&err);
            }
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookcase_core::Cell;
    use bookcase_render_3d::MemoryBackend;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_patch_rebuilds_and_notifies() {
        let mut configurator = Configurator::new(MemoryBackend::new()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        configurator.on_change(move |config| sink.borrow_mut().push(config.shelves));

        let report = configurator
            .apply_patch(&ConfigPatch {
                shelves: Some(2),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(report.solids, 5 + 2 + 2);
        assert_eq!(configurator.config().shelves, 2);
        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn test_fatal_reported_once() {
        let options = SceneOptions::default();
        let mut configurator = Configurator::with_config(
            MemoryBackend::with_capacity(12),
            options,
            Configuration::default(),
        )
        .unwrap();
        let fatal = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&fatal);
        configurator.on_fatal(move |_| *counter.borrow_mut() += 1);

        let drawer = Configuration::default().cycle_drawer(Cell::new(0, 0));
        assert!(configurator.set_config(drawer.clone()).is_err());
        assert!(matches!(
            configurator.set_config(drawer),
            Err(RenderError::Poisoned { .. })
        ));

        assert_eq!(*fatal.borrow(), 1);
        assert_eq!(configurator.config(), &Configuration::default());
        assert_eq!(configurator.scene().solids().len(), 11);
    }

    #[test]
    fn test_shutdown_releases_everything() {
        let mut configurator = Configurator::new(MemoryBackend::new()).unwrap();
        assert_eq!(configurator.shutdown(), 11);
        assert_eq!(configurator.synchronizer().backend().live_count(), 0);
        assert!(configurator.scene().is_empty());
    }
}
