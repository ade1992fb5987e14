//! Live scene graph and its synchronization with the configuration.

use bookcase_core::{Cell, Configuration, Drawer, RenderError};
use bookcase_layout::{compute_layout_with_options, LayoutOptions};
use glam::{Mat4, Vec3};
use tracing::{debug, error, info, instrument};

use crate::builder::{build_geometry, to_bounding_box, BuildOptions, GeneratedGeometry, HitRegion, SolidPrimitive};
use crate::geometry::{BoundingBox, Mesh};
use crate::material::{DefaultMaterials, MaterialProvider};
use crate::resources::{PendingAcquisition, ResourceBackend, ResourceHandle, TeardownList};
use crate::tessellation::{tessellate_placed, TessellationOptions};

/// A generated solid with its model-space mesh and backing resource.
#[derive(Debug, Clone)]
pub struct SolidNode {
    primitive: SolidPrimitive,
    mesh: Mesh,
    handle: ResourceHandle,
}

impl SolidNode {
    pub fn primitive(&self) -> &SolidPrimitive {
        &self.primitive
    }

    pub fn name(&self) -> &str {
        &self.primitive.name
    }

    /// Triangles in model space; apply [`SceneGraph::root_transform`] for world space.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn handle(&self) -> ResourceHandle {
        self.handle
    }
}

/// Hover feedback around one compartment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub cell: Cell,
    /// Model-space bounds of the compartment's hit-region.
    pub bounds: BoundingBox,
}

/// Everything the host draws.
///
/// The solid and hit-region subtrees share one root transform, a pure
/// translation that only dragging changes.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    root: Vec3,
    placed: bool,
    solids: Vec<SolidNode>,
    hit_regions: Vec<HitRegion>,
    highlight: Option<Highlight>,
    model_bounds: Option<BoundingBox>,
    generation: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn solids(&self) -> &[SolidNode] {
        &self.solids
    }

    pub fn hit_regions(&self) -> &[HitRegion] {
        &self.hit_regions
    }

    pub fn hit_region(&self, cell: Cell) -> Option<&HitRegion> {
        self.hit_regions.iter().find(|region| region.cell == cell)
    }

    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    /// Highlight the compartment `cell`, or clear with `None`.
    ///
    /// Returns the new highlight; unknown cells clear it.
    pub fn set_highlight(&mut self, cell: Option<Cell>) -> Option<Highlight> {
        self.highlight = cell
            .and_then(|cell| self.hit_region(cell))
            .map(|region| Highlight {
                cell: region.cell,
                bounds: region.bounds,
            });
        self.highlight
    }

    /// World position of the model origin (floor center).
    pub fn root_position(&self) -> Vec3 {
        self.root
    }

    /// Move the whole model. Solids and hit-regions move together.
    pub fn set_root_position(&mut self, position: Vec3) {
        self.root = position;
        self.placed = true;
    }

    pub fn root_transform(&self) -> Mat4 {
        Mat4::from_translation(self.root)
    }

    /// Whether a first build or a drag has placed the model.
    pub fn is_placed(&self) -> bool {
        self.placed
    }

    /// Number of successful rebuilds.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Outer carcass bounds in model space.
    pub fn model_bounds(&self) -> Option<BoundingBox> {
        self.model_bounds
    }

    /// Outer carcass bounds in world space.
    pub fn world_bounds(&self) -> Option<BoundingBox> {
        self.model_bounds.map(|b| b.translated(self.root))
    }

    pub fn find_solid(&self, name: &str) -> Option<&SolidNode> {
        self.solids.iter().find(|node| node.name() == name)
    }

    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }
}

/// Settings for [`SceneSynchronizer`].
#[derive(Debug, Clone, Default)]
pub struct SceneOptions {
    /// Z of the wall the bookcase stands against. The first build puts the
    /// back face on this plane.
    pub back_plane_z: f32,
    pub layout: LayoutOptions,
    pub build: BuildOptions,
    pub tessellation: TessellationOptions,
}

/// Summary of one successful [`SceneSynchronizer::sync`].
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    pub generation: u64,
    pub solids: usize,
    pub hit_regions: usize,
    /// Resources released from the previous build.
    pub released: usize,
    pub skipped_drawers: Vec<Drawer>,
    pub root: Vec3,
}

/// Keeps a [`SceneGraph`] consistent with the latest configuration.
///
/// Owns the resource backend and the teardown list of the current build.
/// A rebuild either completes or leaves the previous scene untouched; after
/// a resource failure the synchronizer refuses further work.
pub struct SceneSynchronizer<B: ResourceBackend> {
    backend: B,
    options: SceneOptions,
    materials: Box<dyn MaterialProvider>,
    teardown: TeardownList,
    poisoned: Option<String>,
}

impl<B: ResourceBackend> SceneSynchronizer<B> {
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, SceneOptions::default())
    }

    pub fn with_options(backend: B, options: SceneOptions) -> Self {
        Self {
            backend,
            options,
            materials: Box::new(DefaultMaterials::default()),
            teardown: TeardownList::new(),
            poisoned: None,
        }
    }

    /// Use `materials` for every following build.
    pub fn with_materials(mut self, materials: impl MaterialProvider + 'static) -> Self {
        self.materials = Box::new(materials);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned.is_some()
    }

    /// Resources owned by the current build.
    pub fn live_resources(&self) -> usize {
        self.teardown.len()
    }

    /// Generate the geometry for `config` without touching any scene.
    pub fn generate(&self, config: &Configuration) -> GeneratedGeometry {
        let layout = compute_layout_with_options(config, &self.options.layout);
        build_geometry(config, &layout, &self.options.build, &*self.materials)
    }

    /// Replace the generated subtrees of `scene` with geometry for `config`.
    ///
    /// The root offset survives; the first build places the model against
    /// the back plane. The highlight is always cleared.
    #[instrument(skip_all, fields(generation = scene.generation + 1))]
    pub fn sync(
        &mut self,
        scene: &mut SceneGraph,
        config: &Configuration,
    ) -> Result<SyncReport, RenderError> {
        if let Some(reason) = &self.poisoned {
            return Err(RenderError::Poisoned {
                reason: reason.clone(),
            });
        }

        let offset = scene.placed.then_some(scene.root);
        let layout = compute_layout_with_options(config, &self.options.layout);
        let GeneratedGeometry {
            solids,
            hit_regions,
            skipped_drawers,
        } = build_geometry(config, &layout, &self.options.build, &*self.materials);

        let mut pending = PendingAcquisition::new(&mut self.backend);
        let mut nodes = Vec::with_capacity(solids.len());
        for primitive in solids {
            let mesh = tessellate_placed(&primitive.shape, &self.options.tessellation);
            match pending.acquire(&primitive.name, &mesh, &primitive.material) {
                Ok(handle) => nodes.push(SolidNode { primitive, mesh, handle }),
                Err(err) => {
                    error!(
                        primitive = %primitive.name,
                        acquired = pending.len(),
                        error = %err,
                        "resource acquisition failed, keeping previous scene"
                    );
                    self.poisoned = Some(err.to_string());
                    return Err(err);
                }
            }
        }
        let committed = pending.commit();

        let mut previous = std::mem::replace(&mut self.teardown, committed);
        let released = previous.release_all(&mut self.backend);

        let root = offset.unwrap_or_else(|| {
            Vec3::new(0.0, 0.0, self.options.back_plane_z + layout.depth as f32 / 2.0)
        });
        scene.solids = nodes;
        scene.hit_regions = hit_regions;
        scene.model_bounds = Some(to_bounding_box(&layout.outer_bounds()));
        scene.highlight = None;
        scene.root = root;
        scene.placed = true;
        scene.generation += 1;

        info!(
            solids = scene.solids.len(),
            hit_regions = scene.hit_regions.len(),
            released,
            skipped = skipped_drawers.len(),
            "scene rebuilt"
        );

        Ok(SyncReport {
            generation: scene.generation,
            solids: scene.solids.len(),
            hit_regions: scene.hit_regions.len(),
            released,
            skipped_drawers,
            root,
        })
    }

    /// Release every resource and empty the generated subtrees.
    ///
    /// The root offset is kept so a later [`sync`](Self::sync) puts the model
    /// back where it was.
    pub fn teardown(&mut self, scene: &mut SceneGraph) -> usize {
        let released = self.teardown.release_all(&mut self.backend);
        scene.solids.clear();
        scene.hit_regions.clear();
        scene.highlight = None;
        debug!(released, "scene torn down");
        released
    }
}

impl<B: ResourceBackend> Drop for SceneSynchronizer<B> {
    fn drop(&mut self) {
        self.teardown.release_all(&mut self.backend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::MemoryBackend;
    use bookcase_core::DrawerKind;

    #[test]
    fn test_first_build_places_against_back_plane() {
        let mut sync = SceneSynchronizer::new(MemoryBackend::new());
        let mut scene = SceneGraph::new();
        let report = sync.sync(&mut scene, &Configuration::default()).unwrap();

        assert_eq!(report.solids, 11);
        assert_eq!(report.hit_regions, 15);
        assert_eq!(report.released, 0);
        assert_eq!(scene.root_position(), Vec3::new(0.0, 0.0, 0.2));
        assert_eq!(scene.world_bounds().unwrap().min.z, 0.0);
        assert_eq!(sync.backend().live_count(), 11);
    }

    #[test]
    fn test_rebuild_keeps_root_offset() {
        let mut sync = SceneSynchronizer::new(MemoryBackend::new());
        let mut scene = SceneGraph::new();
        let config = Configuration::default();
        sync.sync(&mut scene, &config).unwrap();

        scene.set_root_position(Vec3::new(1.0, 0.0, -2.0));
        let report = sync
            .sync(&mut scene, &config.with_drawer(Drawer::new(0, 0, DrawerKind::Solid)))
            .unwrap();

        assert_eq!(report.root, Vec3::new(1.0, 0.0, -2.0));
        assert_eq!(report.released, 11);
        assert_eq!(sync.backend().live_count(), 13);
    }

    #[test]
    fn test_rebuild_clears_highlight() {
        let mut sync = SceneSynchronizer::new(MemoryBackend::new());
        let mut scene = SceneGraph::new();
        sync.sync(&mut scene, &Configuration::default()).unwrap();

        assert!(scene.set_highlight(Some(Cell::new(1, 1))).is_some());
        sync.sync(&mut scene, &Configuration::default()).unwrap();
        assert!(scene.highlight().is_none());
    }

    #[test]
    fn test_unknown_highlight_cell_clears() {
        let mut sync = SceneSynchronizer::new(MemoryBackend::new());
        let mut scene = SceneGraph::new();
        sync.sync(&mut scene, &Configuration::default()).unwrap();

        scene.set_highlight(Some(Cell::new(0, 0)));
        assert!(scene.set_highlight(Some(Cell::new(40, 0))).is_none());
        assert!(scene.highlight().is_none());
    }

    #[test]
    fn test_teardown_then_drop_releases_once() {
        let mut sync = SceneSynchronizer::new(MemoryBackend::new());
        let mut scene = SceneGraph::new();
        sync.sync(&mut scene, &Configuration::default()).unwrap();

        assert_eq!(sync.teardown(&mut scene), 11);
        assert!(scene.is_empty());
        assert_eq!(sync.backend().live_count(), 0);
        assert_eq!(sync.teardown(&mut scene), 0);
        assert_eq!(sync.backend().stale_releases(), 0);
    }
}
