//! 3D geometry and scene management for the bookcase configurator.
//!
//! This crate provides:
//! - 3D shape primitives (box, cylinder) and tessellation to triangle meshes
//! - Materials, with host-supplied textures through [`MaterialProvider`]
//! - The geometry builder turning a configuration into solids and hit-regions
//! - Resource bookkeeping and the scene synchronizer
//! - Orbit camera and ray picking
//!
//! Rendering itself is left to the host, which reads meshes and materials
//! from the [`SceneGraph`].

mod builder;
mod camera;
mod geometry;
mod material;
mod picking;
mod resources;
mod scene;
mod tessellation;

pub use builder::{
    build_geometry, to_bounding_box, BuildOptions, GeneratedGeometry, HitRegion, PrimitiveRole,
    SolidPrimitive,
};
pub use camera::{Camera, Viewport};
pub use geometry::{BoundingBox, Mesh, Shape, ShapeKind};
pub use material::{DefaultMaterials, Material, MaterialProvider, SurfaceKind, TextureHandle};
pub use picking::{pick_hit_region, pick_solid, Ray, RayHit, RegionHit, SolidHit};
pub use resources::{
    LiveResource, MemoryBackend, PendingAcquisition, ResourceBackend, ResourceHandle, TeardownList,
};
pub use scene::{Highlight, SceneGraph, SceneOptions, SceneSynchronizer, SolidNode, SyncReport};
pub use tessellation::{tessellate, tessellate_placed, tessellate_with_options, TessellationOptions};

/// Fit `camera` to the world bounds of `scene`. Does nothing for an empty scene.
pub fn fit_camera(camera: &mut Camera, scene: &SceneGraph) {
    if let Some(bounds) = scene.world_bounds() {
        camera.fit(&bounds);
    }
}
