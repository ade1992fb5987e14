//! Export formats for the bookcase configurator.
//!
//! Supported formats:
//! - STL, binary and ASCII, of the visible solids
//! - JSON record of the configuration (feature `json`)

#[cfg(feature = "json")]
pub mod record;
pub mod stl;

use bookcase_core::ExportError;
use bookcase_render_3d::SceneGraph;

#[cfg(feature = "json")]
pub use record::{config_from_json, config_to_json};
pub use stl::{collect_mesh, encode_ascii, write_binary};

/// Coordinate frame of exported geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportSpace {
    /// Floor center of the bookcase at the origin.
    #[default]
    Model,
    /// Includes the root offset applied by dragging.
    World,
}

/// Options for mesh export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub space: ExportSpace,
    /// Uniform scale applied last; 1000.0 exports millimeters.
    pub scale: f32,
    /// Whether glass panes are included.
    pub include_translucent: bool,
    /// Solid name in ASCII STL.
    pub name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            space: ExportSpace::Model,
            scale: 1.0,
            include_translucent: true,
            name: "bookcase".to_string(),
        }
    }
}

/// Export the scene's solids to binary STL.
pub fn export_stl(scene: &SceneGraph) -> Result<Vec<u8>, ExportError> {
    stl::export(scene, &ExportOptions::default())
}

/// Export the scene's solids to binary STL with custom options.
pub fn export_stl_with_options(
    scene: &SceneGraph,
    options: &ExportOptions,
) -> Result<Vec<u8>, ExportError> {
    stl::export(scene, options)
}

/// Export the scene's solids to ASCII STL.
pub fn export_stl_ascii(scene: &SceneGraph) -> Result<String, ExportError> {
    stl::export_ascii(scene, &ExportOptions::default())
}

/// Export the scene's solids to ASCII STL with custom options.
pub fn export_stl_ascii_with_options(
    scene: &SceneGraph,
    options: &ExportOptions,
) -> Result<String, ExportError> {
    stl::export_ascii(scene, options)
}
