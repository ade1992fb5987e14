//! TypeScript-friendly type definitions for WASM bindings.

use bookcase_core::{Cell, RenderError};
use bookcase_interact::{Affordance, InteractionOutcome};
use bookcase_render_3d::{Highlight, PrimitiveRole, SceneGraph, SolidNode, SyncReport};
use serde::{Deserialize, Serialize};

/// One solid, ready to upload as a vertex buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshJs {
    pub name: String,
    pub role: String,
    pub handle: u64,
    /// Flat `[x, y, z, ...]` in model space.
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    /// `[r, g, b, a]`, alpha below 1 means translucent.
    pub color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
}

impl MeshJs {
    pub fn from_node(node: &SolidNode) -> Self {
        let primitive = node.primitive();
        let mesh = node.mesh();
        let material = &primitive.material;
        Self {
            name: primitive.name.clone(),
            role: role_name(primitive.role).to_string(),
            handle: node.handle().0,
            positions: mesh.vertices.iter().flat_map(|v| v.to_array()).collect(),
            normals: mesh.normals.iter().flat_map(|n| n.to_array()).collect(),
            indices: mesh.indices.clone(),
            color: [material.color.r, material.color.g, material.color.b, material.color.a],
            metallic: material.metallic,
            roughness: material.roughness,
        }
    }
}

pub fn role_name(role: PrimitiveRole) -> &'static str {
    match role {
        PrimitiveRole::Panel => "panel",
        PrimitiveRole::Back => "back",
        PrimitiveRole::Shelf => "shelf",
        PrimitiveRole::Division => "division",
        PrimitiveRole::DrawerBody => "drawerBody",
        PrimitiveRole::DrawerFrame => "drawerFrame",
        PrimitiveRole::DrawerHandle => "drawerHandle",
    }
}

/// Compartment address for JavaScript.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellJs {
    pub row: u32,
    pub column: u32,
}

impl From<Cell> for CellJs {
    fn from(cell: Cell) -> Self {
        Self {
            row: cell.row,
            column: cell.column,
        }
    }
}

/// Highlight box for JavaScript, in model space.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightJs {
    pub cell: CellJs,
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl From<&Highlight> for HighlightJs {
    fn from(highlight: &Highlight) -> Self {
        Self {
            cell: highlight.cell.into(),
            min: highlight.bounds.min.to_array(),
            max: highlight.bounds.max.to_array(),
        }
    }
}

/// Result of one pointer event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeJs {
    /// CSS cursor for the viewport.
    pub cursor: String,
    pub orbit_enabled: bool,
    pub config_changed: bool,
    pub root_position: Option<[f32; 3]>,
    pub highlight: Option<CellJs>,
}

impl From<&InteractionOutcome> for OutcomeJs {
    fn from(outcome: &InteractionOutcome) -> Self {
        Self {
            cursor: cursor(outcome.affordance).to_string(),
            orbit_enabled: outcome.orbit_enabled,
            config_changed: outcome.config.is_some(),
            root_position: outcome.root_position.map(|p| p.to_array()),
            highlight: outcome.highlight.map(CellJs::from),
        }
    }
}

pub fn cursor(affordance: Affordance) -> &'static str {
    match affordance {
        Affordance::Default => "default",
        Affordance::Clickable => "pointer",
        Affordance::Draggable => "move",
    }
}

/// Rebuild summary for JavaScript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReportJs {
    pub generation: u64,
    pub solids: usize,
    pub hit_regions: usize,
    pub skipped_drawers: Vec<CellJs>,
}

impl From<&SyncReport> for SyncReportJs {
    fn from(report: &SyncReport) -> Self {
        Self {
            generation: report.generation,
            solids: report.solids,
            hit_regions: report.hit_regions,
            skipped_drawers: report.skipped_drawers.iter().map(|d| d.cell().into()).collect(),
        }
    }
}

/// Scene summary for JavaScript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneInfoJs {
    pub generation: u64,
    pub solids: usize,
    pub hit_regions: usize,
    pub root_position: [f32; 3],
    pub bounds_min: Option<[f32; 3]>,
    pub bounds_max: Option<[f32; 3]>,
}

impl From<&SceneGraph> for SceneInfoJs {
    fn from(scene: &SceneGraph) -> Self {
        let bounds = scene.world_bounds();
        Self {
            generation: scene.generation(),
            solids: scene.solids().len(),
            hit_regions: scene.hit_regions().len(),
            root_position: scene.root_position().to_array(),
            bounds_min: bounds.map(|b| b.min.to_array()),
            bounds_max: bounds.map(|b| b.max.to_array()),
        }
    }
}

/// Error payload passed to the fatal callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FatalJs {
    pub kind: String,
    pub message: String,
}

impl From<&RenderError> for FatalJs {
    fn from(err: &RenderError) -> Self {
        let kind = match err {
            RenderError::ResourceInit { .. } => "resourceInit",
            RenderError::Poisoned { .. } => "poisoned",
        };
        Self {
            kind: kind.to_string(),
            message: err.to_string(),
        }
    }
}
