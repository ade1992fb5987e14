//! Layout computation from a configuration.

use bookcase_core::{Cell, Configuration};
use tracing::{instrument, trace};

use crate::bounds::Bounds3;

/// Smallest extent a compartment may have along any axis, in meters.
pub const MIN_SPAN: f64 = 1e-3;

/// Options for layout computation.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Depth of the hit-test slab placed just behind the front face.
    pub hit_depth: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self { hit_depth: 0.02 }
    }
}

/// One cell of the shelf/division grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Compartment {
    pub cell: Cell,
    /// Shallow slab at the front of the cell, used for hit-testing.
    pub bounds: Bounds3,
    /// Full usable volume of the cell, from the back panel to the front face.
    pub drawer_bounds: Bounds3,
}

/// Resolved positions for one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Outer width after clamping.
    pub width: f64,
    /// Outer height after clamping.
    pub height: f64,
    /// Outer depth after clamping.
    pub depth: f64,
    /// Material thickness after clamping.
    pub thickness: f64,
    /// `shelves + 2` heights, from the bottom panel's top face to the top
    /// panel's bottom face. Interior shelves are centered on their entry.
    pub panel_positions: Vec<f64>,
    /// `divisions + 2` x offsets, from the left side's inner face to the
    /// right side's inner face. Interior dividers are centered on their entry.
    pub divider_positions: Vec<f64>,
    /// Row-major grid of compartments, starting bottom-left.
    pub compartments: Vec<Compartment>,
    rows: u32,
    columns: u32,
}

impl Layout {
    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Look up a compartment; `None` when the cell is outside the grid.
    pub fn compartment(&self, cell: Cell) -> Option<&Compartment> {
        if cell.row >= self.rows || cell.column >= self.columns {
            return None;
        }
        let index = cell.row as usize * self.columns as usize + cell.column as usize;
        self.compartments.get(index)
    }

    /// Heights of the interior shelves, excluding the top and bottom panels.
    pub fn shelf_positions(&self) -> &[f64] {
        interior(&self.panel_positions)
    }

    /// Offsets of the interior dividers, excluding the side panels.
    pub fn division_positions(&self) -> &[f64] {
        interior(&self.divider_positions)
    }

    /// Bounds of the whole carcass.
    pub fn outer_bounds(&self) -> Bounds3 {
        Bounds3::new(
            -self.width / 2.0,
            0.0,
            -self.depth / 2.0,
            self.width,
            self.height,
            self.depth,
        )
    }
}

fn interior(positions: &[f64]) -> &[f64] {
    if positions.len() <= 2 {
        &[]
    } else {
        &positions[1..positions.len() - 1]
    }
}

/// Compute the layout of a configuration with default options.
pub fn compute_layout(config: &Configuration) -> Layout {
    compute_layout_with_options(config, &LayoutOptions::default())
}

/// Compute the layout of a configuration.
///
/// Total for every input: the configuration is clamped first, and every
/// compartment span is kept at least [`MIN_SPAN`] wide.
#[instrument(skip_all, fields(shelves = config.shelves, divisions = config.divisions))]
pub fn compute_layout_with_options(config: &Configuration, options: &LayoutOptions) -> Layout {
    let config = config.sanitized();
    let t = config.thickness;

    let panel_positions = even_positions(t, config.height - t, config.shelves);
    let divider_positions = even_positions(
        -config.width / 2.0 + t,
        config.width / 2.0 - t,
        config.divisions,
    );

    let front = config.depth / 2.0;
    let back = -config.depth / 2.0 + t;
    let hit_depth = clamp_span(options.hit_depth.min(front - back));

    let rows = config.rows();
    let columns = config.columns();
    let mut compartments = Vec::with_capacity(rows as usize * columns as usize);

    for row in 0..rows {
        let (y, height) = span_between(&panel_positions, row as usize, t);
        for column in 0..columns {
            let (x, width) = span_between(&divider_positions, column as usize, t);
            compartments.push(Compartment {
                cell: Cell::new(row, column),
                bounds: Bounds3::new(x, y, front - hit_depth, width, height, hit_depth),
                drawer_bounds: Bounds3::new(x, y, back, width, height, clamp_span(front - back)),
            });
        }
    }

    trace!(compartments = compartments.len(), "layout computed");

    Layout {
        width: config.width,
        height: config.height,
        depth: config.depth,
        thickness: t,
        panel_positions,
        divider_positions,
        compartments,
        rows,
        columns,
    }
}

/// `count + 2` evenly spaced values from `start` to `end` inclusive.
fn even_positions(start: f64, end: f64, count: u32) -> Vec<f64> {
    let steps = count as f64 + 1.0;
    (0..=count + 1)
        .map(|i| start + (end - start) * (i as f64 / steps))
        .collect()
}

/// Clear span of cell `index` between `positions[index]` and the next entry.
///
/// The first and last entries are panel inner faces and are used as-is;
/// interior entries are divider centerlines and lose half a thickness.
fn span_between(positions: &[f64], index: usize, thickness: f64) -> (f64, f64) {
    let (low, high) = (positions[index], positions[index + 1]);
    let low_pad = if index > 0 { thickness / 2.0 } else { 0.0 };
    let high_pad = if index + 2 < positions.len() { thickness / 2.0 } else { 0.0 };
    let start = low + low_pad;
    let extent = high - low - low_pad - high_pad;
    if extent >= MIN_SPAN {
        (start, extent)
    } else {
        ((low + high) / 2.0 - MIN_SPAN / 2.0, MIN_SPAN)
    }
}

fn clamp_span(extent: f64) -> f64 {
    if extent.is_finite() {
        extent.max(MIN_SPAN)
    } else {
        MIN_SPAN
    }
}
