//! Procedural geometry for a bookcase configuration.
//!
//! [`build_geometry`] is a pure function of the configuration and its layout.
//! It produces every solid primitive plus one invisible hit-region per
//! compartment; nothing here touches graphics resources.

use std::f32::consts::FRAC_PI_2;

use bookcase_core::{Cell, Color, Configuration, Drawer, DrawerKind};
use bookcase_layout::{Bounds3, Layout, MIN_SPAN};
use glam::Vec3;
use smallvec::SmallVec;
use tracing::{debug, instrument, warn};

use crate::geometry::{BoundingBox, Shape};
use crate::material::{Material, MaterialProvider, SurfaceKind};

/// Dimensions of the drawer parts, in meters.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Gap left between a drawer and its compartment on each side.
    pub drawer_clearance: f64,
    pub handle_radius: f64,
    /// How far the handle sticks out of the drawer front.
    pub handle_length: f64,
    /// Width of the strips framing a glass drawer front.
    pub frame_width: f64,
    pub frame_depth: f64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            drawer_clearance: 0.005,
            handle_radius: 0.012,
            handle_length: 0.03,
            frame_width: 0.03,
            frame_depth: 0.01,
        }
    }
}

/// What a solid primitive is part of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveRole {
    /// Top, bottom, left or right outer panel.
    Panel,
    Back,
    Shelf,
    Division,
    DrawerBody,
    DrawerFrame,
    DrawerHandle,
}

impl PrimitiveRole {
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            PrimitiveRole::Panel | PrimitiveRole::Back | PrimitiveRole::Shelf | PrimitiveRole::Division
        )
    }
}

/// One visible solid of the generated model, in model space.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidPrimitive {
    /// Stable name such as `shelf-2` or `drawer-0-1-handle`.
    pub name: String,
    pub role: PrimitiveRole,
    pub shape: Shape,
    pub material: Material,
    /// Compartment the primitive belongs to, for drawer parts.
    pub cell: Option<Cell>,
}

/// Invisible box used only for ray tests against a compartment.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub cell: Cell,
    pub name: String,
    /// Model-space bounds.
    pub bounds: BoundingBox,
}

/// Output of [`build_geometry`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedGeometry {
    pub solids: Vec<SolidPrimitive>,
    pub hit_regions: Vec<HitRegion>,
    /// Drawers whose cell is outside the grid; they produce no geometry.
    pub skipped_drawers: Vec<Drawer>,
}

impl GeneratedGeometry {
    /// Number of solids that are not drawer parts.
    pub fn structural_count(&self) -> usize {
        self.solids.iter().filter(|s| s.role.is_structural()).count()
    }

    /// Solids generated for the drawer in `cell`.
    pub fn drawer_parts(&self, cell: Cell) -> impl Iterator<Item = &SolidPrimitive> {
        self.solids.iter().filter(move |s| s.cell == Some(cell))
    }

    pub fn find(&self, name: &str) -> Option<&SolidPrimitive> {
        self.solids.iter().find(|s| s.name == name)
    }
}

/// Parts of one drawer; glass drawers have six.
type DrawerParts = SmallVec<[SolidPrimitive; 6]>;

/// Generate every primitive for `config` using the positions in `layout`.
///
/// `layout` must have been computed from the same configuration. Drawers
/// outside the grid are skipped and reported, never fatal.
#[instrument(skip_all, fields(drawers = config.drawers.len()))]
pub fn build_geometry(
    config: &Configuration,
    layout: &Layout,
    options: &BuildOptions,
    materials: &dyn MaterialProvider,
) -> GeneratedGeometry {
    let body = config.color;
    let mut geometry = GeneratedGeometry::default();

    push_carcass(&mut geometry.solids, layout, materials, body);

    for compartment in &layout.compartments {
        let cell = compartment.cell;
        geometry.hit_regions.push(HitRegion {
            cell,
            name: format!("hit-{}-{}", cell.row, cell.column),
            bounds: to_bounding_box(&compartment.bounds),
        });
    }

    for drawer in config.drawers.iter() {
        let Some(compartment) = layout.compartment(drawer.cell()) else {
            warn!(
                row = drawer.row,
                column = drawer.column,
                rows = layout.rows(),
                columns = layout.columns(),
                "skipping drawer outside the grid"
            );
            geometry.skipped_drawers.push(drawer);
            continue;
        };
        let parts = drawer_parts(drawer, &compartment.drawer_bounds, options, materials, body);
        geometry.solids.extend(parts);
    }

    debug!(
        solids = geometry.solids.len(),
        hit_regions = geometry.hit_regions.len(),
        skipped = geometry.skipped_drawers.len(),
        "geometry built"
    );
    geometry
}

fn push_carcass(
    solids: &mut Vec<SolidPrimitive>,
    layout: &Layout,
    materials: &dyn MaterialProvider,
    body: Color,
) {
    let (w, h, d, t) = (layout.width, layout.height, layout.depth, layout.thickness);
    let inner_w = w - 2.0 * t;
    let inner_h = h - 2.0 * t;
    let carcass = materials.material(SurfaceKind::Carcass, body);

    let mut panel = |name: &str, role: PrimitiveRole, size: [f64; 3], center: [f64; 3], material: &Material| {
        solids.push(SolidPrimitive {
            name: name.to_string(),
            role,
            shape: placed_box(size, center),
            material: material.clone(),
            cell: None,
        });
    };

    panel("panel-bottom", PrimitiveRole::Panel, [inner_w, t, d], [0.0, t / 2.0, 0.0], &carcass);
    panel("panel-top", PrimitiveRole::Panel, [inner_w, t, d], [0.0, h - t / 2.0, 0.0], &carcass);
    panel("panel-left", PrimitiveRole::Panel, [t, h, d], [-(w - t) / 2.0, h / 2.0, 0.0], &carcass);
    panel("panel-right", PrimitiveRole::Panel, [t, h, d], [(w - t) / 2.0, h / 2.0, 0.0], &carcass);
    panel(
        "panel-back",
        PrimitiveRole::Back,
        [inner_w, inner_h, t],
        [0.0, h / 2.0, (t - d) / 2.0],
        &materials.material(SurfaceKind::Back, body),
    );

    // Shelves and dividers stop at the back panel.
    let shelf = materials.material(SurfaceKind::Shelf, body);
    for (i, &y) in layout.shelf_positions().iter().enumerate() {
        panel(
            &format!("shelf-{}", i + 1),
            PrimitiveRole::Shelf,
            [inner_w, t, d - t],
            [0.0, y, t / 2.0],
            &shelf,
        );
    }

    let division = materials.material(SurfaceKind::Division, body);
    for (j, &x) in layout.division_positions().iter().enumerate() {
        panel(
            &format!("division-{}", j + 1),
            PrimitiveRole::Division,
            [t, inner_h, d - t],
            [x, h / 2.0, t / 2.0],
            &division,
        );
    }
}

fn drawer_parts(
    drawer: Drawer,
    space: &Bounds3,
    options: &BuildOptions,
    materials: &dyn MaterialProvider,
    body: Color,
) -> DrawerParts {
    let cell = drawer.cell();
    let prefix = format!("drawer-{}-{}", drawer.row, drawer.column);
    let mut parts = DrawerParts::new();
    let mut part = |suffix: &str, role: PrimitiveRole, shape: Shape, material: Material| {
        parts.push(SolidPrimitive {
            name: format!("{prefix}-{suffix}"),
            role,
            shape,
            material,
            cell: Some(cell),
        });
    };

    let clearance = options.drawer_clearance.max(0.0);
    let width = (space.width - 2.0 * clearance).max(MIN_SPAN);
    let height = (space.height - 2.0 * clearance).max(MIN_SPAN);
    let depth = (space.depth - clearance).max(MIN_SPAN);
    let [cx, cy, _] = space.center();
    let front = space.front();
    let back = front - depth;

    match drawer.kind {
        DrawerKind::Solid => {
            part(
                "body",
                PrimitiveRole::DrawerBody,
                placed_box([width, height, depth], [cx, cy, back + depth / 2.0]),
                materials.material(SurfaceKind::DrawerBody, body),
            );
        }
        DrawerKind::Glass => {
            let frame_depth = options.frame_depth.clamp(0.0, depth / 2.0);
            let frame_width = options.frame_width.clamp(0.0, width.min(height) / 4.0);
            let glass_depth = depth - frame_depth;
            part(
                "glass",
                PrimitiveRole::DrawerBody,
                placed_box([width, height, glass_depth], [cx, cy, back + glass_depth / 2.0]),
                materials.material(SurfaceKind::Glass, body),
            );

            let frame = materials.material(SurfaceKind::Frame, body);
            let z = front - frame_depth / 2.0;
            let rail = [width, frame_width, frame_depth];
            let stile = [frame_width, height - 2.0 * frame_width, frame_depth];
            let dy = (height - frame_width) / 2.0;
            let dx = (width - frame_width) / 2.0;
            for (suffix, size, center) in [
                ("frame-top", rail, [cx, cy + dy, z]),
                ("frame-bottom", rail, [cx, cy - dy, z]),
                ("frame-left", stile, [cx - dx, cy, z]),
                ("frame-right", stile, [cx + dx, cy, z]),
            ] {
                part(suffix, PrimitiveRole::DrawerFrame, placed_box(size, center), frame.clone());
            }
        }
    }

    let radius = options
        .handle_radius
        .min(width.min(height) / 4.0)
        .max(MIN_SPAN / 2.0);
    let length = options.handle_length.max(MIN_SPAN);
    let handle = Shape::cylinder(radius, length)
        .rotate_x(FRAC_PI_2)
        .translate(to_vec3([cx, cy, front + length / 2.0]));
    part(
        "handle",
        PrimitiveRole::DrawerHandle,
        handle,
        materials.material(SurfaceKind::Handle, body),
    );

    parts
}

fn placed_box(size: [f64; 3], center: [f64; 3]) -> Shape {
    let [w, h, d] = size.map(|v| v.max(MIN_SPAN));
    Shape::box_shape(w, h, d).translate(to_vec3(center))
}

fn to_vec3(v: [f64; 3]) -> Vec3 {
    Vec3::new(v[0] as f32, v[1] as f32, v[2] as f32)
}

/// Convert layout bounds to a single-precision bounding box.
pub fn to_bounding_box(bounds: &Bounds3) -> BoundingBox {
    BoundingBox::from_center_size(bounds.center_vec3(), bounds.size_vec3())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::DefaultMaterials;
    use bookcase_layout::compute_layout;

    fn build(config: &Configuration) -> GeneratedGeometry {
        let layout = compute_layout(config);
        build_geometry(config, &layout, &BuildOptions::default(), &DefaultMaterials::default())
    }

    #[test]
    fn test_structural_solids() {
        let geometry = build(&Configuration::default());

        // 5 outer panels + 4 shelves + 2 divisions
        assert_eq!(geometry.solids.len(), 11);
        assert_eq!(geometry.structural_count(), 11);
        assert_eq!(geometry.hit_regions.len(), 15);
        assert!(geometry.skipped_drawers.is_empty());
    }

    #[test]
    fn test_drawer_groups() {
        let plain = Configuration::default();
        let solid = plain.with_drawer(Drawer::new(0, 1, DrawerKind::Solid));
        let glass = plain.with_drawer(Drawer::new(0, 1, DrawerKind::Glass));

        let solid_geometry = build(&solid);
        let glass_geometry = build(&glass);

        assert_eq!(solid_geometry.solids.len(), 13);
        assert_eq!(glass_geometry.solids.len(), 17);
        assert_eq!(solid_geometry.drawer_parts(Cell::new(0, 1)).count(), 2);
        assert_eq!(glass_geometry.drawer_parts(Cell::new(0, 1)).count(), 6);
        assert!(glass_geometry.find("drawer-0-1-handle").is_some());
        assert!(glass_geometry.find("drawer-0-1-frame-left").is_some());
    }

    #[test]
    fn test_out_of_range_drawer_is_skipped() {
        let config = Configuration::default()
            .with_drawer(Drawer::new(9, 0, DrawerKind::Solid))
            .with_drawer(Drawer::new(1, 1, DrawerKind::Glass));
        let geometry = build(&config);

        assert_eq!(geometry.skipped_drawers, vec![Drawer::new(9, 0, DrawerKind::Solid)]);
        assert_eq!(geometry.solids.len(), 11 + 6);
    }

    #[test]
    fn test_shelves_sit_on_panel_positions() {
        let config = Configuration::default();
        let layout = compute_layout(&config);
        let geometry = build(&config);

        for (i, &y) in layout.shelf_positions().iter().enumerate() {
            let shelf = geometry.find(&format!("shelf-{}", i + 1)).unwrap();
            let bounds = shelf.shape.bounding_box();
            assert!((bounds.center().y - y as f32).abs() < 1e-5);
            assert!((bounds.size().y - 0.04).abs() < 1e-5);
        }
    }

    #[test]
    fn test_panels_fill_outer_bounds() {
        let geometry = build(&Configuration::default());
        let bounds = geometry
            .solids
            .iter()
            .map(|s| s.shape.bounding_box())
            .reduce(|a, b| a.union(&b))
            .unwrap();

        assert!((bounds.min - Vec3::new(-1.25, 0.0, -0.2)).abs().max_element() < 1e-5);
        assert!((bounds.max - Vec3::new(1.25, 2.4, 0.2)).abs().max_element() < 1e-5);
    }

    #[test]
    fn test_drawer_fits_its_compartment() {
        let config = Configuration::default().with_drawer(Drawer::new(2, 2, DrawerKind::Glass));
        let layout = compute_layout(&config);
        let space = to_bounding_box(&layout.compartment(Cell::new(2, 2)).unwrap().drawer_bounds);
        let geometry = build(&config);

        for part in geometry.drawer_parts(Cell::new(2, 2)) {
            let bounds = part.shape.bounding_box();
            if part.role == PrimitiveRole::DrawerHandle {
                assert!(bounds.min.z >= space.max.z - 1e-5);
            } else {
                assert!(bounds.min.cmpge(space.min - Vec3::splat(1e-5)).all(), "{}", part.name);
                assert!(bounds.max.cmple(space.max + Vec3::splat(1e-5)).all(), "{}", part.name);
            }
        }
    }

    #[test]
    fn test_glass_parts_are_translucent() {
        let config = Configuration::default().with_drawer(Drawer::new(0, 0, DrawerKind::Glass));
        let geometry = build(&config);

        assert!(geometry.find("drawer-0-0-glass").unwrap().material.is_translucent());
        assert!(!geometry.find("drawer-0-0-frame-top").unwrap().material.is_translucent());
    }

    #[test]
    fn test_hit_regions_match_compartments() {
        let config = Configuration::default();
        let layout = compute_layout(&config);
        let geometry = build(&config);

        for (region, compartment) in geometry.hit_regions.iter().zip(&layout.compartments) {
            assert_eq!(region.cell, compartment.cell);
            assert_eq!(region.bounds, to_bounding_box(&compartment.bounds));
        }
    }
}
