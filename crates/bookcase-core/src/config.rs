//! The bookcase configuration record.
//!
//! A [`Configuration`] is an immutable value: every edit helper returns a new
//! record and leaves the receiver untouched.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::errors::ConfigError;
use crate::types::{Cell, Color};

/// Smallest accepted width, height or depth, in meters.
pub const MIN_DIMENSION: f64 = 0.1;
/// Smallest accepted material thickness, in meters.
pub const MIN_THICKNESS: f64 = 0.005;
/// Smallest clear opening between two neighbouring panels, in meters.
pub const MIN_OPENING: f64 = 1e-3;

/// Kind of drawer placed in a compartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum DrawerKind {
    Solid,
    Glass,
}

impl DrawerKind {
    /// Next state of a compartment in the click cycle: absent, solid, glass, absent.
    pub fn cycle(current: Option<DrawerKind>) -> Option<DrawerKind> {
        match current {
            None => Some(DrawerKind::Solid),
            Some(DrawerKind::Solid) => Some(DrawerKind::Glass),
            Some(DrawerKind::Glass) => None,
        }
    }
}

/// A drawer placed in one compartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Drawer {
    pub row: u32,
    pub column: u32,
    pub kind: DrawerKind,
}

impl Drawer {
    pub fn new(row: u32, column: u32, kind: DrawerKind) -> Self {
        Self { row, column, kind }
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.row, self.column)
    }
}

/// Drawers keyed by compartment, at most one per cell.
///
/// Serialized as a flat list of [`Drawer`] records in insertion order. When a
/// list names the same cell twice the later entry wins.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<Drawer>", into = "Vec<Drawer>")
)]
pub struct DrawerSet {
    entries: IndexMap<Cell, DrawerKind>,
}

impl DrawerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, cell: Cell) -> Option<DrawerKind> {
        self.entries.get(&cell).copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.entries.contains_key(&cell)
    }

    /// Insert or replace the drawer in `drawer.cell()`, returning the previous kind.
    pub fn insert(&mut self, drawer: Drawer) -> Option<DrawerKind> {
        self.entries.insert(drawer.cell(), drawer.kind)
    }

    /// Remove the drawer in `cell`, keeping the order of the others.
    pub fn remove(&mut self, cell: Cell) -> Option<DrawerKind> {
        self.entries.shift_remove(&cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = Drawer> + '_ {
        self.entries
            .iter()
            .map(|(cell, kind)| Drawer::new(cell.row, cell.column, *kind))
    }
}

impl From<Vec<Drawer>> for DrawerSet {
    fn from(drawers: Vec<Drawer>) -> Self {
        drawers.into_iter().collect()
    }
}

impl From<DrawerSet> for Vec<Drawer> {
    fn from(set: DrawerSet) -> Self {
        set.iter().collect()
    }
}

impl FromIterator<Drawer> for DrawerSet {
    fn from_iter<I: IntoIterator<Item = Drawer>>(iter: I) -> Self {
        let mut set = DrawerSet::new();
        for drawer in iter {
            set.insert(drawer);
        }
        set
    }
}

/// Structural description of a bookcase.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration {
    /// Outer width in meters.
    pub width: f64,
    /// Outer height in meters.
    pub height: f64,
    /// Outer depth in meters.
    pub depth: f64,
    /// Horizontal dividers strictly between the top and bottom panels.
    pub shelves: u32,
    /// Vertical dividers strictly between the side panels.
    pub divisions: u32,
    /// Material thickness in meters.
    pub thickness: f64,
    pub color: Color,
    #[cfg_attr(feature = "serde", serde(default))]
    pub drawers: DrawerSet,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            width: 2.5,
            height: 2.4,
            depth: 0.4,
            shelves: 4,
            divisions: 2,
            thickness: 0.04,
            color: Color::from_rgb8(0xDA, 0xA5, 0x20),
            drawers: DrawerSet::new(),
        }
    }
}

impl Configuration {
    /// Number of compartment rows.
    pub fn rows(&self) -> u32 {
        self.shelves + 1
    }

    /// Number of compartment columns.
    pub fn columns(&self) -> u32 {
        self.divisions + 1
    }

    /// Whether `cell` addresses a compartment of this bookcase.
    pub fn contains_cell(&self, cell: Cell) -> bool {
        cell.row < self.rows() && cell.column < self.columns()
    }

    pub fn drawer_at(&self, cell: Cell) -> Option<DrawerKind> {
        self.drawers.get(cell)
    }

    /// Copy with `drawer` placed, replacing whatever was in its cell.
    pub fn with_drawer(&self, drawer: Drawer) -> Self {
        let mut next = self.clone();
        next.drawers.insert(drawer);
        next
    }

    /// Copy with the drawer in `cell` removed.
    pub fn without_drawer(&self, cell: Cell) -> Self {
        let mut next = self.clone();
        next.drawers.remove(cell);
        next
    }

    /// Copy with the drawer in `cell` advanced one step through the click cycle.
    pub fn cycle_drawer(&self, cell: Cell) -> Self {
        let current = self.drawer_at(cell);
        let next_kind = DrawerKind::cycle(current);
        debug!(%cell, ?current, next = ?next_kind, "cycling drawer");
        match next_kind {
            Some(kind) => self.with_drawer(Drawer::new(cell.row, cell.column, kind)),
            None => self.without_drawer(cell),
        }
    }

    /// Copy with every field set in `patch` replaced.
    pub fn with_patch(&self, patch: &ConfigPatch) -> Self {
        let mut next = self.clone();
        if let Some(width) = patch.width {
            next.width = width;
        }
        if let Some(height) = patch.height {
            next.height = height;
        }
        if let Some(depth) = patch.depth {
            next.depth = depth;
        }
        if let Some(shelves) = patch.shelves {
            next.shelves = shelves;
        }
        if let Some(divisions) = patch.divisions {
            next.divisions = divisions;
        }
        if let Some(thickness) = patch.thickness {
            next.thickness = thickness;
        }
        if let Some(color) = patch.color {
            next.color = color;
        }
        if let Some(ref drawers) = patch.drawers {
            next.drawers = drawers.iter().copied().collect();
        }
        next
    }

    /// Largest thickness that still leaves room for every panel.
    pub fn thickness_limit(&self) -> f64 {
        self.width.min(self.height).min(self.depth) / 4.0
    }

    /// Copy clamped into the range the layout can handle.
    ///
    /// Non-finite or too small dimensions become [`MIN_DIMENSION`] and
    /// thickness is kept within `[MIN_THICKNESS, thickness_limit()]`. Shelf and
    /// division counts and drawers are left alone.
    pub fn sanitized(&self) -> Self {
        let mut next = self.clone();
        next.width = clamp_dimension(self.width);
        next.height = clamp_dimension(self.height);
        next.depth = clamp_dimension(self.depth);

        let limit = next.thickness_limit();
        next.thickness = if self.thickness.is_finite() {
            self.thickness.clamp(MIN_THICKNESS, limit)
        } else {
            MIN_THICKNESS
        };

        if next != *self {
            warn!(
                width = next.width,
                height = next.height,
                depth = next.depth,
                thickness = next.thickness,
                "configuration clamped"
            );
        }
        next
    }

    /// List every problem with this record. An empty list means the record is
    /// used as-is by the layout.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut problems = Vec::new();

        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
            ("thickness", self.thickness),
        ] {
            if !(value.is_finite() && value > 0.0) {
                problems.push(ConfigError::NonPositiveDimension { name, value });
            }
        }

        let limit = self.thickness_limit();
        if self.thickness.is_finite() && self.thickness > limit {
            problems.push(ConfigError::ThicknessTooLarge {
                thickness: self.thickness,
                limit,
            });
        }

        let clean = self.sanitized();
        let minimum = clean.thickness + MIN_OPENING;
        for (name, count, extent) in [
            ("shelves", clean.shelves, clean.height),
            ("divisions", clean.divisions, clean.width),
        ] {
            let pitch = (extent - 2.0 * clean.thickness) / (count as f64 + 1.0);
            if count > 0 && pitch < minimum {
                problems.push(ConfigError::DividersTooDense {
                    name,
                    count,
                    pitch,
                    minimum,
                });
            }
        }

        for drawer in self.drawers.iter() {
            if !self.contains_cell(drawer.cell()) {
                problems.push(ConfigError::DrawerOutOfRange {
                    row: drawer.row,
                    column: drawer.column,
                    rows: self.rows(),
                    columns: self.columns(),
                });
            }
        }

        problems
    }
}

fn clamp_dimension(value: f64) -> f64 {
    if value.is_finite() {
        value.max(MIN_DIMENSION)
    } else {
        MIN_DIMENSION
    }
}

/// A partial update from form controls. Unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ConfigPatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub depth: Option<f64>,
    pub shelves: Option<u32>,
    pub divisions: Option<u32>,
    pub thickness: Option<f64>,
    pub color: Option<Color>,
    pub drawers: Option<Vec<Drawer>>,
}

impl ConfigPatch {
    pub fn is_empty(&self) -> bool {
        *self == ConfigPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_bookcase() {
        let config = Configuration::default();
        assert_eq!(config.rows(), 5);
        assert_eq!(config.columns(), 3);
        assert_eq!(config.color.to_hex(), "#DAA520");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_cycle_drawer_has_period_three() {
        let cell = Cell::new(0, 0);
        let start = Configuration::default();

        let first = start.cycle_drawer(cell);
        assert_eq!(first.drawer_at(cell), Some(DrawerKind::Solid));
        let second = first.cycle_drawer(cell);
        assert_eq!(second.drawer_at(cell), Some(DrawerKind::Glass));
        let third = second.cycle_drawer(cell);
        assert_eq!(third.drawer_at(cell), None);
        let fourth = third.cycle_drawer(cell);
        assert_eq!(fourth.drawer_at(cell), Some(DrawerKind::Solid));

        // The receiver is never touched.
        assert!(start.drawers.is_empty());
    }

    #[test]
    fn test_drawer_set_keeps_one_per_cell() {
        let set: DrawerSet = vec![
            Drawer::new(1, 1, DrawerKind::Solid),
            Drawer::new(0, 2, DrawerKind::Solid),
            Drawer::new(1, 1, DrawerKind::Glass),
        ]
        .into();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(Cell::new(1, 1)), Some(DrawerKind::Glass));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut set: DrawerSet = vec![
            Drawer::new(0, 0, DrawerKind::Solid),
            Drawer::new(0, 1, DrawerKind::Solid),
            Drawer::new(0, 2, DrawerKind::Solid),
        ]
        .into();
        set.remove(Cell::new(0, 1));
        let cells: Vec<Cell> = set.iter().map(|d| d.cell()).collect();
        assert_eq!(cells, vec![Cell::new(0, 0), Cell::new(0, 2)]);
    }

    #[test]
    fn test_with_patch_only_touches_set_fields() {
        let config = Configuration::default();
        let patch = ConfigPatch {
            width: Some(2.3),
            shelves: Some(6),
            ..Default::default()
        };
        let next = config.with_patch(&patch);

        assert_eq!(next.width, 2.3);
        assert_eq!(next.shelves, 6);
        assert_eq!(next.height, config.height);
        assert_eq!(next.color, config.color);
        assert!(ConfigPatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_sanitized_clamps_degenerate_values() {
        let config = Configuration {
            width: -1.0,
            height: f64::NAN,
            depth: 0.0,
            thickness: 5.0,
            shelves: 1000,
            ..Default::default()
        };
        let clean = config.sanitized();
        assert_eq!(clean.shelves, 1000);

        assert_eq!(clean.width, MIN_DIMENSION);
        assert_eq!(clean.height, MIN_DIMENSION);
        assert_eq!(clean.depth, MIN_DIMENSION);
        assert!(clean.thickness * 2.0 < clean.width);
        assert!(clean.thickness >= MIN_THICKNESS);
    }

    #[test]
    fn test_sanitized_is_identity_for_valid_input() {
        let config = Configuration::default();
        assert_eq!(config.sanitized(), config);
    }

    #[test]
    fn test_validate_reports_dangling_drawer() {
        let config = Configuration::default().with_drawer(Drawer::new(9, 0, DrawerKind::Solid));
        let problems = config.validate();
        assert_eq!(
            problems,
            vec![ConfigError::DrawerOutOfRange {
                row: 9,
                column: 0,
                rows: 5,
                columns: 3
            }]
        );
    }

    #[test]
    fn test_many_shelves_in_a_tall_case_are_valid() {
        let config = Configuration {
            height: 10.0,
            thickness: 0.01,
            shelves: 100,
            ..Default::default()
        }
        .with_drawer(Drawer::new(90, 1, DrawerKind::Solid));

        assert_eq!(config.sanitized().shelves, 100);
        assert_eq!(config.rows(), 101);
        assert!(config.contains_cell(Cell::new(90, 1)));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_dense_dividers() {
        let config = Configuration {
            width: 0.3,
            height: 0.3,
            thickness: 0.05,
            shelves: 40,
            divisions: 1,
            ..Default::default()
        };
        let problems = config.validate();

        assert_eq!(problems.len(), 1);
        assert!(matches!(
            problems[0],
            ConfigError::DividersTooDense { name: "shelves", count: 40, .. }
        ));
        assert_eq!(config.sanitized().shelves, 40);
    }

    #[test]
    fn test_validate_reports_thick_material() {
        let config = Configuration {
            thickness: 0.2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate().as_slice(),
            [ConfigError::ThicknessTooLarge { .. }]
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_record_round_trip() {
        let config = Configuration::default()
            .with_drawer(Drawer::new(0, 0, DrawerKind::Solid))
            .with_drawer(Drawer::new(2, 1, DrawerKind::Glass));

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"color\":\"#DAA520\""));
        assert!(json.contains("\"kind\":\"glass\""));

        let back: Configuration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_patch_from_partial_json() {
        let patch: ConfigPatch = serde_json::from_str(r#"{"width": 2.3, "color": "sienna"}"#).unwrap();
        assert_eq!(patch.width, Some(2.3));
        assert_eq!(patch.color.map(|c| c.to_hex()), Some("#A0522D".to_string()));
        assert!(patch.height.is_none());
    }
}
