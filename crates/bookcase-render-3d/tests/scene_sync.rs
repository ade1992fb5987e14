//! Rebuild cycles against a headless backend.

use bookcase_core::{Cell, ConfigPatch, Configuration, Drawer, DrawerKind, RenderError};
use bookcase_render_3d::{
    BoundingBox, MemoryBackend, PrimitiveRole, SceneGraph, SceneOptions, SceneSynchronizer,
};
use glam::Vec3;
use proptest::prelude::*;

fn names(scene: &SceneGraph) -> Vec<String> {
    let mut names: Vec<String> = scene.solids().iter().map(|s| s.name().to_string()).collect();
    names.sort();
    names
}

#[test]
fn drawer_click_scenario() {
    let mut sync = SceneSynchronizer::new(MemoryBackend::new());
    let mut scene = SceneGraph::new();

    let config = Configuration::default();
    let first = sync.sync(&mut scene, &config).unwrap();
    assert_eq!(first.solids, 11);
    assert_eq!(first.hit_regions, 15);

    // First click adds a solid drawer: body and handle.
    let config = config.cycle_drawer(Cell::new(0, 1));
    let second = sync.sync(&mut scene, &config).unwrap();
    assert_eq!(second.solids, 13);

    // Second click turns it into glass: four more parts.
    let config = config.cycle_drawer(Cell::new(0, 1));
    let third = sync.sync(&mut scene, &config).unwrap();
    assert_eq!(third.solids, 17);

    // Third click removes it.
    let config = config.cycle_drawer(Cell::new(0, 1));
    let fourth = sync.sync(&mut scene, &config).unwrap();
    assert_eq!(fourth.solids, 11);
    assert_eq!(config, Configuration::default());

    assert_eq!(sync.backend().live_count(), 11);
    assert_eq!(sync.backend().stale_releases(), 0);
}

#[test]
fn same_configuration_twice_is_idempotent() {
    let mut sync = SceneSynchronizer::new(MemoryBackend::new());
    let mut scene = SceneGraph::new();
    let config = Configuration::default()
        .with_drawer(Drawer::new(1, 0, DrawerKind::Glass))
        .with_drawer(Drawer::new(3, 2, DrawerKind::Solid));

    sync.sync(&mut scene, &config).unwrap();
    let before = names(&scene);
    let live = sync.backend().live_count();

    sync.sync(&mut scene, &config).unwrap();
    assert_eq!(names(&scene), before);
    assert_eq!(sync.backend().live_count(), live);
}

fn hit_bounds(scene: &SceneGraph) -> Vec<(Cell, BoundingBox)> {
    scene.hit_regions().iter().map(|r| (r.cell, r.bounds)).collect()
}

#[test]
fn dimension_change_round_trip_matches_fresh_build() {
    let mut sync = SceneSynchronizer::new(MemoryBackend::new());
    let mut scene = SceneGraph::new();
    let base = Configuration::default().with_drawer(Drawer::new(1, 2, DrawerKind::Glass));

    sync.sync(&mut scene, &base).unwrap();
    let live = sync.backend().live_count();

    for shelves in [0, 7, 12, 1] {
        let patch = ConfigPatch {
            shelves: Some(shelves),
            ..Default::default()
        };
        sync.sync(&mut scene, &base.with_patch(&patch)).unwrap();
    }
    sync.sync(&mut scene, &base).unwrap();

    assert_eq!(sync.backend().live_count(), live);
    assert_eq!(sync.backend().acquired() - sync.backend().released(), live as u64);

    let mut fresh_sync = SceneSynchronizer::new(MemoryBackend::new());
    let mut fresh = SceneGraph::new();
    fresh_sync.sync(&mut fresh, &base).unwrap();

    assert_eq!(names(&scene), names(&fresh));
    assert_eq!(hit_bounds(&scene), hit_bounds(&fresh));
    assert_eq!(scene.model_bounds(), fresh.model_bounds());
    for node in fresh.solids() {
        let rebuilt = scene.find_solid(node.name()).unwrap();
        assert_eq!(rebuilt.primitive().shape, node.primitive().shape);
    }
}

#[test]
fn tall_case_keeps_every_shelf_and_drawer() {
    let mut sync = SceneSynchronizer::new(MemoryBackend::new());
    let mut scene = SceneGraph::new();
    let config = Configuration {
        height: 10.0,
        thickness: 0.01,
        shelves: 100,
        divisions: 2,
        ..Default::default()
    }
    .with_drawer(Drawer::new(90, 1, DrawerKind::Solid));

    let report = sync.sync(&mut scene, &config).unwrap();

    assert_eq!(report.hit_regions, 101 * 3);
    assert!(report.skipped_drawers.is_empty());
    assert_eq!(report.solids, 5 + 100 + 2 + 2);
    assert!(scene.find_solid("drawer-90-1-body").is_some());
    assert!(config.validate().is_empty());
}

#[test]
fn dangling_drawer_is_ignored_but_kept() {
    let mut sync = SceneSynchronizer::new(MemoryBackend::new());
    let mut scene = SceneGraph::new();
    let config = Configuration::default().with_drawer(Drawer::new(4, 2, DrawerKind::Solid));
    sync.sync(&mut scene, &config).unwrap();
    assert_eq!(scene.solids().len(), 13);

    // Fewer shelves leave the drawer outside the grid.
    let shrunk = config.with_patch(&ConfigPatch {
        shelves: Some(2),
        ..Default::default()
    });
    let report = sync.sync(&mut scene, &shrunk).unwrap();

    assert_eq!(report.skipped_drawers, vec![Drawer::new(4, 2, DrawerKind::Solid)]);
    assert_eq!(report.solids, 5 + 2 + 2);
    assert_eq!(shrunk.drawers.len(), 1);
    assert!(!shrunk.validate().is_empty());
}

#[test]
fn hit_regions_follow_root_offset() {
    let mut sync = SceneSynchronizer::new(MemoryBackend::new());
    let mut scene = SceneGraph::new();
    sync.sync(&mut scene, &Configuration::default()).unwrap();

    let moved = Vec3::new(-0.75, 0.0, 1.5);
    scene.set_root_position(moved);
    sync.sync(&mut scene, &Configuration::default().cycle_drawer(Cell::new(2, 2)))
        .unwrap();

    assert_eq!(scene.root_position(), moved);
    assert_eq!(scene.root_transform(), glam::Mat4::from_translation(moved));
    assert_eq!(scene.world_bounds().unwrap().min.x, -1.25 - 0.75);
}

#[test]
fn capacity_failure_keeps_previous_scene_and_poisons() {
    let mut sync = SceneSynchronizer::new(MemoryBackend::with_capacity(20));
    let mut scene = SceneGraph::new();

    sync.sync(&mut scene, &Configuration::default()).unwrap();
    let before = names(&scene);
    let generation = scene.generation();

    // 11 live + 17 new exceeds the budget of 20.
    let glass = Configuration::default().with_drawer(Drawer::new(0, 0, DrawerKind::Glass));
    let err = sync.sync(&mut scene, &glass).unwrap_err();

    assert!(matches!(err, RenderError::ResourceInit { .. }));
    assert!(sync.is_poisoned());
    assert_eq!(names(&scene), before);
    assert_eq!(scene.generation(), generation);
    assert_eq!(sync.backend().live_count(), 11);

    // No further work until the host restarts the synchronizer.
    sync.backend_mut().set_capacity(None);
    let err = sync.sync(&mut scene, &Configuration::default()).unwrap_err();
    assert!(matches!(err, RenderError::Poisoned { .. }));
    assert_eq!(sync.backend().live_count(), 11);
}

#[test]
fn back_plane_sets_first_placement() {
    let options = SceneOptions {
        back_plane_z: -3.0,
        ..Default::default()
    };
    let mut sync = SceneSynchronizer::with_options(MemoryBackend::new(), options);
    let mut scene = SceneGraph::new();
    sync.sync(&mut scene, &Configuration::default()).unwrap();

    let back = scene.find_solid("panel-back").unwrap();
    let world_min_z = back.primitive().shape.bounding_box().min.z + scene.root_position().z;
    assert!((world_min_z + 3.0).abs() < 1e-5);
    assert_eq!(back.primitive().role, PrimitiveRole::Back);
}

proptest! {
    #[test]
    fn solid_count_matches_structure(
        shelves in 0u32..10,
        divisions in 0u32..10,
        cells in proptest::collection::vec((0u32..12, 0u32..12, any::<bool>()), 0..8),
    ) {
        let mut config = Configuration { shelves, divisions, ..Default::default() };
        for (row, column, glass) in cells {
            let kind = if glass { DrawerKind::Glass } else { DrawerKind::Solid };
            config = config.with_drawer(Drawer::new(row, column, kind));
        }

        let mut sync = SceneSynchronizer::new(MemoryBackend::new());
        let mut scene = SceneGraph::new();
        let report = sync.sync(&mut scene, &config).unwrap();

        let drawer_parts: usize = config
            .drawers
            .iter()
            .filter(|d| config.contains_cell(d.cell()))
            .map(|d| match d.kind { DrawerKind::Solid => 2, DrawerKind::Glass => 6 })
            .sum();
        let skipped = config.drawers.iter().filter(|d| !config.contains_cell(d.cell())).count();

        prop_assert_eq!(report.solids, 5 + shelves as usize + divisions as usize + drawer_parts);
        prop_assert_eq!(report.hit_regions, (shelves as usize + 1) * (divisions as usize + 1));
        prop_assert_eq!(report.skipped_drawers.len(), skipped);
        prop_assert_eq!(sync.backend().live_count(), report.solids);
    }
}
