//! Pointer state machine.
//!
//! Translates viewport pointer events into drawer edits and root
//! translations by casting rays into the [`SceneGraph`].

use bookcase_core::{Cell, Configuration};
use bookcase_render_3d::{pick_hit_region, pick_solid, Camera, Ray, SceneGraph, Viewport};
use glam::Vec3;
use tracing::{debug, trace};

/// Pointer input in viewport pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move { x: f32, y: f32 },
    Down { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    /// The pointer left the viewport.
    Leave,
}

/// Cursor feedback for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Affordance {
    #[default]
    Default,
    /// Over a compartment; a click edits its drawer.
    Clickable,
    /// Over the model outside any compartment; dragging moves it.
    Draggable,
}

/// An active drag of the whole model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Height of the horizontal drag plane.
    pub plane_y: f32,
    /// Grab point minus root position, on the drag plane.
    pub grab_offset: Vec3,
    /// Root position when the drag started.
    pub start: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Hovering(Cell),
    Dragging(DragSession),
}

/// What the host should do after an event.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionOutcome {
    pub affordance: Affordance,
    /// Whether camera orbit controls may react to the pointer.
    pub orbit_enabled: bool,
    /// Edited configuration to apply and rebuild.
    pub config: Option<Configuration>,
    /// New root position, already applied to the scene.
    pub root_position: Option<Vec3>,
    /// Highlighted compartment, already applied to the scene.
    pub highlight: Option<Cell>,
}

impl InteractionOutcome {
    fn idle(affordance: Affordance) -> Self {
        Self {
            affordance,
            orbit_enabled: true,
            config: None,
            root_position: None,
            highlight: None,
        }
    }
}

/// What lies under the pointer.
enum Target {
    Region(Cell),
    Solid(Vec3),
    Nothing,
}

/// Drives [`InteractionState`] from pointer events.
#[derive(Debug, Default)]
pub struct InteractionController {
    state: InteractionState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging(_))
    }

    /// Handle one pointer event.
    ///
    /// Highlight and root changes are written to `scene` directly; a drawer
    /// edit is returned in the outcome for the caller to apply and rebuild.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        scene: &mut SceneGraph,
        config: &Configuration,
        camera: &Camera,
        viewport: &Viewport,
    ) -> InteractionOutcome {
        let ray = |x: f32, y: f32| camera.ray_from_screen(viewport, x, y);

        let outcome = match (self.state, event) {
            (InteractionState::Dragging(session), PointerEvent::Move { x, y }) => {
                self.drag_to(session, ray(x, y), scene)
            }
            (InteractionState::Dragging(_), PointerEvent::Up { x, y }) => {
                debug!("drag released");
                self.state = InteractionState::Idle;
                self.hover(ray(x, y), scene)
            }
            (InteractionState::Dragging(_), PointerEvent::Leave) => {
                debug!("pointer left during drag, releasing");
                self.state = InteractionState::Idle;
                scene.set_highlight(None);
                InteractionOutcome::idle(Affordance::Default)
            }
            (InteractionState::Dragging(_), PointerEvent::Down { .. }) => InteractionOutcome {
                affordance: Affordance::Draggable,
                orbit_enabled: false,
                config: None,
                root_position: None,
                highlight: None,
            },
            (_, PointerEvent::Move { x, y }) | (_, PointerEvent::Up { x, y }) => {
                self.hover(ray(x, y), scene)
            }
            (_, PointerEvent::Down { x, y }) => self.press(ray(x, y), scene, config),
            (_, PointerEvent::Leave) => {
                self.state = InteractionState::Idle;
                scene.set_highlight(None);
                InteractionOutcome::idle(Affordance::Default)
            }
        };

        trace!(state = ?self.state, affordance = ?outcome.affordance, "pointer event handled");
        outcome
    }

    fn hover(&mut self, ray: Option<Ray>, scene: &mut SceneGraph) -> InteractionOutcome {
        match target(ray.as_ref(), scene) {
            Target::Region(cell) => {
                if self.state != InteractionState::Hovering(cell) {
                    debug!(%cell, "hovering compartment");
                }
                self.state = InteractionState::Hovering(cell);
                let highlight = scene.set_highlight(Some(cell)).map(|h| h.cell);
                InteractionOutcome {
                    highlight,
                    ..InteractionOutcome::idle(Affordance::Clickable)
                }
            }
            Target::Solid(_) => {
                self.state = InteractionState::Idle;
                scene.set_highlight(None);
                InteractionOutcome::idle(Affordance::Draggable)
            }
            Target::Nothing => {
                self.state = InteractionState::Idle;
                scene.set_highlight(None);
                InteractionOutcome::idle(Affordance::Default)
            }
        }
    }

    fn press(
        &mut self,
        ray: Option<Ray>,
        scene: &mut SceneGraph,
        config: &Configuration,
    ) -> InteractionOutcome {
        match (target(ray.as_ref(), scene), ray) {
            (Target::Region(cell), _) => {
                self.state = InteractionState::Hovering(cell);
                let highlight = scene.set_highlight(Some(cell)).map(|h| h.cell);
                InteractionOutcome {
                    config: Some(config.cycle_drawer(cell)),
                    highlight,
                    ..InteractionOutcome::idle(Affordance::Clickable)
                }
            }
            (Target::Solid(point), Some(ray)) => {
                let root = scene.root_position();
                let grab = ray
                    .intersect_horizontal_plane(root.y)
                    .unwrap_or(Vec3::new(point.x, root.y, point.z));
                let session = DragSession {
                    plane_y: root.y,
                    grab_offset: grab - root,
                    start: root,
                };
                debug!(start = ?root, "drag started");
                self.state = InteractionState::Dragging(session);
                scene.set_highlight(None);
                InteractionOutcome {
                    affordance: Affordance::Draggable,
                    orbit_enabled: false,
                    config: None,
                    root_position: None,
                    highlight: None,
                }
            }
            _ => {
                self.state = InteractionState::Idle;
                scene.set_highlight(None);
                InteractionOutcome::idle(Affordance::Default)
            }
        }
    }

    fn drag_to(
        &mut self,
        session: DragSession,
        ray: Option<Ray>,
        scene: &mut SceneGraph,
    ) -> InteractionOutcome {
        scene.set_highlight(None);
        let root_position = ray
            .and_then(|ray| ray.intersect_horizontal_plane(session.plane_y))
            .map(|point| {
                let current = scene.root_position();
                let moved = Vec3::new(
                    point.x - session.grab_offset.x,
                    current.y,
                    point.z - session.grab_offset.z,
                );
                scene.set_root_position(moved);
                moved
            });

        InteractionOutcome {
            affordance: Affordance::Draggable,
            orbit_enabled: false,
            config: None,
            root_position,
            highlight: None,
        }
    }
}

/// Hit-regions take precedence over solids.
fn target(ray: Option<&Ray>, scene: &SceneGraph) -> Target {
    let Some(ray) = ray else {
        return Target::Nothing;
    };
    if let Some(region) = pick_hit_region(scene, ray) {
        return Target::Region(region.cell);
    }
    match pick_solid(scene, ray) {
        Some(solid) => Target::Solid(solid.hit.point),
        None => Target::Nothing,
    }
}
