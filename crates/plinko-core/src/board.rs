//! Board assembly: turns a [`BoardLayout`] into physics bodies.
//!
//! Rapier bodies carry no game meaning. Instead the board keeps a side table
//! from collider handle to [`BodyRole`], which the collision dispatcher
//! consults once per reported pair.

use std::collections::HashMap;

use rapier2d::prelude::*;

use crate::error::BoardError;
use crate::flash::FlashAnimator;
use crate::layout::{Block, BoardLayout, FunnelWall, PegId, RenderStyle};
use crate::physics::PhysicsWorld;

/// Surface friction of every board body and the disc.
const FRICTION: f32 = 0.1;

/// What a collider stands for on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRole {
    Peg(PegId),
    SlotSensor { index: usize },
    Structural,
    Disc,
}

impl BodyRole {
    pub fn peg(&self) -> Option<PegId> {
        match self {
            Self::Peg(id) => Some(*id),
            _ => None,
        }
    }

    pub fn slot(&self) -> Option<usize> {
        match self {
            Self::SlotSensor { index } => Some(*index),
            _ => None,
        }
    }
}

/// Whether a contact began or ended during the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Started,
    Ended,
}

/// A collision pair resolved to board roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleContact {
    pub phase: ContactPhase,
    pub a: BodyRole,
    pub b: BodyRole,
}

impl RoleContact {
    pub fn started(a: BodyRole, b: BodyRole) -> Self {
        Self {
            phase: ContactPhase::Started,
            a,
            b,
        }
    }

    pub fn ended(a: BodyRole, b: BodyRole) -> Self {
        Self {
            phase: ContactPhase::Ended,
            a,
            b,
        }
    }
}

/// World-space geometry of a drawable body.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderShape {
    Circle { center: [f32; 2], radius: f32 },
    Rect { center: [f32; 2], size: [f32; 2] },
    Polygon { points: Vec<[f32; 2]> },
}

/// One body as the renderer should draw it this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub role: BodyRole,
    pub shape: RenderShape,
    pub style: RenderStyle,
}

/// The assembled board: layout plus the handles of everything inserted.
#[derive(Debug, Clone)]
pub struct Board {
    layout: BoardLayout,
    roles: HashMap<ColliderHandle, BodyRole>,
    disc_body: RigidBodyHandle,
    disc_collider: ColliderHandle,
}

impl Board {
    /// Inserts every body of `layout` into `world`.
    pub fn assemble(layout: BoardLayout, world: &mut PhysicsWorld) -> Result<Self, BoardError> {
        let mut roles = HashMap::new();

        for peg in &layout.pegs {
            let handle = world.add_static_collider(
                ColliderBuilder::ball(peg.radius)
                    .translation(Vector::new(peg.center[0], peg.center[1]))
                    .friction(FRICTION)
                    .active_events(ActiveEvents::COLLISION_EVENTS)
                    .build(),
            );
            roles.insert(handle, BodyRole::Peg(peg.id));
        }

        let mut part_index = 0;
        for wall in [&layout.left_funnel, &layout.right_funnel] {
            for handle in insert_funnel(world, wall, &mut part_index)? {
                roles.insert(handle, BodyRole::Structural);
            }
        }

        let blocks = std::iter::once(&layout.backstop)
            .chain(&layout.end_caps)
            .chain(&layout.separators)
            .chain(&layout.walls);
        for block in blocks {
            roles.insert(insert_block(world, block), BodyRole::Structural);
        }

        for sensor in &layout.sensors {
            let handle = world.add_static_collider(
                ColliderBuilder::cuboid(sensor.size[0] / 2.0, sensor.size[1] / 2.0)
                    .translation(Vector::new(sensor.center[0], sensor.center[1]))
                    .sensor(true)
                    .active_events(ActiveEvents::COLLISION_EVENTS)
                    .build(),
            );
            roles.insert(
                handle,
                BodyRole::SlotSensor {
                    index: sensor.index,
                },
            );
        }

        let disc = &layout.disc;
        let disc_body = world.add_rigid_body(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(disc.center[0], disc.center[1]))
                .ccd_enabled(true)
                .build(),
        );
        let disc_collider = world.add_collider(
            ColliderBuilder::ball(disc.radius)
                .restitution(disc.restitution)
                .friction(FRICTION)
                .density(1.0)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build(),
            disc_body,
        );
        roles.insert(disc_collider, BodyRole::Disc);

        tracing::info!(
            slots = layout.config.slot_count,
            pegs = layout.pegs.len(),
            colliders = roles.len(),
            "board assembled"
        );

        Ok(Self {
            layout,
            roles,
            disc_body,
            disc_collider,
        })
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn slot_count(&self) -> usize {
        self.layout.config.slot_count
    }

    pub fn role_of(&self, collider: ColliderHandle) -> Option<BodyRole> {
        self.roles.get(&collider).copied()
    }

    /// Number of colliders with a known role.
    pub fn collider_count(&self) -> usize {
        self.roles.len()
    }

    pub fn disc_body(&self) -> RigidBodyHandle {
        self.disc_body
    }

    pub fn disc_collider(&self) -> ColliderHandle {
        self.disc_collider
    }

    /// Resolves an engine event to roles; pairs with unknown colliders are dropped.
    pub fn classify(&self, event: &CollisionEvent) -> Option<RoleContact> {
        let (h1, h2, phase) = match event {
            CollisionEvent::Started(h1, h2, _) => (*h1, *h2, ContactPhase::Started),
            CollisionEvent::Stopped(h1, h2, _) => (*h1, *h2, ContactPhase::Ended),
        };
        Some(RoleContact {
            phase,
            a: self.role_of(h1)?,
            b: self.role_of(h2)?,
        })
    }

    /// Current disc center.
    pub fn disc_position(&self, world: &PhysicsWorld) -> Option<[f32; 2]> {
        world.get_rigid_body(self.disc_body).map(|body| {
            let pos = body.translation();
            [pos.x, pos.y]
        })
    }

    /// Teleports the disc to `position` and stops it.
    pub fn place_disc(&self, world: &mut PhysicsWorld, position: [f32; 2]) {
        if let Some(body) = world.get_rigid_body_mut(self.disc_body) {
            body.set_translation(Vector::new(position[0], position[1]), true);
            body.set_linvel(Vector::new(0.0, 0.0), true);
            body.set_angvel(0.0, true);
        }
    }

    /// Every visible body with its current geometry and style.
    pub fn render_items(&self, world: &PhysicsWorld, animator: &FlashAnimator) -> Vec<RenderItem> {
        let layout = &self.layout;
        let mut items = Vec::with_capacity(layout.static_body_count() + 1);

        for peg in &layout.pegs {
            items.push(RenderItem {
                role: BodyRole::Peg(peg.id),
                shape: RenderShape::Circle {
                    center: peg.center,
                    radius: peg.radius,
                },
                style: RenderStyle::solid(animator.color_of(peg.id)),
            });
        }

        let funnel_style = RenderStyle::solid(crate::color::Color::BOARD);
        for wall in [&layout.left_funnel, &layout.right_funnel] {
            for points in wall.world_polygons() {
                items.push(RenderItem {
                    role: BodyRole::Structural,
                    shape: RenderShape::Polygon { points },
                    style: funnel_style,
                });
            }
        }

        let blocks = std::iter::once(&layout.backstop)
            .chain(&layout.end_caps)
            .chain(&layout.separators)
            .chain(&layout.walls);
        for block in blocks {
            items.push(RenderItem {
                role: BodyRole::Structural,
                shape: RenderShape::Rect {
                    center: block.center,
                    size: block.size,
                },
                style: block.style,
            });
        }

        for sensor in &layout.sensors {
            items.push(RenderItem {
                role: BodyRole::SlotSensor {
                    index: sensor.index,
                },
                shape: RenderShape::Rect {
                    center: sensor.center,
                    size: sensor.size,
                },
                style: sensor.style,
            });
        }

        if let Some(center) = self.disc_position(world) {
            items.push(RenderItem {
                role: BodyRole::Disc,
                shape: RenderShape::Circle {
                    center,
                    radius: layout.disc.radius,
                },
                style: layout.disc.style,
            });
        }

        items.retain(|item| item.style.is_visible());
        items
    }
}

fn insert_block(world: &mut PhysicsWorld, block: &Block) -> ColliderHandle {
    world.add_static_collider(
        ColliderBuilder::cuboid(block.size[0] / 2.0, block.size[1] / 2.0)
            .translation(Vector::new(block.center[0], block.center[1]))
            .friction(FRICTION)
            .build(),
    )
}

/// Inserts a funnel wall as one fixed body carrying a convex collider per part.
fn insert_funnel(
    world: &mut PhysicsWorld,
    wall: &FunnelWall,
    part_index: &mut usize,
) -> Result<Vec<ColliderHandle>, BoardError> {
    let body = world.add_rigid_body(
        RigidBodyBuilder::fixed()
            .translation(Vector::new(wall.center[0], wall.center[1]))
            .rotation(wall.rotation)
            .build(),
    );

    let mut handles = Vec::with_capacity(wall.parts.len());
    for part in &wall.parts {
        let points: Vec<Vector> = part
            .vertices
            .iter()
            .map(|v| Vector::new(v[0], v[1]))
            .collect();
        let collider = ColliderBuilder::convex_hull(&points)
            .ok_or(BoardError::DegenerateShape { part: *part_index })?
            .translation(Vector::new(part.offset[0], part.offset[1]))
            .friction(FRICTION)
            .build();
        handles.push(world.add_collider(collider, body));
        *part_index += 1;
    }
    Ok(handles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BoardConfig;

    fn assemble(slots: usize) -> (Board, PhysicsWorld) {
        let config = BoardConfig::new(1280.0, 800.0, slots).unwrap();
        let layout = BoardLayout::generate(&config).unwrap();
        let mut world = PhysicsWorld::new();
        let board = Board::assemble(layout, &mut world).unwrap();
        (board, world)
    }

    #[test]
    fn test_every_collider_has_a_role() {
        let (board, world) = assemble(6);
        let layout = board.layout();

        let expected = layout.pegs.len()
            + layout.left_funnel.parts.len()
            + layout.right_funnel.parts.len()
            + 1
            + layout.end_caps.len()
            + layout.separators.len()
            + layout.walls.len()
            + layout.sensors.len()
            + 1;
        assert_eq!(world.collider_set.len(), expected);
        assert_eq!(board.collider_count(), expected);

        for (handle, _) in world.collider_set.iter() {
            assert!(board.role_of(handle).is_some());
        }
    }

    #[test]
    fn test_sensor_roles_match_slots() {
        let (board, world) = assemble(4);

        let mut slots: Vec<usize> = world
            .collider_set
            .iter()
            .filter(|(_, collider)| collider.is_sensor())
            .filter_map(|(handle, _)| board.role_of(handle)?.slot())
            .collect();
        slots.sort_unstable();
        assert_eq!(slots, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_classify_drops_unknown_colliders() {
        let (board, mut world) = assemble(3);
        let stray = world.add_static_collider(ColliderBuilder::ball(1.0).build());

        let event = CollisionEvent::Started(stray, board.disc_collider(), CollisionEventFlags::empty());
        assert_eq!(board.classify(&event), None);
    }

    #[test]
    fn test_place_disc() {
        let (board, mut world) = assemble(3);
        board.place_disc(&mut world, [300.0, 120.0]);
        assert_eq!(board.disc_position(&world), Some([300.0, 120.0]));
    }

    #[test]
    fn test_render_items_skip_hidden_bodies() {
        let (board, world) = assemble(5);
        let mut animator = FlashAnimator::default();
        animator.flash(PegId(0), std::time::Duration::ZERO);

        let items = board.render_items(&world, &animator);
        assert!(items.iter().all(|item| item.style.is_visible()));
        assert!(!items
            .iter()
            .any(|item| matches!(item.role, BodyRole::SlotSensor { .. })));
        assert_eq!(
            items.iter().filter(|item| item.role == BodyRole::Disc).count(),
            1
        );

        let flashed = items
            .iter()
            .find(|item| item.role == BodyRole::Peg(PegId(0)))
            .unwrap();
        assert_eq!(flashed.style.fill, crate::color::Color::HIGHLIGHT);
    }
}
