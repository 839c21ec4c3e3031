//! Headless scene: minimal kinematics and circle overlap, no drawing
//!
//! Used by tests and the native binary in place of a real renderer.

use std::collections::BTreeMap;

use glam::Vec2;

use super::{EntityId, EntityKind, Popup, Scene};
use crate::consts::{HOUSE_RADIUS, LOG_RADIUS, PLAYER_RADIUS};

#[derive(Debug, Clone)]
struct Body {
    kind: EntityKind,
    pos: Vec2,
    vel: Vec2,
}

fn radius_of(kind: EntityKind) -> f32 {
    match kind {
        EntityKind::Player => PLAYER_RADIUS,
        EntityKind::House => HOUSE_RADIUS,
        EntityKind::Log => LOG_RADIUS,
    }
}

#[derive(Debug, Default)]
pub struct HeadlessScene {
    bounds: Vec2,
    /// Ordered by id so overlap queries are deterministic
    bodies: BTreeMap<EntityId, Body>,
    popups: Vec<Popup>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate velocities over `dt` seconds, clamped to the world bounds
    pub fn step(&mut self, dt: f32) {
        let bounds = self.bounds;
        for body in self.bodies.values_mut() {
            if body.vel != Vec2::ZERO {
                body.pos = (body.pos + body.vel * dt).clamp(Vec2::ZERO, bounds);
            }
        }
    }

    pub fn velocity(&self, id: EntityId) -> Option<Vec2> {
        self.bodies.get(&id).map(|b| b.vel)
    }

    /// Teleport an entity (tests only need this to stage overlaps)
    pub fn place(&mut self, id: EntityId, pos: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.pos = pos;
        }
    }

    /// Number of drawn entities of a kind
    pub fn count(&self, kind: EntityKind) -> usize {
        self.bodies.values().filter(|b| b.kind == kind).count()
    }

    pub fn popups(&self) -> &[Popup] {
        &self.popups
    }
}

impl Scene for HeadlessScene {
    fn set_world_bounds(&mut self, width: f32, height: f32) {
        self.bounds = Vec2::new(width, height);
    }

    fn render(&mut self, id: EntityId, kind: EntityKind, pos: Vec2) {
        self.bodies.insert(
            id,
            Body {
                kind,
                pos,
                vel: Vec2::ZERO,
            },
        );
    }

    fn remove_render(&mut self, id: EntityId) {
        self.bodies.remove(&id);
    }

    fn position(&self, id: EntityId) -> Option<Vec2> {
        self.bodies.get(&id).map(|b| b.pos)
    }

    fn query_overlap(&self, entity: EntityId, group: EntityKind) -> Option<EntityId> {
        let body = self.bodies.get(&entity)?;
        let reach = radius_of(body.kind) + radius_of(group);
        self.bodies
            .iter()
            .filter(|(id, other)| **id != entity && other.kind == group)
            .find(|(_, other)| other.pos.distance(body.pos) <= reach)
            .map(|(id, _)| *id)
    }

    fn move_toward(&mut self, id: EntityId, target: Vec2, speed: f32) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.vel = (target - body.pos).normalize_or_zero() * speed;
        }
    }

    fn set_velocity(&mut self, id: EntityId, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.vel = velocity;
        }
    }

    fn show_popup(&mut self, popup: Popup) {
        log::info!("Popup: {:?}", popup);
        self.popups.push(popup);
    }
}
