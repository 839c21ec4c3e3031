//! Demo-mode player
//!
//! Picks the next command from the visible world: fill up on logs, then haul
//! them to the nearest house that still needs some.

use glam::Vec2;

use super::session::Session;
use super::state::{Command, GamePhase};
use crate::platform::{EntityKind, Scene, Storage};

fn nearest(from: Vec2, points: impl Iterator<Item = Vec2>) -> Option<Vec2> {
    points.min_by(|a, b| {
        from.distance_squared(*a)
            .partial_cmp(&from.distance_squared(*b))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

impl<S: Storage + Clone, V: Scene> Session<S, V> {
    /// Next command for an unattended player, `None` while idle
    pub fn autopilot_command(&self) -> Option<Command> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let player = self.world.player?;
        let pos = self.scene.position(player)?;
        let houses = &self.progress.get(self.state.current_level)?.houses;
        let carrying = self.state.carrying;

        if carrying > 0 {
            let at_open_house = self
                .overlapping(EntityKind::House)
                .and_then(|id| self.world.houses.iter().position(|h| *h == id))
                .and_then(|index| houses.get(index))
                .is_some_and(|h| !h.is_full());
            if at_open_house {
                return Some(Command::Deliver);
            }
        }

        let still_needed: u32 = houses.iter().map(|h| h.remaining()).sum();
        let logs_left = self.world.active_logs() > 0;
        let want_deliver = carrying > 0
            && (carrying >= self.state.carry_limit || carrying >= still_needed || !logs_left);

        if want_deliver {
            let open = houses.iter().filter(|h| !h.is_full()).map(|h| h.pos());
            return nearest(pos, open).map(Command::MoveTo);
        }
        if self.overlapping(EntityKind::Log).is_some() {
            return Some(Command::Collect);
        }
        nearest(pos, self.collectibles().map(|c| c.pos)).map(Command::MoveTo)
    }
}
