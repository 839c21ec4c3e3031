//! Per-frame update and command dispatch
//!
//! Commands and ticks run one after another on the same thread, so a top-up
//! spawn can never interleave with a collect or delivery.

use glam::Vec2;

use super::catalog;
use super::session::Session;
use super::state::{CollectOutcome, Command, CommandOutcome, DeliverOutcome, GamePhase};
use crate::error::Result;
use crate::platform::{EntityId, EntityKind, Scene, Storage};

/// -1, 0 or 1 (unlike `f32::signum`, zero stays zero)
fn axis(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl<S: Storage + Clone, V: Scene> Session<S, V> {
    /// Apply one input command
    ///
    /// # Errors
    ///
    /// Propagates storage failures from a delivery.
    pub fn dispatch(&mut self, command: Command) -> Result<CommandOutcome> {
        let movement_only = match self.phase {
            GamePhase::Playing => false,
            // Walking around stays possible after the last delivery
            GamePhase::LevelComplete => true,
            _ => return Ok(CommandOutcome::Ignored),
        };

        match command {
            Command::MoveTo(target) => Ok(self.set_move_target(target)),
            Command::MoveDirection(direction) => {
                self.world.direction = direction;
                if direction != Vec2::ZERO {
                    // Manual input always wins over an automated move
                    self.world.move_target = None;
                }
                Ok(CommandOutcome::Moving)
            }
            _ if movement_only => Ok(CommandOutcome::Ignored),
            Command::Collect => Ok(self.collect_in_reach()),
            Command::Deliver => self.deliver_in_reach(),
            Command::Interact => {
                if self.state.carrying > 0 && self.overlapping(EntityKind::House).is_some() {
                    self.deliver_in_reach()
                } else {
                    Ok(self.collect_in_reach())
                }
            }
        }
    }

    /// Advance movement and the log top-up timer by `dt_ms`
    pub fn tick(&mut self, dt_ms: f32) {
        match self.phase {
            GamePhase::Playing | GamePhase::LevelComplete => {}
            _ => return,
        }
        self.steer();

        if self.phase != GamePhase::Playing || self.settings.respawn_interval_ms == 0 {
            return;
        }
        let interval = self.settings.respawn_interval_ms as f32;
        // One frame can fill at most a whole map's worth of logs
        let log_cap = catalog::get(self.state.current_level).map_or(1, |s| s.log_cap.max(1));
        let max_step = interval * log_cap as f32;
        let dt_ms = if dt_ms.is_nan() {
            0.0
        } else {
            dt_ms.clamp(0.0, max_step)
        };
        self.world.respawn_elapsed_ms += dt_ms;
        while self.world.respawn_elapsed_ms >= interval {
            self.world.respawn_elapsed_ms -= interval;
            if let Some(id) = self.spawn_collectible() {
                log::debug!("Respawned log {:?}", id);
            }
        }
    }

    fn set_move_target(&mut self, target: Vec2) -> CommandOutcome {
        let Some(progress) = self.progress.get(self.state.current_level) else {
            return CommandOutcome::Ignored;
        };
        let bounds = Vec2::new(progress.map_width as f32, progress.map_height as f32);
        if target.cmplt(Vec2::ZERO).any() || target.cmpgt(bounds).any() {
            log::debug!("Move target {target} outside the map");
            return CommandOutcome::Ignored;
        }
        self.world.move_target = Some(target);
        CommandOutcome::Moving
    }

    /// Turn held direction or the pending target into a player velocity
    fn steer(&mut self) {
        let Some(player) = self.world.player else {
            return;
        };
        let speed = self.settings.move_speed;
        let direction = self.world.direction;

        if direction != Vec2::ZERO {
            self.world.move_target = None;
            let velocity = Vec2::new(axis(direction.x), axis(direction.y)) * speed;
            self.scene.set_velocity(player, velocity);
            return;
        }

        let Some(target) = self.world.move_target else {
            self.scene.set_velocity(player, Vec2::ZERO);
            return;
        };
        match self.scene.position(player) {
            Some(pos) if pos.distance(target) > self.settings.arrival_radius => {
                self.scene.move_toward(player, target, speed);
            }
            _ => {
                self.world.move_target = None;
                self.scene.set_velocity(player, Vec2::ZERO);
            }
        }
    }

    pub(crate) fn overlapping(&self, group: EntityKind) -> Option<EntityId> {
        let player = self.world.player?;
        self.scene.query_overlap(player, group)
    }

    fn collect_in_reach(&mut self) -> CommandOutcome {
        match self.overlapping(EntityKind::Log) {
            Some(id) => {
                let outcome = self.collect(id);
                if outcome == CollectOutcome::Collected {
                    log::debug!("Collected log, carrying {}", self.state.carrying);
                }
                CommandOutcome::Collect(outcome)
            }
            None => CommandOutcome::NothingInReach,
        }
    }

    fn deliver_in_reach(&mut self) -> Result<CommandOutcome> {
        let house = self
            .overlapping(EntityKind::House)
            .and_then(|id| self.world.houses.iter().position(|h| *h == id));
        let Some(index) = house else {
            return Ok(CommandOutcome::NothingInReach);
        };
        let outcome = self.deliver(index)?;
        if let DeliverOutcome::Delivered { amount, .. } = outcome {
            log::debug!("Delivered {amount} log(s) to house {index}");
        }
        Ok(CommandOutcome::Deliver(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{HeadlessScene, MemoryStorage};
    use crate::settings::Settings;

    type TestSession = Session<MemoryStorage, HeadlessScene>;

    fn playing() -> TestSession {
        let settings = Settings {
            seed: Some(31337),
            ..Default::default()
        };
        let mut s = Session::new(MemoryStorage::new(), HeadlessScene::new(), settings).unwrap();
        s.start_game().unwrap();
        s
    }

    fn player_velocity(s: &TestSession) -> Vec2 {
        s.scene().velocity(s.player().unwrap()).unwrap()
    }

    #[test]
    fn test_axis() {
        assert_eq!(axis(0.0), 0.0);
        assert_eq!(axis(-3.0), -1.0);
        assert_eq!(axis(0.2), 1.0);
    }

    #[test]
    fn test_move_to_heads_for_target_and_stops() {
        let mut s = playing();
        let target = Vec2::new(600.0, 400.0);
        assert_eq!(s.dispatch(Command::MoveTo(target)).unwrap(), CommandOutcome::Moving);

        s.tick(16.0);
        let vel = player_velocity(&s);
        assert!((vel.x - 180.0).abs() < 0.01 && vel.y.abs() < 0.01);

        // Arrive within the arrival radius
        let player = s.player().unwrap();
        s.scene_mut().place(player, Vec2::new(595.0, 400.0));
        s.tick(16.0);
        assert_eq!(player_velocity(&s), Vec2::ZERO);
        assert!(s.world.move_target.is_none());
    }

    #[test]
    fn test_move_to_outside_map_is_ignored() {
        let mut s = playing();
        assert_eq!(
            s.dispatch(Command::MoveTo(Vec2::new(900.0, 10.0))).unwrap(),
            CommandOutcome::Ignored
        );
        assert!(s.world.move_target.is_none());
    }

    #[test]
    fn test_manual_input_cancels_move_to() {
        let mut s = playing();
        s.dispatch(Command::MoveTo(Vec2::new(100.0, 100.0))).unwrap();
        s.dispatch(Command::MoveDirection(Vec2::new(1.0, -1.0))).unwrap();
        s.tick(16.0);
        assert_eq!(player_velocity(&s), Vec2::new(180.0, -180.0));
        assert!(s.world.move_target.is_none());

        // Releasing the keys stops the player
        s.dispatch(Command::MoveDirection(Vec2::ZERO)).unwrap();
        s.tick(16.0);
        assert_eq!(player_velocity(&s), Vec2::ZERO);
    }

    #[test]
    fn test_manual_input_wins_same_tick() {
        let mut s = playing();
        s.dispatch(Command::MoveDirection(Vec2::new(-1.0, 0.0))).unwrap();
        s.dispatch(Command::MoveTo(Vec2::new(700.0, 400.0))).unwrap();
        s.tick(16.0);
        assert_eq!(player_velocity(&s), Vec2::new(-180.0, 0.0));
    }

    #[test]
    fn test_collect_and_deliver_by_overlap() {
        let mut s = playing();
        let player = s.player().unwrap();
        let house = s.houses()[0].pos();
        let far = if house.x < 400.0 {
            Vec2::new(790.0, 790.0)
        } else {
            Vec2::new(10.0, 10.0)
        };
        s.scene_mut().place(player, far);
        assert_eq!(
            s.dispatch(Command::Deliver).unwrap(),
            CommandOutcome::NothingInReach
        );

        let target = s.collectibles().next().cloned().unwrap();
        s.scene_mut().place(player, target.pos);
        assert_eq!(
            s.dispatch(Command::Interact).unwrap(),
            CommandOutcome::Collect(CollectOutcome::Collected)
        );

        s.scene_mut().place(player, house);
        assert_eq!(
            s.dispatch(Command::Interact).unwrap(),
            CommandOutcome::Deliver(DeliverOutcome::Delivered {
                amount: 1,
                level_complete: false
            })
        );
        assert_eq!(s.houses()[0].delivered, 1);
    }

    #[test]
    fn test_respawn_timer_tops_up() {
        let mut s = playing();
        let before = s.collectibles().count();
        s.tick(1999.0);
        assert_eq!(s.collectibles().count(), before);
        s.tick(1.0);
        assert!(s.collectibles().count() <= before + 1);
        assert!(s.world.respawn_elapsed_ms < 1.0);

        // Ten intervals in one long frame still respect the cap
        for _ in 0..20 {
            s.tick(20_000.0);
        }
        assert_eq!(s.collectibles().count(), 30);
    }

    #[test]
    fn test_oversized_frames_are_bounded() {
        let mut s = playing();
        s.tick(f32::INFINITY);
        assert_eq!(s.collectibles().count(), 30);
        assert!(s.world.respawn_elapsed_ms < 2000.0);

        s.tick(f32::NAN);
        s.tick(-500.0);
        assert!(s.world.respawn_elapsed_ms.is_finite());
        assert!(s.world.respawn_elapsed_ms >= 0.0);
    }

    #[test]
    fn test_paused_ignores_input_and_time() {
        let mut s = playing();
        s.pause().unwrap();
        let before = s.collectibles().count();
        assert_eq!(
            s.dispatch(Command::MoveTo(Vec2::new(10.0, 10.0))).unwrap(),
            CommandOutcome::Ignored
        );
        s.tick(10_000.0);
        assert_eq!(s.collectibles().count(), before);
    }
}
