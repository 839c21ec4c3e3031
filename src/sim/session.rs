//! Session state machine
//!
//! ```text
//! NotStarted --start_game/select_level--> Playing <--pause/resume--> Paused
//! Playing --last delivery--> LevelComplete --replay--> Playing
//! LevelComplete --advance--> Playing (next level) | AllComplete
//! AllComplete --play_again--> Playing (level 1)
//! Playing/Paused/LevelComplete --exit_to_menu--> NotStarted
//! ```
//!
//! Every mutation of stats or level progress is written through to storage
//! before the transition returns.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::catalog;
use super::layout;
use super::state::{
    CollectOutcome, Collectible, DeliverOutcome, GamePhase, SessionState, World,
};
use crate::consts::FIRST_LEVEL;
use crate::error::{GameError, Result};
use crate::menu::{self, LevelSelectEntry, MenuScreen};
use crate::persistence::{self, HouseRecord, LevelProgress, LevelProgressStore, keys};
use crate::platform::{EntityId, EntityKind, MessageKind, Popup, Scene, Storage};
use crate::settings::Settings;
use crate::stats::{Stats, StatsTracker};

/// One player's game: owns the stores, the transient world and the scene
pub struct Session<S: Storage + Clone, V: Scene> {
    storage: S,
    pub(crate) scene: V,
    pub(crate) settings: Settings,
    pub(crate) progress: LevelProgressStore<S>,
    stats: StatsTracker<S>,
    pub(crate) state: SessionState,
    pub(crate) phase: GamePhase,
    pub(crate) world: World,
    rng: Pcg32,
}

impl<S: Storage + Clone, V: Scene> Session<S, V> {
    /// Load saved records and sit in the menu
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn new(storage: S, scene: V, settings: Settings) -> Result<Self> {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let progress = LevelProgressStore::load(storage.clone())?;
        let stats = StatsTracker::load(storage.clone())?;
        let current_level = persistence::load_current_level(&storage)?;
        log::info!("Session ready at level {current_level} (seed {seed})");

        Ok(Self {
            state: SessionState {
                active: false,
                current_level,
                carrying: 0,
                carry_limit: settings.carry_limit,
            },
            storage,
            scene,
            settings,
            progress,
            stats,
            phase: GamePhase::NotStarted,
            world: World::default(),
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn stats(&self) -> &Stats {
        self.stats.stats()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scene(&self) -> &V {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut V {
        &mut self.scene
    }

    /// House records of the current level (empty before first load)
    pub fn houses(&self) -> &[HouseRecord] {
        self.progress
            .get(self.state.current_level)
            .map(|p| p.houses.as_slice())
            .unwrap_or_default()
    }

    /// Entity handle of each house, in house order
    pub fn house_entities(&self) -> &[EntityId] {
        &self.world.houses
    }

    pub fn player(&self) -> Option<EntityId> {
        self.world.player
    }

    /// Logs currently lying on the map
    pub fn collectibles(&self) -> impl Iterator<Item = &Collectible> {
        self.world.logs.iter().filter(|l| !l.collected)
    }

    /// Saved progress for any catalog level, created on first access
    ///
    /// # Errors
    ///
    /// Returns `UnknownLevel` or a storage error.
    pub fn level_progress(&mut self, level: u32) -> Result<&LevelProgress> {
        self.progress.get_or_create(level, &mut self.rng)
    }

    pub fn is_level_complete(&self, level: u32) -> bool {
        self.progress.is_level_complete(level)
    }

    /// Which menu the UI should show
    pub fn menu_screen(&self) -> MenuScreen {
        menu::menu_screen(self.stats.stats(), self.state.active)
    }

    /// Level-select listing. Generates layouts for levels never visited.
    ///
    /// # Errors
    ///
    /// Returns an error if a new layout cannot be saved.
    pub fn level_select(&mut self) -> Result<Vec<LevelSelectEntry>> {
        for spec in catalog::all() {
            self.progress.get_or_create(spec.level_id, &mut self.rng)?;
        }
        Ok(menu::level_entries(self.stats.stats()))
    }

    fn require_phase(&self, action: &'static str, allowed: &[GamePhase]) -> Result<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(GameError::InvalidTransition {
                action,
                phase: self.phase,
            })
        }
    }

    // === Menu transitions ===

    /// Start playing the saved level from zero deliveries
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside the menu, or a storage error.
    pub fn start_game(&mut self) -> Result<()> {
        self.require_phase("start a game", &[GamePhase::NotStarted])?;
        self.stats.record_game_started()?;
        let level = self.state.current_level;
        self.fresh_level(level)?;
        log::info!(
            "Game {} started on level {}",
            self.stats.stats().games_played,
            level
        );
        Ok(())
    }

    /// Play a specific unlocked level from zero deliveries
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside the menu, `UnknownLevel` or
    /// `LevelLocked` for a bad choice, or a storage error.
    pub fn select_level(&mut self, level: u32) -> Result<()> {
        self.require_phase("select a level", &[GamePhase::NotStarted])?;
        catalog::get(level)?;
        if !menu::is_unlocked(level, self.stats.stats()) {
            self.scene.show_popup(Popup::Message {
                kind: MessageKind::Error,
                text: format!("Level {level} is locked. Complete the previous level first."),
            });
            return Err(GameError::LevelLocked(level));
        }
        self.state.current_level = level;
        persistence::save_current_level(&self.storage, level)?;
        self.stats.set_current_level(level)?;
        self.fresh_level(level)?;
        log::info!("Selected level {level}");
        Ok(())
    }

    /// Wipe stats, every level's progress and the level pointer
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` during play, or a storage error.
    pub fn reset_progress(&mut self) -> Result<()> {
        self.require_phase("reset progress", &[GamePhase::NotStarted])?;
        self.storage.remove(keys::CURRENT_LEVEL)?;
        self.stats.reset()?;
        self.progress.clear()?;
        self.state.current_level = FIRST_LEVEL;
        self.state.carrying = 0;
        log::info!("Progress reset");
        self.scene.show_popup(Popup::Message {
            kind: MessageKind::Success,
            text: format!("Progress reset! Starting from Level {FIRST_LEVEL}."),
        });
        Ok(())
    }

    // === In-game transitions ===

    /// # Errors
    ///
    /// Returns `InvalidTransition` unless playing.
    pub fn pause(&mut self) -> Result<()> {
        self.require_phase("pause", &[GamePhase::Playing])?;
        if let Some(player) = self.world.player {
            self.scene.set_velocity(player, Vec2::ZERO);
        }
        self.phase = GamePhase::Paused;
        log::debug!("Paused");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InvalidTransition` unless paused.
    pub fn resume(&mut self) -> Result<()> {
        self.require_phase("resume", &[GamePhase::Paused])?;
        self.phase = GamePhase::Playing;
        log::debug!("Resumed");
        Ok(())
    }

    /// Zero the level's deliveries and reload it mid-play
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless playing or paused, or a storage error.
    pub fn restart_level(&mut self) -> Result<()> {
        self.require_phase("restart the level", &[GamePhase::Playing, GamePhase::Paused])?;
        self.fresh_level(self.state.current_level)?;
        log::info!("Restarted level {}", self.state.current_level);
        Ok(())
    }

    /// Play the completed level again (same layout, zero deliveries)
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the level is complete, or a storage error.
    pub fn replay(&mut self) -> Result<()> {
        self.require_phase("replay", &[GamePhase::LevelComplete])?;
        self.fresh_level(self.state.current_level)?;
        log::info!("Replaying level {}", self.state.current_level);
        Ok(())
    }

    /// Move on to the next level, or to `AllComplete` after the last one
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the level is complete, or a storage error.
    pub fn advance(&mut self) -> Result<()> {
        self.require_phase("advance", &[GamePhase::LevelComplete])?;
        let next = self.state.current_level + 1;
        if !catalog::contains(next) {
            log::info!("Level {} was the last one", self.state.current_level);
            self.phase = GamePhase::AllComplete;
            self.scene.show_popup(Popup::AllComplete);
            return Ok(());
        }

        self.state.current_level = next;
        self.stats.reach_level(next)?;
        persistence::save_current_level(&self.storage, next)?;
        self.fresh_level(next)?;
        log::info!("Advanced to level {next}");
        Ok(())
    }

    /// Acknowledge finishing every level and start over at level 1
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless all levels are complete, or a storage error.
    pub fn play_again(&mut self) -> Result<()> {
        self.require_phase("play again", &[GamePhase::AllComplete])?;
        self.state.current_level = FIRST_LEVEL;
        persistence::save_current_level(&self.storage, FIRST_LEVEL)?;
        self.stats.set_current_level(FIRST_LEVEL)?;
        self.fresh_level(FIRST_LEVEL)?;
        log::info!("Starting over at level {FIRST_LEVEL}");
        Ok(())
    }

    /// Leave play for the menu. Carried logs are discarded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` from the menu, or a storage error.
    pub fn exit_to_menu(&mut self) -> Result<()> {
        self.require_phase(
            "exit to menu",
            &[GamePhase::Playing, GamePhase::Paused, GamePhase::LevelComplete],
        )?;
        // Deliveries are already saved; this is a checkpoint
        self.progress.save()?;
        if self.state.carrying > 0 {
            log::debug!("Dropping {} carried log(s)", self.state.carrying);
        }
        self.state.carrying = 0;
        self.state.active = false;
        self.clear_world();
        self.phase = GamePhase::NotStarted;
        log::info!("Exited to menu");
        Ok(())
    }

    // === Gameplay ===

    /// Pick up a log by handle. Silent no-op when carry is full, the log is
    /// gone, or nothing is being played.
    pub fn collect(&mut self, item: EntityId) -> CollectOutcome {
        if self.phase != GamePhase::Playing {
            return CollectOutcome::Ignored;
        }
        self.check_carry();
        if self.state.carrying >= self.state.carry_limit {
            log::debug!("Carry full ({})", self.state.carry_limit);
            return CollectOutcome::CarryFull;
        }
        let Some(entry) = self.world.logs.iter_mut().find(|l| l.id == item) else {
            return CollectOutcome::UnknownItem;
        };
        if entry.collected {
            return CollectOutcome::AlreadyCollected;
        }

        entry.collected = true;
        self.scene.remove_render(item);
        self.state.carrying += 1;
        CollectOutcome::Collected
    }

    /// Unload as many carried logs as the house still needs
    ///
    /// # Errors
    ///
    /// Returns `UnknownHouse` for a bad index, or a storage error.
    pub fn deliver(&mut self, house: usize) -> Result<DeliverOutcome> {
        if self.phase != GamePhase::Playing {
            return Ok(DeliverOutcome::Ignored);
        }
        let level = self.state.current_level;
        let record = self
            .progress
            .get(level)
            .and_then(|p| p.houses.get(house))
            .ok_or(GameError::UnknownHouse { level, index: house })?;

        if self.state.carrying == 0 {
            return Ok(DeliverOutcome::NothingCarried);
        }
        if record.is_full() {
            return Ok(DeliverOutcome::HouseFull);
        }

        let amount = self.state.carrying.min(record.remaining());
        let applied = self.progress.record_delivery(level, house, amount)?;
        self.state.carrying -= applied;
        self.stats.record_delivery(applied)?;

        let level_complete = self.progress.is_level_complete(level);
        if level_complete {
            self.phase = GamePhase::LevelComplete;
            log::info!("Level {level} complete");
            self.scene.show_popup(Popup::LevelComplete { level });
        }
        Ok(DeliverOutcome::Delivered {
            amount: applied,
            level_complete,
        })
    }

    /// Try to drop one more log on the map. `None` when the map is at its
    /// log cap, no level is loaded, or no clear spot was found.
    pub fn spawn_collectible(&mut self) -> Option<EntityId> {
        self.world.player?;
        let spec = catalog::get(self.state.current_level).ok()?;
        if self.world.active_logs() >= spec.log_cap as usize {
            return None;
        }
        let houses = &self.progress.get(spec.level_id)?.houses;
        let pos = layout::place_collectible(spec, houses, &mut self.rng)?;

        let id = self.world.next_entity_id();
        self.scene.render(id, EntityKind::Log, pos);
        self.world.logs.push(Collectible {
            id,
            pos,
            collected: false,
        });
        Some(id)
    }

    // === Internals ===

    /// Zero a level's deliveries and make it the playing level
    fn fresh_level(&mut self, level: u32) -> Result<()> {
        self.progress.get_or_create(level, &mut self.rng)?;
        self.progress.reset_deliveries(level)?;
        self.state.carrying = 0;
        self.state.active = true;
        self.load_world()?;
        self.phase = GamePhase::Playing;
        Ok(())
    }

    /// Render the current level: houses, player at the centre, initial logs
    fn load_world(&mut self) -> Result<()> {
        self.clear_world();
        let level = self.state.current_level;
        let spec = catalog::get(level)?;
        let progress = self.progress.get_or_create(level, &mut self.rng)?;
        let (width, height) = (progress.map_width as f32, progress.map_height as f32);
        let house_positions: Vec<Vec2> = progress.houses.iter().map(HouseRecord::pos).collect();

        self.scene.set_world_bounds(width, height);
        for pos in house_positions {
            let id = self.world.next_entity_id();
            self.scene.render(id, EntityKind::House, pos);
            self.world.houses.push(id);
        }

        let player = self.world.next_entity_id();
        self.scene
            .render(player, EntityKind::Player, Vec2::new(width / 2.0, height / 2.0));
        self.world.player = Some(player);

        let attempts = self.settings.initial_logs(spec.log_cap);
        let spawned = (0..attempts)
            .filter_map(|_| self.spawn_collectible())
            .count();
        log::info!(
            "Loaded level {} ({}x{}, {} houses, {} logs)",
            level,
            width,
            height,
            self.world.houses.len(),
            spawned
        );
        Ok(())
    }

    fn clear_world(&mut self) {
        for id in self.world.rendered() {
            self.scene.remove_render(id);
        }
        self.world.clear();
    }

    /// Clamp `carrying` back into range if something pushed it past the limit
    fn check_carry(&mut self) {
        if self.state.carrying > self.state.carry_limit {
            let err = GameError::InvariantViolation(format!(
                "carrying {} over limit {}",
                self.state.carrying, self.state.carry_limit
            ));
            log::warn!("{err}; clamping");
            self.state.carrying = self.state.carry_limit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{HeadlessScene, MemoryStorage};
    use proptest::prelude::*;

    type TestSession = Session<MemoryStorage, HeadlessScene>;

    fn settings() -> Settings {
        Settings {
            seed: Some(777),
            ..Default::default()
        }
    }

    fn session() -> TestSession {
        Session::new(MemoryStorage::new(), HeadlessScene::new(), settings()).unwrap()
    }

    /// Collect logs until carrying `target` (spawning more when needed)
    fn carry(session: &mut TestSession, target: u32) {
        while session.state().carrying < target {
            let next = session.collectibles().next().map(|c| c.id);
            match next {
                Some(id) => assert_eq!(session.collect(id), CollectOutcome::Collected),
                None => {
                    session.spawn_collectible();
                }
            }
        }
    }

    #[test]
    fn test_start_game_from_menu_only() {
        let mut s = session();
        assert_eq!(s.phase(), GamePhase::NotStarted);
        assert_eq!(s.menu_screen(), MenuScreen::FirstTime);

        s.start_game().unwrap();
        assert_eq!(s.phase(), GamePhase::Playing);
        assert!(s.state().active);
        assert_eq!(s.stats().games_played, 1);
        assert_eq!(s.menu_screen(), MenuScreen::Hidden);
        assert!(matches!(
            s.start_game(),
            Err(GameError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_level_load_renders_entities() {
        let mut s = session();
        s.start_game().unwrap();
        assert_eq!(s.scene().count(EntityKind::Player), 1);
        assert_eq!(s.scene().count(EntityKind::House), 1);
        let logs = s.scene().count(EntityKind::Log);
        assert!(logs > 0 && logs <= 15);
        assert_eq!(logs, s.collectibles().count());

        let player = s.player().unwrap();
        assert_eq!(s.scene().position(player), Some(Vec2::new(400.0, 400.0)));
    }

    #[test]
    fn test_collect_stops_at_carry_limit() {
        let mut s = session();
        s.start_game().unwrap();
        carry(&mut s, 5);

        let next = s.collectibles().next().map(|c| c.id);
        let id = match next {
            Some(id) => id,
            None => s.spawn_collectible().unwrap(),
        };
        assert_eq!(s.collect(id), CollectOutcome::CarryFull);
        assert_eq!(s.state().carrying, 5);
    }

    #[test]
    fn test_collect_same_log_twice() {
        let mut s = session();
        s.start_game().unwrap();
        let id = s.collectibles().next().unwrap().id;
        assert_eq!(s.collect(id), CollectOutcome::Collected);
        assert_eq!(s.collect(id), CollectOutcome::AlreadyCollected);
        assert_eq!(s.collect(EntityId(9999)), CollectOutcome::UnknownItem);
        assert_eq!(s.state().carrying, 1);
        assert!(s.scene().position(id).is_none());
    }

    #[test]
    fn test_partial_delivery() {
        let mut s = session();
        s.start_game().unwrap();
        carry(&mut s, 5);
        s.deliver(0).unwrap();
        carry(&mut s, 1);
        s.deliver(0).unwrap();
        assert_eq!(s.houses()[0].delivered, 6);

        carry(&mut s, 3);
        assert_eq!(
            s.deliver(0).unwrap(),
            DeliverOutcome::Delivered {
                amount: 2,
                level_complete: true
            }
        );
        assert_eq!(s.houses()[0].delivered, 8);
        assert_eq!(s.state().carrying, 1);
        assert_eq!(s.phase(), GamePhase::LevelComplete);
        assert_eq!(s.stats().total_logs_delivered, 8);
        assert_eq!(
            s.scene().popups().last(),
            Some(&Popup::LevelComplete { level: 1 })
        );

        // Further gameplay is frozen
        assert_eq!(s.deliver(0).unwrap(), DeliverOutcome::Ignored);
        assert_eq!(s.collect(EntityId(1)), CollectOutcome::Ignored);
    }

    #[test]
    fn test_deliver_noops() {
        let mut s = session();
        s.start_game().unwrap();
        assert_eq!(s.deliver(0).unwrap(), DeliverOutcome::NothingCarried);
        assert!(matches!(
            s.deliver(4),
            Err(GameError::UnknownHouse { level: 1, index: 4 })
        ));
    }

    #[test]
    fn test_pause_blocks_gameplay() {
        let mut s = session();
        s.start_game().unwrap();
        s.pause().unwrap();
        let id = s.collectibles().next().unwrap().id;
        assert_eq!(s.collect(id), CollectOutcome::Ignored);
        assert!(s.pause().is_err());
        s.resume().unwrap();
        assert_eq!(s.collect(id), CollectOutcome::Collected);
    }

    #[test]
    fn test_replay_keeps_layout_and_zeroes_progress() {
        let mut s = session();
        s.start_game().unwrap();
        let layout = s.houses()[0].pos();
        carry(&mut s, 5);
        s.deliver(0).unwrap();
        carry(&mut s, 3);
        s.deliver(0).unwrap();
        assert_eq!(s.phase(), GamePhase::LevelComplete);

        s.replay().unwrap();
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.houses()[0].delivered, 0);
        assert_eq!(s.houses()[0].pos(), layout);
        assert_eq!(s.state().carrying, 0);
        // Old entities were removed before the reload
        assert_eq!(s.scene().count(EntityKind::Player), 1);
        assert_eq!(s.scene().count(EntityKind::House), 1);
    }

    #[test]
    fn test_advance_updates_pointer_and_stats() {
        let storage = MemoryStorage::new();
        let mut s = Session::new(storage.clone(), HeadlessScene::new(), settings()).unwrap();
        s.start_game().unwrap();
        carry(&mut s, 5);
        s.deliver(0).unwrap();
        carry(&mut s, 3);
        s.deliver(0).unwrap();

        s.advance().unwrap();
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.state().current_level, 2);
        assert_eq!(s.stats().highest_level, 2);
        assert_eq!(s.stats().current_level, 2);
        assert_eq!(s.houses().len(), 2);
        assert_eq!(persistence::load_current_level(&storage).unwrap(), 2);
    }

    #[test]
    fn test_exit_discards_carry_and_keeps_deliveries() {
        let storage = MemoryStorage::new();
        let mut s = Session::new(storage.clone(), HeadlessScene::new(), settings()).unwrap();
        s.start_game().unwrap();
        carry(&mut s, 5);
        s.deliver(0).unwrap();
        carry(&mut s, 2);

        s.exit_to_menu().unwrap();
        assert_eq!(s.phase(), GamePhase::NotStarted);
        assert!(!s.state().active);
        assert_eq!(s.state().carrying, 0);
        assert_eq!(s.scene().count(EntityKind::Log), 0);
        assert_eq!(s.menu_screen(), MenuScreen::Main);

        let reloaded = LevelProgressStore::load(storage).unwrap();
        assert_eq!(reloaded.get(1).unwrap().houses[0].delivered, 5);
        assert!(s.exit_to_menu().is_err());
    }

    #[test]
    fn test_select_level_rules() {
        let mut s = session();
        assert!(matches!(s.select_level(3), Err(GameError::LevelLocked(3))));
        assert!(matches!(
            s.scene().popups().last(),
            Some(Popup::Message {
                kind: MessageKind::Error,
                ..
            })
        ));
        assert!(matches!(s.select_level(0), Err(GameError::UnknownLevel(0))));

        s.select_level(2).unwrap();
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.state().current_level, 2);
        assert_eq!(s.stats().current_level, 2);
        // Selecting does not count as a new game
        assert_eq!(s.stats().games_played, 0);
        assert!(s.select_level(1).is_err());
    }

    #[test]
    fn test_select_level_zeroes_saved_deliveries() {
        let mut s = session();
        s.start_game().unwrap();
        carry(&mut s, 5);
        s.deliver(0).unwrap();
        carry(&mut s, 2);
        s.exit_to_menu().unwrap();
        assert_eq!(s.houses()[0].delivered, 5);

        s.select_level(1).unwrap();
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.houses()[0].delivered, 0);
        assert_eq!(s.state().carrying, 0);
        assert!(!s.is_level_complete(1));
    }

    #[test]
    fn test_restart_level_mid_play() {
        let mut s = session();
        s.start_game().unwrap();
        carry(&mut s, 4);
        s.deliver(0).unwrap();
        s.pause().unwrap();
        s.restart_level().unwrap();
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.houses()[0].delivered, 0);
    }

    #[test]
    fn test_reset_only_from_menu() {
        let mut s = session();
        s.start_game().unwrap();
        assert!(s.reset_progress().is_err());
        s.exit_to_menu().unwrap();
        s.reset_progress().unwrap();
        assert_eq!(s.stats(), &Stats::default());
        assert_eq!(s.state().current_level, 1);
        assert!(matches!(
            s.scene().popups().last(),
            Some(Popup::Message {
                kind: MessageKind::Success,
                ..
            })
        ));
    }

    #[test]
    fn test_spawn_respects_log_cap() {
        let mut s = session();
        s.start_game().unwrap();
        while s.collectibles().count() < 30 {
            s.spawn_collectible();
        }
        assert!(s.spawn_collectible().is_none());
        assert_eq!(s.collectibles().count(), 30);
    }

    #[test]
    fn test_carry_over_limit_is_clamped() {
        let mut s = session();
        s.start_game().unwrap();
        s.state.carrying = 9;
        let id = s.collectibles().next().unwrap().id;
        assert_eq!(s.collect(id), CollectOutcome::CarryFull);
        assert_eq!(s.state().carrying, 5);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_carrying_never_exceeds_limit(picks in proptest::collection::vec(0usize..40, 1..40)) {
            let mut s = session();
            s.start_game().unwrap();
            for pick in picks {
                let ids: Vec<EntityId> = s.world.logs.iter().map(|l| l.id).collect();
                if let Some(id) = ids.get(pick % ids.len().max(1)).copied() {
                    s.collect(id);
                }
                if pick % 7 == 0 {
                    s.deliver(0).unwrap();
                }
                prop_assert!(s.state().carrying <= s.state().carry_limit);
            }
        }
    }
}
