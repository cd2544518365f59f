//! Game phase machine
//!
//! `Game` is the single owner of the session, the traffic, the spawn RNG and
//! the record store. Transitions:
//!
//! ```text
//! menu --start--> playing --hazard--> gameover --reset--> menu
//!                         --win-----> victory  --reset--> menu
//! ```
//!
//! Everything else is rejected with `GameError::InvalidTransition`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::spawn::Spawner;
use super::state::{Entity, GameEvent, Phase, Session, Snapshot, Steer};
use super::tick::{TickInput, tick};
use crate::config::GameConfig;
use crate::error::{ConfigError, GameError, StoreError};
use crate::records::{self, BestRecord, BestRecordStore, RecordUpdate};

/// Derive the spawn seed for the n-th session of a game
pub fn session_seed(game_seed: u64, serial: u64) -> u64 {
    serial.wrapping_mul(2654435761).wrapping_add(game_seed)
}

pub struct Game {
    pub(crate) config: GameConfig,
    pub(crate) session: Session,
    pub(crate) entities: Vec<Entity>,
    pub(crate) rng: Pcg32,
    pub(crate) spawner: Spawner,
    pub(crate) events: Vec<GameEvent>,
    seed: u64,
    /// Bumped on every `start`; lets drivers spot a new session
    serial: u64,
    store: Box<dyn BestRecordStore>,
    best: BestRecord,
    store_errors: Vec<StoreError>,
}

impl Game {
    /// Validate the config and open the menu with bests read from `store`
    pub fn new(
        config: GameConfig,
        seed: u64,
        store: Box<dyn BestRecordStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let (best, store_errors) = BestRecord::load(store.as_ref());
        log::info!(
            "Menu ready (best score {}, best distance {}m)",
            best.best_score,
            best.best_distance
        );

        Ok(Self {
            session: Session::new(&config, seed),
            entities: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            spawner: Spawner::new(),
            events: Vec::new(),
            seed,
            serial: 0,
            store,
            best,
            store_errors,
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Live traffic in spawn order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of sessions started so far
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Bests as last known (shown on the menu)
    pub fn best(&self) -> BestRecord {
        self.best
    }

    /// Store failures from the last time the menu consulted the store
    pub fn store_errors(&self) -> &[StoreError] {
        &self.store_errors
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            session: self.session.clone(),
            entities: self.entities.clone(),
        }
    }

    /// Take pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// `menu -> playing`: fresh session, empty track, tick 0
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.session.phase != Phase::Menu {
            return Err(GameError::InvalidTransition {
                action: "start",
                phase: self.session.phase,
            });
        }

        self.serial += 1;
        let seed = session_seed(self.seed, self.serial);
        self.rng = Pcg32::seed_from_u64(seed);
        self.session = Session::new(&self.config, seed);
        self.entities.clear();

        log::info!("Session {} starting (seed {seed})", self.serial);
        self.transition(Phase::Playing);
        Ok(())
    }

    /// `victory|gameover -> menu`: settle the bests, then reopen the menu
    pub fn reset(&mut self) -> Result<RecordUpdate, GameError> {
        if !self.session.phase.is_finished() {
            return Err(GameError::InvalidTransition {
                action: "reset",
                phase: self.session.phase,
            });
        }

        let distance = self.session.distance.max(0.0).floor() as u64;
        let update = records::submit(
            self.store.as_mut(),
            self.best,
            self.session.score,
            distance,
        );
        self.best = update.current;

        self.transition(Phase::Menu);
        self.refresh_best();
        Ok(update)
    }

    /// `victory|gameover -> menu -> playing`
    pub fn play_again(&mut self) -> Result<RecordUpdate, GameError> {
        let update = self.reset()?;
        self.start()?;
        Ok(update)
    }

    /// Run one pipeline tick. Does nothing outside `playing`.
    pub fn advance(&mut self, input: &TickInput, dt: f32) {
        tick(self, input, dt);
    }

    /// Move one lane; ignored outside `playing`
    pub fn steer(&mut self, steer: Steer) {
        let lane = self.session.player_lane as i64;
        let target = match steer {
            Steer::Decrease => lane - 1,
            Steer::Increase => lane + 1,
        };
        self.set_lane(target);
    }

    /// Jump to a lane, clamping out-of-range requests; ignored outside `playing`
    pub fn set_lane(&mut self, lane: i64) {
        if self.session.phase != Phase::Playing {
            return;
        }
        let clamped = lane.clamp(0, self.config.max_lane() as i64) as u32;
        if clamped as i64 != lane {
            log::trace!("Lane request {lane} clamped to {clamped}");
        }
        self.session.player_lane = clamped;
    }

    /// Change phase, emitting exactly one `PhaseChanged`
    pub(crate) fn transition(&mut self, to: Phase) {
        let from = self.session.phase;
        if from == to {
            return;
        }
        self.session.phase = to;
        if from == Phase::Playing {
            // Traffic never outlives the run
            self.entities.clear();
        }

        log::info!(
            "{from} -> {to} (score {}, distance {:.0}m, tick {})",
            self.session.score,
            self.session.distance,
            self.session.tick
        );
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Re-read the store on menu entry, keeping anything better we already know
    fn refresh_best(&mut self) {
        let (stored, errors) = BestRecord::load(self.store.as_ref());
        self.best = self.best.merge(&stored);
        self.store_errors = errors;
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("seed", &self.seed)
            .field("serial", &self.serial)
            .field("session", &self.session)
            .field("entities", &self.entities.len())
            .field("best", &self.best)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::tests::BrokenStore;
    use crate::records::{BEST_DISTANCE_KEY, BEST_SCORE_KEY, MemoryStore};
    use crate::sim::state::{Entity, EntityKind};

    fn game() -> Game {
        Game::new(GameConfig::default(), 1, Box::new(MemoryStore::new())).unwrap()
    }

    fn crash(game: &mut Game) {
        let lane = game.session.player_lane;
        game.entities.clear();
        game.entities.push(Entity {
            id: 9999,
            lane,
            travel: game.config.player_position,
            kind: EntityKind::Hazard,
        });
        game.advance(&TickInput::default(), 0.0);
        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = GameConfig {
            spawn_interval_ticks: 0,
            ..Default::default()
        };
        assert!(Game::new(config, 1, Box::new(MemoryStore::new())).is_err());
    }

    #[test]
    fn test_only_start_from_menu() {
        let mut game = game();
        assert_eq!(game.phase(), Phase::Menu);
        assert!(game.reset().is_err());

        game.start().unwrap();
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(
            game.start(),
            Err(GameError::InvalidTransition {
                action: "start",
                phase: Phase::Playing
            })
        );
        assert!(game.reset().is_err());
    }

    #[test]
    fn test_start_resets_session() {
        let mut game = game();
        game.start().unwrap();
        for _ in 0..100 {
            game.advance(&TickInput::default(), crate::consts::SIM_DT);
        }
        crash(&mut game);
        game.reset().unwrap();
        game.start().unwrap();

        let s = game.session();
        assert_eq!(s.tick, 0);
        assert_eq!(s.caffeine, 0.0);
        assert_eq!(s.distance, 0.0);
        assert_eq!(s.score, 0);
        assert_eq!(s.beans_collected, 0);
        assert_eq!(s.speed, game.config().base_speed);
        assert_eq!(s.player_lane, 1);
        assert!(!s.delivery_made);
        assert!(game.entities().is_empty());
    }

    #[test]
    fn test_one_event_per_transition() {
        let mut game = game();
        game.start().unwrap();
        crash(&mut game);
        game.reset().unwrap();

        let changes: Vec<(Phase, Phase)> = game
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::PhaseChanged { from, to } => Some((from, to)),
                _ => None,
            })
            .collect();
        assert_eq!(
            changes,
            vec![
                (Phase::Menu, Phase::Playing),
                (Phase::Playing, Phase::GameOver),
                (Phase::GameOver, Phase::Menu),
            ]
        );
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_store_untouched_until_reset() {
        let mut game = game();
        game.start().unwrap();
        for _ in 0..120 {
            game.advance(&TickInput::default(), crate::consts::SIM_DT);
        }
        crash(&mut game);
        assert!(game.store.get(BEST_SCORE_KEY).unwrap().is_none());

        let score = game.session().score;
        let update = game.reset().unwrap();
        assert!(update.new_best_score);
        assert_eq!(game.store.get(BEST_SCORE_KEY).unwrap(), Some(score));
        assert_eq!(
            game.store.get(BEST_DISTANCE_KEY).unwrap(),
            Some(game.session().distance.floor() as u64)
        );
        assert_eq!(game.best().best_score, score);
    }

    #[test]
    fn test_broken_store_never_halts() {
        let mut game = Game::new(GameConfig::default(), 5, Box::new(BrokenStore)).unwrap();
        assert_eq!(game.store_errors().len(), 2);
        assert!(game.best().is_empty());

        game.start().unwrap();
        for _ in 0..60 {
            game.advance(&TickInput::default(), crate::consts::SIM_DT);
        }
        crash(&mut game);
        let update = game.reset().unwrap();
        assert!(update.is_new_best());
        assert!(!update.persisted());
        assert_eq!(game.phase(), Phase::Menu);
        // Still shown on the menu even though it was not saved
        assert_eq!(game.best(), update.current);
    }

    #[test]
    fn test_lane_clamping() {
        let mut game = game();
        // Ignored in the menu
        game.set_lane(3);
        assert_eq!(game.session().player_lane, 1);

        game.start().unwrap();
        game.set_lane(-7);
        assert_eq!(game.session().player_lane, 0);
        game.steer(Steer::Decrease);
        assert_eq!(game.session().player_lane, 0);
        game.set_lane(99);
        assert_eq!(game.session().player_lane, 3);
        game.steer(Steer::Increase);
        assert_eq!(game.session().player_lane, 3);
        game.steer(Steer::Decrease);
        assert_eq!(game.session().player_lane, 2);
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let mut game = game();
        game.start().unwrap();
        for _ in 0..50 {
            game.advance(&TickInput::default(), crate::consts::SIM_DT);
        }
        let snapshot = game.snapshot();
        assert_eq!(&snapshot.session, game.session());
        assert_eq!(snapshot.entities.as_slice(), game.entities());

        game.advance(&TickInput::default(), crate::consts::SIM_DT);
        assert_eq!(snapshot.session.tick, 50);
        assert_eq!(game.session().tick, 51);
    }

    #[test]
    fn test_play_again() {
        let mut game = game();
        game.start().unwrap();
        crash(&mut game);
        // Crashed on the first tick: nothing to beat
        let update = game.play_again().unwrap();
        assert!(!update.is_new_best());
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.serial(), 2);
    }

    #[test]
    fn test_sessions_get_distinct_seeds() {
        let mut game = game();
        game.start().unwrap();
        let first = game.session().seed;
        crash(&mut game);
        game.play_again().unwrap();
        assert_ne!(game.session().seed, first);
        assert_eq!(game.session().seed, session_seed(1, 2));
    }
}
