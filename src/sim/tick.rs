//! Simulation tick
//!
//! The one ordered pipeline every update goes through:
//! input → spawn → move → collide → economy → accrue.
//! Nothing runs unless the session is `playing`.

use super::collision::{self, entity_box, player_box};
use super::economy::{self, RewardOutcome};
use super::game::Game;
use super::motion;
use super::state::{Entity, EntityKind, GameEvent, Phase, Steer};

/// How far ahead of the car the autopilot looks (travel units)
const AUTOPILOT_LOOKAHEAD: f32 = 260.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// One-lane move (key press, already mapped by the layout)
    pub steer: Option<Steer>,
    /// Absolute lane from a pointer; out-of-range values are clamped
    pub target_lane: Option<i64>,
    /// Idle/demo mode - autopilot drives
    pub idle_mode: bool,
}

impl TickInput {
    /// Drop inputs that should only apply once
    pub fn clear_one_shot(&mut self) {
        self.steer = None;
        self.target_lane = None;
    }
}

/// Advance the game by one tick of `dt` seconds
pub fn tick(game: &mut Game, input: &TickInput, dt: f32) {
    if game.session.phase != Phase::Playing {
        return;
    }

    if let Some(lane) = input.target_lane {
        game.set_lane(lane);
    }
    if let Some(steer) = input.steer {
        game.steer(steer);
    }
    if input.idle_mode {
        if let Some(steer) = autopilot(game) {
            game.steer(steer);
        }
    }

    let now = game.session.tick;
    game.session.tick += 1;

    // Spawn
    if let Some(entity) = game.spawner.spawn(&mut game.rng, now, &game.config) {
        log::debug!(
            "Tick {now}: {:?} #{} in lane {}",
            entity.kind,
            entity.id,
            entity.lane
        );
        game.events.push(GameEvent::Spawned {
            id: entity.id,
            tick: now,
            lane: entity.lane,
            kind: entity.kind,
        });
        game.entities.push(entity);
    }

    // Move
    motion::advance(&mut game.entities, game.session.speed, dt, &game.config);

    // Collide
    let hit = collision::detect(game.session.player_lane, &mut game.entities, &game.config);

    // Economy
    if let Some(hit) = hit {
        log::debug!("Tick {now}: hit {:?} #{}", hit.kind, hit.id);
        game.events.push(GameEvent::Collision {
            id: hit.id,
            kind: hit.kind,
        });

        match hit.kind {
            EntityKind::Hazard => {
                game.transition(Phase::GameOver);
                return;
            }
            EntityKind::Reward => match economy::collect_reward(&mut game.session, &game.config) {
                RewardOutcome::Caffeinated {
                    caffeine,
                    delivered,
                } => {
                    game.events.push(GameEvent::CaffeineGained {
                        caffeine,
                        speed: game.session.speed,
                    });
                    if delivered {
                        log::info!("Full caffeine! Delivery is a go");
                        game.events.push(GameEvent::DeliveryMade);
                    }
                }
                RewardOutcome::Overload { base_speed, bonus } => {
                    log::debug!("Caffeine overload, base speed now {base_speed}");
                    game.events.push(GameEvent::Overload { base_speed, bonus });
                }
            },
        }

        if economy::victory_reached(&game.session, &game.config) {
            game.transition(Phase::Victory);
            return;
        }
    }

    // Accrue
    economy::accrue(&mut game.session, &game.config, dt);
    if economy::victory_reached(&game.session, &game.config) {
        game.transition(Phase::Victory);
    }
}

/// Pick a lane change for idle mode: stay clear of potholes, grab beans
fn autopilot(game: &Game) -> Option<Steer> {
    let config = &game.config;
    let current = game.session.player_lane;
    let car = player_box(current, config);

    // Traffic between the lookahead horizon and the back of the car
    let relevant = |e: &&Entity| {
        let b = entity_box(e, config);
        b.max.x >= car.min.x - AUTOPILOT_LOOKAHEAD && b.min.x <= car.max.x
    };

    let lane_cost = |lane: u32| -> f32 {
        let traffic: f32 = game
            .entities
            .iter()
            .filter(|e| e.lane == lane)
            .filter(relevant)
            .map(|e| match e.kind {
                EntityKind::Hazard => 1000.0,
                EntityKind::Reward => -10.0,
            })
            .sum();
        traffic + (lane as i64 - current as i64).abs() as f32
    };

    let target = (0..config.lane_count).min_by(|&a, &b| lane_cost(a).total_cmp(&lane_cost(b)))?;
    let (steer, next) = match target.cmp(&current) {
        std::cmp::Ordering::Less => (Steer::Decrease, current - 1),
        std::cmp::Ordering::Greater => (Steer::Increase, current + 1),
        std::cmp::Ordering::Equal => return None,
    };

    // Never swerve straight into a pothole
    let next_car = player_box(next, config);
    let blocked = game.entities.iter().any(|e| {
        e.lane == next && e.kind == EntityKind::Hazard && next_car.overlaps(&entity_box(e, config))
    });
    if blocked { None } else { Some(steer) }
}
