//! Progression economy
//!
//! Beans raise caffeine, caffeine raises speed, speed and distance raise the
//! score. Score never goes down while playing: the per-tick formula is only
//! ever allowed to raise it.

use super::state::Session;
use crate::config::{GameConfig, WinPolicy};
use crate::consts::MAX_CAFFEINE;

/// What collecting a reward did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RewardOutcome {
    /// Caffeine went up; `delivered` is set on the reward that first hits 100
    Caffeinated { caffeine: f32, delivered: bool },
    /// Caffeine was already full: base speed went up instead
    Overload { base_speed: f32, bonus: u64 },
}

/// Apply a reward collision
pub fn collect_reward(session: &mut Session, config: &GameConfig) -> RewardOutcome {
    if session.caffeine >= MAX_CAFFEINE {
        session.base_speed += config.overload_speed_increment;
        session.overloads += 1;
        session.overload_points += config.overload_score_bonus;
        session.score += config.overload_score_bonus;
        refresh_speed(session, config);
        settle_score(session, config);
        return RewardOutcome::Overload {
            base_speed: session.base_speed,
            bonus: config.overload_score_bonus,
        };
    }

    session.caffeine = (session.caffeine + config.reward_caffeine).clamp(0.0, MAX_CAFFEINE);
    session.beans_collected += 1;
    session.score += config.reward_score;
    refresh_speed(session, config);
    settle_score(session, config);

    let delivered = !session.delivery_made && session.caffeine >= MAX_CAFFEINE;
    if delivered {
        session.delivery_made = true;
    }

    RewardOutcome::Caffeinated {
        caffeine: session.caffeine,
        delivered,
    }
}

/// Recompute speed from base speed and caffeine and track the best seen
pub fn refresh_speed(session: &mut Session, config: &GameConfig) {
    session.speed = config.speed_for(session.base_speed, session.caffeine);
    session.max_speed_seen = session.max_speed_seen.max(session.speed);
}

/// Score the session is owed by the formula
/// `floor(distance) + beans * reward_score + floor(max_speed / 10) + overload bonuses`
pub fn formula_score(session: &Session, config: &GameConfig) -> u64 {
    session.breakdown(config).total()
}

/// Raise the score to what the formula owes; never lowers it
fn settle_score(session: &mut Session, config: &GameConfig) {
    session.score = session.score.max(formula_score(session, config));
}

/// Per-tick accrual of distance and score
pub fn accrue(session: &mut Session, config: &GameConfig, dt: f32) {
    let dt = dt.max(0.0) as f64;
    session.distance += session.speed as f64 * config.distance_per_speed_second * dt;
    session.max_speed_seen = session.max_speed_seen.max(session.speed);
    settle_score(session, config);
}

/// Whether the configured win condition holds
pub fn victory_reached(session: &Session, config: &GameConfig) -> bool {
    match config.win_policy {
        WinPolicy::CaffeineOnly => session.delivery_made,
        WinPolicy::CaffeinePlusDistance => {
            session.delivery_made && session.distance >= config.target_distance
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn scenario_config() -> GameConfig {
        GameConfig {
            base_speed: 2.0,
            speed_per_caffeine: 1.5,
            ..Default::default()
        }
    }

    #[test]
    fn test_ten_beans_deliver() {
        let config = scenario_config();
        let mut session = Session::new(&config, 0);

        for i in 1..=10 {
            let outcome = collect_reward(&mut session, &config);
            let expected = i as f32 * 10.0;
            assert_eq!(session.caffeine, expected);
            assert_eq!(
                outcome,
                RewardOutcome::Caffeinated {
                    caffeine: expected,
                    delivered: i == 10
                }
            );
        }

        assert!(session.delivery_made);
        assert_eq!(session.speed, 152.0);
        assert_eq!(session.max_speed_seen, 152.0);
        assert_eq!(session.beans_collected, 10);
        assert_eq!(session.breakdown(&config).bean_bonus, 500);
        assert!(session.score >= 500);
    }

    #[test]
    fn test_overload_raises_base_speed_not_caffeine() {
        let config = scenario_config();
        let mut session = Session::new(&config, 0);
        for _ in 0..10 {
            collect_reward(&mut session, &config);
        }
        let score_before = session.score;
        let beans_before = session.beans_collected;

        let outcome = collect_reward(&mut session, &config);

        assert_eq!(
            outcome,
            RewardOutcome::Overload {
                base_speed: 12.0,
                bonus: 25
            }
        );
        assert_eq!(session.caffeine, 100.0);
        assert_eq!(session.base_speed, 12.0);
        assert_eq!(session.speed, 162.0);
        assert_eq!(session.beans_collected, beans_before);
        // Bonus plus the extra point from the faster top speed
        assert_eq!(session.score, score_before + 25 + 1);
        assert_eq!(session.score, session.breakdown(&config).total());
        assert_eq!(session.overloads, 1);
        assert!(config.overload_score_bonus < config.reward_score);
    }

    #[test]
    fn test_score_matches_breakdown_after_each_reward() {
        let config = GameConfig::default();
        let mut session = Session::new(&config, 0);
        for _ in 0..12 {
            collect_reward(&mut session, &config);
            assert_eq!(session.score, session.breakdown(&config).total());
        }
    }

    #[test]
    fn test_delivery_only_once() {
        let config = scenario_config();
        let mut session = Session::new(&config, 0);
        session.caffeine = 90.0;
        assert!(matches!(
            collect_reward(&mut session, &config),
            RewardOutcome::Caffeinated { delivered: true, .. }
        ));
        assert!(matches!(
            collect_reward(&mut session, &config),
            RewardOutcome::Overload { .. }
        ));
    }

    #[test]
    fn test_caffeine_clamped() {
        let config = GameConfig {
            reward_caffeine: 30.0,
            ..Default::default()
        };
        let mut session = Session::new(&config, 0);
        for _ in 0..4 {
            collect_reward(&mut session, &config);
        }
        assert_eq!(session.caffeine, 100.0);
        assert!(session.delivery_made);
    }

    #[test]
    fn test_accrue_distance_and_score() {
        let config = GameConfig::default();
        let mut session = Session::new(&config, 0);
        // 200 speed * 0.1 m per speed-second = 20 m/s
        for _ in 0..60 {
            accrue(&mut session, &config, SIM_DT);
        }
        assert!((session.distance - 20.0).abs() < 1e-3);
        // 20 distance (maybe 19 from float drift) + 20 speed bonus
        assert!((39..=40).contains(&session.score));
    }

    #[test]
    fn test_score_never_drops_after_bonus() {
        let config = GameConfig::default();
        let mut session = Session::new(&config, 0);
        collect_reward(&mut session, &config);
        let after_reward = session.score;
        accrue(&mut session, &config, SIM_DT);
        assert!(session.score >= after_reward);
    }

    #[test]
    fn test_overload_bonus_survives_recompute() {
        let config = GameConfig::default();
        let mut session = Session::new(&config, 0);
        session.caffeine = 100.0;
        refresh_speed(&mut session, &config);
        accrue(&mut session, &config, SIM_DT);
        let formula_before = formula_score(&session, &config);

        collect_reward(&mut session, &config);
        accrue(&mut session, &config, SIM_DT);
        assert!(session.score >= formula_before + config.overload_score_bonus);
    }

    #[test]
    fn test_win_policies() {
        let mut config = GameConfig::default();
        let mut session = Session::new(&config, 0);
        session.delivery_made = true;
        session.distance = 10.0;
        assert!(victory_reached(&session, &config));

        config.win_policy = WinPolicy::CaffeinePlusDistance;
        config.target_distance = 50.0;
        assert!(!victory_reached(&session, &config));
        session.distance = 50.0;
        assert!(victory_reached(&session, &config));
        session.delivery_made = false;
        assert!(!victory_reached(&session, &config));
    }
}
