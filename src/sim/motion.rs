//! Motion integrator
//!
//! Moves traffic along the track and culls whatever has passed the far end.

use super::state::Entity;
use crate::config::GameConfig;

/// Advance every entity by `speed * travel_rate * dt` and drop the ones past
/// `track_length`. Spawn order of the survivors is preserved.
///
/// Returns the number of entities culled.
pub fn advance(entities: &mut Vec<Entity>, speed: f32, dt: f32, config: &GameConfig) -> usize {
    // Never let traffic run backwards
    let step = speed.max(0.0) * config.travel_rate * dt.max(0.0);

    for entity in entities.iter_mut() {
        entity.travel += step * entity.kind.travel_factor();
    }

    let before = entities.len();
    entities.retain(|e| e.travel <= config.track_length);
    before - entities.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::EntityKind;

    fn entity(id: u64, travel: f32) -> Entity {
        Entity {
            id,
            lane: 0,
            travel,
            kind: EntityKind::Hazard,
        }
    }

    #[test]
    fn test_advance_moves_by_speed() {
        let config = GameConfig::default();
        let mut entities = vec![entity(1, 0.0), entity(2, 100.0)];
        advance(&mut entities, 200.0, 0.5, &config);
        // 200 * 1.8 * 0.5
        assert!((entities[0].travel - 180.0).abs() < 1e-3);
        assert!((entities[1].travel - 280.0).abs() < 1e-3);
    }

    #[test]
    fn test_culls_past_far_boundary() {
        let config = GameConfig::default();
        let mut entities = vec![entity(1, 849.0), entity(2, 10.0), entity(3, 845.0)];
        let culled = advance(&mut entities, 200.0, SIM_DT, &config);
        assert_eq!(culled, 2);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].id, 2);
    }

    #[test]
    fn test_boundary_itself_survives() {
        let config = GameConfig::default();
        let mut entities = vec![entity(1, config.track_length)];
        advance(&mut entities, 200.0, 0.0, &config);
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn test_negative_dt_does_not_rewind() {
        let config = GameConfig::default();
        let mut entities = vec![entity(1, 50.0)];
        advance(&mut entities, 200.0, -1.0, &config);
        assert_eq!(entities[0].travel, 50.0);
    }

    #[test]
    fn test_order_preserved() {
        let config = GameConfig::default();
        let mut entities: Vec<Entity> = (1..=7).map(|i| entity(i, i as f32 * 100.0)).collect();
        advance(&mut entities, 100.0, 1.0, &config);
        let ids: Vec<u64> = entities.iter().map(|e| e.id).collect();
        // +180 each; 700 -> 880 is gone
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }
}
