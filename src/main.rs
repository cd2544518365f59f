//! Espresso Dash entry point
//!
//! Native builds run a headless autopilot session and print the results
//! screen. Usage: `espresso-dash [config.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::process::ExitCode;
    use std::time::{SystemTime, UNIX_EPOCH};

    use espresso_dash::persistence::JsonFileStore;
    use espresso_dash::sim::{FixedStep, Game, GameEvent, Phase, TickInput};
    use espresso_dash::{GameConfig, Layout, LayoutMode, Viewport};

    /// Where the native build keeps its bests
    const BEST_FILE: &str = "espresso-dash-best.json";
    /// Longest run the headless driver will simulate (seconds)
    const MAX_RUN_SECS: f32 = 120.0;
    /// Frame time fed to the driver
    const FRAME_DT: f32 = 1.0 / 60.0;

    pub fn run() -> ExitCode {
        env_logger::init();

        let mut args = std::env::args().skip(1);
        let config = match args.next() {
            Some(path) => match GameConfig::load(&path) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("Bad config {path}: {e}");
                    return ExitCode::FAILURE;
                }
            },
            None => GameConfig::default(),
        };
        let seed = match args.next() {
            Some(raw) => match raw.parse::<u64>() {
                Ok(seed) => seed,
                Err(e) => {
                    log::error!("Bad seed {raw}: {e}");
                    return ExitCode::FAILURE;
                }
            },
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0),
        };

        let layout = Layout::new(
            LayoutMode::TravelHorizontal,
            config.lane_count,
            Viewport::default(),
        );
        let config = config.with_track(layout.track());

        let mut game = match Game::new(config, seed, Box::new(JsonFileStore::new(BEST_FILE))) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Invalid config: {e}");
                return ExitCode::FAILURE;
            }
        };

        let best = game.best();
        println!(
            "Espresso Dash (seed {seed}, {}) - best score {}, best distance {}m",
            game.config().win_policy.as_str(),
            best.best_score,
            best.best_distance
        );

        if let Err(e) = game.start() {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }

        let mut driver = FixedStep::default();
        let mut input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut elapsed = 0.0;
        while game.phase() == Phase::Playing && elapsed < MAX_RUN_SECS {
            driver.update(&mut game, &mut input, FRAME_DT);
            elapsed += FRAME_DT;

            for event in game.drain_events() {
                match event {
                    GameEvent::DeliveryMade => {
                        println!("  {elapsed:>6.1}s  espresso delivered!");
                    }
                    GameEvent::Overload { base_speed, bonus } => {
                        println!("  {elapsed:>6.1}s  overload +{bonus} (base {base_speed})");
                    }
                    GameEvent::Collision { kind, .. } => {
                        log::debug!("{elapsed:.2}s: hit {kind:?}");
                    }
                    _ => {}
                }
            }
        }

        let snapshot = game.snapshot();
        let session = &snapshot.session;
        let breakdown = session.breakdown(game.config());
        let headline = match session.phase {
            Phase::Victory => "ESPRESSO DELIVERED",
            Phase::GameOver => "CRASHED",
            _ => "OUT OF TIME",
        };
        println!();
        println!("{headline}");
        println!("  distance      {:>8.0}m", session.distance.floor());
        println!("  beans         {:>8}", session.beans_collected);
        println!("  max speed     {:>8.0}", session.max_speed_seen);
        println!("  overloads     {:>8}", session.overloads);
        println!("  delivered     {:>8}", if session.delivery_made { "yes" } else { "no" });
        println!("  ----------------------");
        println!("  distance pts  {:>8}", breakdown.distance_points);
        println!("  bean bonus    {:>8}", breakdown.bean_bonus);
        println!("  speed bonus   {:>8}", breakdown.speed_bonus);
        println!("  overload      {:>8}", breakdown.overload_bonus);
        println!("  score         {:>8}", session.score);

        // Unfinished runs set no records
        if game.phase() == Phase::Playing {
            log::info!("Time limit reached, run not recorded");
            return ExitCode::SUCCESS;
        }

        match game.reset() {
            Ok(update) => {
                if update.new_best_score {
                    println!("  NEW BEST SCORE (was {})", update.previous.best_score);
                }
                if update.new_best_distance {
                    println!("  NEW BEST DISTANCE (was {}m)", update.previous.best_distance);
                }
                for e in &update.errors {
                    log::warn!("Best not saved: {e}");
                }
            }
            Err(e) => log::error!("{e}"),
        }

        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page
}
