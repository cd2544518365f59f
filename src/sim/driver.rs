//! Fixed-step driver
//!
//! Turns variable frame times into whole simulation ticks. Pending time is
//! bound to one session: it is dropped as soon as the session leaves
//! `playing`, and a newly started session always begins with none.

use super::game::Game;
use super::state::Phase;
use super::tick::TickInput;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
    /// Serial of the session the pending time belongs to
    session: Option<u64>,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps,
            accumulator: 0.0,
            session: None,
        }
    }

    /// Simulated time not yet consumed by a tick
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Drop pending time and forget the session
    pub fn cancel(&mut self) {
        self.accumulator = 0.0;
        self.session = None;
    }

    /// Feed one frame of wall time; returns the number of ticks run.
    /// One-shot inputs are cleared after the first tick that sees them.
    pub fn update(&mut self, game: &mut Game, input: &mut TickInput, frame_dt: f32) -> u32 {
        if game.phase() != Phase::Playing {
            self.cancel();
            return 0;
        }
        if self.session != Some(game.serial()) {
            self.accumulator = 0.0;
            self.session = Some(game.serial());
        }

        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            game.advance(input, self.step);
            self.accumulator -= self.step;
            substeps += 1;
            input.clear_one_shot();

            if game.phase() != Phase::Playing {
                log::debug!("Session ended mid-frame after {substeps} ticks");
                self.cancel();
                break;
            }
        }
        substeps
    }
}
