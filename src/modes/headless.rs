//! Headless mode: an automated controller drives the engine as fast as it can
//!
//! The controller only ever sees the engine through `&GameEngine` and answers
//! with one of the three relative actions, which is the same interface an
//! external learning agent would use.
//!
//! # Example
//!
//! ```rust
//! use block_snake::game::GameConfig;
//! use block_snake::modes::{HeadlessMode, RandomController};
//!
//! let config = GameConfig::default().with_seed(7);
//! let mut mode = HeadlessMode::new(config, RandomController::new(Some(7))).unwrap();
//! let episodes = mode.run(3).unwrap();
//! assert_eq!(episodes.len(), 3);
//! ```

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tracing::{debug, info, warn};

use crate::game::{Action, GameConfig, GameEngine, GameError};
use crate::metrics::{EpisodeStats, EpisodeSummary};

/// Source of relative actions for automated play
pub trait Controller {
    fn next_action(&mut self, engine: &GameEngine) -> Action;

    /// Called after every `reset`
    fn on_episode_start(&mut self) {}
}

/// Picks each action uniformly at random
pub struct RandomController {
    rng: Pcg64,
}

impl RandomController {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_entropy(),
        };
        Self { rng }
    }
}

impl Controller for RandomController {
    fn next_action(&mut self, _engine: &GameEngine) -> Action {
        Action::ALL[self.rng.gen_range(0..Action::ALL.len())]
    }
}

/// Runs whole episodes back to back without any terminal I/O
pub struct HeadlessMode<C: Controller> {
    engine: GameEngine,
    controller: C,
    stats: EpisodeStats,
    log_frequency: usize,
}

impl<C: Controller> HeadlessMode<C> {
    pub fn new(config: GameConfig, controller: C) -> Result<Self> {
        let engine = GameEngine::new(config).context("Failed to create game engine")?;

        Ok(Self {
            engine,
            controller,
            stats: EpisodeStats::new(100),
            log_frequency: 100,
        })
    }

    /// Log rolling statistics every `n` episodes
    pub fn with_log_frequency(mut self, n: usize) -> Self {
        self.log_frequency = n.max(1);
        self
    }

    /// Play `episodes` full episodes and return their summaries
    pub fn run(&mut self, episodes: usize) -> Result<Vec<EpisodeSummary>> {
        info!(episodes, "starting headless run");

        let mut summaries = Vec::with_capacity(episodes);
        for episode in 0..episodes {
            let summary = self.run_episode()?;
            debug!(
                episode,
                score = summary.score,
                frames = summary.frames,
                cause = ?summary.termination,
                "episode finished"
            );

            self.stats.record(summary);
            summaries.push(summary);

            if (episode + 1) % self.log_frequency == 0 {
                info!("{}", self.stats.format_summary());
            }
        }

        info!("{}", self.stats.format_summary());
        Ok(summaries)
    }

    /// Reset the engine and step it until the episode ends
    pub fn run_episode(&mut self) -> Result<EpisodeSummary> {
        self.engine.reset();
        self.controller.on_episode_start();

        let mut total_reward = 0;
        loop {
            let action = self.controller.next_action(&self.engine);
            match self.engine.step(action) {
                Ok(outcome) => {
                    total_reward += outcome.reward;
                    if outcome.game_over {
                        return Ok(EpisodeSummary {
                            total_reward,
                            frames: self.engine.frame_iteration(),
                            score: outcome.score,
                            termination: outcome.info.termination,
                        });
                    }
                }
                Err(GameError::BoardFull) => {
                    warn!(score = self.engine.score(), "board full, ending episode");
                    return Ok(EpisodeSummary {
                        total_reward,
                        frames: self.engine.frame_iteration(),
                        score: self.engine.score(),
                        termination: None,
                    });
                }
                Err(err) => return Err(err).context("Engine step failed"),
            }
        }
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{REWARD_DEATH, Termination};

    /// Always goes straight, so every episode ends at the right wall
    struct Straight;

    impl Controller for Straight {
        fn next_action(&mut self, _engine: &GameEngine) -> Action {
            Action::Continue
        }
    }

    /// Turns right whenever the cell ahead is blocked, otherwise keeps going
    struct Cautious {
        starts: usize,
    }

    impl Controller for Cautious {
        fn next_action(&mut self, engine: &GameEngine) -> Action {
            let ahead = engine
                .head()
                .moved_in_direction(engine.direction(), engine.grid().block);
            if engine.is_collision_at(ahead) {
                Action::TurnRight
            } else {
                Action::Continue
            }
        }

        fn on_episode_start(&mut self) {
            self.starts += 1;
        }
    }

    #[test]
    fn test_straight_controller_hits_wall() {
        let config = GameConfig::default().with_seed(11);
        let mut mode = HeadlessMode::new(config, Straight).unwrap();

        let summary = mode.run_episode().unwrap();

        assert_eq!(summary.termination, Some(Termination::Wall));
        assert_eq!(summary.frames, 16);
        assert_eq!(summary.total_reward, summary.score as i32 * 10 + REWARD_DEATH);
    }

    #[test]
    fn test_cautious_controller_stalls_out() {
        // Circles the border forever unless food lines up; the stall guard ends it
        let config = GameConfig::small().with_seed(5);
        let mut mode = HeadlessMode::new(config, Cautious { starts: 0 }).unwrap();

        let summaries = mode.run(2).unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(mode.controller.starts, 2);
        for summary in summaries {
            assert!(summary.termination.is_some());
        }
    }

    #[test]
    fn test_random_controller_episodes_terminate() {
        let config = GameConfig::small().with_seed(42);
        let mut mode = HeadlessMode::new(config, RandomController::new(Some(42)))
            .unwrap()
            .with_log_frequency(5);

        let summaries = mode.run(20).unwrap();

        assert_eq!(summaries.len(), 20);
        assert_eq!(mode.stats().total_episodes(), 20);
        for summary in &summaries {
            assert!(summary.frames >= 1);
            assert!(summary.frames <= 100 * (3 + summary.score) + 1);
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let config = GameConfig::small().with_seed(9);
            let mut mode = HeadlessMode::new(config, RandomController::new(Some(9))).unwrap();
            mode.run(5).unwrap()
        };

        assert_eq!(run(), run());
    }
}
