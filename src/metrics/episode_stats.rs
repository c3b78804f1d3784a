//! Episode statistics for automated runs
//!
//! Keeps rolling averages over the most recent episodes plus lifetime totals,
//! including how each episode ended.

use std::collections::VecDeque;

use crate::game::Termination;

/// Outcome of one finished episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeSummary {
    /// Sum of step rewards over the episode
    pub total_reward: i32,
    /// Frames played, including the terminal one
    pub frames: u32,
    /// Food eaten
    pub score: u32,
    /// `None` when the episode ended because the board filled up
    pub termination: Option<Termination>,
}

/// Rolling statistics over episodes
///
/// # Example
///
/// ```rust
/// use block_snake::game::Termination;
/// use block_snake::metrics::{EpisodeStats, EpisodeSummary};
///
/// let mut stats = EpisodeStats::new(100);
/// stats.record(EpisodeSummary {
///     total_reward: 10,
///     frames: 150,
///     score: 2,
///     termination: Some(Termination::Wall),
/// });
///
/// assert_eq!(stats.total_episodes(), 1);
/// assert_eq!(stats.best_score(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct EpisodeStats {
    recent: VecDeque<EpisodeSummary>,
    window_size: usize,
    total_episodes: usize,
    total_frames: u64,
    best_score: u32,
    wall_deaths: usize,
    body_deaths: usize,
    stalls: usize,
}

impl EpisodeStats {
    /// Create a tracker averaging over the last `window_size` episodes
    pub fn new(window_size: usize) -> Self {
        Self {
            recent: VecDeque::with_capacity(window_size),
            window_size: window_size.max(1),
            total_episodes: 0,
            total_frames: 0,
            best_score: 0,
            wall_deaths: 0,
            body_deaths: 0,
            stalls: 0,
        }
    }

    pub fn record(&mut self, summary: EpisodeSummary) {
        if self.recent.len() >= self.window_size {
            self.recent.pop_front();
        }
        self.recent.push_back(summary);

        self.total_episodes += 1;
        self.total_frames += u64::from(summary.frames);
        self.best_score = self.best_score.max(summary.score);

        match summary.termination {
            Some(Termination::Wall) => self.wall_deaths += 1,
            Some(Termination::Body) => self.body_deaths += 1,
            Some(Termination::Stall) => self.stalls += 1,
            None => {}
        }
    }

    /// Mean score over the rolling window, 0.0 before any episode
    pub fn mean_score(&self) -> f32 {
        self.mean_of(|summary| summary.score as f32)
    }

    pub fn mean_reward(&self) -> f32 {
        self.mean_of(|summary| summary.total_reward as f32)
    }

    pub fn mean_frames(&self) -> f32 {
        self.mean_of(|summary| summary.frames as f32)
    }

    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Frames: {} | Score: {:.2} (best {}) | Reward: {:.2} | Len: {:.1} | Wall: {} | Body: {} | Stall: {}",
            self.total_episodes,
            self.total_frames,
            self.mean_score(),
            self.best_score,
            self.mean_reward(),
            self.mean_frames(),
            self.wall_deaths,
            self.body_deaths,
            self.stalls,
        )
    }

    fn mean_of(&self, value: impl Fn(&EpisodeSummary) -> f32) -> f32 {
        if self.recent.is_empty() {
            0.0
        } else {
            self.recent.iter().map(value).sum::<f32>() / self.recent.len() as f32
        }
    }
}
