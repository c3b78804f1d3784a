use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing::{debug, warn};

use super::{
    action::{Action, Direction},
    config::GameConfig,
    error::GameError,
    food::place_food,
    state::{GameState, Grid, Position, Snake},
};

/// Reward for a move that ends the episode
pub const REWARD_DEATH: i32 = -10;
/// Reward for eating food
pub const REWARD_FOOD: i32 = 10;
/// Reward for any other move
pub const REWARD_MOVE: i32 = 0;

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Snake left the field
    Wall,
    /// Snake ran into one of its own segments
    Body,
    /// Too many frames for the snake's length without the episode ending
    Stall,
}

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Cause of termination if the episode ended this step
    pub termination: Option<Termination>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// One of [`REWARD_DEATH`], [`REWARD_FOOD`], [`REWARD_MOVE`]
    pub reward: i32,
    /// Whether the episode is over
    pub game_over: bool,
    /// Food eaten this episode
    pub score: u32,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine: owns one episode's state and advances it a frame at a time
///
/// Not thread-safe by construction (`step` and `reset` take `&mut self`); run
/// one engine per control loop.
pub struct GameEngine {
    config: GameConfig,
    grid: Grid,
    rng: Pcg64,
    state: GameState,
}

impl GameEngine {
    /// Create a new game engine and start its first episode
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;

        let grid = config.grid();
        let mut rng = seeded_rng(config.seed);
        let state = initial_state(&config, &grid, &mut rng);

        Ok(Self {
            config,
            grid,
            rng,
            state,
        })
    }

    /// Wrap an existing state, e.g. to replay or probe a position
    ///
    /// The state must have a non-empty snake lying on the grid.
    pub fn from_state(config: GameConfig, state: GameState) -> Result<Self, GameError> {
        config.validate()?;
        let grid = config.grid();

        if state.snake.is_empty() {
            return Err(GameError::InvalidState("snake has no segments".to_string()));
        }
        if let Some(segment) = state.snake.body.iter().find(|s| !grid.is_aligned_cell(**s)) {
            return Err(GameError::InvalidState(format!(
                "segment {segment:?} is not a cell of the grid"
            )));
        }

        Ok(Self {
            rng: seeded_rng(config.seed),
            config,
            grid,
            state,
        })
    }

    /// Start a new episode, discarding the current one
    ///
    /// With a configured seed the food sequence restarts too, so repeated
    /// resets produce identical states.
    pub fn reset(&mut self) {
        if self.config.seed.is_some() {
            self.rng = seeded_rng(self.config.seed);
        }
        self.state = initial_state(&self.config, &self.grid, &mut self.rng);
        debug!(food = ?self.state.food, "episode reset");
    }

    /// Execute one step of the game
    ///
    /// Fails only with [`GameError::BoardFull`], when the snake has just eaten
    /// the last free cell; the episode is over after that.
    pub fn step(&mut self, action: Action) -> Result<StepOutcome, GameError> {
        if !self.state.is_alive {
            return Ok(StepOutcome {
                reward: REWARD_MOVE,
                game_over: true,
                score: self.state.score,
                info: StepInfo {
                    ate_food: false,
                    termination: None,
                },
            });
        }

        let entry_len = self.state.snake.len();
        self.state.frame_iteration += 1;

        let direction = self.state.snake.direction.turned(action);
        self.state.snake.direction = direction;
        let new_head = self
            .state
            .snake
            .head()
            .moved_in_direction(direction, self.grid.block);

        // The head goes in before the collision test; the old tail is still
        // present, so moving onto it counts as a body hit.
        self.state.snake.push_head(new_head);

        if let Some(termination) = self.termination(entry_len) {
            self.state.is_alive = false;
            debug!(
                ?termination,
                score = self.state.score,
                frames = self.state.frame_iteration,
                "episode over"
            );

            return Ok(StepOutcome {
                reward: REWARD_DEATH,
                game_over: true,
                score: self.state.score,
                info: StepInfo {
                    ate_food: false,
                    termination: Some(termination),
                },
            });
        }

        let ate_food = new_head == self.state.food;

        let reward = if ate_food {
            self.state.score += 1;
            match place_food(&mut self.rng, &self.grid, &self.state.snake) {
                Some(food) => self.state.food = food,
                None => {
                    self.state.is_alive = false;
                    warn!(
                        length = self.state.snake.len(),
                        "snake covers the whole grid, no cell left for food"
                    );
                    return Err(GameError::BoardFull);
                }
            }
            debug!(score = self.state.score, food = ?self.state.food, "food eaten");
            REWARD_FOOD
        } else {
            self.state.snake.pop_tail();
            REWARD_MOVE
        };

        Ok(StepOutcome {
            reward,
            game_over: false,
            score: self.state.score,
            info: StepInfo {
                ate_food,
                termination: None,
            },
        })
    }

    /// True if the current head is on a wall or on the body behind it
    pub fn is_collision(&self) -> bool {
        self.is_collision_at(self.state.snake.head())
    }

    /// Test a hypothetical head position without touching the state
    ///
    /// The head's own cell is not a collision, so planners can probe the four
    /// neighbours of the head directly.
    pub fn is_collision_at(&self, point: Position) -> bool {
        self.grid.is_outside(point) || self.state.snake.collides_with_body(point)
    }

    /// Collision test run on the freshly inserted head inside `step`
    ///
    /// The stall budget is `stall_factor` frames per segment of the snake as it
    /// was before this step, so a length-3 snake at the default factor ends on
    /// frame 301. Counting the new head as well would let an episode whose
    /// frame count is already past the budget on entry run one more segment's
    /// worth of frames.
    fn termination(&self, entry_len: usize) -> Option<Termination> {
        let head = self.state.snake.head();
        let frame_budget = u64::from(self.config.stall_factor) * entry_len as u64;

        if self.grid.is_outside(head) {
            Some(Termination::Wall)
        } else if self.state.snake.collides_with_body(head) {
            Some(Termination::Body)
        } else if u64::from(self.state.frame_iteration) > frame_budget {
            Some(Termination::Stall)
        } else {
            None
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.state.snake
    }

    pub fn head(&self) -> Position {
        self.state.snake.head()
    }

    pub fn food(&self) -> Position {
        self.state.food
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn direction(&self) -> Direction {
        self.state.snake.direction
    }

    pub fn frame_iteration(&self) -> u32 {
        self.state.frame_iteration
    }

    pub fn is_alive(&self) -> bool {
        self.state.is_alive
    }
}

fn seeded_rng(seed: Option<u64>) -> Pcg64 {
    match seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    }
}

/// Fresh episode: heading right from the center cell, food on a free cell
fn initial_state(config: &GameConfig, grid: &Grid, rng: &mut Pcg64) -> GameState {
    let snake = Snake::new(
        grid.center(),
        Direction::Right,
        config.initial_snake_length,
        grid.block,
    );

    let food = place_food(rng, grid, &snake).unwrap_or_else(|| {
        unreachable!("validated config leaves at least one free cell beside the initial snake")
    });

    GameState::new(snake, food)
}
