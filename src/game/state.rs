use std::collections::VecDeque;

use super::action::Direction;

/// Top-left corner of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position `step` units in a direction
    pub fn moved_in_direction(&self, direction: Direction, step: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * step, dy * step)
    }
}

/// Playing field measured in the same units as positions
///
/// Cells are `block` units wide; `width` and `height` need not be multiples of
/// `block`, the partial strip at the right/bottom edge is never playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub block: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32, block: i32) -> Self {
        Self {
            width,
            height,
            block,
        }
    }

    /// Largest valid x coordinate
    pub fn max_x(&self) -> i32 {
        self.width - self.block
    }

    /// Largest valid y coordinate
    pub fn max_y(&self) -> i32 {
        self.height - self.block
    }

    /// Number of playable columns
    pub fn columns(&self) -> i32 {
        self.max_x() / self.block + 1
    }

    /// Number of playable rows
    pub fn rows(&self) -> i32 {
        self.max_y() / self.block + 1
    }

    pub fn cell_count(&self) -> usize {
        (self.columns().max(0) as usize) * (self.rows().max(0) as usize)
    }

    /// Position of the cell at (column, row)
    pub fn cell(&self, column: i32, row: i32) -> Position {
        Position::new(column * self.block, row * self.block)
    }

    /// Cell containing the center of the field, rounded toward the origin
    pub fn center(&self) -> Position {
        Position::new(
            (self.width / 2) / self.block * self.block,
            (self.height / 2) / self.block * self.block,
        )
    }

    /// Wall test: true if the position lies outside the playable range
    pub fn is_outside(&self, pos: Position) -> bool {
        pos.x < 0 || pos.x > self.max_x() || pos.y < 0 || pos.y > self.max_y()
    }

    /// True if the position is inside the field and on a block boundary
    pub fn is_aligned_cell(&self, pos: Position) -> bool {
        !self.is_outside(pos) && pos.x % self.block == 0 && pos.y % self.block == 0
    }

    /// All cells, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows())
            .flat_map(move |row| (0..self.columns()).map(move |col| self.cell(col, row)))
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    pub body: VecDeque<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a snake whose body trails behind `head`, one block per segment
    pub fn new(head: Position, direction: Direction, length: usize, block: i32) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length as i32)
            .map(|i| head.moved_by(-dx * block * i, -dy * block * i))
            .collect();

        Self { body, direction }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments(
        segments: impl IntoIterator<Item = Position>,
        direction: Direction,
    ) -> Self {
        Self {
            body: segments.into_iter().collect(),
            direction,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Option<Position> {
        self.body.back().copied()
    }

    /// Segments after the head
    pub fn body_segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter().skip(1)
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().any(|segment| *segment == pos)
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn push_head(&mut self, head: Position) {
        self.body.push_front(head);
    }

    pub fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop_back()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Complete observable state of one episode
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub score: u32,
    /// Steps taken this episode, used by the stall guard
    pub frame_iteration: u32,
    pub is_alive: bool,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Position) -> Self {
        Self {
            snake,
            food,
            score: 0,
            frame_iteration: 0,
            is_alive: true,
        }
    }
}
