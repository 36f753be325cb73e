use std::collections::VecDeque;

use crate::config::GridSize;
use crate::input::{Direction, direction_change_is_valid};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Converts a pixel coordinate on the logical screen to the containing cell.
    #[must_use]
    pub fn from_pixels(x: i32, y: i32, cell_size: u32) -> Self {
        let size = i32::try_from(cell_size).unwrap_or(i32::MAX).max(1);
        Self {
            x: x.div_euclid(size),
            y: y.div_euclid(size),
        }
    }

    /// Returns the pixel coordinate of the cell's top-left corner.
    #[must_use]
    pub fn to_pixels(self, cell_size: u32) -> (i32, i32) {
        let size = i32::try_from(cell_size).unwrap_or(i32::MAX);
        (self.x.saturating_mul(size), self.y.saturating_mul(size))
    }

    /// Returns true when the cell lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring cell one step towards `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::new(self.x, self.y - 1),
            Direction::Down => Self::new(self.x, self.y + 1),
            Direction::Left => Self::new(self.x - 1, self.y),
            Direction::Right => Self::new(self.x + 1, self.y),
        }
    }
}

/// One of the four quarter-turn rotations used to orient head and tail sprites.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Rotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Head rotation for a heading; the unrotated head sprite faces left.
    #[must_use]
    pub fn for_head(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Deg90,
            Direction::Down => Self::Deg270,
            Direction::Left => Self::Deg0,
            Direction::Right => Self::Deg180,
        }
    }

    /// Tail rotation from the offset between the tail and the segment ahead of it.
    #[must_use]
    pub fn for_tail(ahead: GridCell, tail: GridCell) -> Self {
        if ahead.x == tail.x {
            if ahead.y < tail.y { Self::Deg90 } else { Self::Deg270 }
        } else if ahead.x < tail.x {
            Self::Deg0
        } else {
            Self::Deg180
        }
    }

    #[must_use]
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

/// Length of a freshly reset snake.
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Snake body plus the direction state that drives it.
///
/// `heading` is the direction of the last applied move; `pending` is the
/// direction the next move will take.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<GridCell>,
    heading: Direction,
    pending: Direction,
}

impl Snake {
    /// Creates the three-cell starting snake: head at the grid centre, body
    /// trailing to the left, heading right.
    #[must_use]
    pub fn centered(bounds: GridSize) -> Self {
        let head = GridCell::new(i32::from(bounds.width / 2), i32::from(bounds.height / 2));
        let segments = (0..INITIAL_SNAKE_LENGTH)
            .map(|offset| GridCell::new(head.x - offset as i32, head.y))
            .collect();

        Self::from_segments(segments, Direction::Right)
    }

    /// Creates a snake from explicit body segments (front is head).
    #[must_use]
    pub fn from_segments(segments: Vec<GridCell>, direction: Direction) -> Self {
        debug_assert!(!segments.is_empty(), "snake needs at least one segment");

        Self {
            body: VecDeque::from(segments),
            heading: direction,
            pending: direction,
        }
    }

    /// Requests `direction` for the next move. Reversals of the heading are ignored.
    pub fn steer(&mut self, direction: Direction) {
        if direction_change_is_valid(self.heading, direction) {
            self.pending = direction;
        }
    }

    /// Returns where the head would land on the next move.
    #[must_use]
    pub fn next_head(&self) -> GridCell {
        step(self.pending, self.head())
    }

    /// Commits one move to `candidate`. The tail is kept when `grew` is set.
    ///
    /// Callers must have cleared `candidate` with the collision detector first.
    pub fn apply_move(&mut self, candidate: GridCell, grew: bool) {
        self.heading = self.pending;
        self.body.push_front(candidate);
        if !grew {
            let _ = self.body.pop_back();
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> GridCell {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns the tail position.
    #[must_use]
    pub fn tail(&self) -> GridCell {
        *self
            .body
            .back()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: GridCell) -> bool {
        self.body.contains(&cell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Direction of the last applied move.
    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Direction the next move will take.
    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &GridCell> {
        self.body.iter()
    }

    /// Rotation of the tail sprite, or `None` for a one-cell snake.
    #[must_use]
    pub fn tail_rotation(&self) -> Option<Rotation> {
        let len = self.body.len();
        if len < 2 {
            return None;
        }
        Some(Rotation::for_tail(self.body[len - 2], self.body[len - 1]))
    }
}

/// Translates `head` by one cell along `direction`.
#[must_use]
pub fn step(direction: Direction, head: GridCell) -> GridCell {
    head.step(direction)
}
