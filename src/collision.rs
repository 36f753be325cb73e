use crate::config::GridSize;
use crate::snake::{GridCell, Snake};

/// What a candidate head ran into.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Collision {
    Wall,
    Obstacle,
    SelfBody,
}

impl Collision {
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Wall => "hit the wall",
            Self::Obstacle => "hit an obstacle",
            Self::SelfBody => "hit yourself",
        }
    }
}

/// Returns the first collision for `candidate`, checking walls, obstacles and
/// then the body as it is before the move.
///
/// Every body cell counts, including the tail that the move would vacate.
#[must_use]
pub fn classify(
    candidate: GridCell,
    bounds: GridSize,
    obstacles: &[GridCell],
    body: &Snake,
) -> Option<Collision> {
    if !candidate.is_within_bounds(bounds) {
        return Some(Collision::Wall);
    }
    if obstacles.contains(&candidate) {
        return Some(Collision::Obstacle);
    }
    if body.occupies(candidate) {
        return Some(Collision::SelfBody);
    }
    None
}

/// Returns true when `candidate` collides with a wall, an obstacle or the body.
#[must_use]
pub fn check(candidate: GridCell, bounds: GridSize, obstacles: &[GridCell], body: &Snake) -> bool {
    classify(candidate, bounds, obstacles, body).is_some()
}
