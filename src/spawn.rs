use log::{debug, warn};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{GridSize, ObstaclePlacement};
use crate::snake::{GridCell, Snake};

/// Rejected uniform samples tolerated before food placement scans for free cells.
pub const MAX_FOOD_SAMPLES: usize = 64;

/// Draws a uniformly distributed cell inside `bounds`.
#[must_use]
pub fn random_cell<R: Rng + ?Sized>(rng: &mut R, bounds: GridSize) -> GridCell {
    GridCell {
        x: rng.gen_range(0..i32::from(bounds.width)),
        y: rng.gen_range(0..i32::from(bounds.height)),
    }
}

/// Picks a food cell outside the snake and the obstacles.
///
/// Rejection-samples up to [`MAX_FOOD_SAMPLES`] times, then picks uniformly
/// among the remaining free cells. Returns `None` only when the board is full.
#[must_use]
pub fn place_food<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
    obstacles: &[GridCell],
) -> Option<GridCell> {
    let forbidden = |cell: GridCell| snake.occupies(cell) || obstacles.contains(&cell);

    for _ in 0..MAX_FOOD_SAMPLES {
        let candidate = random_cell(rng, bounds);
        if !forbidden(candidate) {
            return Some(candidate);
        }
    }

    let mut candidates = Vec::new();
    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            let cell = GridCell { x, y };
            if !forbidden(cell) {
                candidates.push(cell);
            }
        }
    }

    if candidates.is_empty() {
        warn!(
            "no free cell for food on the {}x{} board",
            bounds.width, bounds.height
        );
        return None;
    }

    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

/// Returns true when `cell` lies inside the square of `radius` cells around `head`.
#[must_use]
pub fn within_safety_box(cell: GridCell, head: GridCell, radius: i32) -> bool {
    (cell.x - head.x).abs() <= radius && (cell.y - head.y).abs() <= radius
}

/// Generates a fresh obstacle set.
///
/// Draws exactly `count` candidates. A candidate on the snake, on the food or
/// inside the safety box around the head is dropped without a redraw, so the
/// result can hold fewer than `count` cells.
#[must_use]
pub fn place_obstacles<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    request: ObstacleRequest<'_>,
) -> Vec<GridCell> {
    let head = request.snake.head();
    let mut obstacles = Vec::with_capacity(request.count.min(bounds.total_cells()));

    for _ in 0..request.count {
        let candidate = random_cell(rng, bounds);
        if request.snake.occupies(candidate)
            || request.food == Some(candidate)
            || within_safety_box(candidate, head, request.safety_radius)
        {
            continue;
        }

        let stored = match request.placement {
            ObstaclePlacement::Validated => candidate,
            ObstaclePlacement::ResampleOnAccept => random_cell(rng, bounds),
        };
        obstacles.push(stored);
    }

    debug!(
        "placed {} of {} obstacles around head ({}, {})",
        obstacles.len(),
        request.count,
        head.x,
        head.y
    );
    obstacles
}

/// Inputs for one obstacle regeneration.
#[derive(Debug, Clone, Copy)]
pub struct ObstacleRequest<'a> {
    pub count: usize,
    pub snake: &'a Snake,
    pub food: Option<GridCell>,
    pub safety_radius: i32,
    pub placement: ObstaclePlacement,
}

/// Owns the random source and board rules used for food and obstacle placement.
#[derive(Debug, Clone)]
pub struct SpawnGenerator {
    rng: StdRng,
    bounds: GridSize,
    obstacle_count: usize,
    safety_radius: i32,
    placement: ObstaclePlacement,
}

impl SpawnGenerator {
    #[must_use]
    pub fn new(
        rng: StdRng,
        bounds: GridSize,
        obstacle_count: usize,
        safety_radius: i32,
        placement: ObstaclePlacement,
    ) -> Self {
        Self {
            rng,
            bounds,
            obstacle_count,
            safety_radius,
            placement,
        }
    }

    /// Creates a generator with a fixed seed for reproducible runs.
    #[must_use]
    pub fn with_seed(bounds: GridSize, obstacle_count: usize, seed: u64) -> Self {
        Self::new(
            StdRng::seed_from_u64(seed),
            bounds,
            obstacle_count,
            10,
            ObstaclePlacement::Validated,
        )
    }

    /// Places food outside `snake` and `obstacles`.
    pub fn place_food(&mut self, snake: &Snake, obstacles: &[GridCell]) -> Option<GridCell> {
        place_food(&mut self.rng, self.bounds, snake, obstacles)
    }

    /// Replaces the obstacle set for the current snake and food.
    pub fn place_obstacles(&mut self, snake: &Snake, food: Option<GridCell>) -> Vec<GridCell> {
        place_obstacles(
            &mut self.rng,
            self.bounds,
            ObstacleRequest {
                count: self.obstacle_count,
                snake,
                food,
                safety_radius: self.safety_radius,
                placement: self.placement,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::{GridSize, ObstaclePlacement};
    use crate::input::Direction;
    use crate::snake::{GridCell, Snake};

    use super::{
        ObstacleRequest, SpawnGenerator, place_food, place_obstacles, random_cell,
        within_safety_box,
    };

    const GRID: GridSize = GridSize {
        width: 32,
        height: 24,
    };

    #[test]
    fn food_never_lands_on_snake_or_obstacles() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake = Snake::centered(GRID);
        let obstacles = vec![GridCell::new(0, 0), GridCell::new(31, 23), GridCell::new(5, 20)];

        for _ in 0..500 {
            let food = place_food(&mut rng, GRID, &snake, &obstacles).expect("board has room");
            assert!(!snake.occupies(food));
            assert!(!obstacles.contains(&food));
            assert!(food.is_within_bounds(GRID));
        }
    }

    #[test]
    fn food_finds_the_last_free_cell() {
        let bounds = GridSize {
            width: 4,
            height: 2,
        };
        let snake = Snake::from_segments(
            vec![
                GridCell::new(0, 0),
                GridCell::new(1, 0),
                GridCell::new(2, 0),
                GridCell::new(3, 0),
            ],
            Direction::Left,
        );
        let obstacles = vec![GridCell::new(0, 1), GridCell::new(1, 1), GridCell::new(3, 1)];
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(
            place_food(&mut rng, bounds, &snake, &obstacles),
            Some(GridCell::new(2, 1))
        );
    }

    #[test]
    fn full_board_yields_no_food() {
        let bounds = GridSize {
            width: 2,
            height: 1,
        };
        let snake = Snake::from_segments(
            vec![GridCell::new(0, 0), GridCell::new(1, 0)],
            Direction::Left,
        );
        let mut rng = StdRng::seed_from_u64(11);

        assert_eq!(place_food(&mut rng, bounds, &snake, &[]), None);
    }

    #[test]
    fn safety_box_is_inclusive() {
        let head = GridCell::new(16, 12);

        assert!(within_safety_box(GridCell::new(26, 2), head, 10));
        assert!(within_safety_box(GridCell::new(6, 22), head, 10));
        assert!(!within_safety_box(GridCell::new(27, 12), head, 10));
        assert!(!within_safety_box(GridCell::new(16, 23), head, 10));
    }

    #[test]
    fn validated_obstacles_respect_every_constraint() {
        let mut rng = StdRng::seed_from_u64(21);
        let snake = Snake::centered(GRID);
        let food = Some(GridCell::new(30, 1));

        for _ in 0..200 {
            let obstacles = place_obstacles(
                &mut rng,
                GRID,
                ObstacleRequest {
                    count: 10,
                    snake: &snake,
                    food,
                    safety_radius: 10,
                    placement: ObstaclePlacement::Validated,
                },
            );

            assert!(obstacles.len() <= 10);
            for obstacle in obstacles {
                assert!(!snake.occupies(obstacle));
                assert_ne!(Some(obstacle), food);
                assert!(!within_safety_box(obstacle, snake.head(), 10));
            }
        }
    }

    #[test]
    fn rejected_candidates_are_not_redrawn() {
        let mut rng = StdRng::seed_from_u64(5);
        let snake = Snake::centered(GRID);

        // A radius covering the whole board rejects every draw.
        let obstacles = place_obstacles(
            &mut rng,
            GRID,
            ObstacleRequest {
                count: 10,
                snake: &snake,
                food: None,
                safety_radius: 40,
                placement: ObstaclePlacement::Validated,
            },
        );

        assert!(obstacles.is_empty());
    }

    #[test]
    fn resample_on_accept_still_stores_cells_on_the_board() {
        let mut rng = StdRng::seed_from_u64(9);
        let snake = Snake::centered(GRID);

        let obstacles = place_obstacles(
            &mut rng,
            GRID,
            ObstacleRequest {
                count: 50,
                snake: &snake,
                food: None,
                safety_radius: 0,
                placement: ObstaclePlacement::ResampleOnAccept,
            },
        );

        assert!(!obstacles.is_empty());
        assert!(obstacles.len() <= 50);
        assert!(obstacles.iter().all(|cell| cell.is_within_bounds(GRID)));
    }

    #[test]
    fn resample_on_accept_stores_the_draw_after_each_accepted_candidate() {
        let snake = Snake::centered(GRID);
        let request = |placement| ObstacleRequest {
            count: 10,
            snake: &snake,
            food: None,
            safety_radius: 0,
            placement,
        };

        let mut replay = StdRng::seed_from_u64(13);
        let mut expected = Vec::new();
        for _ in 0..10 {
            let candidate = random_cell(&mut replay, GRID);
            if !snake.occupies(candidate) && !within_safety_box(candidate, snake.head(), 0) {
                expected.push(random_cell(&mut replay, GRID));
            }
        }

        let resampled = place_obstacles(
            &mut StdRng::seed_from_u64(13),
            GRID,
            request(ObstaclePlacement::ResampleOnAccept),
        );
        let validated = place_obstacles(
            &mut StdRng::seed_from_u64(13),
            GRID,
            request(ObstaclePlacement::Validated),
        );

        assert!(!expected.is_empty());
        assert_eq!(resampled, expected);
        assert_ne!(resampled, validated);
    }

    #[test]
    fn seeded_generators_are_reproducible() {
        let snake = Snake::centered(GRID);
        let mut first = SpawnGenerator::with_seed(GRID, 10, 42);
        let mut second = SpawnGenerator::with_seed(GRID, 10, 42);

        assert_eq!(first.place_food(&snake, &[]), second.place_food(&snake, &[]));
        assert_eq!(
            first.place_obstacles(&snake, None),
            second.place_obstacles(&snake, None)
        );
    }
}
