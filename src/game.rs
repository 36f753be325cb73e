use std::time::{Duration, Instant};

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::audio::{volume_down, volume_up, AudioSink};
use crate::collision::{classify, Collision};
use crate::config::{GameConfig, GridSize};
use crate::input::{Direction, Intent};
use crate::snake::{GridCell, Rotation, Snake};
use crate::spawn::SpawnGenerator;

/// Top-level mode of the game.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GamePhase {
    Menu,
    Playing,
    Settings,
    GameOver,
}

/// Phase tag with the data that only exists inside that phase.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum PhaseState {
    Menu,
    Playing,
    Settings,
    GameOver { entered_at: Instant },
}

impl PhaseState {
    fn phase(self) -> GamePhase {
        match self {
            Self::Menu => GamePhase::Menu,
            Self::Playing => GamePhase::Playing,
            Self::Settings => GamePhase::Settings,
            Self::GameOver { .. } => GamePhase::GameOver,
        }
    }
}

/// Phase state machine plus the board it drives while playing.
#[derive(Debug, Clone)]
pub struct GameStateMachine {
    pub snake: Snake,
    pub food: Option<GridCell>,
    pub obstacles: Vec<GridCell>,
    phase: PhaseState,
    last_collision: Option<Collision>,
    bounds: GridSize,
    game_over_duration: Duration,
    spawner: SpawnGenerator,
}

impl GameStateMachine {
    /// Creates a machine in the menu, seeded from OS entropy.
    #[must_use]
    pub fn new(config: &GameConfig, bounds: GridSize) -> Self {
        Self::with_rng(config, bounds, StdRng::from_entropy())
    }

    /// Creates a deterministic machine for tests and reproducible runs.
    #[must_use]
    pub fn new_with_seed(config: &GameConfig, bounds: GridSize, seed: u64) -> Self {
        Self::with_rng(config, bounds, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, bounds: GridSize, rng: StdRng) -> Self {
        let spawner = SpawnGenerator::new(
            rng,
            bounds,
            config.obstacle_count,
            config.obstacle_safety_radius,
            config.obstacle_placement,
        );

        Self {
            snake: Snake::centered(bounds),
            food: None,
            obstacles: Vec::new(),
            phase: PhaseState::Menu,
            last_collision: None,
            bounds,
            game_over_duration: config.game_over_duration(),
            spawner,
        }
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase.phase()
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    /// Instant the current game-over screen was entered, if one is showing.
    #[must_use]
    pub fn game_over_since(&self) -> Option<Instant> {
        match self.phase {
            PhaseState::GameOver { entered_at } => Some(entered_at),
            _ => None,
        }
    }

    /// What ended the last game.
    #[must_use]
    pub fn last_collision(&self) -> Option<Collision> {
        self.last_collision
    }

    /// Snake's effective direction, used to filter reversals.
    #[must_use]
    pub fn heading(&self) -> Direction {
        self.snake.heading()
    }

    /// Runs one tick: applies `intents` in order, then the per-tick work of the
    /// current phase. A tick whose intents changed the phase does no further work.
    pub fn update<A: AudioSink + ?Sized>(
        &mut self,
        audio: &mut A,
        intents: &[Intent],
        now: Instant,
    ) {
        let entry = self.phase();
        for intent in intents {
            self.handle_intent(audio, *intent);
        }
        if self.phase() != entry {
            return;
        }

        match self.phase {
            PhaseState::Playing => self.advance(now),
            PhaseState::GameOver { entered_at } => {
                if now.saturating_duration_since(entered_at) >= self.game_over_duration {
                    self.transition(PhaseState::Menu);
                }
            }
            PhaseState::Menu | PhaseState::Settings => {}
        }
    }

    fn handle_intent<A: AudioSink + ?Sized>(&mut self, audio: &mut A, intent: Intent) {
        match (self.phase, intent) {
            (PhaseState::Menu, Intent::Start) => {
                self.reset();
                self.transition(PhaseState::Playing);
            }
            (PhaseState::Menu, Intent::OpenSettings) => self.transition(PhaseState::Settings),
            (PhaseState::Settings, Intent::Back) => self.transition(PhaseState::Menu),
            (PhaseState::Settings, Intent::VolumeUp) => {
                volume_up(audio);
            }
            (PhaseState::Settings, Intent::VolumeDown) => {
                volume_down(audio);
            }
            (PhaseState::Playing, Intent::Turn(direction)) => self.snake.steer(direction),
            _ => {}
        }
    }

    /// Reinitialises snake, food and obstacles for a new game.
    pub fn reset(&mut self) {
        self.snake = Snake::centered(self.bounds);
        self.obstacles.clear();
        self.last_collision = None;
        self.food = self.spawner.place_food(&self.snake, &self.obstacles);
        self.obstacles = self.spawner.place_obstacles(&self.snake, self.food);
    }

    fn advance(&mut self, now: Instant) {
        if self.food.is_none() {
            self.food = self.spawner.place_food(&self.snake, &self.obstacles);
        }

        let candidate = self.snake.next_head();
        if let Some(collision) = classify(candidate, self.bounds, &self.obstacles, &self.snake) {
            info!(
                "collision at ({}, {}): {}",
                candidate.x,
                candidate.y,
                collision.describe()
            );
            self.last_collision = Some(collision);
            self.transition(PhaseState::GameOver { entered_at: now });
            return;
        }

        let grew = self.food == Some(candidate);
        self.snake.apply_move(candidate, grew);

        if grew {
            info!("food eaten, snake length {}", self.snake.len());
            self.food = self.spawner.place_food(&self.snake, &self.obstacles);
            self.obstacles = self.spawner.place_obstacles(&self.snake, self.food);
        }
    }

    fn transition(&mut self, next: PhaseState) {
        info!("phase {:?} -> {:?}", self.phase(), next.phase());
        self.phase = next;
    }

    /// Builds the read-only view handed to the render sink.
    #[must_use]
    pub fn snapshot(&self, volume: u8) -> Snapshot<'_> {
        let len = self.snake.len();
        let segments = self
            .snake
            .segments()
            .enumerate()
            .map(|(index, cell)| {
                let kind = if index == 0 {
                    SegmentKind::Head(Rotation::for_head(self.snake.heading()))
                } else if index + 1 == len {
                    match self.snake.tail_rotation() {
                        Some(rotation) => SegmentKind::Tail(rotation),
                        None => SegmentKind::Body,
                    }
                } else {
                    SegmentKind::Body
                };
                SegmentView { cell: *cell, kind }
            })
            .collect();

        let overlay = match self.phase {
            PhaseState::GameOver { .. } => Some(GameOverOverlay {
                title: "GAME OVER",
                cause: self.last_collision.map(Collision::describe),
            }),
            _ => None,
        };

        Snapshot {
            phase: self.phase(),
            bounds: self.bounds,
            segments,
            food: self.food,
            obstacles: &self.obstacles,
            overlay,
            volume,
        }
    }
}

/// How a snake cell should be drawn.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SegmentKind {
    Head(Rotation),
    Body,
    Tail(Rotation),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SegmentView {
    pub cell: GridCell,
    pub kind: SegmentKind,
}

/// Text shown over the board after a collision.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameOverOverlay {
    pub title: &'static str,
    pub cause: Option<&'static str>,
}

/// Per-tick read-only view of the game for rendering.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub bounds: GridSize,
    pub segments: Vec<SegmentView>,
    pub food: Option<GridCell>,
    pub obstacles: &'a [GridCell],
    pub overlay: Option<GameOverOverlay>,
    pub volume: u8,
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::audio::{AudioSink, Mixer, MAX_VOLUME};
    use crate::collision::Collision;
    use crate::config::{GameConfig, GridSize};
    use crate::input::{Direction, Intent};
    use crate::snake::{GridCell, Rotation, Snake};

    use super::{GamePhase, GameStateMachine, SegmentKind};

    const GRID: GridSize = GridSize {
        width: 32,
        height: 24,
    };

    fn started(seed: u64) -> (GameStateMachine, Mixer, Instant) {
        let mut machine = GameStateMachine::new_with_seed(&GameConfig::default(), GRID, seed);
        let mut mixer = Mixer::default();
        let now = Instant::now();
        machine.update(&mut mixer, &[Intent::Start], now);
        (machine, mixer, now)
    }

    #[test]
    fn machine_starts_in_menu() {
        let machine = GameStateMachine::new_with_seed(&GameConfig::default(), GRID, 1);

        assert_eq!(machine.phase(), GamePhase::Menu);
        assert_eq!(machine.game_over_since(), None);
    }

    #[test]
    fn start_resets_board_without_moving() {
        for seed in 0..50 {
            let (machine, _, _) = started(seed);

            assert_eq!(machine.phase(), GamePhase::Playing);
            assert_eq!(machine.snake.len(), 3);
            assert_eq!(machine.snake.head(), GridCell::new(16, 12));

            let food = machine.food.expect("empty board always has room for food");
            assert!(!machine.snake.occupies(food));
            assert!(!machine.obstacles.contains(&food));
        }
    }

    #[test]
    fn settings_round_trip_adjusts_volume_only() {
        let mut machine = GameStateMachine::new_with_seed(&GameConfig::default(), GRID, 2);
        let mut mixer = Mixer::new(100);
        let now = Instant::now();

        machine.update(&mut mixer, &[Intent::OpenSettings], now);
        assert_eq!(machine.phase(), GamePhase::Settings);

        machine.update(&mut mixer, &[Intent::VolumeUp], now);
        assert_eq!(machine.phase(), GamePhase::Settings);
        assert_eq!(mixer.volume(), MAX_VOLUME);

        machine.update(&mut mixer, &[Intent::VolumeDown, Intent::VolumeDown], now);
        assert_eq!(mixer.volume(), 72);

        machine.update(&mut mixer, &[Intent::Back], now);
        assert_eq!(machine.phase(), GamePhase::Menu);
    }

    #[test]
    fn intents_for_other_phases_are_ignored() {
        let mut machine = GameStateMachine::new_with_seed(&GameConfig::default(), GRID, 3);
        let mut mixer = Mixer::new(56);
        let now = Instant::now();

        machine.update(
            &mut mixer,
            &[Intent::Back, Intent::VolumeUp, Intent::Turn(Direction::Up)],
            now,
        );

        assert_eq!(machine.phase(), GamePhase::Menu);
        assert_eq!(mixer.volume(), 56);
    }

    #[test]
    fn playing_tick_moves_snake_one_cell() {
        let (mut machine, mut mixer, now) = started(4);
        machine.obstacles.clear();
        machine.food = Some(GridCell::new(0, 0));

        machine.update(&mut mixer, &[], now);

        assert_eq!(machine.snake.head(), GridCell::new(17, 12));
        assert_eq!(machine.snake.len(), 3);
    }

    #[test]
    fn turn_intent_changes_next_move() {
        let (mut machine, mut mixer, now) = started(5);
        machine.obstacles.clear();
        machine.food = Some(GridCell::new(0, 0));

        machine.update(&mut mixer, &[Intent::Turn(Direction::Up)], now);

        assert_eq!(machine.snake.head(), GridCell::new(16, 11));
        assert_eq!(machine.heading(), Direction::Up);
    }

    #[test]
    fn obstacle_ahead_ends_game() {
        let (mut machine, mut mixer, now) = started(6);
        machine.obstacles = vec![GridCell::new(17, 12)];

        machine.update(&mut mixer, &[], now);

        assert_eq!(machine.phase(), GamePhase::GameOver);
        assert_eq!(machine.last_collision(), Some(Collision::Obstacle));
        assert_eq!(machine.game_over_since(), Some(now));
    }

    #[test]
    fn moving_into_own_tail_is_fatal() {
        let (mut machine, mut mixer, now) = started(7);
        machine.obstacles.clear();
        machine.food = Some(GridCell::new(0, 0));
        machine.snake = Snake::from_segments(
            vec![
                GridCell::new(5, 5),
                GridCell::new(5, 6),
                GridCell::new(6, 6),
                GridCell::new(6, 5),
            ],
            Direction::Right,
        );

        machine.update(&mut mixer, &[], now);

        assert_eq!(machine.phase(), GamePhase::GameOver);
        assert_eq!(machine.last_collision(), Some(Collision::SelfBody));
        assert_eq!(machine.snake.len(), 4);
    }

    #[test]
    fn missing_food_is_replaced_on_next_tick() {
        let (mut machine, mut mixer, now) = started(8);
        machine.obstacles.clear();
        machine.food = None;

        machine.update(&mut mixer, &[], now);

        let food = machine.food.expect("food should be placed again");
        assert!(!machine.snake.occupies(food));
    }

    #[test]
    fn snapshot_orients_head_and_tail() {
        let (machine, mixer, _) = started(9);
        let snapshot = machine.snapshot(mixer.volume());

        assert_eq!(snapshot.phase, GamePhase::Playing);
        assert_eq!(snapshot.segments.len(), 3);
        assert_eq!(snapshot.segments[0].kind, SegmentKind::Head(Rotation::Deg180));
        assert_eq!(snapshot.segments[1].kind, SegmentKind::Body);
        assert_eq!(snapshot.segments[2].kind, SegmentKind::Tail(Rotation::Deg180));
        assert_eq!(snapshot.overlay, None);
        assert_eq!(snapshot.volume, MAX_VOLUME);
    }

    #[test]
    fn game_over_snapshot_carries_overlay() {
        let (mut machine, mut mixer, now) = started(10);
        machine.obstacles.clear();
        machine.snake = Snake::from_segments(
            vec![GridCell::new(31, 0), GridCell::new(30, 0), GridCell::new(29, 0)],
            Direction::Right,
        );

        machine.update(&mut mixer, &[], now);
        let overlay = machine
            .snapshot(mixer.volume())
            .overlay
            .expect("game over shows an overlay");

        assert_eq!(overlay.title, "GAME OVER");
        assert_eq!(overlay.cause, Some("hit the wall"));
    }

    #[test]
    fn restart_after_game_over_resets_direction() {
        let (mut machine, mut mixer, now) = started(11);
        machine.obstacles.clear();
        machine.snake = Snake::from_segments(
            vec![GridCell::new(0, 3), GridCell::new(1, 3), GridCell::new(2, 3)],
            Direction::Left,
        );
        machine.update(&mut mixer, &[], now);
        assert_eq!(machine.phase(), GamePhase::GameOver);

        let later = now + Duration::from_millis(5000);
        machine.update(&mut mixer, &[], later);
        assert_eq!(machine.phase(), GamePhase::Menu);

        machine.update(&mut mixer, &[Intent::Start], later);
        assert_eq!(machine.heading(), Direction::Right);
        assert_eq!(machine.last_collision(), None);
    }
}
