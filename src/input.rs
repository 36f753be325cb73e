use crate::game::GamePhase;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// Keys the input source reports.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Key {
    Arrow(Direction),
    Confirm,
    Settings,
    VolumeUp,
    VolumeDown,
    Back,
}

/// Raw device events delivered by an input source.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RawEvent {
    Quit,
    KeyDown(Key),
    /// Pointer press in logical screen pixels.
    PointerDown { x: i32, y: i32 },
}

/// Semantic intents consumed by the state machine and the scheduler.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Intent {
    Start,
    OpenSettings,
    Back,
    VolumeUp,
    VolumeDown,
    Turn(Direction),
    Quit,
}

/// Axis-aligned button rectangle in logical screen pixels.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Button {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub label: &'static str,
}

impl Button {
    /// Edge-inclusive hit test.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Clickable buttons of the menu and settings screens.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ButtonLayout {
    pub start: Button,
    pub settings: Button,
    pub volume_up: Button,
    pub volume_down: Button,
    pub back: Button,
}

impl ButtonLayout {
    /// Lays the buttons out for a screen `screen_width` pixels wide.
    #[must_use]
    pub fn for_screen(screen_width: u32) -> Self {
        let center = i32::try_from(screen_width / 2).unwrap_or(i32::MAX);

        Self {
            start: Button {
                x: center - 50,
                y: 300,
                width: 100,
                height: 50,
                label: "START",
            },
            settings: Button {
                x: center - 50,
                y: 400,
                width: 100,
                height: 50,
                label: "SETTINGS",
            },
            volume_up: Button {
                x: center - 150,
                y: 300,
                width: 80,
                height: 50,
                label: "VOL +",
            },
            volume_down: Button {
                x: center + 50,
                y: 300,
                width: 80,
                height: 50,
                label: "VOL -",
            },
            back: Button {
                x: 0,
                y: 0,
                width: 50,
                height: 50,
                label: "BACK",
            },
        }
    }

    /// Buttons visible in `phase`, in draw order.
    #[must_use]
    pub fn visible_in(&self, phase: GamePhase) -> Vec<Button> {
        match phase {
            GamePhase::Menu => vec![self.start, self.settings],
            GamePhase::Settings => vec![self.volume_up, self.volume_down, self.back],
            GamePhase::Playing | GamePhase::GameOver => Vec::new(),
        }
    }
}

/// Turns raw device events into intents for the current phase.
#[derive(Debug, Clone, Copy)]
pub struct InputTranslator {
    layout: ButtonLayout,
}

impl InputTranslator {
    #[must_use]
    pub fn new(layout: ButtonLayout) -> Self {
        Self { layout }
    }

    /// Translates one event. `heading` is the snake's current effective direction.
    #[must_use]
    pub fn translate(
        &self,
        event: RawEvent,
        phase: GamePhase,
        heading: Direction,
    ) -> Option<Intent> {
        match event {
            RawEvent::Quit => Some(Intent::Quit),
            RawEvent::KeyDown(key) => translate_key(key, phase, heading),
            RawEvent::PointerDown { x, y } => self.translate_click(x, y, phase),
        }
    }

    fn translate_click(&self, x: i32, y: i32, phase: GamePhase) -> Option<Intent> {
        let layout = &self.layout;
        match phase {
            GamePhase::Menu if layout.start.contains(x, y) => Some(Intent::Start),
            GamePhase::Menu if layout.settings.contains(x, y) => Some(Intent::OpenSettings),
            GamePhase::Settings if layout.volume_up.contains(x, y) => Some(Intent::VolumeUp),
            GamePhase::Settings if layout.volume_down.contains(x, y) => Some(Intent::VolumeDown),
            GamePhase::Settings if layout.back.contains(x, y) => Some(Intent::Back),
            _ => None,
        }
    }
}

fn translate_key(key: Key, phase: GamePhase, heading: Direction) -> Option<Intent> {
    match (phase, key) {
        (GamePhase::Playing, Key::Arrow(direction)) => {
            direction_change_is_valid(heading, direction).then_some(Intent::Turn(direction))
        }
        (GamePhase::Menu, Key::Confirm) => Some(Intent::Start),
        (GamePhase::Menu, Key::Settings) => Some(Intent::OpenSettings),
        (GamePhase::Settings, Key::VolumeUp) => Some(Intent::VolumeUp),
        (GamePhase::Settings, Key::VolumeDown) => Some(Intent::VolumeDown),
        (GamePhase::Settings, Key::Back) => Some(Intent::Back),
        _ => None,
    }
}
