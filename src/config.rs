use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::audio::MAX_VOLUME;
use crate::error::ConfigError;

const APP_DIR_NAME: &str = "snake-arcade";
const CONFIG_FILE_NAME: &str = "config.json";

/// Logical grid dimensions in cells.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// What gets stored once an obstacle candidate passes validation.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstaclePlacement {
    /// Store the candidate that was checked against the snake, food and safety box.
    #[default]
    Validated,
    /// Store a fresh sample instead of the checked candidate. The placement
    /// guarantees then only hold by chance.
    ResampleOnAccept,
}

/// Startup configuration, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Logical screen width in pixels.
    pub screen_width: u32,
    /// Logical screen height in pixels.
    pub screen_height: u32,
    /// Edge length of one grid cell in pixels.
    pub cell_size: u32,
    /// Target number of obstacles per regeneration.
    pub obstacle_count: usize,
    /// Half-width, in cells, of the obstacle-free box around the snake head.
    pub obstacle_safety_radius: i32,
    pub obstacle_placement: ObstaclePlacement,
    pub tick_rate_hz: u32,
    /// How long the game-over screen stays up before returning to the menu.
    pub game_over_ms: u64,
    pub initial_volume: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 640,
            screen_height: 480,
            cell_size: 20,
            obstacle_count: 10,
            obstacle_safety_radius: 10,
            obstacle_placement: ObstaclePlacement::Validated,
            tick_rate_hz: 10,
            game_over_ms: 5000,
            initial_volume: MAX_VOLUME,
        }
    }
}

impl GameConfig {
    /// Loads configuration from `explicit` or from the per-user default path.
    ///
    /// An explicit path must exist. The default path is optional and falls
    /// back to built-in defaults when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_path(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Reads and parses a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Checks every startup constraint and returns the derived grid.
    pub fn validate(&self) -> Result<GridSize, ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.screen_width % self.cell_size != 0 || self.screen_height % self.cell_size != 0 {
            return Err(ConfigError::UnevenCells {
                width: self.screen_width,
                height: self.screen_height,
                cell_size: self.cell_size,
            });
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.obstacle_safety_radius < 0 {
            return Err(ConfigError::NegativeSafetyRadius(
                self.obstacle_safety_radius,
            ));
        }
        if self.initial_volume > MAX_VOLUME {
            return Err(ConfigError::VolumeOutOfRange {
                volume: self.initial_volume,
                max: MAX_VOLUME,
            });
        }

        let width = self.screen_width / self.cell_size;
        let height = self.screen_height / self.cell_size;
        if width < 4 || height < 1 {
            return Err(ConfigError::GridTooSmall { width, height });
        }

        let grid = match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) => GridSize {
                width: w,
                height: h,
            },
            _ => return Err(ConfigError::GridTooLarge { width, height }),
        };

        if self.obstacle_count > grid.total_cells() {
            return Err(ConfigError::TooManyObstacles {
                count: self.obstacle_count,
                cells: grid.total_cells(),
            });
        }

        Ok(grid)
    }

    /// Returns the duration of one scheduler tick.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate_hz.max(1)
    }

    #[must_use]
    pub fn game_over_duration(&self) -> Duration {
        Duration::from_millis(self.game_over_ms)
    }
}

/// Returns the platform-correct default config path, if the platform has one.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}

/// Returns the platform-correct default log path.
#[must_use]
pub fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push("snake-arcade.log");
    base
}

/// Creates the parent directory of `path` when it has one.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

pub const COLOR_PLAY_BG: Color = Color::Black;
pub const COLOR_BORDER: Color = Color::DarkGray;
pub const COLOR_SNAKE_HEAD: Color = Color::White;
pub const COLOR_SNAKE_BODY: Color = Color::Green;
pub const COLOR_SNAKE_TAIL: Color = Color::DarkGray;
pub const COLOR_FOOD: Color = Color::Red;
pub const COLOR_OBSTACLE: Color = Color::Gray;
pub const COLOR_BUTTON_BG: Color = Color::Blue;
pub const COLOR_BUTTON_FG: Color = Color::White;
pub const COLOR_TITLE: Color = Color::Green;
pub const COLOR_GAME_OVER: Color = Color::Red;

pub const GLYPH_SNAKE_BODY: &str = "██";
pub const GLYPH_FOOD: &str = "●●";
pub const GLYPH_OBSTACLE: &str = "▓▓";

/// Terminal columns used to draw one grid cell.
pub const COLUMNS_PER_CELL: u16 = 2;
