use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reasons a configuration cannot be loaded or accepted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cell size must be greater than zero")]
    ZeroCellSize,
    #[error("cell size {cell_size} does not evenly divide the {width}x{height} screen")]
    UnevenCells {
        width: u32,
        height: u32,
        cell_size: u32,
    },
    #[error("grid of {width}x{height} cells is too small (need at least 4x1)")]
    GridTooSmall { width: u32, height: u32 },
    #[error("grid of {width}x{height} cells exceeds the supported size")]
    GridTooLarge { width: u32, height: u32 },
    #[error("tick rate must be greater than zero")]
    ZeroTickRate,
    #[error("obstacle safety radius must not be negative (got {0})")]
    NegativeSafetyRadius(i32),
    #[error("{count} obstacles do not fit on a board of {cells} cells")]
    TooManyObstacles { count: usize, cells: usize },
    #[error("initial volume {volume} is outside 0..={max}")]
    VolumeOutOfRange { volume: u8, max: u8 },
}

/// Fatal errors surfaced by the binary before or during the run loop.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}
