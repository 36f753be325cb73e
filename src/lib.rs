pub mod audio;
pub mod collision;
pub mod config;
pub mod context;
pub mod error;
pub mod game;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod snake;
pub mod spawn;
pub mod terminal_runtime;
pub mod ui;
