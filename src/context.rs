use crate::audio::AudioSink;
use crate::config::{GameConfig, GridSize};
use crate::input::ButtonLayout;

/// Everything the run loop needs besides the game itself, owned in one place.
///
/// `F` is the frontend that produces input and consumes snapshots; `A` is the
/// audio sink driven by the settings screen.
#[derive(Debug)]
pub struct AppContext<F, A> {
    pub config: GameConfig,
    pub bounds: GridSize,
    pub buttons: ButtonLayout,
    pub frontend: F,
    pub audio: A,
}

impl<F, A: AudioSink> AppContext<F, A> {
    #[must_use]
    pub fn new(config: GameConfig, bounds: GridSize, frontend: F, audio: A) -> Self {
        let buttons = ButtonLayout::for_screen(config.screen_width);

        Self {
            config,
            bounds,
            buttons,
            frontend,
            audio,
        }
    }
}
