use log::info;

/// Loudest volume the audio sink accepts.
pub const MAX_VOLUME: u8 = 128;

/// Volume change applied by one settings click.
pub const VOLUME_STEP: u8 = 28;

/// Consumer of volume changes made from the settings screen.
pub trait AudioSink {
    /// Returns the current volume in `0..=MAX_VOLUME`.
    fn volume(&self) -> u8;

    /// Sets the volume. Values above `MAX_VOLUME` are clamped.
    fn set_volume(&mut self, volume: u8);
}

/// Raises the sink volume by one step, saturating at `MAX_VOLUME`.
pub fn volume_up<A: AudioSink + ?Sized>(audio: &mut A) -> u8 {
    let volume = audio.volume().saturating_add(VOLUME_STEP).min(MAX_VOLUME);
    audio.set_volume(volume);
    volume
}

/// Lowers the sink volume by one step, saturating at zero.
pub fn volume_down<A: AudioSink + ?Sized>(audio: &mut A) -> u8 {
    let volume = audio.volume().saturating_sub(VOLUME_STEP);
    audio.set_volume(volume);
    volume
}

/// In-process music volume holder.
///
/// There is no playback device behind it; the value is what a real mixer
/// would be handed.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Mixer {
    volume: u8,
}

impl Mixer {
    #[must_use]
    pub fn new(volume: u8) -> Self {
        Self {
            volume: volume.min(MAX_VOLUME),
        }
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new(MAX_VOLUME)
    }
}

impl AudioSink for Mixer {
    fn volume(&self) -> u8 {
        self.volume
    }

    fn set_volume(&mut self, volume: u8) {
        let volume = volume.min(MAX_VOLUME);
        if volume != self.volume {
            info!("music volume {} -> {}", self.volume, volume);
        }
        self.volume = volume;
    }
}
