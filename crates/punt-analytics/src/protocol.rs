// Messages exchanged between the playback driver and the TUI.

use crate::animation::field::FieldLayer;
use crate::animation::FrameArtists;

/// One rendered frame and where it sits in the play.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// Zero-based position in the play's frame list.
    pub index: usize,
    pub total: usize,
    pub artists: FrameArtists,
}

/// Updates pushed from the playback driver to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Title and static field layer; sent once before the first frame.
    Field {
        title: String,
        layer: Box<FieldLayer>,
    },
    Frame(Box<FrameSnapshot>),
    PlaybackStatus { paused: bool },
}

/// Commands sent from the TUI to the playback driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    TogglePause,
    StepForward,
    StepBack,
    Restart,
    Quit,
}
