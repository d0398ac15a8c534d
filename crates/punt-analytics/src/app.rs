// Playback driver: owns the play animation and advances it on a timer.
//
// The driver pushes `UiUpdate`s to the TUI and reacts to `UserCommand`s.
// The field layer is sent once; every frame change sends a fresh snapshot
// of the artists.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::animation::PlayAnimation;
use crate::config::AnimationSettings;
use crate::protocol::{FrameSnapshot, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub animation: PlayAnimation,
    /// Index into the animation's frame ids.
    position: usize,
    paused: bool,
    loop_playback: bool,
    interval: Duration,
}

impl AppState {
    pub fn new(animation: PlayAnimation, settings: &AnimationSettings) -> Self {
        AppState {
            animation,
            position: 0,
            paused: false,
            loop_playback: settings.loop_playback,
            interval: Duration::from_millis(settings.interval_ms.max(1)),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn total(&self) -> usize {
        self.animation.frame_ids().len()
    }

    fn at_end(&self) -> bool {
        self.position + 1 >= self.total()
    }

    /// Move to the next frame, wrapping to the start when looping.
    /// Returns `false` when already on the last frame and not looping.
    pub fn advance(&mut self) -> bool {
        if !self.at_end() {
            self.position += 1;
            true
        } else if self.loop_playback && self.total() > 1 {
            self.position = 0;
            true
        } else {
            false
        }
    }

    /// Move to the previous frame. Never wraps.
    pub fn step_back(&mut self) -> bool {
        if self.position > 0 {
            self.position -= 1;
            true
        } else {
            false
        }
    }

    pub fn restart(&mut self) {
        self.position = 0;
    }

    /// Update the artists to the current frame and copy them out.
    pub fn snapshot(&mut self) -> Option<FrameSnapshot> {
        let total = self.total();
        let frame_id = *self.animation.frame_ids().get(self.position)?;
        let artists = self.animation.update(frame_id).clone();
        Some(FrameSnapshot {
            index: self.position,
            total,
            artists,
        })
    }
}

async fn send_frame(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    if let Some(snapshot) = state.snapshot() {
        let _ = ui_tx.send(UiUpdate::Frame(Box::new(snapshot))).await;
    }
}

async fn set_paused(state: &mut AppState, paused: bool, ui_tx: &mpsc::Sender<UiUpdate>) {
    if state.paused != paused {
        state.paused = paused;
        let _ = ui_tx.send(UiUpdate::PlaybackStatus { paused }).await;
    }
}

// ---------------------------------------------------------------------------
// Command handling
// ---------------------------------------------------------------------------

async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    debug!("User command: {:?}", cmd);
    match cmd {
        UserCommand::TogglePause => {
            let resume = state.paused;
            // Resuming a finished, non-looping play starts it over.
            if resume && state.at_end() && !state.loop_playback {
                state.restart();
                set_paused(state, false, ui_tx).await;
                send_frame(state, ui_tx).await;
            } else {
                set_paused(state, !resume, ui_tx).await;
            }
        }
        UserCommand::StepForward => {
            set_paused(state, true, ui_tx).await;
            if state.advance() {
                send_frame(state, ui_tx).await;
            }
        }
        UserCommand::StepBack => {
            set_paused(state, true, ui_tx).await;
            if state.step_back() {
                send_frame(state, ui_tx).await;
            }
        }
        UserCommand::Restart => {
            state.restart();
            send_frame(state, ui_tx).await;
        }
        UserCommand::Quit => {}
    }
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

/// Run the playback loop until `Quit` or until the command channel closes.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Playback started for {}", state.animation.key());

    let layer = state.animation.base_plot();
    let _ = ui_tx
        .send(UiUpdate::Field {
            title: state.animation.title().to_string(),
            layer: Box::new(layer),
        })
        .await;
    send_frame(&mut state, &ui_tx).await;

    let mut frame_tick = tokio::time::interval(state.interval);
    frame_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; frame 0 is already on screen.
    frame_tick.tick().await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, stopping playback");
                        break;
                    }
                    Some(cmd) => {
                        let was_paused = state.paused;
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                        if was_paused && !state.paused {
                            frame_tick.reset();
                        }
                    }
                    None => {
                        info!("Command channel closed, stopping playback");
                        break;
                    }
                }
            }

            _ = frame_tick.tick(), if !state.paused => {
                if state.advance() {
                    send_frame(&mut state, &ui_tx).await;
                } else {
                    info!("Reached the last frame");
                    set_paused(&mut state, true, &ui_tx).await;
                }
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
