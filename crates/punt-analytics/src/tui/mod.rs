// Terminal play viewer: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` mirroring what the playback driver has sent.
// The driver pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::animation::field::FieldLayer;
use crate::config::AnimationSettings;
use crate::protocol::{FrameSnapshot, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state, updated incrementally via `UiUpdate` messages.
pub struct ViewState {
    pub title: String,
    pub field: Option<FieldLayer>,
    pub frame: Option<FrameSnapshot>,
    pub paused: bool,
    /// Draw jersey numbers and last names.
    pub show_names: bool,
    /// Draw track histories.
    pub show_tracks: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            title: String::new(),
            field: None,
            frame: None,
            paused: false,
            show_names: true,
            show_tracks: true,
        }
    }
}

impl ViewState {
    pub fn new(settings: &AnimationSettings) -> Self {
        ViewState {
            show_names: settings.show_names,
            show_tracks: settings.show_tracks,
            ..ViewState::default()
        }
    }
}

fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Field { title, layer } => {
            state.title = title;
            state.field = Some(*layer);
        }
        UiUpdate::Frame(snapshot) => {
            state.frame = Some(*snapshot);
        }
        UiUpdate::PlaybackStatus { paused } => {
            state.paused = paused;
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::title_bar::render(frame, layout.title, state);
    widgets::field::render(frame, layout.field, state);
    widgets::status_bar::render(frame, layout.status_bar, state);
    render_help_bar(frame, &layout);
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout) {
    let text = " space:Pause | \u{2190}/\u{2192}:Step | r:Restart | n:Names | t:Tracks | q:Quit";
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the user quits or the driver hangs up.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    settings: &AnimationSettings,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::new(settings);
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Driver stopped
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let _ = cmd_tx.send(cmd).await;
                            if cmd == UserCommand::Quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::Error::from(e)),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::from(e));
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
