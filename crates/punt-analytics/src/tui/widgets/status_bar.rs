// Status bar widget: playback state, frame counter, current event.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Layout: [playback indicator] [frame counter] [event]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    let (label, color) = playback_indicator(state.paused);
    spans.push(Span::styled(
        format!(" {} ", label),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ));

    spans.push(Span::styled(
        frame_counter(state),
        Style::default().fg(Color::White),
    ));

    if let Some(event) = state.frame.as_ref().and_then(|f| f.artists.event.as_deref()) {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            event.to_string(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

pub fn playback_indicator(paused: bool) -> (&'static str, Color) {
    if paused {
        ("PAUSED", Color::Yellow)
    } else {
        ("PLAYING", Color::Green)
    }
}

/// E.g. "Frame 12 (3/40)".
pub fn frame_counter(state: &ViewState) -> String {
    match &state.frame {
        Some(snapshot) => format!(
            "Frame {} ({}/{})",
            snapshot.artists.frame_id,
            snapshot.index + 1,
            snapshot.total
        ),
        None => "Frame --".to_string(),
    }
}
