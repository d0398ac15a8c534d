// Title bar widget: game situation and play identifiers.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let text = if state.title.is_empty() {
        "Loading play...".to_string()
    } else {
        state.title.clone()
    };
    let paragraph = Paragraph::new(text)
        .style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
