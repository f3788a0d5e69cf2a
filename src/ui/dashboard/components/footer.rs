//! Dashboard footer component
//!
//! Renders the key bindings

use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Render footer with the key bindings of the current mode.
pub fn render_footer(f: &mut Frame, area: ratatui::layout::Rect, form_open: bool) {
    let footer_text = if form_open {
        "[Tab] Next field | [Enter] Submit | [Esc] Cancel"
    } else {
        "[Tab] Select | [Enter] Actions | [D] Diagram | [X] Delete | [N] New | [U] Update | [B] Background | [I] Image | [Q] Quit"
    };

    let footer = Paragraph::new(footer_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Thick),
        );
    f.render_widget(footer, area);
}
