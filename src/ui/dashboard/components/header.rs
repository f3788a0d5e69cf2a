//! Dashboard header component
//!
//! Renders the title and the live channel status

use super::super::state::DashboardState;
use crate::hub::ConnectionState;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Render header with title, connection status and uptime.
pub fn render_header(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let version = env!("CARGO_PKG_VERSION");
    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("INDICATOR DASHBOARD v{}", version),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "API {} | Hub {}",
                state.ui_config.api_url, state.ui_config.hub_url
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Left)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Thick),
    );
    f.render_widget(title, header_chunks[0]);

    let (status_color, status_icon) = match state.connection_state {
        ConnectionState::Connected => (Color::LightGreen, "●"),
        // Blink while a connection attempt is in flight
        ConnectionState::Connecting if state.tick % 10 < 5 => (Color::LightYellow, "◌"),
        ConnectionState::Connecting => (Color::LightYellow, "●"),
        ConnectionState::Disconnected => (Color::LightRed, "○"),
    };

    let uptime = state.uptime_secs();
    let status = Line::from(vec![
        Span::styled(
            format!("{} {}", status_icon, state.connection_state),
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  {} indicators | {} charts | up {}m {}s",
                state.widgets.len(),
                state.charts.len(),
                uptime / 60,
                uptime % 60
            ),
            Style::default().fg(Color::Gray),
        ),
    ]);
    let status = Paragraph::new(status).alignment(Alignment::Right).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_type(BorderType::Thick),
    );
    f.render_widget(status, header_chunks[1]);
}
