//! Dashboard utility functions
//!
//! Layout geometry shared by the renderer and mouse handling, plus formatting helpers.

use super::widget::Widget;
use crate::consts::dashboard_consts::canvas;
use crate::events::Source;
use crate::indicator::Position;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::Color;

/// Screen areas of the dashboard
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DashboardLayout {
    pub header: Rect,
    pub canvas: Rect,
    pub charts: Rect,
    pub logs: Rect,
    pub footer: Rect,
}

/// Splits the terminal area into the dashboard panels.
pub fn dashboard_layout(area: Rect) -> DashboardLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Percentage(25),
            Constraint::Length(2),
        ])
        .margin(1)
        .split(area);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[1]);

    DashboardLayout {
        header: main_chunks[0],
        canvas: content_chunks[0],
        charts: content_chunks[1],
        logs: main_chunks[2],
        footer: main_chunks[3],
    }
}

/// Canvas area inside its border.
pub fn canvas_inner(canvas_area: Rect) -> Rect {
    Rect {
        x: canvas_area.x.saturating_add(1),
        y: canvas_area.y.saturating_add(1),
        width: canvas_area.width.saturating_sub(2),
        height: canvas_area.height.saturating_sub(2),
    }
}

/// Cell rectangle of a widget on the canvas, clipped to it.
///
/// Widgets whose position lies outside the canvas are not drawn.
pub fn widget_rect(inner: Rect, widget: &Widget) -> Option<Rect> {
    let column = u16::try_from(widget.position.x.max(0) / canvas::PIXELS_PER_COLUMN).ok()?;
    let row = u16::try_from(widget.position.y.max(0) / canvas::PIXELS_PER_ROW).ok()?;
    if column >= inner.width || row >= inner.height {
        return None;
    }

    let height = if widget.actions_visible {
        canvas::WIDGET_WITH_ACTIONS_HEIGHT
    } else {
        canvas::WIDGET_HEIGHT
    };
    Some(Rect {
        x: inner.x + column,
        y: inner.y + row,
        width: canvas::WIDGET_WIDTH.min(inner.width - column),
        height: height.min(inner.height - row),
    })
}

/// Converts a terminal cell on the canvas into a canvas position.
pub fn cell_to_position(inner: Rect, column: u16, row: u16) -> Position {
    Position {
        x: i32::from(column.saturating_sub(inner.x)) * canvas::PIXELS_PER_COLUMN,
        y: i32::from(row.saturating_sub(inner.y)) * canvas::PIXELS_PER_ROW,
    }
}

/// Part of the canvas under a mouse click
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CanvasHit {
    /// The value line of the widget at this index
    Value(usize),
    Diagram(usize),
    Delete(usize),
    /// Empty background
    Background(Position),
}

/// Finds what a click at (column, row) landed on. The last drawn widget wins.
pub fn hit_test(widgets: &[Widget], inner: Rect, column: u16, row: u16) -> Option<CanvasHit> {
    let inside = column >= inner.x
        && column < inner.x + inner.width
        && row >= inner.y
        && row < inner.y + inner.height;
    if !inside {
        return None;
    }

    for (index, widget) in widgets.iter().enumerate().rev() {
        let Some(rect) = widget_rect(inner, widget) else {
            continue;
        };
        let within = column >= rect.x
            && column < rect.x + rect.width
            && row >= rect.y
            && row < rect.y + rect.height;
        if !within {
            continue;
        }
        // Row 0 is the border with the name, row 1 the value, row 2 the action buttons
        if widget.actions_visible && row == rect.y + 2 {
            let middle = rect.x + rect.width / 2;
            return Some(if column < middle {
                CanvasHit::Diagram(index)
            } else {
                CanvasHit::Delete(index)
            });
        }
        return Some(CanvasHit::Value(index));
    }

    Some(CanvasHit::Background(cell_to_position(inner, column, row)))
}

/// Centered popup area of the given size, clipped to `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Get a ratatui color for an event source
pub fn get_source_color(source: &Source) -> Color {
    match source {
        Source::Api => Color::Cyan,
        Source::LiveChannel => Color::Yellow,
        Source::Dashboard => Color::Green,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // "YYYY-MM-DD HH:MM:SS" -> "MM-DD HH:MM:SS"
    let mut parts = timestamp.split(' ');
    match (parts.next().and_then(|date| date.get(5..10)), parts.next()) {
        (Some(month_day), Some(time)) => format!("{} {}", month_day, time),
        _ => timestamp.to_string(),
    }
}

/// Shorten verbose HTTP client errors
pub fn clean_http_error_message(msg: &str) -> String {
    if msg.contains("reqwest::Error") && msg.contains("ConnectTimeout") {
        return "Connection timeout".to_string();
    }
    if msg.contains("reqwest::Error") && msg.contains("TimedOut") {
        return "Request timed out".to_string();
    }
    if msg.contains("reqwest::Error") {
        return "Network error".to_string();
    }
    msg.to_string()
}
