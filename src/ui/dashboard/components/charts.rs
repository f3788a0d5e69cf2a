//! Chart panel component
//!
//! Renders the line chart of every widget whose diagram is shown.

use super::super::state::DashboardState;
use crate::chart::ChartHandle;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Style};
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{
    Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Padding, Paragraph, Wrap,
};

const SERIES_COLORS: [Color; 4] = [
    Color::LightCyan,
    Color::LightGreen,
    Color::LightMagenta,
    Color::LightYellow,
];

/// Render the visible charts stacked vertically.
pub fn render_charts_panel(f: &mut Frame, area: Rect, state: &DashboardState) {
    let visible: Vec<(String, &ChartHandle)> = state
        .widgets
        .iter()
        .filter(|widget| widget.diagram_visible)
        .filter_map(|widget| {
            state
                .charts
                .get(&widget.id)
                .map(|chart| (widget.chart_id(), chart))
        })
        .collect();

    if visible.is_empty() {
        let block = Block::default()
            .title("DIAGRAMS")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(Padding::uniform(1));
        let hint = Paragraph::new("Select an indicator and press [D] to show its diagram")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    let constraints = vec![Constraint::Ratio(1, visible.len() as u32); visible.len()];
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (index, ((chart_id, chart), chunk)) in visible.iter().zip(chunks.iter()).enumerate() {
        render_chart(
            f,
            *chunk,
            chart_id,
            chart,
            SERIES_COLORS[index % SERIES_COLORS.len()],
        );
    }
}

fn render_chart(f: &mut Frame, area: Rect, chart_id: &str, chart: &ChartHandle, color: Color) {
    let points = chart.points();
    let (min_y, max_y) = y_bounds(chart.samples());
    let max_x = chart.len().saturating_sub(1).max(1) as f64;

    let dataset = Dataset::default()
        .name(chart.name())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points);

    let first_label = chart.labels().first().copied().unwrap_or_default();
    let last_label = chart.labels().last().copied().unwrap_or_default();

    let widget = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title(format!("{} ({})", chart_id, chart.name()))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .labels(vec![
                    Span::raw(first_label.to_string()),
                    Span::raw(last_label.to_string()),
                ])
                .labels_alignment(Alignment::Left)
                .bounds([0.0, max_x]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .labels(vec![
                    Span::raw(format!("{:.0}", min_y)),
                    Span::raw(format!("{:.0}", (min_y + max_y) / 2.0)),
                    Span::raw(format!("{:.0}", max_y)),
                ])
                .bounds([min_y, max_y]),
        );
    f.render_widget(widget, area);
}

/// Value axis range: 0..100, widened to include every sample.
fn y_bounds(samples: &[f64]) -> (f64, f64) {
    samples
        .iter()
        .fold((0.0_f64, 100.0_f64), |(min, max), sample| {
            (min.min(*sample), max.max(*sample))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_y_bounds_default_and_widened() {
        assert_eq!(y_bounds(&[1.0, 2.5]), (0.0, 100.0));
        assert_eq!(y_bounds(&[-4.0, 250.0]), (-4.0, 250.0));
    }
}
