//! Dashboard main renderer

use super::components::{canvas, charts, footer, form, header, logs};
use super::state::DashboardState;
use super::utils::dashboard_layout;
use ratatui::Frame;
use ratatui::prelude::{Color, Style};
use ratatui::widgets::Block;

pub fn render_dashboard(f: &mut Frame, state: &DashboardState) {
    if state.ui_config.with_background_color {
        f.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 20, 24))),
            f.area(),
        );
    }

    let layout = dashboard_layout(f.area());

    header::render_header(f, layout.header, state);
    canvas::render_canvas(f, layout.canvas, state);
    charts::render_charts_panel(f, layout.charts, state);
    logs::render_logs_panel(f, layout.logs, state);
    footer::render_footer(f, layout.footer, state.form.is_some());

    if let Some(open_form) = &state.form {
        form::render_form(f, f.area(), open_form);
    }
}
