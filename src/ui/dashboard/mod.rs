//! Dashboard implementation
//!
//! State, update logic, input forms and rendering components

pub mod components;
pub mod forms;
pub mod renderer;
pub mod state;
pub mod updaters;
pub mod utils;
pub mod widget;

pub use renderer::render_dashboard;
pub use state::{DashboardState, UIConfig};
