// Module declarations
mod app;
pub mod dashboard;
// Re-exports for external use
pub use app::{App, run};
pub use dashboard::UIConfig;
