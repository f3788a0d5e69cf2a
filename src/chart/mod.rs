pub mod parser;
pub mod registry;

pub use registry::{ChartError, ChartHandle, ChartRegistry, UpdateError};
