//! Background tasks feeding the dashboard

pub mod core;
pub mod requests;

pub use core::EventSender;
pub use requests::{Request, RequestWorker};
