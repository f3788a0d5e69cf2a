//! Dashboard component modules
//!
//! Contains all individual rendering components

pub mod canvas;
pub mod charts;
pub mod footer;
pub mod form;
pub mod header;
pub mod logs;
