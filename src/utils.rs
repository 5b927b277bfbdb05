//! Small standalone helpers.

pub mod date;
pub mod form;
pub mod log;
