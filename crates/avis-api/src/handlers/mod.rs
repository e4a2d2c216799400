//! HTTP handlers, grouped by resource.

pub mod birds;
pub mod history;
pub mod identify;
