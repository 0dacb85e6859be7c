//! HTTP handlers for notewise-api.

pub mod ai;
pub mod messages;
