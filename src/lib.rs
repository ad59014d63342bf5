//! mazewalk: explore an unseen grid maze one attempted move at a time.
//!
//! `domain` holds the knowledge model and the right-hand-follow decisions,
//! `sim` drives avatars against a move oracle, `ui` shows what was learned.

pub mod config;
pub mod domain;
pub mod sim;
pub mod ui;
