//! Heading selection — right-hand-follow.
//!
//! Two strategies:
//!   1. **Simple** — pure right-hand rule, no memory. Turn right after a
//!      successful move, left after bumping into a wall.
//!   2. **Memory** — the same proposal, then keep turning left past every
//!      heading the knowledge model has proven to be a wall.
//!
//! Only proven walls are skipped. An unexplored edge is always worth a try.

use serde::Deserialize;

use super::heading::{movement, Heading, Position};
use super::maze::Maze;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Simple,
    #[default]
    Memory,
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(Strategy::Simple),
            "memory" => Ok(Strategy::Memory),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

pub fn decide_simple(last: Heading, old: Position, new: Position) -> Heading {
    if movement(old, new) != Heading::NullMove {
        last.turn_right()
    } else {
        last.turn_left()
    }
}

/// Right-hand proposal corrected by what `maze` already knows at `new`.
///
/// Returns `None` when all four headings at `new` are proven walls: there is
/// nothing left to try from here.
pub fn decide_with_memory(
    last: Heading,
    old: Position,
    new: Position,
    maze: &Maze,
) -> Option<Heading> {
    let mut proposed = decide_simple(last, old, new);
    for _ in 0..Heading::CARDINALS.len() {
        if !maze.is_blocked(new, proposed) {
            return Some(proposed);
        }
        proposed = proposed.turn_left();
    }
    None
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
