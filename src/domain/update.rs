//! Turning one move outcome into model facts.
//!
//! Processing order:
//!   1. Validate everything (no partial writes on bad input)
//!   2. Move the avatar's occupancy from `old` to `new`
//!   3. Success: record the passage on both sides, or seal it if `old` is a
//!      vacated dead end
//!   4. Failure: record the wall on both sides of the boundary
//!
//! The far side of a failed move may be off the grid (the avatar bumped the
//! border). That half of the write is skipped; the border is already sealed.

use tracing::trace;

use super::heading::{movement, Heading, Position};
use super::maze::{Maze, MazeError};

/// A cell with this many proven walls offers at most one way in or out.
pub const DEAD_END_WALLS: usize = 3;

/// What a single update taught the model.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Learned {
    /// `from -> heading` leads to `to`, and back.
    Passage { from: Position, heading: Heading, to: Position },
    /// `at -> heading` is a wall.
    Wall { at: Position, heading: Heading },
    /// `from` was a dead end and is now closed off from `to`.
    DeadEndSealed { from: Position, heading: Heading, to: Position },
}

pub fn update(
    last: Heading,
    old: Position,
    new: Position,
    maze: &mut Maze,
    avatar: usize,
) -> Result<Learned, MazeError> {
    if !maze.contains(old) { return Err(MazeError::OutOfBounds(old)); }
    if !maze.contains(new) { return Err(MazeError::OutOfBounds(new)); }
    if avatar >= maze.avatar_count() { return Err(MazeError::UnknownAvatar(avatar)); }

    let dir = movement(old, new);
    if dir == Heading::NullMove && !last.is_cardinal() {
        return Err(MazeError::NullHeading);
    }

    // Decided before occupancy moves so a rejected passage leaves no trace.
    let vacated = !maze.occupants(old).iter().any(|&id| id != avatar);
    let dead_end = dir != Heading::NullMove
        && vacated
        && maze.wall_count(old).unwrap_or(0) >= DEAD_END_WALLS;
    if dir != Heading::NullMove && !dead_end {
        if maze.is_blocked(old, dir) {
            return Err(MazeError::SealedEdge { pos: old, heading: dir });
        }
        if maze.is_blocked(new, dir.turn_around()) {
            return Err(MazeError::SealedEdge { pos: new, heading: dir.turn_around() });
        }
    }

    maze.set_occupant(old, avatar, false)?;
    maze.set_occupant(new, avatar, true)?;

    if dir != Heading::NullMove {
        if dead_end {
            maze.record_wall(old, dir)?;
            maze.record_wall(new, dir.turn_around())?;
            Ok(Learned::DeadEndSealed { from: old, heading: dir, to: new })
        } else {
            maze.record_neighbor(old, dir, new)?;
            maze.record_neighbor(new, dir.turn_around(), old)?;
            Ok(Learned::Passage { from: old, heading: dir, to: new })
        }
    } else {
        maze.record_wall(old, last)?;
        let other_side = last.offset(old);
        if maze.contains(other_side) {
            maze.record_wall(other_side, last.turn_around())?;
        } else {
            trace!(at = %old, heading = %last, "wall faces the border; no far side to record");
        }
        Ok(Learned::Wall { at: old, heading: last })
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
