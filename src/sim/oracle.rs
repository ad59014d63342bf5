//! The move oracle: the only window onto the real maze.
//!
//! An explorer never reads ground truth directly. It asks the oracle to try
//! a heading and gets back where the avatar ended up (the same position if
//! the attempt hit a wall).

use crate::domain::heading::{Heading, Position};
use crate::domain::maze::{Maze, MazeError};

pub trait Oracle {
    fn attempt(&mut self, avatar: usize, from: Position, heading: Heading) -> Position;
}

/// A fully resolved maze answering attempts from its recorded passages.
#[derive(Clone, Debug)]
pub struct GroundTruth {
    maze: Maze,
    attempts: u64,
}

impl GroundTruth {
    pub fn new(maze: Maze) -> Self {
        GroundTruth { maze, attempts: 0 }
    }

    /// Open the boundary between `a` and the cell next to it in `heading`,
    /// on both sides.
    pub fn open(&mut self, a: Position, heading: Heading) -> Result<(), MazeError> {
        let b = heading.offset(a);
        self.maze.record_neighbor(a, heading, b)?;
        self.maze.record_neighbor(b, heading.turn_around(), a)
    }

    /// Wall off the boundary between `a` and its neighbor in `heading`.
    /// Border walls are already in place; only the inside half is written then.
    pub fn wall(&mut self, a: Position, heading: Heading) -> Result<(), MazeError> {
        self.maze.record_wall(a, heading)?;
        let b = heading.offset(a);
        if self.maze.contains(b) {
            self.maze.record_wall(b, heading.turn_around())?;
        }
        Ok(())
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }
}

impl Oracle for GroundTruth {
    fn attempt(&mut self, _avatar: usize, from: Position, heading: Heading) -> Position {
        self.attempts += 1;
        self.maze.neighbor(from, heading)
    }
}
