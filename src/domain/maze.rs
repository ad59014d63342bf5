//! The maze model: a fixed `width x height` arena of cells.
//!
//! Cells are allocated up front and addressed by `(x, y)`; nothing is
//! created on demand, so a position is either valid for the whole life of
//! the maze or never. Border edges facing outward are walls from creation,
//! every interior edge starts `Unknown`.
//!
//! Writes here are single directed edges. Keeping the two sides of a
//! boundary consistent is the updater's job (see `domain::update`).

use thiserror::Error;

use super::cell::{Cell, EdgeState};
use super::heading::{Heading, Position};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze dimensions must be positive (got {width}x{height})")]
    InvalidDimensions { width: usize, height: usize },
    #[error("position {0} is outside the maze")]
    OutOfBounds(Position),
    #[error("null move has no edge")]
    NullHeading,
    #[error("no avatar with id {0}")]
    UnknownAvatar(usize),
    #[error("edge {heading} of {pos} is a proven wall")]
    SealedEdge { pos: Position, heading: Heading },
}

#[derive(Clone, Debug)]
pub struct Maze {
    width: usize,
    height: usize,
    avatars: usize,
    cells: Vec<Cell>,
}

impl Maze {
    pub fn new(width: usize, height: usize, avatars: usize) -> Result<Self, MazeError> {
        if width == 0 || height == 0 || i32::try_from(width.max(height)).is_err() {
            return Err(MazeError::InvalidDimensions { width, height });
        }

        let mut cells = vec![Cell::new(avatars); width * height];
        for y in 0..height {
            for x in 0..width {
                let cell = &mut cells[y * width + x];
                if y == 0 { cell.set_edge(Heading::North, EdgeState::Wall); }
                if y == height - 1 { cell.set_edge(Heading::South, EdgeState::Wall); }
                if x == 0 { cell.set_edge(Heading::West, EdgeState::Wall); }
                if x == width - 1 { cell.set_edge(Heading::East, EdgeState::Wall); }
            }
        }

        Ok(Maze { width, height, avatars, cells })
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn avatar_count(&self) -> usize { self.avatars }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        if x >= self.width || y >= self.height { return None; }
        Some(y * self.width + x)
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    fn cell_mut(&mut self, pos: Position) -> Result<&mut Cell, MazeError> {
        match self.index(pos) {
            Some(i) => Ok(&mut self.cells[i]),
            None => Err(MazeError::OutOfBounds(pos)),
        }
    }

    /// All positions, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let w = self.width as i32;
        (0..self.height as i32).flat_map(move |y| (0..w).map(move |x| Position::new(x, y)))
    }

    // ── Occupancy ──

    pub fn set_occupant(
        &mut self,
        pos: Position,
        avatar: usize,
        present: bool,
    ) -> Result<(), MazeError> {
        if avatar >= self.avatars {
            return Err(MazeError::UnknownAvatar(avatar));
        }
        self.cell_mut(pos)?.set_occupied(avatar, present);
        Ok(())
    }

    /// Lowest avatar id standing at `pos`, if any.
    pub fn occupant_at(&self, pos: Position) -> Option<usize> {
        self.cell(pos).and_then(Cell::lowest_occupant)
    }

    pub fn occupants(&self, pos: Position) -> Vec<usize> {
        self.cell(pos).map(|c| c.occupants().collect()).unwrap_or_default()
    }

    // ── Edges ──

    /// Record the directed edge `pos -> heading`. A `neighbor` equal to
    /// `pos` records a wall; anything else records an open passage.
    ///
    /// Walls are permanent: an open passage cannot be written over one.
    pub fn record_neighbor(
        &mut self,
        pos: Position,
        heading: Heading,
        neighbor: Position,
    ) -> Result<(), MazeError> {
        if !heading.is_cardinal() {
            return Err(MazeError::NullHeading);
        }
        if !self.contains(neighbor) {
            return Err(MazeError::OutOfBounds(neighbor));
        }
        let cell = self.cell_mut(pos)?;
        if neighbor == pos {
            cell.set_edge(heading, EdgeState::Wall);
        } else {
            if cell.edge(heading).is_wall() {
                return Err(MazeError::SealedEdge { pos, heading });
            }
            cell.set_edge(heading, EdgeState::Open(neighbor));
        }
        Ok(())
    }

    pub fn record_wall(&mut self, pos: Position, heading: Heading) -> Result<(), MazeError> {
        self.record_neighbor(pos, heading, pos)
    }

    /// The tri-state knowledge for one edge; `None` on a bad position or `NullMove`.
    pub fn edge(&self, pos: Position, heading: Heading) -> Option<EdgeState> {
        if !heading.is_cardinal() { return None; }
        self.cell(pos).map(|c| c.edge(heading))
    }

    /// Where `heading` leads from `pos`. Answers `pos` itself for a wall,
    /// an unexplored edge, or any invalid input.
    pub fn neighbor(&self, pos: Position, heading: Heading) -> Position {
        self.edge(pos, heading).map_or(pos, |e| e.target(pos))
    }

    /// True only for a proven wall; unexplored edges are not blocked.
    pub fn is_blocked(&self, pos: Position, heading: Heading) -> bool {
        self.edge(pos, heading).is_some_and(EdgeState::is_wall)
    }

    pub fn wall_count(&self, pos: Position) -> Option<usize> {
        self.cell(pos).map(Cell::wall_count)
    }

    /// Every edge of `pos` is a proven wall.
    pub fn is_sealed(&self, pos: Position) -> bool {
        self.wall_count(pos) == Some(4)
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
