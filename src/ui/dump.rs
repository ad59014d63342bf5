//! Diagnostic dump of the knowledge model, one line per cell.
//!
//! ```text
//! (1,2) north:wall south:wall east:(2,2) west:? avatars:0
//! ```
//! `?` marks an edge nobody has learned anything about yet.

use std::io::{self, Write};

use crate::domain::cell::EdgeState;
use crate::domain::heading::{Heading, Position};
use crate::domain::maze::Maze;

/// Write one cell. Positions outside the maze write nothing.
pub fn dump_cell<W: Write>(maze: &Maze, pos: Position, out: &mut W) -> io::Result<()> {
    let Some(cell) = maze.cell(pos) else { return Ok(()) };

    write!(out, "{pos}")?;
    for heading in Heading::CARDINALS {
        match cell.edge(heading) {
            EdgeState::Unknown => write!(out, " {heading}:?")?,
            EdgeState::Wall => write!(out, " {heading}:wall")?,
            EdgeState::Open(to) => write!(out, " {heading}:{to}")?,
        }
    }

    let occupants: Vec<String> = cell.occupants().map(|id| id.to_string()).collect();
    if occupants.is_empty() {
        writeln!(out)
    } else {
        writeln!(out, " avatars:{}", occupants.join(","))
    }
}

/// Write every cell, row by row.
pub fn dump_maze<W: Write>(maze: &Maze, out: &mut W) -> io::Result<()> {
    for pos in maze.positions() {
        dump_cell(maze, pos, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = vec![];
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn cell_line_shows_all_three_edge_states() {
        let mut m = Maze::new(3, 3, 2).unwrap();
        m.record_neighbor(Position::new(1, 2), Heading::East, Position::new(2, 2)).unwrap();
        m.record_wall(Position::new(1, 2), Heading::North).unwrap();
        m.set_occupant(Position::new(1, 2), 1, true).unwrap();
        m.set_occupant(Position::new(1, 2), 0, true).unwrap();
        let got = text(|b| dump_cell(&m, Position::new(1, 2), b));
        assert_eq!(got, "(1,2) north:wall south:wall east:(2,2) west:? avatars:0,1\n");
    }

    #[test]
    fn out_of_range_writes_nothing() {
        let m = Maze::new(2, 2, 1).unwrap();
        assert_eq!(text(|b| dump_cell(&m, Position::new(2, 0), b)), "");
        assert_eq!(text(|b| dump_cell(&m, Position::new(0, -1), b)), "");
    }

    #[test]
    fn whole_maze_is_row_major() {
        let m = Maze::new(2, 1, 1).unwrap();
        let got = text(|b| dump_maze(&m, b));
        assert_eq!(
            got,
            "(0,0) north:wall south:wall east:? west:wall\n\
             (1,0) north:wall south:wall east:wall west:?\n"
        );
    }
}
