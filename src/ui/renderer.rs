//! Presentation layer: draws what the explorers currently know.
//!
//! How it works:
//!   1. `frame()` turns the knowledge model into a lattice of glyphs,
//!      the same lattice the layout files use
//!   2. `Renderer::draw` queues one colored print per glyph row, flushed once
//!
//! A boundary is drawn from both cells that share it: a wall on either side
//! wins, then an open passage, otherwise it is still unknown.

use std::io::{self, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::domain::cell::EdgeState;
use crate::domain::heading::{Heading, Position};
use crate::domain::maze::Maze;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Glyph {
    pub ch: char,
    pub fg: Color,
}

impl Glyph {
    const fn new(ch: char, fg: Color) -> Self {
        Glyph { ch, fg }
    }

    const CORNER: Glyph = Glyph::new('+', Color::DarkGrey);
    const OPEN: Glyph = Glyph::new(' ', Color::Reset);
    const UNKNOWN: Glyph = Glyph::new('.', Color::DarkGrey);
    const EMPTY: Glyph = Glyph::new(' ', Color::Reset);
    const SEALED: Glyph = Glyph::new('#', Color::DarkRed);
    const TARGET: Glyph = Glyph::new('T', Color::Yellow);
}

pub type Frame = Vec<Vec<Glyph>>;

/// Merge the two halves of the boundary `heading` of `pos`.
fn boundary(maze: &Maze, pos: Position, heading: Heading) -> EdgeState {
    let sides = [
        maze.edge(pos, heading),
        maze.edge(heading.offset(pos), heading.turn_around()),
    ];
    if sides.iter().flatten().any(|e| e.is_wall()) {
        EdgeState::Wall
    } else if let Some(open) = sides.iter().flatten().find(|e| matches!(e, EdgeState::Open(_))) {
        *open
    } else {
        EdgeState::Unknown
    }
}

fn edge_glyph(state: EdgeState, wall: char) -> Glyph {
    match state {
        EdgeState::Wall => Glyph::new(wall, Color::White),
        EdgeState::Open(_) => Glyph::OPEN,
        EdgeState::Unknown => Glyph::UNKNOWN,
    }
}

/// Build the glyph lattice: `2h+1` rows of `2w+1` glyphs.
/// `avatars[i]` is where avatar `i` stands; the lowest id wins a shared cell.
pub fn frame(maze: &Maze, avatars: &[Position], target: Position) -> Frame {
    let (w, h) = (maze.width(), maze.height());
    let mut rows = vec![vec![Glyph::CORNER; 2 * w + 1]; 2 * h + 1];

    for pos in maze.positions() {
        let (x, y) = (pos.x as usize, pos.y as usize);
        let (row, col) = (2 * y + 1, 2 * x + 1);

        rows[row - 1][col] = edge_glyph(boundary(maze, pos, Heading::North), '-');
        rows[row + 1][col] = edge_glyph(boundary(maze, pos, Heading::South), '-');
        rows[row][col - 1] = edge_glyph(boundary(maze, pos, Heading::West), '|');
        rows[row][col + 1] = edge_glyph(boundary(maze, pos, Heading::East), '|');

        rows[row][col] = if let Some(id) = avatars.iter().position(|&a| a == pos) {
            let digit = std::char::from_digit((id % 10) as u32, 10).unwrap_or('@');
            Glyph::new(digit, Color::Green)
        } else if pos == target {
            Glyph::TARGET
        } else if maze.is_sealed(pos) {
            Glyph::SEALED
        } else {
            Glyph::EMPTY
        };
    }

    rows
}

/// Plain text of a frame, one line per lattice row.
pub fn frame_text(frame: &Frame) -> String {
    let mut out = String::new();
    for row in frame {
        out.extend(row.iter().map(|g| g.ch));
        out.push('\n');
    }
    out
}

// ══════════════════════════════════════════════════════════════
// Terminal renderer
// ══════════════════════════════════════════════════════════════

pub struct Renderer<W: Write> {
    out: W,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Renderer { out }
    }

    pub fn init(&mut self) -> io::Result<()> {
        execute!(self.out, cursor::Hide, Clear(ClearType::All))
    }

    /// Draw `frame` at the top-left, then the status lines under it.
    pub fn draw(&mut self, frame: &Frame, status: &[String]) -> io::Result<()> {
        queue!(self.out, MoveTo(0, 0))?;
        for (y, row) in frame.iter().enumerate() {
            queue!(self.out, MoveTo(0, y as u16))?;
            let mut fg = None;
            for glyph in row {
                if fg != Some(glyph.fg) {
                    queue!(self.out, SetForegroundColor(glyph.fg))?;
                    fg = Some(glyph.fg);
                }
                queue!(self.out, Print(glyph.ch))?;
            }
        }
        queue!(self.out, ResetColor)?;

        let top = frame.len() as u16 + 1;
        for (i, line) in status.iter().enumerate() {
            queue!(
                self.out,
                MoveTo(0, top + i as u16),
                Clear(ClearType::CurrentLine),
                Print(line)
            )?;
        }
        self.out.flush()
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.out, ResetColor, cursor::Show, Print("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::domain::decide::Strategy;
    use crate::sim::explorer::Explorer;
    use crate::sim::layout::embedded_layouts;

    fn p(x: i32, y: i32) -> Position { Position::new(x, y) }

    #[test]
    fn fresh_maze_shows_unknown_interior() {
        let m = Maze::new(2, 1, 1).unwrap();
        let f = frame(&m, &[p(0, 0)], p(1, 0));
        assert_eq!(frame_text(&f), "+-+-+\n|0.T|\n+-+-+\n");
    }

    #[test]
    fn one_sided_wall_still_draws() {
        let mut m = Maze::new(2, 2, 1).unwrap();
        m.record_wall(p(0, 0), Heading::East).unwrap();
        m.record_neighbor(p(0, 0), Heading::South, p(0, 1)).unwrap();
        let f = frame(&m, &[], p(1, 1));
        assert_eq!(frame_text(&f), "+-+-+\n| | |\n+ +.+\n| .T|\n+-+-+\n");
    }

    #[test]
    fn solved_corner_shows_sealed_dead_ends() {
        let layout = embedded_layouts().into_iter().find(|l| l.name == "corner").unwrap();
        let cfg = SolverConfig {
            strategy: Strategy::Memory,
            max_attempts: 100,
            initial_heading: Heading::South,
        };
        let mut ex = Explorer::from_layout(&layout, &cfg).unwrap();
        ex.run().unwrap();
        let positions: Vec<_> = ex.avatars().iter().map(|a| a.position).collect();
        let text = frame_text(&frame(ex.knowledge(), &positions, ex.target()));
        assert_eq!(
            text,
            "+-+-+-+\n\
             |#| .0|\n\
             +-+ + +\n\
             |#|   |\n\
             +-+-+-+\n\
             |#|#|#|\n\
             +-+-+-+\n"
        );
    }

    #[test]
    fn renderer_writes_glyphs_and_status() {
        let m = Maze::new(1, 1, 1).unwrap();
        let f = frame(&m, &[p(0, 0)], p(0, 0));
        let mut r = Renderer::new(Vec::new());
        r.draw(&f, &["step 1".to_string()]).unwrap();
        let bytes = String::from_utf8_lossy(&r.out).to_string();
        assert!(bytes.contains('0'));
        assert!(bytes.contains("step 1"));
    }
}
