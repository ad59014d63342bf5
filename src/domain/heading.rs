//! Compass headings, grid positions, and the move translator.
//!
//! Coordinates are row-major: `x` grows to the East, `y` grows to the South.
//! `NullMove` is a heading in name only: it means "no displacement happened"
//! and is never something to attempt.

use std::fmt;

use serde::Deserialize;

/// A cell coordinate. Signed so that one step off the grid is representable;
/// the maze rejects such positions instead of wrapping them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    North,
    South,
    East,
    West,
    #[serde(rename = "null")]
    NullMove,
}

impl Heading {
    /// The four headings that can actually be attempted.
    pub const CARDINALS: [Heading; 4] =
        [Heading::North, Heading::South, Heading::East, Heading::West];

    /// Slot of a cardinal heading in per-cell edge arrays.
    pub fn index(self) -> Option<usize> {
        match self {
            Heading::North => Some(0),
            Heading::South => Some(1),
            Heading::East => Some(2),
            Heading::West => Some(3),
            Heading::NullMove => None,
        }
    }

    pub fn is_cardinal(self) -> bool {
        self != Heading::NullMove
    }

    /// Quarter turn counter-clockwise (North -> West).
    pub fn turn_left(self) -> Self {
        match self {
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
            Heading::East => Heading::North,
            Heading::NullMove => Heading::NullMove,
        }
    }

    /// Quarter turn clockwise (North -> East).
    pub fn turn_right(self) -> Self {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
            Heading::NullMove => Heading::NullMove,
        }
    }

    pub fn turn_around(self) -> Self {
        match self {
            Heading::North => Heading::South,
            Heading::South => Heading::North,
            Heading::East => Heading::West,
            Heading::West => Heading::East,
            Heading::NullMove => Heading::NullMove,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::North => (0, -1),
            Heading::South => (0, 1),
            Heading::East => (1, 0),
            Heading::West => (-1, 0),
            Heading::NullMove => (0, 0),
        }
    }

    /// The position one step from `pos` in this heading.
    /// May land outside the grid; `NullMove` returns `pos` unchanged.
    pub fn offset(self, pos: Position) -> Position {
        let (dx, dy) = self.delta();
        Position::new(pos.x + dx, pos.y + dy)
    }

    pub fn name(self) -> &'static str {
        match self {
            Heading::North => "north",
            Heading::South => "south",
            Heading::East => "east",
            Heading::West => "west",
            Heading::NullMove => "null",
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Heading {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Heading::North),
            "south" | "s" => Ok(Heading::South),
            "east" | "e" => Ok(Heading::East),
            "west" | "w" => Ok(Heading::West),
            other => Err(format!("not a heading: {other}")),
        }
    }
}

/// Which heading took `old` to `new`, or `NullMove` if nothing moved.
///
/// Only meaningful for single-step deltas: x is compared first, so a
/// diagonal jump reports its horizontal component.
pub fn movement(old: Position, new: Position) -> Heading {
    use std::cmp::Ordering::*;
    match (new.x.cmp(&old.x), new.y.cmp(&old.y)) {
        (Greater, _) => Heading::East,
        (Less, _) => Heading::West,
        (Equal, Greater) => Heading::South,
        (Equal, Less) => Heading::North,
        (Equal, Equal) => Heading::NullMove,
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Heading; 5] = [
        Heading::North, Heading::South, Heading::East, Heading::West, Heading::NullMove,
    ];

    #[test]
    fn left_and_right_are_inverses() {
        for h in ALL {
            assert_eq!(h.turn_left().turn_right(), h);
            assert_eq!(h.turn_right().turn_left(), h);
        }
    }

    #[test]
    fn about_turn_is_two_quarter_turns() {
        for h in ALL {
            assert_eq!(h.turn_around().turn_around(), h);
            assert_eq!(h.turn_left().turn_left(), h.turn_around());
            assert_eq!(h.turn_right().turn_right(), h.turn_around());
        }
    }

    #[test]
    fn four_left_turns_cycle_back() {
        for h in Heading::CARDINALS {
            let mut t = h;
            for i in 0..4 {
                if i > 0 { assert_ne!(t, h); }
                t = t.turn_left();
            }
            assert_eq!(t, h);
        }
    }

    #[test]
    fn null_move_is_fixed_point() {
        assert_eq!(Heading::NullMove.turn_left(), Heading::NullMove);
        assert_eq!(Heading::NullMove.turn_right(), Heading::NullMove);
        assert_eq!(Heading::NullMove.turn_around(), Heading::NullMove);
        let p = Position::new(3, 4);
        assert_eq!(Heading::NullMove.offset(p), p);
    }

    #[test]
    fn offset_follows_row_major_grid() {
        let p = Position::new(1, 1);
        assert_eq!(Heading::North.offset(p), Position::new(1, 0));
        assert_eq!(Heading::South.offset(p), Position::new(1, 2));
        assert_eq!(Heading::East.offset(p), Position::new(2, 1));
        assert_eq!(Heading::West.offset(p), Position::new(0, 1));
        // off-grid is representable
        assert_eq!(Heading::North.offset(Position::new(0, 0)), Position::new(0, -1));
    }

    #[test]
    fn movement_inverts_offset() {
        let p = Position::new(5, 5);
        for h in Heading::CARDINALS {
            assert_eq!(movement(p, h.offset(p)), h);
        }
        assert_eq!(movement(p, p), Heading::NullMove);
    }

    #[test]
    fn movement_ignores_step_length() {
        let p = Position::new(2, 2);
        assert_eq!(movement(p, Position::new(7, 2)), Heading::East);
        assert_eq!(movement(p, Position::new(2, -3)), Heading::North);
    }

    #[test]
    fn parse_heading_names() {
        assert_eq!("North".parse::<Heading>(), Ok(Heading::North));
        assert_eq!("w".parse::<Heading>(), Ok(Heading::West));
        assert!("up".parse::<Heading>().is_err());
    }

    #[test]
    fn cardinal_indices_are_distinct() {
        let mut seen = [false; 4];
        for h in Heading::CARDINALS {
            let i = h.index().unwrap();
            assert!(!seen[i]);
            seen[i] = true;
        }
        assert_eq!(Heading::NullMove.index(), None);
    }
}
