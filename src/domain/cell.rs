//! Per-cell knowledge: one edge state per cardinal heading plus occupancy.
//! Edge semantics are queried via methods so the Wall/Unknown collapse
//! lives in one place.

use super::heading::{Heading, Position};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum EdgeState {
    #[default]
    Unknown,
    Open(Position),
    Wall,
}

impl EdgeState {
    pub fn is_wall(self) -> bool {
        matches!(self, EdgeState::Wall)
    }

    pub fn is_known(self) -> bool {
        !matches!(self, EdgeState::Unknown)
    }

    /// Where this edge leads from `owner`. Unknown and Wall both
    /// answer `owner` itself: neither is provably passable.
    pub fn target(self, owner: Position) -> Position {
        match self {
            EdgeState::Open(to) => to,
            EdgeState::Unknown | EdgeState::Wall => owner,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Cell {
    edges: [EdgeState; 4],
    occupied: Vec<bool>,
}

impl Cell {
    pub fn new(avatars: usize) -> Self {
        Cell {
            edges: [EdgeState::Unknown; 4],
            occupied: vec![false; avatars],
        }
    }

    /// `NullMove` has no edge and reads as `Unknown`.
    pub fn edge(&self, heading: Heading) -> EdgeState {
        heading.index().map_or(EdgeState::Unknown, |i| self.edges[i])
    }

    pub(crate) fn set_edge(&mut self, heading: Heading, state: EdgeState) {
        if let Some(i) = heading.index() {
            self.edges[i] = state;
        }
    }

    pub fn wall_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_wall()).count()
    }

    pub(crate) fn set_occupied(&mut self, avatar: usize, present: bool) {
        if let Some(slot) = self.occupied.get_mut(avatar) {
            *slot = present;
        }
    }

    /// Avatar ids present, ascending.
    pub fn occupants(&self) -> impl Iterator<Item = usize> + '_ {
        self.occupied.iter().enumerate().filter(|&(_, &here)| here).map(|(id, _)| id)
    }

    pub fn lowest_occupant(&self) -> Option<usize> {
        self.occupants().next()
    }
}
