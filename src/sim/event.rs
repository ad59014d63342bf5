//! Events emitted during an exploration step.
//! The presentation layer and the log consume these.

use crate::domain::heading::{Heading, Position};
use crate::domain::update::Learned;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExploreEvent {
    Attempted { avatar: usize, from: Position, heading: Heading, to: Position },
    Learned { avatar: usize, fact: Learned },
    Reached { avatar: usize, attempts: u32 },
    Trapped { avatar: usize, at: Position },
    GaveUp { avatar: usize, attempts: u32 },
}

impl ExploreEvent {
    pub fn avatar(&self) -> usize {
        match *self {
            ExploreEvent::Attempted { avatar, .. }
            | ExploreEvent::Learned { avatar, .. }
            | ExploreEvent::Reached { avatar, .. }
            | ExploreEvent::Trapped { avatar, .. }
            | ExploreEvent::GaveUp { avatar, .. } => avatar,
        }
    }
}
