//! The exploration loop: avatars feeling their way through a maze they
//! cannot see, sharing one knowledge model.
//!
//! Per avatar, per step:
//!   1. Decide the next heading from what the model knows so far
//!   2. Ask the oracle where that attempt lands
//!   3. Learn from the outcome right away (memory strategy only), so the
//!      next avatar decides on current occupancy
//!   4. Stop on arrival at the target
//!
//! Avatars take turns in id order. An avatar that has reached the target,
//! got trapped, or ran out of attempts stays put.

use tracing::{debug, info, warn};

use crate::config::SolverConfig;
use crate::domain::decide::{decide_simple, decide_with_memory, Strategy};
use crate::domain::heading::{Heading, Position};
use crate::domain::maze::{Maze, MazeError};
use crate::domain::update::update;
use crate::sim::event::ExploreEvent;
use crate::sim::layout::{Layout, LayoutError};
use crate::sim::oracle::{GroundTruth, Oracle};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AvatarStatus {
    Exploring,
    Reached,
    /// Every edge of this cell is a proven wall.
    Trapped(Position),
    GaveUp,
}

#[derive(Clone, Debug)]
pub struct AvatarState {
    pub id: usize,
    /// Heading of the last attempt.
    pub heading: Heading,
    /// Position before the last attempt.
    pub previous: Position,
    pub position: Position,
    pub attempts: u32,
    pub status: AvatarStatus,
}

impl AvatarState {
    /// Primed as if the avatar had just stepped into `start` along `heading`.
    fn new(id: usize, start: Position, heading: Heading) -> Self {
        AvatarState {
            id,
            heading,
            previous: heading.turn_around().offset(start),
            position: start,
            attempts: 0,
            status: AvatarStatus::Exploring,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status != AvatarStatus::Exploring
    }
}

pub struct Explorer<O: Oracle> {
    knowledge: Maze,
    oracle: O,
    strategy: Strategy,
    max_attempts: u32,
    target: Position,
    avatars: Vec<AvatarState>,
    rounds: u64,
}

impl Explorer<GroundTruth> {
    /// An explorer over `layout`, answering attempts from its ground truth.
    pub fn from_layout(layout: &Layout, solver: &SolverConfig) -> Result<Self, LayoutError> {
        let truth = layout.ground_truth()?;
        let (w, h) = (layout.width, layout.height);
        let explorer = Explorer::new(truth, w, h, &layout.starts, layout.target, solver)?;
        Ok(explorer)
    }
}

impl<O: Oracle> Explorer<O> {
    pub fn new(
        oracle: O,
        width: usize,
        height: usize,
        starts: &[Position],
        target: Position,
        solver: &SolverConfig,
    ) -> Result<Self, MazeError> {
        if !solver.initial_heading.is_cardinal() {
            return Err(MazeError::NullHeading);
        }

        let mut knowledge = Maze::new(width, height, starts.len())?;
        if !knowledge.contains(target) {
            return Err(MazeError::OutOfBounds(target));
        }

        let mut avatars = Vec::with_capacity(starts.len());
        for (id, &start) in starts.iter().enumerate() {
            knowledge.set_occupant(start, id, true)?;
            let mut avatar = AvatarState::new(id, start, solver.initial_heading);
            if start == target {
                avatar.status = AvatarStatus::Reached;
            }
            avatars.push(avatar);
        }

        Ok(Explorer {
            knowledge,
            oracle,
            strategy: solver.strategy,
            max_attempts: solver.max_attempts,
            target,
            avatars,
            rounds: 0,
        })
    }

    pub fn knowledge(&self) -> &Maze { &self.knowledge }
    pub fn oracle(&self) -> &O { &self.oracle }
    pub fn avatars(&self) -> &[AvatarState] { &self.avatars }
    pub fn target(&self) -> Position { self.target }
    pub fn strategy(&self) -> Strategy { self.strategy }
    pub fn rounds(&self) -> u64 { self.rounds }

    pub fn is_finished(&self) -> bool {
        self.avatars.iter().all(AvatarState::is_done)
    }

    /// One turn for every avatar still exploring.
    pub fn step(&mut self) -> Result<Vec<ExploreEvent>, MazeError> {
        let mut events = vec![];
        if self.is_finished() { return Ok(events); }

        self.rounds += 1;
        for id in 0..self.avatars.len() {
            events.extend(self.step_avatar(id)?);
        }
        Ok(events)
    }

    /// Step until every avatar is done.
    pub fn run(&mut self) -> Result<&[AvatarState], MazeError> {
        while !self.is_finished() {
            self.step()?;
        }
        Ok(&self.avatars)
    }

    pub fn step_avatar(&mut self, id: usize) -> Result<Vec<ExploreEvent>, MazeError> {
        let mut events = vec![];
        let Some(avatar) = self.avatars.get(id).cloned() else {
            return Err(MazeError::UnknownAvatar(id));
        };
        if avatar.is_done() {
            return Ok(events);
        }

        let (last, old, new) = (avatar.heading, avatar.previous, avatar.position);
        let proposed = match self.strategy {
            Strategy::Simple => Some(decide_simple(last, old, new)),
            Strategy::Memory => decide_with_memory(last, old, new, &self.knowledge),
        };
        let Some(heading) = proposed else {
            warn!(avatar = id, at = %avatar.position, "every way out is a proven wall");
            self.avatars[id].status = AvatarStatus::Trapped(avatar.position);
            events.push(ExploreEvent::Trapped { avatar: id, at: avatar.position });
            return Ok(events);
        };

        if avatar.attempts >= self.max_attempts {
            info!(avatar = id, attempts = avatar.attempts, "giving up");
            self.avatars[id].status = AvatarStatus::GaveUp;
            events.push(ExploreEvent::GaveUp { avatar: id, attempts: avatar.attempts });
            return Ok(events);
        }

        let from = avatar.position;
        let to = self.oracle.attempt(id, from, heading);
        debug!(avatar = id, %from, %heading, %to, moved = (from != to), "attempt");
        events.push(ExploreEvent::Attempted { avatar: id, from, heading, to });

        let state = &mut self.avatars[id];
        state.heading = heading;
        state.previous = from;
        state.position = to;
        state.attempts += 1;
        let attempts = state.attempts;

        // Learned before anyone else moves, so occupancy never lags a round.
        self.learn(id, &mut events)?;

        if to == self.target {
            self.avatars[id].status = AvatarStatus::Reached;
            info!(avatar = id, attempts, "reached target {}", self.target);
            events.push(ExploreEvent::Reached { avatar: id, attempts });
        }

        Ok(events)
    }

    /// Fold the avatar's last attempt into the knowledge model. The simple
    /// strategy never reads the model, so only occupancy is kept current.
    fn learn(&mut self, id: usize, events: &mut Vec<ExploreEvent>) -> Result<(), MazeError> {
        let AvatarState { heading, previous, position, .. } = self.avatars[id];
        if self.strategy == Strategy::Memory {
            match update(heading, previous, position, &mut self.knowledge, id) {
                Ok(fact) => {
                    debug!(avatar = id, ?fact, "learned");
                    events.push(ExploreEvent::Learned { avatar: id, fact });
                    return Ok(());
                }
                // The wall stays; the avatar is still wherever the oracle put it.
                Err(MazeError::SealedEdge { pos, heading }) => {
                    warn!(avatar = id, %pos, %heading, "move crossed a sealed edge; wall kept");
                }
                Err(e) => return Err(e),
            }
        }
        self.knowledge.set_occupant(previous, id, false)?;
        self.knowledge.set_occupant(position, id, true)?;
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::EdgeState;
    use crate::domain::update::Learned;
    use crate::sim::layout::{embedded_layouts, parse_layout};

    fn p(x: i32, y: i32) -> Position { Position::new(x, y) }

    fn solver(strategy: Strategy) -> SolverConfig {
        SolverConfig { strategy, max_attempts: 100, initial_heading: Heading::South }
    }

    fn layout(name: &str) -> Layout {
        embedded_layouts().into_iter().find(|l| l.name == name).unwrap()
    }

    fn attempts(explorer: &Explorer<GroundTruth>) -> Vec<(AvatarStatus, u32)> {
        explorer.avatars().iter().map(|a| (a.status, a.attempts)).collect()
    }

    #[test]
    fn corner_simple_takes_22() {
        let mut ex = Explorer::from_layout(&layout("corner"), &solver(Strategy::Simple)).unwrap();
        ex.run().unwrap();
        assert_eq!(attempts(&ex), vec![(AvatarStatus::Reached, 22)]);
        assert_eq!(ex.oracle().attempts(), 22);
        assert_eq!(ex.avatars()[0].position, p(2, 0));
    }

    #[test]
    fn corner_memory_takes_13() {
        let mut ex = Explorer::from_layout(&layout("corner"), &solver(Strategy::Memory)).unwrap();
        ex.run().unwrap();
        assert_eq!(attempts(&ex), vec![(AvatarStatus::Reached, 13)]);
    }

    #[test]
    fn corner_memory_seals_the_dead_ends() {
        let mut ex = Explorer::from_layout(&layout("corner"), &solver(Strategy::Memory)).unwrap();
        ex.run().unwrap();
        let k = ex.knowledge();
        for dead in [p(0, 0), p(0, 1), p(0, 2), p(1, 2), p(2, 2)] {
            assert!(k.is_sealed(dead), "{dead} should be sealed");
        }
        // the live route stays open on both sides
        assert_eq!(k.neighbor(p(1, 0), Heading::South), p(1, 1));
        assert_eq!(k.neighbor(p(1, 1), Heading::East), p(2, 1));
        assert_eq!(k.neighbor(p(2, 1), Heading::North), p(2, 0));
        assert_eq!(k.neighbor(p(2, 0), Heading::South), p(2, 1));
        // never tried
        assert_eq!(k.edge(p(1, 0), Heading::East), Some(EdgeState::Unknown));
        assert_eq!(k.occupant_at(p(2, 0)), Some(0));
    }

    #[test]
    fn memory_path_matches_right_hand_trace() {
        let mut ex = Explorer::from_layout(&layout("corner"), &solver(Strategy::Memory)).unwrap();
        let mut trail = vec![];
        while !ex.is_finished() {
            for ev in ex.step().unwrap() {
                if let ExploreEvent::Attempted { heading, to, .. } = ev {
                    trail.push((heading, to));
                }
            }
        }
        use Heading::*;
        let expected = [
            (East, p(0, 2)), (North, p(0, 1)), (East, p(0, 1)), (North, p(0, 0)),
            (East, p(1, 0)), (South, p(1, 1)), (South, p(1, 2)), (East, p(2, 2)),
            (North, p(2, 2)), (West, p(1, 2)), (North, p(1, 1)), (East, p(2, 1)),
            (North, p(2, 0)),
        ];
        assert_eq!(trail, expected);
    }

    #[test]
    fn each_attempt_is_learned_right_after_it() {
        let mut ex = Explorer::from_layout(&layout("corner"), &solver(Strategy::Memory)).unwrap();
        let events = ex.step().unwrap();
        assert_eq!(
            events,
            vec![
                ExploreEvent::Attempted {
                    avatar: 0,
                    from: p(0, 2),
                    heading: Heading::East,
                    to: p(0, 2),
                },
                ExploreEvent::Learned {
                    avatar: 0,
                    fact: Learned::Wall { at: p(0, 2), heading: Heading::East },
                },
            ]
        );
        assert!(ex.knowledge().is_blocked(p(0, 2), Heading::East));
    }

    #[test]
    fn avatars_crossing_a_dead_end_both_arrive() {
        // 0 starts in the west dead end and walks out through 1's cell.
        let l = parse_layout("+-+-+-+-+\n|0 1   T|\n+-+-+-+-+").unwrap();
        let mut ex = Explorer::from_layout(&l, &solver(Strategy::Memory)).unwrap();
        ex.run().unwrap();
        assert_eq!(attempts(&ex), vec![(AvatarStatus::Reached, 3), (AvatarStatus::Reached, 2)]);
        assert_eq!(ex.knowledge().occupants(p(3, 0)), vec![0, 1]);
        assert!(ex.knowledge().occupants(p(0, 0)).is_empty());
        assert!(ex.knowledge().is_sealed(p(0, 0)));
    }

    /// Answers attempts from a fixed list, consistent or not.
    struct Scripted(Vec<Position>);

    impl Oracle for Scripted {
        fn attempt(&mut self, _avatar: usize, _from: Position, _heading: Heading) -> Position {
            self.0.remove(0)
        }
    }

    #[test]
    fn move_through_a_known_wall_keeps_the_wall() {
        // west of (1,0) fails, south succeeds, then west of (1,1) "lands" on
        // (0,0), whose east edge is already a proven wall
        let oracle = Scripted(vec![p(1, 0), p(1, 1), p(0, 0)]);
        let cfg = SolverConfig { max_attempts: 3, ..solver(Strategy::Memory) };
        let mut ex = Explorer::new(oracle, 3, 2, &[p(1, 0)], p(2, 1), &cfg).unwrap();
        ex.run().unwrap();

        assert_eq!(ex.avatars()[0].status, AvatarStatus::GaveUp);
        assert_eq!(ex.avatars()[0].position, p(0, 0));
        let k = ex.knowledge();
        assert_eq!(k.edge(p(0, 0), Heading::East), Some(EdgeState::Wall));
        assert_eq!(k.edge(p(1, 1), Heading::West), Some(EdgeState::Unknown));
        assert_eq!(k.occupants(p(0, 0)), vec![0]);
        assert!(k.occupants(p(1, 1)).is_empty());
    }

    #[test]
    fn simple_strategy_keeps_occupancy_current() {
        let l = parse_layout("+-+-+-+-+\n|0 1   T|\n+-+-+-+-+").unwrap();
        let mut ex = Explorer::from_layout(&l, &solver(Strategy::Simple)).unwrap();
        // 0 bumps the west border, 1 steps west onto it
        ex.step().unwrap();
        assert_eq!(ex.avatars()[1].position, p(0, 0));
        assert_eq!(ex.knowledge().occupants(p(0, 0)), vec![0, 1]);
        assert!(ex.knowledge().occupants(p(1, 0)).is_empty());
        // simple never writes edges
        assert_eq!(ex.knowledge().edge(p(0, 0), Heading::East), Some(EdgeState::Unknown));
    }

    #[test]
    fn gallery_two_avatars() {
        let mut ex = Explorer::from_layout(&layout("gallery"), &solver(Strategy::Simple)).unwrap();
        ex.run().unwrap();
        assert_eq!(attempts(&ex), vec![(AvatarStatus::Reached, 26), (AvatarStatus::Reached, 8)]);

        let mut ex = Explorer::from_layout(&layout("gallery"), &solver(Strategy::Memory)).unwrap();
        ex.run().unwrap();
        assert_eq!(attempts(&ex), vec![(AvatarStatus::Reached, 11), (AvatarStatus::Reached, 4)]);
        assert_eq!(ex.knowledge().occupants(p(5, 0)), vec![0, 1]);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let cfg = SolverConfig { max_attempts: 5, ..solver(Strategy::Simple) };
        let mut ex = Explorer::from_layout(&layout("corner"), &cfg).unwrap();
        let events: Vec<_> = std::iter::from_fn(|| (!ex.is_finished()).then(|| ex.step().unwrap()))
            .flatten()
            .collect();
        assert_eq!(attempts(&ex), vec![(AvatarStatus::GaveUp, 5)]);
        assert_eq!(events.last(), Some(&ExploreEvent::GaveUp { avatar: 0, attempts: 5 }));
    }

    #[test]
    fn sealed_start_is_reported_as_trapped() {
        let l = parse_layout("+-+-+\n|0|T|\n+-+-+").unwrap();
        let mut ex = Explorer::from_layout(&l, &solver(Strategy::Memory)).unwrap();
        // west and south are the border; east is only unknown, so it gets tried once
        let first = ex.step().unwrap();
        assert_eq!(
            first[0],
            ExploreEvent::Attempted {
                avatar: 0,
                from: p(0, 0),
                heading: Heading::East,
                to: p(0, 0),
            }
        );
        assert_eq!(first.len(), 2);
        ex.run().unwrap();
        assert_eq!(ex.avatars()[0].status, AvatarStatus::Trapped(p(0, 0)));
        assert_eq!(ex.avatars()[0].attempts, 1);
    }

    #[test]
    fn start_on_target_is_done_immediately() {
        let mut l = parse_layout("+-+-+\n|0 T|\n+-+-+").unwrap();
        l.target = l.starts[0];
        let mut ex = Explorer::from_layout(&l, &solver(Strategy::Memory)).unwrap();
        assert!(ex.is_finished());
        assert!(ex.step().unwrap().is_empty());
        assert_eq!(ex.rounds(), 0);
    }

    #[test]
    fn rejects_null_heading_and_bad_positions() {
        let truth = layout("corner").ground_truth().unwrap();
        let cfg = SolverConfig { initial_heading: Heading::NullMove, ..solver(Strategy::Memory) };
        assert!(matches!(
            Explorer::new(truth.clone(), 3, 3, &[p(0, 2)], p(2, 0), &cfg),
            Err(MazeError::NullHeading)
        ));
        let cfg = solver(Strategy::Memory);
        assert!(matches!(
            Explorer::new(truth.clone(), 3, 3, &[p(3, 2)], p(2, 0), &cfg),
            Err(MazeError::OutOfBounds(_))
        ));
        assert!(matches!(
            Explorer::new(truth, 3, 3, &[p(0, 2)], p(2, 9), &cfg),
            Err(MazeError::OutOfBounds(_))
        ));
    }
}
