//! Cooperative scheduler: every task runs one step at a time from an explicit run queue.

use std::collections::VecDeque;

use crate::{
    foundation::error::{GophersError, GophersResult},
    foundation::math::Rng64,
    sim::actor::{Actor, ActorId, ActorPose, Poll},
    sim::feeder::{Oven, Replenisher},
    sim::load::{Load, LoadRange},
    sim::pile::{PileId, Piles},
};

/// Simulation parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageConfig {
    /// Seed for every random choice of the run.
    pub seed: u64,
    /// Load waiting on the big pile at start. A small one gets the left gopher moving fast.
    pub initial_big_pile: Option<Load>,
    /// Load waiting on the small pile at start. A big one makes the right gopher start slow.
    pub initial_small_pile: Option<Load>,
    /// Range the replenisher draws from.
    pub replenish: LoadRange,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            initial_big_pile: Load::new(1).ok(),
            initial_small_pile: Load::new(Load::MAX).ok(),
            replenish: LoadRange::default(),
        }
    }
}

impl StageConfig {
    /// Check the replenish range.
    pub fn validate(&self) -> GophersResult<()> {
        self.replenish.validate()
    }
}

/// A schedulable task of the stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum TaskId {
    /// The fire consuming the oven pile.
    Oven,
    /// One of the gophers.
    Actor(ActorId),
    /// The loop topping up the big pile.
    Replenisher,
}

impl TaskId {
    /// Lowercase name used in logs and traces.
    pub fn name(self) -> &'static str {
        match self {
            TaskId::Oven => "oven",
            TaskId::Actor(id) => id.name(),
            TaskId::Replenisher => "replenisher",
        }
    }
}

/// Immutable copy of the world, taken right after a task yielded.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct WorldSnapshot {
    /// Number of yields so far.
    pub step: u64,
    /// The task whose yield produced this snapshot; `None` before the first step.
    pub task: Option<TaskId>,
    /// Both actor poses, indexed by [`ActorId::index`].
    pub actors: [ActorPose; 2],
    /// Pending load of each pile, in [`PileId::ALL`] order.
    pub piles: [Option<Load>; 3],
    /// Loads burned so far.
    pub burned: u64,
}

impl WorldSnapshot {
    /// Pose of one actor.
    pub fn actor(&self, id: ActorId) -> &ActorPose {
        &self.actors[id.index()]
    }

    /// Pending load of one pile.
    pub fn pile(&self, id: PileId) -> Option<Load> {
        match id {
            PileId::Big => self.piles[0],
            PileId::Small => self.piles[1],
            PileId::Oven => self.piles[2],
        }
    }
}

/// Counters describing a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct StageStats {
    /// Yields executed.
    pub steps: u64,
    /// Round trips completed by each actor.
    pub trips: [u64; 2],
    /// Loads added by the replenisher.
    pub replenished: u64,
    /// Loads burned.
    pub burned: u64,
    /// Books burned.
    pub books: u64,
}

/// The whole simulation: piles, tasks, and the run queue stepping them.
///
/// Exactly one task makes progress per [`Stage::step`], so the renderer always observes the
/// world between two steps, never in the middle of one.
#[derive(Clone, Debug)]
pub struct Stage {
    piles: Piles,
    actors: [Actor; 2],
    replenisher: Replenisher,
    oven: Oven,
    run_queue: VecDeque<TaskId>,
    steps: u64,
    last: Option<TaskId>,
}

impl Stage {
    /// Build a stage from `config`.
    pub fn new(config: &StageConfig) -> GophersResult<Self> {
        config.validate()?;
        let mut rng = Rng64::new(config.seed);
        let left = Actor::new(ActorId::Left, PileId::Big, PileId::Small, rng.fork(1));
        let right = Actor::new(ActorId::Right, PileId::Small, PileId::Oven, rng.fork(2));
        let replenisher = Replenisher::new(PileId::Big, config.replenish, rng.fork(3))?;

        Ok(Self {
            piles: Piles::seeded(config.initial_big_pile, config.initial_small_pile),
            actors: [left, right],
            replenisher,
            oven: Oven::new(PileId::Oven),
            run_queue: VecDeque::from([
                TaskId::Oven,
                TaskId::Actor(ActorId::Left),
                TaskId::Actor(ActorId::Right),
                TaskId::Replenisher,
            ]),
            steps: 0,
            last: None,
        })
    }

    /// Run tasks from the front of the queue until one yields.
    ///
    /// Blocked tasks rotate to the back. Fails when a full pass over the queue finds every
    /// task blocked.
    pub fn step(&mut self) -> GophersResult<WorldSnapshot> {
        for _ in 0..self.run_queue.len() {
            let Some(task) = self.run_queue.pop_front() else {
                break;
            };
            let poll = self.poll_task(task)?;
            self.run_queue.push_back(task);
            if poll == Poll::Yielded {
                self.steps += 1;
                self.last = Some(task);
                return Ok(self.snapshot());
            }
        }
        Err(GophersError::schedule(format!(
            "every task is blocked after {} steps",
            self.steps
        )))
    }

    /// Execute `steps` steps and collect the snapshots.
    #[tracing::instrument(skip(self))]
    pub fn run(&mut self, steps: u64) -> GophersResult<Vec<WorldSnapshot>> {
        let mut out = Vec::with_capacity(steps.min(1 << 16) as usize);
        for _ in 0..steps {
            out.push(self.step()?);
        }
        Ok(out)
    }

    /// Current state of the world.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            step: self.steps,
            task: self.last,
            actors: [self.actors[0].pose(), self.actors[1].pose()],
            piles: self.piles.contents(),
            burned: self.oven.burned(),
        }
    }

    /// Counters for the run so far.
    pub fn stats(&self) -> StageStats {
        StageStats {
            steps: self.steps,
            trips: [self.actors[0].trips(), self.actors[1].trips()],
            replenished: self.replenisher.added(),
            burned: self.oven.burned(),
            books: self.oven.books(),
        }
    }

    fn poll_task(&mut self, task: TaskId) -> GophersResult<Poll> {
        Ok(match task {
            TaskId::Oven => self.oven.poll(&mut self.piles),
            TaskId::Actor(id) => self.actors[id.index()].poll(&mut self.piles),
            TaskId::Replenisher => self.replenisher.poll(&mut self.piles)?,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/stage.rs"]
mod tests;
