//! The gopher worker: a four-state loop moving loads from one pile to the next.

use std::fmt;

use crate::{
    foundation::core::Vec2,
    foundation::math::Rng64,
    sim::load::{CARRY_DISTANCE, CART_STRIDE, Load},
    sim::pile::{PileId, Piles},
};

/// Bump amplitude (exclusive) while pushing a full cart.
const CARRY_BUMPS: u32 = 3;
/// Bump amplitude (exclusive) while running back with an empty cart.
const RETURN_BUMPS: u32 = 5;

/// Where a gopher is in its loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ActorState {
    /// Waiting for, then loading, a batch from the input pile.
    Picking,
    /// Pushing the full cart toward the output pile.
    Carrying,
    /// Shovelling the batch onto the output pile.
    Unloading,
    /// Running back with an empty cart.
    Returning,
}

impl ActorState {
    /// All states in loop order.
    pub const ALL: [ActorState; 4] = [
        ActorState::Picking,
        ActorState::Carrying,
        ActorState::Unloading,
        ActorState::Returning,
    ];

    /// Position in the loop, also the line of the code listing the state runs.
    pub fn index(self) -> u8 {
        match self {
            ActorState::Picking => 0,
            ActorState::Carrying => 1,
            ActorState::Unloading => 2,
            ActorState::Returning => 3,
        }
    }

    /// The state that follows this one.
    pub fn next(self) -> Self {
        match self {
            ActorState::Picking => ActorState::Carrying,
            ActorState::Carrying => ActorState::Unloading,
            ActorState::Unloading => ActorState::Returning,
            ActorState::Returning => ActorState::Picking,
        }
    }
}

impl fmt::Display for ActorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActorState::Picking => "picking",
            ActorState::Carrying => "carrying",
            ActorState::Unloading => "unloading",
            ActorState::Returning => "returning",
        };
        f.write_str(s)
    }
}

/// Which of the two gophers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ActorId {
    /// Big pile to small pile.
    Left,
    /// Small pile to the oven.
    Right,
}

impl ActorId {
    /// Both actors, left first.
    pub const ALL: [ActorId; 2] = [ActorId::Left, ActorId::Right];

    /// Array index of this actor.
    pub fn index(self) -> usize {
        match self {
            ActorId::Left => 0,
            ActorId::Right => 1,
        }
    }

    /// Lowercase name used in logs and traces.
    pub fn name(self) -> &'static str {
        match self {
            ActorId::Left => "left",
            ActorId::Right => "right",
        }
    }
}

/// Read-only view of one actor, as published to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ActorPose {
    /// Current loop state.
    pub state: ActorState,
    /// `x` is the distance travelled from the input pile, `y` the road bump.
    pub offset: Vec2,
    /// Load on the cart, if any.
    pub cart: Option<Load>,
}

impl ActorPose {
    fn at_start() -> Self {
        Self {
            state: ActorState::Picking,
            offset: Vec2::ZERO,
            cart: None,
        }
    }
}

/// Outcome of polling a task once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Poll {
    /// The task did one step of work and handed control back.
    Yielded,
    /// The task is waiting on a pile and did not yield.
    Blocked,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    AwaitLoad,
    Loading { load: Load, remaining: u32 },
    Carrying { load: Load, step: u32 },
    Unloading { load: Load, remaining: u32 },
    Delivering { load: Load },
    Returning,
}

/// One gopher. Exclusively owns its pose; the stage publishes copies of it.
#[derive(Clone, Debug)]
pub struct Actor {
    id: ActorId,
    input: PileId,
    output: PileId,
    phase: Phase,
    pose: ActorPose,
    rng: Rng64,
    trips: u64,
}

impl Actor {
    /// A gopher waiting at `input`, delivering to `output`.
    pub fn new(id: ActorId, input: PileId, output: PileId, rng: Rng64) -> Self {
        Self {
            id,
            input,
            output,
            phase: Phase::AwaitLoad,
            pose: ActorPose::at_start(),
            rng,
            trips: 0,
        }
    }

    /// Which gopher this is.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Copy of the current pose.
    pub fn pose(&self) -> ActorPose {
        self.pose
    }

    /// Completed round trips.
    pub fn trips(&self) -> u64 {
        self.trips
    }

    /// Run until the next cooperative yield, or until a pile blocks progress.
    pub fn poll(&mut self, piles: &mut Piles) -> Poll {
        loop {
            match self.phase {
                Phase::AwaitLoad => {
                    let Some(load) = piles.get_mut(self.input).try_pop() else {
                        return Poll::Blocked;
                    };
                    tracing::trace!(actor = self.id.name(), pile = self.input.name(), %load, "picked");
                    self.pose.cart = Some(load);
                    self.phase = Phase::Loading {
                        load,
                        remaining: u32::from(load.get()),
                    };
                }
                Phase::Loading { load, remaining } => {
                    if remaining > 0 {
                        self.phase = Phase::Loading {
                            load,
                            remaining: remaining - 1,
                        };
                        return Poll::Yielded;
                    }
                    self.enter(ActorState::Carrying);
                    self.phase = Phase::Carrying { load, step: 0 };
                }
                Phase::Carrying { load, step } => {
                    if step < load.carry_steps() {
                        self.pose.offset.x = load.carry_offset(step);
                        self.toggle_bump(CARRY_BUMPS);
                        self.phase = Phase::Carrying {
                            load,
                            step: step + 1,
                        };
                        return Poll::Yielded;
                    }
                    self.pose.offset = Vec2::new(f64::from(CARRY_DISTANCE), 0.0);
                    self.enter(ActorState::Unloading);
                    self.phase = Phase::Unloading {
                        load,
                        remaining: u32::from(load.get()),
                    };
                }
                Phase::Unloading { load, remaining } => {
                    if remaining > 0 {
                        self.phase = Phase::Unloading {
                            load,
                            remaining: remaining - 1,
                        };
                        return Poll::Yielded;
                    }
                    self.phase = Phase::Delivering { load };
                }
                Phase::Delivering { load } => {
                    if piles.get_mut(self.output).try_push(load).is_err() {
                        return Poll::Blocked;
                    }
                    tracing::trace!(actor = self.id.name(), pile = self.output.name(), %load, "delivered");
                    self.pose.cart = None;
                    self.enter(ActorState::Returning);
                    self.phase = Phase::Returning;
                }
                Phase::Returning => {
                    if self.pose.offset.x > 0.0 {
                        self.pose.offset.x = (self.pose.offset.x - f64::from(CART_STRIDE)).max(0.0);
                        self.toggle_bump(RETURN_BUMPS);
                        return Poll::Yielded;
                    }
                    self.pose.offset = Vec2::ZERO;
                    self.trips += 1;
                    self.enter(ActorState::Picking);
                    self.phase = Phase::AwaitLoad;
                }
            }
        }
    }

    fn enter(&mut self, next: ActorState) {
        debug_assert_eq!(self.pose.state.next(), next, "actor states must cycle in order");
        tracing::debug!(
            actor = self.id.name(),
            from = %self.pose.state,
            to = %next,
            "state transition"
        );
        self.pose.state = next;
    }

    // Bumps in the road: a non-zero bump is always followed by a flat step.
    fn toggle_bump(&mut self, amplitude: u32) {
        self.pose.offset.y = if self.pose.offset.y > 0.0 {
            0.0
        } else {
            f64::from(self.rng.below(amplitude))
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/actor.rs"]
mod tests;
