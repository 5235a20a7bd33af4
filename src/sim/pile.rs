//! Single-slot piles connecting producers and consumers.

use crate::sim::load::Load;

/// The three piles of the show, in flow order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PileId {
    /// Refilled by the replenisher, emptied by the left gopher.
    Big,
    /// Between the two gophers.
    Small,
    /// In front of the oven, drained by the fire.
    Oven,
}

impl PileId {
    /// All piles in flow order.
    pub const ALL: [PileId; 3] = [PileId::Big, PileId::Small, PileId::Oven];

    fn index(self) -> usize {
        match self {
            PileId::Big => 0,
            PileId::Small => 1,
            PileId::Oven => 2,
        }
    }

    /// Lowercase name used in logs and traces.
    pub fn name(self) -> &'static str {
        match self {
            PileId::Big => "big",
            PileId::Small => "small",
            PileId::Oven => "oven",
        }
    }
}

/// A buffer holding at most one pending [`Load`].
///
/// Piles never fail: a push onto a full pile hands the load back and a pop from an empty pile
/// returns `None`. The stage turns both into a cooperative block of the calling task, which is
/// retried on its next turn.
#[derive(Clone, Debug, Default)]
pub struct Pile {
    slot: Option<Load>,
    pushed: u64,
    popped: u64,
}

impl Pile {
    /// An empty pile.
    pub fn new() -> Self {
        Self::default()
    }

    /// A pile seeded with `load`.
    pub fn with_load(load: Load) -> Self {
        Self {
            slot: Some(load),
            pushed: 1,
            popped: 0,
        }
    }

    /// Try to deposit `load`; hands it back if the slot is taken.
    pub fn try_push(&mut self, load: Load) -> Result<(), Load> {
        if self.slot.is_some() {
            return Err(load);
        }
        self.slot = Some(load);
        self.pushed += 1;
        Ok(())
    }

    /// Try to take the pending load.
    pub fn try_pop(&mut self) -> Option<Load> {
        let load = self.slot.take()?;
        self.popped += 1;
        Some(load)
    }

    /// The pending load, if any.
    pub fn peek(&self) -> Option<Load> {
        self.slot
    }

    /// Whether no load is pending.
    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Whether a push would block.
    pub fn is_full(&self) -> bool {
        self.slot.is_some()
    }

    /// Total successful pushes, seeding included.
    pub fn pushed(&self) -> u64 {
        self.pushed
    }

    /// Total successful pops.
    pub fn popped(&self) -> u64 {
        self.popped
    }
}

/// The three piles of a stage.
#[derive(Clone, Debug, Default)]
pub struct Piles {
    piles: [Pile; 3],
}

impl Piles {
    /// Build from optional seed loads for the big and small piles.
    pub fn seeded(big: Option<Load>, small: Option<Load>) -> Self {
        let seed = |l: Option<Load>| l.map(Pile::with_load).unwrap_or_default();
        Self {
            piles: [seed(big), seed(small), Pile::new()],
        }
    }

    /// Borrow one pile.
    pub fn get(&self, id: PileId) -> &Pile {
        &self.piles[id.index()]
    }

    /// Mutably borrow one pile.
    pub fn get_mut(&mut self, id: PileId) -> &mut Pile {
        &mut self.piles[id.index()]
    }

    /// Pending load of every pile, in [`PileId::ALL`] order.
    pub fn contents(&self) -> [Option<Load>; 3] {
        [
            self.piles[0].peek(),
            self.piles[1].peek(),
            self.piles[2].peek(),
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/pile.rs"]
mod tests;
