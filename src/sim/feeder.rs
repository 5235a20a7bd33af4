//! The two ends of the line: the replenisher topping up the big pile, and the fire.

use crate::{
    foundation::error::GophersResult,
    foundation::math::Rng64,
    sim::actor::Poll,
    sim::load::{Load, LoadRange},
    sim::pile::{PileId, Piles},
};

/// Keeps adding random loads to a pile.
#[derive(Clone, Debug)]
pub struct Replenisher {
    target: PileId,
    range: LoadRange,
    rng: Rng64,
    pending: Option<Load>,
    added: u64,
}

impl Replenisher {
    /// Feed `target` with loads drawn from `range`.
    pub fn new(target: PileId, range: LoadRange, rng: Rng64) -> GophersResult<Self> {
        range.validate()?;
        Ok(Self {
            target,
            range,
            rng,
            pending: None,
            added: 0,
        })
    }

    /// Loads handed to the pile so far.
    pub fn added(&self) -> u64 {
        self.added
    }

    /// Push one load, yielding afterwards; blocks while the pile is full.
    pub fn poll(&mut self, piles: &mut Piles) -> GophersResult<Poll> {
        let load = match self.pending.take() {
            Some(load) => load,
            None => self.range.sample(&mut self.rng)?,
        };
        match piles.get_mut(self.target).try_push(load) {
            Ok(()) => {
                self.added += 1;
                tracing::trace!(pile = self.target.name(), %load, "replenished");
                Ok(Poll::Yielded)
            }
            Err(load) => {
                self.pending = Some(load);
                Ok(Poll::Blocked)
            }
        }
    }
}

/// Burns everything that arrives on its pile.
#[derive(Clone, Debug)]
pub struct Oven {
    source: PileId,
    burned: u64,
    books: u64,
}

impl Oven {
    /// Drain `source`.
    pub fn new(source: PileId) -> Self {
        Self {
            source,
            burned: 0,
            books: 0,
        }
    }

    /// Loads burned so far.
    pub fn burned(&self) -> u64 {
        self.burned
    }

    /// Books burned so far, summed over all loads.
    pub fn books(&self) -> u64 {
        self.books
    }

    /// Burn one load, yielding afterwards; blocks while the pile is empty.
    pub fn poll(&mut self, piles: &mut Piles) -> Poll {
        match piles.get_mut(self.source).try_pop() {
            Some(load) => {
                self.burned += 1;
                self.books += u64::from(load.get());
                tracing::trace!(%load, burned = self.burned, "burned");
                Poll::Yielded
            }
            None => Poll::Blocked,
        }
    }
}
