//! Fixed layout of the page: where every sprite and text block sits.

use crate::{assets::store::BitmapKey, sim::actor::ActorId, sim::actor::ActorState};

/// A positioned bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sprite {
    /// Bitmap currently shown.
    pub key: BitmapKey,
    /// Left edge in canvas pixels.
    pub x: i32,
    /// Top edge in canvas pixels.
    pub y: i32,
}

impl Sprite {
    /// A sprite showing `key` at `(x, y)`.
    pub const fn new(key: BitmapKey, x: i32, y: i32) -> Self {
        Self { key, x, y }
    }
}

/// Big pile of books on the left.
pub const BIG_PILE: Sprite = Sprite::new(BitmapKey::BigPile, 10, 20);
/// Oven on the right.
pub const OVEN: Sprite = Sprite::new(BitmapKey::Oven, 690, 0);
/// Code extract in the centre.
pub const FUNCTION: Sprite = Sprite::new(BitmapKey::Function, 200, 110);
/// Middle pile, starting empty.
pub const BOOKS: Sprite = Sprite::new(BitmapKey::EmptyPile, 390, 50);

/// Row of the first code line; each state is one row further down.
pub const LOGO_TOP: i32 = 140;
/// Distance between code rows.
pub const LOGO_ROW: i32 = 15;

/// Text block on the left: content, x, first baseline.
pub const EXPLANATION: (&str, i32, i32) = (
    "Both animated gophers are\n\
     running the code on the right.\n\
     The 2 logos show where they\n\
     each are in that code now.\n\
     Each gopher is a task stepped\n\
     by a cooperative scheduler.",
    10,
    140,
);

/// Text block on the right.
pub const CREDITS: (&str, i32, i32) = (
    "Inspired by Rob Pike:\n\
     \"Concurrency is not Parallelism\"\n\
     http://blog.golang.org/\n\
     concurrency-is-not-parallelism\n\
     \n\
     - Gopher by Renee French",
    630,
    140,
);

/// Top-left corner of a gopher standing at the start of its run.
pub fn gopher_base(actor: ActorId) -> (i32, i32) {
    match actor {
        ActorId::Left => (90, 45),
        ActorId::Right => (420, 45),
    }
}

/// Column of the code indicator belonging to `actor`.
pub fn logo_x(actor: ActorId) -> i32 {
    match actor {
        ActorId::Left => 230,
        ActorId::Right => 540,
    }
}

/// Bitmap of `actor`'s code indicator.
pub fn logo_key(actor: ActorId) -> BitmapKey {
    match actor {
        ActorId::Left => BitmapKey::Logo,
        ActorId::Right => BitmapKey::LogoFlipped,
    }
}

/// Row of the code line an actor in `state` is executing.
pub fn logo_y(state: ActorState) -> i32 {
    LOGO_TOP + LOGO_ROW * i32::from(state.index())
}

/// Gopher bitmap shown in `state`.
pub fn state_bitmap(state: ActorState) -> BitmapKey {
    match state {
        ActorState::Picking => BitmapKey::Pick,
        ActorState::Carrying => BitmapKey::Full,
        ActorState::Unloading => BitmapKey::Shovel,
        ActorState::Returning => BitmapKey::Empty,
    }
}

/// Whether leaving `state` must erase the old sprite first, because the next bitmap does not
/// fully cover it.
pub fn erases_on_exit(state: ActorState) -> bool {
    matches!(state, ActorState::Unloading | ActorState::Picking)
}
