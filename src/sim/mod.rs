/// The gopher state machine.
pub mod actor;
/// Tasks that fill the first pile and drain the last one.
pub mod feeder;
/// Batch sizes and carry arithmetic.
pub mod load;
/// Single-slot piles.
pub mod pile;
/// The cooperative scheduler.
pub mod stage;
