/// Waiting for the next repaint.
pub mod frame_gate;
/// One-slot handoff between two threads.
pub mod rendezvous;
