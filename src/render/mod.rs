/// Source-over compositing.
pub mod blit;
/// Snapshot diffing into sprite swaps.
pub mod renderer;
/// Page layout.
pub mod scene;
/// Drawing targets.
pub mod surface;
