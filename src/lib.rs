//! Gophers is a frame-paced animation of two cooperating workers carrying books from a pile to
//! an oven, after Rob Pike's "Concurrency is not Parallelism" talk.
//!
//! The simulation is a deterministic cooperative scheduler:
//!
//! - A [`Stage`] owns the piles, both gophers and the feeding loops, and steps exactly one task
//!   per call, publishing a [`WorldSnapshot`] after every yield
//! - [`Show::start`] runs the stage on a worker thread that hands each snapshot to the presenter
//!   through a one-slot [`Rendezvous`]
//! - A [`Renderer`] diffs snapshots into sprite swaps on a [`Surface`], each swap presented as a
//!   frame once the [`FrameGate`] lets the next repaint through
#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Bitmap loading: built-in artwork, PNG/SVG decoding, background store.
pub mod assets;
/// Frame sinks: in-memory, PNG sequence, MP4 through `ffmpeg`.
pub mod encode;
mod foundation;
/// Surfaces, the page layout and the diffing renderer.
pub mod render;
/// Cross-thread handoff and repaint pacing.
pub mod sched;
/// Configuration and lifecycle of a run.
pub mod show;
/// The simulated world: loads, piles, gophers and the cooperative stage.
pub mod sim;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgba8Premul, Vec2};
pub use crate::foundation::error::{GophersError, GophersResult};
pub use crate::foundation::math::Rng64;

pub use crate::assets::store::{AssetSource, AssetStatus, AssetStore, Bitmap, BitmapKey};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SharedSink, SinkConfig};
pub use crate::render::renderer::{Renderer, SampleStats};
pub use crate::render::surface::{DrawCall, FrameRGBA, RasterSurface, RecordingSurface, Surface};
pub use crate::sched::frame_gate::{FrameGate, FrameScheduler, ImmediateFrames, PacedFrames};
pub use crate::sched::rendezvous::Rendezvous;
pub use crate::show::config::ShowConfig;
pub use crate::show::runner::{PlayReport, RunningShow, Show, Transition, play, trace};
pub use crate::sim::actor::{ActorId, ActorPose, ActorState};
pub use crate::sim::load::{Load, LoadRange};
pub use crate::sim::pile::PileId;
pub use crate::sim::stage::{Stage, StageConfig, StageStats, TaskId, WorldSnapshot};
