/// MP4 output through the system `ffmpeg`.
pub mod ffmpeg;
/// Numbered PNG files.
pub mod png;
/// The sink contract and in-memory sinks.
pub mod sink;
