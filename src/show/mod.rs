/// JSON run configuration.
pub mod config;
/// Worker lifecycle and the presenter loop.
pub mod runner;
