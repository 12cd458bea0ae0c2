//! Configuration for the Stratum heightmap synthesizer.
//!
//! Settings persist to disk as RON files, tolerate missing and unknown
//! fields, and can be overridden from the command line via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BaseAltitudeConfig, BlendingConfig, Config, DebugConfig, GenerationConfig, IndexingMode,
    OctaveConfig, OutputConfig, RenderConfig,
};
pub use error::ConfigError;
