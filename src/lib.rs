//! Generates CodeLite project files for Unreal-style build targets.
//!
//! Each target's source files are arranged into a virtual folder tree rooted
//! at the target's project directory, and every requested configuration gets
//! the command the IDE runs plus the build, clean, rebuild and cook commands
//! that drive the external build tool.

pub mod api;
pub mod commands;
pub mod config;
pub mod descriptor;
pub mod errors;
pub mod generator;
pub mod model;
pub mod platform;
pub mod preview;
pub mod prompt;
pub mod relativize;
pub mod source;
pub mod transactions;
pub mod utils;
pub mod vfs;

pub use api::{generate, generate_targets, list_targets, CodeliteGenError, TargetSummary};
pub use config::{GeneratorSettings, Overrides};
pub use generator::WriteMode;
pub use model::{Configuration, ProjectTarget, SourceFile, TargetType};
pub use platform::HostPlatform;
