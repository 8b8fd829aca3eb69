//! # StampKit
//!
//! Print-accurate rubber-stamp layout with vector and monochrome PDF export.
//!
//! ## Architecture
//!
//! StampKit is organized as a workspace with multiple crates:
//!
//! 1. **stampkit-core** - Error type and the mm/px/pt unit converter
//! 2. **stampkit-settings** - Editor configuration (margins, snapping, fonts, export)
//! 3. **stampkit-designer** - Scene, constraints, alignment, history and PDF export
//! 4. **stampkit** - Command-line front end that integrates all crates

pub mod cli;

pub use stampkit_core::{Error, Result, UnitConverter, PX_PER_MM};
pub use stampkit_designer as designer;
pub use stampkit_designer::{
    DesignFile, Scene, SceneDescription, StampSession, StampSize,
};
pub use stampkit_settings::{BoundaryMode, EditorConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("STAMPKIT_BUILD_DATE");

/// Version and build date, shown by `--version`
pub const LONG_VERSION: &str = env!("STAMPKIT_LONG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so command output on stdout stays clean
/// - RUST_LOG environment variable support
/// - Targets and line numbers on every event
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
