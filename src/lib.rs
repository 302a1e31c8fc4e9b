//! **wpblueprint** - WordPress Playground blueprint generator
//!
//! Turns a handful of options into a Playground blueprint, keeps manual edits
//! of that blueprint across runs, and encodes the active blueprint into a
//! launch URL.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Core pipeline - form state → blueprint → launch URL
pub mod core {
    /// Blueprint document model and step variants
    pub mod blueprint;
    pub use blueprint::{Blueprint, PluginResource, Step};

    /// Pure form → blueprint derivation
    pub mod builder;
    pub use builder::{build, run as build_run};

    /// UTF-8 → base64 fragment encoding
    pub mod encode;

    /// Explicit form input record
    pub mod form;
    pub use form::{FormState, LandingPage, PluginSource};

    /// Launch URL projection
    pub mod launch;
    pub use launch::LaunchProjector;

    /// Auto/manual mode reconciliation
    pub mod mode;
    pub use mode::{ActiveDocument, Confirm, ModeState, Reconciler};

    /// Share-link query prefill
    pub mod prefill;
    pub use prefill::Prefill;

    /// Workbench wiring and command handlers
    pub mod session;
    pub use session::Workbench;

    /// Single-slot persistence of the mode state
    pub mod snapshot;
    pub use snapshot::{RestoreOutcome, SnapshotStore};
}

/// Infrastructure - configuration, logging, I/O
pub mod infra {
    /// Configuration management with TOML support
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// tracing subscriber setup
    pub mod logging;

    /// Clipboard export
    pub mod clipboard;

    /// miette reports for invalid manual JSON
    pub mod diagnostics;

    /// Reading blueprint text from files or stdin
    pub mod io;

    /// Terminal confirmations
    pub mod prompt;
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use core::{Blueprint, FormState, Step, Workbench, build};
pub use infra::{Config, load_config};
