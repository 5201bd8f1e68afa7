//! Command line front end for tintmark
//!
//! - [`cli`]: argument definitions and their typed form
//! - [`run`]: command execution against explicit output streams
//! - [`logging`]: stderr subscriber setup

pub mod cli;
pub mod logging;
pub mod run;

pub use cli::{command, AnnotateArgs, Invocation, Overrides, ReportFormat};
pub use run::{load_config, run_annotate, run_show_config};
