//! campus-shell library
//!
//! Command parsing and execution for the `campus` binary, exported for
//! testing.

pub mod command;
pub mod error;
pub mod session;
pub mod startup;

pub use command::{parse, Command};
pub use error::{Result, ShellError};
pub use session::{Flow, OutputFormat, Session};
pub use startup::load_config;
