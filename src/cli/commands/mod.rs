//! One module per subcommand.  Each exposes an `execute` entry point.

pub mod clear;
pub mod completions;
pub mod delete;
pub mod detect;
pub mod get;
pub mod history;
pub mod list;
pub mod mask;
pub mod set;
pub mod status;
