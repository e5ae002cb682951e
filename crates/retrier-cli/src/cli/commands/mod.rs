//! CLI command handlers. Each command is in its own file.

mod completions;
mod demo;
mod exec;
mod policies;

pub use completions::{run_completions, run_man};
pub use demo::run_demo;
pub use exec::run_exec;
pub use policies::run_policies;
