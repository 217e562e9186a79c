//! Handles Command Line Interface (CLI) related functionalities.
//!
//! Includes the clap command definitions and the `App` that runs them, the
//! interactive prompts behind the menu mode, and terminal rendering of reports.

mod commands;
mod prompts;
mod render;

pub use commands::*;
pub use prompts::*;
pub use render::*;
