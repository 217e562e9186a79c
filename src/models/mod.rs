//! Defines the data structures and models used throughout the application.
//!
//! This includes typed readings gathered for a location, the risk engine's input
//! and output records, and the wire formats of the upstream providers.

mod assessment;
mod providers;
mod readings;

pub use assessment::*;
pub use providers::*;
pub use readings::*;
