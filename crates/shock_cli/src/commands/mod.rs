//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands write to the
//! supplied writer so they can be exercised without a terminal.

pub mod assess;
pub mod compare;
pub mod generate;
pub mod scenarios;
pub mod shock;
