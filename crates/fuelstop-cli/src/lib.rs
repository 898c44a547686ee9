//! fuelstop CLI library.
//!
//! Terminal styling and output formatting shared by the `fuelstop` binary.

pub mod output;
pub mod terminal;
