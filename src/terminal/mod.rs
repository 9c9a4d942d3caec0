//! Shared terminal utilities.
//!
//! Box drawing, width-aware layout, keypad grids and raw mode management.

mod output;
mod raw_mode;

pub use output::*;
pub use raw_mode::*;
