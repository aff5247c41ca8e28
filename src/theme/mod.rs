//! Theme
//!
//! Colors shared by the GPUI widgets.

pub mod colors;

pub use colors::TableColors;
