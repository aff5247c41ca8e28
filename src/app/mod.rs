//! Application Layer
//!
//! Window setup and the demo page wiring a table to a form dialog.

pub mod application;
pub mod demo;
pub mod dirs;
