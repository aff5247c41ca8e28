//! Common Table
//!
//! Declarative data table, filter bar and form dialog.
//!
//! The controllers are toolkit independent: they hold the state, talk to the
//! injected list API and callbacks, and describe their output as a
//! [`render::Node`] tree. With the default `gui` feature the tree is painted
//! with GPUI.

pub mod descriptor;
pub mod dialog;
pub mod error;
pub mod field_map;
pub mod filter_bar;
pub mod i18n;
pub mod render;
pub mod settings;
pub mod table;
pub mod validation;
pub mod value;

#[cfg(feature = "gui")]
pub mod app;
#[cfg(feature = "gui")]
pub mod components;
#[cfg(feature = "gui")]
pub mod theme;

pub use error::{Error, Result};
