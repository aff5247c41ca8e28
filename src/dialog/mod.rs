//! Form Dialog
//!
//! Modal form editing a [`FormData`](crate::value::FormData) built from field
//! descriptors, with validation and async submit/cancel callbacks.

pub mod controller;
pub mod rules;

use serde_json::Value;

pub use controller::{
    CancelRequest, DialogController, DialogEffect, DialogItem, DialogProps, DialogView,
    SubmitRequest,
};
pub use rules::derive_rules;

/// Events emitted by the dialog's controls
#[derive(Debug, Clone, PartialEq)]
pub enum DialogEvent {
    /// A bound control produced a new value
    Input { key: String, value: Option<Value> },
    /// Confirm button
    Submit,
    /// Cancel button or modal close
    Cancel,
}
