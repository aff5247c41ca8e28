//! Components - Reusable UI Components
//!
//! GPUI painters for the render trees produced by the controllers.

pub mod composite;
pub mod primitives;
