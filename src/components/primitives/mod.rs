//! Primitive Components
//!
//! Basic building blocks like buttons, inputs, etc.

pub mod button;
pub mod checkbox;
pub mod choice_group;
pub mod switch;
pub mod text_input;

pub use button::Button;
pub use checkbox::Checkbox;
pub use choice_group::ChoiceGroup;
pub use switch::Switch;
pub use text_input::{OnText, TextInputs};
