//! Colors - Table Theme Colors

use gpui::{Rgba, rgb, rgba};

/// Color palette of the table widgets, accessed via associated functions
pub struct TableColors;

impl TableColors {
    // Accents
    /// Primary accent - Blue
    pub fn accent() -> Rgba { rgb(0x409eff) }
    /// Primary accent on hover
    pub fn accent_hover() -> Rgba { rgb(0x66b1ff) }
    /// Light accent for selected chips
    pub fn accent_light() -> Rgba { rgb(0xecf5ff) }

    // Backgrounds
    /// Page background
    pub fn background() -> Rgba { rgb(0xf5f5f5) }
    /// Panel background
    pub fn content_bg() -> Rgba { rgb(0xffffff) }
    /// Modal backdrop
    pub fn backdrop() -> Rgba { rgba(0x00000088) }

    // Text
    /// Primary text
    pub fn text_primary() -> Rgba { rgb(0x303133) }
    /// Secondary text
    pub fn text_secondary() -> Rgba { rgb(0x606266) }
    /// Muted text
    pub fn text_muted() -> Rgba { rgb(0x909399) }
    /// Text on accent backgrounds
    pub fn text_light() -> Rgba { rgb(0xffffff) }

    // Status
    /// Error text and required markers
    pub fn danger() -> Rgba { rgb(0xf56c6c) }
    /// Switch track when on
    pub fn switch_on() -> Rgba { rgb(0x13ce66) }
    /// Switch track when off
    pub fn switch_off() -> Rgba { rgb(0xdcdfe6) }

    // Borders
    /// Default border
    pub fn border() -> Rgba { rgb(0xebeef5) }

    // Buttons
    /// Default button background
    pub fn button_default_bg() -> Rgba { rgb(0xffffff) }
    /// Default button hover background
    pub fn button_default_hover() -> Rgba { rgb(0xf2f6fc) }
    /// Default button border
    pub fn button_default_border() -> Rgba { rgb(0xdcdfe6) }

    // Table
    /// Header background
    pub fn table_header_bg() -> Rgba { rgb(0xf8f8f9) }
    /// Row hover
    pub fn table_row_hover() -> Rgba { rgb(0xf5f7fa) }
    /// Alternate row
    pub fn table_row_alt() -> Rgba { rgb(0xfafafa) }

    // Inputs
    /// Input background
    pub fn input_bg() -> Rgba { rgb(0xffffff) }
    /// Input border
    pub fn input_border() -> Rgba { rgb(0xdcdfe6) }
}
