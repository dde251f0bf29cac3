//! Color handling for OmniGraffle documents.
//!
//! OmniGraffle stores colors as normalized `r`, `g`, `b` (and `a`) channel
//! intensities in the `[0, 1]` range. This module provides the [`Color`] type
//! which wraps an opaque sRGB color from the color crate and encodes it the
//! way SVG style declarations expect.
//!
//! # Encoding
//!
//! Each channel is encoded as a two-digit lowercase hexadecimal byte computed
//! as `round(min(channel * 256, 255))`. The multiplier is 256, not 255, so
//! `0.5` maps to `0x80`:
//!
//! ```
//! # use graffle_core::color::Color;
//! let color = Color::new(1.0, 0.0, 0.5);
//! assert_eq!(color.to_hex(), "ff0080");
//! ```

use std::fmt;

use color::{OpaqueColor, Srgb};

/// An opaque RGB color. Alpha is not carried: OmniGraffle's alpha channel is
/// ignored when rendering.
#[derive(Clone, Copy, Debug)]
pub struct Color {
    color: OpaqueColor<Srgb>,
}

impl Color {
    /// Creates a color from normalized channel intensities.
    pub fn new(red: f32, green: f32, blue: f32) -> Self {
        Self {
            color: OpaqueColor::new([red, green, blue]),
        }
    }

    /// Creates a grayscale color from a single white intensity.
    pub fn gray(white: f32) -> Self {
        Self::new(white, white, white)
    }

    /// Returns black, the fallback color for strokes and text.
    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Returns the red channel intensity.
    pub fn red(self) -> f32 {
        self.color.components[0]
    }

    /// Returns the green channel intensity.
    pub fn green(self) -> f32 {
        self.color.components[1]
    }

    /// Returns the blue channel intensity.
    pub fn blue(self) -> f32 {
        self.color.components[2]
    }

    /// Encodes the color as six lowercase hex digits without a leading `#`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use graffle_core::color::Color;
    /// assert_eq!(Color::black().to_hex(), "000000");
    /// assert_eq!(Color::gray(1.0).to_hex(), "ffffff");
    /// ```
    pub fn to_hex(self) -> String {
        format!(
            "{:02x}{:02x}{:02x}",
            channel_to_byte(self.red()),
            channel_to_byte(self.green()),
            channel_to_byte(self.blue())
        )
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.color.components == other.color.components
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

/// Scales a normalized channel by 256, clamps it to a byte and rounds.
fn channel_to_byte(channel: f32) -> u8 {
    // NaN saturates to 0 through the `as` cast.
    (channel * 256.0).clamp(0.0, 255.0).round() as u8
}
