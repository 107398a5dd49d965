//! Hex <-> RGB conversion for palette entries.
//!
//! Canonical form is `#rrggbb`, lower case. The three digit shorthand
//! `#abc` expands by doubling each digit.

use std::fmt;

use palette::Srgb;

/// Marker character that prefixes every canonical hex color.
pub const MARKER: char = '#';

/// An opaque RGB color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb`, `rgb` or `rrggbb` (case-insensitive).
    ///
    /// Returns `None` for any other length or a non-hex character.
    pub fn parse(input: &str) -> Option<Self> {
        let hex = input.strip_prefix(MARKER).unwrap_or(input);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_owned(),
            _ => return None,
        };

        let num = u32::from_str_radix(&expanded, 16).ok()?;
        Some(Self {
            r: ((num >> 16) & 0xff) as u8,
            g: ((num >> 8) & 0xff) as u8,
            b: (num & 0xff) as u8,
        })
    }

    /// Canonical `#rrggbb` form.
    pub fn to_hex(self) -> String {
        self.to_string()
    }

    /// Squared Euclidean distance in RGB.
    #[inline]
    pub fn distance_sq(self, r: u8, g: u8, b: u8) -> u32 {
        let dr = self.r as i32 - r as i32;
        let dg = self.g as i32 - g as i32;
        let db = self.b as i32 - b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{MARKER}{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for Srgb<u8> {
    fn from(c: Color) -> Self {
        Srgb::new(c.r, c.g, c.b)
    }
}

impl From<Srgb<u8>> for Color {
    fn from(c: Srgb<u8>) -> Self {
        Self::new(c.red, c.green, c.blue)
    }
}

/// Parse a user supplied color, `None` when malformed.
pub fn parse_color(input: &str) -> Option<Color> {
    Color::parse(input)
}

/// Format a color in canonical `#rrggbb` form.
pub fn format_color(c: Color) -> String {
    c.to_hex()
}

/// Prefix the marker if absent and validate; yields the canonical form.
pub fn normalize(input: &str) -> Option<String> {
    let token = input.trim();
    let prefixed = if token.starts_with(MARKER) {
        token.to_owned()
    } else {
        format!("{MARKER}{token}")
    };
    Color::parse(&prefixed).map(format_color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn shorthand_expands_each_digit() {
        assert_eq!(parse_color("#abc"), Some(Color::new(0xaa, 0xbb, 0xcc)));
        assert_eq!(parse_color("fff"), Some(Color::new(255, 255, 255)));
    }

    #[test]
    fn six_digit_splits_into_bytes() {
        assert_eq!(parse_color("#12A4fE"), Some(Color::new(0x12, 0xa4, 0xfe)));
    }

    #[test]
    fn rejects_bad_lengths_and_characters() {
        for bad in ["", "#", "#ab", "#abcd", "#abcdefa", "#ggg", "#12345z", "##abc", "#+12345", "#ａbc"] {
            assert_eq!(parse_color(bad), None, "{bad:?} should be rejected");
        }
    }

    #[test]
    fn format_is_lower_case_with_marker() {
        assert_eq!(format_color(Color::new(0xAB, 0x01, 0xff)), "#ab01ff");
    }

    #[test]
    fn normalize_adds_marker_and_expands() {
        assert_eq!(normalize("F0A").as_deref(), Some("#ff00aa"));
        assert_eq!(normalize(" #000000 ").as_deref(), Some("#000000"));
        assert_eq!(normalize("invalid"), None);
    }

    #[test]
    fn distance_is_squared_euclidean() {
        let c = Color::new(10, 20, 30);
        assert_eq!(c.distance_sq(10, 20, 30), 0);
        assert_eq!(c.distance_sq(13, 24, 30), 25);
        assert_eq!(Color::new(0, 0, 0).distance_sq(255, 255, 255), 3 * 255 * 255);
    }

    proptest! {
        #[test]
        fn six_digit_round_trips(hex in "[0-9a-fA-F]{6}", marker in any::<bool>()) {
            let input = if marker { format!("#{hex}") } else { hex.clone() };
            let color = parse_color(&input).expect("valid hex");
            prop_assert_eq!(format_color(color), format!("#{}", hex.to_ascii_lowercase()));
        }
    }
}
