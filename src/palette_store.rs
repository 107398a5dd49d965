//! Ordered, duplicate-free set of user chosen colors.

use serde::{Deserialize, Serialize};

use crate::color::{Color, normalize};

/// Result of [`Palette::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// This many new colors were appended.
    Added(usize),
    /// Several tokens were given but none of them was new and valid.
    Unchanged,
    /// A single token was given and nothing was added. Callers should tell
    /// the user the entry is invalid.
    Rejected,
}

impl AddOutcome {
    pub fn is_added(self) -> bool {
        matches!(self, AddOutcome::Added(_))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AddOutcome::Added(_) => "added",
            AddOutcome::Unchanged => "unchanged",
            AddOutcome::Rejected => "rejected",
        }
    }
}

/// Palette colors in insertion order. An empty palette disables snapping.
///
/// Serializes as a JSON array of canonical hex strings. Deserializing skips
/// entries that are not valid colors and drops duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<String>", from = "Vec<String>")]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn contains(&self, color: Color) -> bool {
        self.colors.contains(&color)
    }

    /// Append `color` unless already present. Returns whether it was added.
    pub fn push(&mut self, color: Color) -> bool {
        if self.contains(color) {
            return false;
        }
        self.colors.push(color);
        true
    }

    /// Add one color or a comma separated list of colors.
    ///
    /// Each token is trimmed, given a `#` if missing and validated. Invalid
    /// tokens and colors already in the palette are skipped.
    pub fn add(&mut self, input: &str) -> AddOutcome {
        let tokens: Vec<&str> = input
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();

        let mut added = 0;
        for token in &tokens {
            let Some(color) = normalize(token).as_deref().and_then(Color::parse) else {
                log::warn!("Skipping invalid palette entry {token:?}");
                continue;
            };
            if self.push(color) {
                added += 1;
            }
        }

        match (added, tokens.len()) {
            (0, 1) => AddOutcome::Rejected,
            (0, _) => AddOutcome::Unchanged,
            (n, _) => AddOutcome::Added(n),
        }
    }

    /// Remove and return the color at `index`, `None` when out of range.
    pub fn remove_at(&mut self, index: usize) -> Option<Color> {
        (index < self.colors.len()).then(|| self.colors.remove(index))
    }

    pub fn clear(&mut self) {
        self.colors.clear();
    }

    /// Entry with the smallest squared RGB distance to `(r, g, b)`.
    ///
    /// Ties go to the earliest entry. `None` for an empty palette.
    pub fn nearest(&self, r: u8, g: u8, b: u8) -> Option<Color> {
        let mut iter = self.colors.iter().copied();
        let mut best = iter.next()?;
        let mut best_dist = best.distance_sq(r, g, b);
        for c in iter {
            let d = c.distance_sq(r, g, b);
            if d < best_dist {
                best_dist = d;
                best = c;
            }
        }
        Some(best)
    }

    /// Canonical hex strings in palette order.
    pub fn to_hex_strings(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_hex()).collect()
    }

    pub fn to_json(&self) -> String {
        serde_json::Value::from(self.to_hex_strings()).to_string()
    }

    /// Parse the persisted JSON array form. Anything malformed yields an
    /// empty palette.
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed palette data: {e}");
            Self::default()
        })
    }
}

impl From<Palette> for Vec<String> {
    fn from(palette: Palette) -> Self {
        palette.to_hex_strings()
    }
}

impl From<Vec<String>> for Palette {
    fn from(entries: Vec<String>) -> Self {
        entries.iter().map(String::as_str).collect()
    }
}

impl<'a> FromIterator<&'a str> for Palette {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut palette = Palette::new();
        for entry in iter {
            match normalize(entry).as_deref().and_then(Color::parse) {
                Some(color) => {
                    palette.push(color);
                }
                None => log::warn!("Dropping invalid palette entry {entry:?}"),
            }
        }
        palette
    }
}

impl FromIterator<Color> for Palette {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut palette = Palette::new();
        for color in iter {
            palette.push(color);
        }
        palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hexes(p: &Palette) -> Vec<String> {
        p.to_hex_strings()
    }

    #[test]
    fn add_list_skips_malformed_token() {
        let mut p = Palette::new();
        assert_eq!(p.add("#fff, invalid, #000"), AddOutcome::Added(2));
        assert_eq!(hexes(&p), ["#ffffff", "#000000"]);
    }

    #[test]
    fn add_prefixes_marker_and_dedups_by_normalized_value() {
        let mut p = Palette::new();
        assert_eq!(p.add("abc"), AddOutcome::Added(1));
        assert_eq!(p.add("#AABBCC"), AddOutcome::Rejected);
        assert_eq!(p.add("#aabbcc, abc"), AddOutcome::Unchanged);
        assert_eq!(hexes(&p), ["#aabbcc"]);
    }

    #[test]
    fn single_invalid_entry_is_rejected() {
        let mut p = Palette::new();
        let outcome = p.add("nothex");
        assert_eq!(outcome, AddOutcome::Rejected);
        assert!(!outcome.is_added());
        assert!(p.is_empty());
    }

    #[test]
    fn blank_input_adds_nothing() {
        let mut p = Palette::new();
        assert_eq!(p.add("  , ,"), AddOutcome::Unchanged);
        assert!(p.is_empty());
    }

    #[test]
    fn remove_at_ignores_out_of_range() {
        let mut p = Palette::new();
        p.add("#111,#222,#333");
        assert_eq!(p.remove_at(7), None);
        assert_eq!(p.remove_at(1), Some(Color::new(0x22, 0x22, 0x22)));
        assert_eq!(hexes(&p), ["#111111", "#333333"]);
        p.clear();
        assert!(p.is_empty());
    }

    #[test]
    fn nearest_on_empty_palette_is_none() {
        assert_eq!(Palette::new().nearest(1, 2, 3), None);
    }

    #[test]
    fn nearest_prefers_exact_match() {
        let mut p = Palette::new();
        p.add("#000000,#000001");
        assert_eq!(p.nearest(0, 0, 0), Some(Color::new(0, 0, 0)));
    }

    #[test]
    fn nearest_ties_break_to_first_entry() {
        let mut p = Palette::new();
        p.add("#000002,#000000");
        assert_eq!(p.nearest(0, 0, 1), Some(Color::new(0, 0, 2)));

        let mut reversed = Palette::new();
        reversed.add("#000000,#000002");
        assert_eq!(reversed.nearest(0, 0, 1), Some(Color::new(0, 0, 0)));
    }

    #[test]
    fn json_round_trip_keeps_order() {
        let mut p = Palette::new();
        p.add("#ff0000,#00ff00,#0000ff");
        let json = p.to_json();
        assert_eq!(json, r##"["#ff0000","#00ff00","#0000ff"]"##);
        assert_eq!(Palette::from_json(&json), p);
    }

    #[test]
    fn malformed_json_is_empty() {
        assert!(Palette::from_json("not json").is_empty());
        assert!(Palette::from_json(r#"{"a":1}"#).is_empty());
        assert!(Palette::from_json("[1,2]").is_empty());
        assert!(Palette::from_json("").is_empty());
    }

    #[test]
    fn json_drops_invalid_and_duplicate_entries() {
        let p = Palette::from_json(r##"["#fff","bogus","ffffff","#123"]"##);
        assert_eq!(hexes(&p), ["#ffffff", "#112233"]);
    }
}
