//! Named board positions for human-facing input.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// A cell named by row and column, in row-major order.
///
/// Labels are kebab-case (`"top-left"`, `"center"`) and parse
/// case-insensitively.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Position {
    /// Index 0.
    TopLeft,
    /// Index 1.
    TopCenter,
    /// Index 2.
    TopRight,
    /// Index 3.
    MiddleLeft,
    /// Index 4.
    Center,
    /// Index 5.
    MiddleRight,
    /// Index 6.
    BottomLeft,
    /// Index 7.
    BottomCenter,
    /// Index 8.
    BottomRight,
}

impl Position {
    /// Row-major order; `ALL[i].to_index() == i`.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Kebab-case label, as accepted by [`Position::parse`].
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// Parses a 1-based cell number (as printed on the board) or a label.
    ///
    /// Spaces and underscores in a label count as hyphens, so "top left"
    /// and "Top_Left" both name [`Position::TopLeft`].
    #[instrument]
    pub fn parse(input: &str) -> Option<Position> {
        let input = input.trim();
        if let Ok(number) = input.parse::<usize>() {
            return number.checked_sub(1).and_then(Self::from_index);
        }
        let label: String = input
            .chars()
            .map(|c| if c == ' ' || c == '_' { '-' } else { c })
            .collect();
        Position::from_str(&label).ok()
    }

    /// Board index (0-8).
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Position for a board index, `None` past 8.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_index_roundtrip_matches_row_major() {
        for (i, pos) in Position::iter().enumerate() {
            assert_eq!(pos.to_index(), i);
            assert_eq!(Position::from_index(i), Some(pos));
        }
        assert_eq!(Position::from_index(9), None);
    }

    #[test]
    fn test_parse_numbers_are_one_based() {
        assert_eq!(Position::parse("1"), Some(Position::TopLeft));
        assert_eq!(Position::parse(" 9 "), Some(Position::BottomRight));
        assert_eq!(Position::parse("0"), None);
        assert_eq!(Position::parse("10"), None);
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!(Position::parse("center"), Some(Position::Center));
        assert_eq!(Position::parse("Top Left"), Some(Position::TopLeft));
        assert_eq!(Position::parse("bottom_center"), Some(Position::BottomCenter));
        assert_eq!(Position::parse("middle"), None);
    }

    #[test]
    fn test_label_matches_display() {
        assert_eq!(Position::MiddleRight.label(), "middle-right");
        assert_eq!(Position::MiddleRight.to_string(), "middle-right");
    }
}
