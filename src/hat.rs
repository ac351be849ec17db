//! Hat (POV / D-pad) direction mapping.
//!
//! Native hats report a position code in `0..=8`:
//! `0` is centered and `1..=8` walk clockwise starting at up.
//! [`map_hat`] turns that into a [`HatDirection`].
//!
//! Two portable encodings are exposed on [`HatDirection`]:
//! - [`HatDirection::bits`]: up/right/down/left bit flags (diagonals combine two bits).
//! - [`HatDirection::slot`]: `-1` for centered, `0..7` clockwise from up, the same
//!   convention the rest of the event pipeline uses for hats.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Cardinal hat bits. Diagonals set two of them; centered sets none.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HatBits: u8 {
        const UP    = 0x01;
        const RIGHT = 0x02;
        const DOWN  = 0x04;
        const LEFT  = 0x08;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HatDirection {
    #[default]
    Centered,
    Up,
    RightUp,
    Right,
    RightDown,
    Down,
    LeftDown,
    Left,
    LeftUp,
}

/// Native code → direction. Index 0 is centered, then clockwise from up.
static HAT_MAP: [HatDirection; 9] = [
    HatDirection::Centered,
    HatDirection::Up,
    HatDirection::RightUp,
    HatDirection::Right,
    HatDirection::RightDown,
    HatDirection::Down,
    HatDirection::LeftDown,
    HatDirection::Left,
    HatDirection::LeftUp,
];

/// Translate a native hat code.
///
/// Codes outside `0..=8` are not produced by conforming devices; they map to
/// [`HatDirection::Centered`].
#[inline]
pub fn map_hat(code: u8) -> HatDirection {
    HAT_MAP
        .get(code as usize)
        .copied()
        .unwrap_or(HatDirection::Centered)
}

impl HatDirection {
    /// Bit-flag encoding (`RIGHT | UP` for up-right, empty for centered).
    pub const fn bits(self) -> HatBits {
        match self {
            HatDirection::Centered => HatBits::empty(),
            HatDirection::Up => HatBits::UP,
            HatDirection::RightUp => HatBits::RIGHT.union(HatBits::UP),
            HatDirection::Right => HatBits::RIGHT,
            HatDirection::RightDown => HatBits::RIGHT.union(HatBits::DOWN),
            HatDirection::Down => HatBits::DOWN,
            HatDirection::LeftDown => HatBits::LEFT.union(HatBits::DOWN),
            HatDirection::Left => HatBits::LEFT,
            HatDirection::LeftUp => HatBits::LEFT.union(HatBits::UP),
        }
    }

    /// Slot encoding: `-1` neutral, `0..7` clockwise from up.
    pub const fn slot(self) -> i16 {
        match self {
            HatDirection::Centered => -1,
            HatDirection::Up => 0,
            HatDirection::RightUp => 1,
            HatDirection::Right => 2,
            HatDirection::RightDown => 3,
            HatDirection::Down => 4,
            HatDirection::LeftDown => 5,
            HatDirection::Left => 6,
            HatDirection::LeftUp => 7,
        }
    }

    #[inline]
    pub const fn is_centered(self) -> bool {
        matches!(self, HatDirection::Centered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_centered() {
        assert_eq!(map_hat(0), HatDirection::Centered);
        assert!(map_hat(0).is_centered());
    }

    #[test]
    fn codes_walk_clockwise_from_up() {
        let expected = [
            HatDirection::Up,
            HatDirection::RightUp,
            HatDirection::Right,
            HatDirection::RightDown,
            HatDirection::Down,
            HatDirection::LeftDown,
            HatDirection::Left,
            HatDirection::LeftUp,
        ];
        for (i, want) in expected.iter().enumerate() {
            let got = map_hat(i as u8 + 1);
            assert_eq!(got, *want);
            assert_eq!(got.slot(), i as i16);
        }
    }

    #[test]
    fn diagonals_combine_cardinal_bits() {
        assert_eq!(HatDirection::RightUp.bits(), HatBits::RIGHT | HatBits::UP);
        assert_eq!(HatDirection::LeftDown.bits(), HatBits::LEFT | HatBits::DOWN);
        assert!(HatDirection::Centered.bits().is_empty());
        assert_eq!(HatDirection::LeftUp.bits().bits(), 0x09);

        for code in 1..=8u8 {
            let bits = map_hat(code).bits();
            let n = bits.iter().count();
            assert_eq!(n, if code % 2 == 0 { 2 } else { 1 }, "code {code}");
            assert!(!bits.contains(HatBits::UP | HatBits::DOWN));
            assert!(!bits.contains(HatBits::LEFT | HatBits::RIGHT));
        }
    }

    #[test]
    fn out_of_range_codes_are_centered() {
        assert_eq!(map_hat(9), HatDirection::Centered);
        assert_eq!(map_hat(255), HatDirection::Centered);
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&HatDirection::LeftUp).unwrap();
        assert_eq!(json, "\"left_up\"");
    }
}
