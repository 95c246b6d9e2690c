//! Unit-of-measure code table.
//!
//! The index of a unit in [`UNITS`] is its wire code. Codes are part of the
//! LWP v1 contract: reordering or removing entries corrupts every frame
//! encoded before the change, so new units may only be appended together
//! with a protocol version bump.

/// Units in code order.
pub const UNITS: [&str; 8] = [
    "таб.",
    "капс.",
    "амп.",
    "мл",
    "г",
    "шт.",
    "пакетик",
    "суппозиторий",
];

/// Tablets.
pub const TABLET: u8 = 0;

/// Capsules.
pub const CAPSULE: u8 = 1;

/// Ampoules.
pub const AMPOULE: u8 = 2;

/// Millilitres.
pub const MILLILITRE: u8 = 3;

/// Grams.
pub const GRAM: u8 = 4;

/// Pieces.
pub const PIECE: u8 = 5;

/// Sachets.
pub const SACHET: u8 = 6;

/// Suppositories.
pub const SUPPOSITORY: u8 = 7;

/// Returns the wire code for a unit string, if it is in the table.
pub fn code_of(unit: &str) -> Option<u8> {
    UNITS
        .iter()
        .position(|candidate| *candidate == unit)
        .and_then(|index| u8::try_from(index).ok())
}

/// Returns the unit string for a wire code, if the code is in range.
pub fn name_of(code: i64) -> Option<&'static str> {
    usize::try_from(code)
        .ok()
        .and_then(|index| UNITS.get(index))
        .copied()
}

/// Iterate `(code, unit)` pairs in code order.
pub fn table() -> impl Iterator<Item = (u8, &'static str)> {
    (0u8..).zip(UNITS.iter().copied())
}
