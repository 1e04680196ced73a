// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Speed level to drive value mapping
//!
//! The motor controllers take a raw drive code per channel:
//!
//! | Range     | Meaning |
//! |-----------|---------|
//! | 125 – 185 | reverse |
//! | 186 – 190 | neutral |
//! | 191 – 254 | forward |
//!
//! Operators never send raw codes. They pick a signed speed level in `-5..=5`
//! and the [`DriveLevelTable`] resolves it to the calibrated drive value.

use std::fmt;

use thiserror::Error;

/// Number of entries in a drive level table (levels -5 through 5).
pub const LEVEL_COUNT: usize = 11;

/// Largest speed level magnitude accepted by the protocol.
pub const MAX_LEVEL: i8 = 5;

/// Calibrated drive values for levels -5..=5.
pub const STANDARD_LEVELS: [u8; LEVEL_COUNT] =
    [125, 135, 150, 170, 180, 187, 200, 210, 220, 235, 254];

/// Signed speed level chosen by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpeedLevel(i8);

impl SpeedLevel {
    pub const NEUTRAL: SpeedLevel = SpeedLevel(0);

    /// Returns `None` when `level` falls outside `-5..=5`.
    pub fn new(level: i8) -> Option<Self> {
        (-MAX_LEVEL..=MAX_LEVEL)
            .contains(&level)
            .then_some(SpeedLevel(level))
    }

    /// Forward level of the given magnitude.
    pub fn forward(magnitude: u8) -> Option<Self> {
        i8::try_from(magnitude).ok().and_then(Self::new)
    }

    /// Reverse level of the given magnitude.
    pub fn reverse(magnitude: u8) -> Option<Self> {
        i8::try_from(magnitude).ok().and_then(|m| Self::new(-m))
    }

    pub fn get(self) -> i8 {
        self.0
    }

    fn index(self) -> usize {
        (self.0 + MAX_LEVEL) as usize
    }
}

impl fmt::Display for SpeedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw code written into a drive channel frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DriveValue(pub u8);

impl fmt::Display for DriveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DriveTableError {
    #[error("drive level table needs {LEVEL_COUNT} entries, got {0}")]
    WrongLength(usize),

    #[error("drive level table must be strictly increasing (level {level} = {value} after {previous})")]
    NotIncreasing { level: i8, value: u8, previous: u8 },
}

/// Immutable mapping from [`SpeedLevel`] to [`DriveValue`].
///
/// Built once at startup, either from [`STANDARD_LEVELS`] or from the `drive.levels`
/// configuration entry. Values are strictly increasing, which keeps the mapping
/// bijective and places the neutral code at level 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveLevelTable {
    values: [u8; LEVEL_COUNT],
}

impl Default for DriveLevelTable {
    fn default() -> Self {
        Self {
            values: STANDARD_LEVELS,
        }
    }
}

impl TryFrom<&[u8]> for DriveLevelTable {
    type Error = DriveTableError;

    fn try_from(values: &[u8]) -> Result<Self, Self::Error> {
        let values: [u8; LEVEL_COUNT] = values
            .try_into()
            .map_err(|_| DriveTableError::WrongLength(values.len()))?;

        for (index, pair) in values.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(DriveTableError::NotIncreasing {
                    level: index as i8 + 1 - MAX_LEVEL,
                    value: pair[1],
                    previous: pair[0],
                });
            }
        }

        Ok(Self { values })
    }
}

impl DriveLevelTable {
    pub fn lookup(&self, level: SpeedLevel) -> DriveValue {
        DriveValue(self.values[level.index()])
    }

    pub fn neutral(&self) -> DriveValue {
        self.lookup(SpeedLevel::NEUTRAL)
    }
}
