// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Operator command parser
//!
//! Turns one raw payload into a [`Command`]. The first character picks the
//! command; `^` and `v` take an optional speed after a one character separator
//! (`^,3`). Speed handling:
//!
//! - `1..=5` (either sign) → `Some(magnitude)`
//! - exactly `0` → [`Command::Halt`]
//! - anything else, including nothing → `None`

use thiserror::Error;

use super::command::Command;
use crate::actuation::drive_table::MAX_LEVEL;

/// Errors produced while decoding a payload.
///
/// None of these end the session; the session manager answers them with an
/// error reply and keeps reading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty payload")]
    Empty,

    #[error("unimplemented command '{0}'")]
    Unimplemented(char),

    #[error("{reason}")]
    Malformed { reason: String, payload: String },
}

impl ParseError {
    /// Payload text the error refers to, for echoing back to the operator.
    pub fn payload(&self) -> String {
        match self {
            ParseError::Empty => String::new(),
            ParseError::Unimplemented(letter) => letter.to_string(),
            ParseError::Malformed { payload, .. } => payload.clone(),
        }
    }
}

enum SpeedArgument {
    Level(u8),
    Stop,
    Missing,
}

/// Decode one payload.
///
/// Surrounding ASCII whitespace and one trailing `;` are ignored.
pub fn parse(payload: &[u8]) -> Result<Command, ParseError> {
    let text = std::str::from_utf8(payload).map_err(|err| ParseError::Malformed {
        reason: err.to_string(),
        payload: String::from_utf8_lossy(payload).into_owned(),
    })?;
    let text = text.trim();
    let text = text.strip_suffix(';').unwrap_or(text).trim_end();

    let mut chars = text.chars();
    let letter = chars.next().ok_or(ParseError::Empty)?;

    let command = match letter {
        '^' => match speed_argument(chars) {
            SpeedArgument::Level(magnitude) => Command::Forward(Some(magnitude)),
            SpeedArgument::Stop => Command::Halt,
            SpeedArgument::Missing => Command::Forward(None),
        },
        'v' => match speed_argument(chars) {
            SpeedArgument::Level(magnitude) => Command::Backward(Some(magnitude)),
            SpeedArgument::Stop => Command::Halt,
            SpeedArgument::Missing => Command::Backward(None),
        },
        '*' => Command::Halt,
        '>' => Command::TurnClockwise,
        '<' => Command::TurnCounterClockwise,
        'u' => Command::RaiseChassis,
        't' => Command::LowerChassis,
        'y' => Command::StopActuators,
        'z' => Command::RaiseFront,
        'x' => Command::LowerFront,
        'c' => Command::RaiseRear,
        'f' => Command::LowerRear,
        'p' => Command::MineFront,
        'o' => Command::MineRear,
        'l' => Command::DumpFront,
        'k' => Command::DumpRear,
        'b' => Command::BatteryQuery,
        's' => Command::SignalQuery,
        '-' => Command::Quit,
        other => return Err(ParseError::Unimplemented(other)),
    };

    Ok(command)
}

/// `chars` is positioned just after the command letter; the separator is skipped.
fn speed_argument(mut chars: std::str::Chars<'_>) -> SpeedArgument {
    chars.next();
    let argument = chars.as_str();

    if argument == "0" {
        return SpeedArgument::Stop;
    }

    match argument.parse::<i64>() {
        Ok(level) if (1..=MAX_LEVEL as u64).contains(&level.unsigned_abs()) => {
            SpeedArgument::Level(level.unsigned_abs() as u8)
        }
        _ => SpeedArgument::Missing,
    }
}
