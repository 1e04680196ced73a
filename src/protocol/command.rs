// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

/// A decoded operator command.
///
/// `Forward` and `Backward` carry the speed magnitude `1..=5`; the direction
/// is given by the variant. `None` means the letter arrived without a usable
/// speed and the translator falls back to the creep value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Forward(Option<u8>),
    Backward(Option<u8>),
    Halt,
    TurnClockwise,
    TurnCounterClockwise,
    RaiseChassis,
    LowerChassis,
    StopActuators,
    RaiseFront,
    LowerFront,
    RaiseRear,
    LowerRear,
    MineFront,
    MineRear,
    DumpFront,
    DumpRear,
    BatteryQuery,
    SignalQuery,
    Quit,
}

impl Command {
    /// Protocol letter selecting this command.
    pub fn letter(&self) -> char {
        match self {
            Command::Forward(_) => '^',
            Command::Backward(_) => 'v',
            Command::Halt => '*',
            Command::TurnClockwise => '>',
            Command::TurnCounterClockwise => '<',
            Command::RaiseChassis => 'u',
            Command::LowerChassis => 't',
            Command::StopActuators => 'y',
            Command::RaiseFront => 'z',
            Command::LowerFront => 'x',
            Command::RaiseRear => 'c',
            Command::LowerRear => 'f',
            Command::MineFront => 'p',
            Command::MineRear => 'o',
            Command::DumpFront => 'l',
            Command::DumpRear => 'k',
            Command::BatteryQuery => 'b',
            Command::SignalQuery => 's',
            Command::Quit => '-',
        }
    }
}
