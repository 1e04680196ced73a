// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Device instructions and their serial frame encoding
//!
//! Frames are ASCII, comma separated and terminated by `;`:
//!
//! - Drive channel: `a,<channel>,<value>;`
//! - Actuator: `<opcode>,0,0;`
//!
//! The controller firmware parses these byte for byte, so field order and
//! terminator must not change.

use std::fmt;

use super::drive_table::DriveValue;

/// Frame terminator expected by the controller.
pub const FRAME_TERMINATOR: char = ';';

/// Controller pin addressing one drive motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub u8);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Drum selected by a drum command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Drum {
    Front,
    Rear,
}

/// Binary actuator operations understood by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActuatorAction {
    /// Retract both chassis actuators.
    RaiseChassis,
    /// Extend both chassis actuators.
    LowerChassis,
    StopActuators,
    MineDrum(Drum),
    DumpDrum(Drum),
    RaiseDrum(Drum),
    LowerDrum(Drum),
}

impl ActuatorAction {
    /// Opcode leading the actuator frame.
    pub fn opcode(self) -> char {
        match self {
            ActuatorAction::RaiseChassis => 'u',
            ActuatorAction::LowerChassis => 't',
            ActuatorAction::StopActuators => 'y',
            ActuatorAction::MineDrum(Drum::Front) => 'p',
            ActuatorAction::MineDrum(Drum::Rear) => 'o',
            ActuatorAction::DumpDrum(Drum::Front) => 'l',
            ActuatorAction::DumpDrum(Drum::Rear) => 'k',
            ActuatorAction::RaiseDrum(Drum::Front) => 'z',
            ActuatorAction::LowerDrum(Drum::Front) => 'x',
            ActuatorAction::RaiseDrum(Drum::Rear) => 'c',
            ActuatorAction::LowerDrum(Drum::Rear) => 'f',
        }
    }

    /// Status line reported to the operator.
    pub fn status(self) -> &'static str {
        match self {
            ActuatorAction::RaiseChassis => "RAISE CHASSIS",
            ActuatorAction::LowerChassis => "LOWER CHASSIS",
            ActuatorAction::StopActuators => "ACTUATORS STOPPED",
            ActuatorAction::MineDrum(Drum::Front) => "MINE FRONT DRUM",
            ActuatorAction::MineDrum(Drum::Rear) => "MINE REAR DRUM",
            ActuatorAction::DumpDrum(Drum::Front) => "DUMP FRONT DRUM",
            ActuatorAction::DumpDrum(Drum::Rear) => "DUMP REAR DRUM",
            ActuatorAction::RaiseDrum(Drum::Front) => "RAISE FRONT DRUM",
            ActuatorAction::LowerDrum(Drum::Front) => "LOWER FRONT DRUM",
            ActuatorAction::RaiseDrum(Drum::Rear) => "RAISE REAR DRUM",
            ActuatorAction::LowerDrum(Drum::Rear) => "LOWER REAR DRUM",
        }
    }
}

/// One outbound instruction for the controller.
///
/// Built fresh for every dispatched command and dropped once written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceInstruction {
    Drive { channel: ChannelId, value: DriveValue },
    Actuator { action: ActuatorAction },
}

impl DeviceInstruction {
    /// Encode the instruction as a controller frame.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DeviceInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceInstruction::Drive { channel, value } => {
                write!(f, "a,{channel},{value}{FRAME_TERMINATOR}")
            }
            DeviceInstruction::Actuator { action } => {
                write!(f, "{},0,0{FRAME_TERMINATOR}", action.opcode())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_frame() {
        let instruction = DeviceInstruction::Drive {
            channel: ChannelId(5),
            value: DriveValue(200),
        };
        assert_eq!(instruction.encode(), "a,5,200;");
    }

    #[test]
    fn test_chassis_frames() {
        let frame = |action| DeviceInstruction::Actuator { action }.encode();
        assert_eq!(frame(ActuatorAction::RaiseChassis), "u,0,0;");
        assert_eq!(frame(ActuatorAction::LowerChassis), "t,0,0;");
        assert_eq!(frame(ActuatorAction::StopActuators), "y,0,0;");
    }

    #[test]
    fn test_drum_opcodes_are_distinct() {
        let actions = [
            ActuatorAction::RaiseChassis,
            ActuatorAction::LowerChassis,
            ActuatorAction::StopActuators,
            ActuatorAction::MineDrum(Drum::Front),
            ActuatorAction::MineDrum(Drum::Rear),
            ActuatorAction::DumpDrum(Drum::Front),
            ActuatorAction::DumpDrum(Drum::Rear),
            ActuatorAction::RaiseDrum(Drum::Front),
            ActuatorAction::RaiseDrum(Drum::Rear),
            ActuatorAction::LowerDrum(Drum::Front),
            ActuatorAction::LowerDrum(Drum::Rear),
        ];
        let mut opcodes: Vec<char> = actions.iter().map(|a| a.opcode()).collect();
        opcodes.sort_unstable();
        opcodes.dedup();
        assert_eq!(opcodes.len(), actions.len());
    }
}
