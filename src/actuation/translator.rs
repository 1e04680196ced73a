// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Command to device instruction translation
//!
//! The translator never touches the device channel. It returns the frames to
//! write and the reply to send, and the session manager executes them.

use anyhow::{Context, Result};

use super::drive_table::{DriveLevelTable, DriveValue, SpeedLevel};
use super::instruction::{ActuatorAction, ChannelId, DeviceInstruction, Drum};
use crate::config::DriveConfig;
use crate::protocol::{Command, ParseError};

/// Reply sent when the command letter is not part of the protocol.
pub const UNIMPLEMENTED_REPLY: &str = " -Error: unimplemented command.";

/// Acknowledgement sent before the session terminates.
pub const QUIT_REPLY: &str = "Terminating...";

/// Reply to send back to the operator once the instructions are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Status(String),
    /// Answered by the telemetry collaborator.
    Battery,
    /// Answered by the telemetry collaborator.
    Signal,
}

/// Outcome of translating one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Instructions in the order they must be written.
    pub instructions: Vec<DeviceInstruction>,
    pub reply: Reply,
    /// Set by `Quit`: the session ends after the reply.
    pub terminate: bool,
}

impl Translation {
    fn status(instructions: Vec<DeviceInstruction>, reply: impl Into<String>) -> Self {
        Self {
            instructions,
            reply: Reply::Status(reply.into()),
            terminate: false,
        }
    }

    /// Error reply for a payload the parser refused. No instruction is emitted.
    pub fn rejected(error: &ParseError) -> Self {
        let reply = match error {
            ParseError::Unimplemented(_) => UNIMPLEMENTED_REPLY.to_string(),
            ParseError::Empty | ParseError::Malformed { .. } => {
                format!("Problem parsing data: {} ...data: {}", error, error.payload())
            }
        };
        Self::status(Vec::new(), reply)
    }
}

/// The four drive motors, in the order frames are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveChannels {
    pub front_right: ChannelId,
    pub front_left: ChannelId,
    pub rear_right: ChannelId,
    pub rear_left: ChannelId,
}

impl Default for DriveChannels {
    fn default() -> Self {
        Self {
            front_right: ChannelId(5),
            front_left: ChannelId(7),
            rear_right: ChannelId(10),
            rear_left: ChannelId(8),
        }
    }
}

impl DriveChannels {
    pub fn all(&self) -> [ChannelId; 4] {
        [
            self.front_right,
            self.front_left,
            self.rear_right,
            self.rear_left,
        ]
    }

    fn is_right(&self, channel: ChannelId) -> bool {
        channel == self.front_right || channel == self.rear_right
    }
}

/// Maps commands onto drive and actuator instructions.
#[derive(Debug, Clone)]
pub struct ActuatorTranslator {
    table: DriveLevelTable,
    channels: DriveChannels,
    creep_forward: DriveValue,
    creep_backward: DriveValue,
    turn_level: u8,
}

impl Default for ActuatorTranslator {
    fn default() -> Self {
        Self {
            table: DriveLevelTable::default(),
            channels: DriveChannels::default(),
            creep_forward: DriveValue(200),
            creep_backward: DriveValue(180),
            turn_level: 1,
        }
    }
}

impl ActuatorTranslator {
    /// Build the translator from the `drive` configuration section.
    pub fn from_config(config: &DriveConfig) -> Result<Self> {
        let table = DriveLevelTable::try_from(config.levels.as_slice())
            .context("Invalid drive level table")?;

        Ok(Self {
            table,
            channels: DriveChannels {
                front_right: ChannelId(config.channels.front_right),
                front_left: ChannelId(config.channels.front_left),
                rear_right: ChannelId(config.channels.rear_right),
                rear_left: ChannelId(config.channels.rear_left),
            },
            creep_forward: DriveValue(config.creep_forward),
            creep_backward: DriveValue(config.creep_backward),
            turn_level: config.turn_level,
        })
    }

    pub fn translate(&self, command: &Command) -> Translation {
        match *command {
            Command::Forward(level) => {
                match level.and_then(SpeedLevel::forward).filter(|l| l.get() > 0) {
                    Some(level) => {
                        let value = self.table.lookup(level);
                        Translation::status(self.drive_all(value), format!("GO FWD {value}"))
                    }
                    None => Translation::status(
                        self.drive_all(self.creep_forward),
                        "GO FWD - (no speed set)",
                    ),
                }
            }
            Command::Backward(level) => {
                match level.and_then(SpeedLevel::reverse).filter(|l| l.get() < 0) {
                    Some(level) => {
                        let value = self.table.lookup(level);
                        Translation::status(self.drive_all(value), format!("GO BWD {value}"))
                    }
                    None => Translation::status(
                        self.drive_all(self.creep_backward),
                        "GO BWD - (no speed set)",
                    ),
                }
            }
            Command::Halt => Translation::status(self.drive_all(self.table.neutral()), "STOP"),
            Command::TurnClockwise => Translation::status(self.turn(true), "TURN CW"),
            Command::TurnCounterClockwise => Translation::status(self.turn(false), "TURN CCW"),
            Command::RaiseChassis => self.actuate(ActuatorAction::RaiseChassis),
            Command::LowerChassis => self.actuate(ActuatorAction::LowerChassis),
            Command::StopActuators => self.actuate(ActuatorAction::StopActuators),
            Command::RaiseFront => self.actuate(ActuatorAction::RaiseDrum(Drum::Front)),
            Command::LowerFront => self.actuate(ActuatorAction::LowerDrum(Drum::Front)),
            Command::RaiseRear => self.actuate(ActuatorAction::RaiseDrum(Drum::Rear)),
            Command::LowerRear => self.actuate(ActuatorAction::LowerDrum(Drum::Rear)),
            Command::MineFront => self.actuate(ActuatorAction::MineDrum(Drum::Front)),
            Command::MineRear => self.actuate(ActuatorAction::MineDrum(Drum::Rear)),
            Command::DumpFront => self.actuate(ActuatorAction::DumpDrum(Drum::Front)),
            Command::DumpRear => self.actuate(ActuatorAction::DumpDrum(Drum::Rear)),
            Command::BatteryQuery => Translation {
                instructions: Vec::new(),
                reply: Reply::Battery,
                terminate: false,
            },
            Command::SignalQuery => Translation {
                instructions: Vec::new(),
                reply: Reply::Signal,
                terminate: false,
            },
            Command::Quit => Translation {
                instructions: Vec::new(),
                reply: Reply::Status(QUIT_REPLY.to_string()),
                terminate: true,
            },
        }
    }

    fn drive_all(&self, value: DriveValue) -> Vec<DeviceInstruction> {
        self.channels
            .all()
            .into_iter()
            .map(|channel| DeviceInstruction::Drive { channel, value })
            .collect()
    }

    /// Skid-steer turn: one side forward, the other in reverse.
    fn turn(&self, clockwise: bool) -> Vec<DeviceInstruction> {
        let forward = SpeedLevel::forward(self.turn_level).unwrap_or(SpeedLevel::NEUTRAL);
        let reverse = SpeedLevel::reverse(self.turn_level).unwrap_or(SpeedLevel::NEUTRAL);

        self.channels
            .all()
            .into_iter()
            .map(|channel| {
                let level = if self.channels.is_right(channel) == clockwise {
                    reverse
                } else {
                    forward
                };
                DeviceInstruction::Drive {
                    channel,
                    value: self.table.lookup(level),
                }
            })
            .collect()
    }

    fn actuate(&self, action: ActuatorAction) -> Translation {
        Translation::status(
            vec![DeviceInstruction::Actuator { action }],
            action.status(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive_values(translation: &Translation) -> Vec<(u8, u8)> {
        translation
            .instructions
            .iter()
            .map(|instruction| match instruction {
                DeviceInstruction::Drive { channel, value } => (channel.0, value.0),
                other => panic!("unexpected instruction {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_forward_and_backward_levels_use_table() {
        let translator = ActuatorTranslator::default();
        let table = DriveLevelTable::default();

        for n in 1..=5u8 {
            let forward = translator.translate(&Command::Forward(Some(n)));
            let expected = table.lookup(SpeedLevel::forward(n).unwrap());
            assert_eq!(forward.instructions.len(), 4);
            assert!(drive_values(&forward).iter().all(|(_, v)| *v == expected.0));
            assert_eq!(forward.reply, Reply::Status(format!("GO FWD {expected}")));

            let backward = translator.translate(&Command::Backward(Some(n)));
            let expected = table.lookup(SpeedLevel::reverse(n).unwrap());
            assert_eq!(backward.instructions.len(), 4);
            assert!(drive_values(&backward).iter().all(|(_, v)| *v == expected.0));
            assert_eq!(backward.reply, Reply::Status(format!("GO BWD {expected}")));
        }
    }

    #[test]
    fn test_forward_three_is_220_on_every_channel() {
        let translation = ActuatorTranslator::default().translate(&Command::Forward(Some(3)));
        assert_eq!(
            drive_values(&translation),
            vec![(5, 220), (7, 220), (10, 220), (8, 220)]
        );
        assert_eq!(translation.reply, Reply::Status("GO FWD 220".to_string()));
        let frames: Vec<String> = translation.instructions.iter().map(|i| i.encode()).collect();
        assert_eq!(frames, ["a,5,220;", "a,7,220;", "a,10,220;", "a,8,220;"]);
    }

    #[test]
    fn test_halt_uses_neutral() {
        let translator = ActuatorTranslator::default();
        translator.translate(&Command::Forward(Some(5)));
        let translation = translator.translate(&Command::Halt);
        assert!(drive_values(&translation).iter().all(|(_, v)| *v == 187));
        assert_eq!(translation.reply, Reply::Status("STOP".to_string()));
    }

    #[test]
    fn test_creep_without_speed() {
        let translator = ActuatorTranslator::default();

        let forward = translator.translate(&Command::Forward(None));
        assert!(drive_values(&forward).iter().all(|(_, v)| *v == 200));
        assert_eq!(
            forward.reply,
            Reply::Status("GO FWD - (no speed set)".to_string())
        );

        let backward = translator.translate(&Command::Backward(None));
        assert!(drive_values(&backward).iter().all(|(_, v)| *v == 180));

        // Out of range magnitudes built by hand degrade the same way
        let wild = translator.translate(&Command::Forward(Some(9)));
        assert!(drive_values(&wild).iter().all(|(_, v)| *v == 200));
    }

    #[test]
    fn test_turns_split_sides() {
        let translator = ActuatorTranslator::default();
        let cw = translator.translate(&Command::TurnClockwise);
        assert_eq!(
            drive_values(&cw),
            vec![(5, 180), (7, 200), (10, 180), (8, 200)]
        );
        let ccw = translator.translate(&Command::TurnCounterClockwise);
        assert_eq!(
            drive_values(&ccw),
            vec![(5, 200), (7, 180), (10, 200), (8, 180)]
        );
    }

    #[test]
    fn test_actuator_commands_emit_single_frame() {
        let translator = ActuatorTranslator::default();
        let cases = [
            (Command::RaiseChassis, "u,0,0;", "RAISE CHASSIS"),
            (Command::LowerChassis, "t,0,0;", "LOWER CHASSIS"),
            (Command::StopActuators, "y,0,0;", "ACTUATORS STOPPED"),
            (Command::MineFront, "p,0,0;", "MINE FRONT DRUM"),
            (Command::LowerRear, "f,0,0;", "LOWER REAR DRUM"),
        ];
        for (command, frame, reply) in cases {
            let translation = translator.translate(&command);
            assert_eq!(translation.instructions.len(), 1);
            assert_eq!(translation.instructions[0].encode(), frame);
            assert_eq!(translation.reply, Reply::Status(reply.to_string()));
            assert!(!translation.terminate);
        }
    }

    #[test]
    fn test_queries_and_quit_emit_nothing() {
        let translator = ActuatorTranslator::default();
        assert_eq!(
            translator.translate(&Command::BatteryQuery).reply,
            Reply::Battery
        );
        assert_eq!(
            translator.translate(&Command::SignalQuery).reply,
            Reply::Signal
        );
        let quit = translator.translate(&Command::Quit);
        assert!(quit.instructions.is_empty());
        assert!(quit.terminate);
    }

    #[test]
    fn test_rejected_replies() {
        let unimplemented = Translation::rejected(&ParseError::Unimplemented('q'));
        assert!(unimplemented.instructions.is_empty());
        assert_eq!(
            unimplemented.reply,
            Reply::Status(UNIMPLEMENTED_REPLY.to_string())
        );

        let malformed = Translation::rejected(&ParseError::Malformed {
            reason: "invalid utf-8".to_string(),
            payload: "^\u{fffd}".to_string(),
        });
        assert_eq!(
            malformed.reply,
            Reply::Status("Problem parsing data: invalid utf-8 ...data: ^\u{fffd}".to_string())
        );
    }
}
