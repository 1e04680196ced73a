// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Operator control protocol
//!
//! One ASCII command per transmission, selected by its first character.
//! The operator console terminates each command with `;`.
//!
//! | Char | Command | Argument |
//! |------|---------|----------|
//! | `^` | Forward | `^,<1-5>`, `^,0` halts, bare `^` creeps |
//! | `v` | Backward | `v,<1-5>`, `v,0` halts, bare `v` creeps |
//! | `*` | Halt | |
//! | `>` / `<` | Turn clockwise / counter-clockwise | |
//! | `u` / `t` / `y` | Raise chassis / lower chassis / stop actuators | |
//! | `p` / `o` | Mine front / rear drum | |
//! | `l` / `k` | Dump front / rear drum | |
//! | `z` / `x` | Raise / lower front drum | |
//! | `c` / `f` | Raise / lower rear drum | |
//! | `b` | Battery query | |
//! | `s` | Signal query | |
//! | `-` | Quit | |

pub mod command;
pub mod parser;

pub use command::Command;
pub use parser::{parse, ParseError};
