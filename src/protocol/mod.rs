// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod messages;
pub mod parser;

pub use messages::{Direction, FrequencyCommand};
pub use parser::{parse_signed_frequency, ParsedFrequency, Parser, TransferError, UserBuffer};
