// src/link/valve_state.rs
use serde::{Deserialize, Serialize};

/// Percent of travel represented by one uppercase letter in a `V` reply
pub const PERCENT_PER_LETTER: u32 = 10;

/// Snapshot of the valves as reported by the `V` query.
///
/// The reply encodes each mixing valve as a run of uppercase letters
/// (`C` for cold, `H` for hot, 10% each). The on/off valves use inverted
/// presence: a lowercase `o` means output CLOSED, a lowercase `r` means
/// recycle CLOSED, and absence of the letter means OPEN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValveState {
    pub hot_open_percent: u32,
    pub cold_open_percent: u32,
    pub output_open: bool,
    pub recycle_open: bool,
}

impl ValveState {
    pub fn decode(reply: &str) -> Self {
        let count = |letter: char| reply.chars().filter(|c| *c == letter).count() as u32;

        Self {
            cold_open_percent: count('C') * PERCENT_PER_LETTER,
            hot_open_percent: count('H') * PERCENT_PER_LETTER,
            output_open: !reply.contains('o'),
            recycle_open: !reply.contains('r'),
        }
    }

    /// Inverse of [`ValveState::decode`], as the firmware would print it.
    pub fn encode(&self) -> String {
        let mut reply = String::new();
        for _ in 0..self.hot_open_percent / PERCENT_PER_LETTER {
            reply.push('H');
        }
        for _ in 0..self.cold_open_percent / PERCENT_PER_LETTER {
            reply.push('C');
        }
        if !self.output_open {
            reply.push('o');
        }
        if !self.recycle_open {
            reply.push('r');
        }
        reply
    }
}
