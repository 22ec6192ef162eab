// src/link/command.rs

/// Single-byte commands understood by the mixing controller firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Identify,
    QueryValves,
    QueryTemperature,
    PulseOpenCold,
    PulseCloseCold,
    PulseOpenHot,
    PulseCloseHot,
    OpenOutput,
    CloseOutput,
    OpenRecycle,
    CloseRecycle,
    StartPump,
    StopPump,
}

impl Command {
    pub fn as_char(&self) -> char {
        match self {
            Command::Identify => 'I',
            Command::QueryValves => 'V',
            Command::QueryTemperature => 'T',
            Command::PulseOpenCold => 'C',
            Command::PulseCloseCold => 'c',
            Command::PulseOpenHot => 'H',
            Command::PulseCloseHot => 'h',
            Command::OpenOutput => 'O',
            Command::CloseOutput => 'o',
            Command::OpenRecycle => 'R',
            Command::CloseRecycle => 'r',
            Command::StartPump => 'P',
            Command::StopPump => 'p',
        }
    }

    pub fn as_byte(&self) -> u8 {
        self.as_char() as u8
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        let command = match byte {
            b'I' => Command::Identify,
            b'V' => Command::QueryValves,
            b'T' => Command::QueryTemperature,
            b'C' => Command::PulseOpenCold,
            b'c' => Command::PulseCloseCold,
            b'H' => Command::PulseOpenHot,
            b'h' => Command::PulseCloseHot,
            b'O' => Command::OpenOutput,
            b'o' => Command::CloseOutput,
            b'R' => Command::OpenRecycle,
            b'r' => Command::CloseRecycle,
            b'P' => Command::StartPump,
            b'p' => Command::StopPump,
            _ => return None,
        };
        Some(command)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
