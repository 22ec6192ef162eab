// src/link/transport/scripted.rs
//! Test double: a programmable device that records every byte written

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{Connector, Transport};
use crate::error::{MixerError, Result};

#[derive(Debug, Default)]
pub struct ScriptedDevice {
    /// (connection number, byte) for every write, in order
    pub written: Vec<(usize, u8)>,
    pub connections: usize,
    /// Reply to `T`
    pub temperature: String,
    /// Reply to `V`
    pub valves: String,
    /// Commands answered with `E`
    pub rejected: HashSet<u8>,
    /// Commands answered with nothing at all
    pub silent: HashSet<u8>,
    /// Replies overriding the echo for specific commands, consumed in order
    pub overrides: HashMap<u8, VecDeque<String>>,
    /// Extra lines queued after the reply to specific commands
    pub trailing_lines: HashMap<u8, Vec<String>>,
    /// After writing this byte, the next read fails once
    pub read_error_after: Option<u8>,
    /// Lines emitted before each reply
    pub debug_lines: Vec<String>,
    /// Lines waiting on every new connection before anything is written
    pub unsolicited: Vec<String>,
    /// Connects to refuse with NoDeviceFound
    pub missing_device: u32,
    /// Connects where the path exists but the port refuses to open
    pub busy_device: u32,
}

impl ScriptedDevice {
    pub fn new() -> Self {
        Self {
            temperature: "72.0".to_string(),
            valves: "or".to_string(),
            ..Self::default()
        }
    }

    pub fn count(&self, byte: u8) -> usize {
        self.written.iter().filter(|(_, b)| *b == byte).count()
    }

    pub fn bytes(&self) -> String {
        self.written.iter().map(|(_, b)| *b as char).collect()
    }

    fn reply(&mut self, byte: u8) -> Option<String> {
        if let Some(queue) = self.overrides.get_mut(&byte) {
            if let Some(reply) = queue.pop_front() {
                return Some(reply);
            }
        }
        if self.silent.contains(&byte) {
            return None;
        }
        if self.rejected.contains(&byte) {
            return Some("E".to_string());
        }
        let reply = match byte {
            b'T' => self.temperature.clone(),
            b'V' => self.valves.clone(),
            other => (other as char).to_string(),
        };
        Some(reply)
    }
}

enum Pending {
    Line(String),
    Error,
}

pub struct ScriptedTransport {
    device: Arc<Mutex<ScriptedDevice>>,
    connection: usize,
    outbox: VecDeque<Pending>,
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut device = self.device.lock().unwrap();
        for byte in bytes {
            device.written.push((self.connection, *byte));
            if device.read_error_after == Some(*byte) {
                device.read_error_after = None;
                self.outbox.push_back(Pending::Error);
                continue;
            }
            let debug_lines = device.debug_lines.clone();
            self.outbox.extend(debug_lines.into_iter().map(Pending::Line));
            if let Some(reply) = device.reply(*byte) {
                self.outbox.push_back(Pending::Line(reply));
            }
            if let Some(trailing) = device.trailing_lines.get(byte).cloned() {
                self.outbox.extend(trailing.into_iter().map(Pending::Line));
            }
        }
        Ok(())
    }

    async fn read_line(&mut self, _timeout: Duration) -> io::Result<String> {
        match self.outbox.pop_front() {
            Some(Pending::Line(line)) => Ok(line),
            Some(Pending::Error) => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "scripted read failure",
            )),
            None => Ok(String::new()),
        }
    }

    async fn close(&mut self) -> io::Result<()> {
        self.outbox.clear();
        Ok(())
    }

    fn describe(&self) -> String {
        format!("scripted #{}", self.connection)
    }
}

#[derive(Clone)]
pub struct ScriptedConnector {
    pub device: Arc<Mutex<ScriptedDevice>>,
}

impl ScriptedConnector {
    pub fn new(device: ScriptedDevice) -> Self {
        Self {
            device: Arc::new(Mutex::new(device)),
        }
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn connect(&self) -> Result<Box<dyn Transport>> {
        let mut device = self.device.lock().unwrap();
        if device.missing_device > 0 {
            device.missing_device -= 1;
            return Err(MixerError::NoDeviceFound {
                pattern: "scripted*".to_string(),
            });
        }
        if device.busy_device > 0 {
            device.busy_device -= 1;
            return Err(MixerError::Serial(tokio_serial::Error::new(
                tokio_serial::ErrorKind::Io(io::ErrorKind::PermissionDenied),
                "busy",
            )));
        }
        device.connections += 1;

        let outbox = device
            .unsolicited
            .iter()
            .cloned()
            .map(Pending::Line)
            .collect();

        Ok(Box::new(ScriptedTransport {
            device: self.device.clone(),
            connection: device.connections,
            outbox,
        }))
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}
