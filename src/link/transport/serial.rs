// src/link/transport/serial.rs
//! Real hardware over tokio-serial

use async_trait::async_trait;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_serial::{SerialPortBuilderExt, SerialStream};

use super::{Connector, DeviceLocator, Transport};
use crate::error::Result;
use crate::log_info;

pub struct SerialTransport {
    path: String,
    reader: BufReader<SerialStream>,
    // Bytes of a line still being received when a read timed out
    pending: Vec<u8>,
}

impl SerialTransport {
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let port = tokio_serial::new(path, baud_rate).open_native_async()?;

        Ok(Self {
            path: path.to_string(),
            reader: BufReader::new(port),
            pending: Vec::new(),
        })
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        let port = self.reader.get_mut();
        port.write_all(bytes).await?;
        port.flush().await
    }

    async fn read_line(&mut self, timeout: Duration) -> io::Result<String> {
        // read_until keeps partial data in `pending` if the timeout fires
        let read = self.reader.read_until(b'\n', &mut self.pending);
        match tokio::time::timeout(timeout, read).await {
            Err(_elapsed) => Ok(String::new()),
            Ok(Ok(0)) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{} closed", self.path),
            )),
            Ok(Ok(_)) => {
                let line = String::from_utf8_lossy(&self.pending).trim().to_string();
                self.pending.clear();
                Ok(line)
            }
            Ok(Err(e)) => Err(e),
        }
    }

    async fn close(&mut self) -> io::Result<()> {
        self.pending.clear();
        self.reader.get_mut().shutdown().await
    }

    fn describe(&self) -> String {
        format!("serial {}", self.path)
    }
}

pub struct SerialConnector {
    locator: Box<dyn DeviceLocator>,
    baud_rate: u32,
}

impl SerialConnector {
    pub fn new(locator: Box<dyn DeviceLocator>, baud_rate: u32) -> Self {
        Self { locator, baud_rate }
    }
}

#[async_trait]
impl Connector for SerialConnector {
    async fn connect(&self) -> Result<Box<dyn Transport>> {
        let path = self.locator.locate()?;
        let path = path.to_string_lossy().into_owned();

        log_info!("Opening serial device {} at {} baud", path, self.baud_rate);
        let transport = SerialTransport::open(&path, self.baud_rate)?;
        Ok(Box::new(transport))
    }

    fn describe(&self) -> String {
        format!("serial {} @ {}", self.locator.pattern(), self.baud_rate)
    }
}
