use std::collections::VecDeque;

use crate::config::LinkConfig;
use crate::error::MixerError;

use super::transport::scripted::{ScriptedConnector, ScriptedDevice};
use super::transport::SimulatedConnector;
use super::*;

fn fast_config() -> LinkConfig {
    LinkConfig {
        read_timeout_ms: 10,
        drain_timeout_ms: 1,
        reset_backoff_ms: 0,
        ..LinkConfig::default()
    }
}

async fn scripted_link(device: ScriptedDevice) -> (DeviceLink, ScriptedConnector) {
    let connector = ScriptedConnector::new(device);
    let mut link = DeviceLink::new(Box::new(connector.clone()), &fast_config());
    link.open().await.unwrap();
    (link, connector)
}

#[tokio::test]
async fn test_open_sends_identify() {
    let (link, connector) = scripted_link(ScriptedDevice::new()).await;

    let device = connector.device.lock().unwrap();
    assert_eq!(device.bytes(), "I");
    assert_eq!(device.connections, 1);
    assert!(link.is_connected());
}

#[tokio::test]
async fn test_open_without_device_is_fatal() {
    let connector = ScriptedConnector::new(ScriptedDevice {
        missing_device: 1,
        ..ScriptedDevice::new()
    });
    let mut link = DeviceLink::new(Box::new(connector), &fast_config());

    let err = link.open().await.unwrap_err();
    assert!(matches!(err, MixerError::NoDeviceFound { .. }));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_bad_identify_reply_keeps_link() {
    let mut device = ScriptedDevice::new();
    device.overrides.insert(b'I', VecDeque::from(["E".to_string()]));
    let (link, _connector) = scripted_link(device).await;

    assert!(link.is_connected());
    assert_eq!(link.reset_count(), 0);
}

#[tokio::test]
async fn test_debug_lines_are_filtered() {
    let (mut link, _connector) = scripted_link(ScriptedDevice {
        debug_lines: vec!["D pump=1".to_string(), "Dvalve hot=3".to_string()],
        ..ScriptedDevice::new()
    })
    .await;

    assert_eq!(link.send(Command::PulseOpenHot).await.unwrap(), "H");
    assert!(link.pulse_open_cold().await.unwrap());
}

#[tokio::test]
async fn test_pending_line_is_drained_before_send() {
    let mut device = ScriptedDevice::new();
    device.trailing_lines.insert(b'O', vec!["late".to_string()]);
    let (mut link, _connector) = scripted_link(device).await;

    assert!(link.open_output().await.unwrap());
    // "late" is still buffered and must not be taken as the answer to T
    assert_eq!(link.send(Command::QueryTemperature).await.unwrap(), "72.0");
}

#[tokio::test]
async fn test_unsolicited_line_is_discarded_on_connect() {
    let (mut link, _connector) = scripted_link(ScriptedDevice {
        unsolicited: vec!["D boot".to_string(), "garbage".to_string()],
        ..ScriptedDevice::new()
    })
    .await;

    assert_eq!(link.send(Command::QueryValves).await.unwrap(), "or");
}

#[tokio::test]
async fn test_echo_mismatch_is_logical_failure() {
    let mut device = ScriptedDevice::new();
    device.rejected.insert(b'h');
    let (mut link, connector) = scripted_link(device).await;

    assert!(!link.pulse_close_hot().await.unwrap());
    assert_eq!(link.reset_count(), 0);
    assert_eq!(connector.device.lock().unwrap().connections, 1);
}

#[tokio::test]
async fn test_read_error_resets_exactly_once() {
    let mut device = ScriptedDevice::new();
    device.read_error_after = Some(b'V');
    let (mut link, connector) = scripted_link(device).await;

    // The in-flight reply is lost; the fresh connection has nothing queued
    assert_eq!(link.valve_states().await.unwrap(), None);
    assert_eq!(link.reset_count(), 1);

    // Next command goes out on the new connection
    assert!(link.open_recycle().await.unwrap());
    let device = connector.device.lock().unwrap();
    assert_eq!(device.connections, 2);
    assert_eq!(device.written.last(), Some(&(2, b'R')));
    assert_eq!(device.bytes(), "IVIR");
}

#[tokio::test]
async fn test_reset_without_device_is_fatal() {
    let mut device = ScriptedDevice::new();
    device.read_error_after = Some(b'T');
    let (mut link, connector) = scripted_link(device).await;
    connector.device.lock().unwrap().missing_device = 1;

    let err = link.temperature().await.unwrap_err();
    assert!(matches!(err, MixerError::NoDeviceFound { .. }));
}

#[tokio::test]
async fn test_busy_port_during_reset_is_retried() {
    let mut device = ScriptedDevice::new();
    device.read_error_after = Some(b'T');
    let (mut link, connector) = scripted_link(device).await;
    connector.device.lock().unwrap().busy_device = 1;

    // The reopen fails, the link stays closed and the reading is simply unknown
    let reading = link.temperature().await.unwrap();
    assert_eq!(reading, TemperatureReading::Unknown);
    assert!(!link.is_connected());
    assert_eq!(link.reset_count(), 1);

    // Next command reconnects on its own
    let state = link.valve_states().await.unwrap().unwrap();
    assert!(!state.output_open);
    assert!(link.is_connected());
    assert_eq!(link.reset_count(), 2);

    let device = connector.device.lock().unwrap();
    assert_eq!(device.connections, 2);
    assert_eq!(device.bytes(), "ITIV");
    assert_eq!(device.written.last(), Some(&(2, b'V')));
}

#[tokio::test]
async fn test_busy_port_on_open_is_not_fatal() {
    let connector = ScriptedConnector::new(ScriptedDevice {
        busy_device: 1,
        ..ScriptedDevice::new()
    });
    let mut link = DeviceLink::new(Box::new(connector.clone()), &fast_config());

    link.open().await.unwrap();
    assert!(!link.is_connected());

    assert!(link.start_pump().await.unwrap());
    assert_eq!(connector.device.lock().unwrap().connections, 1);
}

#[tokio::test]
async fn test_garbled_temperature_is_unknown() {
    let mut device = ScriptedDevice::new();
    device.temperature = "abc".to_string();
    let (mut link, _connector) = scripted_link(device).await;

    let reading = link.temperature().await.unwrap();
    assert_eq!(reading, TemperatureReading::Unknown);
    assert_eq!(reading.degrees(), 0.0);
    assert_eq!(link.reset_count(), 0);
}

#[tokio::test]
async fn test_valve_states_decoded() {
    let mut device = ScriptedDevice::new();
    device.valves = "HHHHCCr".to_string();
    let (mut link, _connector) = scripted_link(device).await;

    let state = link.valve_states().await.unwrap().unwrap();
    assert_eq!(state.hot_open_percent, 40);
    assert_eq!(state.cold_open_percent, 20);
    assert!(state.output_open);
    assert!(!state.recycle_open);
}

#[tokio::test]
async fn test_repeated_silence_triggers_reset() {
    let mut device = ScriptedDevice::new();
    device.silent.insert(b'T');
    let (mut link, connector) = scripted_link(device).await;

    for _ in 0..2 {
        assert_eq!(link.temperature().await.unwrap(), TemperatureReading::Unknown);
    }
    assert_eq!(link.reset_count(), 0);

    link.temperature().await.unwrap();
    assert_eq!(link.reset_count(), 1);
    assert_eq!(connector.device.lock().unwrap().connections, 2);
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let (mut link, _connector) = scripted_link(ScriptedDevice::new()).await;
    link.close().await;
    link.close().await;
    assert!(!link.is_connected());
    link.drain_debug_messages().await.unwrap();
}

#[tokio::test]
async fn test_send_reconnects_closed_link() {
    let (mut link, connector) = scripted_link(ScriptedDevice::new()).await;
    link.close().await;

    assert!(link.start_pump().await.unwrap());
    assert_eq!(link.reset_count(), 1);
    assert_eq!(connector.device.lock().unwrap().connections, 2);
}

#[tokio::test]
async fn test_simulated_round_trip() {
    let connector = SimulatedConnector::new();
    let device = connector.device();
    let mut link = DeviceLink::new(Box::new(connector), &fast_config());
    link.open().await.unwrap();

    assert!(link.open_recycle().await.unwrap());
    assert!(link.pulse_open_hot().await.unwrap());
    assert!(!link.pulse_close_cold().await.unwrap());

    let state = link.valve_states().await.unwrap().unwrap();
    assert_eq!(state.hot_open_percent, 10);
    assert!(state.recycle_open);
    assert!(!state.output_open);
    assert!(device.lock().unwrap().recycle_open);

    let reading = link.temperature().await.unwrap();
    assert!(reading.degrees() > 65.0);
}
