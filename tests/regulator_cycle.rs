use std::time::Duration;
use tokio::time::Instant;

use mixing_valve_controller::link::transport::{SimulatedConnector, SimulatedDevice};
use mixing_valve_controller::{
    DeviceLink, LinkConfig, RegulatorConfig, RegulatorPhase, TemperatureRegulator,
};

fn link_config() -> LinkConfig {
    LinkConfig {
        read_timeout_ms: 10,
        drain_timeout_ms: 1,
        reset_backoff_ms: 0,
        ..LinkConfig::default()
    }
}

#[tokio::test]
async fn test_simulated_rig_reaches_delivery_and_unwinds() {
    let connector = SimulatedConnector::with_device(SimulatedDevice {
        chatty: true,
        ..SimulatedDevice::default()
    });
    let device = connector.device();

    let mut link = DeviceLink::new(Box::new(connector), &link_config());
    link.open().await.unwrap();

    // Wide band so the simple mixing model settles inside it
    let config = RegulatorConfig {
        target: 85.0,
        threshold: 5.0,
        ..RegulatorConfig::default()
    };
    let mut regulator = TemperatureRegulator::new(link, config);

    let t0 = Instant::now();
    regulator.start_at(t0).await.unwrap();
    assert_eq!(regulator.phase(), RegulatorPhase::Mixing);
    assert!(device.lock().unwrap().pump_on);

    let mut delivered = false;
    for second in 1..=120 {
        regulator
            .handle_tick_at(t0 + Duration::from_secs(second))
            .await
            .unwrap();
        if regulator.phase() == RegulatorPhase::Delivering {
            delivered = true;
            break;
        }
    }
    assert!(delivered, "never reached delivery: {:?}", regulator.status());

    {
        let rig = device.lock().unwrap();
        assert!(rig.output_open);
        assert!(!rig.recycle_open);
        assert!(!rig.pump_on);
    }

    let report = regulator.stop().await.unwrap();
    assert!(report.is_complete(), "{:?}", report);

    let rig = device.lock().unwrap();
    assert_eq!(rig.hot_pulses, 0);
    assert_eq!(rig.cold_pulses, 0);
    assert!(!rig.output_open);
    assert!(!rig.recycle_open);
    assert!(!rig.pump_on);
    assert_eq!(regulator.link().reset_count(), 0);
}

#[tokio::test]
async fn test_stopped_regulator_leaves_rig_untouched() {
    let connector = SimulatedConnector::new();
    let device = connector.device();
    let mut link = DeviceLink::new(Box::new(connector), &link_config());
    link.open().await.unwrap();
    let mut regulator = TemperatureRegulator::new(link, RegulatorConfig::default());

    let t0 = Instant::now();
    for second in 0..30 {
        regulator
            .handle_tick_at(t0 + Duration::from_secs(second))
            .await
            .unwrap();
    }

    let rig = device.lock().unwrap();
    // Only the identify handshake reached the device
    assert_eq!(rig.commands_seen, 1);
    assert_eq!(regulator.phase(), RegulatorPhase::Stopped);
}
