use crate::error::Result;
use crate::link::valve_state::PERCENT_PER_LETTER;
use crate::link::Command;
use crate::{log_error, log_info, log_warn};

use super::{MixingValve, TemperatureRegulator, UnwindReport};

impl TemperatureRegulator {
    /// Close output and recycle, stop the pump, and pulse both mixing
    /// valves closed from their last known position.
    ///
    /// Every step is attempted even if an earlier one is not acknowledged;
    /// failures are collected in the report. Only a fatal link error
    /// (no device to reconnect to) ends the unwind early.
    pub async fn stop(&mut self) -> Result<UnwindReport> {
        log_info!("Stopping temperature regulator");
        let mut report = UnwindReport::default();

        if self.link.close_output().await? {
            self.valves.output_open = false;
        } else {
            report.failed.push(Command::CloseOutput);
        }

        if self.link.stop_pump().await? {
            self.pump_on = false;
        } else {
            report.failed.push(Command::StopPump);
        }

        if self.link.close_recycle().await? {
            self.valves.recycle_open = false;
        } else {
            report.failed.push(Command::CloseRecycle);
        }

        report.hot_pulses = self.valves.hot_open_percent / PERCENT_PER_LETTER;
        report.cold_pulses = self.valves.cold_open_percent / PERCENT_PER_LETTER;

        for (valve, pulses) in [
            (MixingValve::Hot, report.hot_pulses),
            (MixingValve::Cold, report.cold_pulses),
        ] {
            for _ in 0..pulses {
                if !self.pulse(valve, false).await? {
                    report.failed.push(valve.command(false));
                }
            }
        }

        if !report.is_complete() {
            log_warn!(
                "Unwind incomplete, {} command(s) not acknowledged: {:?}; \
                 valves may be partially open",
                report.failed.len(),
                report.failed
            );
        }

        self.running = false;
        self.at_temp_ticks = 0;
        self.last_control = None;
        self.started_at = None;
        Ok(report)
    }

    /// Unwind (if running) and close the link on process exit. A failed
    /// unwind is logged rather than returned so it cannot mask whatever
    /// ended the control loop.
    pub async fn shutdown(&mut self) -> Option<UnwindReport> {
        let report = if self.running {
            match self.stop().await {
                Ok(report) => {
                    log_info!("Shutdown unwind complete: {}", report.is_complete());
                    Some(report)
                }
                Err(e) => {
                    log_error!("Shutdown unwind failed: {}", e);
                    None
                }
            }
        } else {
            None
        };

        self.link.close().await;
        report
    }
}
