use std::time::Duration;

use anyhow::Result;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::reset::{self, WakeupReason};
use esp_idf_svc::sys::{esp, esp_light_sleep_start, esp_sleep_enable_timer_wakeup};

use crate::traits::Power;

/// FreeRTOS delays, timer-woken light sleep and software reset
#[derive(Default)]
pub struct EspPower;

impl Power for EspPower {
    fn delay(&mut self, duration: Duration) {
        FreeRtos::delay_ms(duration.as_millis().min(u32::MAX as u128) as u32);
    }

    fn sleep(&mut self, duration: Duration) -> Result<()> {
        let micros = duration.as_micros().min(u64::MAX as u128) as u64;
        esp!(unsafe { esp_sleep_enable_timer_wakeup(micros) })?;
        if let Err(e) = esp!(unsafe { esp_light_sleep_start() }) {
            log::warn!("Light sleep rejected: {}", e);
            FreeRtos::delay_ms(duration.as_millis().min(u32::MAX as u128) as u32);
            return Ok(());
        }

        log::info!("Wakeup reason: {:?}", WakeupReason::get());
        Ok(())
    }

    fn restart(&mut self) {
        reset::restart();
    }
}
