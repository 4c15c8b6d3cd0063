use std::sync::Arc;

use serde_json::Value;

use super::{AsDevice, DeviceCore};
use crate::capability::{HasBrightness, HasColorTemp, Networked, Switchable};
use crate::error::Result;
use crate::property::{Family, SwitchState};
use crate::provider::ProviderContext;

/// A color-temperature bulb
#[derive(Debug, Clone, PartialEq)]
pub struct Bulb {
    core: DeviceCore,
}

impl Bulb {
    pub(crate) fn new(record: Value, context: Arc<ProviderContext>) -> Self {
        Self {
            core: DeviceCore::new(Family::Bulb, record, context),
        }
    }

    pub fn available(&self) -> bool {
        self.core.get_bool("available").unwrap_or(false)
    }

    pub fn away_mode(&self) -> Option<i64> {
        self.core.get_int("away_mode")
    }

    /// Only `0` (off) can be written
    pub fn set_away_mode(&mut self, value: i64) -> Result<()> {
        self.core.write("away_mode", Value::from(value))
    }

    pub fn power_loss_recovery(&self) -> Option<i64> {
        self.core.get_int("power_loss_recovery")
    }

    /// `0` restores the previous state after a power cut, `1` turns the bulb on
    pub fn set_power_loss_recovery(&mut self, value: i64) -> Result<()> {
        self.core.write("power_loss_recovery", Value::from(value))
    }

    pub fn record(&self) -> &Value {
        self.core.record()
    }
}

impl AsDevice for Bulb {
    fn core(&self) -> &DeviceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DeviceCore {
        &mut self.core
    }
}

impl Networked for Bulb {
    fn ip(&self) -> Option<String> {
        self.core.get_text("ip")
    }

    fn rssi(&self) -> Option<i64> {
        self.core.get_int("rssi")
    }

    fn ssid(&self) -> Result<Option<String>> {
        Ok(self.core.get_text("ssid"))
    }
}

impl Switchable for Bulb {
    fn switch_state(&self) -> Option<SwitchState> {
        SwitchState::from_value(&self.core.get("switch_state"))
    }

    fn switch_on(&mut self) -> Result<()> {
        self.core.write("switch_state", Value::from(SwitchState::On.code()))
    }

    fn switch_off(&mut self) -> Result<()> {
        self.core.write("switch_state", Value::from(SwitchState::Off.code()))
    }
}

impl HasBrightness for Bulb {
    fn brightness(&self) -> Option<i64> {
        self.core.get_int("brightness")
    }

    fn set_brightness(&mut self, value: i64) -> Result<()> {
        self.core.write("brightness", Value::from(value))
    }
}

impl HasColorTemp for Bulb {
    fn color_temp(&self) -> Option<i64> {
        self.core.get_int("color_temp")
    }

    fn set_color_temp(&mut self, value: i64) -> Result<()> {
        self.core.write("color_temp", Value::from(value))
    }
}
