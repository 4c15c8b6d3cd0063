use std::sync::Arc;

use serde_json::Value;

use super::{AsDevice, DeviceCore};
use crate::capability::{Networked, Switchable};
use crate::error::Result;
use crate::property::{Family, SwitchState};
use crate::provider::ProviderContext;

/// A smart plug
#[derive(Debug, Clone, PartialEq)]
pub struct Plug {
    core: DeviceCore,
}

impl Plug {
    pub(crate) fn new(record: Value, context: Arc<ProviderContext>) -> Self {
        Self {
            core: DeviceCore::new(Family::Plug, record, context),
        }
    }

    pub fn available(&self) -> bool {
        self.core.get_bool("available").unwrap_or(false)
    }

    /// Whether the status LED is enabled
    pub fn status_light(&self) -> Option<bool> {
        self.core.get_bool("status_light")
    }

    pub fn set_status_light(&mut self, on: bool) -> Result<()> {
        self.core.write("status_light", Value::from(i64::from(on)))
    }

    pub fn away_mode(&self) -> Option<i64> {
        self.core.get_int("away_mode")
    }

    pub fn record(&self) -> &Value {
        self.core.record()
    }
}

impl AsDevice for Plug {
    fn core(&self) -> &DeviceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DeviceCore {
        &mut self.core
    }
}

impl Networked for Plug {
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

impl Switchable for Plug {
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
