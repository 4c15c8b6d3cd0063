use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use super::{validate, AsDevice, DeviceCore};
use crate::capability::Networked;
use crate::error::{Result, SmartbridgeError};
use crate::property::{Family, VacuumMode, VacuumSuction};
use crate::provider::ProviderContext;

/// Event type reported with every vacuum command
const VACUUM_EVENT_TYPE: u32 = 1;

/// `set_preference` control type for suction
const SUCTION_CONTROL_TYPE: u32 = 1;

const SUCTION_EVENT: &str = "WRV_SETTINGS_SUCTION";

/// Commands sent through the vendor's `set_mode` action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VacuumCommand {
    Clean,
    Pause,
    Dock,
}

impl VacuumCommand {
    /// `(type, value)` of the `set_mode` action
    pub fn mode_args(self) -> (u32, u32) {
        match self {
            VacuumCommand::Clean => (0, 1),
            VacuumCommand::Pause => (0, 2),
            VacuumCommand::Dock => (3, 1),
        }
    }

    /// Analytics event reported after the command
    pub fn event_id(self) -> &'static str {
        match self {
            VacuumCommand::Clean | VacuumCommand::Dock => "WRV_CLEAN",
            VacuumCommand::Pause => "WRV_PAUSE",
        }
    }
}

/// A robot vacuum
///
/// Records come from the device list merged with `get_iot_prop`,
/// `device_info`, the current position and the current map.
#[derive(Debug, Clone, PartialEq)]
pub struct Vacuum {
    core: DeviceCore,
}

impl Vacuum {
    pub(crate) fn new(record: Value, context: Arc<ProviderContext>) -> Self {
        Self {
            core: DeviceCore::new(Family::Vacuum, record, context),
        }
    }

    pub fn mode(&self) -> VacuumMode {
        VacuumMode::from_code(self.core.get_int("mode").unwrap_or_default())
    }

    pub fn suction_level(&self) -> VacuumSuction {
        self.core
            .get_int("suction_level")
            .map_or(VacuumSuction::Standard, VacuumSuction::from_code)
    }

    pub fn battery(&self) -> Option<i64> {
        self.core.get_int("battery")
    }

    pub fn current_position(&self) -> Option<Value> {
        Some(self.core.get("current_position")).filter(|v| !v.is_null())
    }

    /// The map as returned by the vendor; the embedded blob is left encoded
    pub fn current_map(&self) -> Option<Value> {
        Some(self.core.get("current_map")).filter(|v| !v.is_null())
    }

    pub fn clean(&self) -> Result<()> {
        self.send(VacuumCommand::Clean)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(VacuumCommand::Pause)
    }

    pub fn dock(&self) -> Result<()> {
        self.send(VacuumCommand::Dock)
    }

    /// Send a mode command, then report its event
    ///
    /// A failed command is not followed by the event.
    pub fn send(&self, command: VacuumCommand) -> Result<()> {
        let (kind, value) = command.mode_args();
        let client = self.core.client();

        info!(mac = self.core.mac(), ?command, "sending vacuum command");
        client.set_vacuum_mode(self.core.mac(), self.core.model(), kind, value)?;
        client.create_vacuum_event(command.event_id(), VACUUM_EVENT_TYPE)?;
        Ok(())
    }

    pub fn set_suction_level(&mut self, level: VacuumSuction) -> Result<()> {
        let value = validate(Family::Vacuum, "suction_level", &Value::from(level.code()))?;
        let client = self.core.client();

        info!(mac = self.core.mac(), ?level, "setting vacuum suction");
        client.set_vacuum_preference(
            self.core.mac(),
            self.core.model(),
            SUCTION_CONTROL_TYPE,
            level.code(),
        )?;
        client.create_vacuum_event(SUCTION_EVENT, VACUUM_EVENT_TYPE)?;

        self.core.store("suction_level", value);
        Ok(())
    }

    pub fn record(&self) -> &Value {
        self.core.record()
    }
}

impl AsDevice for Vacuum {
    fn core(&self) -> &DeviceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DeviceCore {
        &mut self.core
    }
}

impl Networked for Vacuum {
    fn ip(&self) -> Option<String> {
        self.core.get_text("ip")
    }

    fn rssi(&self) -> Option<i64> {
        None
    }

    fn ssid(&self) -> Result<Option<String>> {
        Err(SmartbridgeError::UnsupportedCapability {
            family: Family::Vacuum,
            capability: "ssid",
        })
    }
}
