//! Capability traits implemented by device facades
//!
//! Each trait covers one narrow ability. A facade implements exactly the
//! traits its device family supports, so code written against
//! `impl Switchable + HasBrightness` accepts any device that can do both.

use serde_json::Value;

use crate::error::Result;
use crate::property::{Family, SwitchState};

/// Identity and raw property access, implemented by every facade
pub trait Identifiable {
    /// Device id (the MAC address)
    fn id(&self) -> &str;

    /// User-visible nickname
    fn name(&self) -> &str;

    /// Vendor product model
    fn model(&self) -> &str;

    fn mac(&self) -> &str;

    fn family(&self) -> Family;

    /// Value of a semantic property, or its default
    fn get_property(&self, name: &str) -> Value;

    fn get_property_or(&self, name: &str, default: Value) -> Value;

    /// Validate and write a property into the local record
    ///
    /// Nothing is sent to the vendor; the typed setters do that.
    fn set_property(&mut self, name: &str, value: Value) -> Result<()>;
}

/// Devices with a network presence of their own
pub trait Networked: Identifiable {
    fn ip(&self) -> Option<String>;

    fn rssi(&self) -> Option<i64>;

    fn ssid(&self) -> Result<Option<String>>;
}

pub trait Switchable: Identifiable {
    fn switch_state(&self) -> Option<SwitchState>;

    fn switch_on(&mut self) -> Result<()>;

    fn switch_off(&mut self) -> Result<()>;

    fn is_on(&self) -> bool {
        self.switch_state().map_or(false, SwitchState::is_on)
    }
}

pub trait HasBrightness: Identifiable {
    fn brightness(&self) -> Option<i64>;

    /// Accepts `0..=100`
    fn set_brightness(&mut self, value: i64) -> Result<()>;
}

pub trait HasColorTemp: Identifiable {
    fn color_temp(&self) -> Option<i64>;

    /// Accepts `2700..=6500` Kelvin
    fn set_color_temp(&mut self, value: i64) -> Result<()>;
}

/// Battery powered sensors reporting through a hub
pub trait Sensor: Identifiable {
    fn rssi(&self) -> Option<i64>;

    fn voltage(&self) -> Option<i64>;

    fn available(&self) -> bool;

    fn power_state(&self) -> Option<SwitchState>;
}
