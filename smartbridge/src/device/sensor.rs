//! Contact and motion sensors
//!
//! Both report through a hub and share the same base properties; only the
//! detection property differs.

use std::sync::Arc;

use serde_json::Value;

use super::{AsDevice, DeviceCore};
use crate::capability::Sensor;
use crate::property::{Family, SwitchState};
use crate::provider::ProviderContext;

macro_rules! sensor_facade {
    ($(#[$meta:meta])* $name:ident, $family:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            core: DeviceCore,
        }

        impl $name {
            pub(crate) fn new(record: Value, context: Arc<ProviderContext>) -> Self {
                Self {
                    core: DeviceCore::new($family, record, context),
                }
            }

            pub fn record(&self) -> &Value {
                self.core.record()
            }
        }

        impl AsDevice for $name {
            fn core(&self) -> &DeviceCore {
                &self.core
            }

            fn core_mut(&mut self) -> &mut DeviceCore {
                &mut self.core
            }
        }

        impl Sensor for $name {
            fn rssi(&self) -> Option<i64> {
                self.core.get_int("rssi")
            }

            fn voltage(&self) -> Option<i64> {
                self.core.get_int("voltage")
            }

            fn available(&self) -> bool {
                self.core.get_bool("available").unwrap_or(false)
            }

            fn power_state(&self) -> Option<SwitchState> {
                SwitchState::from_value(&self.core.get("power_state"))
            }
        }
    };
}

sensor_facade!(
    /// A door/window contact sensor
    ContactSensor,
    Family::ContactSensor
);

sensor_facade!(
    /// A motion sensor
    MotionSensor,
    Family::MotionSensor
);

impl ContactSensor {
    /// Raw state: `1` open, `0` closed
    pub fn open_close_state(&self) -> Option<i64> {
        self.core.get_int("open_close_state")
    }

    pub fn is_open(&self) -> bool {
        self.open_close_state() == Some(1)
    }
}

impl MotionSensor {
    /// Raw state: `1` motion detected
    pub fn motion_state(&self) -> Option<i64> {
        self.core.get_int("motion_state")
    }

    pub fn has_motion(&self) -> bool {
        self.motion_state() == Some(1)
    }
}
