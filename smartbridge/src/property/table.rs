//! Static property definition tables, one per device family
//!
//! Each entry maps a semantic attribute name to the id the vendor uses on
//! the wire. Within a family both columns are unique, so the mapping is a
//! bijection. Tables are plain `static` slices, built at compile time.

use std::fmt;

use serde_json::Value;

/// A device category with its own property table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Bulb,
    Plug,
    Vacuum,
    ContactSensor,
    MotionSensor,
}

/// Declared type of a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Str,
    Bool,
    /// Arbitrary JSON (vacuum position and map)
    Object,
}

/// Value returned when no record shape holds a property
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Null,
    Int(i64),
    Bool(bool),
}

impl DefaultValue {
    pub fn to_value(self) -> Value {
        match self {
            DefaultValue::Null => Value::Null,
            DefaultValue::Int(i) => Value::from(i),
            DefaultValue::Bool(b) => Value::Bool(b),
        }
    }
}

/// Which vendor call populates a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The device list itself (usually under `device_params`)
    Listing,
    /// `get_property_list`, addressed by `P…` code
    PropertyList,
    /// Venus `get_iot_prop`
    IotProp,
    /// Venus `device_info`
    DeviceInfo,
    /// A dedicated call whose `data` is stored under the semantic name
    Dedicated,
}

/// One row of a property table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyDef {
    pub name: &'static str,
    pub vendor_id: &'static str,
    pub kind: ValueKind,
    pub default: DefaultValue,
    pub origin: Origin,
}

const fn prop(
    name: &'static str,
    vendor_id: &'static str,
    kind: ValueKind,
    origin: Origin,
) -> PropertyDef {
    PropertyDef {
        name,
        vendor_id,
        kind,
        default: DefaultValue::Null,
        origin,
    }
}

impl PropertyDef {
    const fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = default;
        self
    }
}

use Origin::*;
use ValueKind::*;

static BULB: &[PropertyDef] = &[
    prop("switch_state", "P3", Int, PropertyList),
    prop("available", "P5", Int, PropertyList),
    prop("brightness", "P1501", Int, PropertyList),
    prop("color_temp", "P1502", Int, PropertyList),
    prop("away_mode", "P1506", Str, PropertyList),
    prop("power_loss_recovery", "P1509", Int, PropertyList),
    prop("ip", "ip", Str, Listing),
    prop("ssid", "ssid", Str, Listing),
    prop("rssi", "rssi", Str, Listing),
];

static PLUG: &[PropertyDef] = &[
    prop("switch_state", "P3", Int, PropertyList),
    prop("available", "P5", Int, PropertyList),
    prop("status_light", "P13", Int, PropertyList),
    prop("rssi", "P1612", Str, PropertyList),
    prop("away_mode", "P1614", Str, PropertyList),
    prop("ip", "ip", Str, Listing),
    prop("ssid", "ssid", Str, Listing),
];

static CONTACT_SENSOR: &[PropertyDef] = &[
    prop("power_state", "P3", Int, PropertyList),
    prop("available", "P5", Int, PropertyList),
    prop("open_close_state", "P1301", Str, PropertyList),
    prop("rssi", "P1304", Str, PropertyList),
    prop("voltage", "P1329", Str, PropertyList),
];

static MOTION_SENSOR: &[PropertyDef] = &[
    prop("power_state", "P3", Int, PropertyList),
    prop("available", "P5", Int, PropertyList),
    prop("motion_state", "P1302", Str, PropertyList),
    prop("rssi", "P1304", Str, PropertyList),
    prop("voltage", "P1329", Str, PropertyList),
];

// Vacuum ids are readable names, some of them misspelled by the vendor.
static VACUUM: &[PropertyDef] = &[
    prop("iot_state", "iot_state", Str, IotProp),
    prop("battery", "battary", Int, IotProp),
    prop("mode", "mode", Int, IotProp).with_default(DefaultValue::Int(0)),
    prop("charge_state", "chargeState", Int, IotProp),
    prop("clean_size", "cleanSize", Int, IotProp),
    prop("clean_time", "cleanTime", Int, IotProp),
    prop("fault_type", "fault_type", Str, IotProp),
    prop("fault_code", "fault_code", Int, IotProp),
    prop("current_mapid", "current_mapid", Int, IotProp),
    prop("count", "count", Int, IotProp),
    prop("suction_level", "cleanlevel", Int, IotProp).with_default(DefaultValue::Int(2)),
    prop("notice_save_map", "notice_save_map", Bool, IotProp)
        .with_default(DefaultValue::Bool(false)),
    prop("memory_map_update_time", "memory_map_update_time", Int, IotProp),
    prop("mac", "mac", Str, DeviceInfo),
    prop("ip", "ipaddr", Str, DeviceInfo),
    prop("device_type", "device_type", Str, DeviceInfo),
    prop("mcu_sys_version", "mcu_sys_version", Str, DeviceInfo),
    prop("current_position", "current_position", Object, Dedicated),
    prop("current_map", "current_map", Object, Dedicated),
];

impl Family {
    pub const ALL: [Family; 5] = [
        Family::Bulb,
        Family::Plug,
        Family::Vacuum,
        Family::ContactSensor,
        Family::MotionSensor,
    ];

    pub fn table(self) -> &'static [PropertyDef] {
        match self {
            Family::Bulb => BULB,
            Family::Plug => PLUG,
            Family::Vacuum => VACUUM,
            Family::ContactSensor => CONTACT_SENSOR,
            Family::MotionSensor => MOTION_SENSOR,
        }
    }

    /// Definition for a semantic name
    pub fn lookup(self, name: &str) -> Option<&'static PropertyDef> {
        self.table().iter().find(|def| def.name == name)
    }

    /// Vendor ids fetched by a given call, in table order
    pub fn vendor_ids(self, origin: Origin) -> Vec<&'static str> {
        self.table()
            .iter()
            .filter(|def| def.origin == origin)
            .map(|def| def.vendor_id)
            .collect()
    }

    /// Only vacuum records carry `props`/`settings` containers
    pub fn uses_props_settings(self) -> bool {
        self == Family::Vacuum
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Family::Bulb => "bulb",
            Family::Plug => "plug",
            Family::Vacuum => "vacuum",
            Family::ContactSensor => "contact sensor",
            Family::MotionSensor => "motion sensor",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tables_are_bijections() {
        for family in Family::ALL {
            let table = family.table();
            let names: HashSet<_> = table.iter().map(|d| d.name).collect();
            let ids: HashSet<_> = table.iter().map(|d| d.vendor_id).collect();
            assert_eq!(names.len(), table.len(), "duplicate name in {} table", family);
            assert_eq!(ids.len(), table.len(), "duplicate vendor id in {} table", family);
        }
    }

    #[test]
    fn test_lookup() {
        let def = Family::Bulb.lookup("brightness").unwrap();
        assert_eq!(def.vendor_id, "P1501");
        assert_eq!(def.kind, ValueKind::Int);

        assert_eq!(Family::Vacuum.lookup("battery").unwrap().vendor_id, "battary");
        assert!(Family::Plug.lookup("brightness").is_none());
    }

    #[test]
    fn test_vendor_ids_by_origin() {
        assert_eq!(
            Family::Bulb.vendor_ids(Origin::PropertyList),
            vec!["P3", "P5", "P1501", "P1502", "P1506", "P1509"]
        );
        assert_eq!(
            Family::Vacuum.vendor_ids(Origin::DeviceInfo),
            vec!["mac", "ipaddr", "device_type", "mcu_sys_version"]
        );
    }

    #[test]
    fn test_defaults() {
        assert_eq!(
            Family::Vacuum.lookup("mode").unwrap().default.to_value(),
            Value::from(0)
        );
        assert_eq!(
            Family::Bulb.lookup("brightness").unwrap().default.to_value(),
            Value::Null
        );
    }
}
