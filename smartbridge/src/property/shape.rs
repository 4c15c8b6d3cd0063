//! Record shapes the vendor uses for device data
//!
//! The same attribute can live in different places depending on which
//! endpoint produced the record. Each shape knows how to find a property
//! inside a record, for reading and for writing.

use serde_json::Value;

use super::table::{Family, PropertyDef};

/// A place inside a device record where properties may live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    /// Top-level keys, by semantic name then vendor id
    FlatFields,
    /// `data.property_list`: `[{ "pid": "P3", "value": "1" }, …]`
    PropertyListArray,
    /// `device_params`: a flat map, by semantic name then vendor id
    DeviceParamsMap,
    /// Vacuum `props`/`settings`, under `data` when `nested`
    PropsSettingsSplit { nested: bool },
}

const PROPS_SETTINGS: [&str; 2] = ["props", "settings"];

impl RecordShape {
    /// Shapes present in `record`, in probe order
    pub fn detect(record: &Value, family: Family) -> Vec<RecordShape> {
        let mut shapes = Vec::with_capacity(5);
        if !record.is_object() {
            return shapes;
        }

        shapes.push(RecordShape::FlatFields);
        if record
            .pointer("/data/property_list")
            .map_or(false, Value::is_array)
        {
            shapes.push(RecordShape::PropertyListArray);
        }
        if record.get("device_params").map_or(false, Value::is_object) {
            shapes.push(RecordShape::DeviceParamsMap);
        }
        if family.uses_props_settings() {
            if record.get("data").map_or(false, has_props_or_settings) {
                shapes.push(RecordShape::PropsSettingsSplit { nested: true });
            }
            if has_props_or_settings(record) {
                shapes.push(RecordShape::PropsSettingsSplit { nested: false });
            }
        }
        shapes
    }

    /// The value this shape holds for `def`, if any
    pub fn locate<'a>(&self, record: &'a Value, def: &PropertyDef) -> Option<&'a Value> {
        match self {
            RecordShape::FlatFields => field(record, [def.name, def.vendor_id]),
            RecordShape::PropertyListArray => record
                .pointer("/data/property_list")?
                .as_array()?
                .iter()
                .find(|entry| pid_matches(entry, def))?
                .get("value"),
            RecordShape::DeviceParamsMap => {
                field(record.get("device_params")?, [def.name, def.vendor_id])
            }
            RecordShape::PropsSettingsSplit { nested } => {
                let base = if *nested { record.get("data")? } else { record };
                PROPS_SETTINGS.iter().find_map(|container| {
                    field(base.get(*container)?, [def.vendor_id, def.name])
                })
            }
        }
    }

    /// Mutable access to the slot this shape holds for `def`, if any
    pub fn locate_mut<'a>(&self, record: &'a mut Value, def: &PropertyDef) -> Option<&'a mut Value> {
        match self {
            RecordShape::FlatFields => field_mut(record, [def.name, def.vendor_id]),
            RecordShape::PropertyListArray => record
                .pointer_mut("/data/property_list")?
                .as_array_mut()?
                .iter_mut()
                .find(|entry| pid_matches(entry, def))?
                .get_mut("value"),
            RecordShape::DeviceParamsMap => {
                field_mut(record.get_mut("device_params")?, [def.name, def.vendor_id])
            }
            RecordShape::PropsSettingsSplit { nested } => {
                let base = if *nested { record.get_mut("data")? } else { record };
                let keys = [def.vendor_id, def.name];
                let container = PROPS_SETTINGS.iter().copied().find(|container| {
                    base.get(*container)
                        .and_then(|c| present_key(c, keys))
                        .is_some()
                })?;
                field_mut(base.get_mut(container)?, keys)
            }
        }
    }
}

fn has_props_or_settings(value: &Value) -> bool {
    PROPS_SETTINGS
        .iter()
        .any(|key| value.get(*key).map_or(false, Value::is_object))
}

fn pid_matches(entry: &Value, def: &PropertyDef) -> bool {
    entry.get("pid").and_then(Value::as_str) == Some(def.vendor_id)
}

/// First of `keys` present in `map`
fn present_key(map: &Value, keys: [&'static str; 2]) -> Option<&'static str> {
    let object = map.as_object()?;
    keys.into_iter().find(|key| object.contains_key(*key))
}

fn field<'a>(map: &'a Value, keys: [&'static str; 2]) -> Option<&'a Value> {
    map.get(present_key(map, keys)?)
}

fn field_mut<'a>(map: &'a mut Value, keys: [&'static str; 2]) -> Option<&'a mut Value> {
    let key = present_key(map, keys)?;
    map.get_mut(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bulb(name: &str) -> &'static PropertyDef {
        Family::Bulb.lookup(name).unwrap()
    }

    #[test]
    fn test_detect_order() {
        let record = json!({
            "mac": "A",
            "data": {"property_list": [], "props": {}},
            "device_params": {},
            "settings": {},
        });

        assert_eq!(
            RecordShape::detect(&record, Family::Bulb),
            vec![
                RecordShape::FlatFields,
                RecordShape::PropertyListArray,
                RecordShape::DeviceParamsMap,
            ]
        );
        assert_eq!(
            RecordShape::detect(&record, Family::Vacuum),
            vec![
                RecordShape::FlatFields,
                RecordShape::PropertyListArray,
                RecordShape::DeviceParamsMap,
                RecordShape::PropsSettingsSplit { nested: true },
                RecordShape::PropsSettingsSplit { nested: false },
            ]
        );
    }

    #[test]
    fn test_detect_non_object() {
        assert!(RecordShape::detect(&json!([1]), Family::Plug).is_empty());
    }

    #[test]
    fn test_property_list_matches_pid() {
        let record = json!({"data": {"property_list": [
            {"pid": "P3", "value": "1"},
            {"pid": "P1501", "value": "80"},
        ]}});

        let found = RecordShape::PropertyListArray.locate(&record, bulb("brightness"));
        assert_eq!(found, Some(&json!("80")));
        assert_eq!(
            RecordShape::PropertyListArray.locate(&record, bulb("color_temp")),
            None
        );
    }

    #[test]
    fn test_flat_and_device_params_accept_vendor_id() {
        let record = json!({"P1501": 10, "device_params": {"P1502": 3000}});

        assert_eq!(
            RecordShape::FlatFields.locate(&record, bulb("brightness")),
            Some(&json!(10))
        );
        assert_eq!(
            RecordShape::DeviceParamsMap.locate(&record, bulb("color_temp")),
            Some(&json!(3000))
        );
    }

    #[test]
    fn test_props_before_settings() {
        let record = json!({"props": {"cleanlevel": 3}, "settings": {"cleanlevel": 1}});
        let def = Family::Vacuum.lookup("suction_level").unwrap();
        let shape = RecordShape::PropsSettingsSplit { nested: false };

        assert_eq!(shape.locate(&record, def), Some(&json!(3)));

        let mut record = record;
        *shape.locate_mut(&mut record, def).unwrap() = json!(2);
        assert_eq!(record["props"]["cleanlevel"], json!(2));
        assert_eq!(record["settings"]["cleanlevel"], json!(1));
    }

    #[test]
    fn test_settings_only() {
        let mut record = json!({"data": {"props": {}, "settings": {"notice_save_map": true}}});
        let def = Family::Vacuum.lookup("notice_save_map").unwrap();
        let shape = RecordShape::PropsSettingsSplit { nested: true };

        *shape.locate_mut(&mut record, def).unwrap() = json!(false);
        assert_eq!(record["data"]["settings"]["notice_save_map"], json!(false));
    }
}
