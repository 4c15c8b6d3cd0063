//! Per-family device services
//!
//! Each service lists the account's devices of one type and fetches a single
//! device with its full property set. Facades are built fresh on every call.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::capability::{HasBrightness, HasColorTemp, Switchable};
use crate::device::{Bulb, ContactSensor, DeviceType, MotionSensor, Plug, Vacuum, VacuumCommand};
use crate::error::Result;
use crate::property::{Family, Origin, VacuumSuction};
use crate::provider::ProviderContext;

/// Generates a service struct with `list` and `get`
///
/// `enrich` turns a listed record into a complete one for `get`.
macro_rules! device_service {
    (
        $(#[$meta:meta])*
        $service:ident => $facade:ident,
        device_type: $device_type:expr,
        enrich: $enrich:path
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $service {
            context: Arc<ProviderContext>,
        }

        impl $service {
            pub(crate) fn new(context: Arc<ProviderContext>) -> Self {
                Self { context }
            }

            /// Every device of this type on the account, as listed
            pub fn list(&self) -> Result<Vec<$facade>> {
                Ok(list_records(&self.context, $device_type)?
                    .into_iter()
                    .map(|record| $facade::new(record, Arc::clone(&self.context)))
                    .collect())
            }

            /// One device with its properties fetched, `None` when the
            /// account has no such device
            pub fn get(&self, mac: &str) -> Result<Option<$facade>> {
                let Some(record) = find_record(&self.context, $device_type, mac)? else {
                    debug!(mac, device_type = %$device_type, "device not on account");
                    return Ok(None);
                };
                let record = $enrich(&self.context, record)?;
                Ok(Some($facade::new(record, Arc::clone(&self.context))))
            }
        }
    };
}

device_service!(
    /// Bulbs (`WLPA19`, `WLPA19C`)
    BulbService => Bulb,
    device_type: DeviceType::Bulb,
    enrich: with_bulb_properties
);

device_service!(
    /// Plugs (`WLPP1`, `WLPP1CFH`)
    PlugService => Plug,
    device_type: DeviceType::Plug,
    enrich: with_plug_properties
);

device_service!(
    /// Contact sensors (`DWS3U`)
    ContactSensorService => ContactSensor,
    device_type: DeviceType::ContactSensor,
    enrich: with_contact_sensor_properties
);

device_service!(
    /// Motion sensors (`PIR3U`)
    MotionSensorService => MotionSensor,
    device_type: DeviceType::MotionSensor,
    enrich: with_motion_sensor_properties
);

device_service!(
    /// Robot vacuums (`JA_RO2`)
    VacuumService => Vacuum,
    device_type: DeviceType::Vacuum,
    enrich: with_vacuum_state
);

impl BulbService {
    pub fn switch_on(&self, bulb: &mut Bulb) -> Result<()> {
        bulb.switch_on()
    }

    pub fn switch_off(&self, bulb: &mut Bulb) -> Result<()> {
        bulb.switch_off()
    }

    pub fn set_brightness(&self, bulb: &mut Bulb, value: i64) -> Result<()> {
        bulb.set_brightness(value)
    }

    pub fn set_color_temp(&self, bulb: &mut Bulb, value: i64) -> Result<()> {
        bulb.set_color_temp(value)
    }

    pub fn set_away_mode(&self, bulb: &mut Bulb, value: i64) -> Result<()> {
        bulb.set_away_mode(value)
    }

    pub fn set_power_loss_recovery(&self, bulb: &mut Bulb, value: i64) -> Result<()> {
        bulb.set_power_loss_recovery(value)
    }
}

impl PlugService {
    pub fn switch_on(&self, plug: &mut Plug) -> Result<()> {
        plug.switch_on()
    }

    pub fn switch_off(&self, plug: &mut Plug) -> Result<()> {
        plug.switch_off()
    }

    pub fn set_status_light(&self, plug: &mut Plug, on: bool) -> Result<()> {
        plug.set_status_light(on)
    }
}

impl VacuumService {
    pub fn clean(&self, vacuum: &Vacuum) -> Result<()> {
        vacuum.send(VacuumCommand::Clean)
    }

    pub fn pause(&self, vacuum: &Vacuum) -> Result<()> {
        vacuum.send(VacuumCommand::Pause)
    }

    pub fn dock(&self, vacuum: &Vacuum) -> Result<()> {
        vacuum.send(VacuumCommand::Dock)
    }

    pub fn set_suction_level(&self, vacuum: &mut Vacuum, level: VacuumSuction) -> Result<()> {
        vacuum.set_suction_level(level)
    }
}

fn list_records(context: &ProviderContext, device_type: DeviceType) -> Result<Vec<Value>> {
    let devices = context.client().list_devices()?;
    let matching: Vec<Value> = devices
        .into_iter()
        .filter(|device| {
            device
                .get("product_model")
                .and_then(Value::as_str)
                .map_or(false, |model| device_type.matches(model))
        })
        .collect();

    debug!(%device_type, count = matching.len(), "listed devices");
    Ok(matching)
}

fn find_record(context: &ProviderContext, device_type: DeviceType, mac: &str) -> Result<Option<Value>> {
    Ok(list_records(context, device_type)?
        .into_iter()
        .find(|device| device.get("mac").and_then(Value::as_str) == Some(mac)))
}

fn text_field(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Shallow merge, keys of `extra` win
fn merge(record: &mut Value, extra: Value) {
    if let (Some(target), Value::Object(source)) = (record.as_object_mut(), extra) {
        target.extend(source);
    }
}

/// Merge the `get_property_list` envelope into the record
fn with_property_list(context: &ProviderContext, family: Family, mut record: Value) -> Result<Value> {
    let mac = text_field(&record, "mac");
    let model = text_field(&record, "product_model");
    let pids = family.vendor_ids(Origin::PropertyList);

    let envelope = context
        .client()
        .get_device_property_list(&mac, &model, &pids)?;
    merge(&mut record, envelope);
    Ok(record)
}

fn with_bulb_properties(context: &ProviderContext, record: Value) -> Result<Value> {
    with_property_list(context, Family::Bulb, record)
}

fn with_plug_properties(context: &ProviderContext, record: Value) -> Result<Value> {
    with_property_list(context, Family::Plug, record)
}

fn with_contact_sensor_properties(context: &ProviderContext, record: Value) -> Result<Value> {
    with_property_list(context, Family::ContactSensor, record)
}

fn with_motion_sensor_properties(context: &ProviderContext, record: Value) -> Result<Value> {
    with_property_list(context, Family::MotionSensor, record)
}

/// Merge iot props and device info, then attach position and map
fn with_vacuum_state(context: &ProviderContext, mut record: Value) -> Result<Value> {
    let client = context.client();
    let mac = text_field(&record, "mac");

    if let Some(props) = client.get_iot_prop(&mac, &Family::Vacuum.vendor_ids(Origin::IotProp))? {
        merge(&mut record, props);
    }
    if let Some(info) = client.get_device_info(&mac, &Family::Vacuum.vendor_ids(Origin::DeviceInfo))? {
        merge(&mut record, info);
    }

    let position = client.get_current_position(&mac)?;
    let map = client.get_current_map(&mac)?;
    if let Some(object) = record.as_object_mut() {
        if let Some(position) = position {
            object.insert("current_position".to_string(), position);
        }
        if let Some(map) = map {
            object.insert("current_map".to_string(), map);
        }
    }
    Ok(record)
}
