//! Device facades
//!
//! A facade owns one raw vendor record and a handle to the provider that
//! produced it. Reads go through the [`PropertyMapper`]; typed setters
//! validate, send the write to the vendor, and only then update the local
//! record. A failed remote write leaves the record as it was, so a facade
//! always shows the last state the vendor confirmed.

mod bulb;
mod models;
mod plug;
mod sensor;
mod vacuum;

pub use bulb::Bulb;
pub use models::DeviceType;
pub use plug::Plug;
pub use sensor::{ContactSensor, MotionSensor};
pub use vacuum::{Vacuum, VacuumCommand};

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use wyze_api::WyzeClient;

use crate::capability::Identifiable;
use crate::error::{Result, SmartbridgeError};
use crate::property::value::{as_bool, as_int, as_text};
use crate::property::{Family, Origin, PropertyMapper, ValueKind};
use crate::provider::ProviderContext;

/// Record and provider handle shared by every facade
#[derive(Clone)]
pub struct DeviceCore {
    record: Value,
    context: Arc<ProviderContext>,
    mapper: PropertyMapper,
}

impl DeviceCore {
    pub(crate) fn new(family: Family, record: Value, context: Arc<ProviderContext>) -> Self {
        Self {
            record,
            context,
            mapper: PropertyMapper::new(family),
        }
    }

    pub fn record(&self) -> &Value {
        &self.record
    }

    pub fn into_record(self) -> Value {
        self.record
    }

    pub fn family(&self) -> Family {
        self.mapper.family()
    }

    pub fn mapper(&self) -> &PropertyMapper {
        &self.mapper
    }

    pub(crate) fn client(&self) -> &WyzeClient {
        self.context.client()
    }

    /// Top-level string field, empty when missing
    pub(crate) fn field(&self, key: &str) -> &str {
        self.record.get(key).and_then(Value::as_str).unwrap_or_default()
    }

    pub fn mac(&self) -> &str {
        self.field("mac")
    }

    pub fn model(&self) -> &str {
        self.field("product_model")
    }

    pub fn nickname(&self) -> &str {
        self.field("nickname")
    }

    pub fn get(&self, name: &str) -> Value {
        self.mapper.get(&self.record, name)
    }

    pub fn get_or(&self, name: &str, default: Value) -> Value {
        self.mapper.get_or(&self.record, name, default)
    }

    pub(crate) fn get_int(&self, name: &str) -> Option<i64> {
        as_int(&self.get(name))
    }

    pub(crate) fn get_bool(&self, name: &str) -> Option<bool> {
        as_bool(&self.get(name))
    }

    pub(crate) fn get_text(&self, name: &str) -> Option<String> {
        as_text(&self.get(name))
    }

    /// Validate and write into the local record only
    pub(crate) fn set_local(&mut self, name: &str, value: Value) -> Result<()> {
        let value = validate(self.family(), name, &value)?;
        self.store(name, value);
        Ok(())
    }

    /// Validate, write to the vendor, then update the local record
    pub(crate) fn write(&mut self, name: &str, value: Value) -> Result<()> {
        let value = validate(self.family(), name, &value)?;
        self.write_remote(name, &value)?;
        self.store(name, value);
        Ok(())
    }

    /// Overwrite a validated value in the record
    pub(crate) fn store(&mut self, name: &str, value: Value) {
        // Only fails for names outside the table, which `validate` rejected
        if let Ok(false) = self.mapper.set(&mut self.record, name, value) {
            debug!(family = %self.family(), name, mac = self.mac(), "record has no slot for property");
        }
    }

    fn write_remote(&self, name: &str, value: &Value) -> Result<()> {
        let family = self.family();
        let def = family
            .lookup(name)
            .ok_or_else(|| SmartbridgeError::invalid_parameter(name, value))?;
        if def.origin != Origin::PropertyList {
            return Err(SmartbridgeError::UnsupportedCapability {
                family,
                capability: def.name,
            });
        }
        let text = as_text(value).ok_or_else(|| SmartbridgeError::invalid_parameter(name, value))?;

        debug!(%family, name, pid = def.vendor_id, value = %text, mac = self.mac(), "writing device property");
        self.client()
            .set_device_property(self.mac(), self.model(), def.vendor_id, &text)?;
        Ok(())
    }
}

impl PartialEq for DeviceCore {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.context, &other.context) && self.mac() == other.mac()
    }
}

impl fmt::Debug for DeviceCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceCore")
            .field("family", &self.family())
            .field("mac", &self.mac())
            .field("model", &self.model())
            .field("nickname", &self.nickname())
            .finish_non_exhaustive()
    }
}

/// Access to the [`DeviceCore`] behind a facade
///
/// Implementing this gives a facade [`Identifiable`] for free.
pub trait AsDevice {
    fn core(&self) -> &DeviceCore;

    fn core_mut(&mut self) -> &mut DeviceCore;
}

impl<T: AsDevice> Identifiable for T {
    fn id(&self) -> &str {
        self.core().mac()
    }

    fn name(&self) -> &str {
        self.core().nickname()
    }

    fn model(&self) -> &str {
        self.core().model()
    }

    fn mac(&self) -> &str {
        self.core().mac()
    }

    fn family(&self) -> Family {
        self.core().family()
    }

    fn get_property(&self, name: &str) -> Value {
        self.core().get(name)
    }

    fn get_property_or(&self, name: &str, default: Value) -> Value {
        self.core().get_or(name, default)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        self.core_mut().set_local(name, value)
    }
}

/// Check a write against the family table and normalise its type
///
/// Wrong types and unknown names are `InvalidParameter`; values of the right
/// type outside the accepted range are `InvalidValue`.
pub fn validate(family: Family, name: &str, value: &Value) -> Result<Value> {
    let invalid_parameter = || SmartbridgeError::invalid_parameter(name, value);
    let def = family.lookup(name).ok_or_else(invalid_parameter)?;

    let normalized = match def.kind {
        ValueKind::Int => Value::from(strict_int(value).ok_or_else(invalid_parameter)?),
        ValueKind::Bool => Value::Bool(as_bool(value).ok_or_else(invalid_parameter)?),
        ValueKind::Str => match value {
            Value::String(_) => value.clone(),
            Value::Number(n) => Value::String(n.to_string()),
            _ => return Err(invalid_parameter()),
        },
        ValueKind::Object => value.clone(),
    };

    if let Some(range) = accepted_range(family, name) {
        let number = strict_int(value).ok_or_else(invalid_parameter)?;
        if !range.contains(&number) {
            return Err(SmartbridgeError::invalid_value(name, value));
        }
    }
    Ok(normalized)
}

fn accepted_range(family: Family, name: &str) -> Option<RangeInclusive<i64>> {
    match (family, name) {
        (Family::Bulb, "brightness") => Some(0..=100),
        (Family::Bulb, "color_temp") => Some(2700..=6500),
        (Family::Bulb, "away_mode") => Some(0..=0),
        (Family::Bulb, "power_loss_recovery") => Some(0..=1),
        (Family::Bulb | Family::Plug, "switch_state") => Some(0..=1),
        (Family::Plug, "status_light") => Some(0..=1),
        (Family::Vacuum, "suction_level") => Some(1..=3),
        _ => None,
    }
}

/// JSON integers only: no strings, floats or booleans
fn strict_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Family::Bulb, "brightness", json!(0), json!(0))]
    #[case(Family::Bulb, "color_temp", json!(2700), json!(2700))]
    #[case(Family::Bulb, "away_mode", json!(0), json!("0"))]
    #[case(Family::Plug, "status_light", json!(1), json!(1))]
    #[case(Family::Vacuum, "suction_level", json!(3), json!(3))]
    #[case(Family::Vacuum, "notice_save_map", json!(1), json!(true))]
    fn test_validate_accepts(
        #[case] family: Family,
        #[case] name: &str,
        #[case] value: Value,
        #[case] expected: Value,
    ) {
        assert_eq!(validate(family, name, &value).unwrap(), expected);
    }

    #[rstest]
    #[case(Family::Bulb, "brightness", json!(-1))]
    #[case(Family::Bulb, "brightness", json!(101))]
    #[case(Family::Bulb, "color_temp", json!(2699))]
    #[case(Family::Bulb, "color_temp", json!(6501))]
    #[case(Family::Bulb, "away_mode", json!(1))]
    #[case(Family::Bulb, "power_loss_recovery", json!(2))]
    #[case(Family::Vacuum, "suction_level", json!(4))]
    fn test_validate_rejects_out_of_range(
        #[case] family: Family,
        #[case] name: &str,
        #[case] value: Value,
    ) {
        let error = validate(family, name, &value).unwrap_err();
        assert!(matches!(error, SmartbridgeError::InvalidValue { .. }), "{:?}", error);
    }

    #[rstest]
    #[case(Family::Bulb, "brightness", json!(50.5))]
    #[case(Family::Bulb, "brightness", json!(50.0))]
    #[case(Family::Bulb, "brightness", json!("50"))]
    #[case(Family::Bulb, "brightness", json!(" 7 "))]
    #[case(Family::Bulb, "color_temp", json!("4000"))]
    #[case(Family::Bulb, "away_mode", json!("0"))]
    #[case(Family::Plug, "status_light", json!("1"))]
    #[case(Family::Vacuum, "suction_level", json!(2.0))]
    #[case(Family::Bulb, "brightness", json!("bright"))]
    #[case(Family::Bulb, "brightness", json!(true))]
    #[case(Family::Bulb, "brightness", json!(null))]
    #[case(Family::Plug, "brightness", json!(50))]
    #[case(Family::Bulb, "away_mode", json!([0]))]
    fn test_validate_rejects_wrong_type(
        #[case] family: Family,
        #[case] name: &str,
        #[case] value: Value,
    ) {
        let error = validate(family, name, &value).unwrap_err();
        assert!(
            matches!(error, SmartbridgeError::InvalidParameter { ref parameter, .. } if parameter == name),
            "{:?}",
            error
        );
    }
}
