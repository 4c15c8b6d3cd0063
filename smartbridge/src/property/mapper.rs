use serde_json::Value;
use tracing::{debug, trace};

use super::shape::RecordShape;
use super::table::{Family, PropertyDef};
use crate::error::{Result, SmartbridgeError};

/// Reads and writes semantic attributes on raw device records
///
/// Reads and writes share one lookup: both probe the shapes of
/// [`RecordShape::detect`] in order and use the first one that holds the
/// key. A value written with [`PropertyMapper::set`] is therefore the value
/// [`PropertyMapper::get`] returns next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyMapper {
    family: Family,
}

impl PropertyMapper {
    pub fn new(family: Family) -> Self {
        Self { family }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn definition(&self, name: &str) -> Option<&'static PropertyDef> {
        self.family.lookup(name)
    }

    /// The first shape holding `name`, if any
    pub fn shape_of(&self, record: &Value, name: &str) -> Option<RecordShape> {
        let def = self.definition(name)?;
        RecordShape::detect(record, self.family)
            .into_iter()
            .find(|shape| shape.locate(record, def).is_some())
    }

    /// The raw value stored for `name`, `None` when no shape holds it
    pub fn find<'a>(&self, record: &'a Value, name: &str) -> Option<&'a Value> {
        let def = self.definition(name)?;
        let shape = self.shape_of(record, name)?;
        trace!(family = %self.family, name, ?shape, "property located");
        shape.locate(record, def)
    }

    /// Value of `name`, or the table's default when absent or null
    ///
    /// Names outside the family's table have no default and read as null.
    pub fn get(&self, record: &Value, name: &str) -> Value {
        let default = self
            .definition(name)
            .map(|def| def.default.to_value())
            .unwrap_or(Value::Null);
        self.get_or(record, name, default)
    }

    /// Value of `name`, or `default` when absent or null
    pub fn get_or(&self, record: &Value, name: &str, default: Value) -> Value {
        match self.find(record, name) {
            Some(value) if !value.is_null() => value.clone(),
            _ => default,
        }
    }

    /// Overwrite `name` in the first shape that holds it
    ///
    /// Returns `Ok(false)` when no shape holds the key: properties are never
    /// injected into a record the vendor did not provide them in.
    pub fn set(&self, record: &mut Value, name: &str, value: Value) -> Result<bool> {
        let def = self
            .definition(name)
            .ok_or_else(|| SmartbridgeError::invalid_parameter(name, &value))?;

        let Some(shape) = self.shape_of(record, name) else {
            debug!(family = %self.family, name, "no record shape holds property, write skipped");
            return Ok(false);
        };

        match shape.locate_mut(record, def) {
            Some(slot) => {
                *slot = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
