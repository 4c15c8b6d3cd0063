//! Property mapping between semantic names and vendor records
//!
//! - [`table`]: static per-family definition tables
//! - [`shape`]: the record shapes properties are found in
//! - [`PropertyMapper`]: shape-aware get/set over a raw record
//! - [`value`]: coercion helpers and the enumerations behind raw codes

mod mapper;
pub mod shape;
pub mod table;
pub mod value;

pub use mapper::PropertyMapper;
pub use shape::RecordShape;
pub use table::{DefaultValue, Family, Origin, PropertyDef, ValueKind};
pub use value::{SwitchState, VacuumMode, VacuumSuction};
