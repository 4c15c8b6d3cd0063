//! # smartbridge - uniform access to Wyze smart-home devices
//!
//! Bulbs, plugs, vacuums and sensors from the Wyze cloud behind one set of
//! capability traits:
//!
//! ```rust,no_run
//! use smartbridge::{HasBrightness, Identifiable, Switchable, WyzeProvider};
//!
//! fn main() -> Result<(), smartbridge::SmartbridgeError> {
//!     let provider = WyzeProvider::from_environment()?;
//!     provider.authenticate()?;
//!
//!     for mut bulb in provider.bulbs().list()? {
//!         println!("{} ({})", bulb.name(), bulb.model());
//!         bulb.switch_on()?;
//!         bulb.set_brightness(60)?;
//!     }
//!
//!     if let Some(vacuum) = provider.vacuums().list()?.first() {
//!         vacuum.clean()?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! smartbridge (provider, services, device facades)
//!     ↓
//! property (tables, record shapes, mapper)
//!     ↓
//! wyze-api (signed service clients and operations)
//!     ↓
//! vendor-client (HTTP transport, envelope classification)
//! ```
//!
//! Every call blocks until the vendor answers. Nothing is retried and
//! nothing is cached: each `list`/`get` builds fresh facades.

pub mod capability;
pub mod config;
pub mod device;
pub mod logging;
pub mod property;

mod error;
mod provider;
mod services;

pub use capability::{HasBrightness, HasColorTemp, Identifiable, Networked, Sensor, Switchable};
pub use config::{ConfigResolver, ConfigSource, ProviderConfig};
pub use device::{Bulb, ContactSensor, DeviceType, MotionSensor, Plug, Vacuum, VacuumCommand};
pub use error::{Result, SmartbridgeError};
pub use property::{Family, PropertyMapper, RecordShape, SwitchState, VacuumMode, VacuumSuction};
pub use provider::{ProviderContext, WyzeProvider};
pub use services::{BulbService, ContactSensorService, MotionSensorService, PlugService, VacuumService};

pub use wyze_api::{Credentials, Service};
