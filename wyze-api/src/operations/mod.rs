//! Operations grouped by the service they are sent to

pub mod auth;
pub mod device_api;
pub mod general;
pub mod platform;
pub mod venus;

pub use auth::*;
pub use device_api::*;
pub use general::*;
pub use platform::*;
pub use venus::*;
