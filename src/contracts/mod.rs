pub mod actuator;
pub mod driver;
pub mod error;
pub mod publisher;

pub use actuator::Actuator;
pub use driver::OutputDriver;
pub use error::{BeaconError, ConfigError, DriverError, LockResultExt, PublishError};
pub use publisher::StatusPublisher;
