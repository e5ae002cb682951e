pub mod config;
pub mod logging;

pub mod constant_delay;
pub mod policy;
pub mod retry;

pub use policy::{PolicyDescriptor, PolicyError};
pub use retry::{retrier, retrier_with};
