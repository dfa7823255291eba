//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a device config" or "resolve a secret".

pub mod device_service;
pub mod secret_service;

pub use device_service::{
    BatchReport, ComposedDevice, DeviceOutcome, DeviceProcessor, ProcessingStage,
    ProcessorOptions,
};
pub use secret_service::SecretResolver;
