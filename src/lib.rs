pub mod targets;
pub mod templates;
pub mod error;
pub mod staging;
pub mod wheel_builder;
pub mod stager;
pub mod cli;

pub use error::StageError;
pub use stager::WheelStager;
