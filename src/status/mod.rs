//! Job status model and resolution against the Jenkins API

mod build;
mod resolver;

pub use build::BuildStatus;
pub use resolver::{BuildStatusSource, StatusResolver};
