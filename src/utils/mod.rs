//! Shared helpers

pub mod concurrent;
