//! Command implementations

pub mod backup;
pub mod volumes;
