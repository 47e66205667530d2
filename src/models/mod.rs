//! Data models

pub mod aggregate;
pub mod record;
pub mod severity;

pub use aggregate::*;
pub use record::*;
pub use severity::*;
