//! Command implementations.

pub mod extract;
pub mod targets;

pub use self::extract::execute_extract;
pub use self::targets::execute_targets;
