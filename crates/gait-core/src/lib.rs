//! Gait-Core: Foundation types for sprint gait analysis
//!
//! Trial container, leg/channel vocabulary and the shared error type.

pub mod channel_types;
pub mod columns;
pub mod error;
pub mod trial;

pub use channel_types::*;
pub use columns::ColumnTable;
pub use error::{GaitError, GaitResult};
pub use trial::*;
