//! Shared types for the lotwatch client: configuration, backend wire types,
//! filter selection and time-range resolution.

pub mod config;
pub mod detection;
pub mod filter;
pub mod protocol;
pub mod scope;
pub mod time_range;
