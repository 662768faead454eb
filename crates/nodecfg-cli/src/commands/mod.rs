//! Command handlers grouped by concern.

pub(crate) mod config;
pub(crate) mod profile;
pub(crate) mod resolve;
