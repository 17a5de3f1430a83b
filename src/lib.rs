#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![cfg_attr(feature = "fail-on-warnings", deny(clippy::all))]

pub mod app;
pub mod batch;
pub mod cli;
pub mod config;
pub mod fees;
pub mod oracle;
pub mod primitives;
pub mod tracing;
