//! unidb - one command-line client for every major database engine.
//!
//! This library exposes the core modules for use in integration tests.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod executor;
pub mod instance;
pub mod introspect;
pub mod logging;
pub mod present;
pub mod typemap;
