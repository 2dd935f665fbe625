//! Core library for the `driftbench` CLI.
//!
//! `driftbench` calls REST endpoints repeatedly, one call at a time, records
//! each call's latency into labeled series and reports statistics and line
//! charts for them. The binary wires these pieces together; the library
//! exposes them for embedding and tests.
pub mod args;
pub mod charts;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
pub mod logger;
pub mod runner;
pub mod series;
