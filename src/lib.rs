//! Runs OGC conformance suites on a TEAM Engine instance and turns the
//! execution report into a result model that renders as JSON or text.

#[macro_use]
extern crate log;

pub mod app;
pub mod configuration;
pub mod connection;
pub mod model;
pub mod parser;
pub mod reporter;
pub mod time;
