#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Access gate: turns a request's identity header into a tenant-scoped view
//! of the dashboard data sources.
//!
//! [`Service`] is built once from [`AccessGateConfig`] and implements
//! [`access_gate_sdk::DashboardHooks`] for the hosting dashboard server.

pub mod config;
pub mod domain;

pub use config::{AccessGateConfig, ConfigError, ConnectionConfig};
pub use domain::service::Service;
