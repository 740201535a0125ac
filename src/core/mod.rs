//! Core library components.
//!
//! Reconciliation of desired environment variables against remote secret
//! stores, plus the configuration, profiles and sources that feed it.

pub mod cancel;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod domain;
pub mod env;
pub mod manifest;
pub mod profile;
pub mod reconcile;
pub mod remote;
pub mod source;
pub mod types;
