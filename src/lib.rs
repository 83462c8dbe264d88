//! Core library for the solarops field-visit dashboard.
//!
//! Everything the CLI renders is derived from three flat CSV stores: the
//! visit log written by the collection app (read-only here), and the goal
//! and action-plan tables this crate owns. Each interaction is one full
//! load -> normalize -> filter -> aggregate pass; nothing is cached across
//! invocations.

pub mod actions;
pub mod advisor;
pub mod config;
pub mod error;
pub mod export;
pub mod focus;
pub mod goals;
pub mod roster;
pub mod store;
pub mod visits;
