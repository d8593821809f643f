//! Pure domain logic for the demandas tracker.
//!
//! This crate has zero internal deps so it can be used by the repository
//! layer, the API server, and any future CLI tooling. Everything here is
//! synchronous and side-effect free: the progress estimator in particular
//! is a pure function of the entity collections and a reference date.

pub mod dates;
pub mod error;
pub mod gantt;
pub mod kanban;
pub mod model;
pub mod progress;
pub mod scurve;
