//! Aggregate builders over the canonical dataset.
//!
//! Every sheet and chart is computed from the tables built here and nothing
//! else. Each builder is a named function returning a fixed row schema;
//! fixed day and month orderings are applied through the ordered
//! enumerations in [`crate::records`], not per call site.

pub mod duration;
pub mod kpi;
pub mod stations;
pub mod temporal;
pub mod types;
pub mod users;
pub mod utility;
