//! Performance Analytics Engine for pharmaceutical field-force representatives.
//!
//! This crate computes a composite performance score per representative from
//! daily call reports, leave, tour programs and expense claims, normalizing
//! expense efficiency against a peer group and ranking the results.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod source;
