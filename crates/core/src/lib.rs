//! cmpcvf-core
//!
//! Core library for cross-validating the result reports of two numerical
//! test harnesses that exercise the same routines through different bindings.
//!
//! This crate defines the report model, the report reader and function index,
//! the block aligner/comparator, and the plain-text report formatter.
//!
//! All substantive logic lives here so it is fully testable and reusable
//! from the CLI and from other frontends.

pub mod model;
pub mod report;
pub mod compare;
pub mod format;
pub mod config;
