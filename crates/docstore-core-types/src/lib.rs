//! Core types shared across docstore facilities
//!
//! Holds the canonical field keys and event names used by the logging
//! facility, so every crate emits the same structured shape.

pub mod schema;
