//! Core types and trait definitions for the LAZY history store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::RecordStore`]; transports depend on the
//! trait, not on any concrete backend.

pub mod error;
pub mod meeting;
pub mod store;
pub mod work_story;

pub use error::{Error, Result};
