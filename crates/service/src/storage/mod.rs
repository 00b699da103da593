//! Storage abstractions for service layer
//!
//! File-backed collections persisted as pretty-printed JSON.

pub mod json_list_store;
