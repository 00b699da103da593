//! Service layer for the users mock.
//! - `storage`: JSON file-backed collection mirrored to disk on every mutation.
//! - `users`: repository seam over that storage and the request handler that
//!   validates and applies create/update/delete.
//! - `errors`: the failure taxonomy transports map to responses.

pub mod errors;
pub mod storage;
pub mod users;
