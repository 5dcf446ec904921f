//! # reverbmon-apps
//!
//! Application-configuration providers. The file-backed provider treats a
//! JSON file as ground truth behind a TTL+mtime cache and replaces it
//! atomically on writes; the SQLite-backed provider passes every call
//! through to the database.

pub mod database;
pub mod file;
pub mod validation;

pub use database::DatabaseApplicationProvider;
pub use file::FileApplicationProvider;
pub use validation::{admit_create, admit_update, validate_record, validate_update, AdmitError};
