//! Local persistence. Only the notification permission choice survives
//! restarts; medications and takes live behind the backend.

pub mod permission_json;

pub use permission_json::PermissionStore;
