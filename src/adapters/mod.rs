//! Infrastructure adapters. Implement outbound ports.
//!
//! Backend HTTP, terminal alerting/notification, system clock, CSV export.
//! Map errors to DomainError.

pub mod api;
pub mod clock;
pub mod export;
pub mod notify;
pub mod persistence;
pub mod ui;
