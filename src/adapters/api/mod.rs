//! Backend API adapter module. Implements MedicationApi and AuthPort.
//!
//! Provides the HTTP client against the real backend and an in-memory mock
//! used when no backend is configured and by use case tests.

pub mod client;
pub mod mock;

pub use client::HttpBackend;
pub use mock::MockMedicationApi;
