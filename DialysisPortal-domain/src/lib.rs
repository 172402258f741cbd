// Dialysis Portal Domain
// This crate contains the clinical-history pipeline and report generation

// Domain entities
pub mod entities;

// Services that implement business logic
pub mod services;

// Report layout and PDF rendering
pub mod report;

// Re-export the portal API client from the data layer for convenience
pub use dialysis_portal_data::repository;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
