// DialysisPortal-api lib.rs
//
// HTTP surface of the dialysis history service: router, handlers,
// configuration and OpenAPI documentation.

// Public modules
pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;
