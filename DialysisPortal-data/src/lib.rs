// Dialysis Portal Data
// This crate handles access to the portal REST API and the raw record shapes it returns

// Raw API models
pub mod models;

// Portal API access (client, credentials, errors)
pub mod repository;
