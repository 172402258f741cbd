pub mod health;
pub mod history;
pub mod report;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use health::health_check;
pub use history::{export_history, get_history};
pub use report::get_patient_report;
