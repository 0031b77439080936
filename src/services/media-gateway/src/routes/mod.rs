pub mod dashboard;
pub mod features;
pub mod public;
