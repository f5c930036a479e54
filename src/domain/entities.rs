pub mod message;
pub mod submission;
