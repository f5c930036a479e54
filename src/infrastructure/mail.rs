pub mod sender;
pub mod smtp;
