pub mod limiter;
pub mod mail;
pub mod templates;
pub mod utils;
