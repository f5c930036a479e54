pub mod home;
pub mod submit_form;
pub mod system;
