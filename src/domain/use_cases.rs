pub mod dispatcher;
pub mod submission;
pub mod validator;
