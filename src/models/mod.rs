pub mod form;
pub mod response;
pub mod user;
