pub mod auth;
pub mod config;
pub mod db;
pub mod envelope;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod models;
