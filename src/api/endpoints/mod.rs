pub mod auth;
pub mod health;
pub mod options;
pub mod processes;
pub mod reports;
