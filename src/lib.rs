pub mod auth;
pub mod authz;
pub mod config;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod registration;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;
pub mod validate;
