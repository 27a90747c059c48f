pub mod auth;
pub mod config;
pub mod errors;
pub mod ingest;
pub mod metrics;
pub mod model;
pub mod rest;
pub mod store;
pub mod validate;
