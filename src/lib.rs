//! Spinwheel Debt Dashboard API Library
//!
//! This library provides the core functionality for the Spinwheel debt
//! dashboard backend: a typed client for the Spinwheel financial-data API,
//! the two-step SMS OTP connection flow, and the HTTP handlers that proxy
//! it to front-end callers.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Spinwheel request/response models.
//! - `spinwheel`: Spinwheel API client.
//! - `wizard`: Connection wizard state machine.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod spinwheel;
pub mod wizard;
