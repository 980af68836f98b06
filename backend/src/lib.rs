//! # Heating Monitor Backend
//!
//! Telemetry ingestion for heating-monitor devices: devices report temperature
//! readings over HTTP, the backend persists them and serves the most recent
//! readings back.
//!
//! ## Architecture
//!
//! - [`api`]: Public domain and DTO types
//! - [`models`]: The measurement entity and its constraints
//! - [`db`]: Repository trait, in-memory and Postgres backends, factory
//! - [`services`]: Measurement service and the request validation guard
//! - [`routes`]: Route-specific wire types
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`config`]: Server configuration from the environment

pub mod api;
pub mod config;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
