//! Course service
//!
//! A small REST API exposing CRUD operations over courses, guarded by a
//! shared-secret login that issues signed session tokens.

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;
