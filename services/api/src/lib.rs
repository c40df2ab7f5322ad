//! services/api/src/lib.rs
//!
//! The MindMatters REST service: configuration, the credential and token
//! layer, storage adapters, and the axum web surface.

pub mod adapters;
pub mod config;
pub mod error;
pub mod security;
pub mod tags;
pub mod web;
