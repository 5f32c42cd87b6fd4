//! HTTP layer: middleware and handlers

pub mod middleware;
pub mod services;
