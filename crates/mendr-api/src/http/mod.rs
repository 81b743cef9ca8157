//! HTTP/REST API layer for mendr.
//!
//! Axum-based JSON API for asking questions, leaving feedback and
//! inspecting memory and interaction history.

pub mod error;
pub mod handlers;
pub mod router;
