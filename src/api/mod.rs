//! Traceforce API plumbing
//!
//! This module provides the transport-facing half of the client: identifier
//! checks, header composition, the request pipeline and response validation.
//!
//! # Module Structure
//!
//! - [`identifier`] - UUID validation run before any URL is built
//! - [`headers`] - Bearer auth merged with constant extra headers
//! - [`http`] - Request pipeline and response validator
//! - [`client`] - Main client holding configuration and building URLs
//! - [`error`] - Validation, transport and API error types

pub mod client;
pub mod error;
pub mod headers;
pub mod http;
pub mod identifier;
