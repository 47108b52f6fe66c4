//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, repository calls and search into use-case APIs.
//! - Keep API/CLI layers decoupled from storage details.

pub mod address_service;
