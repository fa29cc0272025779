//! Gemini routes - single-turn text generation
//!
//! Structure:
//! - api.rs: JSON API endpoints

pub mod api;

pub use api::generate_text;
