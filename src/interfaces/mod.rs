//! Presentation-side adapters: CSV import and JSON request bodies.

pub mod csv;
pub mod json;
