//! Docuform turns a photographed business document into a working
//! data-entry application.
//!
//! A multimodal model classifies the document, extracts its data points,
//! and picks one of three interaction layouts (form, catalog, checklist).
//! The runtime engine then owns the interactive state, derives metrics,
//! and continuously evaluates an optional natural-language business rule
//! against the session's tracked value. Extraction is fail-closed: any
//! model failure degrades to a deterministic empty portal, never an error.

pub mod api;
pub mod config;
pub mod engine;
pub mod extraction;
pub mod models;
