//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Result model (Hit, MatchSpan) and the error taxonomy
//! - Rendering with an injected theme
//! - Path normalization utilities

pub mod model;
pub mod paths;
pub mod render;
