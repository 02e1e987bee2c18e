//! Merge CSV data into SVG templates.
//!
//! A template `card.svg` is paired with `card.csv`. Every data row renders
//! one SVG through minijinja, with the row's columns as template variables.
//! Rendered files can be exported to PDF or PNG by an external program.
pub mod cli;
pub mod commands;
pub mod config;
pub mod csv;
pub mod error;
pub mod export;
pub mod render;
pub mod template;
pub mod utils;

pub use error::{Error, Result};
pub use render::{render, RenderOptions, RenderReport, RenderedDocument};
