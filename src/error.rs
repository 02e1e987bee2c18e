//! Error types shared by every stage of the render pipeline.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::export::{ExportFormat, Exporter};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A template that does not compile.
    #[error("template syntax error on line {line}: {reason}")]
    TemplateSyntax { line: usize, reason: String },

    #[error("template error: {0}")]
    Render(#[from] minijinja::Error),

    /// A `--field` that names no column of the data file.
    #[error("field '{field}' is not a column of {}", .data.display())]
    MissingField { field: String, data: PathBuf },

    #[error(
        "placeholders {} in {} have no matching column",
        format_names(.names),
        .template.display()
    )]
    UnresolvedPlaceholders { names: Vec<String>, template: PathBuf },

    #[error("record on row {row} has no column '{field}'")]
    FieldNotInRecord { field: String, row: usize },

    #[error("record on row {row} produces an empty file name")]
    EmptyName { row: usize },

    #[error("records on rows {first} and {row} both render to '{stem}.svg'")]
    DuplicateOutput {
        stem: String,
        first: usize,
        row: usize,
    },

    #[error("record on row {row} would overwrite the template {}", .path.display())]
    OverwritesTemplate { row: usize, path: PathBuf },

    #[error("'{}' cannot be used as a template", .0.display())]
    InvalidTemplatePath(PathBuf),

    #[error("configuration file {} does not exist", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("{exporter} cannot export to {format}")]
    UnsupportedFormat {
        exporter: Exporter,
        format: ExportFormat,
    },

    #[error("export program `{program}` was not found in PATH")]
    ExporterNotFound { program: String },

    #[error("`{program}` failed with {status}: {stderr}")]
    ExportFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

fn format_names(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(", ")
}
