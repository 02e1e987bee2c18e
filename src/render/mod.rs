//! Merging a template with its data file.
pub mod naming;

use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::csv::{self, DataFrame};
use crate::error::{Error, Result};
use crate::export::{self, ExportFormat, Exporter};
use crate::template::Template;

pub use naming::output_stem;

/// What to render and where.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub template: PathBuf,
    pub output_dir: PathBuf,
    /// Columns naming the output files; empty means the first column.
    pub fields: Vec<String>,
    pub separator: String,
    pub escape: bool,
    pub export: Option<(Exporter, ExportFormat)>,
    /// Validate and plan without writing anything.
    pub dry_run: bool,
}

impl RenderOptions {
    pub fn new(template: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        RenderOptions {
            template: template.into(),
            output_dir: output_dir.into(),
            fields: Vec::new(),
            separator: "-".to_string(),
            escape: true,
            export: None,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedDocument {
    pub row: usize,
    pub stem: String,
    pub svg: PathBuf,
    pub artifact: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderReport {
    pub documents: Vec<RenderedDocument>,
}

impl RenderReport {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Renders one SVG per record of the template's data file.
///
/// Every check happens before the first file is written: unknown fields,
/// unresolved placeholders, a missing export program and name collisions
/// all abort the run with nothing on disk.
pub fn render(opts: &RenderOptions) -> Result<RenderReport> {
    let data_path = csv::companion_csv(&opts.template)?;
    let template = Template::from_file(&opts.template)?;
    let df = DataFrame::load(&data_path)?;

    if let Some(field) = df.missing_columns(opts.fields.iter().map(String::as_str)).first() {
        return Err(Error::MissingField {
            field: field.clone(),
            data: data_path,
        });
    }
    let unresolved = template.unresolved(&df.headers)?;
    if !unresolved.is_empty() {
        return Err(Error::UnresolvedPlaceholders {
            names: unresolved,
            template: opts.template.clone(),
        });
    }

    let export = match opts.export {
        Some((exporter, format)) => {
            exporter.check_format(format)?;
            let binary = exporter.locate()?;
            log::debug!("using {} at {}", exporter, binary.display());
            Some((exporter, format, binary))
        }
        None => None,
    };

    let documents = plan(&df, opts)?;
    if df.records.is_empty() {
        log::warn!("{} has no records", data_path.display());
    }
    if opts.dry_run {
        return Ok(RenderReport { documents });
    }

    fs::create_dir_all(&opts.output_dir)?;
    for (doc, record) in documents.iter().zip(&df.records) {
        let rendered = template.render(record, opts.escape)?;
        write_atomic(&doc.svg, rendered.as_bytes())?;
        log::info!("rendered row {} to {}", doc.row, doc.svg.display());
    }

    let mut report = RenderReport { documents };
    if let Some((exporter, format, binary)) = export {
        let files: Vec<PathBuf> = report.documents.iter().map(|d| d.svg.clone()).collect();
        let artifacts = exporter.export_with(&binary, &files, format)?;
        for (doc, artifact) in report.documents.iter_mut().zip(artifacts) {
            doc.artifact = Some(artifact);
        }
    }

    Ok(report)
}

/// Computes the output paths of every record.
///
/// Two records sharing a name, or a record landing on the template itself,
/// abort the run.
fn plan(df: &DataFrame, opts: &RenderOptions) -> Result<Vec<RenderedDocument>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut documents = Vec::with_capacity(df.records.len());
    let template = fs::canonicalize(&opts.template)?;
    // A directory that does not exist yet cannot hold the template.
    let output_dir = fs::canonicalize(&opts.output_dir).ok();

    for record in &df.records {
        let stem = output_stem(record, &opts.fields, &opts.separator)?;
        if let Some(&first) = seen.get(&stem) {
            return Err(Error::DuplicateOutput {
                stem,
                first,
                row: record.row,
            });
        }
        seen.insert(stem.clone(), record.row);

        if let Some(dir) = &output_dir {
            let svg = dir.join(format!("{}.svg", stem));
            let artifact = opts
                .export
                .map(|(_, format)| export::artifact_path(&svg, format));
            if svg == template || artifact.as_ref() == Some(&template) {
                return Err(Error::OverwritesTemplate {
                    row: record.row,
                    path: opts.template.clone(),
                });
            }
        }

        documents.push(RenderedDocument {
            row: record.row,
            svg: opts.output_dir.join(format!("{}.svg", stem)),
            stem,
            artifact: None,
        });
    }

    Ok(documents)
}

/// Writes through a temporary file in the destination directory, then renames.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
