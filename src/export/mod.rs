//! Conversion of rendered SVG files by an external program.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// External programs able to convert SVG files.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Exporter {
    #[default]
    Inkscape,
    #[value(name = "cairosvg")]
    CairoSvg,
    #[value(name = "svg2pdf")]
    Svg2Pdf,
}

#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Png,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl fmt::Display for Exporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// A single call of an export program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Exporter {
    /// Name of the binary looked up in `PATH`.
    pub fn program(self) -> &'static str {
        match self {
            Exporter::Inkscape => "inkscape",
            Exporter::CairoSvg => "cairosvg",
            Exporter::Svg2Pdf => "svg2pdf",
        }
    }

    pub fn supports(self, format: ExportFormat) -> bool {
        match self {
            Exporter::Inkscape | Exporter::CairoSvg => true,
            Exporter::Svg2Pdf => format == ExportFormat::Pdf,
        }
    }

    pub fn check_format(self, format: ExportFormat) -> Result<()> {
        if self.supports(format) {
            Ok(())
        } else {
            Err(Error::UnsupportedFormat {
                exporter: self,
                format,
            })
        }
    }

    /// Finds the program in the current `PATH`.
    pub fn locate(self) -> Result<PathBuf> {
        self.locate_in(env::var_os("PATH").unwrap_or_default())
    }

    /// Finds the program in the given search path.
    pub fn locate_in<P: AsRef<OsStr>>(self, paths: P) -> Result<PathBuf> {
        let cwd = env::current_dir()?;
        which::which_in(self.program(), Some(paths), cwd).map_err(|e| {
            log::debug!("lookup of `{}` failed: {}", self.program(), e);
            Error::ExporterNotFound {
                program: self.program().to_string(),
            }
        })
    }

    /// Builds the calls converting `files` with the program at `binary`.
    ///
    /// Inkscape converts every file in one batch; the other programs are
    /// called once per file.
    pub fn invocations(
        self,
        binary: &Path,
        files: &[PathBuf],
        format: ExportFormat,
    ) -> Result<Vec<Invocation>> {
        self.check_format(format)?;
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let invocations = match self {
            Exporter::Inkscape => {
                let mut args: Vec<OsString> = vec![
                    "--export-area-drawing".into(),
                    "--batch-process".into(),
                    format!("--export-type={}", format.extension()).into(),
                ];
                args.extend(files.iter().map(|f| f.as_os_str().to_owned()));
                vec![Invocation {
                    program: binary.to_path_buf(),
                    args,
                }]
            }
            Exporter::CairoSvg => files
                .iter()
                .map(|src| Invocation {
                    program: binary.to_path_buf(),
                    args: vec![
                        "-f".into(),
                        format.extension().into(),
                        "-o".into(),
                        artifact_path(src, format).into_os_string(),
                        src.as_os_str().to_owned(),
                    ],
                })
                .collect(),
            Exporter::Svg2Pdf => files
                .iter()
                .map(|src| Invocation {
                    program: binary.to_path_buf(),
                    args: vec![
                        src.as_os_str().to_owned(),
                        artifact_path(src, format).into_os_string(),
                    ],
                })
                .collect(),
        };
        Ok(invocations)
    }

    /// Converts every file, returning the artifact paths in input order.
    pub fn export(self, files: &[PathBuf], format: ExportFormat) -> Result<Vec<PathBuf>> {
        self.check_format(format)?;
        let binary = self.locate()?;
        self.export_with(&binary, files, format)
    }

    /// Same as [`Exporter::export`] with an already located binary.
    pub fn export_with(
        self,
        binary: &Path,
        files: &[PathBuf],
        format: ExportFormat,
    ) -> Result<Vec<PathBuf>> {
        for invocation in self.invocations(binary, files, format)? {
            run(&invocation)?;
        }
        Ok(files.iter().map(|f| artifact_path(f, format)).collect())
    }
}

/// Path of the artifact produced from `src`.
pub fn artifact_path(src: &Path, format: ExportFormat) -> PathBuf {
    src.with_extension(format.extension())
}

fn run(invocation: &Invocation) -> Result<()> {
    log::info!(
        "running {} {}",
        invocation.program.display(),
        invocation
            .args
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );
    let output = Command::new(&invocation.program)
        .args(&invocation.args)
        .stdin(Stdio::null())
        .output()?;

    if output.status.success() {
        Ok(())
    } else {
        Err(Error::ExportFailed {
            program: invocation.program.display().to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files() -> Vec<PathBuf> {
        vec![PathBuf::from("out/austin.svg"), PathBuf::from("out/denver.svg")]
    }

    #[test]
    fn test_inkscape_batches_every_file() {
        let calls = Exporter::Inkscape
            .invocations(Path::new("/usr/bin/inkscape"), &files(), ExportFormat::Png)
            .unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].args,
            vec![
                "--export-area-drawing",
                "--batch-process",
                "--export-type=png",
                "out/austin.svg",
                "out/denver.svg",
            ]
        );
    }

    #[test]
    fn test_cairosvg_runs_once_per_file() {
        let calls = Exporter::CairoSvg
            .invocations(Path::new("cairosvg"), &files(), ExportFormat::Pdf)
            .unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[1].args,
            vec!["-f", "pdf", "-o", "out/denver.pdf", "out/denver.svg"]
        );
    }

    #[test]
    fn test_svg2pdf_only_exports_pdf() {
        let calls = Exporter::Svg2Pdf
            .invocations(Path::new("svg2pdf"), &files(), ExportFormat::Pdf)
            .unwrap();
        assert_eq!(calls[0].args, vec!["out/austin.svg", "out/austin.pdf"]);

        let err = Exporter::Svg2Pdf
            .invocations(Path::new("svg2pdf"), &files(), ExportFormat::Png)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_export_checks_format_before_lookup() {
        let err = Exporter::Svg2Pdf
            .export(&files(), ExportFormat::Png)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_locate_in_empty_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Exporter::Inkscape.locate_in(dir.path()).unwrap_err();
        match err {
            Error::ExporterNotFound { program } => assert_eq!(program, "inkscape"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_is_reported() {
        let err = Exporter::Svg2Pdf
            .export_with(Path::new("false"), &files(), ExportFormat::Pdf)
            .unwrap_err();
        assert!(matches!(err, Error::ExportFailed { .. }));
    }

    #[test]
    fn test_artifact_path() {
        assert_eq!(
            artifact_path(Path::new("out/a.b.svg"), ExportFormat::Pdf),
            PathBuf::from("out/a.b.pdf")
        );
    }
}
