use crate::cli::RenderArgs;
use crate::config::{self, Config};
use crate::render::{self, RenderOptions, RenderReport};
use crate::utils::print_info;
use prettytable::{format, row, Table};
use std::error::Error;

/// Render the template given on the command line.
pub fn execute(args: &RenderArgs) -> Result<(), Box<dyn Error>> {
    let config = config::load(args.config.as_deref())?;
    let opts = build_options(args, &config)?;
    log::debug!("{:?}", opts);

    let report = render::render(&opts)?;

    if opts.dry_run {
        plan_table(&report).printstd();
        print_info(&format!(
            "Dry run: {} documents would be written to '{}'",
            report.len(),
            config::display_relative_path(&opts.output_dir)
        ));
        return Ok(());
    }

    print_info(&format!(
        "Successfully rendered {} documents to '{}'",
        report.len(),
        config::display_relative_path(&opts.output_dir)
    ));
    if let Some((exporter, format)) = opts.export {
        print_info(&format!(
            "Exported {} files to {} with {}",
            report.len(),
            format.extension().to_uppercase(),
            exporter
        ));
    }
    Ok(())
}

/// Merges command-line arguments over the configuration.
pub fn build_options(args: &RenderArgs, config: &Config) -> Result<RenderOptions, Box<dyn Error>> {
    let template = args.template.clone().ok_or("No template given")?;
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());

    let mut opts = RenderOptions::new(template, output_dir);
    opts.fields = args.fields.clone();
    opts.separator = args
        .separator
        .clone()
        .unwrap_or_else(|| config.separator.clone());
    opts.escape = config.escape && !args.raw;
    opts.export = args.export.map(|choice| {
        (
            choice.resolve(config.exporter),
            args.format.unwrap_or(config.format),
        )
    });
    opts.dry_run = args.dry_run;
    Ok(opts)
}

/// One line per record: the file it renders to and its export artifact.
pub fn plan_table(report: &RenderReport) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(row!["Row", "SVG", "Export"]);
    for doc in &report.documents {
        let artifact = doc
            .artifact
            .as_ref()
            .map(|a| a.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(row![doc.row, doc.svg.display(), artifact]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ExportChoice;
    use crate::export::{ExportFormat, Exporter};
    use crate::render::RenderedDocument;
    use std::path::PathBuf;

    #[test]
    fn test_arguments_override_config() {
        let config = Config {
            exporter: Exporter::CairoSvg,
            separator: "_".to_string(),
            ..Config::default()
        };
        let args = RenderArgs {
            template: Some(PathBuf::from("card.svg")),
            export: Some(ExportChoice::Default),
            format: Some(ExportFormat::Png),
            raw: true,
            ..RenderArgs::default()
        };

        let opts = build_options(&args, &config).unwrap();
        assert_eq!(opts.output_dir, PathBuf::from("output"));
        assert_eq!(opts.separator, "_");
        assert_eq!(opts.export, Some((Exporter::CairoSvg, ExportFormat::Png)));
        assert!(!opts.escape);

        let args = RenderArgs {
            template: Some(PathBuf::from("card.svg")),
            export: Some(ExportChoice::Svg2Pdf),
            ..RenderArgs::default()
        };
        let opts = build_options(&args, &config).unwrap();
        assert_eq!(opts.export, Some((Exporter::Svg2Pdf, ExportFormat::Pdf)));
        assert!(opts.escape);
    }

    #[test]
    fn test_plan_table() {
        let report = RenderReport {
            documents: vec![RenderedDocument {
                row: 1,
                stem: "austin".to_string(),
                svg: PathBuf::from("out/austin.svg"),
                artifact: None,
            }],
        };
        let table = plan_table(&report);
        assert_eq!(table.len(), 1);
        let text = table.to_string();
        assert!(text.contains("out/austin.svg"));
    }
}
