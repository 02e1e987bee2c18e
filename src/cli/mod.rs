use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::export::{ExportFormat, Exporter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Merge CSV data into SVG templates",
    long_about = "svggloo renders one SVG file per row of the CSV file sitting next to a template (same name, .csv extension), rendering it as a minijinja template with the row's columns as variables ({{ column }}, {{ column|upper }}, {% if column %}...{% endif %}). The rendered files can then be exported to PDF or PNG with inkscape, cairosvg or svg2pdf.\n\nA template whose path is `init` or `path` is read as a subcommand; write it as ./init or ./path.",
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
pub struct Cli {
    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(flatten)]
    pub render: RenderArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration to .svggloo/config.json
    #[command(alias = "initialize")]
    Init(InitArgs),

    /// Show path to config directory
    #[command()]
    Path,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    /// SVG template; its data is read from the .csv file with the same name
    #[arg(value_hint = ValueHint::FilePath, required = true)]
    pub template: Option<PathBuf>,

    /// Directory receiving the rendered files [default: output]
    #[arg(value_hint = ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,

    /// Column used to name the output files, repeat for several
    #[arg(long = "field", value_name = "NAME", action = ArgAction::Append)]
    pub fields: Vec<String>,

    /// Separator joining the naming fields [default: -]
    #[arg(short, long)]
    pub separator: Option<String>,

    /// Export every rendered file with an external program; the program
    /// must be attached with '=', e.g. --export=cairosvg [default: the
    /// configured exporter, inkscape]
    #[arg(
        short,
        long,
        value_enum,
        value_name = "EXPORTER",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "default"
    )]
    pub export: Option<ExportChoice>,

    /// Format of the exported files [default: pdf]
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Insert values verbatim instead of XML-escaping them
    #[arg(long)]
    pub raw: bool,

    /// Validate and list the files that would be written
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Read configuration from this file instead of .svggloo/config.json
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

/// Value of `--export`: an explicit program or the configured one.
#[derive(clap::ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExportChoice {
    /// The exporter from the configuration
    #[value(hide = true)]
    Default,
    Inkscape,
    #[value(name = "cairosvg")]
    CairoSvg,
    #[value(name = "svg2pdf")]
    Svg2Pdf,
}

impl ExportChoice {
    pub fn resolve(self, configured: Exporter) -> Exporter {
        match self {
            ExportChoice::Default => configured,
            ExportChoice::Inkscape => Exporter::Inkscape,
            ExportChoice::CairoSvg => Exporter::CairoSvg,
            ExportChoice::Svg2Pdf => Exporter::Svg2Pdf,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
