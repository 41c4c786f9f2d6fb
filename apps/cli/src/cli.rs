//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "qdesk", version, about = "Quotation totals, PDF export and import")]
pub struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long, global = true, env = "QDESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print per-line totals and the quotation summary.
    Totals(TotalsArgs),

    /// Render a quotation to PDF with its record embedded.
    Render(RenderArgs),

    /// Recover the record embedded in a rendered quotation.
    Import(ImportArgs),

    /// Print invoice totals (CGST/SGST or IGST).
    Invoice(TotalsArgs),
}

#[derive(Debug, Args)]
pub struct TotalsArgs {
    /// Record JSON, as returned by the API.
    pub record: PathBuf,

    /// Print machine-readable JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Quotation record JSON.
    pub record: PathBuf,

    /// Directory the PDF is written to.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Resolve image references as files under this directory.
    #[arg(long, conflicts_with = "image_base_url")]
    pub images_dir: Option<PathBuf>,

    /// Resolve relative image references against this URL.
    #[arg(long)]
    pub image_base_url: Option<String>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// A PDF written by `qdesk render`.
    pub file: PathBuf,

    /// Write the recovered template here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Create a new quotation from the template through the API.
    #[arg(long)]
    pub submit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_image_options_conflict() {
        let result = Cli::try_parse_from([
            "qdesk",
            "render",
            "q.json",
            "--images-dir",
            "img",
            "--image-base-url",
            "http://localhost",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["qdesk", "totals", "q.json", "--json", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Totals(args) => assert!(args.json),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
