//! `mdr render` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mdr_config::Config;
use mdr_export::{Exporter, OutputFormat, RenderOptions};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render.
    input: PathBuf,

    /// Output file (default: input path with the format's extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: html, pdf, docx or xlsx.
    #[arg(short, long, default_value = "html", value_parser = parse_format)]
    format: OutputFormat,

    /// Document title (default: input file name without extension).
    #[arg(short, long)]
    title: Option<String>,

    /// Include a table of contents.
    #[arg(long)]
    toc: bool,

    /// Omit the default stylesheet (HTML and PDF only).
    #[arg(long)]
    no_css: bool,

    /// Path to configuration file (default: auto-discover mdr.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn parse_format(value: &str) -> Result<OutputFormat, mdr_export::UnsupportedFormat> {
    value.parse()
}

impl RenderArgs {
    /// Execute the render command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        if !self.input.exists() {
            return Err(CliError::InputNotFound(self.input));
        }

        let config = Config::load(self.config.as_deref(), None)?;
        let markdown = std::fs::read_to_string(&self.input).map_err(|source| CliError::Read {
            path: self.input.clone(),
            source,
        })?;

        let output_path = self.output_path();
        let options = RenderOptions {
            title: self.title(),
            include_toc: self.toc,
            include_css: !self.no_css,
            ..RenderOptions::default()
        };

        tracing::info!(
            input = %self.input.display(),
            output = %output_path.display(),
            format = %self.format,
            "Rendering file"
        );
        Exporter::from_config(&config).render_to_file(
            &markdown,
            self.format,
            &options,
            &output_path,
        )?;

        output.success(&format!(
            "Successfully rendered to: {}",
            output_path.display()
        ));
        Ok(())
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension(self.format.extension()))
    }

    fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| file_stem(&self.input))
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: RenderArgs,
    }

    fn parse(args: &[&str]) -> RenderArgs {
        let mut argv = vec!["mdr"];
        argv.extend_from_slice(args);
        TestCli::parse_from(argv).args
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["docs/guide.md"]);
        assert_eq!(args.format, OutputFormat::Html);
        assert_eq!(args.output_path(), PathBuf::from("docs/guide.html"));
        assert_eq!(args.title(), "guide");
        assert!(!args.toc);
        assert!(!args.no_css);
    }

    #[test]
    fn test_format_sets_extension() {
        let args = parse(&["notes.md", "-f", "xlsx", "-t", "Budget"]);
        assert_eq!(args.output_path(), PathBuf::from("notes.xlsx"));
        assert_eq!(args.title(), "Budget");
    }

    #[test]
    fn test_explicit_output() {
        let args = parse(&["notes.md", "--format", "PDF", "-o", "out/report.pdf"]);
        assert_eq!(args.format, OutputFormat::Pdf);
        assert_eq!(args.output_path(), PathBuf::from("out/report.pdf"));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = TestCli::try_parse_from(["mdr", "notes.md", "-f", "odt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("absent.md");
        let err = parse(&[input.to_str().unwrap()]).execute().unwrap_err();

        assert!(matches!(err, CliError::InputNotFound(_)));
        assert_eq!(
            err.to_string(),
            format!("Error: Input file '{}' does not exist", input.display())
        );
    }

    #[test]
    fn test_render_html_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("guide.md");
        std::fs::write(&input, "# Guide\n\nSome **text**.\n").unwrap();
        let config = dir.path().join("mdr.toml");
        std::fs::write(&config, "").unwrap();

        parse(&[
            input.to_str().unwrap(),
            "--toc",
            "-c",
            config.to_str().unwrap(),
        ])
        .execute()
        .unwrap();

        let html = std::fs::read_to_string(dir.path().join("guide.html")).unwrap();
        assert!(html.contains("<title>guide</title>"));
        assert!(html.contains("Table of Contents"));
        assert!(html.contains("<strong>text</strong>"));
    }

    #[test]
    fn test_render_docx_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.md");
        std::fs::write(&input, "# Notes\n\n- one\n- two\n").unwrap();
        let config = dir.path().join("mdr.toml");
        std::fs::write(&config, "").unwrap();
        let output = dir.path().join("custom.docx");

        parse(&[
            input.to_str().unwrap(),
            "-f",
            "docx",
            "-o",
            output.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
        ])
        .execute()
        .unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
