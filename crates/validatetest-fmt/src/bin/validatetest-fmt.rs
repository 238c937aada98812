//! ValidateTest formatter CLI
//!
//! Formats GStreamer ValidateTest files in place, to stdout, or checks
//! that they are already formatted. Reads stdin when no file is given.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use validatetest_fmt::{DEFAULT_INDENT, DEFAULT_LINE_LENGTH, FormatOptions, format_source};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "validatetest-fmt")]
#[command(about = "Format GStreamer ValidateTest files")]
#[command(version)]
struct Cli {
    /// Files to format (reads stdin when omitted)
    files: Vec<PathBuf>,

    /// Edit files in place
    #[arg(short, long)]
    in_place: bool,

    /// Check if files are formatted (exit 1 if not)
    #[arg(short, long)]
    check: bool,

    /// Indentation width
    #[arg(long, env = "VALIDATETEST_FMT_INDENT", default_value_t = DEFAULT_INDENT)]
    indent: usize,

    /// Maximum line length
    #[arg(long, env = "VALIDATETEST_FMT_LINE_LENGTH", default_value_t = DEFAULT_LINE_LENGTH)]
    line_length: usize,
}

/// What to do with a formatted file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Print,
    InPlace,
    Check,
}

impl Cli {
    fn options(&self) -> FormatOptions {
        FormatOptions::new()
            .with_indent_width(self.indent)
            .with_max_line_length(self.line_length)
    }

    fn mode(&self) -> Mode {
        if self.check {
            Mode::Check
        } else if self.in_place {
            Mode::InPlace
        } else {
            Mode::Print
        }
    }
}

/// Formats one file according to `mode`; returns whether it changed.
fn process_file(
    path: &Path,
    options: &FormatOptions,
    mode: Mode,
    out: &mut impl Write,
) -> Result<bool> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let formatted = format_source(&source, options)
        .with_context(|| format!("failed to format {}", path.display()))?;
    let changed = formatted != source;
    debug!(path = %path.display(), changed, "processed");

    match mode {
        Mode::Check => {
            if changed {
                eprintln!("{}: needs formatting", path.display());
            }
        }
        Mode::InPlace => {
            if changed {
                fs::write(path, &formatted)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "formatted");
            }
        }
        Mode::Print => out.write_all(formatted.as_bytes())?,
    }

    Ok(changed)
}

fn process_stdin(options: &FormatOptions, mode: Mode, out: &mut impl Write) -> Result<bool> {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("failed to read stdin")?;

    let formatted = format_source(&source, options).context("failed to format stdin")?;
    if mode != Mode::Check {
        out.write_all(formatted.as_bytes())?;
    }
    Ok(formatted != source)
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let options = cli.options();
    let mode = cli.mode();
    let mut stdout = io::stdout().lock();

    let mut needs_formatting = false;
    if cli.files.is_empty() {
        needs_formatting = process_stdin(&options, mode, &mut stdout)?;
    } else {
        for path in &cli.files {
            needs_formatting |= process_file(path, &options, mode, &mut stdout)?;
        }
    }
    stdout.flush()?;

    if mode == Mode::Check && needs_formatting {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    run(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_printing_with_default_layout() {
        let cli = Cli::try_parse_from(["validatetest-fmt", "a.validatetest"]).unwrap();
        assert_eq!(cli.mode(), Mode::Print);
        assert_eq!(cli.files, vec![PathBuf::from("a.validatetest")]);
        assert_eq!(cli.options(), FormatOptions::default());
    }

    #[test]
    fn check_takes_precedence_over_in_place() {
        let cli = Cli::try_parse_from(["validatetest-fmt", "-i", "-c", "a.validatetest"]).unwrap();
        assert_eq!(cli.mode(), Mode::Check);

        let cli =
            Cli::try_parse_from(["validatetest-fmt", "--in-place", "a.validatetest"]).unwrap();
        assert_eq!(cli.mode(), Mode::InPlace);
    }

    #[test]
    fn layout_flags_override_defaults() {
        let cli = Cli::try_parse_from(["validatetest-fmt", "--indent", "2", "--line-length", "80"])
            .unwrap();
        assert!(cli.files.is_empty());
        assert_eq!(
            cli.options(),
            FormatOptions::new().with_indent_width(2).with_max_line_length(80)
        );
    }

    #[test]
    fn rejects_invalid_indent() {
        assert!(Cli::try_parse_from(["validatetest-fmt", "--indent", "wide"]).is_err());
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.validatetest");
        let err = process_file(&path, &FormatOptions::default(), Mode::Print, &mut Vec::new())
            .unwrap_err();
        assert!(err.to_string().contains("missing.validatetest"));
    }

    #[cfg(not(validatetest_grammar))]
    #[test]
    fn unlinked_grammar_is_reported_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.validatetest");
        fs::write(&path, "action,foo=bar").unwrap();

        let err = process_file(&path, &FormatOptions::default(), Mode::InPlace, &mut Vec::new())
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to format"));
        assert!(err.to_string().contains("a.validatetest"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "action,foo=bar");
    }

    #[cfg_attr(not(validatetest_grammar), ignore = "validatetest grammar not linked")]
    #[test]
    fn in_place_rewrites_only_changed_files() {
        let dir = tempfile::tempdir().unwrap();
        let messy = dir.path().join("messy.validatetest");
        let clean = dir.path().join("clean.validatetest");
        fs::write(&messy, "action,foo=bar").unwrap();
        fs::write(&clean, "action, foo=bar\n").unwrap();

        let options = FormatOptions::default();
        let mut out = Vec::new();
        assert!(process_file(&messy, &options, Mode::InPlace, &mut out).unwrap());
        assert!(!process_file(&clean, &options, Mode::InPlace, &mut out).unwrap());

        assert!(out.is_empty());
        assert_eq!(fs::read_to_string(&messy).unwrap(), "action, foo=bar\n");
    }

    #[cfg_attr(not(validatetest_grammar), ignore = "validatetest grammar not linked")]
    #[test]
    fn check_mode_leaves_files_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messy.validatetest");
        fs::write(&path, "action,foo=bar").unwrap();

        let changed =
            process_file(&path, &FormatOptions::default(), Mode::Check, &mut Vec::new()).unwrap();
        assert!(changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "action,foo=bar");
    }

    #[cfg_attr(not(validatetest_grammar), ignore = "validatetest grammar not linked")]
    #[test]
    fn print_mode_writes_formatted_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.validatetest");
        fs::write(&path, "# note\naction,foo=bar").unwrap();

        let mut out = Vec::new();
        process_file(&path, &FormatOptions::default(), Mode::Print, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "# note\naction, foo=bar\n");
    }
}
