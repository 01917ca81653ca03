use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use sdt2b64::flim_pipeline::{ConversionConfig, SdtToB64Pipeline};
use sdt2b64::logger;
use sdt2b64::selector::{Selection, Selector, TerminalPrompt};

use tracing::{debug, error, info};

/// Convert Becker & Hickl .sdt FLIM files into SimFCS .B64 files.
///
/// Each record of a source file is written next to it as
/// `<file>.<record>.B64`. Without --file or --folder the selection is
/// asked for interactively.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// .sdt file to convert
    #[arg(long, conflicts_with = "folder")]
    file: Option<PathBuf>,

    /// folder whose .sdt files are converted (not recursive)
    #[arg(long)]
    folder: Option<PathBuf>,

    /// keep converting the remaining files of a folder after one fails
    #[arg(long)]
    keep_going: bool,

    /// choose with native dialogs instead of the terminal
    #[cfg(feature = "dialog")]
    #[arg(long)]
    dialog: bool,
}

impl Args {
    fn selection(&self) -> Option<Selection> {
        match (&self.file, &self.folder) {
            (Some(file), _) => Some(Selection::File(file.clone())),
            (None, Some(folder)) => Some(Selection::Folder(folder.clone())),
            (None, None) => None,
        }
    }

    #[cfg(feature = "dialog")]
    fn selector(&self, config: &ConversionConfig) -> Box<dyn Selector> {
        if self.dialog {
            Box::new(sdt2b64::selector::DialogSelector::new(
                config.source_extension.clone(),
            ))
        } else {
            Box::new(TerminalPrompt::stdio())
        }
    }

    #[cfg(not(feature = "dialog"))]
    fn selector(&self, _config: &ConversionConfig) -> Box<dyn Selector> {
        Box::new(TerminalPrompt::stdio())
    }
}

/// Converts the selection and reports completion on `out`.
///
/// Returns `Ok(false)` when a keep-going folder walk had failures. A
/// cancelled selection converts nothing and writes nothing.
fn run(
    selection: Option<Selection>,
    config: ConversionConfig,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let Some(selection) = selection else {
        debug!("Selection cancelled, nothing to convert");
        return Ok(true);
    };
    let selection = selection.validate(&config.source_extension)?;

    let pipeline = SdtToB64Pipeline::new(config);
    info!(path = %selection.path().display(), kind = ?selection.kind(), "Starting conversion");

    let failed = match &selection {
        Selection::File(path) => {
            pipeline
                .convert_file(path)
                .with_context(|| format!("converting {}", path.display()))?;
            0
        }
        Selection::Folder(path) => {
            let report = pipeline
                .convert_folder(path)
                .with_context(|| format!("converting folder {}", path.display()))?;
            info!(
                files = report.converted.len(),
                outputs = report.outputs.len(),
                "Folder converted"
            );
            for (source, e) in &report.failures {
                error!(file = %source.display(), "{e}");
            }
            report.failures.len()
        }
    };

    writeln!(out, "Finished converting")?;

    if failed > 0 {
        error!(failed, "Some files failed to convert");
    }
    Ok(failed == 0)
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let args = Args::parse();
    let config = ConversionConfig::builder()
        .keep_going(args.keep_going)
        .build();

    let selection = match args.selection() {
        Some(selection) => Some(selection),
        None => args.selector(&config).select()?,
    };

    if !run(selection, config, &mut std::io::stdout())? {
        bail!("some files failed to convert");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_flag() {
        let args = Args::parse_from(["sdt2b64", "--file", "cells.sdt"]);
        assert_eq!(args.selection(), Some(Selection::File(PathBuf::from("cells.sdt"))));
        assert!(!args.keep_going);
    }

    #[test]
    fn test_folder_flag_with_keep_going() {
        let args = Args::parse_from(["sdt2b64", "--folder", "runs", "--keep-going"]);
        assert_eq!(args.selection(), Some(Selection::Folder(PathBuf::from("runs"))));
        assert!(args.keep_going);
    }

    #[test]
    fn test_no_flags_means_prompt() {
        let args = Args::parse_from(["sdt2b64"]);
        assert_eq!(args.selection(), None);
    }

    #[test]
    fn test_file_and_folder_conflict() {
        let result = Args::try_parse_from(["sdt2b64", "--file", "a.sdt", "--folder", "runs"]);
        assert!(result.is_err());
    }

    fn finished(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_cancelled_selection_prints_nothing() {
        let mut out = Vec::new();
        let ok = run(None, ConversionConfig::default(), &mut out).unwrap();

        assert!(ok);
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_folder_finishes() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let selection = Some(Selection::Folder(dir.path().to_path_buf()));

        let ok = run(selection, ConversionConfig::default(), &mut out).unwrap();

        assert!(ok);
        assert_eq!(finished(out), "Finished converting\n");
    }

    #[test]
    fn test_keep_going_failures_still_finish() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.sdt"), b"not an sdt file").unwrap();
        let config = ConversionConfig::builder().keep_going(true).build();
        let mut out = Vec::new();

        let ok = run(Some(Selection::Folder(dir.path().to_path_buf())), config, &mut out).unwrap();

        assert!(!ok);
        assert_eq!(finished(out), "Finished converting\n");
    }

    #[test]
    fn test_fail_fast_error_prints_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.sdt"), b"not an sdt file").unwrap();
        let mut out = Vec::new();

        let result = run(
            Some(Selection::Folder(dir.path().to_path_buf())),
            ConversionConfig::default(),
            &mut out,
        );

        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let selection = Some(Selection::File(dir.path().join("absent.sdt")));

        assert!(run(selection, ConversionConfig::default(), &mut out).is_err());
        assert!(out.is_empty());
    }
}
