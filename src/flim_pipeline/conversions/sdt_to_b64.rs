use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument, warn};

use crate::flim_pipeline::{
    b64::{CubeWriter, SimfcsB64Writer},
    common::{ConversionConfig, ConversionError, Result},
    sdt::{DecayReader, DecayRecord, SdtReader},
    transform,
};

/// Destination path for record `index` of `source`:
/// `<source>.<index>.<extension>`, next to the source file.
pub fn output_path(source: &Path, index: usize, extension: &str) -> PathBuf {
    let mut name = OsString::from(source.as_os_str());
    name.push(format!(".{index}.{extension}"));
    PathBuf::from(name)
}

/// Outcome of walking a folder.
#[derive(Debug, Default)]
pub struct FolderReport {
    /// Source files converted completely
    pub converted: Vec<PathBuf>,
    /// Every destination file written, in order
    pub outputs: Vec<PathBuf>,
    /// Source files that failed, only populated with `keep_going`
    pub failures: Vec<(PathBuf, ConversionError)>,
}

impl FolderReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct SdtToB64Pipeline<R: DecayReader, W: CubeWriter> {
    reader: R,
    writer: W,
    config: ConversionConfig,
}

impl SdtToB64Pipeline<SdtReader, SimfcsB64Writer> {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            reader: SdtReader,
            writer: SimfcsB64Writer,
            config,
        }
    }
}

impl<R: DecayReader, W: CubeWriter> SdtToB64Pipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    pub fn validate_shape(&self, source: &Path, record: &DecayRecord) -> Result<[usize; 3]> {
        let expected = self.config.expected_shape;
        if record.shape.as_slice() != expected.as_slice() {
            return Err(ConversionError::ShapeMismatch {
                source_path: source.to_path_buf(),
                record: record.index,
                expected: expected.to_vec(),
                actual: record.shape.clone(),
            });
        }
        Ok(expected)
    }

    /// Reorders and encodes one record whose shape `validate_shape`
    /// already accepted.
    pub fn convert_record(
        &self,
        shape: [usize; 3],
        record: DecayRecord,
        output: &mut dyn Write,
    ) -> Result<()> {
        let cube = {
            let _span = tracing::info_span!("reorder", record = record.index).entered();
            transform::to_time_major(shape, record.samples)?
        };

        {
            let _span = tracing::info_span!("encode_b64").entered();
            self.writer.write_cube(&cube, output)?;
        }

        Ok(())
    }

    /// Converts every record of `source`, returning the files written.
    ///
    /// Stops at the first failing record; outputs of earlier records stay
    /// on disk.
    #[instrument(skip(self, source), fields(source = %source.as_ref().display()))]
    pub fn convert_file<P: AsRef<Path>>(&self, source: P) -> Result<Vec<PathBuf>> {
        let source = source.as_ref();
        info!(file = %source.display(), "Converting file");

        let mut container = {
            let _span = tracing::info_span!("open_container").entered();
            self.reader.open(source)?
        };

        let mut written = Vec::new();
        for index in 0..container.len() {
            let record = {
                let _span = tracing::info_span!("decode_record", index).entered();
                container.record(index)?
            };

            // Checked before the destination is created so a bad record
            // leaves no file behind.
            let shape = {
                let _span = tracing::info_span!("validate_shape", record = index).entered();
                self.validate_shape(source, &record)?
            };

            let destination = output_path(source, index, &self.config.destination_extension);
            let file = File::create(&destination).map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", destination.display(), e))
            })?;
            let mut output = BufWriter::new(file);

            self.convert_record(shape, record, &mut output)?;
            output.flush().map_err(|e| {
                ConversionError::OutputWriteError(format!("{}: {}", destination.display(), e))
            })?;

            debug!(output = %destination.display(), "Record written");
            written.push(destination);
        }

        info!(records = written.len(), "File converted");
        Ok(written)
    }

    /// Converts every direct entry of `folder` whose name ends with the
    /// source extension, in directory listing order.
    #[instrument(skip(self, folder), fields(folder = %folder.as_ref().display()))]
    pub fn convert_folder<P: AsRef<Path>>(&self, folder: P) -> Result<FolderReport> {
        let folder = folder.as_ref();
        let suffix = format!(".{}", self.config.source_extension);
        let entries = std::fs::read_dir(folder).map_err(|e| {
            ConversionError::InputReadError(format!("{}: {}", folder.display(), e))
        })?;

        let mut report = FolderReport::default();
        for entry in entries {
            let entry = entry?;
            if !entry.file_name().to_string_lossy().ends_with(&suffix) {
                debug!(entry = %entry.path().display(), "Skipping");
                continue;
            }

            let source = entry.path();
            match self.convert_file(&source) {
                Ok(outputs) => {
                    report.outputs.extend(outputs);
                    report.converted.push(source);
                }
                Err(e) if self.config.keep_going => {
                    error!(file = %source.display(), error = %e, "Conversion failed, continuing");
                    report.failures.push((source, e));
                }
                Err(e) => return Err(e),
            }
        }

        if !report.is_success() {
            warn!(failed = report.failures.len(), "Some files failed to convert");
        }
        Ok(report)
    }
}
