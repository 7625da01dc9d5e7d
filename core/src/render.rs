//! # Template rendering
//!
//! The output file is never written in place. Lines go to a temporary file,
//! and only a fully written and flushed temporary file is copied over the
//! output path. The temporary file is removed afterwards on every path.
//!
//! Templates saved by the Windows remote-desktop client are UTF-16 with a byte
//! order mark; a BOM selects the decoding, anything else is read as UTF-8. The
//! output is always UTF-8.

use std::fmt;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use encoding_rs_io::DecodeReaderBytesBuilder;
use rdpgate_common::config::PLACEHOLDER;
use rdpgate_common::files::{FileStore, Sink};
use thiserror::Error;

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    CreateTemp,
    ReadTemplate,
    WriteTemp,
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            RenderStage::CreateTemp => "creating the temporary file",
            RenderStage::ReadTemplate => "reading the template",
            RenderStage::WriteTemp => "writing the temporary file",
        };
        f.write_str(stage)
    }
}

/// A failed render: the failure itself plus, if removing the temporary file
/// failed as well, that second failure.
#[derive(Debug, Error)]
#[error("failed {stage}: {source}")]
pub struct RenderError {
    pub stage: RenderStage,
    pub source: io::Error,
    pub cleanup: Option<io::Error>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub lines: usize,
    pub substitutions: usize,
}

/// Writes `template` to `temp` line by line, replacing every placeholder with
/// `replacement`.
///
/// On failure the temporary file is closed and removed before returning.
pub fn render(
    files: &dyn FileStore,
    template: &Path,
    temp: &Path,
    replacement: &str,
) -> Result<RenderSummary, RenderError> {
    let sink = files.create(temp).map_err(|source| RenderError {
        stage: RenderStage::CreateTemp,
        source,
        cleanup: None,
    })?;
    let mut writer = BufWriter::new(sink);

    let written = write_lines(files, template, &mut writer, replacement);
    let written = match written {
        Ok(summary) => flush_and_close(writer)
            .map(|()| summary)
            .map_err(|e| (RenderStage::WriteTemp, e)),
        Err(e) => {
            // Drop the handle without flushing so the file can be removed.
            drop(writer.into_parts());
            Err(e)
        }
    };

    written.map_err(|(stage, source)| RenderError {
        stage,
        source,
        cleanup: files.remove(temp).err(),
    })
}

fn write_lines(
    files: &dyn FileStore,
    template: &Path,
    writer: &mut impl Write,
    replacement: &str,
) -> Result<RenderSummary, (RenderStage, io::Error)> {
    let source = files
        .open(template)
        .map_err(|e| (RenderStage::ReadTemplate, e))?;
    let reader = BufReader::new(
        DecodeReaderBytesBuilder::new()
            .bom_sniffing(true)
            .strip_bom(true)
            .build(source),
    );

    let mut summary = RenderSummary {
        lines: 0,
        substitutions: 0,
    };
    for line in reader.lines() {
        let line = line.map_err(|e| (RenderStage::ReadTemplate, e))?;
        summary.substitutions += line.matches(PLACEHOLDER).count();
        summary.lines += 1;

        let line = line.replace(PLACEHOLDER, replacement);
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.write_all(LINE_ENDING.as_bytes()))
            .map_err(|e| (RenderStage::WriteTemp, e))?;
    }

    Ok(summary)
}

fn flush_and_close(writer: BufWriter<Box<dyn Sink>>) -> io::Result<()> {
    let mut sink = writer.into_inner().map_err(|e| e.into_error())?;
    sink.sync_all()
}

/// Outcome of copying the temporary file over the output path.
#[derive(Debug)]
pub struct Promotion {
    pub copy: io::Result<u64>,
    pub cleanup: io::Result<()>,
}

/// Copies `temp` over `output`, then removes `temp` whether or not the copy
/// succeeded.
pub fn promote(files: &dyn FileStore, temp: &Path, output: &Path) -> Promotion {
    let copy = files.copy(temp, output);
    let cleanup = files.remove(temp);
    Promotion { copy, cleanup }
}
