use std::path::{Path, PathBuf};

pub const TEMPLATE_FILE_NAME: &str = "template.txt";
pub const OUTPUT_FILE_NAME: &str = "output.rdp";
pub const TEMP_FILE_NAME: &str = "output.tmp";

/// The literal token replaced with the resolved gateway.
pub const PLACEHOLDER: &str = "${DefaultGateway}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Index-only selection, refuses to overwrite an existing output file.
    Automatic,
    /// Free-form address entry, port override, overwrite and optional launch.
    Manual,
}

impl Mode {
    /// Manual mode is enabled only by the single argument `manual`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Self {
        match args {
            [only] if only.as_ref() == "manual" => Mode::Manual,
            _ => Mode::Automatic,
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Mode::Manual)
    }
}

pub struct Config {
    pub mode: Mode,
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    /// Intermediate file, promoted to `output_path` once fully written.
    pub temp_path: PathBuf,
}

impl Config {
    /// Well-known files in the current working directory.
    pub fn new(mode: Mode) -> Self {
        Self::in_dir(Path::new("."), mode)
    }

    pub fn in_dir(dir: &Path, mode: Mode) -> Self {
        Self {
            mode,
            template_path: dir.join(TEMPLATE_FILE_NAME),
            output_path: dir.join(OUTPUT_FILE_NAME),
            temp_path: dir.join(TEMP_FILE_NAME),
        }
    }
}
