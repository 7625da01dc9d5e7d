//! # Connection File Generation Service
//!
//! Implements the one use case of the tool: write the template with the chosen
//! default gateway substituted in.
//!
//! The service only depends on the [`InterfaceSource`], [`Console`],
//! [`Launcher`] and [`FileStore`] capabilities, so the whole run can be driven
//! with synthetic interfaces, scripted answers and injected file failures.

use std::io;
use std::net::Ipv4Addr;

use rdpgate_common::config::{Config, PLACEHOLDER};
use rdpgate_common::console::Console;
use rdpgate_common::files::{FileStore, LocalFiles};
use rdpgate_common::launcher::Launcher;
use rdpgate_common::network::gateway::Selection;
use rdpgate_common::network::interface::InterfaceSource;
use tracing::{debug, error, info, warn};

use crate::enumerate;
use crate::launch::{self, LaunchOutcome};
use crate::render::{self, RenderError};
use crate::select;

/// How a run ended. Only [`RunOutcome::Generated`] leaves an output file behind.
#[derive(Debug)]
pub enum RunOutcome {
    Generated {
        selection: Selection,
        /// `None` outside manual mode.
        launch: Option<LaunchOutcome>,
    },
    TemplateMissing,
    /// Automatic mode refuses to overwrite an existing output file.
    OutputExists,
    NoGateway,
    /// Kept as a guard on the resolved address. A parsed or listed IPv4 address
    /// always formats long enough, so this is not produced in practice.
    ImplausibleAddress(Ipv4Addr),
    RenderFailed(RenderError),
    PromotionFailed(io::Error),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Generated { .. })
    }
}

pub struct GenerateService {
    source: Box<dyn InterfaceSource>,
    launcher: Box<dyn Launcher>,
    files: Box<dyn FileStore>,
}

impl GenerateService {
    pub fn new(source: Box<dyn InterfaceSource>, launcher: Box<dyn Launcher>) -> Self {
        Self {
            source,
            launcher,
            files: Box::new(LocalFiles),
        }
    }

    /// Replaces the local filesystem used for the template, temporary and output files.
    pub fn with_files(mut self, files: Box<dyn FileStore>) -> Self {
        self.files = files;
        self
    }

    /// Runs the workflow once.
    ///
    /// Preconditions and recoverable failures come back as a [`RunOutcome`].
    /// `Err` is reserved for a failed interface query and a closed console.
    pub fn run(&self, cfg: &Config, console: &mut dyn Console) -> anyhow::Result<RunOutcome> {
        info!("Preparing ...");

        if !cfg.template_path.exists() {
            error!(
                "Template file {} not found. Create a .rdp file with your remote desktop client, \
                 replace the computer address with \"{PLACEHOLDER}\", rename the file to \
                 template.txt and place it in the working directory.",
                cfg.template_path.display()
            );
            return Ok(RunOutcome::TemplateMissing);
        }

        // Manual mode overwrites instead, see `Mode::Manual`.
        if !cfg.mode.is_manual() && cfg.output_path.exists() {
            warn!(
                "Output file {} already exists. Move or delete it first so it is not overwritten by mistake.",
                cfg.output_path.display()
            );
            return Ok(RunOutcome::OutputExists);
        }

        let interfaces = enumerate::eligible_interfaces(self.source.as_ref())?;
        let candidates = select::present(&interfaces, console);
        if candidates.is_empty() {
            error!("No IPv4 default gateway found. Check the network connection or restart the computer.");
            return Ok(RunOutcome::NoGateway);
        }

        let choice = select::choose(&candidates, cfg.mode, console)?;
        select::confirm(&choice, console);

        let address = choice.address();
        if !select::is_plausible(address) {
            error!("The selected IPv4 default gateway looks malformed ({address}), stopping.");
            return Ok(RunOutcome::ImplausibleAddress(address));
        }

        let mut selection = Selection::new(address);
        if cfg.mode.is_manual() {
            selection = selection.with_port(select::ask_port(console)?);
        }

        info!("Creating output file ...");
        let replacement = selection.to_string();
        let rendered = render::render(
            self.files.as_ref(),
            &cfg.template_path,
            &cfg.temp_path,
            &replacement,
        );
        let summary = match rendered {
            Ok(summary) => summary,
            Err(e) => {
                error!("Failed {}: {}", e.stage, e.source);
                if let Some(cleanup) = &e.cleanup {
                    error!(
                        "Failed to remove the temporary file, remove {} manually: {cleanup}",
                        cfg.temp_path.display()
                    );
                }
                return Ok(RunOutcome::RenderFailed(e));
            }
        };
        debug!(
            "Rendered {} line(s) with {} substitution(s)",
            summary.lines, summary.substitutions
        );

        let promotion = render::promote(self.files.as_ref(), &cfg.temp_path, &cfg.output_path);
        if let Err(e) = &promotion.cleanup {
            warn!(
                "Failed to remove the temporary file, remove {} manually: {e}",
                cfg.temp_path.display()
            );
        }
        if let Err(e) = promotion.copy {
            error!("Failed to copy the output file: {e}");
            return Ok(RunOutcome::PromotionFailed(e));
        }
        info!("Output file {} created for {selection}", cfg.output_path.display());

        let launch = if cfg.mode.is_manual() {
            Some(launch::offer_launch(
                self.launcher.as_ref(),
                &cfg.output_path,
                console,
            )?)
        } else {
            None
        };

        Ok(RunOutcome::Generated { selection, launch })
    }
}
