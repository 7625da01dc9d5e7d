//! The gateway-to-connection-file workflow.
//!
//! Stages run strictly in order: [`enumerate`] filters the host's interfaces,
//! [`select`] resolves a gateway (and port in manual mode), [`render`] writes the
//! template through a temporary file and promotes it, and [`launch`] optionally
//! opens the result. [`generate::GenerateService`] ties them together.

pub mod enumerate;
pub mod generate;
pub mod launch;
pub mod render;
pub mod select;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
