//! Slip module - turns one employee row into a salary slip PDF.
//!
//! - `content` - resolves every printed string from the row
//! - `render` - draws the fixed A4 layout with genpdf

pub mod content;
pub mod render;

pub use content::{attachment_name, SlipContent};
pub use render::PdfSlipRenderer;

use thiserror::Error;

/// Errors that can occur while producing a slip.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load slip fonts: {0}")]
    Font(#[source] genpdf::error::Error),
    #[error("failed to load slip image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: genpdf::error::Error,
    },
    #[error("failed to lay out slip: {0}")]
    Layout(#[source] genpdf::error::Error),
    #[error("failed to render slip PDF: {0}")]
    Render(#[source] genpdf::error::Error),
}

/// A finished slip ready to attach.
#[derive(Debug, Clone)]
pub struct RenderedSlip {
    pub filename: String,
    pub pdf: Vec<u8>,
}

/// Produces slip documents.
pub trait SlipRenderer: Send + Sync {
    /// Verify the renderer can work at all, before a batch starts.
    fn check(&self) -> Result<(), RenderError> {
        Ok(())
    }

    fn render(&self, content: &SlipContent) -> Result<RenderedSlip, RenderError>;
}
