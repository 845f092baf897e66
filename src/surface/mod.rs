//! Print surface stage: hand the raster to a fresh rendering context
//!
//! The surface is an opaque platform capability. Hosts open a window, the
//! pipeline writes one document into it and closes the stream; everything
//! after that (image load, print dialog, dismissal) is up to the platform.

pub mod browser;
pub mod document;
pub mod recording;

pub use browser::BrowserSurfaceHost;
pub use document::PrintDocument;
pub use recording::{RecordedWindow, RecordingHost};

use crate::config::PhysicalLabelSize;
use crate::rendering::RasterArtifact;
use crate::{Error, PipelineConfig, Result};

/// A freshly opened rendering context accepting one document
pub trait PrintWindow {
    /// Append markup to the document stream
    fn write(&mut self, html: &str) -> Result<()>;

    /// Close the document stream; the window stays open for the user
    fn close(&mut self) -> Result<()>;
}

/// Something that can open independent rendering contexts
pub trait PrintSurfaceHost {
    type Window: PrintWindow;

    /// Open a new window, or fail if the platform refuses
    fn open_window(&mut self) -> Result<Self::Window>;
}

/// Open a print surface for `artifact` at `size` and let it print itself.
///
/// Fails with [`Error::PrintSurfaceError`] when no window can be opened; in
/// that case nothing is written anywhere.
pub fn present_for_print<H>(
    host: &mut H,
    artifact: RasterArtifact,
    size: PhysicalLabelSize,
    config: &PipelineConfig,
) -> Result<()>
where
    H: PrintSurfaceHost + ?Sized,
{
    let mut window = host.open_window().map_err(|e| match e {
        Error::PrintSurfaceError(_) => e,
        other => Error::PrintSurfaceError(format!(
            "{} (allow pop-ups for this application and try again)",
            other
        )),
    })?;

    let document = PrintDocument::build(&artifact, size, config);
    drop(artifact);

    log::debug!(
        "writing print document for {}mm x {}mm ({} bytes)",
        size.width_mm,
        size.height_mm,
        document.html().len()
    );
    window.write(document.html())?;
    window.close()?;
    log::info!("print surface opened for {}mm x {}mm label", size.width_mm, size.height_mm);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> RasterArtifact {
        RasterArtifact { width: 4, height: 4, scale: 4, png_data: vec![0; 8] }
    }

    #[test]
    fn document_is_written_and_closed() {
        let mut host = RecordingHost::new();
        present_for_print(&mut host, artifact(), PhysicalLabelSize::default(), &PipelineConfig::default()).unwrap();
        let windows = host.windows();
        assert_eq!(windows.len(), 1);
        assert!(windows[0].closed);
        assert!(windows[0].html.contains("size: 59mm 40mm;"));
    }

    #[test]
    fn refused_window_writes_nothing() {
        let mut host = RecordingHost::blocked();
        let err = present_for_print(&mut host, artifact(), PhysicalLabelSize::default(), &PipelineConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::PrintSurfaceError(_)));
        assert!(host.windows().is_empty());
        assert_eq!(host.refused(), 1);
    }
}
