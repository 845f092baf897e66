//! The full print action: capture, then present

use crate::capture::Capturer;
use crate::config::{ConfigStore, PhysicalLabelSize};
use crate::fonts::FontReadiness;
use crate::region::VisualRegion;
use crate::surface::{present_for_print, PrintDocument, PrintSurfaceHost};
use crate::{PipelineConfig, Result};
use std::sync::Arc;

/// Where a print action currently stands.
///
/// `ImageLoaded`, `PrintTriggered` and `Closed` are reached inside the print
/// document and are never observed by the pipeline itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Capturing,
    PresentationRestored,
    SurfaceOpen,
    ImageLoaded,
    PrintTriggered,
    Closed,
}

/// Runs print actions against a surface host.
///
/// Each call to [`LabelPrinter::print`] reads the label size from the store
/// once, captures the region, and opens one new print surface.
pub struct LabelPrinter<H: PrintSurfaceHost> {
    capturer: Capturer,
    config: PipelineConfig,
    store: Arc<dyn ConfigStore>,
    host: H,
    state: PipelineState,
}

impl<H: PrintSurfaceHost> LabelPrinter<H> {
    pub fn new(
        config: PipelineConfig,
        fonts: Arc<dyn FontReadiness>,
        store: Arc<dyn ConfigStore>,
        host: H,
    ) -> Result<Self> {
        let capturer = Capturer::new(&config, fonts)?;
        Ok(Self {
            capturer,
            config,
            store,
            host,
            state: PipelineState::Idle,
        })
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Capture `region` and open a print surface for it.
    pub async fn print<R>(&mut self, region: &mut R) -> Result<()>
    where
        R: VisualRegion + ?Sized,
    {
        let size = PhysicalLabelSize::from_store(self.store.as_ref());

        self.transition(PipelineState::Capturing);
        let artifact = match self.capturer.capture(region).await {
            Ok(a) => a,
            Err(e) => {
                self.transition(PipelineState::Idle);
                return Err(e);
            }
        };
        self.transition(PipelineState::PresentationRestored);

        match present_for_print(&mut self.host, artifact, size, &self.config) {
            Ok(()) => {
                self.transition(PipelineState::SurfaceOpen);
                Ok(())
            }
            Err(e) => {
                self.transition(PipelineState::Idle);
                Err(e)
            }
        }
    }

    /// Capture `region` and build its print document without opening a surface.
    pub async fn render_document<R>(&mut self, region: &mut R) -> Result<PrintDocument>
    where
        R: VisualRegion + ?Sized,
    {
        let size = PhysicalLabelSize::from_store(self.store.as_ref());
        let artifact = self.capturer.capture(region).await?;
        Ok(PrintDocument::build(&artifact, size, &self.config))
    }

    fn transition(&mut self, next: PipelineState) {
        log::debug!("print pipeline: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
