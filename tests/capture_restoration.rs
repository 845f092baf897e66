//! Presentation is restored after every capture, whichever step fails

use futures::future::BoxFuture;
use futures::FutureExt;
use labelpress::fonts::{FontReadiness, FontsSettled, NoFontSignal};
use labelpress::{
    Capturer, Error, LabelScene, PipelineConfig, Presentation, RasterArtifact, RasterOptions, Rect, Result,
    SceneRegion, VisualRegion,
};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Fault {
    None,
    Apply,
    FontWait,
    Measure,
    Vanish,
    Rasterize,
}

/// Wraps a scene region and fails at one step once the region has been
/// switched to its capture-safe presentation.
struct FaultyRegion {
    inner: SceneRegion,
    fault: Fault,
}

impl FaultyRegion {
    fn new(fault: Fault) -> Self {
        let scene = LabelScene::blank(200.0, 120.0);
        Self {
            inner: SceneRegion::new(scene).with_presentation(decorated()),
            fault,
        }
    }

    fn prepared(&self) -> bool {
        self.inner.presentation().map(|p| p == Presentation::capture_safe()).unwrap_or(false)
    }
}

impl VisualRegion for FaultyRegion {
    fn is_attached(&self) -> Result<bool> {
        self.inner.is_attached()
    }

    fn presentation(&self) -> Result<Presentation> {
        self.inner.presentation()
    }

    fn apply_presentation(&mut self, presentation: &Presentation) -> Result<()> {
        self.inner.apply_presentation(presentation)?;
        if self.fault == Fault::Apply && *presentation == Presentation::capture_safe() {
            return Err(Error::Other("style write rejected".into()));
        }
        Ok(())
    }

    fn bounding_box(&self) -> Result<Rect> {
        if self.fault == Fault::Measure && self.prepared() {
            return Err(Error::Other("layout not available".into()));
        }
        if self.fault == Fault::Vanish && self.prepared() {
            return Err(Error::InvalidRegionError("element left the document".into()));
        }
        self.inner.bounding_box()
    }

    fn rasterize(&self, bounds: &Rect, options: &RasterOptions) -> Result<RasterArtifact> {
        if self.fault == Fault::Rasterize {
            return Err(Error::Other("canvas tainted".into()));
        }
        self.inner.rasterize(bounds, options)
    }
}

struct FailingFonts;

impl FontReadiness for FailingFonts {
    fn ready(&self) -> Option<BoxFuture<'_, Result<()>>> {
        Some(futures::future::ready(Err(Error::Other("font face failed to load".into()))).boxed())
    }
}

fn decorated() -> Presentation {
    Presentation {
        position: "absolute".into(),
        left: "320px".into(),
        top: "96px".into(),
        border: "1px solid #e0e0e0".into(),
        box_shadow: "0 2px 8px rgba(0, 0, 0, 0.15)".into(),
    }
}

fn capturer_for(fault: Fault) -> Capturer {
    let fonts: Arc<dyn FontReadiness> = match fault {
        Fault::FontWait => Arc::new(FailingFonts),
        _ => Arc::new(FontsSettled),
    };
    Capturer::new(&PipelineConfig::default(), fonts).unwrap()
}

#[tokio::test]
async fn successful_capture_leaves_presentation_untouched() {
    let mut region = FaultyRegion::new(Fault::None);
    let before = region.presentation().unwrap();
    capturer_for(Fault::None).capture(&mut region).await.unwrap();
    assert_eq!(region.presentation().unwrap(), before);
}

#[tokio::test]
async fn every_fault_still_restores_presentation() {
    for fault in [Fault::Apply, Fault::FontWait, Fault::Measure, Fault::Vanish, Fault::Rasterize] {
        let mut region = FaultyRegion::new(fault);
        let err = capturer_for(fault).capture(&mut region).await.unwrap_err();
        assert!(matches!(err, Error::CaptureError(_)), "{:?} produced {:?}", fault, err);
        assert_eq!(region.presentation().unwrap(), decorated(), "{:?} left the region mutated", fault);
    }
}

#[tokio::test]
async fn dropped_capture_future_restores_presentation() {
    let tracker = labelpress::fonts::FontLoadTracker::new();
    let _pending = tracker.begin_load("Libre Barcode 39");
    let capturer = Capturer::new(&PipelineConfig::default(), Arc::new(tracker.clone())).unwrap();

    let mut region = FaultyRegion::new(Fault::None);
    {
        let fut = capturer.capture(&mut region);
        // the font never settles, so the capture is still suspended when dropped
        let timed_out = tokio::time::timeout(std::time::Duration::from_millis(20), fut).await;
        assert!(timed_out.is_err());
    }
    assert_eq!(region.presentation().unwrap(), decorated());
}

#[tokio::test]
async fn detached_region_is_rejected_without_mutation() {
    let mut region = SceneRegion::new(LabelScene::blank(200.0, 120.0));
    region.detach();
    let capturer = Capturer::new(&PipelineConfig::default(), Arc::new(NoFontSignal)).unwrap();
    let err = capturer.capture(&mut region).await.unwrap_err();
    assert!(matches!(err, Error::InvalidRegionError(_)));
    assert_eq!(region.mutation_count(), 0);
}

#[tokio::test]
async fn raster_is_measured_box_times_four() {
    let capturer = Capturer::new(&PipelineConfig::default(), Arc::new(NoFontSignal)).unwrap();
    for (w, h) in [(1.0, 1.0), (59.0, 40.0), (200.0, 120.0), (223.5, 151.25), (640.0, 12.0)] {
        let mut region = SceneRegion::new(LabelScene::blank(w, h)).with_presentation(decorated());
        let art = capturer.capture(&mut region).await.unwrap();
        assert_eq!(art.width, (w * 4.0_f64).round() as u32);
        assert_eq!(art.height, (h * 4.0_f64).round() as u32);
    }
}

#[tokio::test]
async fn border_does_not_bleed_into_raster() {
    let capturer = Capturer::new(&PipelineConfig::default(), Arc::new(NoFontSignal)).unwrap();
    let mut region = SceneRegion::new(LabelScene::blank(50.0, 30.0)).with_presentation(decorated());
    let art = capturer.capture(&mut region).await.unwrap();

    // measured without the 1px border on each side
    assert_eq!((art.width, art.height), (200, 120));
    let img = image::load_from_memory(&art.png_data).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
}
