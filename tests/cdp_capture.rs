#![cfg(feature = "cdp")]

use labelpress::cdp::{launch, CdpFonts, CdpRegion};
use labelpress::{Capturer, Error, PipelineConfig, VisualRegion};
use std::sync::Arc;

const PREVIEW: &str = "data:text/html,<html><body style='margin:0'>\
<div id='label' style='position:relative;left:40px;top:20px;width:200px;height:120px;\
border:1px solid %23ccc;box-shadow:0 2px 8px rgba(0,0,0,.2);background:%23fff'>\
<b>Ibuprofen 400mg</b></div></body></html>";

#[tokio::test]
#[ignore] // Requires Chrome to be installed
async fn capture_live_element_restores_style() {
    let (_browser, tab) = match launch(PREVIEW, (800, 600)) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Skipping CDP capture; failed to start Chrome: {}", e);
            return;
        }
    };

    let mut region = CdpRegion::new(tab.clone(), "#label");
    let before = region.presentation().expect("read style");
    assert_eq!(before.position, "relative");

    let capturer = Capturer::new(&PipelineConfig::default(), Arc::new(CdpFonts::new(tab))).unwrap();
    let artifact = capturer.capture(&mut region).await.expect("capture");

    assert_eq!((artifact.width, artifact.height), (800, 480));
    assert_eq!(&artifact.png_data[0..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(region.presentation().unwrap(), before);
}

#[tokio::test]
#[ignore] // Requires Chrome to be installed
async fn missing_element_is_invalid() {
    let (_browser, tab) = match launch(PREVIEW, (800, 600)) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Skipping CDP capture; failed to start Chrome: {}", e);
            return;
        }
    };

    let mut region = CdpRegion::new(tab.clone(), "#nope");
    let capturer = Capturer::new(&PipelineConfig::default(), Arc::new(CdpFonts::new(tab))).unwrap();
    let err = capturer.capture(&mut region).await.unwrap_err();
    assert!(matches!(err, Error::InvalidRegionError(_)));
}
