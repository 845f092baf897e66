use criterion::{criterion_group, criterion_main, Criterion};
use labelpress::fonts::NoFontSignal;
use labelpress::surface::PrintDocument;
use labelpress::{Capturer, LabelScene, PhysicalLabelSize, PipelineConfig, SceneRegion};
use std::sync::Arc;

fn demo_scene() -> LabelScene {
    LabelScene::from_json_file("demos/pharmacy_label.json").expect("demo scene")
}

fn bench_capture(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let capturer = Capturer::new(&PipelineConfig::default(), Arc::new(NoFontSignal)).expect("capturer");
    let mut region = SceneRegion::new(demo_scene());

    c.bench_function("capture_4x", |b| {
        b.iter(|| {
            let _ = rt.block_on(capturer.capture(&mut region)).unwrap();
        })
    });
}

fn bench_document(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let capturer = Capturer::new(&PipelineConfig::default(), Arc::new(NoFontSignal)).expect("capturer");
    let mut region = SceneRegion::new(demo_scene());
    let artifact = rt.block_on(capturer.capture(&mut region)).unwrap();
    let config = PipelineConfig::default();

    c.bench_function("print_document", |b| {
        b.iter(|| {
            let _ = PrintDocument::build(&artifact, PhysicalLabelSize::default(), &config);
        })
    });
}

criterion_group!(benches, bench_capture, bench_document);
criterion_main!(benches);
