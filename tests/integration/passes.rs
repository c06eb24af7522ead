//! Multi-pass behavior: cumulative mapping, callbacks, and the
//! process-wide tracker.

use std::path::Path;
use std::sync::{Arc, Mutex};

use serial_test::serial;
use spritemux::config::{SpriteOptions, UsageMode};
use spritemux::mapping::{MappingTracker, OutputMapping};
use spritemux::pipeline::SpritePipeline;
use spritemux::registry::delegation::BuildContext;

fn options(template: &str) -> SpriteOptions {
    SpriteOptions {
        filename_template: template.to_string(),
        mode: UsageMode::SingleOutput,
        ..SpriteOptions::default()
    }
}

fn report_icon(pipeline: &SpritePipeline, path: &str, markup: &str) {
    let registry = pipeline.context().registry();
    let path = Path::new(path);
    registry.report(path, None);
    registry.supply_symbol(path, markup, None);
}

/// A later pass re-mapping icon x keeps icon y from the earlier pass.
#[tokio::test]
async fn mapping_accumulates_across_passes() {
    crate::init_logging();
    let pipeline = SpritePipeline::new(
        BuildContext::root(UsageMode::SingleOutput),
        options("pass-[chunkcode].svg"),
    )
    .unwrap()
    .with_tracker(Arc::new(MappingTracker::new()));

    // Pass 1 maps y
    report_icon(&pipeline, "/icons/y.svg", "<symbol id=\"y\"/>");
    pipeline.run_pass().await.unwrap();
    let f1 = pipeline.current_mapping().get("y").unwrap().to_string();

    // Pass 2 only reports x
    report_icon(&pipeline, "/icons/x.svg", "<symbol id=\"x\"/>");
    pipeline.run_pass().await.unwrap();

    let mapping = pipeline.current_mapping();
    let f2 = mapping.get("x").unwrap();
    assert_ne!(f1, f2);
    assert_eq!(mapping.get("y"), Some(f1.as_str()));
    assert_eq!(mapping.len(), 2);
}

/// The callback fires once per successful non-empty pass with the
/// cumulative mapping, never for empty or failed passes.
#[tokio::test]
async fn mapping_callback_sees_cumulative_state() {
    let seen: Arc<Mutex<Vec<OutputMapping>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let pipeline = SpritePipeline::new(
        BuildContext::root(UsageMode::SingleOutput),
        options("sprite-[index].svg"),
    )
    .unwrap()
    .with_tracker(Arc::new(MappingTracker::new()))
    .on_mapping(move |mapping| sink.lock().unwrap().push(mapping.clone()));

    // Empty pass: no callback
    pipeline.run_pass().await.unwrap();
    assert!(seen.lock().unwrap().is_empty());

    report_icon(&pipeline, "/icons/x.svg", "<symbol id=\"x\"/>");
    pipeline.run_pass().await.unwrap();

    // Failed pass: no callback
    pipeline.context().registry().report(Path::new("/icons/broken.svg"), None);
    assert!(pipeline.run_pass().await.is_err());

    report_icon(&pipeline, "/icons/y.svg", "<symbol id=\"y\"/>");
    pipeline.run_pass().await.unwrap();

    let calls = seen.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].len(), 1);
    // Second call carries both passes' icons
    assert_eq!(calls[1].len(), 2);
    assert!(calls[1].get("x").is_some());
    assert!(calls[1].get("y").is_some());
}

/// Pipelines without a scoped tracker share the process-wide table, as
/// watch rebuilds spanning pipeline instances require.
#[tokio::test]
#[serial]
async fn global_tracker_outlives_pipelines() {
    {
        let pipeline = SpritePipeline::new(
            BuildContext::root(UsageMode::SingleOutput),
            options("run-one-[index].svg"),
        )
        .unwrap();
        report_icon(&pipeline, "/icons/global-probe.svg", "<symbol id=\"global-probe\"/>");
        pipeline.run_pass().await.unwrap();
    }

    // A fresh pipeline over a fresh context still sees the entry
    let pipeline = SpritePipeline::new(
        BuildContext::root(UsageMode::SingleOutput),
        options("run-two-[index].svg"),
    )
    .unwrap();
    assert_eq!(
        pipeline.current_mapping().get("global-probe"),
        Some("run-one-0.svg")
    );
}
