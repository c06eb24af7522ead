//! Subordinate builds reporting into the top-level registry.

use std::path::Path;
use std::sync::Arc;

use spritemux::config::{SpriteOptions, UsageMode};
use spritemux::mapping::MappingTracker;
use spritemux::pipeline::SpritePipeline;
use spritemux::registry::delegation::BuildContext;

/// Usage discovered while a nested build processes its sub-graph must be
/// visible to partitioning at the top level: one registry per hierarchy.
#[tokio::test]
async fn subordinate_usage_partitions_at_top_level() {
    let options = SpriteOptions {
        filename_template: "sprite-[index].svg".to_string(),
        mode: UsageMode::MultiOutput,
        ..SpriteOptions::default()
    };
    let root = BuildContext::root(UsageMode::MultiOutput);
    let pipeline = SpritePipeline::new(Arc::clone(&root), options)
        .unwrap()
        .with_tracker(Arc::new(MappingTracker::new()));

    // The top-level build reports one icon...
    let top_registry = root.registry();
    top_registry.report(Path::new("/icons/x.svg"), Some("main"));
    top_registry.supply_symbol(Path::new("/icons/x.svg"), "<symbol id=\"x\"/>", None);

    // ...and a doubly-nested subordinate build reports into the same set
    let child = BuildContext::child(&root);
    let grandchild = BuildContext::child(&child);
    let nested_registry = grandchild.registry();
    nested_registry.report(Path::new("/icons/y.svg"), Some("main"));
    nested_registry.supply_symbol(Path::new("/icons/y.svg"), "<symbol id=\"y\"/>", None);

    let assets = pipeline.run_pass().await.unwrap();

    // Same owning output, so both icons share one sprite
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].icon_ids, vec!["x", "y"]);
}

/// Concurrent reports from several nesting levels never fragment the
/// relation or lose updates.
#[tokio::test]
async fn concurrent_nested_reports_share_one_registry() {
    let root = BuildContext::root(UsageMode::MultiOutput);
    let contexts = vec![
        Arc::clone(&root),
        BuildContext::child(&root),
        BuildContext::child(&BuildContext::child(&root)),
    ];

    let mut handles = Vec::new();
    for (level, context) in contexts.into_iter().enumerate() {
        handles.push(tokio::spawn(async move {
            let registry = context.registry();
            for icon in 0..20 {
                let path = format!("/icons/shared-{icon}.svg");
                registry.report(Path::new(&path), Some(&format!("entry-{level}")));
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let snapshot = root.registry().close();
    assert_eq!(snapshot.len(), 20);
    for record in snapshot.iter() {
        assert_eq!(record.outputs.len(), 3);
    }
}
