//! Filename resolution, content hashing, and assembler determinism.

use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use spritemux::config::{SpriteOptions, UsageMode};
use spritemux::mapping::MappingTracker;
use spritemux::pipeline::SpritePipeline;
use spritemux::registry::delegation::BuildContext;

fn pipeline(template: &str) -> SpritePipeline {
    let options = SpriteOptions {
        filename_template: template.to_string(),
        mode: UsageMode::SingleOutput,
        ..SpriteOptions::default()
    };
    SpritePipeline::new(BuildContext::root(UsageMode::SingleOutput), options)
        .unwrap()
        .with_tracker(Arc::new(MappingTracker::new()))
}

/// Template `sprite-[index]-[chunkcode].svg` with one icon whose markup is
/// exactly `<S/>`: the chunkcode is the digest of that exact string.
#[tokio::test]
async fn chunkcode_is_digest_of_symbol_markup() {
    let pipeline = pipeline("sprite-[index]-[chunkcode].svg");
    let registry = pipeline.context().registry();
    let path = Path::new("/icons/x.svg");
    registry.report(path, None);
    registry.supply_symbol(path, "<S/>", None);

    let assets = pipeline.run_pass().await.unwrap();
    assert_eq!(assets.len(), 1);

    let mut expected = hex::encode(Sha256::digest("<S/>".as_bytes()));
    expected.truncate(32);
    assert_eq!(assets[0].filename, format!("sprite-0-{expected}.svg"));
    assert_eq!(assets[0].chunk_name, format!("sprite-0-{expected}"));
}

/// Unknown bracketed tokens pass through the template untouched.
#[tokio::test]
async fn unknown_template_tokens_are_left_verbatim() {
    let pipeline = pipeline("sprite-[index].[ext]");
    let registry = pipeline.context().registry();
    let path = Path::new("/icons/x.svg");
    registry.report(path, None);
    registry.supply_symbol(path, "<symbol id=\"x\"/>", None);

    let assets = pipeline.run_pass().await.unwrap();
    assert_eq!(assets[0].filename, "sprite-0.[ext]");
}

/// Identical membership and markup yield byte-identical output, pass after
/// pass, with no dependence on when or how often assembly runs.
#[tokio::test]
async fn assembly_is_deterministic_across_passes() {
    let pipeline = pipeline("sprite-[index]-[chunkcode].svg");
    let registry = pipeline.context().registry();

    let mut first = None;
    for _ in 0..3 {
        for (path, markup) in [
            ("/icons/menu.svg", "<symbol id=\"menu\"><path d=\"M0 0\"/></symbol>"),
            ("/icons/arrow.svg", "<symbol id=\"arrow\"><path d=\"M1 1\"/></symbol>"),
        ] {
            let path = Path::new(path);
            registry.report(path, None);
            registry.supply_symbol(path, markup, None);
        }

        let assets = pipeline.run_pass().await.unwrap();
        assert_eq!(assets.len(), 1);
        let shape = (assets[0].filename.clone(), assets[0].content.clone());
        match &first {
            None => first = Some(shape),
            Some(expected) => assert_eq!(&shape, expected),
        }
    }
}

/// The composite document is a single svg container with the symbol
/// definitions in scan order, referenced by id.
#[tokio::test]
async fn sprite_document_wraps_symbols_in_container() {
    let pipeline = pipeline("sprite-[index].svg");
    let registry = pipeline.context().registry();
    for (path, markup) in [
        ("/icons/arrow.svg", "<symbol id=\"arrow\"/>"),
        ("/icons/menu.svg", "<symbol id=\"menu\"/>"),
    ] {
        let path = Path::new(path);
        registry.report(path, None);
        registry.supply_symbol(path, markup, None);
    }

    let assets = pipeline.run_pass().await.unwrap();
    let content = &assets[0].content;
    assert!(content.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg""#));
    assert!(content.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
    // Scan order: arrow.svg sorts before menu.svg
    assert!(content.contains(r#"<symbol id="arrow"/><symbol id="menu"/>"#));
    assert!(content.ends_with("</svg>"));
}
