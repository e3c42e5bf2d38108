use icon_bundler::{BundleEngine, CliConfig, IconPipeline, LocalStorage};
use std::fs;
use tempfile::TempDir;

fn grouped_config(source: &str, output: &str, types: &[&str]) -> CliConfig {
    CliConfig {
        source_path: source.to_string(),
        output_path: output.to_string(),
        sources_suffix: "icon".to_string(),
        types: types.iter().map(|t| t.to_string()).collect(),
        target: "icons.{type}.{group}.css".to_string(),
        split_by_groups: Some(
            r#"{"extra": ".extra-icon", "fallback": ".fallback-icon", "main": null}"#.to_string(),
        ),
        selector_prefix: None,
        fallback_prefix: None,
        svg_to_base64: false,
        max_data_uri_size: None,
        verbose: false,
        monitor: false,
    }
}

fn write_grouped_sources(dir: &TempDir) {
    fs::write(dir.path().join("plain.icon.png"), [1u8]).unwrap();
    fs::write(dir.path().join("promo.extra-icon.icon.png"), [2u8]).unwrap();
    fs::write(dir.path().join("old.fallback-icon.icon.png"), [3u8]).unwrap();
}

#[tokio::test]
async fn test_files_are_routed_by_marker() {
    let source_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    write_grouped_sources(&source_dir);

    let config = grouped_config(
        source_dir.path().to_str().unwrap(),
        output_dir.path().to_str().unwrap(),
        &["b"],
    );

    let source = LocalStorage::new(config.source_path.clone());
    let output = LocalStorage::new(config.output_path.clone());
    let pipeline = IconPipeline::new(source, output, &config).unwrap();

    let targets = BundleEngine::new(pipeline).run().await.unwrap();
    assert_eq!(
        targets,
        vec![
            "icons.b.extra.css",
            "icons.b.fallback.css",
            "icons.b.main.css",
        ]
    );

    let extra = fs::read_to_string(output_dir.path().join("icons.b.extra.css")).unwrap();
    assert!(extra.contains("promo.extra-icon.icon.png"));
    assert!(!extra.contains("plain"));
    assert!(!extra.contains("old.fallback-icon"));

    let fallback = fs::read_to_string(output_dir.path().join("icons.b.fallback.css")).unwrap();
    assert!(fallback.contains("old.fallback-icon.icon.png"));
    assert!(!fallback.contains("promo"));

    // The markerless group only collects unmarked files.
    let main = fs::read_to_string(output_dir.path().join("icons.b.main.css")).unwrap();
    assert!(main.contains("plain.icon.png"));
    assert!(!main.contains("promo"));
    assert!(!main.contains("old.fallback-icon"));
}

#[tokio::test]
async fn test_grouping_applies_to_every_type() {
    let source_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();
    fs::write(source_dir.path().join("plain.icon.svg"), "<svg>plain</svg>").unwrap();
    fs::write(source_dir.path().join("plain.icon.png"), [1u8]).unwrap();
    fs::write(
        source_dir.path().join("promo.extra-icon.icon.svg"),
        "<svg>promo</svg>",
    )
    .unwrap();
    fs::write(source_dir.path().join("promo.extra-icon.icon.png"), [2u8]).unwrap();

    let config = grouped_config(
        source_dir.path().to_str().unwrap(),
        output_dir.path().to_str().unwrap(),
        &["combo"],
    );

    let source = LocalStorage::new(config.source_path.clone());
    let output = LocalStorage::new(config.output_path.clone());
    let pipeline = IconPipeline::new(source, output, &config).unwrap();

    BundleEngine::new(pipeline).run().await.unwrap();

    let extra = fs::read_to_string(output_dir.path().join("icons.combo.extra.css")).unwrap();
    assert!(extra.contains("charset=utf8"));
    assert!(extra.contains(".i-ua_svg_no .promo.extra-icon {"));
    assert!(!extra.contains("plain"));

    let main = fs::read_to_string(output_dir.path().join("icons.combo.main.css")).unwrap();
    assert!(main.contains(".plain {"));
    assert!(main.contains(".i-ua_svg_no .plain {"));
    assert!(!main.contains("promo"));

    // Groups without members still produce their (empty) target.
    let fallback =
        fs::read_to_string(output_dir.path().join("icons.combo.fallback.css")).unwrap();
    assert_eq!(fallback, "");
}

#[tokio::test]
async fn test_grouped_config_requires_placeholder() {
    let source_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    let mut config = grouped_config(
        source_dir.path().to_str().unwrap(),
        output_dir.path().to_str().unwrap(),
        &["b"],
    );
    config.target = "icons.{type}.css".to_string();

    let source = LocalStorage::new(config.source_path.clone());
    let output = LocalStorage::new(config.output_path.clone());
    let err = IconPipeline::new(source, output, &config).err().unwrap();
    assert!(err.to_string().contains("{group} placeholder"));
}
