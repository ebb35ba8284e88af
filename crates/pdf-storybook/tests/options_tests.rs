use pdf_storybook::*;

#[test]
fn test_defaults() {
    let options = BookOptions::default();
    assert_eq!(options.font_size, 20);
    assert_eq!(options.min_font_size, 5);
    assert_eq!(options.margin_in, 1.0);
    assert_eq!(options.page_width_in, 8.625);
    assert_eq!(options.page_height_in, 8.75);
    assert!(!options.title_verso);
    assert!(options.validate().is_ok());
}

#[test]
fn test_geometry_in_points() {
    let geometry = BookOptions::default().geometry();
    assert!((geometry.width - 621.0).abs() < 1e-3);
    assert!((geometry.height - 630.0).abs() < 1e-3);
    assert!((geometry.margin - 72.0).abs() < 1e-3);
    assert!((geometry.usable_width() - 477.0).abs() < 1e-3);
    assert!((geometry.usable_height() - 486.0).abs() < 1e-3);
}

#[test]
fn test_validation_margin_too_large() {
    let options = BookOptions {
        margin_in: 4.5,
        ..Default::default()
    };
    match options.validate() {
        Err(ComposeError::Config(msg)) => assert!(msg.contains("usable area")),
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_validation_font_sizes() {
    let options = BookOptions {
        font_size: 8,
        min_font_size: 10,
        ..Default::default()
    };
    assert!(options.validate().is_err());

    let options = BookOptions {
        min_font_size: 0,
        ..Default::default()
    };
    assert!(options.validate().is_err());
}

#[test]
fn test_validation_threshold_range() {
    let options = BookOptions {
        luminance_threshold: 1.5,
        ..Default::default()
    };
    assert!(options.validate().is_err());
}

#[tokio::test]
async fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.json");

    let options = BookOptions {
        font_size: 24,
        title_verso: true,
        output_name: "fox.pdf".to_string(),
        ..Default::default()
    };
    options.save(&path).await.unwrap();

    let loaded = BookOptions::load(&path).await.unwrap();
    assert_eq!(loaded, options);
}

#[tokio::test]
async fn test_partial_config_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.json");
    std::fs::write(&path, r#"{"margin_in": 0.5}"#).unwrap();

    let loaded = BookOptions::load(&path).await.unwrap();
    assert_eq!(loaded.margin_in, 0.5);
    assert_eq!(loaded.font_size, 20);
}

#[tokio::test]
async fn test_bad_config_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ nope").unwrap();

    let result = BookOptions::load(&path).await;
    assert!(matches!(result, Err(ComposeError::Config(_))));
}
