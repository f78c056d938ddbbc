use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("storycard-config-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn default_config_is_valid() {
    let cfg = CardConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.site_url, DEFAULT_SITE_URL);
    assert_eq!(cfg.preview_width, 540);
    assert_eq!(cfg.manifest(), AssetManifest::default());
}

#[test]
fn wrong_icon_count_is_rejected() {
    let cfg = CardConfig {
        sdg_icons: vec!["a.png".into(); 6],
        ..CardConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(CardError::Validation(_))));
}

#[test]
fn preview_width_bounds() {
    for bad in [0, MAX_PREVIEW_WIDTH + 1] {
        let cfg = CardConfig {
            preview_width: bad,
            ..CardConfig::default()
        };
        assert!(cfg.validate().is_err(), "{bad} accepted");
    }
}

#[test]
fn escaping_paths_are_rejected() {
    let cfg = CardConfig {
        logo: "../secret.png".into(),
        ..CardConfig::default()
    };
    assert!(cfg.validate().is_err());
    let cfg = CardConfig {
        font_bold: Some("/etc/fonts/x.ttf".into()),
        ..CardConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn partial_json_fills_defaults_and_resolves_root() {
    let dir = scratch("partial");
    let path = dir.join("card.json");
    std::fs::write(
        &path,
        r#"{ "assets_root": "static", "site_url": "example.org", "preview_width": 360 }"#,
    )
    .unwrap();
    let cfg = CardConfig::from_path(&path).unwrap();
    assert_eq!(cfg.site_url, "example.org");
    assert_eq!(cfg.preview_width, 360);
    assert_eq!(cfg.sdg_icons.len(), SDG_ICON_COUNT);
    if std::env::var_os(ASSETS_DIR_ENV).is_none() {
        assert_eq!(cfg.assets_root, dir.join("static"));
    }
}

#[test]
fn unknown_keys_are_serde_errors() {
    let dir = scratch("unknown");
    let path = dir.join("card.json");
    std::fs::write(&path, r#"{ "colour": "red" }"#).unwrap();
    assert!(matches!(
        CardConfig::from_path(&path),
        Err(CardError::Serde(_))
    ));
}
