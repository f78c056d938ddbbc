use std::io::Cursor;

use super::*;
use crate::assets::source::MemoryAssetSource;

fn png(px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn full_source(manifest: &AssetManifest) -> MemoryAssetSource {
    let mut src = MemoryAssetSource::new();
    src.insert(&manifest.logo, png([255, 255, 255, 255])).unwrap();
    for p in &manifest.sdg_icons {
        src.insert(p, png([0, 120, 0, 255])).unwrap();
    }
    if let Some(p) = &manifest.un_badge {
        src.insert(p, png([0, 0, 255, 255])).unwrap();
    }
    src
}

#[test]
fn default_manifest_has_seven_icons() {
    assert_eq!(AssetManifest::default().sdg_icons.len(), SDG_ICON_COUNT);
}

#[test]
fn loads_every_fixed_asset() {
    let manifest = AssetManifest::default();
    let loader = AssetLoader::new(Arc::new(full_source(&manifest)), manifest);
    let fixed = loader.load_fixed();
    assert!(fixed.logo.is_some());
    assert!(fixed.un_badge.is_some());
    assert_eq!(fixed.icons_present(), SDG_ICON_COUNT);
}

#[test]
fn failed_assets_degrade_to_absent_slots() {
    let manifest = AssetManifest::default();
    let mut src = full_source(&manifest);
    src.insert(&manifest.sdg_icons[3], b"broken".to_vec()).unwrap();

    let mut missing_logo = manifest.clone();
    missing_logo.logo = "nowhere/logo.png".to_string();

    let loader = AssetLoader::new(Arc::new(src), missing_logo);
    let fixed = loader.load_fixed();
    assert!(fixed.logo.is_none());
    assert_eq!(fixed.icons.len(), SDG_ICON_COUNT);
    assert_eq!(fixed.icons_present(), SDG_ICON_COUNT - 1);
    assert!(fixed.get(FixedSlot::Icon(3)).is_none());
    assert!(fixed.get(FixedSlot::Icon(4)).is_some());
    assert!(fixed.get(FixedSlot::Icon(99)).is_none());
}

#[test]
fn load_caches_fixed_assets_and_attaches_photo() {
    let manifest = AssetManifest::default();
    let loader = AssetLoader::new(Arc::new(full_source(&manifest)), manifest);

    let photo = PhotoAsset::decode(&png([9, 9, 9, 255])).unwrap();
    let a = loader.load(Some(&photo));
    let b = loader.load(None);
    assert!(Arc::ptr_eq(&a.fixed, &b.fixed));
    assert!(a.photo.is_some());
    assert!(b.photo.is_none());
}
