use std::io::Cursor;
use std::sync::Arc;

use super::*;

fn prepared(w: u32, h: u32) -> PreparedImage {
    PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(vec![255; (w * h * 4) as usize]),
    }
}

#[test]
fn replace_releases_previous_photo() {
    let mut slot = PhotoSlot::new();
    slot.replace(PhotoAsset::from_image(prepared(2, 2)).unwrap());
    let first = Arc::downgrade(&slot.get().unwrap().image);

    slot.replace(PhotoAsset::from_image(prepared(3, 3)).unwrap());
    assert!(first.upgrade().is_none());
    assert_eq!(slot.get().unwrap().dimensions(), (3, 3));
}

#[test]
fn clear_releases_and_empties() {
    let mut slot = PhotoSlot::new();
    slot.replace(PhotoAsset::from_image(prepared(2, 2)).unwrap());
    let weak = Arc::downgrade(&slot.get().unwrap().image);
    slot.clear();
    assert!(!slot.is_set());
    assert!(weak.upgrade().is_none());
}

#[test]
fn undecodable_photo_is_an_asset_error() {
    let err = PhotoAsset::decode(b"not an image").unwrap_err();
    assert!(matches!(err, CardError::Asset(_)));
}

#[test]
fn decode_png_photo() {
    let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([1, 2, 3, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    let photo = PhotoAsset::decode(&buf).unwrap();
    assert_eq!(photo.dimensions(), (4, 3));
}

#[test]
fn oversized_photo_is_rejected() {
    let huge = PreparedImage {
        width: Canvas::MAX_EDGE + 1,
        height: 1,
        rgba8_premul: Arc::new(Vec::new()),
    };
    assert!(matches!(
        PhotoAsset::from_image(huge),
        Err(CardError::Validation(_))
    ));
}
