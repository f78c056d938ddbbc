use super::*;
use crate::compose::plan::{Layer, PlannedOp};
use crate::layout::table::LayoutScale;

fn plan(canvas: Canvas, ops: Vec<DrawOp>) -> FramePlan {
    FramePlan {
        canvas,
        scale: LayoutScale::for_canvas(canvas),
        ops: ops
            .into_iter()
            .map(|op| PlannedOp {
                layer: Layer::Background,
                op,
            })
            .collect(),
    }
}

fn render(plan: &FramePlan, assets: &LoadedAssets) -> FrameRGBA {
    CpuRasterizer::new()
        .render(plan, assets, &mut TextEngine::new())
        .unwrap()
}

#[test]
fn frame_matches_canvas_size() {
    let canvas = Canvas::new(40, 50).unwrap();
    let frame = render(&plan(canvas, vec![]), &LoadedAssets::photo_only(None));
    assert_eq!((frame.width, frame.height), (40, 50));
    assert_eq!(frame.data.len(), canvas.byte_len());
    assert!(frame.premultiplied);
}

#[test]
fn later_ops_paint_over_earlier_ones() {
    let canvas = Canvas::new(16, 16).unwrap();
    let p = plan(
        canvas,
        vec![
            DrawOp::Clear(Rgba8::rgb(0, 0, 0)),
            DrawOp::FillRect {
                rect: Rect::new(0.0, 0.0, 8.0, 16.0),
                color: Rgba8::rgb(255, 0, 0),
            },
        ],
    );
    let frame = render(&p, &LoadedAssets::photo_only(None));
    assert_eq!(frame.pixel(2, 8), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(12, 8), Some([0, 0, 0, 255]));
}

#[test]
fn text_without_fonts_is_skipped() {
    let canvas = Canvas::new(32, 32).unwrap();
    let p = plan(
        canvas,
        vec![
            DrawOp::Clear(Rgba8::rgb(0, 0, 0)),
            DrawOp::Text {
                text: "Hello".into(),
                origin: Point::new(0.0, 0.0),
                font: FontSpec::new(20.0, crate::text::font::FontWeight::Bold),
                color: Rgba8::WHITE,
                width: 30.0,
                height: 24.0,
            },
        ],
    );
    let frame = render(&p, &LoadedAssets::photo_only(None));
    assert!(frame.data.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
}

#[test]
fn cover_photo_fills_every_pixel() {
    let photo = Arc::new(PreparedImage {
        width: 8,
        height: 4,
        rgba8_premul: Arc::new([0u8, 0, 255, 255].repeat(32)),
    });
    let canvas = Canvas::new(12, 12).unwrap();
    let fit = crate::compose::cover::cover_fit(8, 4, canvas);
    let p = plan(canvas, vec![DrawOp::CoverPhoto { fit }]);
    let frame = render(&p, &LoadedAssets::photo_only(Some(photo)));
    assert!(frame.data.chunks_exact(4).all(|px| px[2] > 250 && px[3] == 255));
}

#[test]
fn rendering_is_deterministic() {
    let canvas = Canvas::new(64, 80).unwrap();
    let p = plan(
        canvas,
        vec![
            DrawOp::LinearGradient {
                rect: canvas.rect(),
                axis: GradientAxis::Diagonal,
                from: Rgba8::rgb(10, 40, 30),
                to: Rgba8::rgb(200, 220, 90),
            },
            DrawOp::RadialGlow {
                center: Point::new(50.0, 20.0),
                radius: 30.0,
                color: Rgba8::rgb(255, 255, 200),
                opacity: 0.5,
            },
            DrawOp::RoundedRect {
                rect: Rect::new(4.0, 4.0, 40.0, 20.0),
                radius: 8.0,
                color: Rgba8::rgba(255, 255, 255, 40),
            },
        ],
    );
    let assets = LoadedAssets::photo_only(None);
    let mut r = CpuRasterizer::new();
    let mut text = TextEngine::new();
    let a = r.render(&p, &assets, &mut text).unwrap();
    let b = r.render(&p, &assets, &mut text).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.fingerprint(), render(&p, &assets).fingerprint());
}

#[test]
fn cover_cache_drops_photo_once_unused() {
    let photo = Arc::new(PreparedImage {
        width: 4,
        height: 4,
        rgba8_premul: Arc::new([0u8, 255, 0, 255].repeat(16)),
    });
    let weak = Arc::downgrade(&photo);
    let canvas = Canvas::new(8, 8).unwrap();
    let fit = crate::compose::cover::cover_fit(4, 4, canvas);
    let mut r = CpuRasterizer::new();
    let mut text = TextEngine::new();

    let with_photo = LoadedAssets::photo_only(Some(photo));
    r.render(&plan(canvas, vec![DrawOp::CoverPhoto { fit }]), &with_photo, &mut text)
        .unwrap();
    drop(with_photo);
    assert!(weak.upgrade().is_some());

    let solid = plan(
        canvas,
        vec![DrawOp::FillRect {
            rect: canvas.rect(),
            color: Rgba8::WHITE,
        }],
    );
    r.render(&solid, &LoadedAssets::photo_only(None), &mut text)
        .unwrap();
    assert!(weak.upgrade().is_none());
}

#[test]
fn broken_decorative_image_is_skipped() {
    use crate::assets::decode::AssetImage;

    let mut fixed = FixedAssets::empty();
    fixed.logo = Some(AssetImage::Raster(PreparedImage {
        width: 4,
        height: 4,
        rgba8_premul: Arc::new(vec![255; 3]),
    }));
    let assets = LoadedAssets {
        fixed: Arc::new(fixed),
        photo: None,
    };
    let canvas = Canvas::new(16, 16).unwrap();
    let p = plan(
        canvas,
        vec![
            DrawOp::Clear(Rgba8::rgb(0, 0, 0)),
            DrawOp::Image {
                slot: FixedSlot::Logo,
                rect: Rect::new(2.0, 2.0, 10.0, 10.0),
            },
            DrawOp::FillRect {
                rect: Rect::new(12.0, 12.0, 16.0, 16.0),
                color: Rgba8::WHITE,
            },
        ],
    );
    let frame = render(&p, &assets);
    assert_eq!(frame.pixel(5, 5), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(14, 14), Some([255, 255, 255, 255]));
}

#[test]
fn glyph_runs_use_their_shaping_face() {
    let mut text = TextEngine::new();
    text.load_system_fallback();
    if !text.has_fonts() {
        return;
    }
    let content = "\u{201C}Plant\u{201D} \u{2014} now";
    let font = FontSpec::new(24.0, crate::text::font::FontWeight::Regular);
    let shaped = text.shape_line(content, &font, Rgba8::WHITE).unwrap();
    let mut faces: Vec<(u64, u32)> = Vec::new();
    for line in shaped.layout.lines() {
        for item in line.items() {
            if let parley::layout::PositionedLayoutItem::GlyphRun(run) = item {
                let face = run.run().font();
                faces.push((face.data.id(), face.index));
            }
        }
    }

    let canvas = Canvas::new(200, 40).unwrap();
    let p = plan(
        canvas,
        vec![DrawOp::Text {
            text: content.into(),
            origin: Point::new(0.0, 0.0),
            font,
            color: Rgba8::WHITE,
            width: 200.0,
            height: 40.0,
        }],
    );
    let mut r = CpuRasterizer::new();
    r.render(&p, &LoadedAssets::photo_only(None), &mut text)
        .unwrap();
    for face in faces {
        assert_eq!(r.font_cache.get(&face).map(|f| f.index), Some(face.1));
    }
}
