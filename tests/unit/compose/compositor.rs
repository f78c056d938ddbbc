use std::sync::Arc;

use super::*;
use crate::assets::decode::PreparedImage;
use crate::assets::loader::FixedAssets;
use crate::model::state::{CampaignContent, EventContent, PledgeContent, QuoteContent};

/// Half an em per character.
struct HalfEm;

impl TextMeasure for HalfEm {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f32 {
        text.chars().count() as f32 * font.size_px * 0.5
    }
}

fn square_image(edge: u32) -> AssetImage {
    AssetImage::Raster(PreparedImage {
        width: edge,
        height: edge,
        rgba8_premul: Arc::new(vec![255; (edge * edge * 4) as usize]),
    })
}

fn full_assets() -> LoadedAssets {
    let fixed = FixedAssets {
        logo: Some(AssetImage::Raster(PreparedImage {
            width: 20,
            height: 8,
            rgba8_premul: Arc::new(vec![255; 20 * 8 * 4]),
        })),
        icons: (0..SDG_ICON_COUNT).map(|_| Some(square_image(4))).collect(),
        un_badge: Some(square_image(4)),
    };
    LoadedAssets {
        fixed: Arc::new(fixed),
        photo: None,
    }
}

fn pledge(name: &str) -> PosterState {
    PosterState {
        name: name.to_string(),
        ..PosterState::default()
    }
}

fn plan(state: &PosterState, assets: &LoadedAssets, width: u32) -> FramePlan {
    let table = LayoutTable::standard();
    let full = table.canvas(state.size);
    let height = full.height * width / full.width;
    let canvas = Canvas::new(width, height).unwrap();
    compose(state, assets, &table, "plantforthegoals.org", &mut HalfEm, canvas)
}

#[test]
fn composing_twice_yields_identical_plans() {
    let state = pledge("Ada");
    let assets = full_assets();
    assert_eq!(plan(&state, &assets, 1080), plan(&state, &assets, 1080));
}

#[test]
fn layers_are_drawn_in_fixed_order() {
    let plan = plan(&pledge("Ada"), &full_assets(), 1080);
    let seq = plan.layer_sequence();
    let mut sorted = seq.clone();
    sorted.sort();
    assert_eq!(seq, sorted);
    assert_eq!(seq.first(), Some(&Layer::Clear));
}

#[test]
fn footer_paints_after_overflowing_content_and_cta() {
    let long = "word ".repeat(200);
    let state = PosterState {
        size: PosterSize::Square,
        content: TemplateContent::Event(EventContent {
            title: long.clone(),
            subtitle: Some(long),
            city: Some("Lagos".into()),
            date: Some("12 May".into()),
            cta: Some(CallToAction {
                text: "Join".into(),
                link: Some("example.org".into()),
            }),
        }),
        ..PosterState::default()
    };
    let plan = plan(&state, &full_assets(), 1080);
    let seq = plan.layer_sequence();
    let mut sorted = seq.clone();
    sorted.sort();
    assert_eq!(seq, sorted);
    assert_eq!(seq.last(), Some(&Layer::Footer));
    assert_eq!(plan.ops.last().map(|op| op.layer), Some(Layer::Footer));
}

#[test]
fn logo_badge_scales_with_surface_width() {
    let state = pledge("Ada");
    let assets = full_assets();
    let big = plan(&state, &assets, 1080).layer_bounds(Layer::LogoBadge).unwrap();
    let small = plan(&state, &assets, 540).layer_bounds(Layer::LogoBadge).unwrap();

    assert_eq!(big, Rect::new(72.0, 72.0, 304.0, 168.0));
    assert!((big.x0 - 2.0 * small.x0).abs() < 1e-9);
    assert!((big.y1 - 2.0 * small.y1).abs() < 1e-9);
    assert!((big.width() - 2.0 * small.width()).abs() < 1e-9);
}

#[test]
fn text_positions_scale_with_preview_width() {
    let state = pledge("Ada Lovelace");
    let assets = full_assets();
    let texts = |p: &FramePlan| -> Vec<(String, Point, f32)> {
        p.layer_ops(Layer::Title)
            .filter_map(|op| match op {
                DrawOp::Text {
                    text, origin, font, ..
                } => Some((text.clone(), *origin, font.size_px)),
                _ => None,
            })
            .collect()
    };
    let big = texts(&plan(&state, &assets, 1080));
    let small = texts(&plan(&state, &assets, 540));
    assert_eq!(big.len(), small.len());
    for (b, s) in big.iter().zip(&small) {
        assert_eq!(b.0, s.0);
        assert!((b.1.y - 2.0 * s.1.y).abs() < 1e-6);
        assert!((b.2 - 2.0 * s.2).abs() < 1e-4);
    }
}

#[test]
fn pledge_uses_default_title_and_name_chip() {
    let plan = plan(&pledge("Ada"), &full_assets(), 1080);
    let title: Vec<&str> = plan
        .layer_ops(Layer::Title)
        .filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(title.join(" "), PLEDGE_DEFAULT_TITLE);
    assert!(plan.layer_ops(Layer::NameChip).any(
        |op| matches!(op, DrawOp::Text { text, .. } if text == "Pledged by Ada")
    ));
}

#[test]
fn blank_name_omits_name_chip() {
    let plan = plan(&pledge("   "), &full_assets(), 1080);
    assert!(!plan.has_layer(Layer::NameChip));
    assert!(plan.has_layer(Layer::Title));
}

#[test]
fn icon_row_is_centered_with_fixed_cells() {
    let plan = plan(&pledge("Ada"), &full_assets(), 1080);
    let rects: Vec<Rect> = plan
        .layer_ops(Layer::IconRow)
        .filter_map(DrawOp::bounds)
        .collect();
    assert_eq!(rects.len(), SDG_ICON_COUNT);
    assert!((rects[0].x0 - 128.0).abs() < 1e-9);
    assert!((rects[6].x1 - (1080.0 - 128.0)).abs() < 1e-9);
    assert!((rects[1].x0 - rects[0].x0 - 120.0).abs() < 1e-9);
}

#[test]
fn missing_icons_leave_their_cells_empty() {
    let mut fixed = (*full_assets().fixed).clone();
    fixed.icons[2] = None;
    fixed.icons[5] = None;
    let assets = LoadedAssets {
        fixed: Arc::new(fixed),
        photo: None,
    };
    let plan = plan(&pledge("Ada"), &assets, 1080);
    let slots: Vec<FixedSlot> = plan
        .layer_ops(Layer::IconRow)
        .filter_map(|op| match op {
            DrawOp::Image { slot, .. } => Some(*slot),
            _ => None,
        })
        .collect();
    assert_eq!(
        slots,
        [0, 1, 3, 4, 6].map(FixedSlot::Icon).to_vec()
    );
}

#[test]
fn no_fixed_assets_still_yields_complete_frame() {
    let plan = plan(&pledge("Ada"), &LoadedAssets::photo_only(None), 1080);
    assert!(!plan.has_layer(Layer::IconRow));
    for layer in [
        Layer::Background,
        Layer::Overlay,
        Layer::Glow,
        Layer::LogoBadge,
        Layer::Title,
        Layer::NameChip,
        Layer::Attribution,
        Layer::Footer,
    ] {
        assert!(plan.has_layer(layer), "{layer:?} missing");
    }
    assert!(
        !plan
            .layer_ops(Layer::LogoBadge)
            .any(|op| matches!(op, DrawOp::Image { .. }))
    );
}

#[test]
fn photo_background_without_photo_falls_back_to_gradient() {
    let plan = plan(&pledge("Ada"), &full_assets(), 1080);
    assert!(plan.layer_ops(Layer::Background).all(|op| matches!(
        op,
        DrawOp::LinearGradient {
            axis: GradientAxis::Diagonal,
            ..
        }
    )));
}

#[test]
fn photo_background_is_cover_fit() {
    let mut assets = full_assets();
    assets.photo = Some(Arc::new(PreparedImage {
        width: 400,
        height: 300,
        rgba8_premul: Arc::new(vec![0; 400 * 300 * 4]),
    }));
    let mut state = pledge("Ada");
    state.size = PosterSize::Square;
    let plan = plan(&state, &assets, 1080);
    let Some(DrawOp::CoverPhoto { fit }) = plan.layer_ops(Layer::Background).next() else {
        panic!("expected a cover photo");
    };
    assert!((fit.scale - 3.6).abs() < 1e-9);
    assert!((fit.offset.x + 180.0).abs() < 1e-9);
}

#[test]
fn solid_background_for_quote() {
    let state = PosterState {
        content: TemplateContent::Quote(QuoteContent {
            quote: "Plant now".into(),
            attribution: Some("Grandma".into()),
            cta: None,
        }),
        ..PosterState::default()
    };
    let plan = plan(&state, &full_assets(), 1080);
    assert!(matches!(
        plan.layer_ops(Layer::Background).next(),
        Some(DrawOp::FillRect { .. })
    ));
    assert!(plan.layer_ops(Layer::Subtitle).any(
        |op| matches!(op, DrawOp::Text { text, .. } if text == "\u{2014} Grandma")
    ));
}

#[test]
fn cta_sits_between_content_and_footer() {
    let state = PosterState {
        content: TemplateContent::Campaign(CampaignContent {
            title: "Green streets".into(),
            description: Some("Join the drive this spring".into()),
            cta: Some(CallToAction {
                text: "Sign up".into(),
                link: Some("example.org/join".into()),
            }),
        }),
        ..PosterState::default()
    };
    let plan = plan(&state, &full_assets(), 1080);
    let cta = plan.layer_bounds(Layer::Cta).unwrap();
    let footer = plan.layer_bounds(Layer::Footer).unwrap();
    let body = plan.layer_bounds(Layer::Description).unwrap();
    assert!(body.y1 <= cta.y0);
    assert!(cta.y1 <= footer.y0);
}

#[test]
fn blank_cta_label_is_not_drawn() {
    let state = PosterState {
        content: TemplateContent::Event(EventContent {
            title: "Tree day".into(),
            cta: Some(CallToAction {
                text: "  ".into(),
                link: None,
            }),
            ..EventContent::default()
        }),
        ..PosterState::default()
    };
    assert!(!plan(&state, &full_assets(), 1080).has_layer(Layer::Cta));
}

#[test]
fn event_chips_precede_title() {
    let state = PosterState {
        content: TemplateContent::Event(EventContent {
            title: "Tree day".into(),
            city: Some("Lagos".into()),
            date: Some("12 May".into()),
            ..EventContent::default()
        }),
        ..PosterState::default()
    };
    let plan = plan(&state, &full_assets(), 1080);
    let chips = plan.layer_bounds(Layer::MetaChips).unwrap();
    let title = plan.layer_bounds(Layer::Title).unwrap();
    assert!(chips.y1 <= title.y0);
    assert_eq!(
        plan.layer_ops(Layer::MetaChips)
            .filter(|op| matches!(op, DrawOp::RoundedRect { .. }))
            .count(),
        2
    );
}

#[test]
fn story_allows_more_title_lines_than_portrait() {
    let long = "word ".repeat(80);
    let mut state = PosterState {
        content: TemplateContent::Pledge(PledgeContent {
            title: Some(long),
        }),
        ..pledge("Ada")
    };
    let lines = |s: &PosterState| plan(s, &full_assets(), 1080).layer_ops(Layer::Title).count();
    let portrait = lines(&state);
    state.size = PosterSize::Story;
    let story = lines(&state);
    assert_eq!(portrait, 3);
    assert_eq!(story, 4);
}

#[test]
fn content_never_rises_above_logo_badge() {
    let long = "word ".repeat(200);
    let state = PosterState {
        size: PosterSize::Square,
        content: TemplateContent::Campaign(CampaignContent {
            title: long.clone(),
            description: Some(long),
            cta: Some(CallToAction {
                text: "Go".into(),
                link: None,
            }),
        }),
        ..PosterState::default()
    };
    let plan = plan(&state, &full_assets(), 1080);
    let badge = plan.layer_bounds(Layer::LogoBadge).unwrap();
    let title = plan.layer_bounds(Layer::Title).unwrap();
    assert!(title.y0 >= badge.y1);
}
