use super::*;

#[test]
fn default_state_is_portrait_pledge_over_photo() {
    let s = PosterState::default();
    assert_eq!(s.size, PosterSize::Portrait);
    assert_eq!(s.template(), TemplateKind::Pledge);
    assert_eq!(s.background(), BackgroundKind::Photo);
}

#[test]
fn json_is_tagged_by_template() {
    let json = r#"{
        "size": "story",
        "name": "Asha",
        "template": "event",
        "title": "Tree planting drive",
        "city": "Pune",
        "cta": { "text": "Join us" }
    }"#;
    let s: PosterState = serde_json::from_str(json).unwrap();
    assert_eq!(s.size, PosterSize::Story);
    assert_eq!(s.template(), TemplateKind::Event);
    assert_eq!(s.content.title(), Some("Tree planting drive"));
    assert_eq!(s.content.cta().map(|c| c.text.as_str()), Some("Join us"));
    assert_eq!(s.background(), BackgroundKind::Gradient);

    let TemplateContent::Event(ev) = &s.content else {
        panic!("expected event content");
    };
    assert_eq!(ev.city.as_deref(), Some("Pune"));
    assert!(ev.date.is_none());
}

#[test]
fn unrelated_fields_are_ignored_and_required_fields_enforced() {
    let json = r#"{ "template": "quote", "quote": "q", "city": "Pune", "unknown": 1 }"#;
    let s: PosterState = serde_json::from_str(json).unwrap();
    assert_eq!(s.template(), TemplateKind::Quote);

    let missing_required = r#"{ "template": "campaign" }"#;
    assert!(serde_json::from_str::<PosterState>(missing_required).is_err());
}

#[test]
fn blank_titles_read_as_absent() {
    let c = TemplateContent::Impact(ImpactContent {
        title: "   ".to_string(),
        ..ImpactContent::default()
    });
    assert_eq!(c.title(), None);
    assert_eq!(TemplateContent::empty(TemplateKind::Pledge).title(), None);
}

#[test]
fn explicit_background_overrides_template_default() {
    let s = PosterState {
        background: Some(BackgroundKind::Solid),
        ..PosterState::default()
    };
    assert_eq!(s.background(), BackgroundKind::Solid);
    assert_eq!("PHOTO".parse::<BackgroundKind>().unwrap(), BackgroundKind::Photo);
    assert!("video".parse::<BackgroundKind>().is_err());
}

#[test]
fn empty_content_matches_kind() {
    for k in TemplateKind::ALL {
        assert_eq!(TemplateContent::empty(k).kind(), k);
    }
}
