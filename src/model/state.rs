use std::path::Path;
use std::str::FromStr;

use anyhow::Context;

use crate::foundation::error::{CardError, CardResult};
use crate::layout::table::{PosterSize, TemplateKind};

/// How the card background is painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    /// Two-stop template gradient.
    Gradient,
    /// Cover-fit user photo (gradient when no photo is present).
    Photo,
    /// Flat first gradient stop.
    Solid,
}

impl FromStr for BackgroundKind {
    type Err = CardError;

    fn from_str(s: &str) -> CardResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gradient" => Ok(Self::Gradient),
            "photo" => Ok(Self::Photo),
            "solid" => Ok(Self::Solid),
            other => Err(CardError::validation(format!(
                "unknown background '{other}' (expected gradient|photo|solid)"
            ))),
        }
    }
}

/// Short call-to-action label with an optional link shown beside it.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CallToAction {
    /// Pill label.
    pub text: String,
    /// Link text drawn next to the pill.
    #[serde(default)]
    pub link: Option<String>,
}

/// Story/pledge card fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PledgeContent {
    /// Headline; a stock pledge line when unset.
    #[serde(default)]
    pub title: Option<String>,
}

/// Event card fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EventContent {
    /// Headline.
    pub title: String,
    /// Secondary line.
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Location chip.
    #[serde(default)]
    pub city: Option<String>,
    /// Date chip.
    #[serde(default)]
    pub date: Option<String>,
    /// Call to action.
    #[serde(default)]
    pub cta: Option<CallToAction>,
}

/// Campaign card fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CampaignContent {
    /// Headline.
    pub title: String,
    /// Body copy.
    #[serde(default)]
    pub description: Option<String>,
    /// Call to action.
    #[serde(default)]
    pub cta: Option<CallToAction>,
}

/// Impact card fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImpactContent {
    /// Headline.
    pub title: String,
    /// Body copy.
    #[serde(default)]
    pub description: Option<String>,
    /// Location chip.
    #[serde(default)]
    pub city: Option<String>,
    /// Date chip.
    #[serde(default)]
    pub date: Option<String>,
}

/// Quote card fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuoteContent {
    /// Quoted text.
    pub quote: String,
    /// Attribution line.
    #[serde(default)]
    pub attribution: Option<String>,
    /// Call to action.
    #[serde(default)]
    pub cta: Option<CallToAction>,
}

/// Template-specific fields; the variant selects the template.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "template", rename_all = "lowercase")]
pub enum TemplateContent {
    /// Story/pledge card.
    Pledge(PledgeContent),
    /// Event card.
    Event(EventContent),
    /// Campaign card.
    Campaign(CampaignContent),
    /// Impact card.
    Impact(ImpactContent),
    /// Quote card.
    Quote(QuoteContent),
}

impl Default for TemplateContent {
    fn default() -> Self {
        Self::Pledge(PledgeContent::default())
    }
}

impl TemplateContent {
    /// Empty content for `kind`.
    pub fn empty(kind: TemplateKind) -> Self {
        match kind {
            TemplateKind::Pledge => Self::Pledge(PledgeContent::default()),
            TemplateKind::Event => Self::Event(EventContent::default()),
            TemplateKind::Campaign => Self::Campaign(CampaignContent::default()),
            TemplateKind::Impact => Self::Impact(ImpactContent::default()),
            TemplateKind::Quote => Self::Quote(QuoteContent::default()),
        }
    }

    /// Template selected by this content.
    pub fn kind(&self) -> TemplateKind {
        match self {
            Self::Pledge(_) => TemplateKind::Pledge,
            Self::Event(_) => TemplateKind::Event,
            Self::Campaign(_) => TemplateKind::Campaign,
            Self::Impact(_) => TemplateKind::Impact,
            Self::Quote(_) => TemplateKind::Quote,
        }
    }

    /// Textual headline, if the template has a non-blank one.
    pub fn title(&self) -> Option<&str> {
        let t = match self {
            Self::Pledge(c) => c.title.as_deref(),
            Self::Event(c) => Some(c.title.as_str()),
            Self::Campaign(c) => Some(c.title.as_str()),
            Self::Impact(c) => Some(c.title.as_str()),
            Self::Quote(c) => Some(c.quote.as_str()),
        };
        t.map(str::trim).filter(|t| !t.is_empty())
    }

    /// Call to action, for templates that carry one.
    pub fn cta(&self) -> Option<&CallToAction> {
        match self {
            Self::Event(c) => c.cta.as_ref(),
            Self::Campaign(c) => c.cta.as_ref(),
            Self::Quote(c) => c.cta.as_ref(),
            Self::Pledge(_) | Self::Impact(_) => None,
        }
    }

    /// Background the template is designed around.
    pub fn default_background(&self) -> BackgroundKind {
        match self.kind() {
            TemplateKind::Pledge | TemplateKind::Impact => BackgroundKind::Photo,
            TemplateKind::Event | TemplateKind::Campaign => BackgroundKind::Gradient,
            TemplateKind::Quote => BackgroundKind::Solid,
        }
    }
}

/// Single source of truth for one card.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PosterState {
    /// Canonical output size.
    #[serde(default)]
    pub size: PosterSize,
    /// Display name; required for export.
    #[serde(default)]
    pub name: String,
    /// Background override; the template default when unset.
    #[serde(default)]
    pub background: Option<BackgroundKind>,
    /// Template and its fields.
    #[serde(flatten)]
    pub content: TemplateContent,
}

impl Default for PosterState {
    fn default() -> Self {
        Self {
            size: PosterSize::default(),
            name: String::new(),
            background: None,
            content: TemplateContent::default(),
        }
    }
}

impl PosterState {
    /// Active template.
    pub fn template(&self) -> TemplateKind {
        self.content.kind()
    }

    /// Effective background.
    pub fn background(&self) -> BackgroundKind {
        self.background
            .unwrap_or_else(|| self.content.default_background())
    }

    /// Load a state from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read poster state '{}'", path.display()))?;
        serde_json::from_slice(&bytes).map_err(|e| CardError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/state.rs"]
mod tests;
