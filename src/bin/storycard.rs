use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use storycard::{
    BackgroundKind, CallToAction, CardConfig, LayoutTable, PosterSize, PosterState,
    PreviewController, TemplateContent, TemplateKind,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "storycard", version, about = "Render story cards and posters")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export a canonical-size PNG (requires a name and a photo).
    Render(RenderArgs),
    /// Write a preview-resolution PNG; no export gate.
    Preview(PreviewArgs),
    /// Print the canonical size table.
    Sizes,
}

#[derive(Args, Debug)]
struct CardArgs {
    /// Poster state JSON; the flags below override its fields.
    #[arg(long)]
    state: Option<PathBuf>,

    /// Engine config JSON (assets, fonts, footer URL).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Display name.
    #[arg(long)]
    name: Option<String>,

    /// User photo (PNG/JPEG/WebP).
    #[arg(long)]
    photo: Option<PathBuf>,

    /// square | portrait | story.
    #[arg(long)]
    size: Option<PosterSize>,

    /// pledge | event | campaign | impact | quote.
    #[arg(long)]
    template: Option<TemplateKind>,

    /// Headline (the quote text for the quote template).
    #[arg(long)]
    title: Option<String>,

    /// Event subtitle or quote attribution.
    #[arg(long)]
    subtitle: Option<String>,

    /// Campaign/impact body copy.
    #[arg(long)]
    description: Option<String>,

    /// Location chip.
    #[arg(long)]
    city: Option<String>,

    /// Date chip.
    #[arg(long)]
    date: Option<String>,

    /// Call-to-action label.
    #[arg(long)]
    cta_text: Option<String>,

    /// Link printed beside the call to action.
    #[arg(long)]
    cta_link: Option<String>,

    /// gradient | photo | solid.
    #[arg(long)]
    background: Option<BackgroundKind>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    card: CardArgs,

    /// Output directory (defaults to the config's export dir).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    card: CardArgs,

    /// Preview width in pixels (defaults to the config's preview width).
    #[arg(long)]
    width: Option<u32>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storycard=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Sizes => cmd_sizes(),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (config, mut controller) = build(&args.card)?;
    if let Some(reason) = controller.export_gate().message() {
        anyhow::bail!(reason);
    }
    let artifact = controller.export()?;
    let dir = args.out.unwrap_or_else(|| config.export_dir.clone());
    let path = artifact.write_to_dir(&dir)?;
    println!("{}", path.display());
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let (config, mut controller) = build(&args.card)?;
    let width = args.width.unwrap_or(config.preview_width);
    controller.attach_surface(width)?;
    controller.pump()?;
    let frame = controller
        .preview()
        .context("preview pass produced no frame")?;
    let bytes = storycard::encode_png(frame)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    println!("{}", args.out.display());
    Ok(())
}

fn cmd_sizes() -> anyhow::Result<()> {
    let table = LayoutTable::standard();
    for size in PosterSize::ALL {
        let c = table.canvas(size);
        println!("{:<9} {}x{}", size.as_str(), c.width, c.height);
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<CardConfig> {
    let config = match path {
        Some(p) => CardConfig::from_path(p)?,
        None => {
            let mut c = CardConfig::default();
            c.apply_env_overrides();
            c.validate()?;
            c
        }
    };
    Ok(config)
}

fn build(card: &CardArgs) -> anyhow::Result<(CardConfig, PreviewController)> {
    let config = load_config(card.config.as_deref())?;
    let mut state = match &card.state {
        Some(p) => PosterState::from_path(p)?,
        None => PosterState::default(),
    };
    let ignored = apply_args(&mut state, card);
    if !ignored.is_empty() {
        tracing::warn!(
            template = state.template().as_str(),
            flags = ?ignored,
            "flags not used by this template"
        );
    }

    let mut controller = PreviewController::from_config(&config)?;
    controller.set_state(state);
    if let Some(photo) = &card.photo {
        let bytes = std::fs::read(photo)
            .with_context(|| format!("read photo '{}'", photo.display()))?;
        controller.select_photo(&bytes)?;
    }
    Ok((config, controller))
}

/// Apply flag overrides; returns the flags the selected template has no field for.
fn apply_args(state: &mut PosterState, a: &CardArgs) -> Vec<&'static str> {
    if let Some(name) = &a.name {
        state.name = name.clone();
    }
    if let Some(size) = a.size {
        state.size = size;
    }
    if let Some(bg) = a.background {
        state.background = Some(bg);
    }
    if let Some(kind) = a.template
        && kind != state.template()
    {
        state.content = TemplateContent::empty(kind);
    }

    let cta = a.cta_text.as_ref().map(|text| CallToAction {
        text: text.clone(),
        link: a.cta_link.clone(),
    });
    let mut ignored: Vec<&'static str> = Vec::new();
    let mut unused = |flag: &'static str, present: bool| {
        if present {
            ignored.push(flag);
        }
    };
    unused("--cta-link", a.cta_link.is_some() && cta.is_none());

    match &mut state.content {
        TemplateContent::Pledge(c) => {
            set_opt(&mut c.title, &a.title);
            unused("--subtitle", a.subtitle.is_some());
            unused("--description", a.description.is_some());
            unused("--city", a.city.is_some());
            unused("--date", a.date.is_some());
            unused("--cta-text", cta.is_some());
        }
        TemplateContent::Event(c) => {
            set(&mut c.title, &a.title);
            set_opt(&mut c.subtitle, &a.subtitle);
            set_opt(&mut c.city, &a.city);
            set_opt(&mut c.date, &a.date);
            if cta.is_some() {
                c.cta = cta;
            }
            unused("--description", a.description.is_some());
        }
        TemplateContent::Campaign(c) => {
            set(&mut c.title, &a.title);
            set_opt(&mut c.description, &a.description);
            if cta.is_some() {
                c.cta = cta;
            }
            unused("--subtitle", a.subtitle.is_some());
            unused("--city", a.city.is_some());
            unused("--date", a.date.is_some());
        }
        TemplateContent::Impact(c) => {
            set(&mut c.title, &a.title);
            set_opt(&mut c.description, &a.description);
            set_opt(&mut c.city, &a.city);
            set_opt(&mut c.date, &a.date);
            unused("--subtitle", a.subtitle.is_some());
            unused("--cta-text", cta.is_some());
        }
        TemplateContent::Quote(c) => {
            set(&mut c.quote, &a.title);
            set_opt(&mut c.attribution, &a.subtitle);
            if cta.is_some() {
                c.cta = cta;
            }
            unused("--description", a.description.is_some());
            unused("--city", a.city.is_some());
            unused("--date", a.date.is_some());
        }
    }

    ignored
}

fn set(field: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        field.clone_from(v);
    }
}

fn set_opt(field: &mut Option<String>, value: &Option<String>) {
    if value.is_some() {
        field.clone_from(value);
    }
}
