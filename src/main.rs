use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{ArgGroup, Parser};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vocab_reel::{
    card::{Deck, VocabCard},
    composition::{Assets, ReelEngine},
    config::Config,
    error::{ReelError, RenderError},
    render::FontFace,
    themes::ThemeRegistry,
    tts::create_engine,
};

#[derive(Parser)]
#[command(
    name = "vocab-reel",
    version,
    about = "Turn vocabulary cards into short ask-then-reveal videos",
    long_about = "Vocab-Reel speaks a word over a still of it, then reveals its pronunciation, meaning and an example sentence with a narration, and encodes both phases into a vertical video."
)]
#[command(group(ArgGroup::new("source").args(["word", "card", "deck"])))]
struct Cli {
    /// Word to quiz
    #[arg(short, long)]
    word: Option<String>,

    /// Pronunciation shown under the word on the reveal
    #[arg(long)]
    ipa: Option<String>,

    /// Meaning or translation of the word
    #[arg(short, long)]
    meaning: Option<String>,

    /// Example sentence
    #[arg(short = 'e', long)]
    sentence: Option<String>,

    /// Translation of the example sentence
    #[arg(long)]
    translation: Option<String>,

    /// Single card file (TOML or JSON)
    #[arg(long)]
    card: Option<PathBuf>,

    /// Deck file (TOML or JSON) rendering one video per card
    #[arg(long)]
    deck: Option<PathBuf>,

    /// Background image behind both stills
    #[arg(short, long)]
    background: Option<PathBuf>,

    /// Font file (TTF/OTF/TTC); a system font is used when omitted
    #[arg(long)]
    font: Option<PathBuf>,

    /// Tick sound played under the prompt
    #[arg(long)]
    tick: Option<PathBuf>,

    /// Layout theme (classic, card, paper)
    #[arg(short, long)]
    theme: Option<String>,

    /// Speech backend (google, system, cloud)
    #[arg(long)]
    tts: Option<String>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output video file, or directory for a deck
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep the rendered stills in this directory
    #[arg(long)]
    stills_dir: Option<PathBuf>,

    /// List available themes and exit
    #[arg(long)]
    list_themes: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Card assembled from --word and the content flags
    fn inline_card(&self) -> Option<VocabCard> {
        let word = self.word.as_ref()?;
        Some(VocabCard {
            word: word.clone(),
            ipa: self.ipa.clone().unwrap_or_default(),
            meaning: self.meaning.clone().unwrap_or_default(),
            sentence: self.sentence.clone().unwrap_or_default(),
            translation: self.translation.clone().unwrap_or_default(),
        })
    }

    /// Flags take precedence over the config file
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(theme) = &self.theme {
            config.render.theme = theme.clone();
        }
        if let Some(backend) = &self.tts {
            config.tts.backend = backend.clone();
        }
        if let Some(font) = &self.font {
            config.render.font = Some(font.clone());
        }
    }
}

fn default_output(card: &VocabCard) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("{}_{}.mp4", card.slug(), stamp))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<ReelError>() {
            Some(reel) => error!("{}", reel.user_message()),
            None => error!("{:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let registry = ThemeRegistry::new();

    if cli.list_themes {
        for name in registry.available_themes() {
            if let Some(theme) = registry.get_theme(&name) {
                println!("{:<10} {}", name, theme.description());
            }
        }
        return Ok(());
    }

    info!("Starting Vocab-Reel v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    cli.apply_overrides(&mut config);
    config.validate()?;

    let theme = registry.get_theme(&config.render.theme).ok_or_else(|| {
        ReelError::from(RenderError::ThemeNotFound {
            name: config.render.theme.clone(),
            available: registry.available_themes().join(", "),
        })
    })?;
    info!("Using {} theme", theme.name());

    let tts = create_engine(&config.tts)?;
    let font = FontFace::load_or_discover(config.render.font.as_deref())?;

    let assets = Assets {
        background: cli.background.clone(),
        tick: cli.tick.clone(),
        font,
    };

    let mut engine = ReelEngine::new(config, theme, tts);
    if let Some(dir) = &cli.stills_dir {
        engine = engine.with_stills_dir(dir);
    }
    engine.preflight().await?;

    if let Some(deck_path) = &cli.deck {
        let deck = Deck::from_file(deck_path)?;
        let out_dir = cli.output.clone().unwrap_or_else(|| PathBuf::from("reels"));
        info!("Rendering {} cards into {:?}", deck.len(), out_dir);

        let report = engine.render_deck(&deck, &assets, &out_dir).await?;
        for reel in &report.rendered {
            println!("{} -> {}", reel.word, reel.output.display());
        }
        for (word, e) in &report.failed {
            error!("{}: {}", word, e.user_message());
        }
        if report.rendered.is_empty() {
            bail!("no cards in {:?} could be rendered", deck_path);
        }
        return Ok(());
    }

    let card = match (&cli.card, cli.inline_card()) {
        (Some(path), _) => VocabCard::from_file(path)?,
        (None, Some(card)) => card,
        (None, None) => bail!("pass --word, --card or --deck (see --help)"),
    };

    let output = cli.output.clone().unwrap_or_else(|| default_output(&card));
    let report = engine.render_card(&card, &assets, &output).await?;

    info!(
        "Reel complete! {:.1}s ({:.1}s prompt + {:.1}s reveal) saved to: {:?}",
        report.video.duration, report.plan.prompt, report.plan.reveal, report.output
    );
    println!("{}", report.output.display());
    Ok(())
}
