// Render the prompt and reveal stills of one card without speech or encoding

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vocab_reel::{
    card::VocabCard,
    config::BackgroundFit,
    render::{FontFace, Frame},
    themes::ThemeRegistry,
};

#[derive(Parser)]
#[command(name = "vocab-reel-preview", version, about = "Preview the stills of a vocabulary card")]
struct Cli {
    /// Word to preview
    #[arg(default_value = "serendipity")]
    word: String,

    #[arg(long, default_value = "/ˌserənˈdɪpəti/")]
    ipa: String,

    #[arg(short, long, default_value = "机缘巧合；意外发现珍奇事物的本领")]
    meaning: String,

    #[arg(short = 'e', long, default_value = "Meeting her there was pure serendipity.")]
    sentence: String,

    #[arg(long, default_value = "在那里遇见她纯属机缘巧合。")]
    translation: String,

    /// Card file (TOML or JSON), overrides the content flags
    #[arg(long)]
    card: Option<PathBuf>,

    /// Theme to preview; all themes when omitted
    #[arg(short, long)]
    theme: Option<String>,

    #[arg(short, long)]
    background: Option<PathBuf>,

    #[arg(long)]
    font: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "preview")]
    output: PathBuf,

    #[arg(long, default_value_t = 1080)]
    width: u32,

    #[arg(long, default_value_t = 1920)]
    height: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let card = match &cli.card {
        Some(path) => VocabCard::from_file(path)?,
        None => VocabCard::new(&cli.word)
            .with_ipa(&cli.ipa)
            .with_meaning(&cli.meaning)
            .with_sentence(&cli.sentence)
            .with_translation(&cli.translation),
    };
    card.validate()?;

    let font = FontFace::load_or_discover(cli.font.as_deref())?;
    println!("🔤 Font: {}", font.path().display());

    let registry = ThemeRegistry::new();
    let names = match &cli.theme {
        Some(name) => vec![name.clone()],
        None => registry.available_themes(),
    };

    std::fs::create_dir_all(&cli.output)?;

    for name in names {
        let theme = registry
            .get_theme(&name)
            .ok_or_else(|| anyhow::anyhow!("Unknown theme: {}", name))?;

        let base = match &cli.background {
            Some(path) if !theme.paints_background() => {
                Frame::from_background(path, (cli.width, cli.height), BackgroundFit::Cover)?
            }
            _ => theme.background(cli.width, cli.height),
        };

        let mut prompt = base.clone();
        theme.render_prompt(&mut prompt, &card, &font)?;
        let mut reveal = base;
        theme.render_reveal(&mut reveal, &card, &font)?;

        let prompt_path = cli.output.join(format!("{}_{}_prompt.png", name, card.slug()));
        let reveal_path = cli.output.join(format!("{}_{}_reveal.png", name, card.slug()));
        prompt.save_png(&prompt_path)?;
        reveal.save_png(&reveal_path)?;

        println!("🎨 {:<8} {} | {}", name, prompt_path.display(), reveal_path.display());
    }

    Ok(())
}
