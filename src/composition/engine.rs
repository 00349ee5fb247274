use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{
    audio::{AudioData, AudioLoader, Mixer},
    card::{Deck, VocabCard},
    composition::timeline::PhasePlan,
    config::Config,
    error::{ReelError, Result, VideoError},
    render::{FontFace, Frame},
    themes::Theme,
    tts::{synthesize_with_retry, TextToSpeech},
    video::{EncodedVideo, Still, VideoCompositor},
};

/// Files shared by every reel
#[derive(Debug, Clone)]
pub struct Assets {
    /// Background image; black or theme-drawn when absent
    pub background: Option<PathBuf>,

    /// Sound effect under the prompt phase
    pub tick: Option<PathBuf>,

    pub font: FontFace,
}

impl Assets {
    pub fn new(font: FontFace) -> Self {
        Self {
            background: None,
            tick: None,
            font,
        }
    }
}

/// Outcome of rendering one card
#[derive(Debug, Clone)]
pub struct ReelReport {
    pub word: String,
    pub output: PathBuf,
    pub plan: PhasePlan,
    pub video: EncodedVideo,
}

/// Outcome of rendering a deck
#[derive(Debug, Default)]
pub struct DeckReport {
    pub rendered: Vec<ReelReport>,
    pub failed: Vec<(String, ReelError)>,
}

/// Rendered prompt and reveal stills on disk
#[derive(Debug, Clone)]
pub struct StillPair {
    pub prompt: PathBuf,
    pub reveal: PathBuf,
}

/// Main engine that turns a vocabulary card into a reel
///
/// The engine follows a clear pipeline:
/// 1. Speech - Synthesize the word and the narration
/// 2. Timing - Measure both clips and size the two phases
/// 3. Stills - Draw the prompt and reveal with the theme
/// 4. Soundtrack - Mix speech and tick into one padded track
/// 5. Encode - Hand stills and soundtrack to FFmpeg
pub struct ReelEngine {
    config: Config,
    theme: Box<dyn Theme>,
    tts: Box<dyn TextToSpeech>,
    stills_dir: Option<PathBuf>,
}

impl ReelEngine {
    pub fn new(config: Config, theme: Box<dyn Theme>, tts: Box<dyn TextToSpeech>) -> Self {
        Self {
            config,
            theme,
            tts,
            stills_dir: None,
        }
    }

    /// Keep the rendered stills in `dir` instead of a temp directory
    pub fn with_stills_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.stills_dir = Some(dir.into());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fail fast when the encoder is missing, before any speech is requested
    pub async fn preflight(&self) -> Result<()> {
        if !VideoCompositor::check_ffmpeg_available().await {
            return Err(VideoError::FfmpegMissing.into());
        }
        Ok(())
    }

    /// Render one card to `output`
    pub async fn render_card<P: AsRef<Path>>(
        &self,
        card: &VocabCard,
        assets: &Assets,
        output: P,
    ) -> Result<ReelReport> {
        let output = output.as_ref();
        card.validate()?;

        info!("🎬 Rendering '{}' with {} theme via {}", card.word, self.theme.name(), self.tts.name());

        let work_dir = tempfile::Builder::new().prefix("vocab_reel_").tempdir()?;

        // Pipeline Step 1: Speech
        let (word_audio, narration) = self.synthesize_speech(card, work_dir.path()).await?;

        // Pipeline Step 2: Timing
        let plan = PhasePlan::new(word_audio.duration, narration.duration, &self.config.timing);
        info!(
            "⏱️  Phases: prompt {:.2}s, reveal {:.2}s (word {:.2}s, narration {:.2}s)",
            plan.prompt, plan.reveal, word_audio.duration, narration.duration
        );

        // Pipeline Step 3: Stills
        let stills_dir = self.stills_dir.clone().unwrap_or_else(|| work_dir.path().to_path_buf());
        let stills = self.render_stills(card, assets, &stills_dir, &Self::still_stem(output, card))?;

        // Pipeline Step 4: Soundtrack
        let soundtrack = self
            .mix_soundtrack(&word_audio, &narration, assets.tick.as_deref(), &plan)
            .await?;
        let soundtrack_path = work_dir.path().join("soundtrack.wav");
        soundtrack.write_wav(&soundtrack_path)?;

        // Pipeline Step 5: Encode
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut compositor =
            VideoCompositor::new(self.config.video.params.clone(), self.config.video.threads);
        let video = compositor
            .compose_video(
                &[
                    Still::new(&stills.prompt, plan.prompt),
                    Still::new(&stills.reveal, plan.reveal),
                ],
                soundtrack_path.as_path(),
                output,
            )
            .await?;
        compositor.cleanup()?;

        info!("🎉 Reel complete: {:?}", output);

        Ok(ReelReport {
            word: card.word.clone(),
            output: output.to_path_buf(),
            plan,
            video,
        })
    }

    /// Render every card of a deck into `out_dir`, carrying on past failures
    pub async fn render_deck<P: AsRef<Path>>(
        &self,
        deck: &Deck,
        assets: &Assets,
        out_dir: P,
    ) -> Result<DeckReport> {
        let out_dir = out_dir.as_ref();
        std::fs::create_dir_all(out_dir)?;

        let mut report = DeckReport::default();

        for (index, card) in deck.iter().enumerate() {
            let output = out_dir.join(Self::deck_file_name(index, card));
            info!("📚 Card {}/{}: {}", index + 1, deck.len(), card.word);

            match self.render_card(card, assets, &output).await {
                Ok(reel) => report.rendered.push(reel),
                Err(e) => {
                    warn!("Card '{}' failed: {}", card.word, e);
                    report.failed.push((card.word.clone(), e));
                }
            }
        }

        info!(
            "Deck finished: {} rendered, {} failed",
            report.rendered.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// `{index:03}_{slug}.mp4`, numbered from 1
    pub fn deck_file_name(index: usize, card: &VocabCard) -> String {
        format!("{:03}_{}.mp4", index + 1, card.slug())
    }

    /// Stills are named after the output file so deck entries never share a name
    pub fn still_stem(output: &Path, card: &VocabCard) -> String {
        output
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| card.slug())
    }

    // ==========================================
    // PIPELINE STEP 1: SPEECH
    // ==========================================

    async fn synthesize_speech(&self, card: &VocabCard, dir: &Path) -> Result<(AudioData, AudioData)> {
        info!("🗣️  Step 1: Synthesizing speech...");
        let tts = &self.config.tts;

        let word_file = dir.join("word");
        let narration_file = dir.join("narration");
        let word_text = card.word.trim().to_string();
        let narration_text = card.narration_text();

        let (word_path, narration_path) = tokio::try_join!(
            synthesize_with_retry(
                self.tts.as_ref(),
                &word_text,
                &tts.prompt_voice,
                &word_file,
                tts.retries
            ),
            synthesize_with_retry(
                self.tts.as_ref(),
                &narration_text,
                &tts.narration_voice,
                &narration_file,
                tts.retries
            ),
        )?;

        let word_audio = AudioLoader::load(&word_path).await?;
        let narration = AudioLoader::load(&narration_path).await?;
        Ok((word_audio, narration))
    }

    // ==========================================
    // PIPELINE STEP 3: STILLS
    // ==========================================

    /// Base frame for both stills
    fn base_frame(&self, assets: &Assets) -> Result<Frame> {
        let (w, h) = self.config.video.params.resolution;

        match &assets.background {
            Some(path) if !self.theme.paints_background() => {
                Frame::from_background(path, (w, h), self.config.render.background_fit)
            }
            Some(path) => {
                debug!("{} theme draws its own backdrop, ignoring {:?}", self.theme.name(), path);
                Ok(self.theme.background(w, h))
            }
            None => Ok(self.theme.background(w, h)),
        }
    }

    /// Draw both stills in parallel and save them into `dir` as `{stem}_prompt.png` and
    /// `{stem}_reveal.png`
    pub fn render_stills(
        &self,
        card: &VocabCard,
        assets: &Assets,
        dir: &Path,
        stem: &str,
    ) -> Result<StillPair> {
        info!("🎨 Drawing stills with {} theme...", self.theme.name());
        card.validate()?;
        std::fs::create_dir_all(dir)?;

        let base = self.base_frame(assets)?;
        let theme = self.theme.as_ref();
        let font = &assets.font;

        let (prompt, reveal) = rayon::join(
            || -> Result<Frame> {
                let mut frame = base.clone();
                theme.render_prompt(&mut frame, card, font)?;
                Ok(frame)
            },
            || -> Result<Frame> {
                let mut frame = base.clone();
                theme.render_reveal(&mut frame, card, font)?;
                Ok(frame)
            },
        );

        let pair = StillPair {
            prompt: dir.join(format!("{}_prompt.png", stem)),
            reveal: dir.join(format!("{}_reveal.png", stem)),
        };
        prompt?.save_png(&pair.prompt)?;
        reveal?.save_png(&pair.reveal)?;

        debug!("Stills saved: {:?}, {:?}", pair.prompt, pair.reveal);
        Ok(pair)
    }

    // ==========================================
    // PIPELINE STEP 4: SOUNDTRACK
    // ==========================================

    async fn mix_soundtrack(
        &self,
        word_audio: &AudioData,
        narration: &AudioData,
        tick_path: Option<&Path>,
        plan: &PhasePlan,
    ) -> Result<AudioData> {
        info!("🎵 Mixing soundtrack...");
        let audio = &self.config.audio;

        let mut prompt = Mixer::new(audio.sample_rate, audio.channels, plan.prompt);
        prompt.place(word_audio, 0.0)?;

        if let (Some(path), Some(tick)) = (tick_path, plan.tick(&self.config.timing)) {
            match AudioLoader::load(path).await {
                Ok(sfx) => {
                    let sfx = sfx.slice(0.0, tick.length).gain(tick.volume);
                    prompt.place(&sfx, tick.start)?;
                    debug!("Tick placed at {:.2}s for {:.2}s", tick.start, tick.length);
                }
                Err(e) => warn!("Skipping tick sound {:?}: {}", path, e),
            }
        }

        let mut reveal = Mixer::new(audio.sample_rate, audio.channels, plan.reveal);
        reveal.place(narration, 0.0)?;

        AudioData::concat(&[prompt.finish(), reveal.finish()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TtsError;
    use crate::themes::ClassicTheme;
    use async_trait::async_trait;
    use tempfile::tempdir;

    /// Writes a fixed-length tone per call instead of speaking
    struct ToneTts {
        seconds: f64,
    }

    #[async_trait]
    impl TextToSpeech for ToneTts {
        fn name(&self) -> &str {
            "tone"
        }

        async fn save(&self, _text: &str, _voice: &str, path: &Path) -> Result<PathBuf> {
            let out = path.with_extension("wav");
            AudioData::from_samples(vec![0.5; (self.seconds * 16000.0) as usize], 16000, 1)
                .write_wav(&out)?;
            Ok(out)
        }
    }

    struct BrokenTts;

    #[async_trait]
    impl TextToSpeech for BrokenTts {
        fn name(&self) -> &str {
            "broken"
        }

        async fn save(&self, _text: &str, _voice: &str, _path: &Path) -> Result<PathBuf> {
            Err(TtsError::RequestRejected { status: 403, body: "denied".to_string() }.into())
        }
    }

    fn engine(tts: Box<dyn TextToSpeech>) -> ReelEngine {
        let mut config = Config::default();
        config.audio.sample_rate = 8000;
        config.video.params.resolution = (108, 192);
        ReelEngine::new(config, Box::new(ClassicTheme::new()), tts)
    }

    fn card() -> VocabCard {
        VocabCard::new("apple").with_meaning("苹果").with_sentence("I ate an apple.")
    }

    #[tokio::test]
    async fn test_speech_is_measured() {
        let dir = tempdir().unwrap();
        let engine = engine(Box::new(ToneTts { seconds: 1.25 }));

        let (word, narration) = engine.synthesize_speech(&card(), dir.path()).await.unwrap();
        assert!((word.duration - 1.25).abs() < 1e-6);
        assert!((narration.duration - 1.25).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_soundtrack_matches_plan() {
        let engine = engine(Box::new(ToneTts { seconds: 1.0 }));
        let word = AudioData::from_samples(vec![0.5; 16000], 16000, 1);
        let narration = AudioData::from_samples(vec![0.5; 32000], 16000, 1);
        let plan = PhasePlan::new(word.duration, narration.duration, &engine.config.timing);

        let track = engine.mix_soundtrack(&word, &narration, None, &plan).await.unwrap();

        assert_eq!(track.sample_rate, 8000);
        assert!((track.duration - plan.total()).abs() < 1e-3);
        // Word at the start, silence before the reveal, narration after it
        assert!(track.samples[100] > 0.4);
        assert_eq!(track.samples[(3.4 * 8000.0) as usize], 0.0);
        assert!(track.samples[(3.6 * 8000.0) as usize] > 0.4);
    }

    #[tokio::test]
    async fn test_unreadable_tick_is_skipped() {
        let dir = tempdir().unwrap();
        let bogus = dir.path().join("tick.mp3");
        std::fs::write(&bogus, b"nope").unwrap();

        let engine = engine(Box::new(ToneTts { seconds: 1.0 }));
        let word = AudioData::from_samples(vec![0.1; 8000], 8000, 1);
        let plan = PhasePlan::new(1.0, 1.0, &engine.config.timing);

        let track = engine.mix_soundtrack(&word, &word, Some(&bogus), &plan).await.unwrap();
        assert!((track.duration - plan.total()).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_tick_is_mixed_quietly() {
        let dir = tempdir().unwrap();
        let tick_path = dir.path().join("tick.wav");
        AudioData::from_samples(vec![1.0; 8000 * 5], 8000, 1).write_wav(&tick_path).unwrap();

        let engine = engine(Box::new(ToneTts { seconds: 1.0 }));
        let silent = AudioData::silence(8000, 1, 0.2);
        let plan = PhasePlan::new(0.2, 0.2, &engine.config.timing);

        let track = engine.mix_soundtrack(&silent, &silent, Some(&tick_path), &plan).await.unwrap();

        assert_eq!(track.samples[(0.25 * 8000.0) as usize], 0.0);
        let during = track.samples[(1.0 * 8000.0) as usize];
        assert!((during - 0.3).abs() < 0.01);
        // Tick never bleeds into the reveal
        assert_eq!(track.samples[(3.6 * 8000.0) as usize], 0.0);
    }

    #[tokio::test]
    async fn test_tts_failure_aborts_without_output() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.mp4");
        let engine = engine(Box::new(BrokenTts));

        let Ok(font) = FontFace::discover() else { return };
        let result = engine.render_card(&card(), &Assets::new(font), &output).await;

        assert!(matches!(result, Err(ReelError::Tts(_))));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_blank_card_rejected_before_speech() {
        let dir = tempdir().unwrap();
        let engine = engine(Box::new(BrokenTts));

        let Ok(font) = FontFace::discover() else { return };
        let result = engine
            .render_card(&VocabCard::new(" "), &Assets::new(font), dir.path().join("x.mp4"))
            .await;

        assert!(matches!(result, Err(ReelError::Card(_))));
    }

    #[test]
    fn test_render_stills_writes_pngs() {
        let Ok(font) = FontFace::discover() else { return };
        let dir = tempdir().unwrap();
        let engine = engine(Box::new(BrokenTts));

        let pair = engine.render_stills(&card(), &Assets::new(font), dir.path(), "apple").unwrap();
        assert_eq!(pair.prompt, dir.path().join("apple_prompt.png"));

        let prompt = image::open(&pair.prompt).unwrap();
        let reveal = image::open(&pair.reveal).unwrap();
        assert_eq!((prompt.width(), prompt.height()), (108, 192));
        assert_ne!(prompt.to_rgb8().as_raw(), reveal.to_rgb8().as_raw());
    }

    #[test]
    fn test_deck_file_name() {
        assert_eq!(ReelEngine::deck_file_name(0, &VocabCard::new("Ice cream")), "001_ice_cream.mp4");
        assert_eq!(ReelEngine::deck_file_name(41, &VocabCard::new("猫")), "042_card.mp4");
    }

    #[test]
    fn test_deck_cards_get_their_own_stills() {
        let first = VocabCard::new("猫").with_meaning("cat");
        let second = VocabCard::new("狗").with_meaning("dog");
        assert_eq!(first.slug(), second.slug());

        let first_stem = ReelEngine::still_stem(Path::new(&ReelEngine::deck_file_name(0, &first)), &first);
        let second_stem =
            ReelEngine::still_stem(Path::new(&ReelEngine::deck_file_name(1, &second)), &second);
        assert_eq!(first_stem, "001_card");
        assert_eq!(second_stem, "002_card");

        let Ok(font) = FontFace::discover() else { return };
        let dir = tempdir().unwrap();
        let engine = engine(Box::new(BrokenTts));
        let assets = Assets::new(font);

        let a = engine.render_stills(&first, &assets, dir.path(), &first_stem).unwrap();
        let b = engine.render_stills(&second, &assets, dir.path(), &second_stem).unwrap();

        assert_ne!(a.prompt, b.prompt);
        assert_ne!(a.reveal, b.reveal);
        let a_reveal = image::open(&a.reveal).unwrap();
        let b_reveal = image::open(&b.reveal).unwrap();
        assert_ne!(a_reveal.to_rgb8().as_raw(), b_reveal.to_rgb8().as_raw());
    }

    #[test]
    fn test_still_stem_falls_back_to_slug() {
        let card = VocabCard::new("Ice cream");
        assert_eq!(ReelEngine::still_stem(Path::new("reels/ice.mp4"), &card), "ice");
        assert_eq!(ReelEngine::still_stem(Path::new(""), &card), "ice_cream");
    }

    #[tokio::test]
    async fn test_deck_reports_every_failed_card_in_order() {
        let Ok(font) = FontFace::discover() else { return };
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("reels").join("week1");
        let engine = engine(Box::new(BrokenTts));
        let deck = Deck {
            cards: vec![VocabCard::new("a"), VocabCard::new(" "), VocabCard::new("b")],
        };

        let report = engine.render_deck(&deck, &Assets::new(font), &out_dir).await.unwrap();

        assert!(report.rendered.is_empty());
        assert!(out_dir.is_dir());
        let words: Vec<&str> = report.failed.iter().map(|(word, _)| word.as_str()).collect();
        assert_eq!(words, vec!["a", " ", "b"]);
        assert!(matches!(report.failed[0].1, ReelError::Tts(_)));
        assert!(matches!(
            report.failed[1].1,
            ReelError::Card(crate::error::CardError::EmptyWord)
        ));
        assert!(matches!(report.failed[2].1, ReelError::Tts(_)));
        assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_preflight_matches_ffmpeg_lookup() {
        let engine = engine(Box::new(BrokenTts));
        let result = engine.preflight().await;

        if VideoCompositor::check_ffmpeg_available().await {
            assert!(result.is_ok());
        } else {
            assert!(matches!(result, Err(ReelError::Video(VideoError::FfmpegMissing))));
        }
    }
}
