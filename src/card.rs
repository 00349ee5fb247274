//! Vocabulary card input.
//!
//! A [`VocabCard`] carries the five text fields shown and spoken in a reel. Cards come from
//! command-line flags, a single-card file, or a [`Deck`] file holding many cards.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CardError, Result};

/// One vocabulary entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabCard {
    /// The word being learned
    pub word: String,

    /// Pronunciation in IPA
    pub ipa: String,

    /// Meaning in the learner's language
    pub meaning: String,

    /// Example sentence using the word
    pub sentence: String,

    /// Translation of the example sentence
    pub translation: String,
}

impl VocabCard {
    pub fn new<S: Into<String>>(word: S) -> Self {
        Self {
            word: word.into(),
            ..Self::default()
        }
    }

    pub fn with_ipa<S: Into<String>>(mut self, ipa: S) -> Self {
        self.ipa = ipa.into();
        self
    }

    pub fn with_meaning<S: Into<String>>(mut self, meaning: S) -> Self {
        self.meaning = meaning.into();
        self
    }

    pub fn with_sentence<S: Into<String>>(mut self, sentence: S) -> Self {
        self.sentence = sentence.into();
        self
    }

    pub fn with_translation<S: Into<String>>(mut self, translation: S) -> Self {
        self.translation = translation.into();
        self
    }

    /// Only the word is mandatory
    pub fn validate(&self) -> Result<()> {
        if self.word.trim().is_empty() {
            return Err(CardError::EmptyWord.into());
        }
        Ok(())
    }

    /// Text read aloud during the reveal phase
    pub fn narration_text(&self) -> String {
        join_present(&[self.word.as_str(), self.meaning.as_str(), self.sentence.as_str()], "... ")
    }

    /// Word with its IPA underneath
    pub fn reveal_heading(&self) -> String {
        join_present(&[self.word.as_str(), self.ipa.as_str()], "\n")
    }

    /// Example sentence with its translation underneath
    pub fn example_block(&self) -> String {
        join_present(&[self.sentence.as_str(), self.translation.as_str()], "\n")
    }

    /// Filesystem-safe stem derived from the word
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.word.len());
        let mut pending_sep = false;

        for ch in self.word.trim().chars() {
            if ch.is_ascii_alphanumeric() {
                if pending_sep && !slug.is_empty() {
                    slug.push('_');
                }
                pending_sep = false;
                slug.push(ch.to_ascii_lowercase());
            } else {
                pending_sep = true;
            }
        }

        if slug.is_empty() {
            "card".to_string()
        } else {
            slug
        }
    }

    /// Load a single card from a TOML or JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let card: VocabCard = parse_file(path)?;
        card.validate()?;
        Ok(card)
    }
}

fn join_present(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// A batch of cards rendered one video each
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default)]
    pub cards: Vec<VocabCard>,
}

impl Deck {
    /// Load a deck from TOML (`[[cards]]` tables) or JSON (`{"cards": [...]}`)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let deck: Deck = parse_file(path)?;

        if deck.cards.is_empty() {
            return Err(CardError::EmptyDeck {
                path: path.display().to_string(),
            }
            .into());
        }

        Ok(deck)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VocabCard> {
        self.cards.iter()
    }
}

fn parse_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    let parse_failed = |reason: String| CardError::ParseFailed {
        path: path.display().to_string(),
        reason,
    };

    match extension.as_str() {
        "toml" => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| parse_failed(e.to_string()).into())
        }
        "json" => {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| parse_failed(e.to_string()).into())
        }
        _ => Err(CardError::UnsupportedFormat { format: extension }.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReelError;
    use tempfile::tempdir;

    fn sample() -> VocabCard {
        VocabCard::new("serendipity")
            .with_ipa("/ˌser.ənˈdɪp.ə.ti/")
            .with_meaning("意外发现珍宝的运气")
            .with_sentence("Finding this café was pure serendipity.")
            .with_translation("发现这家咖啡馆纯属机缘巧合。")
    }

    #[test]
    fn test_narration_text_joins_fields() {
        assert_eq!(
            sample().narration_text(),
            "serendipity... 意外发现珍宝的运气... Finding this café was pure serendipity."
        );
    }

    #[test]
    fn test_narration_skips_empty_fields() {
        let card = VocabCard::new("cat").with_sentence("The cat sat.");
        assert_eq!(card.narration_text(), "cat... The cat sat.");
    }

    #[test]
    fn test_reveal_heading_without_ipa() {
        assert_eq!(VocabCard::new("cat").reveal_heading(), "cat");
        assert_eq!(sample().reveal_heading(), "serendipity\n/ˌser.ənˈdɪp.ə.ti/");
    }

    #[test]
    fn test_validate_rejects_blank_word() {
        let result = VocabCard::new("   ").validate();
        assert!(matches!(result, Err(ReelError::Card(CardError::EmptyWord))));
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_slug() {
        assert_eq!(VocabCard::new("Ice Cream!").slug(), "ice_cream");
        assert_eq!(VocabCard::new("  well-being ").slug(), "well_being");
        assert_eq!(VocabCard::new("猫").slug(), "card");
    }

    #[test]
    fn test_deck_from_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deck.toml");
        std::fs::write(
            &path,
            r#"
[[cards]]
word = "apple"
meaning = "苹果"

[[cards]]
word = "pear"
"#,
        )
        .unwrap();

        let deck = Deck::from_file(&path).unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.cards[0].meaning, "苹果");
        assert_eq!(deck.cards[1].ipa, "");
    }

    #[test]
    fn test_card_from_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("card.json");
        std::fs::write(&path, r#"{"word": "run", "ipa": "/rʌn/"}"#).unwrap();

        let card = VocabCard::from_file(&path).unwrap();
        assert_eq!(card.word, "run");
        assert_eq!(card.ipa, "/rʌn/");
    }

    #[test]
    fn test_empty_deck_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deck.json");
        std::fs::write(&path, r#"{"cards": []}"#).unwrap();

        assert!(matches!(
            Deck::from_file(&path),
            Err(ReelError::Card(CardError::EmptyDeck { .. }))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deck.csv");
        std::fs::write(&path, "word\napple\n").unwrap();

        if let Err(ReelError::Card(CardError::UnsupportedFormat { format })) = Deck::from_file(&path) {
            assert_eq!(format, "csv");
        } else {
            panic!("Expected UnsupportedFormat error");
        }
    }
}
