use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeckItem {
    pub word: String,
    pub hint: Option<String>,
}

impl DeckItem {
    pub fn new(word: &str) -> Self {
        Self {
            word: word.trim().to_string(),
            hint: None,
        }
    }

    pub fn with_hint(word: &str, hint: &str) -> Self {
        let hint = hint.trim();
        Self {
            word: word.trim().to_string(),
            hint: (!hint.is_empty()).then(|| hint.to_string()),
        }
    }

    /// Identity of the card within a deck
    pub fn key(&self) -> String {
        normalize_word(&self.word)
    }
}

/// Lowercases and strips all whitespace, so "Ice Cream" and "icecream" collide.
pub fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("Ice Cream"), "icecream");
        assert_eq!(normalize_word("  ICE\tcream "), "icecream");
        assert_eq!(normalize_word(""), "");
    }

    #[test]
    fn test_blank_hint_is_dropped() {
        let item = DeckItem::with_hint(" Pizza ", "  ");
        assert_eq!(item.word, "Pizza");
        assert_eq!(item.hint, None);

        let item = DeckItem::with_hint("Pizza", "food");
        assert_eq!(item.hint.as_deref(), Some("food"));
        assert_eq!(item.key(), "pizza");
    }
}
