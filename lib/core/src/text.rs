use crate::stopwords::StopWords;
use unicode_normalization::UnicodeNormalization;

/// Tokenize text for vectorization.
/// Composes to NFC, lowercases and splits on any non-alphanumeric character,
/// so accented letters stay inside their word ("pó" is one token) whether the
/// input was precomposed or decomposed.
#[inline]
pub fn tokenize(text: &str) -> Vec<String> {
    text.nfc()
        .collect::<String>()
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokenize and drop stopwords
pub fn tokenize_filtered(text: &str, stopwords: &StopWords) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|token| !stopwords.contains(token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_punctuation_and_case() {
        assert_eq!(
            tokenize("Red-Lipstick, MATTE!  (24h)"),
            vec!["red", "lipstick", "matte", "24h"]
        );
    }

    #[test]
    fn test_tokenize_keeps_accents_and_single_chars() {
        assert_eq!(tokenize("Pó compacto n 2"), vec!["pó", "compacto", "n", "2"]);
    }

    #[test]
    fn test_tokenize_decomposed_accents() {
        assert_eq!(tokenize("La\u{301}bios"), vec!["lábios"]);
        assert_eq!(tokenize("la\u{301}bios"), tokenize("lábios"));
    }

    #[test]
    fn test_tokenize_filtered() {
        let stopwords = StopWords::new(["de", "para"]);
        assert_eq!(
            tokenize_filtered("Base de longa duração para pele", &stopwords),
            vec!["base", "longa", "duração", "pele"]
        );
    }

    #[test]
    fn test_tokenize_blank() {
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("").is_empty());
    }
}
