//! Deterministic keyword extraction
//!
//! A lightweight tokenization pipeline over the *original* (untranslated)
//! ticket text: lowercase, strip punctuation, split on whitespace, drop short
//! tokens and stopwords, count unigram and adjacent-pair frequencies, rank.
//! Pure and idempotent - identical text always yields the identical ranked
//! list.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Default stopword list: source-language function words plus a handful of
/// English fillers that show up in mixed-language tickets.
static DEFAULT_STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Indonesian function words
        "ada", "adalah", "agar", "akan", "aku", "anda", "apa", "atau", "bagi", "bahwa", "bisa",
        "dan", "dari", "dengan", "di", "dia", "hanya", "harus", "ini", "itu", "jadi", "jika",
        "juga", "kalau", "kami", "kamu", "karena", "ke", "kita", "lagi", "lah", "mau", "mereka",
        "nya", "oleh", "pada", "para", "per", "pun", "saat", "saja", "sama", "sangat", "saya",
        "sebagai", "sedang", "sejak", "semua", "seperti", "sudah", "supaya", "tapi", "telah",
        "tentang", "terhadap", "tidak", "untuk", "yang",
        // English fillers
        "a", "an", "and", "are", "at", "be", "for", "from", "has", "have", "in", "is",
        "it", "of", "on", "or", "that", "the", "this", "to", "was", "with",
    ]
    .into_iter()
    .collect()
});

/// Knobs for the extraction pipeline. Immutable configuration, loaded once
/// and passed by value into the persistence sink.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Tokens shorter than this never appear in the output.
    pub min_token_len: usize,
    /// How many single tokens to keep, by frequency.
    pub top_unigrams: usize,
    /// How many adjacent pairs to keep, by frequency.
    pub top_bigrams: usize,
    /// Stopword set. Defaults to the static table.
    pub stopwords: HashSet<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_token_len: 3,
            top_unigrams: 10,
            top_bigrams: 5,
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExtractionConfig {
    fn is_eligible(&self, token: &str) -> bool {
        token.chars().count() >= self.min_token_len && !self.stopwords.contains(token)
    }
}

/// A ranked keyword with its surface-form frequency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedKeyword {
    pub keyword: String,
    pub frequency: i64,
}

/// Lowercase, strip punctuation to spaces, split on whitespace.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}

/// Count occurrences keyed by surface form, remembering first-occurrence
/// order for deterministic tie-breaking.
fn count_with_order(items: impl Iterator<Item = String>) -> Vec<(String, i64, usize)> {
    let mut counts: HashMap<String, (i64, usize)> = HashMap::new();
    for (idx, item) in items.enumerate() {
        let entry = counts.entry(item).or_insert((0, idx));
        entry.0 += 1;
    }
    let mut ranked: Vec<(String, i64, usize)> = counts
        .into_iter()
        .map(|(item, (count, first))| (item, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
}

/// Extract the top-N unigrams and top-M bigrams from `text`.
///
/// Bigrams are adjacent pairs in the original token sequence whose
/// constituents individually survive the length and stopword filters, so a
/// reported bigram's surface form occurs in the text exactly as often as its
/// frequency says. A bigram is suppressed when both of its constituents were
/// already selected as unigrams.
pub fn extract_keywords(text: &str, config: &ExtractionConfig) -> Vec<ExtractedKeyword> {
    let tokens = tokenize(text);

    let unigrams = count_with_order(
        tokens
            .iter()
            .filter(|t| config.is_eligible(t))
            .map(|t| t.to_string()),
    );

    let bigrams = count_with_order(
        tokens
            .windows(2)
            .filter(|pair| config.is_eligible(&pair[0]) && config.is_eligible(&pair[1]))
            .map(|pair| format!("{} {}", pair[0], pair[1])),
    );

    let selected_unigrams: Vec<&(String, i64, usize)> =
        unigrams.iter().take(config.top_unigrams).collect();
    let unigram_set: HashSet<&str> = selected_unigrams
        .iter()
        .map(|(token, _, _)| token.as_str())
        .collect();

    let mut keywords: Vec<ExtractedKeyword> = selected_unigrams
        .iter()
        .map(|(token, count, _)| ExtractedKeyword {
            keyword: token.clone(),
            frequency: *count,
        })
        .collect();

    keywords.extend(
        bigrams
            .iter()
            .filter(|(bigram, _, _)| {
                let mut parts = bigram.splitn(2, ' ');
                let left = parts.next().unwrap_or_default();
                let right = parts.next().unwrap_or_default();
                !(unigram_set.contains(left) && unigram_set.contains(right))
            })
            .take(config.top_bigrams)
            .map(|(bigram, count, _)| ExtractedKeyword {
                keyword: bigram.clone(),
                frequency: *count,
            }),
    );

    keywords
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExtractionConfig {
        ExtractionConfig::default()
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let text = "Internet mati total dari pagi, internet lambat sekali, rugi saya";
        let first = extract_keywords(text, &config());
        let second = extract_keywords(text, &config());
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_stopwords_and_short_tokens_never_appear() {
        let text = "internet dari saya ke di ok no internet";
        let keywords = extract_keywords(text, &config());
        for kw in &keywords {
            for part in kw.keyword.split(' ') {
                assert!(!DEFAULT_STOPWORDS.contains(part), "stopword {} leaked", part);
                assert!(part.chars().count() >= 3, "short token {} leaked", part);
            }
        }
    }

    #[test]
    fn test_punctuation_and_case_are_normalized() {
        let keywords = extract_keywords("Internet... MATI!!! internet, mati?", &config());
        let internet = keywords.iter().find(|k| k.keyword == "internet").unwrap();
        assert_eq!(internet.frequency, 2);
        let mati = keywords.iter().find(|k| k.keyword == "mati").unwrap();
        assert_eq!(mati.frequency, 2);
    }

    #[test]
    fn test_frequency_ranking_with_first_occurrence_tie_break() {
        // "alpha" and "beta" both occur twice; alpha occurs first.
        let text = "alpha beta alpha beta gamma";
        let keywords = extract_keywords(text, &config());
        let unigrams: Vec<&str> = keywords
            .iter()
            .filter(|k| !k.keyword.contains(' '))
            .map(|k| k.keyword.as_str())
            .collect();
        assert_eq!(unigrams, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_bigram_frequency_matches_surface_form() {
        let text = "internet mati internet mati internet lambat";
        let keywords = extract_keywords(text, &config());
        let bigram = keywords
            .iter()
            .find(|k| k.keyword == "internet mati")
            .expect("bigram expected");
        assert_eq!(bigram.frequency, 2);
    }

    #[test]
    fn test_bigram_suppressed_when_both_constituents_selected() {
        // Both "internet" and "mati" make the unigram cut, so the pair is
        // redundant and must not be emitted.
        let text = "internet mati";
        let keywords = extract_keywords(text, &config());
        assert!(keywords.iter().any(|k| k.keyword == "internet"));
        assert!(keywords.iter().any(|k| k.keyword == "mati"));
        assert!(!keywords.iter().any(|k| k.keyword == "internet mati"));
    }

    #[test]
    fn test_bigram_kept_when_constituent_misses_unigram_cut() {
        let mut cfg = config();
        cfg.top_unigrams = 1;
        // "internet" wins the single unigram slot; "mati" is left out, so the
        // pair still carries information.
        let text = "internet internet mati";
        let keywords = extract_keywords(text, &cfg);
        assert!(keywords.iter().any(|k| k.keyword == "internet mati"));
    }

    #[test]
    fn test_bigram_not_spanning_stopword_gap() {
        // "mati dari pagi": "dari" is a stopword, so "mati pagi" is not an
        // adjacent surface pair and must not be fabricated.
        let text = "mati dari pagi";
        let keywords = extract_keywords(text, &config());
        assert!(!keywords.iter().any(|k| k.keyword == "mati pagi"));
        assert!(!keywords.iter().any(|k| k.keyword.contains("dari")));
    }

    #[test]
    fn test_empty_and_stopword_only_text() {
        assert!(extract_keywords("", &config()).is_empty());
        assert!(extract_keywords("   \t\n", &config()).is_empty());
        assert!(extract_keywords("dari saya yang di ke", &config()).is_empty());
    }

    #[test]
    fn test_top_n_limits_respected() {
        let mut cfg = config();
        cfg.top_unigrams = 2;
        cfg.top_bigrams = 1;
        let text = "aaa bbb ccc ddd eee aaa bbb ccc aaa bbb";
        let keywords = extract_keywords(text, &cfg);
        let unigram_count = keywords.iter().filter(|k| !k.keyword.contains(' ')).count();
        let bigram_count = keywords.iter().filter(|k| k.keyword.contains(' ')).count();
        assert!(unigram_count <= 2);
        assert!(bigram_count <= 1);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Re-running extraction on identical text yields an identical list.
        #[test]
        fn prop_extraction_idempotent(text in ".{0,400}") {
            let cfg = ExtractionConfig::default();
            let first = extract_keywords(&text, &cfg);
            let second = extract_keywords(&text, &cfg);
            prop_assert_eq!(first, second);
        }

        /// No stopword and no short token ever appears in the output, and
        /// every frequency is positive.
        #[test]
        fn prop_filters_always_hold(text in "[a-z ]{0,200}") {
            let cfg = ExtractionConfig::default();
            for kw in extract_keywords(&text, &cfg) {
                prop_assert!(kw.frequency > 0);
                for part in kw.keyword.split(' ') {
                    prop_assert!(part.chars().count() >= cfg.min_token_len);
                    prop_assert!(!cfg.stopwords.contains(part));
                }
            }
        }

        /// A reported bigram's surface form occurs in the text at least as
        /// often as its reported frequency.
        #[test]
        fn prop_bigram_surface_frequency_sound(text in "[a-z ]{0,200}") {
            let cfg = ExtractionConfig::default();
            let normalized: String = text
                .to_lowercase()
                .chars()
                .map(|c| if c.is_alphanumeric() { c } else { ' ' })
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            for kw in extract_keywords(&text, &cfg) {
                if kw.keyword.contains(' ') {
                    let occurrences = normalized.matches(&kw.keyword).count() as i64;
                    prop_assert!(
                        occurrences >= kw.frequency,
                        "bigram {:?} reported {} but occurs {}",
                        kw.keyword, kw.frequency, occurrences
                    );
                }
            }
        }
    }
}
