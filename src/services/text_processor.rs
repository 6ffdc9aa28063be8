// Text Processing Service
// Sentence splitting, word tokenization and readability for the feature extractor

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Tokenization seam used by the feature extractor.
///
/// Implementations must be deterministic: identical input yields identical
/// output, otherwise scoring stops being reproducible.
pub trait Tokenizer: Send + Sync {
    /// Split raw text into sentences.
    fn sentences(&self, text: &str) -> Vec<String>;

    /// Lowercase word tokens (punctuation marks count as tokens).
    fn words(&self, text: &str) -> Vec<String>;

    /// Reading-ease score over raw text; higher reads easier.
    fn readability_ease(&self, text: &str) -> f64;
}

/// Rule-based tokenizer for English-like text, with per-character tokens for Han script.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTokenizer;

impl Tokenizer for RuleTokenizer {
    fn sentences(&self, text: &str) -> Vec<String> {
        split_sentences(text)
    }

    fn words(&self, text: &str) -> Vec<String> {
        tokenize_words(text)
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect()
    }

    fn readability_ease(&self, text: &str) -> f64 {
        flesch_reading_ease(text)
    }
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\p{Han}|[\w--\p{Han}]+(?:['’][\w--\p{Han}]+)*|[^\w\s]")
            .expect("token regex")
    })
}

fn lexical_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\p{Han}|[\w--\p{Han}]+(?:['’][\w--\p{Han}]+)*").expect("lexical word regex")
    })
}

/// Word and punctuation tokens in source order, original case.
///
/// English clitics are split off their host: "It's" gives "It" and "'s",
/// "don't" gives "do" and "n't".
pub fn tokenize_words(text: &str) -> Vec<&str> {
    token_re()
        .find_iter(text)
        .flat_map(|m| split_clitic(m.as_str()))
        .collect()
}

const CLITICS: [&str; 6] = ["s", "re", "ve", "ll", "d", "m"];

fn split_clitic(token: &str) -> Vec<&str> {
    let Some(idx) = token.rfind(|c: char| c == '\'' || c == '\u{2019}') else {
        return vec![token];
    };
    let (head, tail) = token.split_at(idx);
    let apostrophe_len = tail.chars().next().map_or(0, char::len_utf8);
    let suffix = tail[apostrophe_len..].to_lowercase();

    if suffix == "t" && head.len() > 1 && head.ends_with(['n', 'N']) {
        let cut = head.len() - 1;
        return vec![&token[..cut], &token[cut..]];
    }
    if !head.is_empty() && CLITICS.contains(&suffix.as_str()) {
        return vec![head, tail];
    }
    vec![token]
}

/// Words only, punctuation dropped. Used for readability.
pub fn lexical_words(text: &str) -> Vec<&str> {
    lexical_word_re().find_iter(text).map(|m| m.as_str()).collect()
}

const SENTENCE_TERMINATORS: [char; 6] = ['.', '!', '?', '。', '！', '？'];
const CLOSING_MARKS: [char; 6] = ['"', '\u{201d}', '\'', '\u{2019}', ')', ']'];

fn abbreviations() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        [
            "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "vs", "etc", "e.g", "i.e", "fig", "vol",
            "inc", "ltd",
        ]
        .into_iter()
        .collect()
    })
}

/// Word immediately before `end` (exclusive), lowercased.
fn preceding_word(chars: &[char], end: usize) -> String {
    let mut start = end;
    while start > 0 && (chars[start - 1].is_alphanumeric() || chars[start - 1] == '.') {
        start -= 1;
    }
    chars[start..end].iter().collect::<String>().to_lowercase()
}

/// True when a closing double quote follows `from` on the same line.
fn quote_closes_on_line(chars: &[char], from: usize) -> bool {
    chars[from..]
        .iter()
        .take_while(|c| **c != '\n')
        .any(|c| matches!(c, '"' | '\u{201d}'))
}

/// Split text into sentences.
///
/// A terminator ends a sentence when it is followed by whitespace, the end of
/// text, or a closing quote/bracket. Runs of terminators ("?!", "...") stay
/// together. Decimal points, known abbreviations and terminators inside
/// double quotes do not split. CJK terminators split without whitespace.
/// A quote with no closing mark later on its line (an inch mark, a typo)
/// is ignored.
pub fn split_sentences(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![];
    }

    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut buffer = String::new();
    let mut in_quote = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        buffer.push(ch);

        match ch {
            '"' => in_quote = !in_quote,
            '\u{201c}' => in_quote = true,
            '\u{201d}' | '\n' => in_quote = false,
            _ => {}
        }

        if !SENTENCE_TERMINATORS.contains(&ch) {
            i += 1;
            continue;
        }
        if in_quote {
            if quote_closes_on_line(&chars, i + 1) {
                i += 1;
                continue;
            }
            in_quote = false;
        }

        if ch == '.' && i > 0 && i + 1 < chars.len() {
            if chars[i - 1].is_ascii_digit() && chars[i + 1].is_ascii_digit() {
                i += 1;
                continue;
            }
        }

        // Absorb "?!", "..." and similar runs.
        while i + 1 < chars.len() && SENTENCE_TERMINATORS.contains(&chars[i + 1]) {
            i += 1;
            buffer.push(chars[i]);
        }

        let is_cjk = matches!(chars[i], '。' | '！' | '？');
        let mut j = i + 1;
        while j < chars.len() && CLOSING_MARKS.contains(&chars[j]) {
            j += 1;
        }
        let boundary = is_cjk || j >= chars.len() || chars[j].is_whitespace();
        let abbreviation = ch == '.' && {
            let trailing_dots = buffer.chars().rev().take_while(|c| *c == '.').count();
            let word = preceding_word(&chars, i + 1 - trailing_dots);
            abbreviations().contains(word.as_str())
        };

        if boundary && !abbreviation {
            while i + 1 < j {
                i += 1;
                buffer.push(chars[i]);
            }
            let sentence = buffer.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            buffer.clear();
            in_quote = false;
        }

        i += 1;
    }

    let remaining = buffer.trim();
    if !remaining.is_empty() {
        sentences.push(remaining.to_string());
    }

    sentences
}

/// Vowel-group syllable estimate for one word; non-Latin words count as one.
pub fn count_syllables(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if letters.is_empty() {
        return 1;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut count = 0usize;
    let mut prev_vowel = false;
    for &c in &letters {
        let v = is_vowel(c);
        if v && !prev_vowel {
            count += 1;
        }
        prev_vowel = v;
    }

    // Silent trailing "e", but not "-le" after a consonant ("table").
    let n = letters.len();
    if n > 2 && letters[n - 1] == 'e' && !is_vowel(letters[n - 2]) {
        let le_ending = letters[n - 2] == 'l' && !is_vowel(letters[n - 3]);
        if !le_ending && count > 1 {
            count -= 1;
        }
    }

    count.max(1)
}

/// Flesch reading ease: 206.835 - 1.015 * words/sentence - 84.6 * syllables/word.
pub fn flesch_reading_ease(text: &str) -> f64 {
    let words = lexical_words(text);
    if words.is_empty() {
        return 0.0;
    }
    let sentence_count = split_sentences(text).len().max(1) as f64;
    let word_count = words.len() as f64;
    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();

    206.835 - 1.015 * (word_count / sentence_count) - 84.6 * (syllables as f64 / word_count)
}
