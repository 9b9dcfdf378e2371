//! Instruction tokenization.

use std::collections::HashMap;

/// Padding token; always id 0.
pub const PAD: &str = "<PAD>";
/// Out-of-vocabulary token; always id 1.
pub const UNK: &str = "<UNK>";
/// End-of-sentence token; always id 2.
pub const EOS: &str = "<EOS>";

/// Encodes an instruction into a fixed-length sequence of vocabulary ids.
pub trait Tokenizer: Send + Sync {
    fn encode_sentence(&self, sentence: &str) -> Vec<usize>;
}

/// Splits a sentence into lowercase word and punctuation tokens.
///
/// Runs of alphanumeric characters form words; every other non-whitespace
/// character is its own token.
pub fn split_sentence(sentence: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    for ch in sentence.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            word.extend(ch.to_lowercase());
            continue;
        }
        if !word.is_empty() {
            tokens.push(std::mem::take(&mut word));
        }
        if !ch.is_whitespace() {
            tokens.push(ch.to_string());
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

/// Vocabulary lookup tokenizer.
///
/// Output is `encoding_length` ids: the sentence tokens, `<EOS>`, then `<PAD>`
/// up to the length. Long sentences are truncated so `<EOS>` always fits.
#[derive(Debug, Clone)]
pub struct VocabTokenizer {
    vocab: Vec<String>,
    word_to_index: HashMap<String, usize>,
    encoding_length: usize,
}

impl VocabTokenizer {
    /// Builds a tokenizer over `words`; the special tokens are prepended.
    pub fn new<I, S>(words: I, encoding_length: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab: Vec<String> = vec![PAD.into(), UNK.into(), EOS.into()];
        let mut word_to_index: HashMap<String, usize> =
            vocab.iter().enumerate().map(|(i, w)| (w.clone(), i)).collect();
        for word in words {
            let word = word.as_ref();
            if !word_to_index.contains_key(word) {
                word_to_index.insert(word.to_string(), vocab.len());
                vocab.push(word.to_string());
            }
        }
        Self {
            vocab,
            word_to_index,
            encoding_length,
        }
    }

    /// Builds a vocabulary from every token occurring at least `min_count` times.
    ///
    /// Words are ordered by descending frequency, ties alphabetically.
    pub fn from_corpus<'a, I>(sentences: I, min_count: usize, encoding_length: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for sentence in sentences {
            for token in split_sentence(sentence) {
                *counts.entry(token).or_default() += 1;
            }
        }
        let mut words: Vec<(String, usize)> = counts.into_iter().filter(|(_, c)| *c >= min_count).collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Self::new(words.into_iter().map(|(w, _)| w), encoding_length)
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    pub fn encoding_length(&self) -> usize {
        self.encoding_length
    }

    pub fn index_of(&self, word: &str) -> usize {
        self.word_to_index.get(word).copied().unwrap_or(1)
    }

    /// Maps ids back to tokens, stopping at `<EOS>`.
    pub fn decode(&self, encoding: &[usize]) -> Vec<&str> {
        encoding
            .iter()
            .take_while(|&&i| i != 2)
            .filter(|&&i| i != 0)
            .map(|&i| self.vocab.get(i).map_or(UNK, String::as_str))
            .collect()
    }
}

impl Tokenizer for VocabTokenizer {
    fn encode_sentence(&self, sentence: &str) -> Vec<usize> {
        let keep = self.encoding_length.saturating_sub(1);
        let mut encoding: Vec<usize> = split_sentence(sentence)
            .iter()
            .take(keep)
            .map(|t| self.index_of(t))
            .collect();
        if self.encoding_length > 0 {
            encoding.push(self.index_of(EOS));
        }
        encoding.resize(self.encoding_length, self.index_of(PAD));
        encoding
    }
}
