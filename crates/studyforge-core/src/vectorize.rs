//! TF-IDF text vectorization.
//!
//! The vocabulary is built from the documents themselves. Tokens are
//! lowercased runs of two or more alphanumeric/underscore characters,
//! weights use smoothed idf `ln((1 + n) / (1 + df)) + 1`, and each row is
//! L2-normalized.

use std::collections::{BTreeMap, BTreeSet};

/// A fitted TF-IDF model: sorted vocabulary plus one idf weight per term.
#[derive(Debug, Clone, PartialEq)]
pub struct TfIdf {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

/// Split `text` into lowercase tokens of at least two word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(|token| token.to_lowercase())
        .collect()
}

impl TfIdf {
    /// Learn the vocabulary and idf weights from `documents`.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> =
            documents.iter().map(|d| tokenize(d.as_ref())).collect();

        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let unique: BTreeSet<&String> = tokens.iter().collect();
            for token in unique {
                *document_frequency.entry(token.clone()).or_default() += 1;
            }
        }

        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (idx, (term, df)) in document_frequency.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }

        tracing::debug!(
            documents = documents.len(),
            vocabulary = vocabulary.len(),
            "fitted tf-idf vocabulary"
        );

        Self { vocabulary, idf }
    }

    /// Number of distinct terms.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Column index of `term`, if it is in the vocabulary.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Vectorize one document against the fitted vocabulary.
    ///
    /// Out-of-vocabulary tokens are ignored; a document with no known tokens
    /// maps to the zero vector.
    pub fn transform_one(&self, document: &str) -> Vec<f64> {
        let mut row = vec![0.0; self.vocabulary.len()];
        for token in tokenize(document) {
            if let Some(&col) = self.vocabulary.get(&token) {
                row[col] += 1.0;
            }
        }
        for (value, weight) in row.iter_mut().zip(&self.idf) {
            *value *= weight;
        }
        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut row {
                *value /= norm;
            }
        }
        row
    }

    /// Vectorize every document.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Vec<Vec<f64>> {
        documents
            .iter()
            .map(|d| self.transform_one(d.as_ref()))
            .collect()
    }

    /// Fit on `documents` and return their vectors.
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> (Self, Vec<Vec<f64>>) {
        let model = Self::fit(documents);
        let rows = model.transform(documents);
        (model, rows)
    }
}
