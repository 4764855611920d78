// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding-based domain classification.
//!
//! Every domain owns a handful of exemplar queries whose embeddings are
//! computed once, at construction. A query is embedded once and scored
//! against each domain by its best-matching exemplar.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use waypoint_core::{with_timeout, Domain, EmbeddingAdapter, WaypointError};

/// Cosine similarity of two vectors.
///
/// Returns 0.0 for mismatched lengths or a zero-norm input.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Embedding-based domain classifier for the internal path.
///
/// Each domain is represented by the embeddings of its exemplar queries,
/// computed once at construction. A query is embedded once and compared to
/// every exemplar; a domain scores its best exemplar match, not a centroid,
/// so resembling one exemplar closely is enough.
///
/// The winner is the highest-scoring domain. Ties go to the lexicographically
/// first domain name.
pub struct SemanticRouter {
    embedder: Arc<dyn EmbeddingAdapter>,
    /// Exemplar embeddings per domain, in lexicographic domain order.
    exemplars: BTreeMap<Domain, Vec<Vec<f32>>>,
    timeout: Duration,
}

impl std::fmt::Debug for SemanticRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticRouter")
            .field("domains", &self.exemplars.keys().collect::<Vec<_>>())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SemanticRouter {
    /// Embed every exemplar in one batch.
    ///
    /// Fails when the embedder fails or returns the wrong number of vectors;
    /// callers may retry construction later.
    pub async fn new(
        embedder: Arc<dyn EmbeddingAdapter>,
        exemplars: &BTreeMap<String, Vec<String>>,
        timeout: Duration,
    ) -> Result<Self, WaypointError> {
        let texts: Vec<String> = exemplars.values().flatten().cloned().collect();
        let mut vectors = with_timeout("embedding", timeout, embedder.embed(&texts))
            .await?
            .into_iter();

        if vectors.len() != texts.len() {
            return Err(WaypointError::external_msg(
                "embedding",
                format!(
                    "expected {} exemplar embeddings, got {}",
                    texts.len(),
                    vectors.len()
                ),
            ));
        }

        let mut table: BTreeMap<Domain, Vec<Vec<f32>>> = BTreeMap::new();
        for (domain, queries) in exemplars {
            let entry = table.entry(Domain::new(domain.as_str())).or_default();
            entry.extend(vectors.by_ref().take(queries.len()));
        }
        table.retain(|_, vectors| !vectors.is_empty());

        tracing::info!(
            domains = table.len(),
            exemplars = texts.len(),
            "semantic router ready"
        );

        Ok(Self {
            embedder,
            exemplars: table,
            timeout,
        })
    }

    pub fn domains(&self) -> impl Iterator<Item = &Domain> {
        self.exemplars.keys()
    }

    /// Best domain for `query` and its similarity.
    ///
    /// Ties go to the lexicographically first domain. An embedding failure
    /// yields `(general, 0.0)`.
    pub async fn classify(&self, query: &str) -> (Domain, f32) {
        let Some(scores) = self.score(query).await else {
            return (Domain::GENERAL, 0.0);
        };

        let mut best: Option<(Domain, f32)> = None;
        for (domain, score) in scores {
            if best.as_ref().is_none_or(|(_, top)| score > *top) {
                best = Some((domain, score));
            }
        }

        let (domain, score) = best.unwrap_or((Domain::GENERAL, 0.0));
        tracing::debug!(%domain, score, "semantic domain");
        waypoint_prometheus::record_domain_classification(domain.as_str(), "semantic");
        (domain, score)
    }

    /// Up to `k` best domains, highest score first, ties by domain name.
    pub async fn top_domains(&self, query: &str, k: usize) -> Vec<(Domain, f32)> {
        let Some(mut scores) = self.score(query).await else {
            return Vec::new();
        };
        // Stable sort keeps the lexicographic order among equal scores.
        scores.sort_by(|a, b| b.1.total_cmp(&a.1));
        scores.truncate(k);
        scores
    }

    /// Per-domain max similarity, in domain order.
    async fn score(&self, query: &str) -> Option<Vec<(Domain, f32)>> {
        let embedded = with_timeout(
            "embedding",
            self.timeout,
            self.embedder.embed(&[query.to_string()]),
        )
        .await;

        let query_vec = match embedded.map(|mut v| v.pop()) {
            Ok(Some(vec)) => vec,
            Ok(None) => {
                tracing::warn!("embedder returned no vector, defaulting to general");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "query embedding failed, defaulting to general");
                return None;
            }
        };

        Some(
            self.exemplars
                .iter()
                .map(|(domain, vectors)| {
                    let max = vectors
                        .iter()
                        .map(|v| cosine_similarity(&query_vec, v))
                        .fold(f32::NEG_INFINITY, f32::max);
                    (domain.clone(), max)
                })
                .collect(),
        )
    }
}
