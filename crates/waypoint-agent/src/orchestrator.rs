// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end routing: analyze, pick a strategy, execute, escalate.
//!
//! ```text
//! Start -> Analyzed -> RAG | Reasoning | Internal -> [Fallback] -> Done
//! ```
//!
//! Only configuration and policy errors leave [`Orchestrator::route`] as
//! they are. Anything else is logged and reported as
//! `WaypointError::Internal("routing failed")`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, IntoStaticStr};
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use waypoint_config::WaypointConfig;
use waypoint_core::{
    with_timeout, AdapterLoader, ChatBackend, ContentModerator, Domain, EmbeddingAdapter,
    ErrorKind, GenerationBackend, GenerationParams, Intent, Interaction, InteractionSink,
    SearchProvider, WaypointError,
};
use waypoint_prometheus::Outcome;
use waypoint_retrieval::{RetrievalClient, RetrievalStats};
use waypoint_router::{AnalysisResult, Adjudicator, QueryAnalyzer, SemanticRouter};

use crate::adapters::AdapterRegistry;
use crate::collector::TracingSink;
use crate::fallback::UncertaintyRules;
use crate::reasoner::Reasoner;

/// Strategy that produced the final response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr, Serialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Mode {
    RagExternal,
    InternalReasoning,
    Adapter,
    BaseModel,
    RagFallback,
}

/// Response envelope returned for every routed query.
#[derive(Debug, Clone, Serialize)]
pub struct RoutedResponse {
    pub prompt_received: String,
    pub analysis: AnalysisResult,
    pub mode: Mode,
    pub response: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_used: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adapter_used: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_trace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_response: Option<String>,
}

impl RoutedResponse {
    fn new(query: &str, analysis: AnalysisResult, mode: Mode, response: String) -> Self {
        Self {
            prompt_received: query.to_string(),
            analysis,
            mode,
            response,
            timestamp: Utc::now(),
            domain: None,
            context_used: None,
            adapter_used: None,
            reasoning_trace: None,
            fallback_reason: None,
            original_response: None,
        }
    }
}

/// External collaborators the orchestrator drives.
pub struct Backends {
    /// Adjudicator and reasoner model.
    pub chat: Arc<dyn ChatBackend>,
    /// Exemplar and query embeddings for domain routing.
    pub embedder: Arc<dyn EmbeddingAdapter>,
    /// Base model for internal answers without an adapter.
    pub base: Arc<dyn GenerationBackend>,
    pub loader: Arc<dyn AdapterLoader>,
    /// Web search. `None` makes every retrieval route a configuration error.
    pub search: Option<Arc<dyn SearchProvider>>,
}

/// Top-level controller for one query at a time, shared across requests.
///
/// Owns every routing service for the life of the process: the analyzer,
/// the reasoner, the retrieval client, the adapter registry and the lazily
/// built [`SemanticRouter`]. Construct it once with [`Orchestrator::new`],
/// optionally attach a sink or moderator, then call
/// [`route`](Self::route) from any number of tasks.
pub struct Orchestrator {
    analyzer: QueryAnalyzer,
    reasoner: Reasoner,
    retrieval: Option<RetrievalClient>,
    adapters: AdapterRegistry,
    base: Arc<dyn GenerationBackend>,
    embedder: Arc<dyn EmbeddingAdapter>,
    exemplars: BTreeMap<String, Vec<String>>,
    semantic: OnceCell<SemanticRouter>,
    sink: Arc<dyn InteractionSink>,
    moderator: Option<Arc<dyn ContentModerator>>,
    uncertainty: Option<UncertaintyRules>,
    generation: GenerationParams,
    timeout: Duration,
}

impl Orchestrator {
    /// Wire the routing services from configuration and backends.
    ///
    /// No external call is made here; the semantic router embeds its
    /// exemplars on the first internal query.
    pub fn new(config: &WaypointConfig, backends: Backends) -> Self {
        let model_timeout = Duration::from_secs(config.ollama.timeout_secs);
        let search_timeout = Duration::from_secs(config.tavily.timeout_secs);

        let adjudicator =
            Adjudicator::new(Arc::clone(&backends.chat), &config.routing, model_timeout);
        let retrieval = backends.search.map(|provider| {
            RetrievalClient::new(
                provider,
                &config.retrieval,
                config.tavily.search_depth,
                search_timeout,
            )
        });
        let uncertainty = config
            .fallback
            .enabled
            .then(|| UncertaintyRules::from_config(&config.fallback));

        Self {
            analyzer: QueryAnalyzer::new(adjudicator, config.routing.adjudication_threshold),
            reasoner: Reasoner::new(backends.chat, &config.reasoner, model_timeout),
            retrieval,
            adapters: AdapterRegistry::new(
                &config.adapters,
                backends.loader,
                &config.generation,
                model_timeout,
            ),
            base: backends.base,
            embedder: backends.embedder,
            exemplars: config.routing.exemplars.clone(),
            semantic: OnceCell::new(),
            sink: Arc::new(TracingSink),
            moderator: None,
            uncertainty,
            generation: config.generation.params(),
            timeout: model_timeout,
        }
    }

    /// Replace the default tracing-backed interaction sink.
    pub fn with_sink(mut self, sink: Arc<dyn InteractionSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Screen every query before any downstream call.
    pub fn with_moderator(mut self, moderator: Arc<dyn ContentModerator>) -> Self {
        self.moderator = Some(moderator);
        self
    }

    /// Intent classifier, for callers that only need the analysis.
    pub fn analyzer(&self) -> &QueryAnalyzer {
        &self.analyzer
    }

    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    /// `None` when no search provider was configured.
    pub fn retrieval_stats(&self) -> Option<RetrievalStats> {
        self.retrieval.as_ref().map(RetrievalClient::stats)
    }

    /// Route and answer `query`.
    ///
    /// `expected` is an optional ground-truth intent used only for
    /// classification accuracy metrics.
    pub async fn route(
        &self,
        query: &str,
        expected: Option<Intent>,
    ) -> Result<RoutedResponse, WaypointError> {
        let start = Instant::now();
        match self.execute(query, expected).await {
            Ok(routed) => {
                let elapsed = start.elapsed().as_secs_f64();
                let mode: &'static str = routed.mode.into();
                waypoint_prometheus::record_route_latency(mode, elapsed);
                info!(mode, elapsed_secs = elapsed, "query routed");
                Ok(routed)
            }
            Err(e) => match e.kind() {
                ErrorKind::Configuration | ErrorKind::PolicyRejection => Err(e),
                ErrorKind::ExternalService | ErrorKind::Internal => {
                    error!(error = %e, "routing failed");
                    Err(WaypointError::Internal("routing failed".into()))
                }
            },
        }
    }

    async fn execute(
        &self,
        query: &str,
        expected: Option<Intent>,
    ) -> Result<RoutedResponse, WaypointError> {
        if let Some(moderator) = &self.moderator {
            moderator.moderate(query).await?;
        }

        let analysis = self.analyzer.analyze(query).await;
        if let Some(truth) = expected {
            record_accuracy(analysis.intent, truth);
        }

        match analysis.intent {
            Intent::ExternalSearch => self.rag(query, analysis).await,
            Intent::ComplexReasoning => Ok(self.reasoning(query, analysis).await),
            Intent::SimpleInternal => self.internal(query, analysis).await,
        }
    }

    async fn rag(
        &self,
        query: &str,
        analysis: AnalysisResult,
    ) -> Result<RoutedResponse, WaypointError> {
        let (context, response) = self.retrieve_and_synthesize(query).await?;
        self.sink
            .log_interaction(Interaction::new(query, context, response.clone(), "rag-external"))
            .await;

        let mut routed = RoutedResponse::new(query, analysis, Mode::RagExternal, response);
        routed.context_used = Some(true);
        Ok(routed)
    }

    async fn reasoning(&self, query: &str, analysis: AnalysisResult) -> RoutedResponse {
        let outcome = self.reasoner.reason(query).await;
        let mut routed =
            RoutedResponse::new(query, analysis, Mode::InternalReasoning, outcome.answer);
        routed.reasoning_trace = Some(outcome.reasoning);
        routed
    }

    async fn internal(
        &self,
        query: &str,
        analysis: AnalysisResult,
    ) -> Result<RoutedResponse, WaypointError> {
        let domain = self.select_domain(query).await;

        if self.adapters.has_adapter(&domain) {
            let response = self
                .adapters
                .generate_with_adapter(&domain, query, self.generation.max_new_tokens)
                .await?;
            let mut routed = RoutedResponse::new(query, analysis, Mode::Adapter, response);
            routed.domain = Some(domain);
            routed.adapter_used = Some(true);
            return Ok(routed);
        }

        let response = with_timeout(
            "base-model",
            self.timeout,
            self.base.generate(query, &self.generation),
        )
        .await?;

        let marker = self
            .uncertainty
            .as_ref()
            .and_then(|rules| rules.matches(&response))
            .map(str::to_string);

        let Some(marker) = marker else {
            let mut routed = RoutedResponse::new(query, analysis, Mode::BaseModel, response);
            routed.domain = Some(domain);
            return Ok(routed);
        };

        if self.retrieval.is_none() {
            warn!(marker = %marker, "uncertain answer but retrieval is not configured");
            let mut routed = RoutedResponse::new(query, analysis, Mode::BaseModel, response);
            routed.domain = Some(domain);
            return Ok(routed);
        }

        info!(marker = %marker, "base model uncertain, falling back to retrieval");
        let (context, synthesized) = self.retrieve_and_synthesize(query).await?;
        self.sink
            .log_interaction(Interaction::new(
                query,
                context,
                synthesized.clone(),
                "rag-fallback",
            ))
            .await;

        let mut routed = RoutedResponse::new(query, analysis, Mode::RagFallback, synthesized);
        routed.domain = Some(domain);
        routed.context_used = Some(true);
        routed.fallback_reason = Some(marker);
        routed.original_response = Some(response);
        Ok(routed)
    }

    async fn retrieve_and_synthesize(&self, query: &str) -> Result<(String, String), WaypointError> {
        let retrieval = self.retrieval.as_ref().ok_or_else(|| {
            WaypointError::Config("retrieval is not configured; set tavily.api_key".into())
        })?;
        let context = retrieval.get_context(query, retrieval.max_results()).await;
        let response = self.reasoner.synthesize_with_context(query, &context).await;
        Ok((context, response))
    }

    /// Domain from the semantic router, built on first use.
    ///
    /// A router that cannot be built yields `general` and is retried on the
    /// next call.
    async fn select_domain(&self, query: &str) -> Domain {
        let router = self
            .semantic
            .get_or_try_init(|| {
                SemanticRouter::new(Arc::clone(&self.embedder), &self.exemplars, self.timeout)
            })
            .await;

        match router {
            Ok(router) => {
                let (domain, score) = router.classify(query).await;
                debug!(%domain, score, "domain selected");
                domain
            }
            Err(e) => {
                warn!(error = %e, "semantic router unavailable, using general domain");
                Domain::GENERAL
            }
        }
    }
}

fn record_accuracy(predicted: Intent, truth: Intent) {
    let label = predicted.to_string();
    if predicted == truth {
        waypoint_prometheus::record_classification(&label, Outcome::TruePositive);
    } else {
        waypoint_prometheus::record_classification(&label, Outcome::FalsePositive);
        waypoint_prometheus::record_classification(&truth.to_string(), Outcome::FalseNegative);
    }
}
