// SPDX-FileCopyrightText: 2026 Waypoint Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end routing with mock collaborators.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use waypoint_agent::{Backends, Mode, Orchestrator};
use waypoint_config::model::AdapterSpecConfig;
use waypoint_config::WaypointConfig;
use waypoint_core::{Domain, ErrorKind, Intent, WaypointError};
use waypoint_router::AnalysisSource;
use waypoint_test_utils::{
    sample_result, MockChat, MockEmbedder, MockGenerator, MockLoader, MockModerator, MockSearch,
    RecordingSink,
};

const CODE_QUERY: &str = "Write a python function to sort a list";
const GENERAL_QUERY: &str = "Who wrote Hamlet?";
const NEWS_QUERY: &str = "What is the latest news on the Mars rover?";

fn vocabulary() -> MockEmbedder {
    MockEmbedder::with_vocabulary([
        "python", "function", "code", "sort", "symptom", "diagnosis", "who", "wrote", "history",
    ])
}

fn config(adapter_dir: &Path) -> WaypointConfig {
    let mut config = WaypointConfig::default();
    config.routing.exemplars = BTreeMap::from([
        ("code".to_string(), vec!["python function code".to_string()]),
        (
            "general".to_string(),
            vec!["who wrote this history".to_string()],
        ),
        (
            "medical".to_string(),
            vec!["symptom diagnosis".to_string()],
        ),
    ]);
    config.adapters = vec![AdapterSpecConfig {
        domain: "code".into(),
        path: adapter_dir.display().to_string(),
        model: "code-lora".into(),
    }];
    config
}

struct Harness {
    chat: MockChat,
    base: MockGenerator,
    search: MockSearch,
    loader: MockLoader,
    embedder: MockEmbedder,
    sink: RecordingSink,
}

impl Harness {
    fn new(chat_reply: &str, base_reply: &str) -> Self {
        Self {
            chat: MockChat::replying(chat_reply),
            base: MockGenerator::replying(base_reply),
            search: MockSearch::with_results(vec![sample_result(1), sample_result(2)]),
            loader: MockLoader::new(),
            embedder: vocabulary(),
            sink: RecordingSink::new(),
        }
    }

    fn build(&self, config: &WaypointConfig, with_search: bool) -> Orchestrator {
        let search = with_search
            .then(|| Arc::new(self.search.clone()) as Arc<dyn waypoint_core::SearchProvider>);
        Orchestrator::new(
            config,
            Backends {
                chat: Arc::new(self.chat.clone()),
                embedder: Arc::new(self.embedder.clone()),
                base: Arc::new(self.base.clone()),
                loader: Arc::new(self.loader.clone()),
                search,
            },
        )
        .with_sink(Arc::new(self.sink.clone()))
    }
}

#[tokio::test]
async fn realtime_query_routes_through_retrieval() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new("  The rover found ice [Source 1].  ", "unused");
    let orchestrator = harness.build(&config(dir.path()), true);

    let routed = orchestrator.route(NEWS_QUERY, None).await.unwrap();

    assert_eq!(routed.mode, Mode::RagExternal);
    assert_eq!(routed.analysis.intent, Intent::ExternalSearch);
    assert_eq!(routed.analysis.source, AnalysisSource::RuleEngine);
    assert_eq!(routed.response, "The rover found ice [Source 1].");
    assert_eq!(routed.context_used, Some(true));
    assert_eq!(routed.prompt_received, NEWS_QUERY);
    assert_eq!(harness.search.call_count(), 1);

    let prompts = harness.chat.prompts().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Result 1"));
    assert!(prompts[0].contains(NEWS_QUERY));

    let interactions = harness.sink.interactions().await;
    assert_eq!(interactions.len(), 1);
    assert_eq!(interactions[0].intent, "rag-external");
    assert!(interactions[0].context.contains("https://example.com/2"));
}

#[tokio::test]
async fn retrieval_without_provider_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new("answer", "unused");
    let orchestrator = harness.build(&config(dir.path()), false);

    let err = orchestrator.route(NEWS_QUERY, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(harness.sink.interactions().await.is_empty());
}

#[tokio::test]
async fn complex_query_returns_reasoning_trace() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(
        "First, look at the loop.\n\nAnswer: It runs in O(n log n).",
        "unused",
    );
    let orchestrator = harness.build(&config(dir.path()), true);

    let routed = orchestrator
        .route("Explain this code and analyze its complexity", None)
        .await
        .unwrap();

    assert_eq!(routed.mode, Mode::InternalReasoning);
    assert_eq!(routed.response, "It runs in O(n log n).");
    assert_eq!(
        routed.reasoning_trace.as_deref(),
        Some("First, look at the loop.")
    );
    assert_eq!(routed.context_used, None);
    assert_eq!(harness.search.call_count(), 0);
}

#[tokio::test]
async fn code_query_uses_domain_adapter() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new("unused", "base answer");
    let orchestrator = harness.build(&config(dir.path()), true);

    let routed = orchestrator.route(CODE_QUERY, None).await.unwrap();

    assert_eq!(routed.mode, Mode::Adapter);
    assert_eq!(routed.domain, Some(Domain::CODE));
    assert_eq!(routed.adapter_used, Some(true));
    assert_eq!(routed.response, MockLoader::reply_for(&Domain::CODE));
    assert!(harness.base.prompts().await.is_empty());

    orchestrator.route(CODE_QUERY, None).await.unwrap();
    assert_eq!(harness.loader.load_count(), 1);
    assert_eq!(orchestrator.adapters().loaded_domains(), vec![Domain::CODE]);
}

#[tokio::test]
async fn missing_adapter_directory_falls_back_to_base_model() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new("unused", "def sort(xs): return sorted(xs)");
    let orchestrator = harness.build(&config(&dir.path().join("absent")), true);

    let routed = orchestrator.route(CODE_QUERY, None).await.unwrap();

    assert_eq!(routed.mode, Mode::BaseModel);
    assert_eq!(routed.domain, Some(Domain::CODE));
    assert_eq!(routed.adapter_used, None);
    assert_eq!(harness.loader.load_count(), 0);
}

#[tokio::test]
async fn confident_base_answer_is_returned() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new("unused", "William Shakespeare.");
    let orchestrator = harness.build(&config(dir.path()), true);

    let routed = orchestrator.route(GENERAL_QUERY, None).await.unwrap();

    assert_eq!(routed.mode, Mode::BaseModel);
    assert_eq!(routed.domain, Some(Domain::GENERAL));
    assert_eq!(routed.response, "William Shakespeare.");
    assert_eq!(routed.fallback_reason, None);
    assert_eq!(harness.search.call_count(), 0);

    let params = harness.base.params().await;
    assert_eq!(params.len(), 1);
    assert_eq!(params[0], WaypointConfig::default().generation.params());
}

#[tokio::test]
async fn uncertain_base_answer_escalates_to_retrieval() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new("Hamlet was written by Shakespeare.", "Sorry, I don't know.");
    let orchestrator = harness.build(&config(dir.path()), true);

    let routed = orchestrator.route(GENERAL_QUERY, None).await.unwrap();

    assert_eq!(routed.mode, Mode::RagFallback);
    assert_eq!(routed.response, "Hamlet was written by Shakespeare.");
    assert_eq!(routed.fallback_reason.as_deref(), Some("i don't know"));
    assert_eq!(
        routed.original_response.as_deref(),
        Some("Sorry, I don't know.")
    );
    assert_eq!(routed.context_used, Some(true));
    assert_eq!(harness.search.call_count(), 1);
    assert_eq!(harness.sink.intents().await, vec!["rag-fallback"]);
}

#[tokio::test]
async fn disabled_fallback_keeps_uncertain_answer() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.fallback.enabled = false;
    let harness = Harness::new("unused", "Sorry, I don't know.");
    let orchestrator = harness.build(&config, true);

    let routed = orchestrator.route(GENERAL_QUERY, None).await.unwrap();

    assert_eq!(routed.mode, Mode::BaseModel);
    assert_eq!(routed.response, "Sorry, I don't know.");
    assert_eq!(harness.search.call_count(), 0);
}

#[tokio::test]
async fn uncertain_answer_without_retrieval_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new("unused", "I don't know.");
    let orchestrator = harness.build(&config(dir.path()), false);

    let routed = orchestrator.route(GENERAL_QUERY, None).await.unwrap();

    assert_eq!(routed.mode, Mode::BaseModel);
    assert_eq!(routed.response, "I don't know.");
}

#[tokio::test]
async fn moderation_rejects_before_any_model_call() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new("answer", "answer");
    let orchestrator = harness
        .build(&config(dir.path()), true)
        .with_moderator(Arc::new(MockModerator::blocking(["rover"])));

    let err = orchestrator.route(NEWS_QUERY, None).await.unwrap_err();

    assert!(matches!(err, WaypointError::PolicyRejection { .. }));
    assert_eq!(harness.chat.call_count().await, 0);
    assert_eq!(harness.search.call_count(), 0);
}

#[tokio::test]
async fn base_model_failure_is_reported_as_routing_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut harness = Harness::new("unused", "unused");
    harness.base = MockGenerator::failing();
    let orchestrator = harness.build(&config(dir.path()), true);

    let err = orchestrator.route(GENERAL_QUERY, None).await.unwrap_err();

    match err {
        WaypointError::Internal(message) => assert_eq!(message, "routing failed"),
        other => panic!("expected internal error, got {other:?}"),
    }
}

#[tokio::test]
async fn semantic_router_is_built_once_embeddings_recover() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new("unused", "base answer");
    harness.embedder.set_failing(true);
    let orchestrator = harness.build(&config(dir.path()), true);

    let routed = orchestrator.route(CODE_QUERY, None).await.unwrap();
    assert_eq!(routed.mode, Mode::BaseModel);
    assert_eq!(routed.domain, Some(Domain::GENERAL));

    harness.embedder.set_failing(false);
    let routed = orchestrator.route(CODE_QUERY, None).await.unwrap();
    assert_eq!(routed.mode, Mode::Adapter);
    assert_eq!(routed.domain, Some(Domain::CODE));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_queries_build_semantic_router_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut harness = Harness::new("unused", "William Shakespeare.");
    harness.embedder = vocabulary().with_delay(Duration::from_millis(100));
    let orchestrator = Arc::new(harness.build(&config(dir.path()), true));

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let orchestrator = Arc::clone(&orchestrator);
        tasks.spawn(async move { orchestrator.route(GENERAL_QUERY, None).await });
    }
    while let Some(joined) = tasks.join_next().await {
        let routed = joined.unwrap().unwrap();
        assert_eq!(routed.domain, Some(Domain::GENERAL));
    }

    // One batch for the exemplars, then one embedding per query.
    assert_eq!(harness.embedder.call_count(), 1 + 8);
}

#[tokio::test]
async fn ambiguous_query_is_adjudicated_then_answered_internally() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new("legal", "Tenants may withhold rent in some cases.");
    let orchestrator = harness.build(&config(&dir.path().join("absent")), true);

    let routed = orchestrator
        .route(
            "Summarize the tenant protections in my lease",
            Some(Intent::SimpleInternal),
        )
        .await
        .unwrap();

    assert_eq!(routed.analysis.source, AnalysisSource::Adjudicator);
    assert_eq!(routed.analysis.intent, Intent::SimpleInternal);
    assert_eq!(routed.mode, Mode::BaseModel);
    assert_eq!(harness.chat.call_count().await, 1);
}

#[tokio::test]
async fn envelope_omits_unset_optional_fields() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new("unused", "William Shakespeare.");
    let orchestrator = harness.build(&config(dir.path()), true);

    let routed = orchestrator.route(GENERAL_QUERY, None).await.unwrap();
    let json = serde_json::to_value(&routed).unwrap();

    assert_eq!(json["mode"], "base-model");
    assert_eq!(json["domain"], "general");
    assert_eq!(json["analysis"]["intent"], "simple_internal");
    assert!(json["analysis"]["latency"].is_f64());
    assert!(json["timestamp"].is_string());
    for absent in [
        "context_used",
        "adapter_used",
        "reasoning_trace",
        "fallback_reason",
        "original_response",
    ] {
        assert!(json.get(absent).is_none(), "{absent} should be omitted");
    }
}

#[tokio::test]
async fn repeated_retrieval_is_served_from_cache() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new("answer", "unused");
    let orchestrator = harness.build(&config(dir.path()), true);

    orchestrator.route(NEWS_QUERY, None).await.unwrap();
    orchestrator.route(NEWS_QUERY, None).await.unwrap();

    assert_eq!(harness.search.call_count(), 1);
    let stats = orchestrator.retrieval_stats().unwrap();
    assert_eq!(stats.cache_size, 1);
}
