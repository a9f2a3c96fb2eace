// crates/tojson-core/tests/runner.rs
// ============================================================================
// Module: Action Runner Tests
// Description: End-to-end runner behavior against in-memory dependencies.
// ============================================================================
//! ## Overview
//! Drives [`ActionRunner`] with in-memory inputs, loader, dispatcher, output,
//! and log to check step ordering, target resolution, and failure modes.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Tests use unwrap on deterministic fixtures."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;

use serde_json::json;
use tojson_core::ActionContext;
use tojson_core::ActionError;
use tojson_core::ActionRunner;
use tojson_core::DispatchError;
use tojson_core::DispatchReceipt;
use tojson_core::DispatchRequest;
use tojson_core::DispatchTarget;
use tojson_core::Dispatcher;
use tojson_core::DocumentLoader;
use tojson_core::DocumentRef;
use tojson_core::GitRef;
use tojson_core::InputError;
use tojson_core::LoadError;
use tojson_core::LoadedDocument;
use tojson_core::MapInputProvider;
use tojson_core::MemoryLog;
use tojson_core::MemoryOutputSink;
use tojson_core::RepositoryId;
use tojson_core::RunReport;
use tojson_core::RunnerSettings;
use tojson_core::Timestamp;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

#[derive(Default)]
struct StaticLoader {
    documents: BTreeMap<String, Vec<u8>>,
    requested: Mutex<Vec<String>>,
}

impl StaticLoader {
    fn with(mut self, uri: &str, text: &str) -> Self {
        self.documents.insert(uri.to_string(), text.as_bytes().to_vec());
        self
    }
}

impl DocumentLoader for StaticLoader {
    fn load(&self, reference: &DocumentRef) -> Result<LoadedDocument, LoadError> {
        self.requested.lock().unwrap().push(reference.uri.clone());
        self.documents
            .get(&reference.uri)
            .map(|bytes| LoadedDocument {
                bytes: bytes.clone(),
                content_type: None,
            })
            .ok_or_else(|| LoadError::Failed(format!("not found: {}", reference.uri)))
    }
}

#[derive(Default)]
struct RecordingDispatcher {
    requests: Mutex<Vec<DispatchRequest>>,
}

impl RecordingDispatcher {
    fn requests(&self) -> Vec<DispatchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchReceipt, DispatchError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());
        Ok(DispatchReceipt {
            dispatch_id: format!("recording-{}", requests.len()),
            target: request.target.clone(),
            content_hash: request.payload.content_hash.clone(),
            status: Some(204),
            dispatcher: "recording".to_string(),
            dispatched_at: Timestamp::Logical(requests.len() as u64),
        })
    }
}

struct Harness {
    loader: Arc<StaticLoader>,
    dispatcher: Arc<RecordingDispatcher>,
    output: Arc<MemoryOutputSink>,
    log: Arc<MemoryLog>,
    runner: ActionRunner,
}

fn context() -> ActionContext {
    ActionContext {
        repository: Some(RepositoryId::parse("example/repository").unwrap()),
        git_ref: Some(GitRef::parse("refs/heads/main").unwrap()),
        workspace: Some("/work/repo".into()),
        ..ActionContext::default()
    }
}

fn harness(inputs: MapInputProvider, loader: StaticLoader, settings: RunnerSettings) -> Harness {
    let loader = Arc::new(loader);
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let output = Arc::new(MemoryOutputSink::new());
    let log = Arc::new(MemoryLog::new());
    let runner = ActionRunner::builder()
        .inputs(Arc::new(inputs))
        .context(context())
        .loader(loader.clone())
        .dispatcher(dispatcher.clone())
        .output(output.clone())
        .log(log.clone())
        .settings(settings)
        .build()
        .unwrap();
    Harness {
        loader,
        dispatcher,
        output,
        log,
        runner,
    }
}

fn run(inputs: MapInputProvider) -> (Harness, Result<RunReport, ActionError>) {
    let harness = harness(inputs, StaticLoader::default(), RunnerSettings::default());
    let result = harness.runner.run();
    (harness, result)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn token_only_run_succeeds_without_dispatch() {
    let (harness, result) = run(MapInputProvider::new().with("token", "12345"));
    let report = result.unwrap();
    assert_eq!(report.json, None);
    assert_eq!(report.receipt, None);
    assert_eq!(harness.output.secrets(), vec!["12345".to_string()]);
    assert_eq!(harness.output.output("dispatched").as_deref(), Some("false"));
    assert_eq!(harness.output.output("json"), None);
    assert!(harness.dispatcher.requests().is_empty());
    assert_eq!(harness.log.event_names().first(), Some(&"run_started"));
    assert_eq!(harness.log.event_names().last(), Some(&"run_completed"));
}

#[test]
fn empty_token_is_not_masked() {
    let (harness, result) = run(MapInputProvider::new());
    assert!(result.is_ok());
    assert!(harness.output.secrets().is_empty());
}

#[test]
fn inline_yaml_is_converted_filtered_and_formatted() {
    let inputs = MapInputProvider::new()
        .with("yaml", "matrix:\n  os: [linux, macos]\n")
        .with("filter", "$.matrix")
        .with("format", "canonical");
    let (harness, result) = run(inputs);
    let report = result.unwrap();
    assert_eq!(report.json.as_deref(), Some(r#"{"os":["linux","macos"]}"#));
    assert_eq!(harness.output.output("json").as_deref(), Some(r#"{"os":["linux","macos"]}"#));
}

#[test]
fn yaml_file_is_resolved_against_the_workspace() {
    let loader = StaticLoader::default().with("file:///work/repo/config/app.yml", "name: app\n");
    let inputs = MapInputProvider::new().with("yaml-file", "config/app.yml");
    let harness = harness(inputs, loader, RunnerSettings::default());
    let report = harness.runner.run().unwrap();
    assert_eq!(report.value, Some(json!({"name": "app"})));
    assert_eq!(
        harness.loader.requested.lock().unwrap().clone(),
        vec!["file:///work/repo/config/app.yml".to_string()]
    );
}

#[test]
fn yaml_file_reserved_characters_are_percent_encoded() {
    let loader = StaticLoader::default().with("file:///work/repo/a%23b%3F100%25.yml", "name: app\n");
    let inputs = MapInputProvider::new().with("yaml-file", "a#b?100%.yml");
    let harness = harness(inputs, loader, RunnerSettings::default());
    let report = harness.runner.run().unwrap();
    assert_eq!(report.value, Some(json!({"name": "app"})));
}

#[test]
fn yaml_url_is_loaded_through_the_loader() {
    let loader = StaticLoader::default().with("https://example.com/a.yml", "- 1\n- 2\n");
    let inputs = MapInputProvider::new().with("yaml-url", "https://example.com/a.yml");
    let harness = harness(inputs, loader, RunnerSettings::default());
    assert_eq!(harness.runner.run().unwrap().json.as_deref(), Some("[1,2]"));
}

#[test]
fn multiple_document_inputs_conflict() {
    let (_, result) = run(MapInputProvider::new().with("yaml", "a: 1").with("yaml-url", "https://x"));
    assert!(matches!(result, Err(ActionError::Input(InputError::Conflict(_)))));
}

#[test]
fn workflow_dispatch_sends_stringified_inputs() {
    let inputs = MapInputProvider::new()
        .with("token", "12345")
        .with("yaml", "environment: prod\nreplicas: 3\nflags: {canary: true}\n")
        .with("workflow", "deploy.yml");
    let (harness, result) = run(inputs);
    let report = result.unwrap();

    let requests = harness.dispatcher.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.token.expose(), "12345");
    match &request.target {
        DispatchTarget::Workflow {
            repository,
            workflow,
            git_ref,
        } => {
            assert_eq!(repository.to_string(), "example/repository");
            assert_eq!(workflow.as_str(), "deploy.yml");
            assert_eq!(git_ref.as_str(), "refs/heads/main");
        }
        DispatchTarget::Repository {
            ..
        } => panic!("expected workflow dispatch"),
    }
    assert_eq!(
        serde_json::Value::Object(request.payload.workflow_inputs().unwrap()),
        json!({"environment": "prod", "replicas": "3", "flags": "{\"canary\":true}"})
    );

    assert_eq!(report.receipt.as_ref().map(|r| r.dispatch_id.as_str()), Some("recording-1"));
    assert_eq!(harness.output.output("dispatched").as_deref(), Some("true"));
    assert_eq!(harness.output.output("dispatch-id").as_deref(), Some("recording-1"));
}

#[test]
fn repository_dispatch_uses_input_overrides() {
    let inputs = MapInputProvider::new()
        .with("token", "12345")
        .with("yaml", "version: 1.2.3\n")
        .with("event-type", "release")
        .with("repository", "other/place");
    let (harness, result) = run(inputs);
    result.unwrap();
    let requests = harness.dispatcher.requests();
    assert_eq!(requests[0].target.repository().to_string(), "other/place");
    assert_eq!(
        serde_json::Value::Object(requests[0].payload.client_payload().unwrap()),
        json!({"version": "1.2.3"})
    );
}

#[test]
fn dispatch_requires_a_token() {
    let (harness, result) = run(MapInputProvider::new().with("event-type", "release"));
    assert!(matches!(result, Err(ActionError::Input(InputError::Required(name))) if name == "token"));
    assert!(harness.dispatcher.requests().is_empty());
}

#[test]
fn dry_run_skips_the_dispatcher() {
    let inputs = MapInputProvider::new()
        .with("event-type", "release")
        .with("dry-run", "True");
    let (harness, result) = run(inputs);
    let report = result.unwrap();
    assert!(report.dry_run);
    assert!(report.target.is_some());
    assert!(report.receipt.is_none());
    assert!(harness.dispatcher.requests().is_empty());
    assert_eq!(harness.output.output("dispatched").as_deref(), Some("false"));
    assert!(harness.log.event_names().contains(&"dispatch_skipped"));
}

#[test]
fn invalid_boolean_input_fails() {
    let (_, result) = run(MapInputProvider::new().with("dry-run", "yes"));
    assert!(matches!(result, Err(ActionError::Input(InputError::InvalidBoolean(_)))));
}

#[test]
fn workflow_and_event_type_conflict() {
    let inputs = MapInputProvider::new().with("workflow", "ci.yml").with("event-type", "release");
    let (_, result) = run(inputs);
    assert!(matches!(result, Err(ActionError::Input(InputError::Conflict(_)))));
}

#[test]
fn non_object_payload_is_rejected_for_dispatch() {
    let inputs = MapInputProvider::new()
        .with("token", "12345")
        .with("yaml", "- a\n- b\n")
        .with("event-type", "release");
    let (harness, result) = run(inputs);
    assert!(matches!(result, Err(ActionError::Payload(_))));
    assert!(harness.dispatcher.requests().is_empty());
}

#[test]
fn allowlist_blocks_other_repositories() {
    let settings = RunnerSettings {
        allowed_repositories: Some(BTreeSet::from([RepositoryId::parse("example/repository").unwrap()])),
        ..RunnerSettings::default()
    };
    let inputs = MapInputProvider::new()
        .with("token", "12345")
        .with("event-type", "release")
        .with("repository", "someone/else");
    let harness = harness(inputs, StaticLoader::default(), settings);
    assert!(matches!(harness.runner.run(), Err(ActionError::RepositoryNotAllowed(_))));
    assert!(harness.dispatcher.requests().is_empty());
}

#[test]
fn missing_ref_fails_workflow_dispatch() {
    let result = {
        let inputs = MapInputProvider::new().with("token", "12345").with("workflow", "ci.yml");
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let runner = ActionRunner::builder()
            .inputs(Arc::new(inputs))
            .context(ActionContext {
                repository: Some(RepositoryId::parse("example/repository").unwrap()),
                ..ActionContext::default()
            })
            .loader(Arc::new(StaticLoader::default()))
            .dispatcher(dispatcher)
            .output(Arc::new(MemoryOutputSink::new()))
            .build()
            .unwrap();
        runner.run()
    };
    assert!(matches!(result, Err(ActionError::MissingRef)));
}

#[test]
fn token_never_appears_in_events() {
    let inputs = MapInputProvider::new()
        .with("token", "s3cr3t-token")
        .with("yaml", "a: 1\n")
        .with("event-type", "release");
    let (harness, result) = run(inputs);
    result.unwrap();
    let events = serde_json::to_string(&harness.log.events()).unwrap();
    assert!(!events.contains("s3cr3t-token"));
}

#[test]
fn builder_requires_core_dependencies() {
    assert!(ActionRunner::builder().build().is_err());
}
