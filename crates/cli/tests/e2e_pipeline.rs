//! End-to-end tests for the fewshot pipeline.
//!
//! These tests exercise the full path from a JSONL corpus on disk and a config
//! file to a persisted prompt artifact: loading, indexing, embedding,
//! retrieval, budgeted selection, and assembly.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use fewshot_config::AppConfig;
use fewshot_core::embedding::EmbeddingProvider;
use fewshot_core::error::{EmbeddingError, Error};
use fewshot_core::exemplar::ExemplarId;
use fewshot_core::message::{PromptDocument, Role};
use fewshot_core::request::PromptRequest;
use fewshot_corpus::{build_index, read_jsonl, CorpusHandle, HashingEmbedder, LoadError, LoadMode};
use fewshot_prompt::{FewShotPipeline, LengthUnit, PromptAssembler};

// ── Fixtures ─────────────────────────────────────────────────────────────

const TARGET: &str = "class Adder:\n    def add(self, a, b): ...";

fn record(id: &str, class: &str, skeleton: &str, implementation: &str, vector: Option<&[f32]>) -> String {
    let mut value = serde_json::json!({
        "id": id,
        "class_name": class,
        "skeleton": skeleton,
        "implementation": implementation,
        "metadata": {"language": "python", "source": "e2e"},
    });
    if let Some(v) = vector {
        value["vector"] = serde_json::json!(v);
    }
    value.to_string()
}

/// Corpus with precomputed 3-d vectors. Against `[1, 0, 0]`:
/// Calculator 0.95, Calculator2 ≈ 0.95 (near-duplicate), Multiplier 0.90, Logger 0.10.
fn vector_corpus() -> String {
    [
        record(
            "Calculator",
            "Calculator",
            "class Calculator:\n    def add(self, a, b): ...",
            "class Calculator:\n    def add(self, a, b):\n        return a + b",
            Some(&[0.95, 0.312_249_9, 0.0]),
        ),
        record(
            "Calculator2",
            "Calculator",
            "class Calculator:\n    def add(self, x, y): ...",
            "class Calculator:\n    def add(self, x, y):\n        return x + y",
            Some(&[0.949, 0.315, 0.0]),
        ),
        record(
            "Multiplier",
            "Multiplier",
            "class Multiplier:\n    def mul(self, a, b): ...",
            "class Multiplier:\n    def mul(self, a, b):\n        return a * b",
            Some(&[0.90, -0.2, 0.387_298_3]),
        ),
        record(
            "Logger",
            "Logger",
            "class Logger:\n    def log(self, msg): ...",
            "class Logger:\n    def log(self, msg):\n        print(msg)",
            Some(&[0.1, 0.0, 0.994_987_4]),
        ),
    ]
    .join("\n")
}

/// Corpus without vectors; the hashing embedder indexes it.
fn text_corpus() -> String {
    [
        record(
            "calc",
            "Calculator",
            "class Calculator:\n    def add(self, a, b): ...\n    def sub(self, a, b): ...",
            "class Calculator:\n    def add(self, a, b):\n        return a + b\n    def sub(self, a, b):\n        return a - b",
            None,
        ),
        record(
            "stack",
            "Stack",
            "class Stack:\n    def push(self, item): ...\n    def pop(self): ...",
            "class Stack:\n    def __init__(self):\n        self.items = []\n    def push(self, item):\n        self.items.append(item)\n    def pop(self):\n        return self.items.pop()",
            None,
        ),
        record(
            "parser",
            "HttpRequestParser",
            "class HttpRequestParser:\n    def parse_header(self, line): ...",
            "class HttpRequestParser:\n    def parse_header(self, line):\n        key, _, value = line.partition(':')\n        return key.strip(), value.strip()",
            None,
        ),
    ]
    .join("\n")
}

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

/// Embedder that maps any text to the same fixed vector.
struct FixedEmbedder(Vec<f32>);

#[async_trait::async_trait]
impl EmbeddingProvider for FixedEmbedder {
    fn name(&self) -> &str {
        "fixed"
    }

    fn dimension(&self) -> usize {
        self.0.len()
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.0.clone())
    }
}

async fn vector_handle(dir: &Path) -> CorpusHandle {
    let path = write_file(dir, "corpus.jsonl", &vector_corpus());
    let records = read_jsonl(&path, LoadMode::Strict).unwrap();
    let index = build_index(records, &FixedEmbedder(vec![1.0, 0.0, 0.0])).await.unwrap();
    CorpusHandle::new(index)
}

// ── Tests ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_jsonl_to_prompt_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let handle = vector_handle(dir.path()).await;
    let embedder = FixedEmbedder(vec![1.0, 0.0, 0.0]);

    let request = PromptRequest::new(TARGET, 3, 10_000, 0.95);
    let outcome = FewShotPipeline::default()
        .build(&handle, &embedder, &request)
        .await
        .unwrap();

    // Calculator2 collapses into Calculator; Logger fills the third slot.
    let ids: Vec<String> = outcome.retrieved.iter().map(|r| r.exemplar_id.to_string()).collect();
    assert_eq!(ids, vec!["Calculator", "Multiplier", "Logger"]);
    assert_eq!(outcome.document.num_examples_used, 3);

    let artifact = write_file(dir.path(), "prompt.json", &outcome.document.messages_to_json().unwrap());
    let messages = PromptDocument::messages_from_json(&std::fs::read_to_string(artifact).unwrap()).unwrap();
    assert_eq!(messages, outcome.document.messages);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[1].role, Role::User);
}

#[tokio::test]
async fn e2e_budget_trims_lowest_ranked() {
    let dir = tempfile::tempdir().unwrap();
    let handle = vector_handle(dir.path()).await;
    let embedder = FixedEmbedder(vec![1.0, 0.0, 0.0]);
    let pipeline = FewShotPipeline::default();

    let full = pipeline
        .build(&handle, &embedder, &PromptRequest::new(TARGET, 3, 10_000, 0.95))
        .await
        .unwrap();

    // One char short of the full prompt: the last exemplar must go.
    let tight = pipeline
        .build(&handle, &embedder, &PromptRequest::new(TARGET, 3, full.prompt_len - 1, 0.95))
        .await
        .unwrap();
    assert_eq!(tight.document.num_examples_used, 2);
    assert_eq!(tight.document.examples_dropped_for_budget, 1);
    assert!(tight.prompt_len < full.prompt_len);
    assert!(!tight.document.messages[1].content.contains("class Logger"));
}

#[tokio::test]
async fn e2e_exclusions_and_zero_shot() {
    let dir = tempfile::tempdir().unwrap();
    let handle = vector_handle(dir.path()).await;
    let embedder = FixedEmbedder(vec![1.0, 0.0, 0.0]);

    let request = PromptRequest::new(TARGET, 4, 10_000, 1.0).excluding(
        ["Calculator", "Calculator2", "Multiplier", "Logger"].map(ExemplarId::from),
    );
    let outcome = FewShotPipeline::default()
        .build(&handle, &embedder, &request)
        .await
        .unwrap();
    assert!(outcome.retrieved.is_empty());
    assert!(outcome.document.is_zero_shot());
    assert!(outcome.document.messages[1].content.contains(TARGET));
}

#[tokio::test]
async fn e2e_hashing_embedder_with_config() {
    let dir = tempfile::tempdir().unwrap();
    let corpus_path = write_file(dir.path(), "corpus.jsonl", &text_corpus());
    let config_path = write_file(
        dir.path(),
        "config.toml",
        &format!(
            "[corpus]\npath = {:?}\n\n[retrieval]\nk = 2\n\n[prompt]\nbudget = 4000\nlength_unit = \"tokens\"\npersona_role = \"assistant\"\n\n[embedding]\ndimension = 64\n",
            corpus_path.display().to_string()
        ),
    );

    let config = AppConfig::load_from(&config_path).unwrap();
    let embedder = HashingEmbedder::new(config.embedding.dimension);
    let records = read_jsonl(config.corpus.path.as_deref().unwrap(), LoadMode::Strict).unwrap();
    let handle = CorpusHandle::new(build_index(records, &embedder).await.unwrap());
    assert_eq!(handle.snapshot().dimension(), Some(64));

    let pipeline = FewShotPipeline::new(PromptAssembler::new().with_persona_role(Role::Assistant))
        .with_length_unit(config.prompt.length_unit.parse::<LengthUnit>().unwrap());
    let request = PromptRequest::new(
        TARGET,
        config.retrieval.k,
        config.prompt.budget,
        config.retrieval.dedup_threshold,
    );
    let outcome = pipeline.build(&handle, &embedder, &request).await.unwrap();

    assert_eq!(outcome.retrieved.len(), 2);
    assert!(outcome.prompt_len <= config.prompt.budget);
    assert_eq!(outcome.document.messages[0].role, Role::Assistant);

    // Same corpus, same request: byte-identical prompt.
    let again = pipeline.build(&handle, &embedder, &request).await.unwrap();
    assert_eq!(outcome.document.content_hash(), again.document.content_hash());
}

#[tokio::test]
async fn e2e_malformed_corpus_line() {
    let dir = tempfile::tempdir().unwrap();
    let content = format!("{}\n{{not json\n", vector_corpus());
    let path = write_file(dir.path(), "corpus.jsonl", &content);

    let strict = read_jsonl(&path, LoadMode::Strict);
    assert!(matches!(strict, Err(LoadError::Parse { line: 5, .. })));

    let lenient = read_jsonl(&path, LoadMode::Lenient).unwrap();
    assert_eq!(lenient.len(), 4);
}

#[tokio::test]
async fn e2e_snapshot_isolated_from_reload() {
    let dir = tempfile::tempdir().unwrap();
    let handle = Arc::new(vector_handle(dir.path()).await);
    let before = handle.snapshot();

    let records = read_jsonl(&write_file(dir.path(), "small.jsonl", &text_corpus()), LoadMode::Strict).unwrap();
    let replaced = build_index(records, &HashingEmbedder::new(16)).await.unwrap();
    handle.swap(replaced);

    assert_eq!(before.len(), 4);
    assert_eq!(handle.snapshot().len(), 3);

    // A request against the new corpus fails cleanly on a wrong-dimension embedder.
    let err = FewShotPipeline::default()
        .with_embed_timeout(Duration::from_secs(5))
        .build(&handle, &FixedEmbedder(vec![1.0, 0.0, 0.0]), &PromptRequest::new(TARGET, 2, 10_000, 0.9))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Corpus(_)));
}
