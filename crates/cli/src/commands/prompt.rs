//! `fewshot prompt` — Build a budgeted few-shot prompt.

use super::{CmdResult, QueryArgs};
use fewshot_core::message::PromptDocument;
use fewshot_core::request::PromptRequest;
use fewshot_corpus::CorpusHandle;
use fewshot_prompt::PromptOutcome;
use std::path::Path;

pub async fn run(
    config_path: Option<&Path>,
    query: &QueryArgs,
    budget: Option<usize>,
    output: Option<&Path>,
) -> CmdResult {
    let config = super::load_config(config_path)?;
    let embedder = super::embedder(&config);
    let index = super::load_corpus(&config, query.corpus.as_deref(), &embedder).await?;
    let corpus = CorpusHandle::new(index);
    let pipeline = super::pipeline(&config)?;

    let target = super::read_target(&query.target)?;
    let request = PromptRequest::new(
        target,
        query.k.unwrap_or(config.retrieval.k),
        budget.unwrap_or(config.prompt.budget),
        query.dedup.unwrap_or(config.retrieval.dedup_threshold),
    )
    .excluding(query.exclude_ids());

    let outcome = pipeline.build(&corpus, &embedder, &request).await?;

    match output {
        Some(path) => {
            std::fs::write(path, outcome.document.messages_to_json()?)
                .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
            println!("{}", summary(&outcome, request.budget));
            println!("  Written to: {}", path.display());
        }
        None => {
            print!("{}", render(&outcome.document));
            eprintln!("{}", summary(&outcome, request.budget));
        }
    }

    Ok(())
}

fn summary(outcome: &PromptOutcome, budget: usize) -> String {
    let doc = &outcome.document;
    format!(
        "✅ {} example(s) used, {} dropped for budget, length {}/{} ({})",
        doc.num_examples_used,
        doc.examples_dropped_for_budget,
        outcome.prompt_len,
        budget,
        &doc.content_hash()[..12]
    )
}

/// Human-readable rendering: one delimited section per message.
fn render(document: &PromptDocument) -> String {
    let mut out = String::new();
    for message in &document.messages {
        out.push_str(&format!("──── {} ────\n", message.role));
        out.push_str(&message.content);
        out.push_str("\n\n");
    }
    out
}
