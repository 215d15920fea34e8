//! `fewshot retrieve` — Ranked exemplar lookup.

use super::{CmdResult, QueryArgs};
use fewshot_core::embedding::EmbeddingProvider;
use fewshot_core::request::RetrievalParams;
use fewshot_corpus::ExemplarRetriever;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, query: &QueryArgs) -> CmdResult {
    let config = super::load_config(config_path)?;
    let embedder = super::embedder(&config);
    let index = super::load_corpus(&config, query.corpus.as_deref(), &embedder).await?;
    let target = super::read_target(&query.target)?;

    let params = RetrievalParams::new(
        query.k.unwrap_or(config.retrieval.k),
        query.dedup.unwrap_or(config.retrieval.dedup_threshold),
    )
    .excluding(query.exclude_ids());

    let vector = embedder.embed(&target).await?;
    let results = ExemplarRetriever::new().retrieve(&index, &vector, &params)?;

    if results.is_empty() {
        println!("   No exemplars retrieved.");
        return Ok(());
    }

    println!("  {:>4}  {:>7}  {:<24}  {}", "rank", "score", "id", "class");
    for result in &results {
        let exemplar = index.get(&result.exemplar_id)?;
        println!(
            "  {:>4}  {:>7.4}  {:<24}  {}",
            result.rank + 1,
            result.similarity_score,
            result.exemplar_id,
            exemplar.class_name
        );
    }

    Ok(())
}
