//! `fewshot stats` — Corpus summary.

use super::CmdResult;
use fewshot_corpus::CorpusIndex;
use std::collections::BTreeMap;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, corpus: Option<&Path>) -> CmdResult {
    let config = super::load_config(config_path)?;
    let embedder = super::embedder(&config);
    let index = super::load_corpus(&config, corpus, &embedder).await?;

    println!("📚 Corpus Statistics");
    println!("====================");
    println!("  Exemplars:  {}", index.len());
    match index.dimension() {
        Some(d) => println!("  Dimension:  {d}"),
        None => println!("  Dimension:  (empty corpus)"),
    }

    for (language, classes) in classes_by_language(&index) {
        println!();
        println!("  {language} ({})", classes.len());
        for class in classes {
            println!("    - {class}");
        }
    }

    Ok(())
}

/// Class names grouped by `metadata.language`, sorted within each group.
fn classes_by_language(index: &CorpusIndex) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (exemplar, _) in index.all() {
        let language = exemplar
            .metadata
            .language
            .clone()
            .unwrap_or_else(|| "unknown".into());
        groups
            .entry(language)
            .or_default()
            .push(exemplar.class_name.clone());
    }
    for classes in groups.values_mut() {
        classes.sort();
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use fewshot_core::exemplar::{Exemplar, ExemplarMetadata};

    #[test]
    fn groups_by_language() {
        let mut index = CorpusIndex::new();
        let python = ExemplarMetadata {
            language: Some("python".into()),
            ..ExemplarMetadata::default()
        };
        index
            .add(
                Exemplar::new("b", "Stack", "s", "i").with_metadata(python.clone()),
                vec![1.0, 0.0],
            )
            .unwrap();
        index
            .add(
                Exemplar::new("a", "Queue", "s", "i").with_metadata(python),
                vec![0.0, 1.0],
            )
            .unwrap();
        index.add(Exemplar::new("c", "Heap", "s", "i"), vec![1.0, 1.0]).unwrap();

        let groups = classes_by_language(&index);
        assert_eq!(groups["python"], vec!["Queue", "Stack"]);
        assert_eq!(groups["unknown"], vec!["Heap"]);
    }
}
