//! Subcommand implementations and the setup they share.

pub mod config_cmd;
pub mod prompt;
pub mod retrieve;
pub mod stats;

use clap::Args;
use fewshot_config::AppConfig;
use fewshot_core::exemplar::ExemplarId;
use fewshot_core::message::Role;
use fewshot_corpus::{build_index, read_jsonl, CorpusIndex, HashingEmbedder, LoadMode};
use fewshot_prompt::{FewShotPipeline, LengthUnit, PromptAssembler};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Arguments shared by `retrieve` and `prompt`.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// JSONL corpus file (overrides config)
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// File holding the target skeleton, or `-` for stdin
    #[arg(long)]
    pub target: PathBuf,

    /// Maximum number of exemplars to retrieve (overrides config)
    #[arg(short)]
    pub k: Option<usize>,

    /// Similarity above which two exemplars count as duplicates (overrides config)
    #[arg(long)]
    pub dedup: Option<f32>,

    /// Exemplar ids to leave out (numeric values match integer ids)
    #[arg(long, num_args = 1..)]
    pub exclude: Vec<String>,
}

impl QueryArgs {
    pub fn exclude_ids(&self) -> impl Iterator<Item = ExemplarId> + '_ {
        self.exclude.iter().map(|id| ExemplarId::parse(id))
    }
}

/// Load the config from `--config` if given, otherwise from the default location.
pub fn load_config(path: Option<&Path>) -> CmdResult<AppConfig> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                return Err(format!("Config file not found: {}", path.display()).into());
            }
            let mut config = AppConfig::load_from(path)?;
            config.apply_overrides(|key| std::env::var(key).ok())?;
            config.validate()?;
            config
        }
        None => AppConfig::load()?,
    };
    Ok(config)
}

pub fn embedder(config: &AppConfig) -> HashingEmbedder {
    HashingEmbedder::new(config.embedding.dimension)
}

/// Read and index the corpus named on the command line or in the config.
pub async fn load_corpus(
    config: &AppConfig,
    corpus: Option<&Path>,
    embedder: &HashingEmbedder,
) -> CmdResult<CorpusIndex> {
    let path = corpus
        .or(config.corpus.path.as_deref())
        .ok_or("No corpus given: pass --corpus or set corpus.path / FEWSHOT_CORPUS")?;
    let mode = if config.corpus.lenient {
        LoadMode::Lenient
    } else {
        LoadMode::Strict
    };
    tracing::debug!(path = %path.display(), ?mode, "Loading corpus");

    let records = read_jsonl(path, mode)?;
    let index = build_index(records, embedder).await?;
    Ok(index)
}

pub fn read_target(path: &Path) -> CmdResult<String> {
    let target = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read target {}: {e}", path.display()))?
    };
    Ok(target)
}

/// Build the pipeline described by the `prompt` and `embedding` sections.
pub fn pipeline(config: &AppConfig) -> CmdResult<FewShotPipeline> {
    let role = match config.prompt.persona_role.as_str() {
        "assistant" => Role::Assistant,
        _ => Role::System,
    };
    let mut assembler = PromptAssembler::new().with_persona_role(role);
    if let Some(preamble) = &config.prompt.preamble {
        assembler = assembler.with_preamble(preamble.as_str());
    }
    if let Some(instruction) = &config.prompt.instruction {
        assembler = assembler.with_instruction(instruction.as_str());
    }

    let unit: LengthUnit = config.prompt.length_unit.parse()?;
    Ok(FewShotPipeline::new(assembler)
        .with_length_unit(unit)
        .with_embed_timeout(Duration::from_secs(config.embedding.timeout_secs)))
}
