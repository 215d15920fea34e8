//! Prompt assembly — turn a target skeleton and ranked exemplars into messages.
//!
//! The document always has exactly two messages:
//!
//! 1. **Persona preamble** (system or assistant role), constant per assembler
//! 2. **Request** (user role): each exemplar as a labeled skeleton /
//!    implementation block in the order supplied, then the target skeleton and
//!    the generation instruction
//!
//! With no exemplars the request holds only the target block (zero-shot).
//!
//! # Determinism
//!
//! Message content depends only on the assembler's fixed texts, the target
//! skeleton and the ordered exemplars. No ids, timestamps or randomness are
//! involved, so identical inputs give byte-identical output.
//!
//! # Budget accounting
//!
//! The request message is a plain concatenation of independently rendered
//! blocks. [`PromptAssembler::fixed_overhead_len`] and
//! [`PromptAssembler::example_len`] measure exactly those blocks, so a
//! selection that fits the budget renders to a document that fits too.

use crate::length::LengthUnit;
use fewshot_core::error::AssemblyError;
use fewshot_core::exemplar::Exemplar;
use fewshot_core::message::{PromptDocument, PromptMessage, Role};

/// Default persona preamble.
pub const DEFAULT_PREAMBLE: &str = "You are an expert software engineer. \
You are given code skeletons: classes and functions whose signatures are declared \
but whose bodies are missing. Solved examples show a skeleton followed by its complete \
implementation. Write a complete, working implementation of the target skeleton, \
keeping every declared name and signature unchanged.";

/// Default instruction appended after the target skeleton.
pub const DEFAULT_INSTRUCTION: &str = "Implement every missing body in the target skeleton above. \
Respond with the complete implementation only.";

/// Stateless assembler. Create one and reuse it.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    preamble: String,
    instruction: String,
    persona_role: Role,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptAssembler {
    /// Assembler with the default preamble, instruction and persona role.
    ///
    /// The persona message goes out as `system`, the slot chat-completion
    /// APIs reserve for standing instructions. Use
    /// [`with_persona_role`](Self::with_persona_role) to send it as
    /// `assistant` instead.
    pub fn new() -> Self {
        Self {
            preamble: DEFAULT_PREAMBLE.to_string(),
            instruction: DEFAULT_INSTRUCTION.to_string(),
            persona_role: Role::System,
        }
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    pub fn with_persona_role(mut self, role: Role) -> Self {
        self.persona_role = role;
        self
    }

    pub fn persona_role(&self) -> Role {
        self.persona_role
    }

    /// Reject empty or whitespace-only skeletons.
    pub fn check_target(&self, target_skeleton: &str) -> Result<(), AssemblyError> {
        if target_skeleton.trim().is_empty() {
            return Err(AssemblyError::EmptyTargetSkeleton);
        }
        Ok(())
    }

    /// Build the two-message document.
    ///
    /// `examples_dropped_for_budget` is left at 0; the caller that ran the
    /// selection fills it in.
    pub fn build_messages(
        &self,
        target_skeleton: &str,
        selected_examples: &[&Exemplar],
    ) -> Result<PromptDocument, AssemblyError> {
        self.check_target(target_skeleton)?;

        let mut request = String::new();
        for (i, exemplar) in selected_examples.iter().enumerate() {
            request.push_str(&render_example(i + 1, exemplar));
        }
        request.push_str(&self.render_target(target_skeleton));

        Ok(PromptDocument {
            messages: vec![
                PromptMessage::new(self.persona_role, self.preamble.clone()),
                PromptMessage::user(request),
            ],
            num_examples_used: selected_examples.len(),
            examples_dropped_for_budget: 0,
        })
    }

    /// Length of everything that is present regardless of exemplars:
    /// the preamble plus the target block.
    pub fn fixed_overhead_len(&self, target_skeleton: &str, unit: LengthUnit) -> usize {
        unit.measure(&self.preamble) + unit.measure(&self.render_target(target_skeleton))
    }

    /// Length of the block for `exemplar` at 1-based `position`.
    pub fn example_len(&self, position: usize, exemplar: &Exemplar, unit: LengthUnit) -> usize {
        unit.measure(&render_example(position, exemplar))
    }

    fn render_target(&self, target_skeleton: &str) -> String {
        format!(
            "### Target\n#### Skeleton\n{}\n\n{}",
            target_skeleton.trim_end(),
            self.instruction
        )
    }
}

fn render_example(position: usize, exemplar: &Exemplar) -> String {
    format!(
        "### Example {n}: {class}\n#### Skeleton\n{skeleton}\n#### Implementation\n{implementation}\n### End Example {n}\n\n",
        n = position,
        class = exemplar.class_name,
        skeleton = exemplar.skeleton.trim_end(),
        implementation = exemplar.implementation.trim_end(),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────
