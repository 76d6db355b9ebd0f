//! Prompt assembly for the three generation stages.
//!
//! One builder per stage, each validating its inputs before rendering a
//! deterministic minijinja template. The concept builder composes the
//! citation lookup's output into its prompt; enrichment failure degrades
//! to a citation-less variant rather than failing the assembly.

use minijinja::{Environment, context};
use scriba_core::error::{Result, ScribaError};
use scriba_core::generation::CitationSource;
use std::sync::{Arc, OnceLock};

/// Citations requested per concept prompt.
const MAX_CITATIONS: usize = 5;

const TITLE_TEMPLATE: &str = r#"You are an AI assistant tasked with generating academic research titles based on a provided core idea.

Core principles for title generation:
1. Engaging: the title should attract the reader's attention.
2. Concise: use the fewest possible words while staying descriptive.
3. Descriptive: the title must reflect the main subject, scope and essence of the investigation.
4. Clear: avoid specialized jargon and rarely-used abbreviations unless fundamental to the topic.

User's core idea / research focus:
--- INPUT START ---
{{ idea }}
--- INPUT END ---

Task:
Based on the input above and adhering to all the core principles, generate 3 to 5 distinct and effective academic titles.

Output format:
Each title on its own line. Do NOT number the titles. Do NOT add any introductory or concluding remarks, just the list of titles."#;

const CONCEPT_TEMPLATE: &str = r#"You are an expert academic writer. Write a research concept paper based on the given core idea, research title and the predefined structure below. Keep a formal academic tone, write in paragraph format unless a section specifies otherwise, and make the paper approximately 7 A4 pages (double-spaced, font size 12).

User's core idea / research focus:
--- CORE IDEA START ---
{{ idea }}
--- CORE IDEA END ---

Provided research title: "{{ title }}"
{% if citations %}
Suggested citations to include:
{% for citation in citations %}
- {{ citation }}
{% endfor %}
{% else %}
Note: include relevant academic citations from your own knowledge base.
{% endif %}
Structure and section-by-section instructions:

### Title
Use the provided research title exactly: "{{ title }}"

### 1. Introduction
Hook the reader with the real-world relevance and urgency of the research, define the context of the subject area, and state the general objective. Use 1-2 APA citations.

### 1.1 Background
Provide historical context and the development of the topic, identify key concepts and theories, and show the knowledge gaps that motivate this research. Include 2-3 APA citations.

### 1.2 Statement of the Problem
Define the issue the research addresses, its magnitude, who is affected and how, and end with a justification for conducting the study. Use 1-2 supporting citations.

### 1.3 Objectives
1.3.1 Main objective: one sentence beginning with "The aim of this study is to...".
1.3.2 Specific objectives: an ordered list, each starting with "To determine...", "To design...", "To implement..." or "To test...".

### 1.4 Expected Outcomes
Describe what the research will produce and the expected academic, technical or community benefits for the target beneficiaries.

### References
At least 5 real references in APA 7th edition, all cited in the body. Do not invent references.

Formatting rules: paragraphs only unless specified, academic tone, no bold or italic markup in the output, fluent English."#;

const PROPOSAL_TEMPLATE: &str = r#"You are an expert academic writer. Using the provided concept paper, write a detailed research proposal of 16 to 20 A4 pages, ready for university-level submission. The proposal must be well-organized with clear headings and subheadings, written in a formal academic tone, and must expand on the concept paper rather than restate it.

Core idea:
--- CORE IDEA START ---
{{ idea }}
--- CORE IDEA END ---

Generated title: "{{ title }}"

Existing concept paper (to be expanded upon):
--- CONCEPT PAPER START ---
{{ concept }}
--- CONCEPT PAPER END ---

Structure and section details:

### 1. Introduction
Reintroduce the topic with a fresh hook, real-world context and scholarly background, ending with the research aim. Include at least 2 citations.

### 1.1 Background
Historical development and current status of research in the domain, related theories and technologies, and the gaps or contradictions this study addresses. Use 3-4 citations.

### 1.2 Statement of the Problem
The what, who, why and how of the research problem in paragraph form, including its scale and real implications.

### 1.3 Objectives of the Study
1.3.1 Main objective: one sentence beginning with "The aim of this study is to...".
1.3.2 Specific objectives: an ordered list covering requirements, design, implementation and testing.

### 1.4 Research Scope
1.4.1 System scope: boundaries, functionalities, exclusions. 1.4.2 Geographical scope: where the research applies.

### 1.5 Justification
Academic, social, technical or policy relevance, and the contribution to knowledge, practice or policy.

### 2. Literature Review
2.1 Introduction, 2.2 Historical context, 2.3 Current trends, 2.4 Supporting frameworks, 2.5 Related systems (at least 4 existing systems, each described and evaluated with its gaps, plus their limitations), 2.6 Local context. Use 6-8 real citations.

### 3. Methodology
3.1 Introduction. 3.2 Potential methodologies: discuss SDLC, prototyping, agile and scrum in their own subsections, discarding the unsuitable ones. 3.3 Adopted methodology: describe the chosen methodology in detail with its phases, from planning and requirements gathering through design, development and testing.

### References
Minimum 10 scholarly sources in APA 7th format, all cited in the body text. Do not fabricate sources.

Formatting rules: paragraph format only, no bold or strong text, academic well-structured English throughout.

Begin writing the full proposal now."#;

static TEMPLATES: OnceLock<Environment<'static>> = OnceLock::new();

fn environment() -> &'static Environment<'static> {
    TEMPLATES.get_or_init(|| {
        let mut env = Environment::new();
        env.add_template("title", TITLE_TEMPLATE)
            .expect("title template parses");
        env.add_template("concept", CONCEPT_TEMPLATE)
            .expect("concept template parses");
        env.add_template("proposal", PROPOSAL_TEMPLATE)
            .expect("proposal template parses");
        env
    })
}

fn render(name: &str, ctx: minijinja::Value) -> Result<String> {
    let template = environment()
        .get_template(name)
        .map_err(|err| ScribaError::internal(format!("unknown template {name}: {err}")))?;
    template
        .render(ctx)
        .map_err(|err| ScribaError::internal(format!("failed to render {name} prompt: {err}")))
}

/// A multi-line title candidate may carry alternates; only its first line
/// is embedded into downstream prompts.
fn primary_title(title: &str) -> &str {
    title.lines().next().unwrap_or("").trim()
}

/// Builds the per-stage prompts handed to the generation gateway.
///
/// Builders are deterministic given identical inputs and enrichment
/// results, never mutate session state, and know nothing about the
/// gateway.
pub struct PromptAssembler {
    citations: Arc<dyn CitationSource>,
}

impl PromptAssembler {
    pub fn new(citations: Arc<dyn CitationSource>) -> Self {
        Self { citations }
    }

    /// Builds the title-generation prompt.
    ///
    /// # Errors
    ///
    /// `Validation` when the idea is empty or whitespace.
    pub fn build_title_prompt(idea: &str) -> Result<String> {
        let idea = idea.trim();
        if idea.is_empty() {
            return Err(ScribaError::validation(
                "core idea is empty, cannot generate titles",
            ));
        }
        render("title", context! { idea })
    }

    /// Builds the concept-paper prompt, enriched with citations fetched
    /// for the chosen title and idea. Enrichment is best-effort: an empty
    /// citation list renders the citation-less variant of the template.
    ///
    /// # Errors
    ///
    /// `Validation` when the idea or the title is empty.
    pub async fn build_concept_prompt(&self, idea: &str, title: &str) -> Result<String> {
        let idea = idea.trim();
        if idea.is_empty() {
            return Err(ScribaError::validation("core idea is empty"));
        }
        let title = primary_title(title);
        if title.is_empty() {
            return Err(ScribaError::validation("a generated title is required"));
        }

        let query = format!("{title} {idea}");
        let citations: Vec<String> = self
            .citations
            .fetch_citations(&query, MAX_CITATIONS)
            .await
            .iter()
            .map(|citation| citation.to_string())
            .collect();
        tracing::debug!(count = citations.len(), "citations fetched for concept prompt");

        render("concept", context! { idea, title, citations })
    }

    /// Builds the full-proposal prompt from the idea, the chosen title and
    /// the concept paper.
    ///
    /// # Errors
    ///
    /// `Validation` when any of the three inputs is empty.
    pub fn build_proposal_prompt(idea: &str, title: &str, concept: &str) -> Result<String> {
        let idea = idea.trim();
        if idea.is_empty() {
            return Err(ScribaError::validation("core idea is missing"));
        }
        let title = primary_title(title);
        if title.is_empty() {
            return Err(ScribaError::validation("title is missing"));
        }
        let concept = concept.trim();
        if concept.is_empty() {
            return Err(ScribaError::validation("concept paper is missing"));
        }

        render("proposal", context! { idea, title, concept })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriba_core::citation::Citation;

    struct FixedCitations(Vec<Citation>);

    #[async_trait::async_trait]
    impl CitationSource for FixedCitations {
        async fn fetch_citations(&self, _topic: &str, limit: usize) -> Vec<Citation> {
            self.0.iter().take(limit).cloned().collect()
        }
    }

    fn sample_citation() -> Citation {
        Citation {
            authors: vec!["Okello, P.".to_string()],
            year: Some(2020),
            title: "Mobile Money Adoption".to_string(),
            venue: Some("World Development".to_string()),
            doi: None,
        }
    }

    #[test]
    fn title_prompt_embeds_the_idea() {
        let prompt = PromptAssembler::build_title_prompt("impact of mobile money").unwrap();
        assert!(prompt.contains("impact of mobile money"));
        assert!(prompt.contains("3 to 5"));
        assert!(prompt.contains("Do NOT number the titles"));
    }

    #[test]
    fn empty_idea_fails_title_prompt() {
        assert!(PromptAssembler::build_title_prompt("   ").unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn concept_prompt_embeds_idea_title_and_citations() {
        let assembler = PromptAssembler::new(Arc::new(FixedCitations(vec![sample_citation()])));
        let prompt = assembler
            .build_concept_prompt("mobile money idea", "A Study of Mobile Money")
            .await
            .unwrap();

        assert!(prompt.contains("mobile money idea"));
        assert!(prompt.contains("\"A Study of Mobile Money\""));
        assert!(prompt.contains("Suggested citations to include:"));
        assert!(prompt.contains("Okello, P. (2020). Mobile Money Adoption."));
        assert!(!prompt.contains("knowledge base"));
    }

    #[tokio::test]
    async fn concept_prompt_degrades_when_enrichment_returns_nothing() {
        // A failed lookup and an empty result are indistinguishable by
        // contract: both yield an empty list.
        let assembler = PromptAssembler::new(Arc::new(FixedCitations(Vec::new())));
        let prompt = assembler
            .build_concept_prompt("mobile money idea", "A Study of Mobile Money")
            .await
            .unwrap();

        assert!(prompt.contains("mobile money idea"));
        assert!(prompt.contains("A Study of Mobile Money"));
        assert!(prompt.contains("your own knowledge base"));
        assert!(!prompt.contains("Suggested citations"));
    }

    #[tokio::test]
    async fn concept_prompt_requires_both_inputs() {
        let assembler = PromptAssembler::new(Arc::new(FixedCitations(Vec::new())));
        assert!(
            assembler
                .build_concept_prompt("", "A Study of Mobile Money")
                .await
                .unwrap_err()
                .is_validation()
        );
        assert!(
            assembler
                .build_concept_prompt("idea", "  ")
                .await
                .unwrap_err()
                .is_validation()
        );
    }

    #[tokio::test]
    async fn concept_prompt_uses_only_the_first_title_line() {
        let assembler = PromptAssembler::new(Arc::new(FixedCitations(Vec::new())));
        let prompt = assembler
            .build_concept_prompt("idea text here", "Primary Title\nAlternate Title")
            .await
            .unwrap();
        assert!(prompt.contains("\"Primary Title\""));
        assert!(!prompt.contains("Alternate Title"));
    }

    #[test]
    fn proposal_prompt_embeds_all_three_inputs() {
        let prompt = PromptAssembler::build_proposal_prompt(
            "mobile money idea",
            "A Study of Mobile Money",
            "the concept paper body",
        )
        .unwrap();

        assert!(prompt.contains("mobile money idea"));
        assert!(prompt.contains("\"A Study of Mobile Money\""));
        assert!(prompt.contains("the concept paper body"));
        assert!(prompt.contains("16 to 20 A4 pages"));
    }

    #[test]
    fn proposal_prompt_requires_every_input() {
        for (idea, title, concept) in [
            ("", "title long enough", "concept"),
            ("idea", "", "concept"),
            ("idea", "title long enough", "  "),
        ] {
            let err =
                PromptAssembler::build_proposal_prompt(idea, title, concept).unwrap_err();
            assert!(err.is_validation());
        }
    }

    #[test]
    fn builders_are_deterministic() {
        let a = PromptAssembler::build_title_prompt("same idea").unwrap();
        let b = PromptAssembler::build_title_prompt("same idea").unwrap();
        assert_eq!(a, b);
    }
}
