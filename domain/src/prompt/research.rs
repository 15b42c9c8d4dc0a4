//! Prompt templates for research runs

use crate::tool::ToolCatalog;

/// Appended to the planning instructions for the final synthesis call.
pub const SYNTHESIS_SUFFIX: &str = "(The tools have already been executed and their outputs provided. \
Summarize the findings comprehensively without calling any more tools.)";

/// Templates for generating research prompts
pub struct ResearchPromptTemplate;

impl ResearchPromptTemplate {
    /// Instructions for the planning tier, listing the available tools.
    pub fn planning_system(catalog: &ToolCatalog) -> String {
        let tool_descriptions = catalog
            .all()
            .map(|t| {
                let params = t
                    .parameters
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("- {}({}): {}", t.name, params, t.description)
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are a research assistant that gathers facts from the web before answering.

## Available Tools

{tool_descriptions}

## Workflow

1. Formulate three broad but distinct search queries for the user's topic.
2. Search the web for each query and collect the most relevant links.
3. Retrieve the text of each link you intend to cite.
4. When you have enough material, stop calling tools.

Before each tool call, write one short line telling the user what you are doing.

## Rules

- Only use the provided tools. Never invent URLs or page content.
- Paraphrase and summarize; do not reproduce page text verbatim.
- If the request needs no external research, answer directly without tools."#
        )
    }

    /// Instructions for the final tier: same context, tools disabled.
    pub fn synthesis_system(catalog: &ToolCatalog) -> String {
        format!("{}\n{}", Self::planning_system(catalog), SYNTHESIS_SUFFIX)
    }
}
