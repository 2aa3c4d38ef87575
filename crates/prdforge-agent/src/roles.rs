// ABOUTME: Role framing for every LLM call prdforge makes: analysts, synthesizer, PRD writer, QA engineer.
// ABOUTME: Each role has a label, a system prompt and the sampling temperature it runs at.

use serde::{Deserialize, Serialize};

/// Identifies the persona an LLM call is framed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentRole {
    GitHubAnalyst,
    ProductAnalyst,
    TechnicalAnalyst,
    BusinessAnalyst,
    Synthesizer,
    PrdWriter,
    QaEngineer,
    Summarizer,
}

/// The three specialists whose answers the synthesizer merges, in call order.
pub const ANALYSTS: [AgentRole; 3] = [
    AgentRole::ProductAnalyst,
    AgentRole::TechnicalAnalyst,
    AgentRole::BusinessAnalyst,
];

impl AgentRole {
    /// Human-readable title, used in prompts and synthesis headers.
    pub fn title(&self) -> &'static str {
        match self {
            AgentRole::GitHubAnalyst => "GitHub Activity Analyst",
            AgentRole::ProductAnalyst => "Product Analyst",
            AgentRole::TechnicalAnalyst => "Technical Analyst",
            AgentRole::BusinessAnalyst => "Business Analyst",
            AgentRole::Synthesizer => "Senior Product Manager",
            AgentRole::PrdWriter => "Senior Product Manager",
            AgentRole::QaEngineer => "QA Engineer",
            AgentRole::Summarizer => "Output Formatter",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgentRole::GitHubAnalyst => "github_analyst",
            AgentRole::ProductAnalyst => "product_analyst",
            AgentRole::TechnicalAnalyst => "technical_analyst",
            AgentRole::BusinessAnalyst => "business_analyst",
            AgentRole::Synthesizer => "synthesizer",
            AgentRole::PrdWriter => "prd_writer",
            AgentRole::QaEngineer => "qa_engineer",
            AgentRole::Summarizer => "summarizer",
        }
    }

    /// Document generation runs cooler than analysis; summaries coolest.
    pub fn temperature(&self) -> f32 {
        match self {
            AgentRole::PrdWriter | AgentRole::QaEngineer => 0.2,
            AgentRole::Summarizer => 0.1,
            _ => 0.3,
        }
    }

    pub fn system_prompt(&self) -> String {
        match self {
            AgentRole::GitHubAnalyst => format!(
                "You are a {}. Generate a comprehensive daily report based on the provided \
                 repository data.\n\n\
                 Include:\n\
                 1. Executive Summary\n\
                 2. Commit Activity Analysis\n\
                 3. Pull Request Status\n\
                 4. Developer Contributions\n\
                 5. Code Quality Insights\n\
                 6. Recommendations\n\n\
                 Format the report professionally in markdown with clear sections and actionable insights.",
                self.title()
            ),
            AgentRole::ProductAnalyst => format!(
                "You are a {}. Analyze the provided product data and identify:\n\
                 1. Core product goals and objectives\n\
                 2. Key constraints and limitations\n\
                 3. Potential edge cases and risks\n\
                 4. Strategic recommendations\n\n\
                 Focus on business value, user needs, and market positioning.",
                self.title()
            ),
            AgentRole::TechnicalAnalyst => format!(
                "You are a {}. Analyze the provided data for:\n\
                 1. Technical feasibility and constraints\n\
                 2. Architecture considerations\n\
                 3. Performance and scalability issues\n\
                 4. Integration challenges\n\
                 5. Security and compliance requirements\n\n\
                 Focus on technical implementation details and system design.",
                self.title()
            ),
            AgentRole::BusinessAnalyst => format!(
                "You are a {}. Analyze the business impact including:\n\
                 1. Revenue impact and monetization opportunities\n\
                 2. Cost implications and resource requirements\n\
                 3. Market positioning and competitive advantage\n\
                 4. Risk assessment and mitigation strategies\n\
                 5. ROI projections and success metrics\n\n\
                 Focus on business outcomes and financial implications.",
                self.title()
            ),
            AgentRole::Synthesizer => format!(
                "You are a {} synthesizing analysis from multiple specialists.\n\n\
                 Based on the analyses from the Product Analyst, Technical Analyst and Business \
                 Analyst, write a synthesis with exactly these markdown sections, each a bullet \
                 list unless noted:\n\
                 ## Goals\n\
                 ## Constraints\n\
                 ## Edge Cases\n\
                 ## Follow-up Questions\n\
                 ## Impact Analysis (short paragraphs on growth, revenue, user experience and technical debt)\n\
                 ## Recommendations (prioritized)",
                self.title()
            ),
            AgentRole::PrdWriter => format!(
                "You are a {} creating a comprehensive Product Requirements Document (PRD).\n\n\
                 Start with a line `# Title: <product title>`, then write these markdown sections:\n\
                 ## Overview (a short paragraph)\n\
                 ## Objectives\n\
                 ## Success Metrics\n\
                 ## User Stories\n\
                 ## Functional Requirements\n\
                 ## Non-Functional Requirements\n\
                 ## Assumptions\n\
                 ## Risks and Mitigation\n\
                 ## Timeline (a single line)\n\
                 ## Resources Required\n\n\
                 Use bullet lists for every section except Overview and Timeline. Make the PRD \
                 actionable, specific, and aligned with business goals.",
                self.title()
            ),
            AgentRole::QaEngineer => format!(
                "You are a {} creating Gherkin test scenarios for behavior-driven development.\n\n\
                 Based on the provided PRD, cover happy paths, edge cases and error handling, \
                 user acceptance criteria, and integration scenarios.\n\n\
                 Use proper Gherkin syntax:\n\
                 Feature: <high-level description>\n\
                 Background: <common setup, optional>\n\
                 Scenario: <specific test case>\n\
                 Given / When / Then / And / But steps, one per line\n\n\
                 Create multiple features covering different aspects of the product.",
                self.title()
            ),
            AgentRole::Summarizer => "You are an expert at extracting and presenting key \
                 information concisely. Use short bullet points, bold labels and emojis. \
                 Never invent numbers that are not in the input."
                .to_string(),
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
