use crate::kinds::DocKind;

/// Schema document handed to the agent so generated files match the
/// workspace conventions. One static text per document kind.
pub fn schema_text(kind: DocKind) -> &'static str {
    match kind {
        DocKind::Decision => DECISION_SCHEMA,
        DocKind::Feature => FEATURE_SCHEMA,
        DocKind::Spec => SPEC_SCHEMA,
        DocKind::Context => CONTEXT_SCHEMA,
        DocKind::Task => TASK_SCHEMA,
    }
}

const DECISION_SCHEMA: &str = r#"# Decision File Schema

## File Format
- **Filename**: <decision-id>.decision.md
- **Location**: ai/decisions/
- **Format**: Frontmatter + Markdown

## Frontmatter Fields
---
decision_id: kebab-case-id  # Must match filename without .decision.md
date: YYYY-MM-DD
status: proposed  # proposed, accepted, deprecated, superseded
---

## Content Structure
The decision document follows the ADR (Architecture Decision Record) format:

1. **Title** - Clear, descriptive title of the decision
2. **Status** - Current status (proposed, accepted, deprecated, superseded)
3. **Context** - What is the issue or situation that motivates this decision?
4. **Decision** - What is the change that we're proposing/doing?
5. **Consequences** - What becomes easier or harder as a result of this decision?

## Linkages
- A decision can be distilled into multiple **features** and **specs**
- Features and specs will reference this decision_id in their frontmatter"#;

const FEATURE_SCHEMA: &str = r#"# Feature File Schema

## File Format
- **Filename**: <feature-id>.feature.md
- **Location**: ai/features/<feature-set>/
- **Format**: Frontmatter + Gherkin Scenarios

## Frontmatter Fields
---
feature_id: kebab-case-id  # Must match filename without .feature.md
spec_id: [spec-id-1, spec-id-2]  # Array of related spec IDs
decision_id: decision-id  # Optional: originating decision
---

## Content Structure
Feature files contain Gherkin scenarios describing the desired behavior:

Scenario: [Scenario Name]
GIVEN [initial context]
WHEN [action or event]
THEN [expected outcome]
AND [additional outcome]

Scenario: [Another Scenario]
GIVEN [context]
AND [more context]
WHEN [action]
THEN [outcome]

Keywords (GIVEN, WHEN, THEN, AND, BUT) are case-insensitive on input and
written upper-case. One blank line separates scenarios.

## Linkages
- References one or more **spec_id** values
- May reference a **decision_id** that originated this feature
- Specs will also reference this feature_id in their frontmatter"#;

const SPEC_SCHEMA: &str = r#"# Spec File Schema

## File Format
- **Filename**: <spec-id>.spec.md
- **Location**: ai/specs/
- **Format**: Frontmatter + Markdown + Mermaid Diagrams

## Frontmatter Fields
---
spec_id: kebab-case-id  # Must match filename without .spec.md
feature_id: [feature-id-1, feature-id-2]  # Array of related feature IDs
decision_id: decision-id  # Optional: originating decision
context_id: [context-id-1, context-id-2]  # Optional: related contexts
---

## Content Structure
Specification documents include:

1. **Overview** - High-level description of what's being specified
2. **Requirements** - Detailed functional and non-functional requirements
3. **Architecture** - Technical architecture with Mermaid diagrams
4. **Implementation Notes** - Key technical considerations
5. **Dependencies** - External dependencies and integrations

### Mermaid Diagrams
Use Mermaid for visual representations:
- Sequence diagrams for workflows
- Flowcharts for decision trees
- Class diagrams for data structures

## Linkages
- References one or more **feature_id** values
- May reference a **decision_id** that originated this spec
- May reference **context_id** values for additional guidance
- Tasks will reference this spec_id"#;

const CONTEXT_SCHEMA: &str = r#"# Context File Schema

## File Format
- **Filename**: <context-id>.context.md
- **Location**: ai/contexts/
- **Format**: Frontmatter + Gherkin-style Rules

## Frontmatter Fields
---
context_id: kebab-case-id  # Must match filename without .context.md
---

## Content Structure
Context files provide guidance on when and how to use specific information
or tools. They use Gherkin-style conditional logic:

GIVEN [condition or working context]
WHEN [information need arises]
THEN [action to take]
AND [additional action]

### Example: Document Reference
GIVEN we are working within Glam files
WHEN information is needed about TypeScript implementation
THEN read the document at ai/docs/typescript_guidance.md
AND use that information to inform decisions regarding TypeScript

## Linkages
- Context files are referenced by **spec_id** and **task_id** values
- They provide just-in-time guidance without overloading the main context window
- They can point to documentation, tools, or research strategies"#;

const TASK_SCHEMA: &str = r#"# Task File Schema

## File Format
- **Filename**: <task-id>.task.md
- **Location**: ai/tasks/<decision-id>/
- **Format**: Frontmatter + Markdown

## Frontmatter Fields
---
task_id: kebab-case-id  # Must match filename without .task.md
decision_id: decision-id  # Originating decision
spec_id: [spec-id-1, spec-id-2]  # Related specs
feature_id: [feature-id-1]  # Related features
context_id: [context-id-1, context-id-2]  # Relevant contexts
status: pending  # pending, in_progress, completed, blocked
order: 1  # Execution order within the decision
---

## Content Structure
Task documents are specific, actionable implementation steps:

1. **Objective** - Clear statement of what needs to be done
2. **Implementation Steps** - Specific, numbered steps to complete the task
3. **Files Affected** - List of files that will be created, modified, or deleted
4. **Acceptance Criteria** - How to verify the task is complete
5. **Dependencies** - Other tasks that must be completed first
6. **Context References** - Links to relevant context documents

## Linkages
- References a **decision_id** (required)
- References one or more **spec_id** and **feature_id** values
- May reference **context_id** values for implementation guidance
- Tasks are ordered sequentially within a decision"#;
