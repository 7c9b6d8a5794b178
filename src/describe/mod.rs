//! Human-readable descriptions of extracted code.
//!
//! The pipeline only sees the [`Describer`] trait. [`Placeholder`] is used
//! when no service is configured; [`gemini::GeminiClient`] talks to the Gemini
//! REST API.

pub mod gemini;
pub mod prompts;

pub use gemini::GeminiClient;

/// Produces descriptions for code snippets and project-level documents.
pub trait Describer: Send + Sync {
    /// A Javadoc block (`/** ... */`) describing `code`, which is a `role`
    /// such as "class" or "method".
    fn describe(&self, code: &str, role: &str) -> String;

    /// A Markdown overview of the whole project, from its JSON structure.
    fn overview(&self, _structure_json: &str) -> Option<String> {
        None
    }

    /// A reduced version of a full PlantUML diagram.
    fn simplify_diagram(&self, _plantuml: &str) -> Option<String> {
        None
    }
}

/// Fixed text for every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct Placeholder;

impl Describer for Placeholder {
    fn describe(&self, _code: &str, role: &str) -> String {
        format!("/**\n * No description service configured. Placeholder for this {role}.\n */")
    }
}

/// Normalise a generated comment into a single Javadoc block.
pub fn clean_comment(text: &str) -> String {
    let mut cleaned = text.replace("```java", "").replace("```", "").trim().to_string();
    if !cleaned.starts_with("/**") {
        cleaned = format!("/**\n * {cleaned}");
    }
    if !cleaned.ends_with("*/") {
        cleaned.push_str("\n */");
    }
    cleaned
}

/// Strip a surrounding ```` ```lang ```` fence, if present.
pub fn strip_fence(text: &str, lang: &str) -> String {
    let trimmed = text.trim();
    let opening = format!("```{lang}");
    let body = trimmed.strip_prefix(opening.as_str()).unwrap_or(trimmed);
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim().to_string()
}

/// Comment returned when every attempt failed.
pub fn failed_comment(role: &str) -> String {
    format!("/**\n * Failed to generate a description for this {role} after multiple retries.\n */")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_names_role() {
        let text = Placeholder.describe("void m() {}", "method");
        assert!(text.starts_with("/**"));
        assert!(text.ends_with("*/"));
        assert!(text.contains("method"));
        assert_eq!(Placeholder.overview("{}"), None);
        assert_eq!(Placeholder.simplify_diagram("@startuml"), None);
    }

    #[test]
    fn test_clean_comment() {
        assert_eq!(clean_comment("This is a test comment"), "/**\n * This is a test comment\n */");
        assert_eq!(clean_comment("```java\n/** Done. */\n```"), "/** Done. */");
        assert_eq!(clean_comment("  /** open"), "/** open\n */");
    }

    #[test]
    fn test_strip_fence() {
        assert_eq!(
            strip_fence("```plantuml\n@startuml\n@enduml\n```", "plantuml"),
            "@startuml\n@enduml"
        );
        assert_eq!(strip_fence("# Title\n", "markdown"), "# Title");
        assert_eq!(strip_fence("```markdown\n# T\n```", "markdown"), "# T");
    }

    #[test]
    fn test_failed_comment_is_javadoc() {
        let text = failed_comment("class");
        assert!(text.starts_with("/**") && text.ends_with("*/"));
    }
}
