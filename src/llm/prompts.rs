//! Prompt templates for the report variants.

pub const SUMMARY_SYSTEM: &str = "You are a Java code analysis expert.";
pub const REQUIREMENTS_SYSTEM: &str = "You are a software analyst.";

/// Per-file modernization summary prompt.
pub fn summary(artifact_id: &str, code: &str) -> String {
    format!(
        r#"You are a Java code analysis expert. Analyze the following code and provide a concise summary (2-3 sentences) of its functionality, architecture, and potential modernization issues. Focus on identifying legacy patterns (e.g., servlets, JSP, raw JDBC, outdated logging, hardcoded credentials) and suggest modern alternatives (e.g., Spring Boot, Spring Data JPA, SLF4J). Do not list code snippets, imports, or variable declarations; focus on behavior and improvements. Output only the summary text.

Code (File: {}):
{}
"#,
        artifact_id, code
    )
}

/// Functional / non-functional requirement extraction prompt, with
/// entity and industry context from the CLI.
pub fn requirements(code: &str, entity: &str, industry: &str) -> String {
    format!(
        r#"You are a software analyst. Given the following code for a {} system managing {} entities, extract both functional and non-functional requirements.

Return the output in this format:
Functional Requirements:
- FR1: <requirement>
- FR2: <requirement>

Non-Functional Requirements:
- NFR1: <requirement>
- NFR2: <requirement>

Code:
{}
"#,
        industry, entity, code
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_includes_file_and_code() {
        let prompt = summary("src/Policy.java", "class Policy {}");
        assert!(prompt.contains("File: src/Policy.java"));
        assert!(prompt.contains("class Policy {}"));
        assert!(prompt.contains("Output only the summary text"));
    }

    #[test]
    fn test_requirements_prompt_includes_context() {
        let prompt = requirements("class Policy {}", "Policy", "Insurance");
        assert!(prompt.contains("Insurance system managing Policy entities"));
        assert!(prompt.contains("Functional Requirements:"));
        assert!(prompt.contains("- NFR1:"));
        assert!(prompt.contains("class Policy {}"));
    }
}
