use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::debug;

use super::{AnnotationResult, Provenance};

/// One signal-matching rule: if the pattern hits anywhere in the text,
/// the note is appended to the summary.
#[derive(Debug, Clone)]
pub struct FallbackRule {
    pub pattern: Regex,
    pub note: String,
}

impl FallbackRule {
    pub fn new(pattern: Regex, note: impl Into<String>) -> Self {
        Self {
            pattern,
            note: note.into(),
        }
    }
}

static DEFAULT_RULES: Lazy<Vec<FallbackRule>> = Lazy::new(|| {
    vec![
        FallbackRule::new(
            Regex::new(r"javax\.servlet|jakarta\.servlet").unwrap(),
            " It implements a servlet to handle HTTP requests and responses, indicating a \
             legacy web architecture. Migrate to Spring Boot REST APIs for modern scalability.",
        ),
        FallbackRule::new(
            Regex::new(r"java\.sql").unwrap(),
            " It uses raw JDBC for database operations and lacks ORM abstraction, which is \
             error-prone. Adopt Spring Data JPA for modern data access.",
        ),
        FallbackRule::new(
            Regex::new(r"HttpSession").unwrap(),
            " It relies on HttpSession for state management, which can complicate scaling. \
             Use stateless JWT or Spring Session.",
        ),
        FallbackRule::new(
            Regex::new(r"System\.out\.println|log4j").unwrap(),
            " It uses outdated logging (e.g., System.out or Log4j). Switch to SLF4J with \
             Logback for better observability.",
        ),
        // Case-insensitive: sensitive terms appear in any casing
        FallbackRule::new(
            Regex::new(r"(?i)password|credential").unwrap(),
            " It may contain hardcoded credentials, posing a security risk. Move secrets to \
             environment variables.",
        ),
        FallbackRule::new(
            Regex::new(r"implements Serializable").unwrap(),
            " It defines a serializable entity, likely a data model. Consider Lombok to \
             reduce boilerplate.",
        ),
    ]
});

/// Deterministic, network-free annotator. Always succeeds with a
/// non-empty annotation — the pipeline's last resort when the remote
/// path is unavailable or exhausted.
#[derive(Debug, Clone)]
pub struct FallbackAnnotator {
    rules: Vec<FallbackRule>,
}

impl Default for FallbackAnnotator {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.clone(),
        }
    }
}

impl FallbackAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rule table, so report variants can carry different
    /// signal wording.
    pub fn with_rules(rules: Vec<FallbackRule>) -> Self {
        Self { rules }
    }

    pub fn annotate(&self, text: &str, artifact_id: &str) -> AnnotationResult {
        let mut summary = format!("{} is a {}.", artifact_id, unit_label(artifact_id));

        if text.trim().is_empty() {
            summary.push_str(" No code content available, possibly due to file read error.");
        } else {
            for rule in &self.rules {
                if rule.pattern.is_match(text) {
                    summary.push_str(&rule.note);
                }
            }
        }

        debug!("Generated fallback annotation for {}", artifact_id);
        AnnotationResult {
            artifact_id: artifact_id.to_string(),
            text: summary,
            provenance: Provenance::Fallback,
        }
    }
}

/// Unit label for the base sentence, derived from the file extension.
fn unit_label(artifact_id: &str) -> &'static str {
    let ext = Path::new(artifact_id)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("java") => "Java class",
        Some("cs") => "C# class",
        Some("py") => "Python module",
        Some("js") => "JavaScript module",
        Some("ts") => "TypeScript module",
        _ => "source file",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_sentence_by_extension() {
        let annotator = FallbackAnnotator::new();
        let result = annotator.annotate("class Foo {}", "Foo.java");
        assert!(result.text.starts_with("Foo.java is a Java class."));

        let result = annotator.annotate("class Foo {}", "Foo.cs");
        assert!(result.text.starts_with("Foo.cs is a C# class."));

        let result = annotator.annotate("x = 1", "foo.py");
        assert!(result.text.starts_with("foo.py is a Python module."));

        let result = annotator.annotate("text", "README");
        assert!(result.text.starts_with("README is a source file."));
    }

    #[test]
    fn test_never_empty() {
        let annotator = FallbackAnnotator::new();
        let result = annotator.annotate("", "Empty.java");
        assert!(!result.text.trim().is_empty());
        assert!(result.text.contains("No code content available"));
        assert_eq!(result.provenance, Provenance::Fallback);
    }

    #[test]
    fn test_servlet_rule() {
        let annotator = FallbackAnnotator::new();
        let result = annotator.annotate("import javax.servlet.http.HttpServlet;", "Web.java");
        assert!(result.text.contains("legacy web architecture"));
    }

    #[test]
    fn test_jdbc_rule() {
        let annotator = FallbackAnnotator::new();
        let result = annotator.annotate("import java.sql.Connection;", "Dao.java");
        assert!(result.text.contains("lacks ORM abstraction"));
    }

    #[test]
    fn test_session_rule() {
        let annotator = FallbackAnnotator::new();
        let result = annotator.annotate("HttpSession session = req.getSession();", "S.java");
        assert!(result.text.contains("complicate scaling"));
    }

    #[test]
    fn test_logging_rule() {
        let annotator = FallbackAnnotator::new();
        let result = annotator.annotate("System.out.println(\"hi\");", "Log.java");
        assert!(result.text.contains("outdated logging"));
    }

    #[test]
    fn test_credential_rule_case_insensitive() {
        let annotator = FallbackAnnotator::new();
        let result = annotator.annotate("String PASSWORD = \"x\";", "Auth.java");
        assert!(result.text.contains("hardcoded credentials"));

        let result = annotator.annotate("String Credential;", "Auth.java");
        assert!(result.text.contains("hardcoded credentials"));
    }

    #[test]
    fn test_framework_rules_case_sensitive() {
        let annotator = FallbackAnnotator::new();
        // Wrong casing must not match framework/API signals
        let result = annotator.annotate("JAVAX.SERVLET httpsession JAVA.SQL", "Odd.java");
        assert!(!result.text.contains("legacy web architecture"));
        assert!(!result.text.contains("lacks ORM abstraction"));
        assert!(!result.text.contains("complicate scaling"));
    }

    #[test]
    fn test_serializable_rule() {
        let annotator = FallbackAnnotator::new();
        let result = annotator.annotate("class P implements Serializable {}", "P.java");
        assert!(result.text.contains("serializable entity"));
    }

    #[test]
    fn test_multiple_rules_accumulate() {
        let annotator = FallbackAnnotator::new();
        let code = "import javax.servlet.*; import java.sql.*; String password;";
        let result = annotator.annotate(code, "All.java");
        assert!(result.text.contains("legacy web architecture"));
        assert!(result.text.contains("lacks ORM abstraction"));
        assert!(result.text.contains("hardcoded credentials"));
    }

    #[test]
    fn test_deterministic() {
        let annotator = FallbackAnnotator::new();
        let code = "import java.sql.*; HttpSession s;";
        let a = annotator.annotate(code, "Same.java");
        let b = annotator.annotate(code, "Same.java");
        assert_eq!(a.text, b.text);
    }

    #[test]
    fn test_custom_rules() {
        let rules = vec![FallbackRule::new(
            Regex::new(r"GridView").unwrap(),
            " It binds data through a GridView, a Web Forms pattern.",
        )];
        let annotator = FallbackAnnotator::with_rules(rules);
        let result = annotator.annotate("<asp:GridView />", "Page.cs");
        assert!(result.text.contains("GridView"));
        // default rules replaced, not appended
        let result = annotator.annotate("import java.sql.*;", "Dao.java");
        assert!(!result.text.contains("lacks ORM abstraction"));
    }
}
