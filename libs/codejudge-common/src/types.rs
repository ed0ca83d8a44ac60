use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Body of `POST /run`.
///
/// Fields are optional on the wire so that a missing field is reported as a
/// 400 by the handler rather than as a deserializer rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
}

impl RunRequest {
    /// Language and code, if both are present and non-empty
    pub fn required(&self) -> Option<(&str, &str)> {
        required_pair(&self.language, &self.code)
    }

    pub fn stdin(&self) -> &str {
        self.input.as_deref().unwrap_or("")
    }
}

/// Body of `POST /review`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, rename = "problemStatement")]
    pub problem_statement: Option<String>,
}

impl ReviewRequest {
    /// Language and code, if both are present and non-empty
    pub fn required(&self) -> Option<(&str, &str)> {
        required_pair(&self.language, &self.code)
    }

    pub fn problem(&self) -> Option<&str> {
        self.problem_statement
            .as_deref()
            .filter(|p| !p.is_empty())
    }
}

fn required_pair<'a>(
    language: &'a Option<String>,
    code: &'a Option<String>,
) -> Option<(&'a str, &'a str)> {
    match (language.as_deref(), code.as_deref()) {
        (Some(lang), Some(code)) if !lang.is_empty() && !code.is_empty() => Some((lang, code)),
        _ => None,
    }
}

/// Payload accepted by the execution API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionPayload {
    pub language: String,
    pub stdin: String,
    pub files: Vec<SourceFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

impl ExecutionPayload {
    /// Single-file submission; the execution API expects the entry file to be named `index`
    pub fn single_file(language: &str, code: &str, stdin: &str) -> Self {
        Self {
            language: language.to_string(),
            stdin: stdin.to_string(),
            files: vec![SourceFile {
                name: "index".to_string(),
                content: code.to_string(),
            }],
        }
    }
}

/// Lenient view of the execution API's response.
///
/// The server relays the raw JSON untouched; this type is only used by
/// clients that want to render it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub exception: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub execution_time: Option<f64>,
    #[serde(default)]
    pub memory_used: Option<f64>,
    #[serde(default)]
    pub compilation_time: Option<f64>,
}

impl RunResult {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

/// Success body of `POST /review`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewEnvelope {
    pub status: String,
    pub review: Value,
    pub metadata: ReviewMetadata,
}

impl ReviewEnvelope {
    pub fn success(review: Value, metadata: ReviewMetadata) -> Self {
        Self {
            status: "success".to_string(),
            review,
            metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewMetadata {
    pub model: String,
    pub language: String,
    /// RFC 3339, UTC, millisecond precision
    pub timestamp: String,
    #[serde(default)]
    pub tokens_used: u64,
}

impl ReviewMetadata {
    pub fn now(model: &str, language: &str, tokens_used: u64) -> Self {
        Self {
            model: model.to_string(),
            language: language.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            tokens_used,
        }
    }
}

/// Error body shared by both proxy endpoints.
///
/// Validation failures only carry `error`; downstream failures carry all three.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn validation(error: impl Into<String>) -> Self {
        Self {
            status: None,
            error: error.into(),
            message: None,
        }
    }

    pub fn downstream(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Some("error".to_string()),
            error: error.into(),
            message: Some(message.into()),
        }
    }
}

/// Languages understood by the execution API, by identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    Java,
    Cpp,
    C,
    JavaScript,
    TypeScript,
    Go,
    Rust,
    Kotlin,
    CSharp,
    Ruby,
    Php,
    Swift,
}

impl Language {
    pub const ALL: [Language; 13] = [
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::C,
        Language::JavaScript,
        Language::TypeScript,
        Language::Go,
        Language::Rust,
        Language::Kotlin,
        Language::CSharp,
        Language::Ruby,
        Language::Php,
        Language::Swift,
    ];

    /// Identifier sent to the execution API
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Kotlin => "kotlin",
            Language::CSharp => "csharp",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Swift => "swift",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.to_ascii_lowercase();
        Self::ALL.iter().copied().find(|l| l.as_str() == s)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        let lang = match ext.as_str() {
            "py" => Language::Python,
            "java" => Language::Java,
            "cpp" | "cc" | "cxx" | "hpp" => Language::Cpp,
            "c" | "h" => Language::C,
            "js" | "mjs" | "cjs" => Language::JavaScript,
            "ts" => Language::TypeScript,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "kt" | "kts" => Language::Kotlin,
            "cs" => Language::CSharp,
            "rb" => Language::Ruby,
            "php" => Language::Php,
            "swift" => Language::Swift,
            _ => return None,
        };
        Some(lang)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
