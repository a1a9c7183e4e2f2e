use serde::{Deserialize, Serialize};

use super::language::Language;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub content: String,
}

/// Body of an execution request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ExecuteRequest {
    pub language: String,
    pub version: String,
    pub files: Vec<SourceFile>,
    pub stdin: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl ExecuteRequest {
    pub fn new(language: Language, source: impl Into<String>) -> Self {
        Self {
            language: language.runtime().to_string(),
            version: language.version().to_string(),
            files: vec![SourceFile {
                name: Some(language.file_name().to_string()),
                content: source.into(),
            }],
            stdin: String::new(),
            args: Vec::new(),
        }
    }

    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = stdin.into();
        self
    }
}

/// Output of one stage (compile or run).
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StageOutput {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,

    /// stdout and stderr interleaved
    #[serde(default)]
    pub output: String,

    /// exit code, absent when the process was killed by a signal
    pub code: Option<i32>,
    pub signal: Option<String>,

    /// wall time in milliseconds, when the sandbox reports it
    #[serde(default, alias = "wall_time")]
    pub time: Option<f64>,
}

impl StageOutput {
    pub fn succeeded(&self) -> bool {
        self.code == Some(0)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ExecuteResponse {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub version: String,
    pub run: StageOutput,

    /// only present for compiled languages
    pub compile: Option<StageOutput>,
}

impl ExecuteResponse {
    pub fn succeeded(&self) -> bool {
        self.compile.as_ref().map_or(true, StageOutput::succeeded) && self.run.succeeded()
    }
}
