use std::{fmt, str::FromStr};
use thiserror::Error;

/// Languages offered by the coding exercises, pinned to the runtime versions
/// the sandbox has installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Rust,
    Java,
    C,
    Cpp,
    Go,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Rust,
        Language::Java,
        Language::C,
        Language::Cpp,
        Language::Go,
    ];

    /// name the sandbox knows the runtime by
    pub fn runtime(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Rust => "rust",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "c++",
            Language::Go => "go",
        }
    }

    pub fn version(&self) -> &'static str {
        match self {
            Language::Python => "3.10.0",
            Language::JavaScript => "18.15.0",
            Language::TypeScript => "5.0.3",
            Language::Rust => "1.68.2",
            Language::Java => "15.0.2",
            Language::C | Language::Cpp => "10.2.0",
            Language::Go => "1.16.2",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Language::Python => "main.py",
            Language::JavaScript => "main.js",
            Language::TypeScript => "main.ts",
            Language::Rust => "main.rs",
            Language::Java => "Main.java",
            Language::C => "main.c",
            Language::Cpp => "main.cpp",
            Language::Go => "main.go",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.runtime())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unsupported language '{0}'")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "python" | "py" | "python3" => Ok(Language::Python),
            "javascript" | "js" | "node" => Ok(Language::JavaScript),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "rust" | "rs" => Ok(Language::Rust),
            "java" => Ok(Language::Java),
            "c" => Ok(Language::C),
            "c++" | "cpp" => Ok(Language::Cpp),
            "go" | "golang" => Ok(Language::Go),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}
