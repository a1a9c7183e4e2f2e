mod client;
mod language;
mod wire;

pub use client::{SandboxClient, SandboxError};
pub use language::{Language, UnknownLanguage};
pub use wire::{ExecuteRequest, ExecuteResponse, SourceFile, StageOutput};
