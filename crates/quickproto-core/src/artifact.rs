//! Generated artifact returned by the generation service.

use serde::{Deserialize, Serialize};

/// Source code plus metadata for one successful generation. Replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub code: String,
    /// Language tags; the first one selects the editor syntax mode.
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prelude: Option<String>,
}

impl GeneratedArtifact {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            languages: Vec::new(),
            prelude: None,
        }
    }

    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_prelude(mut self, prelude: impl Into<String>) -> Self {
        self.prelude = Some(prelude.into());
        self
    }

    /// Prelude to display, if any. An empty prelude counts as absent.
    pub fn prelude(&self) -> Option<&str> {
        self.prelude.as_deref().filter(|p| !p.is_empty())
    }

    /// True when there is code to hand to the preview surface.
    pub fn has_code(&self) -> bool {
        !self.code.is_empty()
    }

    /// Editor syntax mode from `languages[0]`; `None` means no highlighting.
    pub fn syntax_mode(&self) -> Option<SyntaxMode> {
        self.languages.first().and_then(|l| SyntaxMode::from_tag(l))
    }
}

/// Editor syntax mode derived from a language tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxMode {
    Html,
    Css,
    JavaScript,
    TypeScript,
    Python,
    Rust,
    Json,
    Markdown,
    /// Unrecognised tag, kept lowercased.
    Other(String),
}

impl SyntaxMode {
    /// Case-insensitive mapping. Blank tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let t = tag.trim().to_lowercase();
        if t.is_empty() {
            return None;
        }
        let mode = match t.as_str() {
            "html" | "htm" | "xhtml" => Self::Html,
            "css" => Self::Css,
            "javascript" | "js" | "jsx" => Self::JavaScript,
            "typescript" | "ts" | "tsx" => Self::TypeScript,
            "python" | "py" => Self::Python,
            "rust" | "rs" => Self::Rust,
            "json" => Self::Json,
            "markdown" | "md" => Self::Markdown,
            _ => Self::Other(t),
        };
        Some(mode)
    }

    /// Short identifier shown in the editor header.
    pub fn label(&self) -> &str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Python => "python",
            Self::Rust => "rust",
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Other(s) => s.as_str(),
        }
    }
}
