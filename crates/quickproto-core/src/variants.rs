//! Presentational variants: one stateless display shell per prototype kind.
//!
//! A shell only wraps content in kind-specific chrome. `DisplayStrategy` picks which
//! document the session hands to the preview surface; `Generic` (code as-is) is the default.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrototypeKind {
    Script,
    Desktop,
    Game,
    Mobile,
    Website,
    AiAssistant,
}

impl PrototypeKind {
    pub const ALL: [PrototypeKind; 6] = [
        PrototypeKind::Script,
        PrototypeKind::Desktop,
        PrototypeKind::Game,
        PrototypeKind::Mobile,
        PrototypeKind::Website,
        PrototypeKind::AiAssistant,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Script => "Script/Utilities Prototype",
            Self::Desktop => "Desktop Software Prototype",
            Self::Game => "Video Game Prototype",
            Self::Mobile => "Mobile Application Prototype",
            Self::Website => "Website Prototype",
            Self::AiAssistant => "AI Application Prototype",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Script => "script-prototype",
            Self::Desktop => "desktop-prototype",
            Self::Game => "game-prototype",
            Self::Mobile => "mobile-prototype",
            Self::Website => "website-prototype",
            Self::AiAssistant => "ai-prototype",
        }
    }

    fn region(self, content: &str) -> ContentRegion {
        let content = content.to_string();
        match self {
            Self::Script | Self::Desktop | Self::AiAssistant => ContentRegion::Preformatted(content),
            Self::Game => ContentRegion::Canvas(content),
            Self::Mobile => ContentRegion::MobileScreen(content),
            Self::Website => ContentRegion::EmbeddedDocument(content),
        }
    }
}

/// How a shell presents its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRegion {
    /// Verbatim text block.
    Preformatted(String),
    /// Scriptable drawing region; content is its fallback text.
    Canvas(String),
    /// Nested, non-scriptable document.
    EmbeddedDocument(String),
    /// Phone-sized frame around the content.
    MobileScreen(String),
}

impl ContentRegion {
    pub fn content(&self) -> &str {
        match self {
            Self::Preformatted(s)
            | Self::Canvas(s)
            | Self::EmbeddedDocument(s)
            | Self::MobileScreen(s) => s.as_str(),
        }
    }
}

/// A kind's chrome applied to one piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrototypeShell {
    pub kind: PrototypeKind,
    pub title: &'static str,
    pub region: ContentRegion,
}

impl PrototypeShell {
    pub fn new(kind: PrototypeKind, content: &str) -> Self {
        Self {
            kind,
            title: kind.title(),
            region: kind.region(content),
        }
    }

    /// Standalone HTML document for the shell. Content is always escaped.
    pub fn to_html(&self) -> String {
        let body = match &self.region {
            ContentRegion::Preformatted(s) => format!("<pre>{}</pre>", escape_html(s)),
            ContentRegion::Canvas(s) => {
                format!("<canvas id=\"game-canvas\">{}</canvas>", escape_html(s))
            }
            ContentRegion::EmbeddedDocument(s) => format!(
                "<iframe srcdoc=\"{}\" title=\"{}\" sandbox></iframe>",
                escape_html(s),
                self.title
            ),
            ContentRegion::MobileScreen(s) => {
                format!("<div class=\"mobile-screen\">{}</div>", escape_html(s))
            }
        };
        let content_class = match self.region {
            ContentRegion::MobileScreen(_) => "prototype-content mobile-frame",
            _ => "prototype-content",
        };
        format!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
             <body><div class=\"prototype {class}\"><h3>{title}</h3>\
             <div class=\"{content_class}\">{body}</div></div></body></html>\n",
            title = self.title,
            class = self.kind.css_class(),
        )
    }
}

/// Which document the preview surface receives for an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayStrategy {
    /// Code/preview pairing: the code itself is the document.
    #[default]
    Generic,
    Variant(PrototypeKind),
}

impl DisplayStrategy {
    pub fn document(self, code: &str) -> String {
        match self {
            Self::Generic => code.to_string(),
            Self::Variant(kind) => PrototypeShell::new(kind, code).to_html(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Generic => "Generic (code + preview)",
            Self::Variant(kind) => kind.title(),
        }
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
