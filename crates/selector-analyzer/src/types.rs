use serde::{Deserialize, Serialize};

/// Semantic role inferred for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Button,
    Link,
    Checkbox,
    Radio,
    Textbox,
    Searchbox,
    Spinbutton,
    Combobox,
    Option,
    Img,
    Heading,
    Navigation,
    Main,
    Table,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Button => "button",
            Role::Link => "link",
            Role::Checkbox => "checkbox",
            Role::Radio => "radio",
            Role::Textbox => "textbox",
            Role::Searchbox => "searchbox",
            Role::Spinbutton => "spinbutton",
            Role::Combobox => "combobox",
            Role::Option => "option",
            Role::Img => "img",
            Role::Heading => "heading",
            Role::Navigation => "navigation",
            Role::Main => "main",
            Role::Table => "table",
        }
    }
}

/// Interaction verb suggested for replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    Click,
    Fill,
    Check,
    SelectOption,
}

impl Verb {
    pub fn name(&self) -> &'static str {
        match self {
            Verb::Click => "click",
            Verb::Fill => "fill",
            Verb::Check => "check",
            Verb::SelectOption => "select_option",
        }
    }
}

/// One strategy for re-locating the element during replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selector {
    /// Role plus accessible name.
    Role { role: Role, name: String },
    /// Short exact visible text.
    Text { text: String },
    /// Placeholder attribute.
    Placeholder { placeholder: String },
    /// Plain CSS (id, class token, tag+type or bare tag).
    Css { css: String },
}

impl Selector {
    /// Render in selector-engine syntax, usable as the step's locator string.
    pub fn as_locator(&self) -> String {
        match self {
            Selector::Role { role, name } => {
                format!("role={}[name=\"{}\"]", role.name(), name)
            }
            Selector::Text { text } => format!("text=\"{}\"", text),
            Selector::Placeholder { placeholder } => {
                format!("[placeholder=\"{}\"]", placeholder)
            }
            Selector::Css { css } => css.clone(),
        }
    }

    /// Render as a Playwright locator call.
    pub fn as_playwright_call(&self) -> String {
        match self {
            Selector::Role { role, name } => {
                format!("get_by_role(\"{}\", name=\"{}\")", role.name(), name)
            }
            Selector::Text { text } => format!("get_by_text(\"{}\")", text),
            Selector::Placeholder { placeholder } => {
                format!("get_by_placeholder(\"{}\")", placeholder)
            }
            Selector::Css { css } => format!("locator(\"{}\")", css),
        }
    }
}

/// A ranked selector candidate. Lower priority values rank first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorCandidate {
    pub selector: Selector,
    pub priority: u8,
}

/// Result of analyzing one element descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementAnalysis {
    pub role: Option<Role>,
    pub candidates: Vec<SelectorCandidate>,
    pub verb: Verb,
}

impl ElementAnalysis {
    /// Highest-ranked candidate. Analysis always yields at least the bare
    /// tag fallback, so this only returns `None` for an empty descriptor.
    pub fn best_selector(&self) -> Option<&SelectorCandidate> {
        self.candidates.first()
    }

    /// Id-based candidate, if the element carried an id.
    pub fn id_selector(&self) -> Option<&SelectorCandidate> {
        self.candidates
            .iter()
            .find(|c| matches!(&c.selector, Selector::Css { css } if css.starts_with('#')))
    }

    /// Whether only the weakest (bare tag) strategy is available.
    pub fn is_low_confidence(&self) -> bool {
        self.candidates
            .first()
            .map(|c| c.priority >= crate::analyzer::PRIORITY_TAG)
            .unwrap_or(true)
    }
}
