//! Shared primitives for the WebRec recording engine.
//!
//! Identity newtypes, the shared error type, and the data model that flows
//! between the registry, the event coordinator and the code generator.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Shared error type for the recording engine crates.
#[derive(Debug, Error, Clone)]
pub enum RecError {
    #[error("{message}")]
    Message { message: String },
}

impl RecError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Event id assigned by the coordinator. An empty id means the event was
/// acknowledged but not accepted (coordinator not running).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

impl EventId {
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Element geometry as reported by the probe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

/// Raw DOM element descriptor relayed by the probe.
///
/// Field names mirror the probe payload; everything defaults to empty so a
/// partially populated descriptor still deserializes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementDescriptor {
    pub tag: String,
    pub id: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub input_type: String,
    pub value: String,
    pub text: String,
    pub href: String,
    pub placeholder: String,
    /// Link target attribute, used for cross-window attribution.
    pub target: String,
    #[serde(flatten)]
    pub bounds: BoundingBox,
    #[serde(rename = "cssSelector")]
    pub css_selector: String,
    pub xpath: String,
    #[serde(rename = "parentTag")]
    pub parent_tag: String,
    #[serde(rename = "parentId")]
    pub parent_id: String,
    #[serde(rename = "parentClass")]
    pub parent_class: String,
    /// Semantic role inferred by the selector analyzer, if it ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl ElementDescriptor {
    /// Whether the descriptor carries anything a selector could be built from.
    pub fn is_resolvable(&self) -> bool {
        !self.tag.is_empty()
    }

    /// First token of the class attribute, if any.
    pub fn first_class(&self) -> Option<&str> {
        self.class_name.split_whitespace().next()
    }

    /// Whether the element points at a new browsing context.
    pub fn opens_new_window(&self) -> bool {
        self.target == "_blank"
    }
}

/// Page the event originated from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContext {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

/// Unprocessed interaction event held by the coordinator.
///
/// Immutable after creation except for the cross-window tags, which the
/// coordinator sets during the flush causality pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawEvent {
    pub event_id: EventId,
    pub window_id: WindowId,
    pub event_type: String,
    /// Monotonic seconds since the unix epoch at coordinator start.
    pub timestamp: f64,
    pub element: ElementDescriptor,
    pub page: PageContext,
    #[serde(default)]
    pub extra: serde_json::Value,
    pub parent_window_id: Option<WindowId>,
    pub is_cross_window: bool,
    pub sequence_number: u64,
}

/// Normalized, deduplicated, causality-tagged user action.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: ActionId,
    pub session_id: SessionId,
    pub action_type: String,
    pub timestamp: f64,
    pub element: Option<ElementDescriptor>,
    pub page_url: String,
    pub page_title: String,
    pub description: String,
    #[serde(default)]
    pub additional_data: serde_json::Value,
}

impl ActionRecord {
    pub fn from_event(session: &SessionId, event: &RawEvent) -> Self {
        let element = if event.element.is_resolvable() {
            Some(event.element.clone())
        } else {
            None
        };
        let description = describe_event(event);
        Self {
            id: ActionId::new(),
            session_id: session.clone(),
            action_type: event.event_type.clone(),
            timestamp: event.timestamp,
            element,
            page_url: event.page.url.clone(),
            page_title: event.page.title.clone(),
            description,
            additional_data: event.extra.clone(),
        }
    }
}

fn describe_event(event: &RawEvent) -> String {
    let el = &event.element;
    let label = if !el.text.is_empty() {
        // Truncate on char boundaries; labels are often multibyte.
        let text: String = el.text.trim().chars().take(40).collect();
        format!(" \"{}\"", text)
    } else if !el.id.is_empty() {
        format!(" #{}", el.id)
    } else {
        String::new()
    };
    match event.event_type.as_str() {
        "click" | "link_click" => format!("Click on {}{}", element_noun(el), label),
        "input" => format!("Type into {}{}", element_noun(el), label),
        "change" => format!("Change {}{}", element_noun(el), label),
        "submit" => format!("Submit form{}", label),
        "keydown" => format!("Press key in {}{}", element_noun(el), label),
        "window_open" => "Open a new window".to_string(),
        "goto" | "navigation" => format!("Navigate to {}", event.page.url),
        other => format!("{} on {}{}", other, element_noun(el), label),
    }
}

fn element_noun(el: &ElementDescriptor) -> &'static str {
    match el.tag.as_str() {
        "button" => "button",
        "a" => "link",
        "select" => "dropdown",
        "textarea" => "text area",
        "input" => match el.input_type.as_str() {
            "checkbox" => "checkbox",
            "radio" => "radio button",
            "submit" | "button" => "button",
            _ => "input field",
        },
        "" => "element",
        _ => "element",
    }
}
