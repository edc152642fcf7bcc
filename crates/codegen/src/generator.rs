use tracing::{debug, warn};

use webrec_core_types::ActionRecord;
use webrec_selector_analyzer::{analyze, ElementAnalysis, Verb};

use crate::script::{Script, ScriptStep};

/// Turns an ordered list of recorded actions into a replay script.
///
/// Navigation is derived from consecutive URL changes; identical consecutive
/// destinations collapse into one step. Interaction steps anchor on the id
/// selector when the element carried an id, since an id is the most stable
/// replay anchor, and fall back to the analyzer's ranked best otherwise.
#[derive(Debug, Default)]
pub struct CodeGenerator;

impl CodeGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, actions: &[ActionRecord]) -> Script {
        let mut steps = Vec::new();
        let mut current_url = String::new();

        for action in actions {
            match action.action_type.as_str() {
                "goto" | "navigation" => {
                    if let Some(step) = navigation_step(action, &mut current_url) {
                        steps.push(step);
                    }
                }
                // Page load and focus shifts carry no replayable interaction.
                "load" | "window_open" => {}
                "click" | "link_click" | "input" | "change" | "submit" | "keydown" => {
                    if action.page_url != current_url
                        && !action.page_url.is_empty()
                        && action.page_url != "about:blank"
                        && current_url.is_empty()
                    {
                        // First interaction before any explicit navigation:
                        // open the page it happened on.
                        steps.push(ScriptStep::Navigate {
                            url: action.page_url.clone(),
                        });
                        current_url = action.page_url.clone();
                    }
                    steps.push(interaction_step(action));
                }
                other => {
                    warn!(action_type = other, "unhandled action type, emitting comment");
                    steps.push(ScriptStep::Comment {
                        text: format!("unhandled action: {}", action.description),
                    });
                }
            }
        }

        debug!(actions = actions.len(), steps = steps.len(), "script generated");
        Script { steps }
    }
}

fn navigation_step(action: &ActionRecord, current_url: &mut String) -> Option<ScriptStep> {
    let url = &action.page_url;
    if url.is_empty() || url == "about:blank" || url == current_url {
        return None;
    }
    *current_url = url.clone();
    Some(ScriptStep::Navigate { url: url.clone() })
}

fn interaction_step(action: &ActionRecord) -> ScriptStep {
    let element = match &action.element {
        Some(el) => el,
        None => {
            return ScriptStep::Comment {
                text: format!("no element captured for: {}", action.description),
            }
        }
    };

    let analysis = analyze(element);
    let candidate = match analysis.id_selector().or_else(|| analysis.best_selector()) {
        Some(c) => c,
        None => {
            return ScriptStep::Comment {
                text: format!("no selector for: {}", action.description),
            }
        }
    };

    let verb = verb_for(action, &analysis);
    let value = step_value(action, verb);

    ScriptStep::Interact {
        selector: candidate.selector.as_locator(),
        locator_call: candidate.selector.as_playwright_call(),
        verb,
        value,
        low_confidence: analysis.is_low_confidence(),
        description: action.description.clone(),
    }
}

/// The recorded event type wins over the analyzer's suggestion: a click on a
/// text box is still a click.
fn verb_for(action: &ActionRecord, analysis: &ElementAnalysis) -> Verb {
    match action.action_type.as_str() {
        "input" => Verb::Fill,
        "change" => match analysis.verb {
            Verb::Check | Verb::SelectOption => analysis.verb,
            _ => Verb::Fill,
        },
        "click" | "link_click" | "submit" | "keydown" => Verb::Click,
        _ => analysis.verb,
    }
}

fn step_value(action: &ActionRecord, verb: Verb) -> Option<String> {
    let key = match verb {
        Verb::Fill => "value",
        Verb::SelectOption => "selectedText",
        _ => return None,
    };
    action
        .additional_data
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .or_else(|| Some(String::new()))
}
