use tracing::trace;

use webrec_core_types::ElementDescriptor;

use crate::roles::infer_role;
use crate::types::{ElementAnalysis, Role, Selector, SelectorCandidate, Verb};

/// Candidate priorities, strongest first. Lower value ranks earlier.
pub const PRIORITY_ROLE_NAME: u8 = 1;
pub const PRIORITY_TEXT: u8 = 2;
pub const PRIORITY_PLACEHOLDER: u8 = 3;
pub const PRIORITY_ID: u8 = 4;
pub const PRIORITY_CLASS: u8 = 5;
pub const PRIORITY_TAG_TYPE: u8 = 6;
pub const PRIORITY_TAG: u8 = 7;

/// Text used in role-name and text selectors is capped here; longer visible
/// text is too brittle to anchor replay on.
const ROLE_NAME_MAX: usize = 30;
const TEXT_MAX: usize = 50;

/// Analyze an element descriptor into a role, ranked selector candidates and
/// a replay verb. Pure function of the descriptor: the same input always
/// yields the same analysis.
pub fn analyze(el: &ElementDescriptor) -> ElementAnalysis {
    let role = infer_role(el);
    let candidates = build_candidates(el, role);
    let verb = derive_verb(el, role);
    trace!(
        tag = %el.tag,
        role = role.map(|r| r.name()).unwrap_or("-"),
        verb = verb.name(),
        candidates = candidates.len(),
        "element analyzed"
    );
    ElementAnalysis {
        role,
        candidates,
        verb,
    }
}

fn build_candidates(el: &ElementDescriptor, role: Option<Role>) -> Vec<SelectorCandidate> {
    let mut candidates = Vec::new();
    let text = clean_text(&el.text, ROLE_NAME_MAX);

    if let (Some(role), Some(name)) = (role, text.as_deref()) {
        candidates.push(SelectorCandidate {
            selector: Selector::Role {
                role,
                name: name.to_string(),
            },
            priority: PRIORITY_ROLE_NAME,
        });
    }

    if let Some(text) = clean_text(&el.text, TEXT_MAX) {
        candidates.push(SelectorCandidate {
            selector: Selector::Text { text },
            priority: PRIORITY_TEXT,
        });
    }

    if !el.placeholder.is_empty() {
        candidates.push(SelectorCandidate {
            selector: Selector::Placeholder {
                placeholder: el.placeholder.clone(),
            },
            priority: PRIORITY_PLACEHOLDER,
        });
    }

    if !el.id.is_empty() {
        candidates.push(SelectorCandidate {
            selector: Selector::Css {
                css: format!("#{}", el.id),
            },
            priority: PRIORITY_ID,
        });
    }

    if let Some(class) = el.first_class() {
        candidates.push(SelectorCandidate {
            selector: Selector::Css {
                css: format!("{}.{}", el.tag, class),
            },
            priority: PRIORITY_CLASS,
        });
    }

    if !el.input_type.is_empty() {
        candidates.push(SelectorCandidate {
            selector: Selector::Css {
                css: format!("{}[type=\"{}\"]", el.tag, el.input_type),
            },
            priority: PRIORITY_TAG_TYPE,
        });
    }

    if !el.tag.is_empty() {
        candidates.push(SelectorCandidate {
            selector: Selector::Css {
                css: el.tag.clone(),
            },
            priority: PRIORITY_TAG,
        });
    }

    candidates
}

/// Collapse internal whitespace and cap the length. Returns `None` for empty
/// or over-long text.
fn clean_text(raw: &str, max: usize) -> Option<String> {
    let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() || cleaned.chars().count() > max {
        None
    } else {
        Some(cleaned)
    }
}

fn derive_verb(el: &ElementDescriptor, role: Option<Role>) -> Verb {
    match role {
        Some(Role::Checkbox) | Some(Role::Radio) => return Verb::Check,
        Some(Role::Combobox) => return Verb::SelectOption,
        Some(Role::Textbox) | Some(Role::Searchbox) | Some(Role::Spinbutton) => {
            return Verb::Fill
        }
        _ => {}
    }
    match el.tag.as_str() {
        "textarea" => Verb::Fill,
        "select" => Verb::SelectOption,
        "input" => match el.input_type.as_str() {
            "checkbox" | "radio" => Verb::Check,
            "submit" | "button" => Verb::Click,
            _ => Verb::Fill,
        },
        _ => Verb::Click,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(id: &str, text: &str) -> ElementDescriptor {
        ElementDescriptor {
            tag: "button".into(),
            id: id.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    #[test]
    fn candidates_follow_priority_order() {
        let el = ElementDescriptor {
            tag: "input".into(),
            id: "q".into(),
            class_name: "search-field wide".into(),
            input_type: "search".into(),
            placeholder: "Search...".into(),
            text: String::new(),
            ..Default::default()
        };
        let analysis = analyze(&el);
        let priorities: Vec<u8> = analysis.candidates.iter().map(|c| c.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
        // No visible text, so neither role-name nor text candidates appear.
        assert_eq!(
            analysis.best_selector().unwrap().priority,
            PRIORITY_PLACEHOLDER
        );
        assert_eq!(
            analysis.candidates.last().unwrap().selector,
            Selector::Css { css: "input".into() }
        );
    }

    #[test]
    fn role_name_ranks_first_when_text_present() {
        let analysis = analyze(&button("submit-btn", "Submit"));
        let best = analysis.best_selector().unwrap();
        assert_eq!(best.priority, PRIORITY_ROLE_NAME);
        assert_eq!(best.selector.as_locator(), "role=button[name=\"Submit\"]");
        assert_eq!(
            analysis.id_selector().unwrap().selector.as_locator(),
            "#submit-btn"
        );
    }

    #[test]
    fn long_text_is_skipped() {
        let el = button("", &"x".repeat(60));
        let analysis = analyze(&el);
        assert!(analysis
            .candidates
            .iter()
            .all(|c| c.priority != PRIORITY_TEXT && c.priority != PRIORITY_ROLE_NAME));
    }

    #[test]
    fn whitespace_collapses_in_text_candidates() {
        let el = button("", "  Open \n  report  ");
        let analysis = analyze(&el);
        assert_eq!(
            analysis.best_selector().unwrap().selector.as_locator(),
            "role=button[name=\"Open report\"]"
        );
    }

    #[test]
    fn verbs_match_element_kind() {
        let check = |tag: &str, ty: &str| {
            analyze(&ElementDescriptor {
                tag: tag.into(),
                input_type: ty.into(),
                ..Default::default()
            })
            .verb
        };
        assert_eq!(check("button", ""), Verb::Click);
        assert_eq!(check("a", ""), Verb::Click);
        assert_eq!(check("input", "text"), Verb::Fill);
        assert_eq!(check("input", "email"), Verb::Fill);
        assert_eq!(check("input", "checkbox"), Verb::Check);
        assert_eq!(check("input", "radio"), Verb::Check);
        assert_eq!(check("input", "submit"), Verb::Click);
        assert_eq!(check("textarea", ""), Verb::Fill);
        assert_eq!(check("select", ""), Verb::SelectOption);
        assert_eq!(check("div", ""), Verb::Click);
    }

    #[test]
    fn bare_tag_only_is_low_confidence() {
        let analysis = analyze(&ElementDescriptor {
            tag: "div".into(),
            ..Default::default()
        });
        assert!(analysis.is_low_confidence());
        assert!(!analyze(&button("go", "Go")).is_low_confidence());
    }

    #[test]
    fn empty_descriptor_yields_no_candidates() {
        let analysis = analyze(&ElementDescriptor::default());
        assert!(analysis.candidates.is_empty());
        assert!(analysis.best_selector().is_none());
        assert!(analysis.is_low_confidence());
    }

    #[test]
    fn analysis_is_deterministic() {
        let el = button("submit-btn", "Submit");
        let a = analyze(&el);
        let b = analyze(&el);
        assert_eq!(a.candidates, b.candidates);
        assert_eq!(a.role, b.role);
        assert_eq!(a.verb, b.verb);
    }
}
