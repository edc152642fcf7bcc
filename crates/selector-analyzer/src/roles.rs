use webrec_core_types::ElementDescriptor;

use crate::types::Role;

/// Map an element to its semantic role: tag/type lookup first, class-name
/// keywords as a fallback.
pub fn infer_role(el: &ElementDescriptor) -> Option<Role> {
    if let Some(role) = role_from_tag(&el.tag, &el.input_type) {
        return Some(role);
    }
    role_from_class(&el.class_name)
}

fn role_from_tag(tag: &str, input_type: &str) -> Option<Role> {
    match tag {
        "button" => Some(Role::Button),
        "a" => Some(Role::Link),
        "textarea" => Some(Role::Textbox),
        "select" => Some(Role::Combobox),
        "option" => Some(Role::Option),
        "img" => Some(Role::Img),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some(Role::Heading),
        "nav" => Some(Role::Navigation),
        "main" => Some(Role::Main),
        "table" => Some(Role::Table),
        "input" => Some(match input_type {
            "submit" | "button" => Role::Button,
            "checkbox" => Role::Checkbox,
            "radio" => Role::Radio,
            "search" => Role::Searchbox,
            "number" => Role::Spinbutton,
            // text, email, password, tel, url and unspecified all read as
            // plain text boxes
            _ => Role::Textbox,
        }),
        _ => None,
    }
}

fn role_from_class(class_name: &str) -> Option<Role> {
    if class_name.is_empty() {
        return None;
    }
    let class = class_name.to_lowercase();
    if class.contains("btn") || class.contains("button") {
        Some(Role::Button)
    } else if class.contains("link") {
        Some(Role::Link)
    } else if class.contains("nav") || class.contains("menu") {
        Some(Role::Navigation)
    } else if class.contains("search") {
        Some(Role::Searchbox)
    } else if class.contains("input") || class.contains("form") {
        Some(Role::Textbox)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(tag: &str, input_type: &str, class_name: &str) -> ElementDescriptor {
        ElementDescriptor {
            tag: tag.into(),
            input_type: input_type.into(),
            class_name: class_name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn tag_lookup_wins() {
        assert_eq!(infer_role(&el("button", "", "")), Some(Role::Button));
        assert_eq!(infer_role(&el("a", "", "")), Some(Role::Link));
        assert_eq!(infer_role(&el("select", "", "")), Some(Role::Combobox));
        assert_eq!(infer_role(&el("h2", "", "")), Some(Role::Heading));
    }

    #[test]
    fn input_type_refines_role() {
        assert_eq!(infer_role(&el("input", "checkbox", "")), Some(Role::Checkbox));
        assert_eq!(infer_role(&el("input", "radio", "")), Some(Role::Radio));
        assert_eq!(infer_role(&el("input", "search", "")), Some(Role::Searchbox));
        assert_eq!(infer_role(&el("input", "submit", "")), Some(Role::Button));
        assert_eq!(infer_role(&el("input", "email", "")), Some(Role::Textbox));
        assert_eq!(infer_role(&el("input", "", "")), Some(Role::Textbox));
    }

    #[test]
    fn class_keywords_fall_back() {
        assert_eq!(infer_role(&el("div", "", "btn-primary")), Some(Role::Button));
        assert_eq!(infer_role(&el("div", "", "main-menu")), Some(Role::Navigation));
        assert_eq!(infer_role(&el("div", "", "search-bar")), Some(Role::Searchbox));
        assert_eq!(infer_role(&el("div", "", "hero")), None);
        assert_eq!(infer_role(&el("span", "", "")), None);
    }
}
