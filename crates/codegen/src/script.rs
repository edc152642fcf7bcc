use serde::{Deserialize, Serialize};

use webrec_selector_analyzer::Verb;

/// One replayable automation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptStep {
    Navigate {
        url: String,
    },
    Interact {
        /// Selector-engine locator string, e.g. `#submit-btn` or
        /// `role=button[name="Submit"]`.
        selector: String,
        /// Same selector rendered as a Playwright locator call.
        locator_call: String,
        verb: Verb,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(default)]
        low_confidence: bool,
        description: String,
    },
    /// Placeholder for a record that could not be turned into a step.
    Comment {
        text: String,
    },
}

/// Ordered replay script for one recording session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Render as a runnable Playwright Python script.
    pub fn render_playwright(&self) -> String {
        let mut lines = vec![
            "import asyncio".to_string(),
            "from playwright.async_api import Playwright, async_playwright".to_string(),
            String::new(),
            String::new(),
            "async def run(playwright: Playwright) -> None:".to_string(),
            "    browser = await playwright.chromium.launch(headless=False)".to_string(),
            "    context = await browser.new_context()".to_string(),
            "    page = await context.new_page()".to_string(),
        ];
        for step in &self.steps {
            lines.push(format!("    {}", step.render_playwright_line()));
        }
        lines.push(String::new());
        lines.push("    await context.close()".to_string());
        lines.push("    await browser.close()".to_string());
        lines.push(String::new());
        lines.push(String::new());
        lines.push("async def main() -> None:".to_string());
        lines.push("    async with async_playwright() as playwright:".to_string());
        lines.push("        await run(playwright)".to_string());
        lines.push(String::new());
        lines.push(String::new());
        lines.push("asyncio.run(main())".to_string());
        lines.join("\n")
    }
}

impl ScriptStep {
    pub fn render_playwright_line(&self) -> String {
        match self {
            ScriptStep::Navigate { url } => format!("await page.goto(\"{}\")", url),
            ScriptStep::Interact {
                locator_call,
                verb,
                value,
                low_confidence,
                ..
            } => {
                let call = match (verb, value) {
                    (Verb::Fill, Some(v)) => {
                        format!("await page.{}.fill(\"{}\")", locator_call, v)
                    }
                    (Verb::SelectOption, Some(v)) => {
                        format!("await page.{}.select_option(label=\"{}\")", locator_call, v)
                    }
                    _ => format!("await page.{}.{}()", locator_call, verb.name()),
                };
                if *low_confidence {
                    format!("{}  # low confidence selector", call)
                } else {
                    call
                }
            }
            ScriptStep::Comment { text } => format!("# {}", text),
        }
    }
}
