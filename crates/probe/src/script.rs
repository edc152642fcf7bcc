use webrec_core_types::WindowId;

/// Placeholder substituted with the owning window's id at injection time.
const WINDOW_ID_PLACEHOLDER: &str = "__WEBREC_WINDOW_ID__";

/// Client-side instrumentation source.
///
/// Runs inside the page, captures interactions and relays each one as a
/// single `RECORDER_EVENT:<type>:<json>` console line. Fire-and-forget: the
/// relay never blocks or alters the interaction itself. Typed input is
/// debounced and flushed immediately on blur or Enter.
const PROBE_SCRIPT: &str = r#"
(function() {
    const windowId = '__WEBREC_WINDOW_ID__';

    if (window.__webrecWindowId === windowId) {
        return 'already_injected';
    }
    window.__webrecWindowId = windowId;

    function getElementInfo(element) {
        if (!element || !element.tagName) return {};
        const rect = element.getBoundingClientRect();
        return {
            tag: element.tagName.toLowerCase(),
            id: element.id || '',
            class: element.className || '',
            name: element.name || '',
            type: element.type || '',
            value: element.type === 'password' ? '***' : (element.value || ''),
            text: (element.innerText || element.textContent || '').substring(0, 100),
            href: element.href || '',
            placeholder: element.placeholder || '',
            target: element.target || '',
            x: Math.round(rect.x),
            y: Math.round(rect.y),
            width: Math.round(rect.width),
            height: Math.round(rect.height),
            cssSelector: getCssSelector(element),
            parentTag: element.parentElement ? element.parentElement.tagName.toLowerCase() : '',
            parentId: element.parentElement ? element.parentElement.id : '',
            parentClass: element.parentElement ? (element.parentElement.className || '').split(' ')[0] : ''
        };
    }

    function getCssSelector(element) {
        if (!element) return '';
        if (element.id) return '#' + element.id;
        if (element.className) {
            const classes = String(element.className).split(' ').filter(c => c.trim());
            if (classes.length > 0) {
                return element.tagName.toLowerCase() + '.' + classes[0];
            }
        }
        return element.tagName.toLowerCase();
    }

    function relayEvent(eventType, element, eventData) {
        try {
            const payload = {
                windowId: windowId,
                eventType: eventType,
                element: getElementInfo(element),
                page: { url: window.location.href, title: document.title },
                eventData: eventData || {},
                timestamp: Date.now() / 1000.0
            };
            console.log('RECORDER_EVENT:' + eventType + ':' + JSON.stringify(payload));
        } catch (err) {
            // Never let instrumentation break the page.
        }
    }

    document.addEventListener('click', function(event) {
        relayEvent('click', event.target, {
            button: event.button,
            ctrlKey: event.ctrlKey,
            shiftKey: event.shiftKey,
            altKey: event.altKey
        });
        const link = event.target.closest ? event.target.closest('a') : null;
        if (link && link.href) {
            relayEvent('link_click', link, { href: link.href, target: link.target || '_self' });
        }
    }, true);

    // Debounced typed input; flushed immediately on blur or Enter.
    const pendingInput = new Map();

    function flushInput(element) {
        const pending = pendingInput.get(element);
        if (!pending) return;
        clearTimeout(pending.timer);
        pendingInput.delete(element);
        relayEvent('input', element, pending.data);
    }

    document.addEventListener('input', function(event) {
        const element = event.target;
        const isPassword = element.type === 'password';
        const data = { value: isPassword ? '***' : element.value, inputType: event.inputType || '' };
        const existing = pendingInput.get(element);
        if (existing) clearTimeout(existing.timer);
        pendingInput.set(element, {
            data: data,
            timer: setTimeout(function() { flushInput(element); }, 400)
        });
    }, true);

    document.addEventListener('blur', function(event) {
        flushInput(event.target);
    }, true);

    document.addEventListener('keydown', function(event) {
        if (event.key === 'Enter') {
            flushInput(event.target);
        }
        if (['Enter', 'Tab', 'Escape'].includes(event.key)) {
            relayEvent('keydown', event.target, {
                key: event.key,
                ctrlKey: event.ctrlKey,
                shiftKey: event.shiftKey,
                altKey: event.altKey
            });
        }
    }, true);

    document.addEventListener('submit', function(event) {
        relayEvent('submit', event.target, {
            action: event.target.action || '',
            method: event.target.method || 'get'
        });
    }, true);

    document.addEventListener('change', function(event) {
        const element = event.target;
        const data = { value: element.value || '' };
        if (element.tagName.toLowerCase() === 'select') {
            const option = element.options[element.selectedIndex];
            data.selectedText = option ? option.text : '';
        } else if (element.type === 'checkbox' || element.type === 'radio') {
            data.checked = element.checked;
        }
        relayEvent('change', element, data);
    }, true);

    const originalOpen = window.open;
    window.open = function(url, target, features) {
        relayEvent('window_open', null, { url: url, target: target || '_blank' });
        return originalOpen.call(this, url, target, features);
    };

    return 'injected';
})();
"#;

/// Render the probe source for one window.
pub fn probe_script(window: &WindowId) -> String {
    PROBE_SCRIPT.replace(WINDOW_ID_PLACEHOLDER, &window.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_embeds_window_id() {
        let window = WindowId("win-42".into());
        let script = probe_script(&window);
        assert!(script.contains("'win-42'"));
        assert!(!script.contains(WINDOW_ID_PLACEHOLDER));
    }
}
