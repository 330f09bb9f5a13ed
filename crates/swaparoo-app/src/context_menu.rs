use swaparoo_types::{MessagingError, PageMessage, TabId};

use crate::router::TabRegistry;

pub const MENU_ID: &str = "swaparoo-add";
pub const SHORTCUT_COMMAND: &str = "add-selected-word";
const MENU_TITLE: &str = "Add “%s” to Swaparoo";

/// Title with `%s` standing for the selection, as the browser menu API expects
pub fn menu_title() -> &'static str {
    MENU_TITLE
}

/// Title as shown for a concrete selection
pub fn render_title(selection: &str) -> String {
    MENU_TITLE.replace("%s", selection.trim())
}

/// The entry is only offered for a single word
pub fn is_enabled_for(selection: &str) -> bool {
    let selection = selection.trim();
    !selection.is_empty() && !selection.contains(char::is_whitespace)
}

/// Context menu click on `tab`; the word comes from the browser's selection text
pub async fn on_menu_clicked(
    registry: &TabRegistry,
    menu_id: &str,
    tab: TabId,
    selection: &str,
) -> Result<(), MessagingError> {
    if menu_id != MENU_ID || !is_enabled_for(selection) {
        tracing::debug!("Ignoring menu click {} on {:?}", menu_id, selection);
        return Ok(());
    }

    registry
        .send_to_tab(
            tab,
            PageMessage::AddWord {
                word: selection.trim().to_string(),
            },
        )
        .await
        .inspect_err(|e| tracing::error!("Add word from menu failed: {}", e))
}

/// Keyboard shortcut; the page reads its own selection
pub async fn on_command(registry: &TabRegistry, command: &str) -> Result<(), MessagingError> {
    if command != SHORTCUT_COMMAND {
        tracing::debug!("Unknown command {}", command);
        return Ok(());
    }

    registry
        .send_to_active(PageMessage::AddWord {
            word: String::new(),
        })
        .await
        .inspect_err(|e| tracing::error!("Add word from shortcut failed: {}", e))
}
