use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use swaparoo_config::Config;
use swaparoo_core::VocabularyStore;
use swaparoo_page::PageEvent;
use swaparoo_page::modal::Key;
use swaparoo_page::scanner::markers;
use swaparoo_translator::DeepLProvider;
use swaparoo_types::{Direction, MessagingError};
use tokio::time::timeout;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::page_file::{document_from_text, render_swapped};
use crate::popup::PopupError;
use crate::{AppController, AppState};

const PAGE: &str = "The water is cold today.";

async fn controller() -> AppController {
    let config = Config::default();
    let translators = Arc::new(DeepLProvider::new(config.translator.api_url.clone()));
    let state = Arc::new(AppState::new(config, VocabularyStore::in_memory(), translators));
    AppController::new(state).await
}

#[tokio::test]
async fn added_word_reaches_the_open_tab() {
    let controller = controller().await;
    let popup = controller.popup();
    let tab = controller
        .open_tab(1, document_from_text("example.com", None, PAGE))
        .await;

    assert!(popup.add_word("Cold", "Frío").await.unwrap());
    assert!(!popup.add_word("COLD", "helado").await.unwrap());

    let page = controller.close_tab(tab).await.unwrap();
    assert_eq!(render_swapped(page.document()), "The [agua] is [frío] today.");
    assert_eq!(
        popup.state().await.unwrap().find_learning("cold").unwrap().target_word,
        "frío"
    );
}

#[tokio::test]
async fn learned_words_leave_the_page_and_come_back() {
    let controller = controller().await;
    let popup = controller.popup();
    let tab = controller
        .open_tab(1, document_from_text("example.com", None, PAGE))
        .await;

    assert!(popup.mark_learned("water").await.unwrap());
    let state = popup.state().await.unwrap();
    assert!(state.find_learning("water").is_none());
    assert!(state.find_learned("water").is_some());

    let page = controller.close_tab(tab).await.unwrap();
    assert!(markers(page.document()).is_empty());

    let tab = controller
        .open_tab(2, document_from_text("example.com", None, PAGE))
        .await;
    assert!(popup.move_to_learning("water").await.unwrap());
    let page = controller.close_tab(tab).await.unwrap();
    assert_eq!(render_swapped(page.document()), "The [agua] is cold today.");

    let state = popup.state().await.unwrap();
    assert!(state.find_learned("water").is_none());
}

#[tokio::test]
async fn toggle_and_block_reach_the_page() {
    let controller = controller().await;
    let popup = controller.popup();

    let tab = controller
        .open_tab(1, document_from_text("news.example.com", None, PAGE))
        .await;
    popup.set_enabled(false).await.unwrap();
    let page = controller.close_tab(tab).await.unwrap();
    assert_eq!(render_swapped(page.document()), PAGE);
    assert!(!page.is_enabled());

    popup.set_enabled(true).await.unwrap();
    let tab = controller
        .open_tab(2, document_from_text("news.example.com", None, PAGE))
        .await;
    assert_eq!(popup.block_domain(" *.Example.COM ").await.unwrap(), "example.com");
    let page = controller.close_tab(tab).await.unwrap();
    assert!(page.is_blocked());
    assert_eq!(render_swapped(page.document()), PAGE);

    // unblocking applies to pages loaded afterwards
    assert!(popup.unblock_domain("EXAMPLE.com").await.unwrap());
    assert!(popup.state().await.unwrap().blocked_domains.is_empty());
    let tab = controller
        .open_tab(3, document_from_text("news.example.com", None, PAGE))
        .await;
    let page = controller.close_tab(tab).await.unwrap();
    assert_eq!(render_swapped(page.document()), "The [agua] is cold today.");
}

#[tokio::test]
async fn popup_validates_input_without_an_open_tab() {
    let controller = controller().await;
    let popup = controller.popup();

    assert!(matches!(
        popup.add_word("  ", "agua").await,
        Err(PopupError::MissingFields)
    ));
    assert!(matches!(
        popup.block_domain("   ").await,
        Err(PopupError::InvalidDomain)
    ));

    // no tab is listening; the store write still lands
    assert!(popup.remove_word("water").await.unwrap());
    assert!(popup.state().await.unwrap().find_learning("water").is_none());
}

#[tokio::test]
async fn typed_word_is_translated_and_added_on_the_active_tab() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"text": ["fast"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translations": [{"text": "Rápido"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.translator.api_url = format!("{}/v2/translate", server.uri());
    let translators = Arc::new(DeepLProvider::new(config.translator.api_url.clone()));
    let store = VocabularyStore::in_memory();
    store.set_api_key(Some("secret".to_string())).await.unwrap();
    let controller = AppController::new(Arc::new(AppState::new(config, store, translators))).await;
    let mut tasks = controller.spawn_tasks();
    let popup = controller.popup();

    let tab = controller
        .open_tab(1, document_from_text("example.com", None, "Rivers run fast."))
        .await;
    popup
        .show_add_modal(" Fast\n", None, Direction::SourceToTarget, None)
        .await
        .unwrap();

    // Enter is ignored until the translation has landed in the overlay
    timeout(Duration::from_secs(2), async {
        loop {
            tab.events.send(PageEvent::KeyDown(Key::Enter)).await.unwrap();
            if popup.state().await.unwrap().find_learning("fast").is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("typed word was never added");

    let page = controller.close_tab(tab).await.unwrap();
    assert_eq!(render_swapped(page.document()), "Rivers run [rápido].");
    assert_eq!(
        popup.state().await.unwrap().find_learning("fast").unwrap().target_word,
        "rápido"
    );

    controller.shutdown();
    tasks.shutdown().await;
}

#[tokio::test]
async fn typed_word_without_a_page_is_an_error() {
    let controller = controller().await;
    let popup = controller.popup();

    assert!(matches!(
        popup.show_add_modal("   ", None, Direction::SourceToTarget, None).await,
        Err(PopupError::MissingWord)
    ));
    assert!(matches!(
        popup.show_add_modal("fast", None, Direction::SourceToTarget, None).await,
        Err(PopupError::NoPage(MessagingError::NoActiveTab))
    ));

    let tab = controller
        .open_tab(4, document_from_text("example.com", None, PAGE))
        .await;
    controller.close_tab(tab).await.unwrap();
    assert!(matches!(
        popup.show_add_modal("fast", None, Direction::SourceToTarget, None).await,
        Err(PopupError::NoPage(MessagingError::NoActiveTab))
    ));
}
