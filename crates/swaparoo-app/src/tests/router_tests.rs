use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use swaparoo_config::Config;
use swaparoo_core::VocabularyStore;
use swaparoo_page::BackgroundChannel;
use swaparoo_translator::DeepLProvider;
use swaparoo_types::{
    BackgroundRequest, BackgroundResponse, Direction, MessagingError, PageMessage, SentenceReply,
};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::router::{RouterClient, TabRegistry, handle_request, request_loop};
use crate::{AppController, AppState};

fn app_state(server: &MockServer, store: VocabularyStore) -> Arc<AppState> {
    let mut config = Config::default();
    config.translator.api_url = format!("{}/v2/translate", server.uri());
    let translators = Arc::new(DeepLProvider::new(config.translator.api_url.clone()));
    Arc::new(AppState::new(config, store, translators))
}

fn run_request() -> BackgroundRequest {
    BackgroundRequest::TranslateWithSentence {
        word: "run".to_string(),
        sentence: "I like to run.".to_string(),
        direction: Direction::SourceToTarget,
    }
}

#[tokio::test]
async fn sentence_request_without_key_is_an_error_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let state = app_state(&server, VocabularyStore::in_memory());
    let response = handle_request(&state, run_request()).await;

    assert_eq!(
        response,
        BackgroundResponse::SentenceTranslation(SentenceReply::failed(
            "Add your API key in settings to enable translation."
        ))
    );
}

#[tokio::test]
async fn client_round_trip_through_request_loop() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("Authorization", "DeepL-Auth-Key secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translations": [{"text": "Correr"}, {"text": "Me gusta correr."}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = VocabularyStore::in_memory();
    store.set_api_key(Some("secret".to_string())).await.unwrap();

    let controller = AppController::new(app_state(&server, store)).await;
    let mut tasks = controller.spawn_tasks();

    let response = timeout(Duration::from_secs(2), controller.client().request(run_request()))
        .await
        .expect("request timed out")
        .expect("router answered");
    assert_eq!(
        response,
        BackgroundResponse::SentenceTranslation(SentenceReply::ok(
            Some("correr".to_string()),
            Some("Me gusta correr.".to_string())
        ))
    );

    controller.shutdown();
    let stopped = timeout(Duration::from_secs(2), tasks.join_next()).await.unwrap();
    assert!(matches!(stopped, Some(Ok(Ok(())))));
}

#[tokio::test]
async fn provider_failure_is_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = VocabularyStore::in_memory();
    store.set_api_key(Some("secret".to_string())).await.unwrap();
    let state = app_state(&server, store);

    let response = handle_request(
        &state,
        BackgroundRequest::Translate {
            word: "water".to_string(),
            direction: Direction::SourceToTarget,
            context: None,
        },
    )
    .await;

    match response {
        BackgroundResponse::Translation(reply) => {
            assert_eq!(reply.translation, None);
            assert_eq!(
                reply.error.as_deref(),
                Some("Translation failed. Check your connection and API key.")
            );
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[tokio::test]
async fn client_without_router_is_disconnected() {
    let (tx, rx) = kanal::bounded_async(1);
    drop(rx);

    let err = RouterClient::new(tx).request(run_request()).await.unwrap_err();
    assert_eq!(err, MessagingError::Disconnected);
}

#[tokio::test]
async fn requests_after_shutdown_are_disconnected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let controller = AppController::new(app_state(&server, VocabularyStore::in_memory())).await;
    let mut tasks = controller.spawn_tasks();
    let client = controller.client();

    controller.shutdown();
    let stopped = timeout(Duration::from_secs(2), tasks.join_next()).await.unwrap();
    assert!(matches!(stopped, Some(Ok(Ok(())))));

    let result = timeout(
        Duration::from_secs(2),
        client.request(BackgroundRequest::Translate {
            word: "water".to_string(),
            direction: Direction::SourceToTarget,
            context: None,
        }),
    )
    .await
    .expect("request must resolve after shutdown");
    assert_eq!(result.unwrap_err(), MessagingError::Disconnected);
}

#[tokio::test]
async fn queued_request_is_released_on_shutdown() {
    let (tx, rx) = kanal::bounded_async(4);
    let client = RouterClient::new(tx);
    let pending = tokio::spawn(async move { client.request(run_request()).await });

    // let the envelope land in the queue before the loop ever runs
    tokio::task::yield_now().await;
    let server = MockServer::start().await;
    let token = CancellationToken::new();
    token.cancel();
    request_loop(app_state(&server, VocabularyStore::in_memory()), rx, token)
        .await
        .unwrap();

    let result = timeout(Duration::from_secs(2), pending)
        .await
        .expect("queued request must resolve")
        .unwrap();
    assert_eq!(result.unwrap_err(), MessagingError::Disconnected);
}

#[tokio::test]
async fn closed_tab_is_reported_and_forgotten() {
    let registry = TabRegistry::new();
    let (tx, rx) = kanal::bounded_async(4);
    registry.register(3, tx).await;
    registry.activate(3).await;

    registry
        .send_to_tab(3, PageMessage::Toggle { enabled: false })
        .await
        .unwrap();
    assert!(rx.recv().await.is_ok());

    drop(rx);
    let err = registry
        .send_to_active(PageMessage::Toggle { enabled: true })
        .await
        .unwrap_err();
    assert_eq!(err, MessagingError::TargetAbsent(3));
    assert_eq!(registry.active_tab().await, None);

    // broadcasts swallow the failure
    registry.broadcast(PageMessage::Toggle { enabled: true }).await;
}

#[tokio::test]
async fn full_tab_queue_fails_fast() {
    let registry = TabRegistry::new();
    let (tx, rx) = kanal::bounded_async(1);
    registry.register(5, tx).await;
    registry.activate(5).await;

    registry
        .send_to_active(PageMessage::Toggle { enabled: false })
        .await
        .unwrap();
    let err = timeout(
        Duration::from_secs(1),
        registry.send_to_active(PageMessage::Toggle { enabled: true }),
    )
    .await
    .expect("send must not wait for the page")
    .unwrap_err();
    assert_eq!(err, MessagingError::TargetBusy(5));

    // a slow tab stays registered
    assert_eq!(registry.active_tab().await, Some(5));
    assert!(rx.recv().await.is_ok());
    registry
        .send_to_tab(5, PageMessage::Toggle { enabled: true })
        .await
        .unwrap();
}
