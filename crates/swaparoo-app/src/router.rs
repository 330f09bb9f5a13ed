//! Background message router.
//!
//! Pages reach the background through [`RouterClient`]; each request rides in
//! an [`Envelope`] with a one-shot reply so it always resolves, either with a
//! reply payload or a [`MessagingError`]. Messages to pages go through the
//! [`TabRegistry`], which fails fast for tabs without a live listener.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use kanal::{AsyncReceiver, AsyncSender};
use swaparoo_page::{BackgroundChannel, PageEvent};
use swaparoo_translator::{TranslateError, translate_with_sentence, translate_word};
use swaparoo_types::{
    BackgroundRequest, BackgroundResponse, MessagingError, PageMessage, SentenceReply, TabId,
    TranslateReply,
};
use tokio::sync::{RwLock, oneshot};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

const SETTINGS_UNREADABLE_MESSAGE: &str = "Failed to read settings. Try again or reload the page.";

pub struct Envelope {
    pub request: BackgroundRequest,
    pub reply: oneshot::Sender<BackgroundResponse>,
}

/// Tabs with a loaded page listener
#[derive(Default)]
pub struct TabRegistry {
    tabs: RwLock<HashMap<TabId, AsyncSender<PageEvent>>>,
    active: RwLock<Option<TabId>>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, tab: TabId, events: AsyncSender<PageEvent>) {
        self.tabs.write().await.insert(tab, events);
        tracing::debug!("Tab {} registered", tab);
    }

    pub async fn unregister(&self, tab: TabId) {
        self.tabs.write().await.remove(&tab);

        let mut active = self.active.write().await;
        if *active == Some(tab) {
            *active = None;
        }
    }

    pub async fn activate(&self, tab: TabId) {
        *self.active.write().await = Some(tab);
    }

    pub async fn active_tab(&self) -> Option<TabId> {
        *self.active.read().await
    }

    /// Never waits on the page: a full queue is reported, a closed one forgotten
    pub async fn send_to_tab(&self, tab: TabId, message: PageMessage) -> Result<(), MessagingError> {
        let events = self
            .tabs
            .read()
            .await
            .get(&tab)
            .cloned()
            .ok_or(MessagingError::TargetAbsent(tab))?;

        if events.is_closed() {
            self.unregister(tab).await;
            return Err(MessagingError::TargetAbsent(tab));
        }

        let kind = message.kind();
        tracing::debug!("-> tab {}: {}", tab, kind);
        match events.try_send(PageEvent::Message(message)) {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::warn!("Tab {} queue full, {} not delivered", tab, kind);
                Err(MessagingError::TargetBusy(tab))
            }
            Err(_) => {
                self.unregister(tab).await;
                Err(MessagingError::TargetAbsent(tab))
            }
        }
    }

    pub async fn send_to_active(&self, message: PageMessage) -> Result<(), MessagingError> {
        let tab = self.active_tab().await.ok_or(MessagingError::NoActiveTab)?;
        self.send_to_tab(tab, message).await
    }

    /// Best-effort notification of the active tab; failures are logged and dropped
    pub async fn broadcast(&self, message: PageMessage) {
        let kind = message.kind();
        if let Err(e) = self.send_to_active(message).await {
            tracing::warn!("{} broadcast dropped: {}", kind, e);
        }
    }
}

/// Page-side handle onto the request loop
#[derive(Clone)]
pub struct RouterClient {
    requests: AsyncSender<Envelope>,
}

impl RouterClient {
    pub fn new(requests: AsyncSender<Envelope>) -> Self {
        Self { requests }
    }
}

#[async_trait]
impl BackgroundChannel for RouterClient {
    async fn request(&self, request: BackgroundRequest) -> Result<BackgroundResponse, MessagingError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(Envelope { request, reply })
            .await
            .map_err(|_| MessagingError::Disconnected)?;

        response.await.map_err(|_| MessagingError::Disconnected)
    }
}

/// Serve page requests until cancelled; each request runs on its own task.
///
/// On exit the request channel is closed: queued envelopes are dropped and
/// later sends fail, so every requester sees [`MessagingError::Disconnected`].
pub async fn request_loop(
    state: Arc<AppState>,
    requests: AsyncReceiver<Envelope>,
    cancel_token: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("Request loop started");
    loop {
        let envelope = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                tracing::info!("Request loop stopping");
                close_requests(&requests);
                return Ok(());
            }
            envelope = requests.recv() => match envelope {
                Ok(envelope) => envelope,
                Err(e) => {
                    close_requests(&requests);
                    return Err(e.into());
                }
            },
        };

        let state = state.clone();
        tokio::spawn(async move {
            let kind = envelope.request.kind();
            let response = handle_request(&state, envelope.request).await;
            if envelope.reply.send(response).is_err() {
                tracing::debug!("{} requester went away", kind);
            }
        });
    }
}

fn close_requests(requests: &AsyncReceiver<Envelope>) {
    let pending = requests.len();
    if requests.close().is_ok() && pending > 0 {
        tracing::warn!("Dropped {} pending request(s)", pending);
    }
}

/// Resolve one page request; provider failures come back as error payloads
pub async fn handle_request(state: &AppState, request: BackgroundRequest) -> BackgroundResponse {
    tracing::debug!("<- {}", request.kind());

    let api_key = match state.store.api_key().await {
        Ok(key) => key.unwrap_or_default(),
        Err(e) => {
            tracing::error!("Failed to read API key: {}", e);
            return failure(&request, SETTINGS_UNREADABLE_MESSAGE);
        }
    };

    let translator = state.translators.translator(&api_key);
    let languages = state.languages().await;

    match request {
        BackgroundRequest::Translate {
            word,
            direction,
            context,
        } => {
            match translate_word(translator.as_ref(), &languages, &word, direction, context.as_deref()).await {
                Ok(translation) => BackgroundResponse::Translation(TranslateReply::ok(translation)),
                Err(e) => {
                    log_failure(&e);
                    BackgroundResponse::Translation(TranslateReply::failed(e.user_message()))
                }
            }
        }
        BackgroundRequest::TranslateWithSentence {
            word,
            sentence,
            direction,
        } => match translate_with_sentence(translator.as_ref(), &languages, &word, &sentence, direction).await {
            Ok(result) => {
                BackgroundResponse::SentenceTranslation(SentenceReply::ok(result.word, result.sentence))
            }
            Err(e) => {
                log_failure(&e);
                BackgroundResponse::SentenceTranslation(SentenceReply::failed(e.user_message()))
            }
        },
    }
}

fn failure(request: &BackgroundRequest, message: &str) -> BackgroundResponse {
    match request {
        BackgroundRequest::Translate { .. } => BackgroundResponse::Translation(TranslateReply::failed(message)),
        BackgroundRequest::TranslateWithSentence { .. } => {
            BackgroundResponse::SentenceTranslation(SentenceReply::failed(message))
        }
    }
}

fn log_failure(error: &TranslateError) {
    if error.is_configuration() {
        tracing::warn!("Translation skipped: {}", error);
    } else {
        tracing::error!("Translation failed: {}", error);
    }
}
