use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use swaparoo_page::{Document, PageContext, PageEvent, PageInstance};
use swaparoo_types::TabId;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::popup::PopupActions;
use crate::router::{Envelope, RouterClient, TabRegistry, request_loop};
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub requests: (AsyncSender<Envelope>, AsyncReceiver<Envelope>),
}

impl ChannelSet {
    pub fn new(request_capacity: usize) -> Self {
        Self {
            requests: kanal::bounded_async(request_capacity),
        }
    }
}

/// A page running in its own task
pub struct TabHandle {
    pub id: TabId,
    pub events: AsyncSender<PageEvent>,
    task: JoinHandle<PageInstance>,
}

/// Background controller: owns the router, spawns pages, stops everything
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    registry: Arc<TabRegistry>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub async fn new(state: Arc<AppState>) -> Self {
        let capacity = state.config.read().await.request_channel_capacity;
        Self {
            channels: ChannelSet::new(capacity),
            state,
            registry: Arc::new(TabRegistry::new()),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Page request loop
        tasks.spawn(request_loop(
            self.state.clone(),
            self.channels.requests.1.clone(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn registry(&self) -> Arc<TabRegistry> {
        self.registry.clone()
    }

    pub fn client(&self) -> RouterClient {
        RouterClient::new(self.channels.requests.0.clone())
    }

    pub fn popup(&self) -> PopupActions {
        PopupActions::new(self.state.store.clone(), self.registry.clone())
    }

    /// Load `document` into tab `id`, make it active and start its page loop
    pub async fn open_tab(&self, id: TabId, document: Document) -> TabHandle {
        let (scanner, source_lang, target_lang, capacity) = {
            let config = self.state.config.read().await;
            (
                config.scanner.clone(),
                config.translator.source_lang.clone(),
                config.translator.target_lang.clone(),
                config.page_channel_capacity,
            )
        };

        let context = PageContext {
            store: self.state.store.clone(),
            background: Arc::new(self.client()),
            tagger: self.state.tagger.clone(),
            scanner,
            source_lang,
            target_lang,
        };

        let (tx, rx) = kanal::bounded_async(capacity);
        let page = PageInstance::new(document, context, tx.clone());

        self.registry.register(id, tx.clone()).await;
        self.registry.activate(id).await;
        tracing::info!("Tab {} opened", id);

        TabHandle {
            id,
            events: tx,
            task: tokio::spawn(page.run(rx)),
        }
    }

    /// Stop a page and hand back its final state
    pub async fn close_tab(&self, tab: TabHandle) -> anyhow::Result<PageInstance> {
        self.registry.unregister(tab.id).await;
        if let Err(e) = tab.events.send(PageEvent::Shutdown).await {
            tracing::debug!("Tab {} already stopped: {}", tab.id, e);
        }

        let page = tab.task.await?;
        tracing::info!("Tab {} closed", tab.id);
        Ok(page)
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
