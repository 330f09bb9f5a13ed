use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use swaparoo_config::scanner::ScannerConfig;
use swaparoo_core::{StoreError, Tagger, UserState, VocabularyStore, is_domain_blocked};
use swaparoo_types::{PageMessage, PartOfSpeech};

use crate::add_word::{AddWordFlow, Resolution};
use crate::dom::{Document, NodeId};
use crate::fragments::ActivePool;
use crate::messaging::BackgroundChannel;
use crate::modal::{Key, ModalView};
use crate::scanner::{self, ScanReport};
use crate::tooltip::TooltipLayer;

mod flow;
mod messages;
mod pointer;

/// Everything a page instance reacts to, in arrival order
#[derive(Debug)]
pub enum PageEvent {
    Message(PageMessage),
    PointerEnter(NodeId),
    PointerLeave(NodeId),
    Click(NodeId),
    KeyDown(Key),
    /// Part-of-speech picked in the add-word overlay
    SetPartOfSpeech(Option<PartOfSpeech>),
    HideTooltip {
        generation: u64,
    },
    TranslationResolved {
        generation: u64,
        result: Result<Resolution, String>,
    },
    Shutdown,
}

/// Shared services handed to every page
#[derive(Clone)]
pub struct PageContext {
    pub store: VocabularyStore,
    pub background: Arc<dyn BackgroundChannel>,
    pub tagger: Arc<dyn Tagger>,
    pub scanner: ScannerConfig,
    pub source_lang: String,
    pub target_lang: String,
}

struct ActiveFlow {
    flow: AddWordFlow,
    view: ModalView,
}

/// One loaded page: its document, the active pool and the in-page UI.
///
/// The instance is an actor. Store calls are awaited inline so events apply
/// in order; translations run as spawned tasks and come back as
/// [`PageEvent::TranslationResolved`].
pub struct PageInstance {
    document: Document,
    context: PageContext,
    events: AsyncSender<PageEvent>,
    pool: ActivePool,
    enabled: bool,
    blocked: bool,
    tooltip: TooltipLayer,
    flow: Option<ActiveFlow>,
}

impl PageInstance {
    /// `events` must feed the receiver later passed to [`PageInstance::run`]
    pub fn new(document: Document, context: PageContext, events: AsyncSender<PageEvent>) -> Self {
        let tooltip = TooltipLayer::new(
            Duration::from_millis(context.scanner.tooltip_hide_delay_ms),
            context.scanner.tooltip_offset_px,
        );

        Self {
            document,
            context,
            events,
            pool: ActivePool::new(),
            enabled: false,
            blocked: false,
            tooltip,
            flow: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn pool(&self) -> &ActivePool {
        &self.pool
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Substitution runs only when enabled on a non-blocked host
    pub fn is_active(&self) -> bool {
        self.enabled && !self.blocked
    }

    pub fn tooltip(&self) -> &TooltipLayer {
        &self.tooltip
    }

    pub fn flow(&self) -> Option<&AddWordFlow> {
        self.flow.as_ref().map(|f| &f.flow)
    }

    pub fn modal(&self) -> Option<&ModalView> {
        self.flow.as_ref().map(|f| &f.view)
    }

    /// Load the user state and run the first scan.
    ///
    /// On a store failure the page is left untouched and the error returned.
    pub async fn init(&mut self) -> Result<ScanReport, StoreError> {
        let state = self.context.store.state().await?;
        self.load_state(&state);
        self.enabled = state.enabled;
        Ok(self.rescan())
    }

    fn load_state(&mut self, state: &UserState) {
        self.pool = ActivePool::from_words(&state.learning_words);
        self.blocked = is_domain_blocked(self.document.hostname(), &state.blocked_domains);
        if self.blocked {
            tracing::info!("{} is blocked, substitution off", self.document.hostname());
        }
    }

    fn rescan(&mut self) -> ScanReport {
        if !self.is_active() {
            return ScanReport::default();
        }
        scanner::scan(&mut self.document, &self.pool)
    }

    /// Apply one event; false once the page should stop
    pub async fn handle(&mut self, event: PageEvent) -> bool {
        match event {
            PageEvent::Message(message) => self.handle_message(message).await,
            PageEvent::PointerEnter(node) => self.pointer_enter(node),
            PageEvent::PointerLeave(node) => self.pointer_leave(node),
            PageEvent::Click(node) => self.click(node).await,
            PageEvent::KeyDown(key) => self.key_down(key).await,
            PageEvent::SetPartOfSpeech(part_of_speech) => self.set_part_of_speech(part_of_speech),
            PageEvent::HideTooltip { generation } => {
                self.tooltip.hide_elapsed(&mut self.document, generation);
            }
            PageEvent::TranslationResolved { generation, result } => {
                self.translation_resolved(generation, result)
            }
            PageEvent::Shutdown => return false,
        }
        true
    }

    /// Page main loop; hands the instance back once the page goes away
    pub async fn run(mut self, events: AsyncReceiver<PageEvent>) -> Self {
        match self.init().await {
            Ok(report) => tracing::debug!(
                "Page {} ready: {} marker(s)",
                self.document.hostname(),
                report.markers_created
            ),
            Err(e) => tracing::error!("Failed to load user state, page left untouched: {}", e),
        }

        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(e) => {
                    tracing::debug!("Page channel closed: {}", e);
                    break;
                }
            };

            if !self.handle(event).await {
                break;
            }
        }

        self.tooltip.hide(&mut self.document);
        self.close_flow();
        self
    }
}
