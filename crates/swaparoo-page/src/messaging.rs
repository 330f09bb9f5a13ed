use async_trait::async_trait;
use swaparoo_types::{BackgroundRequest, BackgroundResponse, MessagingError};

/// Request/response link from a page to the background process
#[async_trait]
pub trait BackgroundChannel: Send + Sync {
    async fn request(&self, request: BackgroundRequest) -> Result<BackgroundResponse, MessagingError>;
}
