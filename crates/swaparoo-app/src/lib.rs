pub mod context_menu;
pub mod controller;
pub mod page_file;
pub mod popup;
pub mod router;
pub mod state;

pub use controller::{AppController, TabHandle};
pub use state::AppState;

#[cfg(test)]
mod tests;
