pub mod add_word;
pub mod dom;
pub mod fragments;
pub mod instance;
pub mod messaging;
pub mod modal;
pub mod scanner;
pub mod selection;
pub mod tooltip;

pub use add_word::{AddWordFlow, FlowError, FlowStatus, Resolution};
pub use dom::{Document, NodeId, Rect};
pub use fragments::{ActivePool, Fragment, compute_fragments};
pub use instance::{PageContext, PageEvent, PageInstance};
pub use messaging::BackgroundChannel;
pub use scanner::ScanReport;
