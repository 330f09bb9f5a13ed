mod language;
mod messages;

pub use language::{Direction, ParseDirectionError, ParsePartOfSpeechError, PartOfSpeech};
pub use messages::{
    BackgroundRequest, BackgroundResponse, MessagingError, PageMessage, SentenceReply, TabId,
    TranslateReply,
};
