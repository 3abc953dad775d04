use std::path::PathBuf;
use thiserror::Error;

use crate::models::MessageId;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("unknown view tag: {0}")]
    UnknownView(String),

    #[error("no message with id {0}")]
    UnknownMessage(MessageId),

    #[error("cannot read attachment {path}: {source}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no message is staged for forwarding")]
    NothingToForward,

    #[error("message {0} has no live file reference")]
    NoReference(MessageId),

    #[error("failed to save {name} to {dest}: {source}")]
    Download {
        name: String,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings error: {0}")]
    Settings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChatError>;
