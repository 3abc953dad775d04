use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChatError;

pub type ContactId = u32;
pub type MessageId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub last_message: String,
    pub time: String,
    pub unread: u32,
    pub online: bool,
}

impl Contact {
    /// First character of the name, used as the avatar letter.
    pub fn initial(&self) -> String {
        self.name.chars().next().map(|c| c.to_string()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Image,
    Video,
    File,
}

impl MessageKind {
    pub fn is_attachment(&self) -> bool {
        !matches!(self, MessageKind::Text)
    }

    /// Suggested accept filter for the picker that produces this kind.
    /// Advisory only, intake never enforces it.
    pub fn accept_filter(&self) -> &'static str {
        match self {
            MessageKind::Image => "image/*",
            MessageKind::Video => "video/*",
            MessageKind::Text | MessageKind::File => "*",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::Video => "video",
            MessageKind::File => "file",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Me,
    Them,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileData {
    pub name: String,
    pub size: String,
    pub url: Option<String>,
    pub preview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub text: Option<String>,
    pub kind: MessageKind,
    pub sender: Sender,
    pub time: String,
    pub encrypted: bool,
    pub file_data: Option<FileData>,
    pub forwarded: bool,
    pub forwarded_from: Option<String>,
}

impl Message {
    pub fn is_own(&self) -> bool {
        self.sender == Sender::Me
    }

    /// Copy is only offered for text messages that actually carry text.
    pub fn copyable_text(&self) -> Option<&str> {
        match (self.kind, self.text.as_deref()) {
            (MessageKind::Text, Some(text)) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    pub fn reference_url(&self) -> Option<&str> {
        self.file_data.as_ref().and_then(|fd| fd.url.as_deref())
    }
}

/// Side panel shown in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Chats,
    Contacts,
    Profile,
    Security,
}

impl View {
    pub const ALL: [View; 4] = [View::Chats, View::Contacts, View::Profile, View::Security];

    pub fn label(&self) -> &'static str {
        match self {
            View::Chats => "Chats",
            View::Contacts => "Contacts",
            View::Profile => "Profile",
            View::Security => "Security",
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            View::Chats => "chats",
            View::Contacts => "contacts",
            View::Profile => "profile",
            View::Security => "security",
        }
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn next(&self) -> View {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> View {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl FromStr for View {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .iter()
            .copied()
            .find(|v| v.tag() == s)
            .ok_or_else(|| ChatError::UnknownView(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Profile {
    pub display_name: String,
    pub handle: String,
    pub username: String,
    pub phone: String,
    pub email: String,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            display_name: "Your profile".to_string(),
            handle: "@cybername".to_string(),
            username: "CyberUser".to_string(),
            phone: "+7 XXX XXX XX XX".to_string(),
            email: "cyber@secure.net".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityStatus {
    Active,
    Action(&'static str),
    NotConfigured,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityItem {
    pub title: &'static str,
    pub detail: &'static str,
    pub status: SecurityStatus,
}
