// Demo data the session starts with.

use crate::models::{
    Contact, FileData, Message, MessageKind, SecurityItem, SecurityStatus, Sender,
};

pub fn contacts() -> Vec<Contact> {
    let contact = |id, name: &str, last: &str, time: &str, unread, online| Contact {
        id,
        name: name.to_string(),
        last_message: last.to_string(),
        time: time.to_string(),
        unread,
        online,
    };

    vec![
        contact(1, "Cyberhacker", "Data encrypted 🔒", "12:34", 2, true),
        contact(2, "Neon Ghost", "See you on the grid", "11:20", 0, true),
        contact(3, "Code Samurai", "File received", "yesterday", 5, false),
        contact(4, "Data Ninja", "Check the new protocol", "yesterday", 0, false),
    ]
}

fn text(id: u64, body: &str, sender: Sender, time: &str) -> Message {
    Message {
        id,
        text: Some(body.to_string()),
        kind: MessageKind::Text,
        sender,
        time: time.to_string(),
        encrypted: true,
        file_data: None,
        forwarded: false,
        forwarded_from: None,
    }
}

pub fn messages() -> Vec<Message> {
    vec![
        text(1, "Hi! Is everything secured?", Sender::Them, "12:30"),
        text(2, "Yes, E2E encryption is active 🔐", Sender::Me, "12:31"),
        text(3, "Sending the secret data", Sender::Them, "12:32"),
        Message {
            id: 4,
            text: None,
            kind: MessageKind::File,
            sender: Sender::Them,
            time: "12:33".to_string(),
            encrypted: true,
            file_data: Some(FileData {
                name: "secret_data.enc".to_string(),
                size: "2.4 MB".to_string(),
                url: None,
                preview: None,
            }),
            forwarded: false,
            forwarded_from: None,
        },
        text(5, "Data encrypted 🔒", Sender::Them, "12:34"),
        text(6, "Got it, decrypting now", Sender::Me, "12:35"),
    ]
}

pub fn security_items() -> Vec<SecurityItem> {
    vec![
        SecurityItem {
            title: "E2E encryption",
            detail: "End-to-end encryption is on for all chats",
            status: SecurityStatus::Active,
        },
        SecurityItem {
            title: "Encryption keys",
            detail: "Last refreshed: today",
            status: SecurityStatus::Action("Refresh"),
        },
        SecurityItem {
            title: "Privacy",
            detail: "Manage visibility and access",
            status: SecurityStatus::Action("Configure"),
        },
        SecurityItem {
            title: "Two-factor authentication",
            detail: "Enable for extra protection",
            status: SecurityStatus::NotConfigured,
        },
    ]
}
