//! In-memory session state.
//!
//! [`MessageStore`] owns the single conversation thread and its id counter.
//! [`Session`] ties the store together with the contact directory, the view
//! selection, the staged input, transient file references and toasts. All
//! mutations are plain method calls; nothing here knows about the terminal.

use chrono::Local;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::attachment::{self, AttachmentDescriptor, PickedFile, ReferenceRegistry};
use crate::clipboard::Clipboard;
use crate::error::{ChatError, Result};
use crate::models::{
    Contact, ContactId, FileData, Message, MessageId, MessageKind, Profile, Sender, View,
};
use crate::notifications::Notifications;
use crate::seed;
use crate::settings::Settings;

/// Local wall-clock time as shown under each bubble.
pub fn current_time() -> String {
    Local::now().format("%H:%M").to_string()
}

#[derive(Debug, Clone)]
pub struct MessageStore {
    messages: Vec<Message>,
    next_id: MessageId,
}

impl MessageStore {
    pub fn new(messages: Vec<Message>) -> Self {
        let next_id = messages.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        MessageStore { messages, next_id }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Ids keep increasing across deletes and are never handed out twice.
    fn allocate_id(&mut self) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        // just pushed
        &self.messages[self.messages.len() - 1]
    }

    fn outgoing(&mut self, kind: MessageKind) -> Message {
        Message {
            id: self.allocate_id(),
            text: None,
            kind,
            sender: Sender::Me,
            time: current_time(),
            encrypted: true,
            file_data: None,
            forwarded: false,
            forwarded_from: None,
        }
    }

    /// Blank or whitespace-only text is ignored.
    pub fn append_text(&mut self, text: &str) -> Option<&Message> {
        if text.trim().is_empty() {
            return None;
        }
        let mut message = self.outgoing(MessageKind::Text);
        message.text = Some(text.to_string());
        Some(self.push(message))
    }

    pub fn append_attachment(&mut self, descriptor: &AttachmentDescriptor) -> &Message {
        let preview = match descriptor.kind {
            MessageKind::Image | MessageKind::Video => descriptor.url.clone(),
            _ => None,
        };
        let mut message = self.outgoing(descriptor.kind);
        message.file_data = Some(FileData {
            name: descriptor.name.clone(),
            size: descriptor.size.clone(),
            url: descriptor.url.clone(),
            preview,
        });
        self.push(message)
    }

    pub fn forward(&mut self, source: &Message, forwarded_from: Option<&str>) -> &Message {
        let mut message = self.outgoing(source.kind);
        message.text = source.text.clone();
        message.file_data = source.file_data.clone();
        message.forwarded = true;
        message.forwarded_from = forwarded_from.map(str::to_string);
        self.push(message)
    }

    /// Sender is not checked here; only the UI restricts delete to own messages.
    pub fn delete(&mut self, id: MessageId) -> Option<Message> {
        let idx = self.messages.iter().position(|m| m.id == id)?;
        Some(self.messages.remove(idx))
    }

    fn references(&self, url: &str) -> bool {
        self.messages.iter().any(|m| m.reference_url() == Some(url))
    }
}

pub struct Session {
    contacts: Vec<Contact>,
    store: MessageStore,
    view: View,
    selected_chat: ContactId,
    input: String,
    forward_target: Option<MessageId>,
    notifications: Notifications,
    refs: ReferenceRegistry,
    profile: Profile,
    download_dir: PathBuf,
}

impl Session {
    /// Session seeded with the demo contacts and thread.
    pub fn new(settings: &Settings) -> Self {
        Self::with_data(seed::contacts(), seed::messages(), settings)
    }

    pub fn with_data(contacts: Vec<Contact>, messages: Vec<Message>, settings: &Settings) -> Self {
        let selected_chat = contacts.first().map(|c| c.id).unwrap_or_default();
        info!(
            "Session started with {} contacts and {} messages",
            contacts.len(),
            messages.len()
        );
        Session {
            contacts,
            store: MessageStore::new(messages),
            view: View::default(),
            selected_chat,
            input: String::new(),
            forward_target: None,
            notifications: Notifications::new(settings.notification_timeout_secs),
            refs: ReferenceRegistry::new(),
            profile: settings.profile.clone(),
            download_dir: settings.resolved_download_dir(),
        }
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.store.get(id)
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn references(&self) -> &ReferenceRegistry {
        &self.refs
    }

    // --- view controller ---

    pub fn view(&self) -> View {
        self.view
    }

    pub fn select_view(&mut self, view: View) {
        debug!("View -> {}", view.tag());
        self.view = view;
    }

    /// Tags outside the closed set are rejected and leave the view unchanged.
    pub fn select_view_tag(&mut self, tag: &str) -> Result<()> {
        let view = tag.parse::<View>()?;
        self.select_view(view);
        Ok(())
    }

    pub fn next_view(&mut self) {
        self.select_view(self.view.next());
    }

    pub fn previous_view(&mut self) {
        self.select_view(self.view.previous());
    }

    pub fn selected_chat(&self) -> ContactId {
        self.selected_chat
    }

    /// No existence check: an unknown id just resolves to no contact.
    pub fn select_chat(&mut self, contact_id: ContactId) {
        debug!("Selected chat {}", contact_id);
        self.selected_chat = contact_id;
    }

    pub fn current_contact(&self) -> Option<&Contact> {
        self.contact(self.selected_chat)
    }

    pub fn contact(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    fn selected_index(&self) -> Option<usize> {
        self.contacts.iter().position(|c| c.id == self.selected_chat)
    }

    pub fn select_next_chat(&mut self) {
        if self.contacts.is_empty() {
            return;
        }
        let idx = self.selected_index().map(|i| (i + 1) % self.contacts.len()).unwrap_or(0);
        self.select_chat(self.contacts[idx].id);
    }

    pub fn select_previous_chat(&mut self) {
        if self.contacts.is_empty() {
            return;
        }
        let len = self.contacts.len();
        let idx = self.selected_index().map(|i| (i + len - 1) % len).unwrap_or(len - 1);
        self.select_chat(self.contacts[idx].id);
    }

    // --- input staging ---

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Sends the staged input. The buffer is cleared only when a message was
    /// actually created.
    pub fn send_input(&mut self) -> Option<MessageId> {
        let text = std::mem::take(&mut self.input);
        match self.append_text(&text) {
            Some(id) => Some(id),
            None => {
                self.input = text;
                None
            }
        }
    }

    pub fn append_text(&mut self, text: &str) -> Option<MessageId> {
        let id = self.store.append_text(text)?.id;
        info!("Sent text message {}", id);
        Some(id)
    }

    // --- attachments ---

    /// `None` means the picker was dismissed without a file.
    pub fn attach(&mut self, picked: Option<&PickedFile>) -> Result<Option<MessageId>> {
        let Some(picked) = picked else {
            return Ok(None);
        };
        let descriptor = attachment::intake(picked, &mut self.refs)?;
        Ok(Some(self.append_attachment(&descriptor)))
    }

    pub fn append_attachment(&mut self, descriptor: &AttachmentDescriptor) -> MessageId {
        let id = self.store.append_attachment(descriptor).id;
        info!("Sent {} attachment {} as message {}", descriptor.kind, descriptor.name, id);
        self.notifications
            .info("File sent", format!("{} sent securely", descriptor.name));
        id
    }

    // --- forwarding ---

    pub fn forward_target(&self) -> Option<MessageId> {
        self.forward_target
    }

    pub fn begin_forward(&mut self, id: MessageId) -> Result<()> {
        if self.store.get(id).is_none() {
            return Err(ChatError::UnknownMessage(id));
        }
        self.forward_target = Some(id);
        Ok(())
    }

    pub fn cancel_forward(&mut self) {
        self.forward_target = None;
    }

    /// Forwards the staged message to `target`. Provenance records the chat
    /// the message was forwarded from, i.e. the currently selected contact.
    pub fn complete_forward(&mut self, target: ContactId) -> Result<MessageId> {
        let id = self
            .forward_target
            .take()
            .ok_or(ChatError::NothingToForward)?;
        self.forward(id, target)
    }

    pub fn forward(&mut self, id: MessageId, target: ContactId) -> Result<MessageId> {
        let source = self
            .store
            .get(id)
            .cloned()
            .ok_or(ChatError::UnknownMessage(id))?;
        let from = self.current_contact().map(|c| c.name.clone());
        let new_id = self.store.forward(&source, from.as_deref()).id;

        let target_name = self
            .contact(target)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("contact #{}", target));
        info!("Forwarded message {} to {} as {}", id, target_name, new_id);
        self.notifications
            .info("Message forwarded", format!("Forwarded to {}", target_name));
        Ok(new_id)
    }

    // --- delete / copy / download ---

    pub fn delete_message(&mut self, id: MessageId) -> Result<Message> {
        let removed = self.store.delete(id).ok_or(ChatError::UnknownMessage(id))?;

        if let Some(url) = removed.reference_url() {
            if !self.store.references(url) {
                self.refs.release(url);
            }
        }
        if self.forward_target == Some(id) {
            self.forward_target = None;
        }

        info!("Deleted message {}", id);
        self.notifications.destructive("Message deleted", "The message was removed");
        Ok(removed)
    }

    /// Returns whether anything was copied.
    pub fn copy_text(&mut self, text: Option<&str>, clipboard: &mut dyn Clipboard) -> bool {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return false;
        };
        clipboard.set_text(text);
        self.notifications.info("Copied", "Text copied to clipboard");
        true
    }

    pub fn copy_message(&mut self, id: MessageId, clipboard: &mut dyn Clipboard) -> Result<bool> {
        let text = self
            .store
            .get(id)
            .ok_or(ChatError::UnknownMessage(id))?
            .copyable_text()
            .map(str::to_string);
        Ok(self.copy_text(text.as_deref(), clipboard))
    }

    pub fn can_download(&self, id: MessageId) -> bool {
        self.store
            .get(id)
            .and_then(Message::reference_url)
            .map_or(false, |url| self.refs.resolve(url).is_some())
    }

    /// Copies the referenced local file into the download directory.
    pub fn download(&mut self, id: MessageId) -> Result<PathBuf> {
        let message = self.store.get(id).ok_or(ChatError::UnknownMessage(id))?;
        let file_data = message.file_data.as_ref().ok_or(ChatError::NoReference(id))?;
        let source = file_data
            .url
            .as_deref()
            .and_then(|url| self.refs.resolve(url))
            .ok_or(ChatError::NoReference(id))?
            .to_path_buf();

        let name = file_data.name.clone();
        let copy = fs::create_dir_all(&self.download_dir)
            .map(|_| free_destination(&self.download_dir, &name))
            .and_then(|dest| fs::copy(&source, &dest).map(|_| dest));
        let dest = match copy {
            Ok(dest) => dest,
            Err(source) => {
                let dest = self.download_dir.join(&name);
                warn!("Download of {} failed: {}", name, source);
                return Err(ChatError::Download { name, dest, source });
            }
        };

        info!("Saved {} to {}", name, dest.display());
        self.notifications
            .info("Downloaded", format!("{} saved to {}", name, dest.display()));
        Ok(dest)
    }

    pub fn tick(&mut self) {
        self.notifications.expire();
    }

    /// Ends the session, returning how many transient references it released.
    pub fn close(mut self) -> usize {
        info!("Closing session with {} message(s)", self.store.len());
        self.refs.release_all()
    }
}

/// First path in `dir` for `name` that does not exist yet: `name`, then
/// `stem (1).ext`, `stem (2).ext` and so on. Never an existing path.
fn free_destination(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let name_path = Path::new(name);
    let stem = name_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let ext = name_path.extension().map(|e| e.to_string_lossy().into_owned());

    (1u32..)
        .map(|n| match &ext {
            Some(ext) => dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dir.join(format!("{} ({})", stem, n)),
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::notifications::NoticeKind;

    fn session() -> Session {
        Session::new(&Settings::default())
    }

    fn ids(s: &Session) -> Vec<MessageId> {
        s.messages().iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_send_appends_and_clears_input() {
        let mut s = session();
        s.set_input("hello there");
        let id = s.send_input().unwrap();

        let last = s.messages().last().unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.text.as_deref(), Some("hello there"));
        assert_eq!(last.sender, Sender::Me);
        assert_eq!(last.kind, MessageKind::Text);
        assert!(last.encrypted);
        assert!(!last.forwarded);
        assert_eq!(s.input(), "");
    }

    #[test]
    fn test_blank_send_is_ignored() {
        let mut s = session();
        let before = s.messages().len();
        for blank in ["", "   ", "\t\n"] {
            s.set_input(blank);
            assert!(s.send_input().is_none());
        }
        assert_eq!(s.messages().len(), before);
        assert!(s.notifications().is_empty());
    }

    #[test]
    fn test_time_is_hour_minute() {
        let t = current_time();
        assert_eq!(t.len(), 5);
        assert_eq!(&t[2..3], ":");
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = MessageStore::new(seed::messages());
        let a = store.append_text("a").unwrap().id;
        store.delete(a);
        let b = store.append_text("b").unwrap().id;
        assert!(b > a);
        assert_eq!(store.len(), 7);
    }

    #[test]
    fn test_empty_store_starts_at_one() {
        let mut store = MessageStore::new(Vec::new());
        assert!(store.is_empty());
        assert_eq!(store.append_text("first").unwrap().id, 1);
    }

    #[test]
    fn test_forward_copies_content_and_records_source_chat() {
        let mut s = session();
        s.select_chat(2);
        let id = s.forward(3, 4).unwrap();

        let fwd = s.message(id).unwrap();
        let original = s.message(3).unwrap();
        assert_eq!(fwd.text, original.text);
        assert_eq!(fwd.kind, original.kind);
        assert_eq!(fwd.sender, Sender::Me);
        assert!(fwd.forwarded);
        assert_eq!(fwd.forwarded_from.as_deref(), Some("Neon Ghost"));
        assert_eq!(s.messages().last().unwrap().id, id);

        let notice = s.notifications().current().unwrap();
        assert_eq!(notice.text, "Forwarded to Data Ninja");
    }

    #[test]
    fn test_forward_file_keeps_file_data() {
        let mut s = session();
        let id = s.forward(4, 1).unwrap();
        let fwd = s.message(id).unwrap();
        assert_eq!(fwd.kind, MessageKind::File);
        assert_eq!(fwd.file_data.as_ref().unwrap().name, "secret_data.enc");
        assert!(fwd.text.is_none());
    }

    #[test]
    fn test_staged_forward() {
        let mut s = session();
        assert!(matches!(s.begin_forward(99), Err(ChatError::UnknownMessage(99))));
        s.begin_forward(1).unwrap();
        assert_eq!(s.forward_target(), Some(1));
        s.complete_forward(2).unwrap();
        assert_eq!(s.forward_target(), None);
        assert_eq!(s.messages().len(), 7);

        s.begin_forward(1).unwrap();
        s.cancel_forward();
        assert!(matches!(s.complete_forward(2), Err(ChatError::NothingToForward)));
        assert_eq!(s.messages().len(), 7);
    }

    #[test]
    fn test_delete_keeps_order_and_notifies() {
        let mut s = session();
        let removed = s.delete_message(3).unwrap();
        assert_eq!(removed.id, 3);
        assert_eq!(ids(&s), vec![1, 2, 4, 5, 6]);

        let notice = s.notifications().current().unwrap();
        assert_eq!(notice.kind, NoticeKind::Destructive);

        assert!(matches!(s.delete_message(3), Err(ChatError::UnknownMessage(3))));
    }

    #[test]
    fn test_copy_only_with_text() {
        let mut s = session();
        let mut cb = MemoryClipboard::new();

        assert!(!s.copy_message(4, &mut cb).unwrap());
        assert!(cb.contents().is_none());
        assert!(s.notifications().is_empty());

        assert!(s.copy_message(1, &mut cb).unwrap());
        assert_eq!(cb.contents(), Some("Hi! Is everything secured?"));
        assert_eq!(s.messages().len(), 6);

        assert!(!s.copy_text(None, &mut cb));
    }

    #[test]
    fn test_select_view_changes_only_view() {
        let mut s = session();
        s.set_input("draft");
        let chat = s.selected_chat();
        let count = s.messages().len();

        s.select_view_tag("security").unwrap();
        assert_eq!(s.view(), View::Security);
        assert_eq!(s.selected_chat(), chat);
        assert_eq!(s.input(), "draft");
        assert_eq!(s.messages().len(), count);

        assert!(matches!(s.select_view_tag("settings"), Err(ChatError::UnknownView(_))));
        assert_eq!(s.view(), View::Security);
    }

    #[test]
    fn test_view_cycle_wraps() {
        let mut s = session();
        s.previous_view();
        assert_eq!(s.view(), View::Security);
        s.next_view();
        assert_eq!(s.view(), View::Chats);
    }

    #[test]
    fn test_select_unknown_chat() {
        let mut s = session();
        s.select_chat(42);
        assert_eq!(s.selected_chat(), 42);
        assert!(s.current_contact().is_none());

        // Thread is shared across chats
        assert_eq!(s.messages().len(), 6);

        s.select_next_chat();
        assert_eq!(s.selected_chat(), 1);
    }

    #[test]
    fn test_chat_selection_wraps() {
        let mut s = session();
        s.select_previous_chat();
        assert_eq!(s.selected_chat(), 4);
        s.select_next_chat();
        assert_eq!(s.selected_chat(), 1);
    }

    #[test]
    fn test_free_destination_skips_existing_names() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(free_destination(dir.path(), "a.txt"), dir.path().join("a.txt"));

        fs::write(dir.path().join("a.txt"), b"1").unwrap();
        fs::write(dir.path().join("a (1).txt"), b"2").unwrap();
        assert_eq!(free_destination(dir.path(), "a.txt"), dir.path().join("a (2).txt"));

        fs::write(dir.path().join("README"), b"3").unwrap();
        assert_eq!(free_destination(dir.path(), "README"), dir.path().join("README (1)"));
    }

    #[test]
    fn test_attach_nothing_picked() {
        let mut s = session();
        assert_eq!(s.attach(None).unwrap(), None);
        assert_eq!(s.messages().len(), 6);
    }
}
