use log::warn;

/// Destination for the copy action.
pub trait Clipboard {
    fn set_text(&mut self, text: &str);
}

/// In-process clipboard. Used by tests and whenever no system clipboard
/// can be opened (headless terminals, SSH sessions).
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) {
        self.contents = Some(text.to_string());
    }
}

/// Platform clipboard backed by `arboard`.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, arboard::Error> {
        Ok(SystemClipboard {
            inner: arboard::Clipboard::new()?,
        })
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) {
        // Write failures are not surfaced to the user
        if let Err(e) = self.inner.set_text(text.to_string()) {
            warn!("Clipboard write failed: {}", e);
        }
    }
}

/// System clipboard when available, memory otherwise.
pub fn open_clipboard() -> Box<dyn Clipboard> {
    match SystemClipboard::new() {
        Ok(cb) => Box::new(cb),
        Err(e) => {
            warn!("System clipboard unavailable ({}), using in-memory clipboard", e);
            Box::new(MemoryClipboard::new())
        }
    }
}
