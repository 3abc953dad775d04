use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, error, info};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};
use std::{io, path::PathBuf, time::Duration};
use textwrap::{core::display_width, wrap};
use tui_input::{backend::crossterm::EventHandler, Input};

use cyberchat::attachment::PickedFile;
use cyberchat::clipboard::Clipboard;
use cyberchat::models::{Message, MessageKind, SecurityStatus, View};
use cyberchat::notifications::{Notice, NoticeKind};
use cyberchat::seed;
use cyberchat::Session;

pub use ratatui::backend::CrosstermBackend;
pub use ratatui::Terminal;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Sidebar,
    Thread,
    Input,
}

impl Focus {
    fn next(self) -> Focus {
        match self {
            Focus::Sidebar => Focus::Thread,
            Focus::Thread => Focus::Input,
            Focus::Input => Focus::Sidebar,
        }
    }
}

// Path prompt standing in for the platform file picker
struct FileDialog {
    trigger: MessageKind,
    input: Input,
}

struct ForwardDialog {
    contact_index: usize,
}

struct HelpDialog {}

pub struct ChatUI {
    session: Session,
    clipboard: Box<dyn Clipboard>,
    input: Input,
    focus: Focus,
    selected_message: Option<usize>,
    file_dialog: Option<FileDialog>,
    forward_dialog: Option<ForwardDialog>,
    help_dialog: Option<HelpDialog>,
    should_quit: bool,
}

impl ChatUI {
    pub fn new(session: Session, clipboard: Box<dyn Clipboard>) -> Self {
        ChatUI {
            session,
            clipboard,
            input: Input::default(),
            focus: Focus::Input,
            selected_message: None,
            file_dialog: None,
            forward_dialog: None,
            help_dialog: None,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Expires old toasts. Called once per loop iteration.
    pub fn tick(&mut self) {
        self.session.tick();
    }

    pub fn handle_input(&mut self) -> Result<()> {
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.help_dialog.is_some() {
            // Any key closes help
            self.help_dialog = None;
            return;
        }
        if self.file_dialog.is_some() {
            self.handle_file_dialog_key(key);
            return;
        }
        if self.forward_dialog.is_some() {
            self.handle_forward_dialog_key(key);
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                // Esc clears a visible toast before it quits
                if !self.session.notifications_mut().dismiss() {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Tab => self.session.next_view(),
            KeyCode::BackTab => self.session.previous_view(),
            KeyCode::F(1) => self.help_dialog = Some(HelpDialog {}),
            KeyCode::Char('t') if ctrl => self.set_focus(self.focus.next()),
            KeyCode::Char('p') if ctrl => self.open_file_dialog(MessageKind::Image),
            KeyCode::Char('o') if ctrl => self.open_file_dialog(MessageKind::Video),
            KeyCode::Char('f') if ctrl => self.open_file_dialog(MessageKind::File),
            _ => match self.focus {
                Focus::Sidebar => self.handle_sidebar_key(key),
                Focus::Thread => self.handle_thread_key(key),
                Focus::Input => self.handle_input_key(key),
            },
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        if focus == Focus::Thread {
            let len = self.session.messages().len();
            self.selected_message = len.checked_sub(1);
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) {
        if !matches!(self.session.view(), View::Chats | View::Contacts) {
            return;
        }
        match key.code {
            KeyCode::Up => self.session.select_previous_chat(),
            KeyCode::Down => self.session.select_next_chat(),
            _ => {}
        }
    }

    fn selected(&self) -> Option<&Message> {
        self.selected_message
            .and_then(|idx| self.session.messages().get(idx))
    }

    fn handle_thread_key(&mut self, key: KeyEvent) {
        let len = self.session.messages().len();
        if len == 0 {
            return;
        }
        match key.code {
            KeyCode::Up => {
                self.selected_message = Some(self.selected_message.map_or(len - 1, |i| i.saturating_sub(1)));
            }
            KeyCode::Down => {
                self.selected_message = Some(self.selected_message.map_or(len - 1, |i| (i + 1).min(len - 1)));
            }
            KeyCode::Char('f') => {
                if let Some(id) = self.selected().map(|m| m.id) {
                    if self.session.begin_forward(id).is_ok() {
                        self.forward_dialog = Some(ForwardDialog { contact_index: 0 });
                    }
                }
            }
            KeyCode::Char('c') => {
                let Some(id) = self.selected().filter(|m| m.copyable_text().is_some()).map(|m| m.id) else {
                    return;
                };
                if let Err(e) = self.session.copy_message(id, self.clipboard.as_mut()) {
                    error!("Copy failed: {}", e);
                }
            }
            KeyCode::Char('s') => {
                let Some(id) = self.selected().map(|m| m.id) else {
                    return;
                };
                if !self.session.can_download(id) {
                    return;
                }
                if let Err(e) = self.session.download(id) {
                    error!("{}", e);
                    self.session.notifications_mut().destructive("Download failed", e.to_string());
                }
            }
            KeyCode::Char('d') => {
                let Some(id) = self.selected().filter(|m| m.is_own()).map(|m| m.id) else {
                    return;
                };
                if let Err(e) = self.session.delete_message(id) {
                    error!("Delete failed: {}", e);
                }
                let len = self.session.messages().len();
                self.selected_message = self.selected_message.map(|i| i.min(len.saturating_sub(1)));
                if len == 0 {
                    self.selected_message = None;
                }
            }
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.session.set_input(self.input.value());
                if self.session.send_input().is_some() {
                    self.input.reset();
                }
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
            }
        }
    }

    fn open_file_dialog(&mut self, trigger: MessageKind) {
        debug!("Opening {} picker (accept {})", trigger, trigger.accept_filter());
        self.file_dialog = Some(FileDialog {
            trigger,
            input: Input::default(),
        });
    }

    fn handle_file_dialog_key(&mut self, key: KeyEvent) {
        let Some(dialog) = self.file_dialog.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.file_dialog = None,
            KeyCode::Enter => {
                let value = dialog.input.value().trim().to_string();
                self.file_dialog = None;

                let picked = (!value.is_empty()).then(|| PickedFile::from_path(PathBuf::from(value)));
                match self.session.attach(picked.as_ref()) {
                    Ok(Some(id)) => info!("UI: attachment sent as message {}", id),
                    Ok(None) => debug!("UI: file picker closed without a file"),
                    Err(e) => {
                        error!("{}", e);
                        self.session.notifications_mut().destructive("Attachment failed", e.to_string());
                    }
                }
            }
            _ => {
                dialog.input.handle_event(&Event::Key(key));
            }
        }
    }

    fn handle_forward_dialog_key(&mut self, key: KeyEvent) {
        let count = self.session.contacts().len();
        let Some(dialog) = self.forward_dialog.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.forward_dialog = None;
                self.session.cancel_forward();
            }
            KeyCode::Up if count > 0 => {
                dialog.contact_index = (dialog.contact_index + count - 1) % count;
            }
            KeyCode::Down if count > 0 => {
                dialog.contact_index = (dialog.contact_index + 1) % count;
            }
            KeyCode::Enter => {
                let target = self.session.contacts().get(dialog.contact_index).map(|c| c.id);
                self.forward_dialog = None;
                match target {
                    Some(target) => {
                        if let Err(e) = self.session.complete_forward(target) {
                            error!("Forward failed: {}", e);
                        }
                    }
                    None => self.session.cancel_forward(),
                }
            }
            _ => {}
        }
    }

    pub fn draw<B: Backend>(&self, frame: &mut Frame<B>) {
        let size = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(32), // Sidebar
                Constraint::Percentage(68), // Chat
            ])
            .split(size);

        let sidebar_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // App header
                Constraint::Length(3), // Tabs
                Constraint::Min(3),    // Panel
            ])
            .split(chunks[0]);

        let chat_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Contact header
                Constraint::Min(5),    // Thread
                Constraint::Length(3), // Input
                Constraint::Length(1), // Footer
            ])
            .split(chunks[1]);

        draw_app_header(frame, sidebar_chunks[0]);
        self.draw_tabs(frame, sidebar_chunks[1]);
        match self.session.view() {
            View::Chats => self.draw_chats_panel(frame, sidebar_chunks[2]),
            View::Contacts => self.draw_contacts_panel(frame, sidebar_chunks[2]),
            View::Profile => self.draw_profile_panel(frame, sidebar_chunks[2]),
            View::Security => draw_security_panel(frame, sidebar_chunks[2]),
        }

        self.draw_chat_header(frame, chat_chunks[0]);
        self.draw_messages(frame, chat_chunks[1]);

        let input_block = Block::default()
            .title("Message (Enter to send)")
            .borders(Borders::ALL)
            .border_style(self.focus_style(Focus::Input));
        let input_widget = Paragraph::new(self.input.value()).block(input_block);
        frame.render_widget(input_widget, chat_chunks[2]);

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("🛡 ", Style::default().fg(Color::Green)),
            Span::styled(
                "Your messages are protected with end-to-end encryption | F1 help",
                Style::default().fg(Color::Gray),
            ),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(footer, chat_chunks[3]);

        if self.focus == Focus::Input && self.file_dialog.is_none() {
            frame.set_cursor(
                chat_chunks[2].x + self.input.cursor() as u16 + 1,
                chat_chunks[2].y + 1,
            );
        }

        if let Some(dialog) = &self.file_dialog {
            draw_file_dialog(frame, dialog, size);
        }
        if let Some(dialog) = &self.forward_dialog {
            self.draw_forward_dialog(frame, dialog, size);
        }
        if self.help_dialog.is_some() {
            draw_help_dialog(frame, size);
        }
        if let Some(notice) = self.session.notifications().current() {
            draw_notice(frame, notice, size);
        }
    }

    fn focus_style(&self, focus: Focus) -> Style {
        if self.focus == focus {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        }
    }

    fn draw_tabs<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let titles: Vec<Line> = View::ALL.iter().map(|v| Line::from(v.label())).collect();
        let selected = View::ALL.iter().position(|v| *v == self.session.view()).unwrap_or(0);
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("Tab / Shift+Tab"))
            .select(selected)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            );
        f.render_widget(tabs, area);
    }

    fn draw_chats_panel<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = self
            .session
            .contacts()
            .iter()
            .map(|c| {
                let dot = if c.online {
                    Span::styled("● ", Style::default().fg(Color::Green))
                } else {
                    Span::raw("  ")
                };
                let mut first = vec![
                    dot,
                    Span::styled(c.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(format!("  {}", c.time), Style::default().fg(Color::Gray)),
                ];
                if c.unread > 0 {
                    first.push(Span::styled(
                        format!(" [{}]", c.unread),
                        Style::default().fg(Color::Black).bg(Color::Cyan),
                    ));
                }
                let preview = truncate(&c.last_message, width.saturating_sub(2));
                ListItem::new(vec![
                    Line::from(first),
                    Line::from(Span::styled(format!("  {}", preview), Style::default().fg(Color::Gray))),
                ])
            })
            .collect();

        let mut state = ListState::default();
        state.select(
            self.session
                .contacts()
                .iter()
                .position(|c| c.id == self.session.selected_chat()),
        );

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Chats")
                    .borders(Borders::ALL)
                    .border_style(self.focus_style(Focus::Sidebar)),
            )
            .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::Cyan));
        f.render_stateful_widget(list, area, &mut state);
    }

    fn draw_contacts_panel<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let items: Vec<ListItem> = self
            .session
            .contacts()
            .iter()
            .map(|c| {
                let status = if c.online {
                    Span::styled("🟢 online", Style::default().fg(Color::Green))
                } else {
                    Span::styled("⚫ offline", Style::default().fg(Color::Gray))
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("[{}] ", c.initial()), Style::default().fg(Color::Magenta)),
                        Span::styled(c.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    ]),
                    Line::from(vec![Span::raw("    "), status]),
                ])
            })
            .collect();

        let mut state = ListState::default();
        state.select(
            self.session
                .contacts()
                .iter()
                .position(|c| c.id == self.session.selected_chat()),
        );

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Contacts")
                    .borders(Borders::ALL)
                    .border_style(self.focus_style(Focus::Sidebar)),
            )
            .highlight_style(Style::default().fg(Color::Cyan));
        f.render_stateful_widget(list, area, &mut state);
    }

    fn draw_profile_panel<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let profile = self.session.profile();
        let label = Style::default().fg(Color::Gray);
        let value = Style::default().add_modifier(Modifier::BOLD);

        let lines = vec![
            Line::from(Span::styled("[ Me ]", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(profile.display_name.clone(), value)),
            Line::from(Span::styled(profile.handle.clone(), label)),
            Line::from(""),
            Line::from(Span::styled("Username", label)),
            Line::from(Span::styled(profile.username.clone(), value)),
            Line::from(""),
            Line::from(Span::styled("Phone", label)),
            Line::from(Span::styled(profile.phone.clone(), value)),
            Line::from(""),
            Line::from(Span::styled("Email", label)),
            Line::from(Span::styled(profile.email.clone(), value)),
        ];

        let panel = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title("Profile").borders(Borders::ALL));
        f.render_widget(panel, area);
    }

    fn draw_chat_header<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        // Unknown selection renders with empty fields
        let contact = self.session.current_contact();
        let name = contact.map(|c| c.name.clone()).unwrap_or_default();
        let status = match contact {
            Some(c) if c.online => "online",
            Some(_) => "offline",
            None => "",
        };

        let header = Paragraph::new(Line::from(vec![
            Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}  ", status), Style::default().fg(Color::Gray)),
            Span::styled("[🔒 E2E]", Style::default().fg(Color::Green)),
        ]))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(header, area);
    }

    fn draw_messages<B: Backend>(&self, f: &mut Frame<B>, area: Rect) {
        let inner_width = area.width.saturating_sub(2) as usize;
        let bubble_width = (inner_width * 3 / 4).max(10);

        let items: Vec<ListItem> = self
            .session
            .messages()
            .iter()
            .map(|m| ListItem::new(message_lines(m, bubble_width, inner_width)))
            .collect();

        let mut list_state = ListState::default();
        let highlight = if self.focus == Focus::Thread {
            list_state.select(self.selected_message);
            Style::default().bg(Color::DarkGray)
        } else {
            // Keep the newest message in view without highlighting it
            list_state.select(items.len().checked_sub(1));
            Style::default()
        };

        let title = if self.focus == Focus::Thread {
            self.thread_actions_title()
        } else {
            "Messages (Ctrl+T to focus)".to_string()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(self.focus_style(Focus::Thread)),
            )
            .highlight_style(highlight);
        f.render_stateful_widget(list, area, &mut list_state);
    }

    /// Only the actions valid for the selected message are listed.
    fn thread_actions_title(&self) -> String {
        let Some(m) = self.selected() else {
            return "Messages".to_string();
        };
        let mut actions = vec!["f forward"];
        if m.copyable_text().is_some() {
            actions.push("c copy");
        }
        if self.session.can_download(m.id) {
            actions.push("s save");
        }
        if m.is_own() {
            actions.push("d delete");
        }
        format!("Messages: {}", actions.join(" | "))
    }

    fn draw_forward_dialog<B: Backend>(&self, f: &mut Frame<B>, dialog: &ForwardDialog, area: Rect) {
        let popup_area = centered(area, 40, 4 + self.session.contacts().len() as u16);

        let items: Vec<ListItem> = self
            .session
            .contacts()
            .iter()
            .map(|c| ListItem::new(c.name.clone()))
            .collect();
        let mut state = ListState::default();
        state.select(Some(dialog.contact_index));

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Forward to (Enter / Esc)")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
            .highlight_symbol("> ");

        f.render_widget(Clear, popup_area);
        f.render_stateful_widget(list, popup_area, &mut state);
    }
}

fn message_lines(m: &Message, bubble_width: usize, inner_width: usize) -> Vec<Line<'static>> {
    let own = m.is_own();
    let body_style = if own {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let mut raw: Vec<(String, Style)> = Vec::new();
    if m.forwarded {
        let from = m.forwarded_from.as_deref().unwrap_or("unknown");
        raw.push((
            format!("↪ Forwarded from {}", from),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ));
    }

    match m.kind {
        MessageKind::Text => {
            let text = m.text.as_deref().unwrap_or_default();
            for line in wrap(text, bubble_width) {
                raw.push((line.into_owned(), body_style));
            }
        }
        kind => {
            let icon = match kind {
                MessageKind::Image => "🖼",
                MessageKind::Video => "🎬",
                _ => "📄",
            };
            if let Some(fd) = &m.file_data {
                let card = format!("{} {} ({})", icon, fd.name, fd.size);
                for line in wrap(&card, bubble_width) {
                    raw.push((line.into_owned(), body_style.add_modifier(Modifier::BOLD)));
                }
            }
            if let Some(text) = m.text.as_deref() {
                for line in wrap(text, bubble_width) {
                    raw.push((line.into_owned(), body_style));
                }
            }
        }
    }

    let mut meta = m.time.clone();
    if m.encrypted {
        meta.push_str(" 🔒");
    }
    if own {
        meta.push_str(" ✓✓");
    }
    raw.push((meta, Style::default().fg(Color::DarkGray)));

    raw.into_iter()
        .map(|(text, style)| {
            let text = if own {
                let pad = inner_width.saturating_sub(display_width(&text));
                format!("{}{}", " ".repeat(pad), text)
            } else {
                text
            };
            Line::from(Span::styled(text, style))
        })
        .collect()
}

fn truncate(text: &str, max: usize) -> String {
    if display_width(text) <= max {
        return text.to_string();
    }
    let mut out = String::new();
    for c in text.chars() {
        if display_width(&out) + 2 > max {
            break;
        }
        out.push(c);
    }
    out.push('…');
    out
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_app_header<B: Backend>(f: &mut Frame<B>, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled("[Me] ", Style::default().fg(Color::Cyan)),
        Span::styled("CyberChat", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("  ● Online", Style::default().fg(Color::Green)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_security_panel<B: Backend>(f: &mut Frame<B>, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Security",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "All messages are protected with E2E encryption",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    for item in seed::security_items() {
        let badge = match item.status {
            SecurityStatus::Active => Span::styled("[Active]", Style::default().fg(Color::Green)),
            SecurityStatus::Action(label) => Span::styled(format!("[{}]", label), Style::default().fg(Color::Cyan)),
            SecurityStatus::NotConfigured => Span::styled("[Not configured]", Style::default().fg(Color::Gray)),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", item.title), Style::default().add_modifier(Modifier::BOLD)),
            badge,
        ]));
        lines.push(Line::from(Span::styled(item.detail, Style::default().fg(Color::Gray))));
        lines.push(Line::from(""));
    }

    let panel = Paragraph::new(lines).block(Block::default().title("Security").borders(Borders::ALL));
    f.render_widget(panel, area);
}

fn draw_file_dialog<B: Backend>(f: &mut Frame<B>, dialog: &FileDialog, area: Rect) {
    let popup_area = centered(area, 60, 7);

    let popup_block = Block::default()
        .title(format!("Attach {} (accepts {})", dialog.trigger, dialog.trigger.accept_filter()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    f.render_widget(Clear, popup_area);
    f.render_widget(popup_block, popup_area);

    let inner_area = popup_area.inner(&Margin {
        vertical: 1,
        horizontal: 2,
    });

    let content_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Prompt
            Constraint::Length(1), // Path
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Hint
        ])
        .split(inner_area);

    f.render_widget(Paragraph::new("Path to file:"), content_chunks[0]);
    f.render_widget(
        Paragraph::new(dialog.input.value()).style(Style::default().fg(Color::Yellow)),
        content_chunks[1],
    );
    f.render_widget(
        Paragraph::new("Enter to send, Esc to cancel").style(Style::default().fg(Color::Gray)),
        content_chunks[3],
    );

    f.set_cursor(
        content_chunks[1].x + dialog.input.cursor() as u16,
        content_chunks[1].y,
    );
}

fn draw_help_dialog<B: Backend>(f: &mut Frame<B>, area: Rect) {
    let popup_area = centered(area, 60, 20);

    let entries = [
        ("Tab / Shift+Tab", "Switch sidebar panel"),
        ("Ctrl+T", "Cycle focus: sidebar, thread, input"),
        ("Up / Down", "Select chat or message"),
        ("Enter", "Send message"),
        ("Ctrl+P", "Attach image"),
        ("Ctrl+O", "Attach video"),
        ("Ctrl+F", "Attach file"),
        ("f", "Forward selected message"),
        ("c", "Copy text of selected message"),
        ("s", "Save selected attachment"),
        ("d", "Delete own message"),
        ("F1", "This help"),
        ("Esc", "Dismiss notification, or quit"),
        ("Ctrl+C", "Quit"),
    ];

    let mut items: Vec<ListItem> = entries
        .iter()
        .map(|(key, what)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<16}", key), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ]))
        })
        .collect();
    items.push(ListItem::new(""));
    items.push(ListItem::new(Span::styled(
        "Press any key to close",
        Style::default().fg(Color::Gray),
    )));

    let list = List::new(items).block(
        Block::default()
            .title("Keyboard shortcuts")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );

    f.render_widget(Clear, popup_area);
    f.render_widget(list, popup_area);
}

fn draw_notice<B: Backend>(f: &mut Frame<B>, notice: &Notice, area: Rect) {
    let popup_width = 44.min(area.width.saturating_sub(4));
    let popup_height = 4.min(area.height.saturating_sub(2));
    let popup_x = area.width.saturating_sub(popup_width + 2);
    let popup_area = Rect::new(popup_x, 1, popup_width, popup_height);

    let color = match notice.kind {
        NoticeKind::Info => Color::Green,
        NoticeKind::Destructive => Color::Red,
    };

    let body = Paragraph::new(notice.text.clone())
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .title(notice.title.clone())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );

    f.render_widget(Clear, popup_area);
    f.render_widget(body, popup_area);
}

pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
