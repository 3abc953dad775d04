// Attachment intake, download and transient reference lifetime

mod common;
use common::{session_with_downloads, setup_logging, write_file};

use std::fs;
use tempfile::TempDir;

use cyberchat::attachment::PickedFile;
use cyberchat::models::{MessageKind, Sender};
use cyberchat::settings::Settings;
use cyberchat::{ChatError, Session};

#[test]
fn test_attach_image() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with_downloads(&dir);
    let path = write_file(&dir, "photo.jpg", 2_621_440);

    let id = session
        .attach(Some(&PickedFile::from_path(&path)))
        .unwrap()
        .expect("message created");

    let m = session.message(id).unwrap();
    assert_eq!(m.kind, MessageKind::Image);
    assert_eq!(m.sender, Sender::Me);
    assert!(m.encrypted);
    assert!(m.text.is_none());

    let fd = m.file_data.as_ref().unwrap();
    assert_eq!(fd.name, "photo.jpg");
    assert_eq!(fd.size, "2.50 MB");
    assert!(fd.url.is_some());
    assert_eq!(fd.preview, fd.url);

    let notice = session.notifications().current().unwrap();
    assert!(notice.text.contains("photo.jpg"));
    assert_eq!(session.references().len(), 1);
}

#[test]
fn test_plain_file_has_no_preview() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with_downloads(&dir);
    let path = write_file(&dir, "report.pdf", 10);

    let id = session.attach(Some(&PickedFile::from_path(&path))).unwrap().unwrap();
    let fd = session.message(id).unwrap().file_data.clone().unwrap();
    assert_eq!(session.message(id).unwrap().kind, MessageKind::File);
    assert!(fd.url.is_some());
    assert!(fd.preview.is_none());
}

#[test]
fn test_download_copies_file() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with_downloads(&dir);
    let path = write_file(&dir, "clip.mp4", 1024);

    let id = session.attach(Some(&PickedFile::from_path(&path))).unwrap().unwrap();
    assert!(session.can_download(id));

    let dest = session.download(id).unwrap();
    assert_eq!(dest, dir.path().join("downloads").join("clip.mp4"));
    assert_eq!(fs::read(&dest).unwrap().len(), 1024);
}

#[test]
fn test_download_without_reference() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with_downloads(&dir);

    // Seeded file message has no reference
    assert!(!session.can_download(4));
    assert!(matches!(session.download(4), Err(ChatError::NoReference(4))));
    // Text message
    assert!(matches!(session.download(1), Err(ChatError::NoReference(1))));
}

#[test]
fn test_download_after_source_removed() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with_downloads(&dir);
    let path = write_file(&dir, "notes.txt", 4);

    let id = session.attach(Some(&PickedFile::from_path(&path))).unwrap().unwrap();
    fs::remove_file(&path).unwrap();
    assert!(matches!(session.download(id), Err(ChatError::Download { .. })));
}

#[test]
fn test_reference_released_with_last_holder() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with_downloads(&dir);
    let path = write_file(&dir, "photo.png", 16);

    let original = session.attach(Some(&PickedFile::from_path(&path))).unwrap().unwrap();
    let copy = session.forward(original, 2).unwrap();
    assert_eq!(session.references().len(), 1);

    // Forwarded copy still holds the reference
    session.delete_message(original).unwrap();
    assert_eq!(session.references().len(), 1);
    assert!(session.can_download(copy));

    session.delete_message(copy).unwrap();
    assert!(session.references().is_empty());
}

#[test]
fn test_unreadable_file_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with_downloads(&dir);
    let missing = dir.path().join("gone.png");

    let result = session.attach(Some(&PickedFile::from_path(&missing)));
    assert!(matches!(result, Err(ChatError::Attachment { .. })));
    assert_eq!(session.messages().len(), 6);
    assert!(session.references().is_empty());
}

#[test]
fn test_download_into_source_directory_keeps_source() {
    setup_logging();
    let dir = TempDir::new().unwrap();
    let settings = Settings {
        download_dir: Some(dir.path().to_path_buf()),
        ..Settings::default()
    };
    let mut session = Session::new(&settings);
    let path = write_file(&dir, "photo.png", 4096);

    let id = session.attach(Some(&PickedFile::from_path(&path))).unwrap().unwrap();
    let dest = session.download(id).unwrap();

    assert_eq!(dest, dir.path().join("photo (1).png"));
    assert_eq!(fs::read(&path).unwrap().len(), 4096);
    assert_eq!(fs::read(&dest).unwrap().len(), 4096);
}

#[test]
fn test_download_does_not_overwrite_existing_file() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with_downloads(&dir);
    let path = write_file(&dir, "notes.txt", 32);

    let downloads = dir.path().join("downloads");
    fs::create_dir_all(&downloads).unwrap();
    fs::write(downloads.join("notes.txt"), b"keep me").unwrap();

    let id = session.attach(Some(&PickedFile::from_path(&path))).unwrap().unwrap();
    let first = session.download(id).unwrap();
    let second = session.download(id).unwrap();

    assert_eq!(first, downloads.join("notes (1).txt"));
    assert_eq!(second, downloads.join("notes (2).txt"));
    assert_eq!(fs::read(downloads.join("notes.txt")).unwrap(), b"keep me");
    assert_eq!(fs::read(&second).unwrap().len(), 32);
}

#[test]
fn test_closing_session_releases_every_reference() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with_downloads(&dir);

    for name in ["a.png", "b.mp4", "c.pdf"] {
        let path = write_file(&dir, name, 8);
        session.attach(Some(&PickedFile::from_path(&path))).unwrap();
    }
    let last = session.messages().last().unwrap().id;
    session.forward(last, 2).unwrap();
    assert_eq!(session.references().len(), 3);

    assert_eq!(session.close(), 3);
}

#[test]
fn test_closing_session_without_attachments() {
    let session = common::demo_session();
    assert_eq!(session.close(), 0);
}
