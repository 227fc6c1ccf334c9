//! PPTX (Office Open XML) backend for the CoupleSnap deck.
//!
//! Writes presentations as ZIP archives of XML parts and reads them back.

pub mod reader;
pub mod template;
pub mod writer;

pub use reader::PptxReader;
pub use writer::PptxWriter;

#[cfg(test)]
mod tests {
    use super::*;
    use couplesnap_core::{
        DeckBuilder, Error, LayoutKind, Points, Presentation, Rgb, OUTLINE, OUTPUT_FILE,
    };
    use std::fs;
    use std::io::Cursor;

    #[test]
    fn test_write_then_read_in_memory() {
        let prs = DeckBuilder::new().build().unwrap();
        let mut buf = Cursor::new(Vec::new());
        PptxWriter::new().write(&prs, &mut buf).unwrap();

        buf.set_position(0);
        let reopened = PptxReader::new().read(buf).unwrap();
        assert_eq!(reopened, prs);
    }

    #[test]
    fn test_saved_deck_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OUTPUT_FILE);

        let prs = DeckBuilder::new().build().unwrap();
        PptxWriter::new().save(&prs, &path).unwrap();
        assert!(path.exists());

        let reopened = PptxReader::new().open(&path).unwrap();
        assert_eq!(reopened.slide_count(), 10);
        assert_eq!(reopened.slide_width.0, 9_144_000);
        assert_eq!(reopened.slide_height.0, 6_858_000);

        let architecture = &reopened.slides()[6];
        assert_eq!(architecture.title_text(), "System Architecture");
        let body = architecture.body_text().unwrap();
        assert_eq!(body.lines().next(), Some("Client Layer:"));

        // Only the package itself is left behind.
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_saved_deck_matches_outline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OUTPUT_FILE);
        PptxWriter::new()
            .save(&DeckBuilder::new().build().unwrap(), &path)
            .unwrap();

        let reopened = PptxReader::new().open(&path).unwrap();
        for (slide, entry) in reopened.slides().iter().zip(OUTLINE.iter()) {
            assert_eq!(slide.layout(), entry.layout);
            assert_eq!(slide.title_text(), entry.title);
            assert_eq!(slide.body_text().as_deref(), Some(entry.body));
        }

        let title_slide = &reopened.slides()[0];
        assert_eq!(title_slide.layout(), LayoutKind::Title);
        let font = title_slide.title().unwrap().paragraphs()[0].font;
        assert_eq!(font.size, Some(Points(60)));
        assert_eq!(font.bold, Some(true));
        assert_eq!(font.color, Some(Rgb(0, 122, 255)));
    }

    #[test]
    fn test_save_twice_overwrites_with_same_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OUTPUT_FILE);
        fs::write(&path, b"stale contents").unwrap();

        let writer = PptxWriter::new();
        writer
            .save(&DeckBuilder::new().build().unwrap(), &path)
            .unwrap();
        let first = PptxReader::new().open(&path).unwrap();

        writer
            .save(&DeckBuilder::new().build().unwrap(), &path)
            .unwrap();
        let second = PptxReader::new().open(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.slide_count(), 10);
    }

    #[test]
    fn test_save_into_missing_directory_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(OUTPUT_FILE);

        let prs = DeckBuilder::new().build().unwrap();
        let err = PptxWriter::new().save(&prs, &path).unwrap_err();

        assert!(matches!(err, Error::IoError(_)));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_into_read_only_directory_leaves_existing_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OUTPUT_FILE);
        fs::write(&path, b"previous deck").unwrap();
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o555)).unwrap();

        // Root ignores directory permissions; nothing to check then.
        if fs::File::create(dir.path().join("writable")).is_ok() {
            fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let prs = DeckBuilder::new().build().unwrap();
        let result = PptxWriter::new().save(&prs, &path);
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(Error::IoError(_))));
        assert_eq!(fs::read(&path).unwrap(), b"previous deck");
    }

    #[test]
    fn test_save_over_directory_fails_and_leaves_it_intact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OUTPUT_FILE);
        fs::create_dir(&path).unwrap();
        fs::write(path.join("notes.txt"), b"keep me").unwrap();

        let prs = DeckBuilder::new().build().unwrap();
        let err = PptxWriter::new().save(&prs, &path).unwrap_err();

        assert!(matches!(err, Error::IoError(_)));
        assert!(path.is_dir());
        assert_eq!(fs::read(path.join("notes.txt")).unwrap(), b"keep me");
        // The staged package is cleaned up.
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OUTPUT_FILE);
        fs::write(&path, b"previous deck").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let prs = DeckBuilder::new().build().unwrap();
        PptxWriter::new().save(&prs, &path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(PptxReader::new().open(&path).unwrap().slide_count(), 10);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_new_file_follows_umask() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OUTPUT_FILE);

        let prs = DeckBuilder::new().build().unwrap();
        PptxWriter::new().save(&prs, &path).unwrap();

        // Same mode as any freshly created file in this process.
        let reference = dir.path().join("reference");
        fs::File::create(&reference).unwrap();
        let expected = fs::metadata(&reference).unwrap().permissions().mode() & 0o777;
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, expected);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_through_symlink_replaces_target() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("real.pptx");
        let link = dir.path().join(OUTPUT_FILE);
        fs::write(&target, b"previous deck").unwrap();
        symlink(&target, &link).unwrap();

        let prs = DeckBuilder::new().build().unwrap();
        PptxWriter::new().save(&prs, &link).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(PptxReader::new().open(&target).unwrap().slide_count(), 10);
        assert_eq!(PptxReader::new().open(&link).unwrap().slide_count(), 10);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_through_dangling_symlink_creates_target() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join(OUTPUT_FILE);
        symlink("real.pptx", &link).unwrap();

        let prs = DeckBuilder::new().build().unwrap();
        PptxWriter::new().save(&prs, &link).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        let target = dir.path().join("real.pptx");
        assert_eq!(PptxReader::new().open(&target).unwrap().slide_count(), 10);
    }

    #[test]
    fn test_line_breaks_and_control_chars_survive_round_trip() {
        let mut prs = Presentation::new();
        let slide = prs.add_slide(1).unwrap();
        slide.title_mut().unwrap().set_text("Line one\u{000B}Line two");
        slide
            .placeholder_mut(1)
            .unwrap()
            .set_text("\u{000B}leading\nbell\u{0007}\ntrailing\u{000B}");

        let mut buf = Cursor::new(Vec::new());
        PptxWriter::new().write(&prs, &mut buf).unwrap();
        buf.set_position(0);
        let reopened = PptxReader::new().read(buf).unwrap();

        assert_eq!(reopened, prs);
        assert_eq!(reopened.slides()[0].title_text(), "Line one\u{000B}Line two");
    }

    #[test]
    fn test_read_rejects_non_zip() {
        let err = PptxReader::new()
            .read(Cursor::new(b"not a presentation".to_vec()))
            .unwrap_err();
        assert!(matches!(err, Error::ZipError(_)));
    }
}
