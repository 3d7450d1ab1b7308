use matching::{Config, DocumentMatch, DocumentMatcher, PlainTextExtractor, TextExtractor, VocabularyScope};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct Folders {
    _root: TempDir,
    test_dir: PathBuf,
    train_dir: PathBuf,
}

fn folders() -> Folders {
    let root = TempDir::new().unwrap();
    let test_dir = root.path().join("test");
    let train_dir = root.path().join("train");
    fs::create_dir_all(&test_dir).unwrap();
    fs::create_dir_all(&train_dir).unwrap();
    Folders {
        _root: root,
        test_dir,
        train_dir,
    }
}

fn config(folders: &Folders, output_dir: Option<PathBuf>) -> Config {
    Config {
        test_dir: folders.test_dir.clone(),
        train_dir: folders.train_dir.clone(),
        extension: "txt".to_string(),
        output_dir,
        scope: VocabularyScope::Batch,
    }
}

fn write(dir: &Path, name: &str, text: &str) {
    fs::write(dir.join(name), text).unwrap();
}

fn find<'a>(matches: &'a [DocumentMatch], name: &str) -> &'a DocumentMatch {
    matches.iter().find(|m| m.query_document == name).unwrap()
}

#[tokio::test]
async fn matches_each_query_to_its_counterpart() {
    let folders = folders();
    write(
        &folders.train_dir,
        "acme.txt",
        "ACME Industrial Supplies\nInvoice Number: 1001\nDate: 2024-01-10\nAmount: 250.00\nbolts nuts washers",
    );
    write(
        &folders.train_dir,
        "globex.txt",
        "Globex Catering Services\nInvoice Number: 2002\nDate: 2024-02-11\nAmount: 980.50\nsandwiches coffee pastries",
    );
    write(&folders.train_dir, "notes.md", "ignored because of the extension");
    write(
        &folders.test_dir,
        "new_acme.txt",
        "ACME Industrial Supplies\nInvoice Number: 1077\nDate: 2024-03-01\nAmount: 300.00\nbolts washers",
    );
    write(
        &folders.test_dir,
        "new_globex.txt",
        "Globex Catering Services\nInvoice Number: 2090\nDate: 2024-03-02\nAmount: 120.00\ncoffee pastries",
    );

    let matcher = DocumentMatcher::new(config(&folders, None), Arc::new(PlainTextExtractor)).unwrap();
    let matches = matcher.process_all().await.unwrap();
    assert_eq!(matches.len(), 2);

    let acme = find(&matches, "new_acme.txt");
    assert_eq!(acme.best_match_document.as_deref(), Some("acme.txt"));
    assert_eq!(acme.reference_index, 0);
    assert!(acme.similarity > 0.0 && acme.similarity <= 1.0);
    assert_eq!(acme.fields.invoice_number, "1077");
    assert_eq!(acme.fields.date, "2024-03-01");
    assert_eq!(acme.fields.amount, "300.00");

    let globex = find(&matches, "new_globex.txt");
    assert_eq!(globex.best_match_document.as_deref(), Some("globex.txt"));
    assert_eq!(globex.reference_index, 1);
}

#[tokio::test]
async fn empty_reference_folder_reports_no_match() {
    let folders = folders();
    write(&folders.test_dir, "query.txt", "Invoice Number: 5 widgets");

    let matcher = DocumentMatcher::new(config(&folders, None), Arc::new(PlainTextExtractor)).unwrap();
    let matches = matcher.process_all().await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].best_match_document, None);
    assert_eq!(matches[0].reference_index, -1);
    assert_eq!(matches[0].similarity, 0.0);
}

/// Serves canned text per file name; files it does not know come back empty.
struct CannedExtractor;

impl TextExtractor for CannedExtractor {
    fn extract(&self, path: &Path) -> String {
        match path.file_name().and_then(|s| s.to_str()) {
            Some("query.pdf") => "quarterly consulting retainer fee".to_string(),
            Some("b.pdf") => "quarterly consulting retainer".to_string(),
            _ => String::new(),
        }
    }
}

#[tokio::test]
async fn empty_references_keep_their_position() {
    let folders = folders();
    // a.pdf extracts to nothing but must still occupy index 0
    write(&folders.train_dir, "a.pdf", "");
    write(&folders.train_dir, "b.pdf", "");
    write(&folders.test_dir, "query.pdf", "");

    let mut config = config(&folders, None);
    config.extension = ".pdf".to_string();
    let matcher = DocumentMatcher::new(config, Arc::new(CannedExtractor)).unwrap();
    let matches = matcher.process_all().await.unwrap();

    assert_eq!(matches[0].best_match_document.as_deref(), Some("b.pdf"));
    assert_eq!(matches[0].reference_index, 1);
}

#[tokio::test]
async fn pairwise_scope_picks_the_same_counterpart() {
    let folders = folders();
    write(&folders.train_dir, "a.txt", "freight shipping container harbor");
    write(&folders.train_dir, "b.txt", "software license subscription annual");
    write(&folders.test_dir, "q.txt", "annual software subscription renewal");

    let mut config = config(&folders, None);
    config.scope = VocabularyScope::Pairwise;
    let matcher = DocumentMatcher::new(config, Arc::new(PlainTextExtractor)).unwrap();
    let matches = matcher.process_all().await.unwrap();

    assert_eq!(matches[0].best_match_document.as_deref(), Some("b.txt"));
}

#[tokio::test]
async fn writes_json_reports() {
    let folders = folders();
    let output_dir = folders.test_dir.parent().unwrap().join("out");
    write(&folders.train_dir, "ref.txt", "monthly hosting invoice");
    write(&folders.test_dir, "query.txt", "hosting invoice for march");

    let matcher = DocumentMatcher::new(
        config(&folders, Some(output_dir.clone())),
        Arc::new(PlainTextExtractor),
    )
    .unwrap();
    matcher.process_all().await.unwrap();

    let report: DocumentMatch =
        serde_json::from_str(&fs::read_to_string(output_dir.join("query_match.json")).unwrap()).unwrap();
    assert_eq!(report.best_match_document.as_deref(), Some("ref.txt"));

    let summary: Vec<DocumentMatch> =
        serde_json::from_str(&fs::read_to_string(output_dir.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary.len(), 1);
}

#[test]
fn missing_directory_is_rejected() {
    let folders = folders();
    let mut config = config(&folders, None);
    config.train_dir = folders.train_dir.join("missing");

    let err = DocumentMatcher::new(config, Arc::new(PlainTextExtractor))
        .err()
        .unwrap();
    assert!(err.to_string().contains("Invalid configuration"));
}

#[test]
fn empty_extension_is_rejected() {
    let folders = folders();
    for extension in ["", ".", "..."] {
        let mut config = config(&folders, None);
        config.extension = extension.to_string();

        assert!(config.validate().is_err(), "extension {:?}", extension);
        let err = DocumentMatcher::new(config, Arc::new(PlainTextExtractor))
            .err()
            .unwrap();
        assert!(err.to_string().contains("extension"));
    }
}

#[tokio::test]
async fn invalid_utf8_documents_are_still_matched() {
    let folders = folders();
    fs::write(folders.train_dir.join("cafe.txt"), b"caf\xe9 espresso latte order").unwrap();
    fs::write(folders.train_dir.join("tyres.txt"), b"winter tyres fitting").unwrap();
    fs::write(folders.test_dir.join("q.txt"), b"espresso latte \xff order").unwrap();

    let matcher = DocumentMatcher::new(config(&folders, None), Arc::new(PlainTextExtractor)).unwrap();
    let matches = matcher.process_all().await.unwrap();

    assert_eq!(matches[0].best_match_document.as_deref(), Some("cafe.txt"));
}
