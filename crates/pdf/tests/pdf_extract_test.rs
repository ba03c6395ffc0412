//! # PDF Extraction Integration Tests

use anyhow::Result;
use anyprompt::{
    prompts::tagging::PEOPLE_EXTRACTION_SYSTEM_PROMPT,
    rag::{DocumentLoader, RagError},
    PromptClientBuilder,
};
use anyprompt_pdf::{extract_pages, format_pages, read_pdf, PdfError, PdfLoader};
use anyprompt_test_utils::{helpers::generate_test_pdf, MockAiProvider};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_format_pages_appends_page_numbers() {
    let formatted = format_pages(&["first page", "second page"]);
    assert_eq!(
        formatted,
        "first page\nPage Number: 1second page\nPage Number: 2"
    );
    assert_eq!(format_pages::<&str>(&[]), "");
}

#[test]
fn test_extract_pages_counts_pages() -> Result<()> {
    let pdf_data = generate_test_pdf(&["Alpha", "Beta", "Gamma"])?;
    let pages = extract_pages(&pdf_data)?;
    assert_eq!(pages.len(), 3);
    Ok(())
}

#[test]
fn test_extract_pages_rejects_invalid_data() {
    let err = extract_pages(b"definitely not a pdf").unwrap_err();
    assert!(matches!(err, PdfError::Parse(_)));
}

#[tokio::test]
async fn test_read_pdf_numbers_every_page() -> Result<()> {
    // --- 1. Arrange ---
    let dir = tempdir()?;
    let path = dir.path().join("report.pdf");
    fs::write(&path, generate_test_pdf(&["Intro", "Body", "Outro"])?)?;

    // --- 2. Act ---
    let text = read_pdf(&path).await?;

    // --- 3. Assert ---
    assert_eq!(text.matches("\nPage Number: ").count(), 3);
    for n in 1..=3 {
        assert!(text.contains(&format!("\nPage Number: {n}")));
    }
    assert!(text.ends_with("\nPage Number: 3"));
    Ok(())
}

#[tokio::test]
async fn test_read_pdf_missing_file() {
    let dir = tempdir().unwrap();
    let err = read_pdf(&dir.path().join("missing.pdf")).await.unwrap_err();
    assert!(matches!(err, PdfError::Io(_)));
}

#[tokio::test]
async fn test_pdf_loader_yields_one_document_per_page() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("paper.pdf");
    fs::write(&path, generate_test_pdf(&["One", "Two"])?)?;

    let documents = PdfLoader::new(&path).load().await?;

    assert_eq!(documents.len(), 2);
    let source = path.display().to_string();
    for (i, document) in documents.iter().enumerate() {
        assert_eq!(document.metadata.get("source"), Some(&source));
        assert_eq!(document.metadata.get("page"), Some(&i.to_string()));
    }
    Ok(())
}

#[tokio::test]
async fn test_pdf_loader_missing_file() {
    let err = PdfLoader::new("does/not/exist.pdf").load().await.unwrap_err();
    assert!(matches!(err, RagError::SourceNotFound(ref s) if s == "does/not/exist.pdf"));
}

#[tokio::test]
async fn test_pdf_loader_invalid_file_is_runtime_error() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("broken.pdf");
    fs::write(&path, "not a pdf")?;

    let err = PdfLoader::new(&path).load().await.unwrap_err();
    assert!(matches!(err, RagError::Runtime { .. }));
    Ok(())
}

#[tokio::test]
async fn test_people_extraction_from_pdf() -> Result<()> {
    // --- 1. Arrange ---
    let dir = tempdir()?;
    let path = dir.path().join("staff.pdf");
    fs::write(&path, generate_test_pdf(&["Alice is a 30 year old engineer."])?)?;

    let ai_provider = MockAiProvider::new();
    ai_provider.add_response(
        "Extract information about every person",
        r#"{"people": [{"name": "Alice", "age": 30, "profession": "engineer"}]}"#,
    );
    let client = PromptClientBuilder::new()
        .ai_provider(Box::new(ai_provider.clone()))
        .build()?;

    // --- 2. Act ---
    let text = read_pdf(&path).await?;
    let information = client.extract_people(&text).await?;

    // --- 3. Assert ---
    assert_eq!(information.people.len(), 1);
    assert_eq!(information.people[0].name, "Alice");
    assert_eq!(information.people[0].profession.as_deref(), Some("engineer"));

    let calls = ai_provider.get_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].system_prompt(), Some(PEOPLE_EXTRACTION_SYSTEM_PROMPT));
    assert_eq!(calls[0].user_content(), Some(text.as_str()));
    Ok(())
}
