use super::*;

#[traced_test]
#[tokio::test]
async fn test_notes_for_each_document() -> TestResult<()> {
  let (input, notes) =
    create_test_dirs(&[("paper1.pdf", "one"), ("nested/paper2.pdf", "two"), ("bad.pdf", "?")]);
  let notebook = Notebook::new(&Config::default(), StubSummarizer::failing_on("bad.pdf"));

  let written = notebook.process(input.path(), notes.path()).await?;

  assert_eq!(written.len(), 2);
  assert_eq!(list_files(notes.path()), vec![
    PathBuf::from("paper1.md"),
    PathBuf::from("paper2.md")
  ]);

  let note = fs::read_to_string(notes.path().join("paper2.md"))?;
  assert!(note.starts_with("---\ntitle: \"paper2\"\nsource: \"paper2.pdf\"\ncreated: \""));
  assert!(note.contains("---\n## paper2\n"));
  assert!(note.contains("- **Core conclusions**: Conclusions of paper2.pdf.\n"));
  assert!(note.contains("- **Methods**: Randomized trial\n"));
  assert!(note.contains("- **Key contributions**: A new estimator\n"));
  assert!(note.contains("- **Related literature**: Smith 2020; Lee 2021\n"));
  assert!(logs_contain("No note for"));
  Ok(())
}

#[tokio::test]
async fn test_existing_notes_are_kept() -> TestResult<()> {
  let (input, notes) = create_test_dirs(&[("paper1.pdf", "one")]);
  fs::write(notes.path().join("paper1.md"), "hand-written")?;
  let notebook = Notebook::new(&Config::default(), StubSummarizer::default());

  let written = notebook.process(input.path(), notes.path()).await?;

  assert_eq!(written, vec![notes.path().join("paper1_v1.md")]);
  assert_eq!(fs::read_to_string(notes.path().join("paper1.md"))?, "hand-written");
  Ok(())
}

#[tokio::test]
async fn test_missing_input_dir() {
  let root = tempdir().unwrap();
  let notebook = Notebook::new(&Config::default(), StubSummarizer::default());
  let result = notebook.process(&root.path().join("missing"), &root.path().join("notes")).await;
  assert!(matches!(result, Err(PapersortError::InvalidInput(_))));
}
