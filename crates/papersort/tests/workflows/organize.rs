use super::*;

#[traced_test]
#[tokio::test]
async fn test_single_paper_scenario() -> TestResult<()> {
  let (input, output) = create_test_dirs(&[("paper1.pdf", "%PDF-1.5 noise")]);
  let organizer = Organizer::new(
    &Config::default(),
    StubExtractor::default().with("paper1.pdf", noise_metadata()),
    StubClassifier::always(ClassificationRecord::new(["Medical_AI"], 0.91)),
  );

  let organized = organizer.organize(input.path(), output.path()).await?;

  assert_eq!(organized.rows.len(), 1);
  let row = &organized.rows[0];
  assert_eq!(row.original_name, "paper1.pdf");
  assert_eq!(row.new_name, "Smith_etal_2022_Effects-Noise.pdf");
  assert_eq!(row.classification_path, "Medical_AI");
  assert_eq!(row.confidence_display, "91%");
  assert_eq!(row.warnings, "none");
  assert_eq!(list_files(output.path()), vec![PathBuf::from(
    "Medical_AI/Smith_etal_2022_Effects-Noise.pdf"
  )]);
  assert!(logs_contain("Smith_etal_2022_Effects-Noise.pdf"));
  Ok(())
}

#[tokio::test]
async fn test_duplicate_candidates_get_versioned() -> TestResult<()> {
  let (input, output) =
    create_test_dirs(&[("first/climate.pdf", "first"), ("second/climate-copy.pdf", "second")]);
  let organizer = Organizer::new(
    &Config::default(),
    StubExtractor::default()
      .with("climate.pdf", climate_metadata())
      .with("climate-copy.pdf", climate_metadata()),
    StubClassifier::always(ClassificationRecord::new(["Climate_Model"], 0.8)),
  );

  let organized = organizer.organize(input.path(), output.path()).await?;

  let mut names: Vec<&str> = organized.rows.iter().map(|row| row.new_name.as_str()).collect();
  names.sort();
  assert_eq!(names, vec!["Doe_2020_climate-risk.pdf", "Doe_2020_climate-risk_v1.pdf"]);

  let renamed = organized.rows.iter().find(|row| row.new_name.ends_with("_v1.pdf")).unwrap();
  assert!(renamed.warnings.contains("renamed to Doe_2020_climate-risk_v1.pdf"));
  let untouched = organized.rows.iter().find(|row| !row.new_name.ends_with("_v1.pdf")).unwrap();
  assert_eq!(untouched.warnings, "none");

  // Each copy holds the bytes of the document its row names.
  for row in &organized.rows {
    let source = match row.original_name.as_str() {
      "climate.pdf" => "first/climate.pdf",
      _ => "second/climate-copy.pdf",
    };
    assert_eq!(
      fs::read(output.path().join("Climate_Model").join(&row.new_name))?,
      fs::read(input.path().join(source))?
    );
  }
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_failed_extraction_has_no_side_effects() -> TestResult<()> {
  let (input, output) = create_test_dirs(&[("scanned.pdf", "%PDF image only")]);
  let organizer = Organizer::new(
    &Config::default(),
    StubExtractor::default(),
    StubClassifier::always(ClassificationRecord::new(["Review"], 0.5)),
  );

  let organized = organizer.organize(input.path(), output.path()).await?;

  assert!(organized.rows.is_empty());
  assert_eq!(organized.skipped, vec![input.path().canonicalize()?.join("scanned.pdf")]);
  assert!(list_files(output.path()).is_empty());
  assert!(logs_contain("Skipping scanned.pdf"));
  Ok(())
}

#[tokio::test]
async fn test_row_count_matches_metadata_successes() -> TestResult<()> {
  let (input, output) = create_test_dirs(&[
    ("a.pdf", "a"),
    ("b.pdf", ""),
    ("c.pdf", "c"),
    ("nested/d.pdf", "d"),
    ("notes.txt", "not a paper"),
  ]);
  let extractor = StubExtractor::default()
    .with("a.pdf", noise_metadata())
    .with("c.pdf", MetadataRecord::new("", Vec::<String>::new(), "2001"))
    .with("d.pdf", climate_metadata());
  let classifier = StubClassifier::default()
    .with("a.pdf", ClassificationRecord::new(["Medical_AI", "Experimental"], 0.876))
    .with("d.pdf", ClassificationRecord::new(["Climate_Model"], 0.4));
  let organizer = Organizer::new(&Config::default(), extractor, classifier);

  let organized = organizer.organize(input.path(), output.path()).await?;

  assert_eq!(organized.rows.len(), 3);
  assert_eq!(organized.skipped.len(), 1);
  assert_eq!(list_files(output.path()), vec![
    PathBuf::from("Climate_Model/Doe_2020_climate-risk.pdf"),
    PathBuf::from("Medical_AI_Experimental/Smith_etal_2022_Effects-Noise.pdf"),
    PathBuf::from("Unclassified/Unknown_2001_untitled.pdf"),
  ]);

  let experimental = organized.rows.iter().find(|row| row.original_name == "a.pdf").unwrap();
  assert_eq!(experimental.classification_path, "Medical_AI/Experimental");
  assert_eq!(experimental.confidence_display, "88%");

  let unclassified = organized.rows.iter().find(|row| row.original_name == "c.pdf").unwrap();
  assert_eq!(unclassified.classification_path, "Unclassified");
  assert_eq!(unclassified.confidence_display, "0%");
  assert!(unclassified.warnings.contains("classification failed"));
  Ok(())
}

#[tokio::test]
async fn test_rerun_versions_around_previous_output() -> TestResult<()> {
  let (input, output) = create_test_dirs(&[("a.pdf", "a"), ("b.pdf", "")]);
  let organizer = Organizer::new(
    &Config::default(),
    StubExtractor::default().with("a.pdf", noise_metadata()),
    StubClassifier::always(ClassificationRecord::new(["Review"], 1.0)),
  );
  organizer.organize(input.path(), output.path()).await?;

  // A second run treats the first run's copies as existing files.
  let organized = organizer.organize(input.path(), output.path()).await?;
  assert_eq!(organized.rows[0].new_name, "Smith_etal_2022_Effects-Noise_v1.pdf");
  assert_eq!(fs::read(output.path().join("Review/Smith_etal_2022_Effects-Noise.pdf"))?, b"a");
  Ok(())
}

#[tokio::test]
async fn test_output_inside_input_is_not_rescanned() -> TestResult<()> {
  let (input, _unused) = create_test_dirs(&[("paper1.pdf", "%PDF")]);
  let output = input.path().join("organized");
  let organizer = Organizer::new(
    &Config::default(),
    StubExtractor::default().with("paper1.pdf", noise_metadata()),
    StubClassifier::always(ClassificationRecord::new(["Medical_AI"], 0.91)),
  );

  organizer.organize(input.path(), &output).await?;
  let second = organizer.organize(input.path(), &output).await?;

  assert_eq!(second.rows.len(), 1);
  assert_eq!(second.skipped.len(), 0);
  assert_eq!(list_files(&output), vec![
    PathBuf::from("Medical_AI/Smith_etal_2022_Effects-Noise.pdf"),
    PathBuf::from("Medical_AI/Smith_etal_2022_Effects-Noise_v1.pdf"),
  ]);
  Ok(())
}

#[tokio::test]
async fn test_custom_extension() -> TestResult<()> {
  let (input, output) = create_test_dirs(&[("paper1.pdf", "pdf"), ("paper1.djvu", "djvu")]);
  let config = Config { extension: "djvu".to_string(), ..Config::default() };
  let organizer = Organizer::new(
    &config,
    StubExtractor::default().with("paper1.djvu", noise_metadata()),
    StubClassifier::always(ClassificationRecord::new(["Review"], 0.3)),
  );

  let organized = organizer.organize(input.path(), output.path()).await?;
  assert_eq!(organized.rows[0].new_name, "Smith_etal_2022_Effects-Noise.djvu");
  assert_eq!(fs::read(output.path().join("Review/Smith_etal_2022_Effects-Noise.djvu"))?, b"djvu");
  Ok(())
}
