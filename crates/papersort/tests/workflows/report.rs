use papersort::record::ReportRow;

use super::*;

#[traced_test]
#[tokio::test]
async fn test_process_writes_report() -> TestResult<()> {
  let (input, output) = create_test_dirs(&[("paper1.pdf", "noise"), ("broken.pdf", "???")]);
  let organizer = Organizer::new(
    &Config::default(),
    StubExtractor::default().with("paper1.pdf", noise_metadata()),
    StubClassifier::always(ClassificationRecord::new(["Medical_AI"], 0.91)),
  );

  let report = organizer.process(input.path(), output.path()).await?;

  assert_eq!(report, output.path().join("processing_report.csv"));
  assert_eq!(
    fs::read_to_string(&report)?,
    "original_name,new_name,classification_path,confidence,warnings\npaper1.pdf,\
     Smith_etal_2022_Effects-Noise.pdf,Medical_AI,91%,none\n"
  );
  assert!(logs_contain("1 skipped"));
  Ok(())
}

#[tokio::test]
async fn test_report_round_trips_collision_warnings() -> TestResult<()> {
  let (input, output) = create_test_dirs(&[("one/a.pdf", "a"), ("two/b.pdf", "b")]);
  let config = Config { report_filename: "report.csv".to_string(), ..Config::default() };
  let organizer = Organizer::new(
    &config,
    StubExtractor::default().with("a.pdf", climate_metadata()).with("b.pdf", climate_metadata()),
    StubClassifier::always(ClassificationRecord::new(["Climate_Model", "Energy"], 0.625)),
  );

  let report = organizer.process(input.path(), output.path()).await?;
  assert_eq!(report.file_name().unwrap(), "report.csv");

  let mut reader = csv::Reader::from_path(&report)?;
  let rows: Vec<ReportRow> = reader.deserialize().collect::<std::result::Result<_, _>>()?;
  assert_eq!(rows.len(), 2);
  assert!(rows.iter().all(|row| row.classification_path == "Climate_Model/Energy"));
  assert!(rows.iter().all(|row| row.confidence_display == "62%"));

  // The collision warning contains a comma and still reads back as one field.
  let renamed = rows.iter().find(|row| row.has_warnings()).unwrap();
  assert_eq!(renamed.new_name, "Doe_2020_climate-risk_v1.pdf");
  assert_eq!(
    renamed.warnings,
    "filename collision on Doe_2020_climate-risk.pdf, renamed to Doe_2020_climate-risk_v1.pdf"
  );
  Ok(())
}

#[tokio::test]
async fn test_empty_input_writes_header_only() -> TestResult<()> {
  let (input, output) = create_test_dirs(&[]);
  let organizer = Organizer::new(
    &Config::default(),
    StubExtractor::default(),
    StubClassifier::default(),
  );

  let report = organizer.process(input.path(), &output.path().join("fresh")).await?;
  assert_eq!(
    fs::read_to_string(report)?,
    "original_name,new_name,classification_path,confidence,warnings\n"
  );
  Ok(())
}
