use lopdf::{
  content::{Content, Operation},
  dictionary, Document, Object, Stream,
};
use papersort::{
  analysis::{LlmClassifier, LlmMetadataExtractor, LlmSummarizer},
  llm::LlmClient,
};

use super::*;

const TITLE_PAGE: &str = "Attention Is All You Need. Ashish Vaswani, Noam Shazeer, Niki Parmar. \
                          Google Brain, 2017. Abstract: The dominant sequence transduction models \
                          are based on complex recurrent or convolutional neural networks.";

/// Writes a single-page PDF whose only text is `text`.
fn write_title_page(path: &Path, text: &str) {
  let mut doc = Document::with_version("1.5");
  let pages_id = doc.new_object_id();
  let font_id = doc.add_object(dictionary! {
    "Type" => "Font",
    "Subtype" => "Type1",
    "BaseFont" => "Helvetica",
  });
  let content = Content {
    operations: vec![
      Operation::new("BT", vec![]),
      Operation::new("Tf", vec!["F1".into(), 10.into()]),
      Operation::new("Td", vec![40.into(), 740.into()]),
      Operation::new("Tj", vec![Object::string_literal(text)]),
      Operation::new("ET", vec![]),
    ],
  };
  let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
  let page_id = doc.add_object(dictionary! {
    "Type" => "Page",
    "Parent" => pages_id,
    "Contents" => content_id,
    "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
  });
  doc.objects.insert(
    pages_id,
    Object::Dictionary(dictionary! {
      "Type" => "Pages",
      "Kids" => vec![page_id.into()],
      "Count" => 1,
      "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    }),
  );
  let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
  doc.trailer.set("Root", catalog_id);
  doc.save(path).unwrap();
}

#[ignore = "Can't run this in general -- relies on a live API key."]
#[traced_test]
#[tokio::test]
async fn test_live_metadata_and_classification() -> TestResult<()> {
  let (input, output) = create_test_dirs(&[]);
  write_title_page(&input.path().join("1706.03762.pdf"), TITLE_PAGE);

  let config = Config::default();
  let client = LlmClient::from_config(&config)?;
  let organizer = Organizer::new(
    &config,
    LlmMetadataExtractor::new(client.clone(), &config),
    LlmClassifier::new(client, &config),
  );

  let organized = organizer.organize(input.path(), output.path()).await?;
  dbg!(&organized);
  assert_eq!(organized.rows.len(), 1);
  assert!(organized.rows[0].new_name.starts_with("Vaswani_etal_2017_"));
  Ok(())
}

#[ignore = "Can't run this in general -- relies on a live API key."]
#[tokio::test]
async fn test_live_summary_note() -> TestResult<()> {
  let (input, notes) = create_test_dirs(&[]);
  write_title_page(&input.path().join("attention.pdf"), TITLE_PAGE);

  let config = Config::default();
  let notebook = Notebook::new(&config, LlmSummarizer::new(LlmClient::from_config(&config)?, &config));

  let written = notebook.process(input.path(), notes.path()).await?;
  let note = fs::read_to_string(&written[0])?;
  dbg!(&note);
  assert!(note.contains("## attention\n"));
  Ok(())
}
