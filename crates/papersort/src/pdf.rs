//! Page-bounded text extraction from PDF files.
//!
//! Only the first few pages of a paper are needed to find its title block or
//! decide what it is about, so extraction is bounded by a page count.

use lopdf::Document;

use super::*;

/// Text pulled from the leading pages of a PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfText {
  /// Pages actually read
  pub pages_read:  usize,
  /// Pages in the document
  pub total_pages: usize,
  /// Extracted text, one block per page
  pub text:        String,
}

impl PdfText {
  /// Extracts text from at most `max_pages` leading pages.
  ///
  /// # Errors
  ///
  /// - [`PapersortError::Lopdf`] when the file cannot be parsed
  /// - [`PapersortError::ExtractionFailure`] when the pages contain no text
  pub fn extract_prefix(path: impl AsRef<Path>, max_pages: usize) -> Result<Self> {
    let path = path.as_ref();
    let document = Document::load(path)?;
    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    let total_pages = page_numbers.len();

    let mut blocks = Vec::new();
    for page_number in page_numbers.iter().take(max_pages) {
      match document.extract_text(&[*page_number]) {
        Ok(text) => blocks.push(text),
        // Unreadable pages (odd font encodings, broken streams) are skipped.
        Err(e) => warn!("Could not extract text from page {page_number} of {path:?}: {e}"),
      }
    }

    let text = blocks.join("\n");
    if text.trim().is_empty() {
      return Err(PapersortError::ExtractionFailure(format!(
        "no extractable text in the first {max_pages} page(s) of {}",
        path.display()
      )));
    }

    trace!("Extracted {} characters from {path:?}", text.len());
    Ok(Self { pages_read: total_pages.min(max_pages), total_pages, text })
  }

  /// Extracts text from every page.
  pub fn extract_all(path: impl AsRef<Path>) -> Result<Self> {
    Self::extract_prefix(path, usize::MAX)
  }

  /// The text cut down to its first `max_words` whitespace-separated words.
  pub fn truncated_words(&self, max_words: usize) -> String {
    self.text.split_whitespace().take(max_words).collect::<Vec<_>>().join(" ")
  }
}
