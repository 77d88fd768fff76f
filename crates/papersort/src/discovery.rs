//! Recursive discovery of input documents.

use walkdir::WalkDir;

use super::*;

/// Lists every file under `root` whose name ends in `.{extension}`.
///
/// Matching is case-sensitive. Paths are returned in directory traversal
/// order, which is not sorted and may differ between platforms. Anything
/// under `exclude` (typically the output directory, when it lives inside the
/// input directory) is skipped.
///
/// # Errors
///
/// Fails when `root` is not a readable directory. Unreadable entries below the
/// root are logged and skipped.
pub fn discover_documents(
  root: &Path,
  extension: &str,
  exclude: Option<&Path>,
) -> Result<Vec<PathBuf>> {
  if !root.is_dir() {
    return Err(PapersortError::InvalidInput(format!("{} is not a directory", root.display())));
  }
  let root = root.canonicalize()?;
  let exclude = exclude.and_then(|path| path.canonicalize().ok());
  let suffix = format!(".{extension}");

  let walker = WalkDir::new(&root).into_iter().filter_entry(|entry| {
    exclude.as_deref().map_or(true, |excluded| !entry.path().starts_with(excluded))
  });

  let mut documents = Vec::new();
  for entry in walker {
    let entry = match entry {
      Ok(entry) => entry,
      Err(e) if e.depth() == 0 => return Err(e.into()),
      Err(e) => {
        warn!("Skipping unreadable entry under {root:?}: {e}");
        continue;
      },
    };

    if !entry.path().is_file() {
      continue;
    }
    let Some(name) = entry.file_name().to_str() else {
      warn!("Skipping {:?}: file name is not valid UTF-8", entry.path());
      continue;
    };
    if name.ends_with(&suffix) && name != suffix {
      documents.push(entry.into_path());
    }
  }

  debug!("Discovered {} document(s) under {root:?}", documents.len());
  Ok(documents)
}
