//! Markdown conversion command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quire_static::{AddedFile, Converter};

/// Run the convert command.
pub async fn run(files: &[PathBuf], output: &Path) -> Result<()> {
    let converter = collect(files);

    if converter.documents().is_empty() {
        anyhow::bail!("No Markdown files to convert");
    }

    tracing::info!(
        "Converting {} documents with {} images",
        converter.documents().len(),
        converter.images().len()
    );

    let title = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "converted".to_string());

    let html = converter.render_html(&title)?;
    fs::write(output, html).with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!("Wrote {}", output.display());

    Ok(())
}

/// Add every file to a converter. Files that fail are reported and skipped.
fn collect(files: &[PathBuf]) -> Converter {
    let mut converter = Converter::new();

    for path in files {
        match converter.add_file(path) {
            Ok(AddedFile::Markdown(_)) => tracing::debug!("Added document {}", path.display()),
            Ok(AddedFile::Image(name)) => tracing::debug!("Added image {}", name),
            Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
        }
    }

    converter
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn skips_failed_files() {
        let temp = tempdir().unwrap();
        let doc = temp.path().join("doc.md");
        fs::write(&doc, "# Doc").unwrap();

        let converter = collect(&[
            doc,
            temp.path().join("missing.md"),
            temp.path().join("notes.txt"),
        ]);

        assert_eq!(converter.documents().len(), 1);
        assert!(converter.images().is_empty());
    }

    #[tokio::test]
    async fn writes_converted_page() {
        let temp = tempdir().unwrap();
        let doc = temp.path().join("guide.md");
        let img = temp.path().join("pic.gif");
        fs::write(&doc, "![pic](images/pic.gif)").unwrap();
        fs::write(&img, b"GIF89a").unwrap();
        let output = temp.path().join("guide.html");

        run(&[doc, img], &output).await.unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("<title>guide</title>"));
        assert!(html.contains("data:image/gif;base64,"));
    }

    #[tokio::test]
    async fn fails_without_documents() {
        let temp = tempdir().unwrap();

        let result = run(&[temp.path().join("missing.md")], &temp.path().join("out.html")).await;

        assert!(result.is_err());
    }
}
