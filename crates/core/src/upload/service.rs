//! Upload filter implementation using Apache OpenDAL.

use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};

use bytes::Bytes;
use chrono::Utc;
use opendal::{Operator, Writer, services};
use serde::Serialize;
use talent_shared::UploadConfig;

use super::error::UploadError;

/// Last token handed out by [`UploadFilter::stored_name`].
static LAST_TOKEN: AtomicI64 = AtomicI64::new(0);

/// A file accepted by the filter and written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredUpload {
    /// Filename as sent by the client.
    pub original_name: String,
    /// Name inside the upload directory.
    pub stored_name: String,
    /// Full path on disk.
    pub stored_path: PathBuf,
    /// Size in bytes.
    pub size_bytes: u64,
    /// MIME type derived from the extension.
    pub content_type: String,
}

/// Validates and persists resume uploads.
pub struct UploadFilter {
    operator: Operator,
    config: UploadConfig,
}

impl UploadFilter {
    /// Create a filter rooted at the configured directory.
    ///
    /// The directory is created if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be used.
    pub fn from_config(config: UploadConfig) -> Result<Self, UploadError> {
        let root = config
            .dir
            .to_str()
            .ok_or_else(|| UploadError::storage("upload directory is not valid UTF-8"))?;

        let operator = Operator::new(services::Fs::default().root(root))?.finish();
        Ok(Self { operator, config })
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Accept `filename` only if its lower-cased suffix is allow-listed.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::UnsupportedType`] otherwise.
    pub fn check_extension(&self, filename: &str) -> Result<(), UploadError> {
        let allowed = extension_of(filename).is_some_and(|ext| {
            self.config
                .allowed_extensions
                .iter()
                .any(|a| a.eq_ignore_ascii_case(&ext))
        });

        if allowed {
            Ok(())
        } else {
            Err(UploadError::unsupported_type(&self.config.allowed_extensions))
        }
    }

    /// Generate the on-disk name for an upload.
    ///
    /// Format: `{token}-{sanitized_filename}` where `token` is a millisecond
    /// timestamp that never repeats within the process.
    #[must_use]
    pub fn stored_name(filename: &str) -> String {
        format!("{}-{}", next_token(), sanitize_filename(base_name(filename)))
    }

    /// Start storing an upload.
    ///
    /// The extension is checked before anything touches the disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is rejected or the file cannot be created.
    pub async fn begin(&self, filename: &str) -> Result<PendingUpload, UploadError> {
        self.check_extension(filename)?;

        let stored_name = Self::stored_name(filename);
        let writer = self.operator.writer(&stored_name).await?;

        tracing::debug!(stored_name = %stored_name, "Receiving upload");

        Ok(PendingUpload {
            writer,
            operator: self.operator.clone(),
            original_name: base_name(filename).to_string(),
            stored_path: self.config.dir.join(&stored_name),
            stored_name,
            written: 0,
            max: self.config.max_file_size,
        })
    }

    /// Read a stored upload back.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn load(&self, upload: &StoredUpload) -> Result<Vec<u8>, UploadError> {
        let buffer = self.operator.read(&upload.stored_name).await?;
        Ok(buffer.to_vec())
    }

    /// Remove a stored upload.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub async fn discard(&self, upload: &StoredUpload) -> Result<(), UploadError> {
        self.operator
            .delete(&upload.stored_name)
            .await
            .map_err(UploadError::from)
    }
}

/// An upload being streamed to disk.
pub struct PendingUpload {
    writer: Writer,
    operator: Operator,
    original_name: String,
    stored_name: String,
    stored_path: PathBuf,
    written: u64,
    max: u64,
}

impl PendingUpload {
    /// Append a chunk.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::FileTooLarge`] once the cap would be exceeded;
    /// the partial file is removed first.
    pub async fn write(&mut self, chunk: Bytes) -> Result<(), UploadError> {
        let len = chunk.len() as u64;
        if self.written + len > self.max {
            self.remove_partial().await;
            return Err(UploadError::FileTooLarge { max: self.max });
        }

        if let Err(e) = self.writer.write(chunk).await {
            self.remove_partial().await;
            return Err(e.into());
        }
        self.written += len;
        Ok(())
    }

    /// Abandon the upload and remove whatever was written.
    pub async fn cancel(mut self) {
        self.remove_partial().await;
    }

    /// Flush the file and describe it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be closed.
    pub async fn finish(mut self) -> Result<StoredUpload, UploadError> {
        if let Err(e) = self.writer.close().await {
            self.remove_partial().await;
            return Err(e.into());
        }

        Ok(StoredUpload {
            content_type: content_type_for(&self.original_name).to_string(),
            original_name: self.original_name,
            stored_name: self.stored_name,
            stored_path: self.stored_path,
            size_bytes: self.written,
        })
    }

    async fn remove_partial(&mut self) {
        // fs abort is unsupported without an atomic write dir
        let _ = self.writer.abort().await;
        if let Err(e) = self.operator.delete(&self.stored_name).await {
            tracing::warn!(stored_name = %self.stored_name, error = %e, "Failed to remove partial upload");
        }
    }
}

fn next_token() -> i64 {
    let now = Utc::now().timestamp_millis();
    let previous = LAST_TOKEN
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    now.max(previous + 1)
}

/// Strip any client-side directory (browsers may send `C:\fakepath\cv.pdf`).
fn base_name(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
}

/// Lower-cased suffix including the dot; `None` for dotfiles and bare names.
fn extension_of(filename: &str) -> Option<String> {
    let name = base_name(filename);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => Some(format!(".{}", ext.to_lowercase())),
        _ => None,
    }
}

/// MIME type for the accepted document suffixes.
fn content_type_for(filename: &str) -> &'static str {
    match extension_of(filename).as_deref() {
        Some(".pdf") => "application/pdf",
        Some(".doc") => "application/msword",
        Some(".docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}

/// Sanitize filename for the upload directory.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    fn filter_in(dir: &tempfile::TempDir) -> UploadFilter {
        UploadFilter::from_config(UploadConfig::new(dir.path())).expect("should create filter")
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("resume.pdf"), "resume.pdf");
        assert_eq!(sanitize_filename("my cv (1).pdf"), "my_cv__1_.pdf");
        assert_eq!(sanitize_filename("日本語.pdf"), "___.pdf");
    }

    #[rstest]
    #[case("cv.pdf", Some(".pdf"))]
    #[case("CV.PDF", Some(".pdf"))]
    #[case("archive.tar.DocX", Some(".docx"))]
    #[case(r"C:\fakepath\cv.doc", Some(".doc"))]
    #[case(".pdf", None)]
    #[case("README", None)]
    fn test_extension_of(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(extension_of(name).as_deref(), expected);
    }

    #[rstest]
    #[case("resume.pdf")]
    #[case("resume.PDF")]
    #[case("resume.doc")]
    #[case("resume.Docx")]
    fn test_check_extension_accepts(#[case] name: &str) {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(filter_in(&dir).check_extension(name).is_ok());
    }

    #[rstest]
    #[case("resume.exe")]
    #[case("resume.txt")]
    #[case("resume.zip")]
    #[case("resume.pdf.exe")]
    #[case("pdf")]
    fn test_check_extension_rejects(#[case] name: &str) {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = filter_in(&dir).check_extension(name).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType { .. }));
    }

    #[test]
    fn test_stored_names_are_unique() {
        let names: HashSet<String> = (0..500)
            .map(|_| UploadFilter::stored_name("cv.pdf"))
            .collect();
        assert_eq!(names.len(), 500);
        assert!(names.iter().all(|n| n.ends_with("-cv.pdf")));
    }

    #[test]
    fn test_stored_name_has_no_separators() {
        let name = UploadFilter::stored_name("../../etc/passwd.pdf");
        assert!(!name.contains('/'));
        assert!(name.ends_with("-passwd.pdf"));

        let name = UploadFilter::stored_name("..\\secret.pdf");
        assert!(!name.contains('\\'));
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.pdf"), "application/pdf");
        assert_eq!(content_type_for("a.DOC"), "application/msword");
        assert!(content_type_for("a.docx").contains("wordprocessingml"));
        assert_eq!(content_type_for("a.bin"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_store_load_discard() {
        let dir = tempfile::tempdir().expect("tempdir");
        let filter = filter_in(&dir);

        let mut pending = filter.begin("resume.pdf").await.expect("should begin");
        pending
            .write(Bytes::from_static(b"%PDF-1.4 "))
            .await
            .expect("should write");
        pending
            .write(Bytes::from_static(b"body"))
            .await
            .expect("should write");
        let stored = pending.finish().await.expect("should finish");

        assert_eq!(stored.original_name, "resume.pdf");
        assert_eq!(stored.size_bytes, 13);
        assert_eq!(stored.content_type, "application/pdf");
        assert_eq!(stored.stored_path, dir.path().join(&stored.stored_name));
        assert!(stored.stored_path.exists());

        let bytes = filter.load(&stored).await.expect("should load");
        assert_eq!(bytes, b"%PDF-1.4 body");

        filter.discard(&stored).await.expect("should discard");
        assert!(!stored.stored_path.exists());
    }

    #[tokio::test]
    async fn test_rejected_type_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let filter = filter_in(&dir);

        let err = filter.begin("payload.exe").await.err().expect("should reject");
        assert!(matches!(err, UploadError::UnsupportedType { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).expect("readable").count(), 0);
    }

    #[tokio::test]
    async fn test_too_large_removes_partial_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let filter = UploadFilter::from_config(UploadConfig::new(dir.path()).with_max_file_size(8))
            .expect("should create filter");

        let mut pending = filter.begin("resume.pdf").await.expect("should begin");
        pending
            .write(Bytes::from_static(b"12345"))
            .await
            .expect("within limit");
        let err = pending
            .write(Bytes::from_static(b"6789"))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::FileTooLarge { max: 8 }));
        let leftovers = std::fs::read_dir(dir.path())
            .expect("readable")
            .filter_map(Result::ok)
            .filter(|e| e.path().is_file())
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_exact_limit_is_accepted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let filter = UploadFilter::from_config(UploadConfig::new(dir.path()).with_max_file_size(4))
            .expect("should create filter");

        let mut pending = filter.begin("resume.doc").await.expect("should begin");
        pending
            .write(Bytes::from_static(b"1234"))
            .await
            .expect("at limit");
        let stored = pending.finish().await.expect("should finish");
        assert_eq!(stored.size_bytes, 4);
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("uploads");
        let filter =
            UploadFilter::from_config(UploadConfig::new(&nested)).expect("should create filter");

        let mut pending = filter.begin("cv.pdf").await.expect("should begin");
        pending.write(Bytes::from_static(b"x")).await.expect("write");
        let stored = pending.finish().await.expect("finish");

        assert!(nested.is_dir());
        assert!(stored.stored_path.starts_with(&nested));
    }

    #[tokio::test]
    async fn test_client_directory_is_dropped_from_original_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let filter = filter_in(&dir);

        let mut pending = filter
            .begin("C:\\fakepath\\cv.pdf")
            .await
            .expect("should begin");
        pending.write(Bytes::from_static(b"x")).await.expect("write");
        let stored = pending.finish().await.expect("finish");

        assert_eq!(stored.original_name, "cv.pdf");
        assert!(stored.stored_name.ends_with("-cv.pdf"));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn filter() -> UploadFilter {
        UploadFilter::from_config(UploadConfig::new(std::env::temp_dir()))
            .expect("should create filter")
    }

    /// Randomly upper-cases each character of `s`.
    fn mixed_case(s: &'static str) -> impl Strategy<Value = String> {
        proptest::collection::vec(any::<bool>(), s.len()).prop_map(move |flags| {
            s.chars()
                .zip(flags)
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_allowed_suffix_any_case(
            stem in "[a-zA-Z0-9_ -]{1,20}",
            ext in prop_oneof![mixed_case("pdf"), mixed_case("doc"), mixed_case("docx")],
        ) {
            let name = format!("{stem}.{ext}");
            prop_assert!(filter().check_extension(&name).is_ok());
        }

        #[test]
        fn prop_other_suffix_rejected(
            stem in "[a-zA-Z0-9_]{1,20}",
            ext in "[a-z0-9]{1,6}",
        ) {
            prop_assume!(!matches!(ext.as_str(), "pdf" | "doc" | "docx"));
            let name = format!("{stem}.{ext}");
            let rejected = matches!(
                filter().check_extension(&name),
                Err(UploadError::UnsupportedType { .. })
            );
            prop_assert!(rejected);
        }
    }
}
