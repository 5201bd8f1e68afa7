//! Document layer - filesystem boundary
//!
//! Provides the only path between the filesystem and a [`Document`]:
//! - File → Document parsing (ingress)
//! - Document → File serialization (egress)

use crate::error::{LayerResult, ParseError, SerializeError};
use crate::parser::XmlParser;
use crate::serializer::{SerializeOptions, XmlSerializer};
use std::path::Path;
use tintmark_tree::Document;

/// Default maximum input size (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Reads, parses, renders and writes documents
///
/// The annotation engine never touches files; everything goes through here.
#[derive(Debug, Clone)]
pub struct DocumentLayer {
    parser: XmlParser,
    serializer: XmlSerializer,
    /// Maximum file size to parse (bytes)
    max_file_size: u64,
}

impl DocumentLayer {
    /// Create layer with default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(SerializeOptions::default())
    }

    /// Create layer with specific output options
    #[inline]
    #[must_use]
    pub fn with_options(options: SerializeOptions) -> Self {
        Self {
            parser: XmlParser::new(),
            serializer: XmlSerializer::new(options),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Override the maximum input size
    #[inline]
    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Maximum input size in bytes
    #[inline]
    #[must_use]
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Output options
    #[inline]
    #[must_use]
    pub fn options(&self) -> SerializeOptions {
        self.serializer.options()
    }

    /// Read and parse a file (ingress)
    ///
    /// # Errors
    /// - `ParseError::Io` if the file cannot be read
    /// - `ParseError::TooLarge` if the file exceeds the size limit
    /// - Any parse error for malformed content
    pub fn read_document(&self, path: impl AsRef<Path>) -> LayerResult<Document> {
        let path = path.as_ref();

        let size = std::fs::metadata(path)
            .map_err(|e| ParseError::io_error(path, e))?
            .len();
        if size > self.max_file_size {
            return Err(ParseError::TooLarge {
                path: path.to_path_buf(),
                size,
                max: self.max_file_size,
            }
            .into());
        }

        let content = std::fs::read(path).map_err(|e| ParseError::io_error(path, e))?;
        let doc = self.parser.parse_bytes(&content)?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "read document");
        Ok(doc)
    }

    /// Render a document to bytes
    ///
    /// # Errors
    /// Returns `SerializeError` if rendering fails
    pub fn render(&self, doc: &Document) -> LayerResult<Vec<u8>> {
        Ok(self.serializer.serialize(doc)?)
    }

    /// Write already rendered bytes (egress)
    ///
    /// # Errors
    /// Returns `SerializeError::Io` if the write fails
    pub fn persist(&self, path: impl AsRef<Path>, bytes: &[u8]) -> LayerResult<()> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), bytes = bytes.len(), "writing document");
        std::fs::write(path, bytes).map_err(|e| SerializeError::io_error(path, e))?;
        tracing::info!(path = %path.display(), "document written");
        Ok(())
    }

    /// Render and write a document, returning the rendered bytes
    ///
    /// # Errors
    /// See [`DocumentLayer::render`] and [`DocumentLayer::persist`]
    pub fn write_document(&self, doc: &Document, path: impl AsRef<Path>) -> LayerResult<Vec<u8>> {
        let bytes = self.render(doc)?;
        self.persist(path, &bytes)?;
        Ok(bytes)
    }
}

impl Default for DocumentLayer {
    fn default() -> Self {
        Self::new()
    }
}
