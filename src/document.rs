use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PiiError, Result};

/// A borrowed view of one addressable unit of document text.
#[derive(Debug, Clone, Copy)]
pub struct ChunkRef<'a> {
    pub id: &'a str,
    pub text: &'a str,
}

/// What the finder needs from a document: an identifier and its chunks,
/// in document order.
pub trait SourceDocument {
    fn id(&self) -> Option<&str>;

    fn chunks(&self) -> Box<dyn Iterator<Item = ChunkRef<'_>> + '_>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: String,
    pub text: String,
}

/// In-memory document made of text chunks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextDocument {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub chunks: Vec<DocumentChunk>,
}

impl TextDocument {
    pub fn new(id: Option<&str>) -> Self {
        Self {
            id: id.map(String::from),
            chunks: Vec::new(),
        }
    }

    /// Append a chunk; returns `self` so documents can be built inline.
    pub fn with_chunk(mut self, id: &str, text: &str) -> Self {
        self.add_chunk(id, text);
        self
    }

    pub fn add_chunk(&mut self, id: &str, text: &str) {
        self.chunks.push(DocumentChunk {
            id: id.to_string(),
            text: text.to_string(),
        });
    }

    /// Split plain text into chunks at blank lines, numbering them from 1.
    pub fn from_text(id: Option<&str>, text: &str) -> Self {
        let mut doc = Self::new(id);
        let mut para: Vec<&str> = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                if !para.is_empty() {
                    let n = doc.chunks.len() + 1;
                    doc.add_chunk(&n.to_string(), &para.join("\n"));
                    para.clear();
                }
            } else {
                para.push(line);
            }
        }
        if !para.is_empty() {
            let n = doc.chunks.len() + 1;
            doc.add_chunk(&n.to_string(), &para.join("\n"));
        }
        doc
    }

    /// Load a document from disk.
    ///
    /// `.yaml`/`.yml` and `.json` files hold `{id, chunks: [{id, text}]}`;
    /// anything else is read as plain text. A missing id defaults to the
    /// file stem.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        let mut doc = match ext.as_deref() {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&contents).map_err(|e| PiiError::DocumentParse {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?
            }
            Some("json") => {
                serde_json::from_str(&contents).map_err(|e| PiiError::DocumentParse {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?
            }
            _ => Self::from_text(None, &contents),
        };
        if doc.id.is_none() {
            doc.id = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned());
        }
        Ok(doc)
    }
}

impl SourceDocument for TextDocument {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn chunks(&self) -> Box<dyn Iterator<Item = ChunkRef<'_>> + '_> {
        Box::new(self.chunks.iter().map(|c| ChunkRef {
            id: &c.id,
            text: &c.text,
        }))
    }
}
