use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::PiiCategory;

/// One located PII occurrence inside a document chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiEntity {
    /// The detected category.
    #[serde(rename = "type")]
    pub category: PiiCategory,

    /// The matched text, verbatim.
    pub value: String,

    /// Identifier of the chunk the match was found in.
    pub chunk_id: String,

    /// Byte offset of the match inside the chunk text.
    pub pos: usize,

    /// Name of the task that produced it.
    pub name: String,

    /// Country of the task that produced it, if country specific.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl PiiEntity {
    /// Byte length of the matched text.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Byte offset one past the end of the match.
    pub fn end(&self) -> usize {
        self.pos + self.value.len()
    }
}

/// Append-only collection of occurrences for one processed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PiiCollection {
    pub lang: String,
    pub doc_id: Option<String>,
    pub created: DateTime<Utc>,
    entities: Vec<PiiEntity>,
}

impl PiiCollection {
    pub fn new(lang: &str, doc_id: Option<&str>) -> Self {
        Self {
            lang: lang.to_string(),
            doc_id: doc_id.map(String::from),
            created: Utc::now(),
            entities: Vec::new(),
        }
    }

    pub fn add(&mut self, entity: PiiEntity) {
        self.entities.push(entity);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PiiEntity> {
        self.entities.iter()
    }

    pub fn entities(&self) -> &[PiiEntity] {
        &self.entities
    }

    /// Occurrences of a single category, in collection order.
    pub fn of_category(&self, category: PiiCategory) -> impl Iterator<Item = &PiiEntity> {
        self.entities.iter().filter(move |e| e.category == category)
    }
}

impl<'a> IntoIterator for &'a PiiCollection {
    type Item = &'a PiiEntity;
    type IntoIter = std::slice::Iter<'a, PiiEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}
