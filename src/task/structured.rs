use crate::error::{PiiError, Result};

use super::EntityIter;

/// A detector implemented as its own type.
///
/// The engine only relies on `find`. Implementors are constructed with the
/// shared [`TaskArgs`](super::TaskArgs) and use them to label what they emit.
pub trait StructuredTask: Send + Sync {
    /// Locate occurrences in `text`.
    ///
    /// The default body is a construction defect: a task type that never
    /// provided an implementation.
    fn find<'a>(&'a self, text: &'a str, chunk_id: &'a str) -> Result<EntityIter<'a>> {
        let _ = (text, chunk_id);
        Err(PiiError::Unimplemented {
            task: self.type_name().to_string(),
        })
    }

    /// Name used in diagnostics.
    fn type_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
