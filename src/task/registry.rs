use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::Result;

use super::structured::StructuredTask;
use super::TaskArgs;

/// Keyword arguments bound to a callable or structured task.
pub type Kwargs = serde_json::Map<String, serde_json::Value>;

/// A free-form detector: returns the matched substrings of `text`, without
/// positions.
pub type DetectorFn = Arc<dyn Fn(&str, &Kwargs) -> Vec<String> + Send + Sync>;

/// Builds a structured task from the shared task argument set.
pub type StructuredCtor = Arc<dyn Fn(&TaskArgs) -> Result<Box<dyn StructuredTask>> + Send + Sync>;

/// Named callables and structured task constructors.
///
/// Definition batches can only refer to code by name; this is where those
/// names resolve.
#[derive(Clone, Default)]
pub struct TaskRegistry {
    callables: BTreeMap<String, DetectorFn>,
    structured: BTreeMap<String, StructuredCtor>,
}

impl std::fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("callables", &self.callables.keys().collect::<Vec<_>>())
            .field("structured", &self.structured.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callable under `name`, replacing any previous one.
    pub fn register_callable<F>(&mut self, name: &str, call: F)
    where
        F: Fn(&str, &Kwargs) -> Vec<String> + Send + Sync + 'static,
    {
        self.callables.insert(name.to_string(), Arc::new(call));
    }

    /// Register a structured task constructor under `name`.
    pub fn register_structured<F>(&mut self, name: &str, ctor: F)
    where
        F: Fn(&TaskArgs) -> Result<Box<dyn StructuredTask>> + Send + Sync + 'static,
    {
        self.structured.insert(name.to_string(), Arc::new(ctor));
    }

    pub fn callable(&self, name: &str) -> Option<DetectorFn> {
        self.callables.get(name).cloned()
    }

    pub fn structured(&self, name: &str) -> Option<StructuredCtor> {
        self.structured.get(name).cloned()
    }

    pub fn callable_names(&self) -> impl Iterator<Item = &str> {
        self.callables.keys().map(String::as_str)
    }

    pub fn structured_names(&self) -> impl Iterator<Item = &str> {
        self.structured.keys().map(String::as_str)
    }
}
