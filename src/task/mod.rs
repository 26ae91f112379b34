pub mod callable;
pub mod factory;
pub mod pattern;
pub mod registry;
pub mod structured;

use crate::category::PiiCategory;
use crate::context::{ContextFilter, ContextSpec};
use crate::entity::PiiEntity;
use crate::error::Result;

pub use callable::CallableTask;
pub use factory::build_task;
pub use pattern::PatternTask;
pub use registry::{DetectorFn, Kwargs, StructuredCtor, TaskRegistry};
pub use structured::StructuredTask;

/// Lazy, single-pass sequence of occurrences produced by one invocation.
pub type EntityIter<'a> = Box<dyn Iterator<Item = PiiEntity> + 'a>;

/// The argument set shared by every task kind.
#[derive(Debug, Clone)]
pub struct TaskArgs {
    pub category: PiiCategory,
    pub lang: String,
    pub country: Option<String>,
    pub name: String,
    pub doc: String,
    pub kwargs: Kwargs,
}

impl TaskArgs {
    pub fn new(
        category: PiiCategory,
        lang: &str,
        country: Option<&str>,
        name: &str,
        doc: &str,
    ) -> Self {
        Self {
            category,
            lang: lang.to_string(),
            country: country.map(String::from),
            name: name.to_string(),
            doc: doc.to_string(),
            kwargs: Kwargs::new(),
        }
    }

    /// Label a located match with this task's identity.
    pub fn entity(&self, value: impl Into<String>, chunk_id: &str, pos: usize) -> PiiEntity {
        PiiEntity {
            category: self.category,
            value: value.into(),
            chunk_id: chunk_id.to_string(),
            pos,
            name: self.name.clone(),
            country: self.country.clone(),
        }
    }
}

pub(crate) enum TaskKind {
    Pattern(PatternTask),
    Callable(CallableTask),
    Structured(Box<dyn StructuredTask>),
}

impl TaskKind {
    fn label(&self) -> &'static str {
        match self {
            TaskKind::Pattern(_) => "pattern",
            TaskKind::Callable(_) => "callable",
            TaskKind::Structured(_) => "structured",
        }
    }
}

/// A runtime detector built from exactly one definition. Immutable once
/// built.
pub struct Task {
    args: TaskArgs,
    context: Option<ContextSpec>,
    kind: TaskKind,
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("args", &self.args)
            .field("context", &self.context)
            .field("kind", &self.kind.label())
            .finish()
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<{}:{}:{}:{}>",
            self.args.category,
            self.args.name,
            self.args.country.as_deref().unwrap_or("-"),
            self.kind.label()
        )
    }
}

impl Task {
    pub(crate) fn new(args: TaskArgs, context: Option<ContextSpec>, kind: TaskKind) -> Self {
        Self {
            args,
            context,
            kind,
        }
    }

    pub fn category(&self) -> PiiCategory {
        self.args.category
    }

    pub fn lang(&self) -> &str {
        &self.args.lang
    }

    pub fn country(&self) -> Option<&str> {
        self.args.country.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.args.name
    }

    pub fn doc(&self) -> &str {
        &self.args.doc
    }

    pub fn args(&self) -> &TaskArgs {
        &self.args
    }

    pub fn context(&self) -> Option<&ContextSpec> {
        self.context.as_ref()
    }

    /// Run the task over one chunk of text.
    ///
    /// With a context requirement the raw matches go through a
    /// [`ContextFilter`]; otherwise they are returned as found.
    pub fn invoke<'a>(&'a self, text: &'a str, chunk_id: &'a str) -> Result<EntityIter<'a>> {
        match self.context {
            Some(_) => self.invoke_with_context(text, chunk_id),
            None => self.find(text, chunk_id),
        }
    }

    /// The raw finder filtered by the context requirement, if any. The
    /// chunk text is normalized at most once per call.
    pub fn invoke_with_context<'a>(&'a self, text: &'a str, chunk_id: &'a str) -> Result<EntityIter<'a>> {
        let raw = self.find(text, chunk_id)?;
        Ok(match &self.context {
            Some(spec) => Box::new(ContextFilter::new(raw, text, spec)),
            None => raw,
        })
    }

    /// The raw finder, ignoring any context requirement.
    pub fn find<'a>(&'a self, text: &'a str, chunk_id: &'a str) -> Result<EntityIter<'a>> {
        match &self.kind {
            TaskKind::Pattern(p) => Ok(p.find(&self.args, text, chunk_id)),
            TaskKind::Callable(c) => Ok(c.find(&self.args, text, chunk_id)),
            TaskKind::Structured(s) => s.find(text, chunk_id),
        }
    }
}
