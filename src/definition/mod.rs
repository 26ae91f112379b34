pub mod loader;
pub mod store;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::category::PiiCategory;
use crate::error::{PiiError, Result};
use crate::task::{DetectorFn, Kwargs, StructuredCtor, TaskRegistry};

pub use loader::read_taskfile;
pub use store::{DefinitionProvider, DefinitionStore};

/// Language key for definitions that apply to every language.
pub const LANG_ANY: &str = "*";
/// Country key for definitions that apply to every country of a language.
pub const COUNTRY_ANY: &str = "*";
/// Request value that expands to every known country of a language.
pub const COUNTRY_ALL: &str = "all";

/// The closed set of detector implementation styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImplementationKind {
    Pattern,
    Callable,
    Structured,
}

impl std::fmt::Display for ImplementationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImplementationKind::Pattern => write!(f, "pattern"),
            ImplementationKind::Callable => write!(f, "callable"),
            ImplementationKind::Structured => write!(f, "structured"),
        }
    }
}

impl std::str::FromStr for ImplementationKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pattern" | "regex" | "re" => Ok(ImplementationKind::Pattern),
            "callable" => Ok(ImplementationKind::Callable),
            "structured" | "PiiTask" => Ok(ImplementationKind::Structured),
            _ => Err(format!("unknown implementation kind: {s}")),
        }
    }
}

/// The implementation payload of a definition, one variant per kind.
#[derive(Clone)]
pub enum Implementation {
    Pattern(String),
    Callable { name: String, call: DetectorFn },
    Structured { name: String, ctor: StructuredCtor },
}

impl Implementation {
    pub fn kind(&self) -> ImplementationKind {
        match self {
            Implementation::Pattern(_) => ImplementationKind::Pattern,
            Implementation::Callable { .. } => ImplementationKind::Callable,
            Implementation::Structured { .. } => ImplementationKind::Structured,
        }
    }

    /// The pattern text or the registry name of the callable/structured type.
    pub fn payload(&self) -> &str {
        match self {
            Implementation::Pattern(p) => p,
            Implementation::Callable { name, .. } | Implementation::Structured { name, .. } => name,
        }
    }
}

impl std::fmt::Debug for Implementation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:?})", self.kind(), self.payload())
    }
}

/// Static description of one detection capability.
#[derive(Debug, Clone)]
pub struct DetectorDefinition {
    pub category: PiiCategory,
    pub implementation: Implementation,
    pub lang: String,
    /// `None` applies to every country of `lang`.
    pub country: Option<String>,
    pub name: String,
    pub doc: String,
    pub kwargs: Kwargs,
    /// Raw context specification, parsed when the task is built.
    pub context: Option<Value>,
}

impl DetectorDefinition {
    pub fn new(category: PiiCategory, lang: &str, implementation: Implementation) -> Self {
        Self {
            category,
            implementation,
            lang: lang.to_lowercase(),
            country: None,
            name: default_name(category),
            doc: category.name().to_string(),
            kwargs: Kwargs::new(),
            context: None,
        }
    }

    pub fn pattern(category: PiiCategory, lang: &str, pattern: &str) -> Self {
        Self::new(category, lang, Implementation::Pattern(pattern.to_string()))
    }

    pub fn callable(category: PiiCategory, lang: &str, name: &str, call: DetectorFn) -> Self {
        Self::new(
            category,
            lang,
            Implementation::Callable {
                name: name.to_string(),
                call,
            },
        )
    }

    pub fn structured(category: PiiCategory, lang: &str, name: &str, ctor: StructuredCtor) -> Self {
        Self::new(
            category,
            lang,
            Implementation::Structured {
                name: name.to_string(),
                ctor,
            },
        )
    }

    pub fn with_country(mut self, country: &str) -> Self {
        self.country = normalize_country(Some(country));
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_doc(mut self, doc: &str) -> Self {
        self.doc = doc.to_string();
        self
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_kwargs(mut self, kwargs: Kwargs) -> Self {
        self.kwargs = kwargs;
        self
    }

    /// Store key for the country: the country code or [`COUNTRY_ANY`].
    pub fn country_key(&self) -> &str {
        self.country.as_deref().unwrap_or(COUNTRY_ANY)
    }
}

fn default_name(category: PiiCategory) -> String {
    category.name().to_lowercase().replace('_', " ")
}

fn normalize_country(country: Option<&str>) -> Option<String> {
    country
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty() && c != COUNTRY_ANY)
}

/// One raw record of a definition batch, as read from a task file or
/// supplied by a caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskSpec {
    #[serde(default, alias = "pii", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub implementation_kind: Option<String>,
    #[serde(default, alias = "task", skip_serializing_if = "Option::is_none")]
    pub implementation_payload: Option<String>,
    #[serde(default, alias = "lang", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kwargs: Option<Kwargs>,
}

impl TaskSpec {
    /// Validate the record and resolve its payload against `registry`.
    /// `index` identifies the record in error messages.
    pub fn to_definition(&self, index: usize, registry: &TaskRegistry) -> Result<DetectorDefinition> {
        let category: PiiCategory = required(index, "category", &self.category)?
            .parse()
            .map_err(|e: String| PiiError::definition(index, "category", e))?;
        let kind_name = required(index, "implementation_kind", &self.implementation_kind)?;
        let payload = required(index, "implementation_payload", &self.implementation_payload)?;
        let lang = required(index, "language", &self.language)?;

        let kind: ImplementationKind =
            kind_name.parse().map_err(|_| PiiError::InvalidTaskType {
                category: category.name().to_string(),
                kind: kind_name.to_string(),
            })?;
        let implementation = match kind {
            ImplementationKind::Pattern => Implementation::Pattern(payload.to_string()),
            ImplementationKind::Callable => Implementation::Callable {
                name: payload.to_string(),
                call: registry.callable(payload).ok_or_else(|| {
                    PiiError::definition(
                        index,
                        "implementation_payload",
                        format!("unknown callable '{payload}'"),
                    )
                })?,
            },
            ImplementationKind::Structured => Implementation::Structured {
                name: payload.to_string(),
                ctor: registry.structured(payload).ok_or_else(|| {
                    PiiError::definition(
                        index,
                        "implementation_payload",
                        format!("unknown structured task '{payload}'"),
                    )
                })?,
            },
        };

        let mut def = DetectorDefinition::new(category, lang, implementation);
        def.country = normalize_country(self.country.as_deref());
        if def.lang == LANG_ANY && def.country.is_some() {
            return Err(PiiError::definition(
                index,
                "country",
                "a definition for any language cannot name a country",
            ));
        }
        if let Some(name) = &self.name {
            def.name = name.clone();
        }
        if let Some(doc) = &self.doc {
            def.doc = doc.clone();
        }
        def.context = self.context.clone();
        def.kwargs = self.kwargs.clone().unwrap_or_default();
        Ok(def)
    }
}

fn required<'a>(index: usize, field: &str, value: &'a Option<String>) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(PiiError::definition(index, field, "missing required field")),
    }
}

/// Convert a whole batch; the first invalid record aborts the conversion.
pub fn definitions_from_batch(
    batch: &[TaskSpec],
    registry: &TaskRegistry,
) -> Result<Vec<DetectorDefinition>> {
    batch
        .iter()
        .enumerate()
        .map(|(i, spec)| spec.to_definition(i, registry))
        .collect()
}
