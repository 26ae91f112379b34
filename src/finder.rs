use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::category::PiiCategory;
use crate::definition::{
    definitions_from_batch, read_taskfile, DefinitionStore, DetectorDefinition, TaskSpec,
    COUNTRY_ALL, COUNTRY_ANY, LANG_ANY,
};
use crate::document::SourceDocument;
use crate::entity::PiiCollection;
use crate::error::{PiiError, Result};
use crate::resolver::{ResolutionMiss, Resolver};
use crate::task::{build_task, Task, TaskRegistry};

/// Counter key for the number of processed documents.
pub const CALLS: &str = "calls";

/// Which detectors a finder is built with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TaskSelection {
    /// No resolved tasks; tasks can still be added afterwards.
    #[default]
    None,
    /// Every definition that applies to the language/countries.
    All,
    /// The most specific definitions for each listed category.
    Categories(Vec<PiiCategory>),
}

/// Construction parameters of a [`PiiFinder`].
#[derive(Debug, Clone)]
pub struct FinderOptions {
    pub lang: String,
    pub countries: Option<Vec<String>>,
    pub tasks: TaskSelection,
}

impl FinderOptions {
    pub fn new(lang: &str) -> Self {
        Self {
            lang: lang.to_string(),
            countries: None,
            tasks: TaskSelection::None,
        }
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = Some(countries.into_iter().map(Into::into).collect());
        self
    }

    pub fn all_tasks(mut self) -> Self {
        self.tasks = TaskSelection::All;
        self
    }

    pub fn with_tasks(mut self, categories: Vec<PiiCategory>) -> Self {
        self.tasks = TaskSelection::Categories(categories);
        self
    }
}

/// A processing session: a frozen, category-ordered task list plus
/// counters that accumulate over every processed document.
pub struct PiiFinder {
    lang: String,
    countries: Option<Vec<String>>,
    tasks: Vec<Task>,
    stats: BTreeMap<String, u64>,
    warnings: Vec<ResolutionMiss>,
    registry: Arc<TaskRegistry>,
}

impl std::fmt::Debug for PiiFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiiFinder")
            .field("lang", &self.lang)
            .field("countries", &self.countries)
            .field("tasks", &self.tasks.iter().map(|t| t.to_string()).collect::<Vec<_>>())
            .field("stats", &self.stats)
            .finish()
    }
}

impl std::fmt::Display for PiiFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<PiiFinder (tasks: {})>", self.tasks.len())
    }
}

impl PiiFinder {
    /// Resolve and build the tasks for `options` from `store`.
    ///
    /// Any definition that fails to build aborts construction. Categories
    /// with no definition are logged and kept in [`PiiFinder::warnings`].
    pub fn new(store: &DefinitionStore, options: FinderOptions) -> Result<Self> {
        let lang = options.lang.trim().to_lowercase();
        if lang.is_empty() {
            return Err(PiiError::InvalidArgument {
                reason: "empty language".into(),
            });
        }
        let countries = options.countries.map(|list| {
            list.iter()
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect::<Vec<_>>()
        });

        let resolver = Resolver::new(store);
        let mut warnings = Vec::new();
        let definitions: Vec<&DetectorDefinition> = match &options.tasks {
            TaskSelection::None => Vec::new(),
            TaskSelection::All => resolver.resolve_all(&lang, countries.as_deref()),
            TaskSelection::Categories(categories) => {
                let mut defs = Vec::new();
                for &category in categories {
                    let found = resolver.resolve_one(category, &lang, countries.as_deref());
                    if found.is_empty() {
                        warnings.push(ResolutionMiss {
                            category,
                            lang: lang.clone(),
                            countries: countries.clone(),
                        });
                    }
                    defs.extend(found);
                }
                defs
            }
        };

        let mut tasks = definitions
            .into_iter()
            .map(build_task)
            .collect::<Result<Vec<_>>>()?;
        tasks.sort_by_key(|t| t.category());
        tracing::debug!("finder for '{}' built with {} task(s)", lang, tasks.len());

        Ok(Self {
            lang,
            countries,
            tasks,
            stats: BTreeMap::new(),
            warnings,
            registry: store.registry_handle(),
        })
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn countries(&self) -> Option<&[String]> {
        self.countries.as_deref()
    }

    /// Tasks in execution order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Categories requested at construction for which nothing was found.
    pub fn warnings(&self) -> &[ResolutionMiss] {
        &self.warnings
    }

    /// Add tasks from a raw definition batch. The batch is validated against
    /// this finder's language and countries and built in full before any
    /// task is added.
    pub fn add_tasks(&mut self, batch: &[TaskSpec]) -> Result<()> {
        let defs = definitions_from_batch(batch, &self.registry)?;
        self.add_definitions(&defs)
    }

    /// Add tasks from already validated definitions.
    pub fn add_definitions(&mut self, defs: &[DetectorDefinition]) -> Result<()> {
        let mut built = Vec::with_capacity(defs.len());
        for def in defs {
            self.check_compatible(def)?;
            built.push(build_task(def)?);
        }
        self.tasks.extend(built);
        self.tasks.sort_by_key(|t| t.category());
        Ok(())
    }

    /// Add the tasks of one definition batch file.
    pub fn add_taskfile(&mut self, path: &Path) -> Result<()> {
        let batch = read_taskfile(path)?;
        self.add_tasks(&batch)
    }

    fn check_compatible(&self, def: &DetectorDefinition) -> Result<()> {
        if def.lang != LANG_ANY && def.lang != self.lang {
            return Err(PiiError::InvalidArgument {
                reason: format!(
                    "task '{}' has language '{}', finder language is '{}'",
                    def.name, def.lang, self.lang
                ),
            });
        }
        if let Some(country) = &def.country {
            let accepted = self.countries.as_ref().is_some_and(|list| {
                list.iter()
                    .any(|c| c == country || c == COUNTRY_ALL || c == COUNTRY_ANY)
            });
            if !accepted {
                return Err(PiiError::InvalidArgument {
                    reason: format!(
                        "task '{}' is for country '{}', not among the finder countries {:?}",
                        def.name, country, self.countries
                    ),
                });
            }
        }
        Ok(())
    }

    /// Installed tasks grouped by (category, country), each as
    /// `(name, doc)` in execution order.
    pub fn task_info(&self) -> BTreeMap<(PiiCategory, Option<String>), Vec<(String, String)>> {
        let mut info: BTreeMap<_, Vec<_>> = BTreeMap::new();
        for task in &self.tasks {
            info.entry((task.category(), task.country().map(String::from)))
                .or_default()
                .push((task.name().to_string(), task.doc().to_string()));
        }
        info
    }

    /// Run every task over every chunk of `doc`: chunks in document order,
    /// tasks in category order within each chunk. A failing task aborts the
    /// call and leaves the statistics as they were.
    pub fn process<D: SourceDocument + ?Sized>(&mut self, doc: &D) -> Result<PiiCollection> {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        let mut result = PiiCollection::new(&self.lang, doc.id());
        for chunk in doc.chunks() {
            for task in &self.tasks {
                for entity in task.invoke(chunk.text, chunk.id)? {
                    *counts.entry(entity.category.name().to_string()).or_insert(0) += 1;
                    result.add(entity);
                }
            }
        }

        // Counters only move for documents that were fully processed.
        *self.stats.entry(CALLS.to_string()).or_insert(0) += 1;
        for (name, n) in counts {
            *self.stats.entry(name).or_insert(0) += n;
        }
        Ok(result)
    }

    /// Counters: `calls` plus one entry per detected category name.
    pub fn stats(&self) -> &BTreeMap<String, u64> {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.clear();
    }
}
