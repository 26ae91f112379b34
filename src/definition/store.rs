use std::collections::BTreeMap;
use std::sync::Arc;

use crate::category::PiiCategory;
use crate::error::{PiiError, Result};
use crate::task::TaskRegistry;

use super::{definitions_from_batch, DetectorDefinition, TaskSpec, COUNTRY_ANY, LANG_ANY};

/// Definitions of one (language, country) cell, by category. Several
/// definitions may share a category; they keep insertion order.
pub type CategoryMap = BTreeMap<PiiCategory, Vec<DetectorDefinition>>;
/// Country code (or [`COUNTRY_ANY`]) to its definitions.
pub type CountryMap = BTreeMap<String, CategoryMap>;

/// A source of detector definitions, such as an installed detector package.
///
/// Discovery of providers is up to the caller; the store only consumes them.
pub trait DefinitionProvider {
    /// Name of this provider (for logging).
    fn name(&self) -> &str;

    /// Register the callables and structured task types the provider's
    /// definitions refer to.
    fn register(&self, _registry: &mut TaskRegistry) {}

    /// The provider's definitions.
    fn definitions(&self, registry: &TaskRegistry) -> Result<Vec<DetectorDefinition>>;
}

/// Indexed detector definitions, keyed language → country → category.
///
/// A store is an explicit value: merging more definitions into one store
/// never affects another, so finders built from different stores are
/// independent.
#[derive(Debug, Clone, Default)]
pub struct DefinitionStore {
    registry: Arc<TaskRegistry>,
    langs: BTreeMap<String, CountryMap>,
}

impl DefinitionStore {
    /// An empty store whose batches resolve names against `registry`.
    pub fn new(registry: TaskRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            langs: BTreeMap::new(),
        }
    }

    /// A store holding the built-in detectors.
    pub fn builtin() -> Self {
        let mut registry = TaskRegistry::new();
        crate::detectors::register(&mut registry);
        let mut store = Self::new(registry);
        for def in crate::detectors::definitions() {
            store.insert(def);
        }
        store
    }

    /// The full index: language → country → category → definitions.
    pub fn get_definitions(&self) -> &BTreeMap<String, CountryMap> {
        &self.langs
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub(crate) fn registry_handle(&self) -> Arc<TaskRegistry> {
        Arc::clone(&self.registry)
    }

    /// Mutable access to this store's registry (copied on write if shared).
    pub fn registry_mut(&mut self) -> &mut TaskRegistry {
        Arc::make_mut(&mut self.registry)
    }

    pub fn insert(&mut self, def: DetectorDefinition) {
        self.langs
            .entry(def.lang.clone())
            .or_default()
            .entry(def.country_key().to_string())
            .or_default()
            .entry(def.category)
            .or_default()
            .push(def);
    }

    /// Validate and merge a definition batch. Nothing is merged if any
    /// record is invalid. Returns the number of definitions added.
    pub fn merge_batch(&mut self, batch: &[TaskSpec]) -> Result<usize> {
        let defs = definitions_from_batch(batch, &self.registry)?;
        let n = defs.len();
        for def in defs {
            self.insert(def);
        }
        Ok(n)
    }

    /// Merge the definitions of a provider, after letting it register its
    /// callables.
    pub fn add_provider(&mut self, provider: &dyn DefinitionProvider) -> Result<usize> {
        provider.register(self.registry_mut());
        let defs = provider.definitions(&self.registry)?;
        if let Some(def) = defs.iter().find(|d| d.lang == LANG_ANY && d.country.is_some()) {
            return Err(PiiError::InvalidDefinition {
                reason: format!(
                    "provider '{}': {} for any language cannot name country '{}'",
                    provider.name(),
                    def.category,
                    def.country_key()
                ),
            });
        }
        let n = defs.len();
        for def in defs {
            self.insert(def);
        }
        tracing::debug!("provider '{}' added {} definition(s)", provider.name(), n);
        Ok(n)
    }

    /// Languages with at least one definition, excluding [`LANG_ANY`].
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.langs
            .keys()
            .map(String::as_str)
            .filter(|l| *l != LANG_ANY)
    }

    /// Countries with specific definitions for `lang`, excluding
    /// [`COUNTRY_ANY`].
    pub fn countries(&self, lang: &str) -> Vec<String> {
        self.langs
            .get(lang)
            .map(|cm| {
                cm.keys()
                    .filter(|c| c.as_str() != COUNTRY_ANY)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Definitions of one (language, country) cell.
    pub fn cell(&self, lang: &str, country: &str) -> Option<&CategoryMap> {
        self.langs.get(lang).and_then(|cm| cm.get(country))
    }

    /// Definitions for an exact (language, country, category) key.
    pub fn lookup(&self, lang: &str, country: &str, category: PiiCategory) -> &[DetectorDefinition] {
        self.cell(lang, country)
            .and_then(|cat| cat.get(&category))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of definitions.
    pub fn len(&self) -> usize {
        self.langs
            .values()
            .flat_map(|cm| cm.values())
            .flat_map(|cat| cat.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Kwargs;

    fn record(category: &str, lang: &str, country: Option<&str>) -> TaskSpec {
        TaskSpec {
            category: Some(category.into()),
            implementation_kind: Some("pattern".into()),
            implementation_payload: Some(r"\d+".into()),
            language: Some(lang.into()),
            country: country.map(String::from),
            ..Default::default()
        }
    }

    struct Extra;

    impl DefinitionProvider for Extra {
        fn name(&self) -> &str {
            "extra"
        }

        fn register(&self, registry: &mut TaskRegistry) {
            registry.register_callable("always_x", |_: &str, _: &Kwargs| vec!["x".into()]);
        }

        fn definitions(&self, registry: &TaskRegistry) -> Result<Vec<DetectorDefinition>> {
            let batch = vec![TaskSpec {
                category: Some("OTHER".into()),
                implementation_kind: Some("callable".into()),
                implementation_payload: Some("always_x".into()),
                language: Some("fr".into()),
                ..Default::default()
            }];
            definitions_from_batch(&batch, registry)
        }
    }

    struct AnyLangWithCountry;

    impl DefinitionProvider for AnyLangWithCountry {
        fn name(&self) -> &str {
            "misfiled"
        }

        fn definitions(&self, _registry: &TaskRegistry) -> Result<Vec<DetectorDefinition>> {
            Ok(vec![
                DetectorDefinition::pattern(PiiCategory::TaxId, "en", r"\d+"),
                DetectorDefinition::pattern(PiiCategory::GovId, LANG_ANY, r"\d+").with_country("us"),
            ])
        }
    }

    #[test]
    fn test_insert_keys_by_lang_country_category() {
        let mut store = DefinitionStore::default();
        store.merge_batch(&[record("GOV_ID", "en", Some("US")), record("GOV_ID", "en", None)])
            .unwrap();
        assert_eq!(store.lookup("en", "us", PiiCategory::GovId).len(), 1);
        assert_eq!(store.lookup("en", COUNTRY_ANY, PiiCategory::GovId).len(), 1);
        assert_eq!(store.countries("en"), vec!["us".to_string()]);
    }

    #[test]
    fn test_same_category_definitions_are_kept() {
        let mut store = DefinitionStore::default();
        store.merge_batch(&[record("GOV_ID", "en", None), record("GOV_ID", "en", None)])
            .unwrap();
        assert_eq!(store.lookup("en", COUNTRY_ANY, PiiCategory::GovId).len(), 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_bad_batch_merges_nothing() {
        let mut store = DefinitionStore::default();
        let err = store
            .merge_batch(&[record("GOV_ID", "en", None), record("NOPE", "en", None)])
            .unwrap_err();
        assert!(matches!(err, PiiError::InvalidDefinition { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_any_language_country_record_merges_nothing() {
        let mut store = DefinitionStore::default();
        let err = store
            .merge_batch(&[record("EMAIL_ADDRESS", "*", None), record("GOV_ID", "*", Some("us"))])
            .unwrap_err();
        match err {
            PiiError::InvalidDefinition { reason } => {
                assert!(reason.contains("record #1"), "{reason}");
                assert!(reason.contains("country"), "{reason}");
            }
            other => panic!("expected InvalidDefinition, got {other:?}"),
        }
        assert!(store.is_empty());
        assert!(store.cell(LANG_ANY, "us").is_none());
    }

    #[test]
    fn test_provider_any_language_country_rejected() {
        let mut store = DefinitionStore::default();
        let err = store.add_provider(&AnyLangWithCountry).unwrap_err();
        assert!(err.to_string().contains("misfiled"), "{err}");
        assert!(store.is_empty());
    }

    #[test]
    fn test_merge_does_not_touch_other_stores() {
        let base = DefinitionStore::builtin();
        let mut session = base.clone();
        session.merge_batch(&[record("TAX_ID", "en", None)]).unwrap();
        assert_eq!(session.len(), base.len() + 1);
        assert!(base.lookup("en", COUNTRY_ANY, PiiCategory::TaxId).is_empty());
    }

    #[test]
    fn test_provider_registers_and_adds() {
        let mut store = DefinitionStore::default();
        assert_eq!(store.add_provider(&Extra).unwrap(), 1);
        assert!(store.registry().callable("always_x").is_some());
        assert_eq!(store.lookup("fr", COUNTRY_ANY, PiiCategory::Other).len(), 1);
        assert_eq!(store.languages().collect::<Vec<_>>(), vec!["fr"]);
    }
}
