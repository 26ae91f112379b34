use serde::{Deserialize, Serialize};

use crate::category::PiiCategory;
use crate::definition::{DefinitionStore, DetectorDefinition, COUNTRY_ALL, COUNTRY_ANY, LANG_ANY};

/// A category that could not be resolved for a language/country request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionMiss {
    pub category: PiiCategory,
    pub lang: String,
    pub countries: Option<Vec<String>>,
}

impl std::fmt::Display for ResolutionMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot find any pii task for {}, {}", self.category, self.lang)?;
        if let Some(countries) = &self.countries {
            write!(f, ", [{}]", countries.join(", "))?;
        }
        Ok(())
    }
}

/// Selects the definitions that apply to a request, by specificity.
pub struct Resolver<'s> {
    store: &'s DefinitionStore,
}

impl<'s> Resolver<'s> {
    pub fn new(store: &'s DefinitionStore) -> Self {
        Self { store }
    }

    /// Requested countries, with a leading `all`/`*` expanded to every
    /// country known for `lang`. The any-country key is dropped and
    /// duplicates are removed, keeping request order. Codes are compared
    /// lowercased.
    pub fn expand_countries(&self, lang: &str, countries: Option<&[String]>) -> Vec<String> {
        let requested: Vec<String> = match countries {
            None => return Vec::new(),
            Some(list) => list.iter().map(|c| normalize_code(c)).collect(),
        };
        let requested = match requested.first().map(String::as_str) {
            Some(COUNTRY_ALL) | Some(COUNTRY_ANY) => self.store.countries(&normalize_code(lang)),
            _ => requested,
        };
        let mut out: Vec<String> = Vec::with_capacity(requested.len());
        for c in requested {
            if c != COUNTRY_ANY && c != COUNTRY_ALL && !out.contains(&c) {
                out.push(c);
            }
        }
        out
    }

    /// Every definition for a request: language-agnostic first, then
    /// country-agnostic for `lang`, then each requested country in order.
    pub fn resolve_all(&self, lang: &str, countries: Option<&[String]>) -> Vec<&'s DetectorDefinition> {
        let lang = normalize_code(lang);
        let lang = lang.as_str();
        let mut out: Vec<&'s DetectorDefinition> = Vec::new();
        if let Some(any) = self.store.cell(LANG_ANY, COUNTRY_ANY) {
            out.extend(any.values().flatten());
        }
        if lang == LANG_ANY {
            return out;
        }
        if let Some(cell) = self.store.cell(lang, COUNTRY_ANY) {
            out.extend(cell.values().flatten());
        }
        for country in self.expand_countries(lang, countries) {
            if let Some(cell) = self.store.cell(lang, &country) {
                out.extend(cell.values().flatten());
            }
        }
        out
    }

    /// Definitions for one category, most specific first: each requested
    /// country, then country-agnostic, then language-agnostic. All tiers
    /// that match are returned. A miss is logged and yields nothing.
    pub fn resolve_one(
        &self,
        category: PiiCategory,
        lang: &str,
        countries: Option<&[String]>,
    ) -> Vec<&'s DetectorDefinition> {
        let lang = normalize_code(lang);
        let lang = lang.as_str();
        let mut out: Vec<&'s DetectorDefinition> = Vec::new();
        if lang != LANG_ANY {
            for country in self.expand_countries(lang, countries) {
                out.extend(self.store.lookup(lang, &country, category));
            }
            out.extend(self.store.lookup(lang, COUNTRY_ANY, category));
        }
        out.extend(self.store.lookup(LANG_ANY, COUNTRY_ANY, category));

        if out.is_empty() {
            let miss = ResolutionMiss {
                category,
                lang: lang.to_string(),
                countries: countries.map(<[String]>::to_vec),
            };
            tracing::warn!("{}", miss);
        }
        out
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}
