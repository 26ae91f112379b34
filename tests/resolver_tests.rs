//! Resolution of the built-in definitions by language and country.

use pii_extract::definition::{DetectorDefinition, LANG_ANY};
use pii_extract::resolver::Resolver;
use pii_extract::{DefinitionStore, PiiCategory};

fn names(defs: &[&DetectorDefinition]) -> Vec<String> {
    defs.iter().map(|d| d.name.clone()).collect()
}

fn list(countries: &[&str]) -> Vec<String> {
    countries.iter().map(|c| c.to_string()).collect()
}

#[test]
fn all_countries_covers_each_single_country() {
    let store = DefinitionStore::builtin();
    let resolver = Resolver::new(&store);
    let everything = names(&resolver.resolve_all("en", Some(&list(&["all"]))));

    for country in store.countries("en") {
        let single = names(&resolver.resolve_all("en", Some(&[country.clone()])));
        for name in &single {
            assert!(everything.contains(name), "{country}: {name} missing from 'all'");
        }
    }
    assert!(everything.contains(&"us social security number".to_string()));
    assert!(everything.contains(&"canadian social insurance number".to_string()));
}

#[test]
fn language_agnostic_definitions_always_included() {
    let store = DefinitionStore::builtin();
    let resolver = Resolver::new(&store);
    let any: Vec<String> = store
        .get_definitions()
        .get(LANG_ANY)
        .into_iter()
        .flat_map(|countries| countries.values())
        .flat_map(|cats| cats.values().flatten())
        .map(|d| d.name.clone())
        .collect();
    assert!(!any.is_empty());

    for lang in ["en", "es", "xx"] {
        let got = names(&resolver.resolve_all(lang, None));
        assert_eq!(got[..any.len()], any[..], "language '{lang}'");
    }
}

#[test]
fn every_stored_category_resolves() {
    let store = DefinitionStore::builtin();
    let resolver = Resolver::new(&store);
    for lang in store.languages() {
        let countries = store.countries(lang);
        for (country, cats) in &store.get_definitions()[lang] {
            for category in cats.keys() {
                let found = resolver.resolve_one(*category, lang, Some(&countries));
                assert!(
                    !found.is_empty(),
                    "{category} not resolvable for {lang}/{country}"
                );
            }
        }
    }
}

#[test]
fn country_specific_beats_nothing_but_keeps_general() {
    let store = DefinitionStore::builtin();
    let resolver = Resolver::new(&store);

    let es = resolver.resolve_one(PiiCategory::GovId, "es", Some(&list(&["es"])));
    assert_eq!(names(&es), vec!["spanish dni"]);

    let none = resolver.resolve_one(PiiCategory::GovId, "es", None);
    assert!(none.is_empty());

    let card = resolver.resolve_one(PiiCategory::CreditCard, "es", Some(&list(&["es"])));
    assert_eq!(names(&card), vec!["credit card"]);
}
