//! Definition batch files: parsing, loading into finders and stores.

use std::path::{Path, PathBuf};

use pii_extract::definition::read_taskfile;
use pii_extract::{
    DefinitionStore, FinderOptions, PiiCategory, PiiError, PiiFinder, TaskSelection, TextDocument,
};

fn data(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

#[test]
fn legacy_field_names_are_accepted() {
    let batch = read_taskfile(&data("taskfile.json")).unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].category.as_deref(), Some("CREDIT_CARD"));
    assert_eq!(batch[0].implementation_kind.as_deref(), Some("regex"));
    assert_eq!(batch[0].language.as_deref(), Some("en"));
    assert_eq!(batch[1].implementation_payload.as_deref(), Some("bitcoin_address"));
}

#[test]
fn yaml_taskfile_with_context() {
    let batch = read_taskfile(&data("taskfile-fr.yaml")).unwrap();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].country.as_deref(), Some("fr"));
    assert!(batch[0].context.is_some());
}

#[test]
fn missing_taskfile_is_invalid_definition() {
    let err = read_taskfile(&data("does-not-exist.json")).unwrap_err();
    match err {
        PiiError::InvalidDefinition { reason } => assert!(reason.contains("does-not-exist.json")),
        other => panic!("expected InvalidDefinition, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Finder
// ---------------------------------------------------------------------------

#[test]
fn taskfile_tasks_process_document() {
    let store = DefinitionStore::builtin();
    let mut finder = PiiFinder::new(&store, FinderOptions::new("en")).unwrap();
    finder.add_taskfile(&data("taskfile.json")).unwrap();
    assert_eq!(finder.tasks().len(), 2);

    let doc = TextDocument::load(&data("minidoc.yaml")).unwrap();
    let result = finder.process(&doc).unwrap();

    assert_eq!(result.doc_id.as_deref(), Some("minidoc"));
    assert_eq!(result.len(), 2);

    let card = &result.entities()[0];
    assert_eq!(card.category, PiiCategory::CreditCard);
    assert_eq!(card.value, "4111-1111-1111-1111");
    assert_eq!(card.chunk_id, "1");
    assert_eq!(card.name, "dashed credit card");
    let chunk = &doc.chunks[0].text;
    assert_eq!(&chunk[card.pos..card.end()], card.value);

    let wallet = &result.entities()[1];
    assert_eq!(wallet.category, PiiCategory::BitcoinAddress);
    assert_eq!(wallet.value, "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa");
    assert_eq!(wallet.chunk_id, "2");

    let stats: Vec<_> = finder.stats().iter().map(|(k, v)| (k.as_str(), *v)).collect();
    assert_eq!(
        stats,
        vec![("BITCOIN_ADDRESS", 1), ("CREDIT_CARD", 1), ("calls", 1)]
    );
}

#[test]
fn taskfile_task_info() {
    let mut finder = PiiFinder::new(&DefinitionStore::builtin(), FinderOptions::new("en")).unwrap();
    finder.add_taskfile(&data("taskfile.json")).unwrap();
    let info = finder.task_info();
    assert_eq!(info.len(), 2);
    assert_eq!(
        info[&(PiiCategory::CreditCard, None)],
        vec![(
            "dashed credit card".to_string(),
            "Credit card number written in dashed groups of four".to_string()
        )]
    );
}

#[test]
fn taskfile_with_unknown_callable_adds_nothing() {
    let mut finder = PiiFinder::new(&DefinitionStore::builtin(), FinderOptions::new("en")).unwrap();
    let err = finder.add_taskfile(&data("taskfile-error.json")).unwrap_err();
    match err {
        PiiError::InvalidDefinition { reason } => {
            assert!(reason.contains("record #1"), "{reason}");
            assert!(reason.contains("no_such_function"), "{reason}");
        }
        other => panic!("expected InvalidDefinition, got {other:?}"),
    }
    assert!(finder.tasks().is_empty());
}

#[test]
fn taskfile_language_must_match_finder() {
    let mut finder = PiiFinder::new(&DefinitionStore::builtin(), FinderOptions::new("fr")).unwrap();
    let err = finder.add_taskfile(&data("taskfile.json")).unwrap_err();
    assert!(matches!(err, PiiError::InvalidArgument { .. }), "{err}");
}

#[test]
fn country_taskfile_with_context() {
    let opts = FinderOptions {
        lang: "fr".into(),
        countries: Some(vec!["fr".into()]),
        tasks: TaskSelection::None,
    };
    let mut finder = PiiFinder::new(&DefinitionStore::builtin(), opts).unwrap();
    finder.add_taskfile(&data("taskfile-fr.yaml")).unwrap();

    let accented = TextDocument::new(None).with_chunk("1", "Numéro de sécurité sociale : 1850712345678");
    let miss = TextDocument::new(None).with_chunk("1", "Commande 1850712345678 expédiée");
    let insee = TextDocument::new(None).with_chunk("1", "INSEE 1850712345678");

    // Accents are not folded, so the first text has no keyword.
    assert!(finder.process(&accented).unwrap().is_empty());
    assert!(finder.process(&miss).unwrap().is_empty());
    let found = finder.process(&insee).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found.entities()[0].country.as_deref(), Some("fr"));
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[test]
fn taskfile_merged_into_store_is_resolvable() {
    let mut store = DefinitionStore::builtin();
    let before = store.len();
    let batch = read_taskfile(&data("taskfile-fr.yaml")).unwrap();
    assert_eq!(store.merge_batch(&batch).unwrap(), 1);
    assert_eq!(store.len(), before + 1);
    assert_eq!(store.countries("fr"), vec!["fr".to_string()]);

    let finder = PiiFinder::new(
        &store,
        FinderOptions::new("fr")
            .with_countries(["fr"])
            .with_tasks(vec![PiiCategory::GovId]),
    )
    .unwrap();
    assert_eq!(finder.tasks().len(), 1);
    assert_eq!(finder.tasks()[0].name(), "numero de securite sociale");
    assert!(finder.warnings().is_empty());
}
