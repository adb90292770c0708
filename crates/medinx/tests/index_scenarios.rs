use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use medinx::store::SidecarStore;
use medinx::timestamp::parse_timestamp;
use medinx::{Document, MedinxError, MetadataIndex, Value, Variant};
use tempfile::TempDir;

/// Creates `path` (empty) under `root` with its side-car holding `sidecar`.
fn add_file(root: &Path, path: &str, sidecar: Option<&str>) {
    let file = root.join(path);
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(&file, vec![0u8; 512]).unwrap();
    if let Some(raw) = sidecar {
        fs::write(root.join(format!("{}.mdf", path)), raw).unwrap();
    }
}

fn library() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    add_file(
        root,
        "research/movies/interstellar_wormhole_james.pdf",
        Some(
            r##"{
                "author": ["olivier_james", "eugenie_von_tunzelmann", "paul_franklin"],
                "journal": ["american_journal_of_physics"],
                "publication_date": ["#2015-03"],
                "reviewed": [false],
                "impact": [5.6],
                "doc_type": ["scientific_article"],
                "keyword": ["physics", "einstein_ring", "relativity", "cgi"]
            }"##,
        ),
    );
    add_file(
        root,
        "research/movies/goofiest_movies_of_all_times.pdf",
        Some(
            r#"{
                "author": ["george_abitbol", "relativity", "jean-philippe_herbien"],
                "doc_type": ["scientific_article"],
                "publication_year": [2005]
            }"#,
        ),
    );
    add_file(
        root,
        "research/music/goofiest_music_of_all_times.pdf",
        Some(r#"{"author": ["jean-philippe_herbien"], "publication_year": [2009]}"#),
    );
    add_file(
        root,
        "administration/condo/meetings/annual_assembly_2016_08_27.docx",
        Some(r##"{"date": ["#2016-08-27T20:00"]}"##),
    );
    add_file(
        root,
        "administration/condo/contracts/gaz_2014.doc",
        Some(r##"{"doc_type": ["contract"], "date": ["#2014-01-10"]}"##),
    );
    add_file(
        root,
        "administration/condo/contracts/letter_phone_cie.doc",
        Some(r##"{"author": ["me"], "date": ["#2016-09-10"]}"##),
    );
    add_file(root, "personal/photo_id.png", Some(r#"{"rating": [9.9]}"#));
    add_file(root, "personal/visit_card.svg", None);
    dir
}

fn files(index: &MetadataIndex) -> BTreeSet<String> {
    index
        .files()
        .iter()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .collect()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn load_folder_indexes_every_sidecar() {
    let dir = library();
    let index = SidecarStore::new(dir.path()).load_index().unwrap();

    assert_eq!(index.len(), 7);
    let paper = index.metadata("research/movies/interstellar_wormhole_james.pdf");
    assert_eq!(
        paper.get("publication_date").unwrap(),
        &vec![Value::Timestamp(parse_timestamp("2015-03").unwrap())]
    );
    assert_eq!(paper.get("reviewed").unwrap(), &vec![Value::Boolean(false)]);
    assert_eq!(paper.get("impact").unwrap(), &vec![Value::Number(5.6)]);
    assert!(index.metadata("personal/visit_card.svg").is_empty());
}

#[test]
fn scan_is_sorted_by_path() {
    let dir = library();
    let paths: Vec<PathBuf> = SidecarStore::new(dir.path())
        .scan()
        .unwrap()
        .into_iter()
        .map(|(path, _)| path)
        .collect();
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);
}

#[test]
fn folder_sidecar_describes_the_folder() {
    let dir = library();
    fs::write(
        dir.path().join("research/movies.mdf"),
        r#"{"keyword": ["cinema"]}"#,
    )
    .unwrap();

    let index = SidecarStore::new(dir.path()).load_index().unwrap();
    assert_eq!(files(&index.filter("keyword=cinema").unwrap()), set(&["research/movies"]));
}

#[test]
fn orphan_sidecars_are_skipped() {
    let dir = library();
    fs::write(dir.path().join("gone.pdf.mdf"), r#"{"author": ["me"]}"#).unwrap();

    let index = SidecarStore::new(dir.path()).load_index().unwrap();
    assert_eq!(index.len(), 7);
    assert!(index.metadata("gone.pdf").is_empty());
}

#[test]
fn invalid_sidecar_names_its_file() {
    let dir = library();
    add_file(dir.path(), "broken.doc", Some(r#"{"author": ["a b"], "author": []}"#));

    let err = SidecarStore::new(dir.path()).load_index().unwrap_err();
    match err {
        MedinxError::InvalidDocument { path, source } => {
            assert!(path.ends_with("broken.doc.mdf"), "{}", path.display());
            assert!(matches!(*source, MedinxError::Aggregate(ref errors) if errors.len() == 2));
        }
        other => panic!("Expected InvalidDocument, got {:?}", other),
    }
}

#[test]
fn type_conflict_across_sidecars_fails_the_load() {
    let dir = library();
    add_file(dir.path(), "z.doc", Some(r#"{"publication_year": ["recent"]}"#));

    let err = SidecarStore::new(dir.path()).load_index().unwrap_err();
    assert!(matches!(
        err,
        MedinxError::TypeConsistency { ref attribute, registered: Variant::Number, found: Variant::Text, .. }
            if attribute == "publication_year"
    ));
}

#[test]
fn validate_reports_every_problem() {
    let dir = library();
    add_file(dir.path(), "a_bad.doc", Some("[]"));
    add_file(dir.path(), "b_bad.doc", Some(r#"{"rating": [true, 1]}"#));
    add_file(dir.path(), "c_conflict.doc", Some(r#"{"rating": ["high"]}"#));

    let problems = SidecarStore::new(dir.path()).validate().unwrap();
    assert_eq!(problems.len(), 3, "{problems:?}");
    assert!(matches!(problems[0], MedinxError::InvalidDocument { .. }));
    assert!(matches!(problems[1], MedinxError::InvalidDocument { .. }));
    assert!(matches!(problems[2], MedinxError::TypeConsistency { .. }));
}

#[test]
fn validate_clean_tree() {
    let dir = library();
    assert!(SidecarStore::new(dir.path()).validate().unwrap().is_empty());
}

#[test]
fn custom_extension() {
    let dir = TempDir::new().unwrap();
    add_file(dir.path(), "a.doc", None);
    fs::write(dir.path().join("a.doc.meta"), r#"{"author": ["me"]}"#).unwrap();
    fs::write(dir.path().join("a.doc.mdf"), r#"{"author": ["not_me"]}"#).unwrap();

    let index = SidecarStore::new(dir.path())
        .with_extension("meta")
        .load_index()
        .unwrap();
    assert_eq!(files(&index.filter("author=me").unwrap()), set(&["a.doc"]));
}

#[test]
fn edits_persist_and_reload() {
    let dir = library();
    let store = SidecarStore::new(dir.path());
    let index = store.load_index().unwrap();
    let path = "personal/photo_id.png";

    index
        .set_attribute(path, "rating", vec![Value::Number(4.1)])
        .unwrap();
    index
        .set_attribute(path, "author", vec!["nobody".into(), "them".into()])
        .unwrap();
    index
        .set_attribute(
            path,
            "taken",
            vec![Value::Timestamp(parse_timestamp("2019-07-14T10:00+02:00").unwrap())],
        )
        .unwrap();
    store.save_index(&index).unwrap();

    let reloaded = store.load_index().unwrap();
    assert_eq!(reloaded.metadata(path), index.metadata(path));
    assert_eq!(reloaded.attribute_type("taken"), Some(Variant::Timestamp));
    assert_eq!(
        files(&reloaded.filter("author=them").unwrap()),
        set(&[path])
    );
}

#[test]
fn filtered_edit_shows_in_full_index() {
    let index = MetadataIndex::from_sources(vec![
        ("repport.doc", r#"{"author": ["me", "myself"], "location": ["paris", "new-york"]}"#),
        ("spec.doc", r#"{"author": ["group"], "location": ["london"]}"#),
        ("unrelated.doc", r#"{"rating": [5]}"#),
    ])
    .unwrap();

    let view = index.filter("location=london").unwrap();
    view.set_attribute("spec.doc", "location", vec!["paris".into()])
        .unwrap();

    assert_eq!(
        files(&index.filter("location=paris").unwrap()),
        set(&["repport.doc", "spec.doc"])
    );
}

#[test]
fn filter_equality_per_variant() {
    let index = MetadataIndex::from_sources(vec![
        (
            "doc1.doc",
            r##"{"author": ["me"], "reviewed": [true], "rating": [1.2], "review_date": ["#2016-02-01"]}"##,
        ),
        (
            "table.csv",
            r##"{"author": ["somebody"], "reviewed": [false], "rating": [5.0], "review_date": ["#2016-02-01T12:12"]}"##,
        ),
    ])
    .unwrap();

    let select = |q: &str| files(&index.filter(q).unwrap());
    assert_eq!(select("author=me"), set(&["doc1.doc"]));
    assert_eq!(select("reviewed=True"), set(&["doc1.doc"]));
    assert_eq!(select("reviewed=False"), set(&["table.csv"]));
    assert_eq!(select("rating=5.5"), set(&[]));
    assert_eq!(select("rating=5"), set(&["table.csv"]));
    assert_eq!(select("review_date=#2016-02-01"), set(&["doc1.doc"]));
    assert_eq!(select("review_date>2016-02-01"), set(&["table.csv"]));
}

#[test]
fn filter_float_comparisons() {
    let index = MetadataIndex::from_sources(vec![
        ("average_doc.doc", r##"{"rating": [5.0, 4.4], "reviewed": [true], "review_date": ["#2016"]}"##),
        ("poor_table.csv", r#"{"rating": [2.0]}"#),
        ("great_image.jpg", r#"{"rating": [10.0]}"#),
        ("mixed_image.jpg", r#"{"rating": [1.5, 11.5]}"#),
        ("unrated_image.jpg", r#"{"author": ["me"]}"#),
    ])
    .unwrap();

    let select = |q: &str| files(&index.filter(q).unwrap());
    assert_eq!(
        select("rating<5.000000"),
        set(&["average_doc.doc", "poor_table.csv", "mixed_image.jpg"])
    );
    assert_eq!(select("rating>5.0"), set(&["great_image.jpg", "mixed_image.jpg"]));
    assert_eq!(
        select("rating>=5.0"),
        set(&["average_doc.doc", "great_image.jpg", "mixed_image.jpg"])
    );
    assert_eq!(
        select("rating<=5"),
        set(&["average_doc.doc", "poor_table.csv", "mixed_image.jpg"])
    );
}

#[test]
fn value_search_and_negation() {
    let index = MetadataIndex::from_sources(vec![
        ("a.doc", r#"{"tag": ["nice", "specification"]}"#),
        ("b.doc", r#"{"tag": ["data"], "author": ["specification"]}"#),
        ("c.doc", r#"{"rating": [3]}"#),
    ])
    .unwrap();

    let select = |q: &str| files(&index.filter(q).unwrap());
    assert_eq!(select("specification"), set(&["a.doc", "b.doc"]));
    assert_eq!(select("!specification"), set(&["c.doc"]));
    assert_eq!(select("specification !data"), set(&["a.doc"]));
}

#[test]
fn insertion_order_is_kept() {
    let index = MetadataIndex::from_sources(vec![
        ("z.doc", r#"{"k": ["v"]}"#),
        ("a.doc", r#"{"k": ["v"]}"#),
        ("m.doc", r#"{"k": ["w"]}"#),
    ])
    .unwrap();
    assert_eq!(
        index.filter("k=v").unwrap().files(),
        vec![PathBuf::from("z.doc"), PathBuf::from("a.doc")]
    );
}

#[test]
fn metadata_is_a_snapshot() {
    let index = MetadataIndex::from_sources(vec![("a.doc", r#"{"k": ["v"]}"#)]).unwrap();
    let mut snapshot: Document = index.metadata("a.doc");
    snapshot.set("k", vec!["changed".into()]);
    assert_eq!(index.metadata("a.doc").get("k").unwrap(), &vec![Value::from("v")]);
}
