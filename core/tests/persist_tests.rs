use ragcore::persist::{load_corpus, load_records, save_records, CorpusPaths};
use ragcore::{Category, RawDocument};
use std::fs;
use tempfile::tempdir;

#[test]
fn loads_bhc_before_pcai_with_categories() {
    let dir = tempdir().unwrap();
    let paths = CorpusPaths::new(dir.path());
    save_records(&paths.pcai(), &[RawDocument { url: "https://www.powerconnect.ai/".into(), headings: vec![], content: "PowerConnect.AI".into() }]).unwrap();
    save_records(
        &paths.bhc(),
        &[
            RawDocument { url: "https://bhcglobal.com/".into(), headings: vec!["Home".into()], content: "BHC".into() },
            RawDocument { url: "https://bhcglobal.com/careers".into(), headings: vec![], content: "Jobs".into() },
        ],
    )
    .unwrap();

    let corpus = load_corpus(&paths).unwrap();
    let cats: Vec<Category> = corpus.iter().map(|d| d.category).collect();
    assert_eq!(cats, vec![Category::Bhc, Category::Bhc, Category::Pcai]);
    assert_eq!(corpus[1].url, "https://bhcglobal.com/careers");
}

#[test]
fn missing_files_give_empty_corpus() {
    let dir = tempdir().unwrap();
    let corpus = load_corpus(&CorpusPaths::new(dir.path().join("nope"))).unwrap();
    assert!(corpus.is_empty());
}

#[test]
fn optional_fields_default_to_empty() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("pages.json");
    fs::write(&file, r#"[{"url": "https://bhcglobal.com/"}]"#).unwrap();
    let records = load_records(&file).unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].headings.is_empty());
    assert!(records[0].content.is_empty());
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let paths = CorpusPaths::new(dir.path());
    fs::write(paths.bhc(), "{ not json").unwrap();
    assert!(load_corpus(&paths).is_err());
}
