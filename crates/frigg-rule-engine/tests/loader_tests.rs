//! Rule file loading through the filesystem abstraction

use frigg_core::{Param, ParamTable};
use frigg_fs::{FileSystem, MemoryFileSystem, NativeFileSystem};
use frigg_rule_engine::{RuleError, RuleLoader, MAX_RULE_FILE_SIZE};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_missing_rule_file_is_none() {
    let loader = RuleLoader::new(Arc::new(MemoryFileSystem::new()));
    assert!(loader.load(Path::new("/t/template.json")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_scaffold_then_load() {
    let fs = Arc::new(MemoryFileSystem::new());
    let loader = RuleLoader::new(fs.clone());
    let path = Path::new("/t/new/template.json");

    loader.scaffold(path).await.unwrap();
    assert_eq!(
        fs.contents(path).as_deref(),
        Some("{\n  \"Template\": \"\",\n  \"Rules\": []\n}\n")
    );

    let builder = loader.load(path).await.unwrap().unwrap();
    let params: ParamTable = [("@@A@@".to_string(), Param::new("A", "1", "int"))]
        .into_iter()
        .collect();
    assert_eq!(builder.render(&params).unwrap(), "");
}

#[tokio::test]
async fn test_oversized_rule_file_rejected() {
    let big = " ".repeat(MAX_RULE_FILE_SIZE as usize + 1);
    let fs = Arc::new(MemoryFileSystem::with_files([("/t/big.json", big)]));
    let loader = RuleLoader::new(fs);

    assert!(matches!(
        loader.load(Path::new("/t/big.json")).await,
        Err(RuleError::LoadError { .. })
    ));
}

#[tokio::test]
async fn test_invalid_rule_file_reports_reason() {
    let fs = Arc::new(MemoryFileSystem::with_files([
        ("/t/broken.json", "{"),
        ("/t/shape.json", r#"{"Template": []}"#),
    ]));
    let loader = RuleLoader::new(fs);

    assert!(matches!(
        loader.load(Path::new("/t/broken.json")).await,
        Err(RuleError::Json(_))
    ));
    assert!(matches!(
        loader.load(Path::new("/t/shape.json")).await,
        Err(RuleError::Schema { .. })
    ));
}

#[tokio::test]
async fn test_discover_rule_files() {
    let fs = Arc::new(MemoryFileSystem::with_files([
        ("/t/b.json", "{}"),
        ("/t/a.JSON", "{}"),
        ("/t/readme.md", ""),
        ("/t/nested/c.json", "{}"),
    ]));
    let loader = RuleLoader::new(fs);

    assert_eq!(
        loader.discover_rule_files(Path::new("/t")).await.unwrap(),
        vec![PathBuf::from("/t/a.JSON"), PathBuf::from("/t/b.json")]
    );
    assert!(loader
        .discover_rule_files(Path::new("/missing"))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_scaffold_on_disk() {
    let temp = TempDir::new().unwrap();
    let fs = Arc::new(NativeFileSystem::new());
    let loader = RuleLoader::new(fs.clone());
    let path = temp.path().join("rules").join("template.json");

    loader.scaffold(&path).await.unwrap();
    assert!(fs.exists(&path).await.unwrap());
    assert!(loader.load(&path).await.unwrap().is_some());
}
