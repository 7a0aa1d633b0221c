#![allow(dead_code)]

use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use whiriho::{FormatChoice, Whiriho};

/// On-disk catalog sandbox. Everything lives inside one temp directory so
/// the containment checks have a real boundary to enforce, and escapes via
/// nested catalogs stay inside the sandbox.
pub struct CatalogFixture {
    dir: TempDir,
}

impl CatalogFixture {
    pub fn new() -> Self {
        CatalogFixture {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.path().join("whiriho.json")
    }

    /// Write the catalog document as JSON.
    pub fn write_catalog(&self, document: &Value) {
        let text = serde_json::to_string_pretty(document).expect("serialize catalog");
        fs::write(self.catalog_path(), text).expect("write catalog");
    }

    /// Write an arbitrary file relative to the sandbox root, creating
    /// parent directories as needed.
    pub fn write_file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    pub fn read_file(&self, relative: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative)).expect("read fixture file")
    }

    /// A catalog handle bound to this sandbox, not yet loaded.
    pub fn handle(&self) -> Whiriho {
        Whiriho::new(self.catalog_path(), FormatChoice::Infer)
    }

    /// A catalog handle that has already loaded the sandbox catalog.
    pub fn loaded(&self) -> Whiriho {
        let mut catalog = self.handle();
        catalog.load().expect("load catalog");
        catalog
    }
}

/// A minimal version-1 catalog document with the given entry mapping.
pub fn v1_document(entries: Value) -> Value {
    json!({"version": "1.0.0", "catalog": entries})
}
