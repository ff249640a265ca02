#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn notepress_cmd() -> Command {
    let mut cmd = Command::cargo_bin("notepress").unwrap();
    cmd.env_remove("NOTEPRESS_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

pub const CONFIG: &str = r#"
[paths]
vault = "vault"
source_dir = "notes"
website = "website"
media_sources = ["attachments"]

[filters]
required_tags = ["status/evergreen"]
excluded_tags = ["private"]

[taxonomy.domain_mappings."domain/cs/algorithms"]
category = "Computer Science"
subcategories = ["Algorithms"]

[taxonomy.type_mappings]
"type/zettelkasten" = "Zettelkasten Notes"

[site]
author = "Test Author"

[history]
backend = "none"
"#;

/// A vault, a website and a config file side by side in a temp directory
pub struct Workspace {
    pub temp: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("vault/notes")).unwrap();
        fs::create_dir_all(temp.path().join("vault/attachments")).unwrap();
        fs::create_dir_all(temp.path().join("website")).unwrap();
        fs::write(temp.path().join("notepress.toml"), CONFIG).unwrap();
        Workspace { temp }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("notepress.toml")
    }

    pub fn notes_dir(&self) -> PathBuf {
        self.root().join("vault/notes")
    }

    pub fn content_dir(&self) -> PathBuf {
        self.root().join("website/content/blog")
    }

    pub fn media_dir(&self) -> PathBuf {
        self.root().join("website/static/images")
    }

    pub fn note(&self, name: &str, content: &str) {
        fs::write(self.notes_dir().join(name), content).unwrap();
    }

    pub fn remove_note(&self, name: &str) {
        fs::remove_file(self.notes_dir().join(name)).unwrap();
    }

    pub fn attachment(&self, name: &str) {
        fs::write(self.root().join("vault/attachments").join(name), b"image bytes").unwrap();
    }

    pub fn published(&self, name: &str) -> String {
        fs::read_to_string(self.content_dir().join(name)).unwrap()
    }

    pub fn content_files(&self) -> Vec<String> {
        list_dir(&self.content_dir())
    }

    pub fn media_files(&self) -> Vec<String> {
        list_dir(&self.media_dir())
    }

    /// `notepress --config <workspace config> <args>`
    pub fn cmd(&self) -> Command {
        let mut cmd = notepress_cmd();
        cmd.arg("--config").arg(self.config_path());
        cmd
    }
}

pub fn list_dir(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Value of a top-level frontmatter key in a published document
pub fn frontmatter_value(document: &str, key: &str) -> Option<serde_yaml::Value> {
    let rest = document.strip_prefix("---\n")?;
    let end = rest.find("\n---\n")?;
    let mapping: serde_yaml::Mapping = serde_yaml::from_str(&rest[..end]).ok()?;
    mapping.get(key).cloned()
}
