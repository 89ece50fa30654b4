//! Context directory loader.
//!
//! A context directory (`.context/` by default) holds the project's
//! knowledge as Markdown files. Every `*.md` file at the top level is read
//! once; extraction helpers then pull packet inputs out of the well-known
//! files. Missing knowledge files are not errors: they simply contribute
//! nothing.

use crate::parser;
use ctxpack_agent::{PacketInput, estimate_tokens};
use ctxpack_core::{KnowledgeEntry, LoadError};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONSTITUTION: &str = "CONSTITUTION.md";
pub const TASKS: &str = "TASKS.md";
pub const CONVENTIONS: &str = "CONVENTIONS.md";
pub const ARCHITECTURE: &str = "ARCHITECTURE.md";
pub const DECISIONS: &str = "DECISIONS.md";
pub const LEARNINGS: &str = "LEARNINGS.md";
pub const GLOSSARY: &str = "GLOSSARY.md";
pub const DRIFT: &str = "DRIFT.md";
pub const AGENT_PLAYBOOK: &str = "AGENT_PLAYBOOK.md";

/// Recommended reading order for an agent.
pub const FILE_READ_ORDER: &[&str] = &[
    CONSTITUTION,
    TASKS,
    CONVENTIONS,
    ARCHITECTURE,
    DECISIONS,
    LEARNINGS,
    GLOSSARY,
    DRIFT,
    AGENT_PLAYBOOK,
];

/// A single loaded context file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextFile {
    /// File name, e.g. `TASKS.md`
    pub name: String,
    /// Full path on disk
    pub path: PathBuf,
    /// File contents
    pub content: String,
    /// Token estimate of `content`
    pub tokens: usize,
}

impl ContextFile {
    /// True when the file has no non-whitespace content.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// A loaded context directory.
#[derive(Debug, Clone)]
pub struct ContextDir {
    dir: PathBuf,
    files: Vec<ContextFile>,
}

impl ContextDir {
    /// Read every top-level `*.md` file in `dir`, sorted by name.
    ///
    /// Unreadable files are skipped with a warning.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dir = dir.as_ref().to_path_buf();

        let meta = std::fs::metadata(&dir).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound { dir: dir.clone() },
            _ => LoadError::Read {
                path: dir.clone(),
                reason: e.to_string(),
            },
        })?;
        if !meta.is_dir() {
            return Err(LoadError::NotADirectory { path: dir });
        }

        let read_dir = std::fs::read_dir(&dir).map_err(|e| LoadError::Read {
            path: dir.clone(),
            reason: e.to_string(),
        })?;

        let mut paths: Vec<PathBuf> = read_dir
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .filter(|p| p.extension().and_then(|ext| ext.to_str()) == Some("md"))
            .collect();

        // Sort for deterministic ordering
        paths.sort();

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string)
            else {
                continue;
            };
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    let tokens = estimate_tokens(&content);
                    debug!(file = %path.display(), tokens, "Loaded context file");
                    files.push(ContextFile {
                        name,
                        path,
                        content,
                        tokens,
                    });
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping unreadable context file");
                }
            }
        }

        debug!(dir = %dir.display(), files = files.len(), "Context directory loaded");
        Ok(Self { dir, files })
    }

    /// The directory this context was loaded from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All loaded files, sorted by name.
    pub fn files(&self) -> &[ContextFile] {
        &self.files
    }

    /// Look up a loaded file by name.
    pub fn file(&self, name: &str) -> Option<&ContextFile> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Sum of token estimates across all loaded files.
    pub fn total_tokens(&self) -> usize {
        self.files.iter().map(|f| f.tokens).sum()
    }

    /// Paths of present files in recommended reading order.
    pub fn read_order(&self) -> Vec<String> {
        FILE_READ_ORDER
            .iter()
            .filter(|name| self.file(name).is_some())
            .map(|name| self.dir.join(name).display().to_string())
            .collect()
    }

    pub fn constitution_rules(&self) -> Vec<String> {
        self.content(CONSTITUTION)
            .map(parser::constitution_rules)
            .unwrap_or_default()
    }

    pub fn active_tasks(&self) -> Vec<String> {
        self.content(TASKS)
            .map(parser::active_tasks)
            .unwrap_or_default()
    }

    pub fn conventions(&self) -> Vec<String> {
        self.content(CONVENTIONS)
            .map(parser::bullet_items)
            .unwrap_or_default()
    }

    pub fn decisions(&self) -> Vec<KnowledgeEntry> {
        self.entries(DECISIONS)
    }

    pub fn learnings(&self) -> Vec<KnowledgeEntry> {
        self.entries(LEARNINGS)
    }

    /// Everything the assembler needs, extracted in one pass.
    pub fn packet_input(&self) -> PacketInput {
        PacketInput {
            read_order: self.read_order(),
            constitution: self.constitution_rules(),
            tasks: self.active_tasks(),
            conventions: self.conventions(),
            decisions: self.decisions(),
            learnings: self.learnings(),
        }
    }

    fn content(&self, name: &str) -> Option<&str> {
        self.file(name).map(|f| f.content.as_str())
    }

    fn entries(&self, name: &str) -> Vec<KnowledgeEntry> {
        self.content(name)
            .map(parser::parse_entry_blocks)
            .unwrap_or_default()
    }
}
