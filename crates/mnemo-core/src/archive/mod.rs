//! Archive management for mnemo
//!
//! The data directory is the root containing all mnemo data.
//! Default location: `.mnemo/` (hidden, git-trackable)

pub mod entry;
pub mod lock;
pub mod paths;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::config::ArchiveConfig;
use crate::error::{MnemoError, Result};
use lock::SectionLock;
use paths::{ARCHIVES_DIR, CONFIG_FILE, DEFAULT_DATA_DIR, RULES_DIR};

/// Where an added entry landed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryLocation {
    pub project: String,
    pub section: String,
    pub file: PathBuf,
    pub sequence: u64,
    pub created_file: bool,
}

/// A section file on disk
#[derive(Debug, Clone)]
pub struct SectionFile {
    pub project: String,
    pub section: String,
    pub path: PathBuf,
}

/// The mnemo archive
#[derive(Debug)]
pub struct Archive {
    /// Root path of the data directory
    root: PathBuf,
    /// Root of the archives and rules trees (config redirect, else `root`)
    data_root: PathBuf,
    /// Archive configuration
    config: ArchiveConfig,
}

impl Archive {
    /// Discover a data directory by walking up from the given start
    /// directory; falls back to creating one at the start directory itself
    pub fn discover(start: &Path) -> Result<Self> {
        match paths::discover_data_dir(start) {
            Some(found) => Self::open(&found),
            None => Self::open(&start.join(DEFAULT_DATA_DIR)),
        }
    }

    /// Open the data directory at the given path, creating the layout when
    /// absent
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let config_path = path.join(CONFIG_FILE);
        let config = if config_path.exists() {
            ArchiveConfig::load(&config_path)?
        } else {
            ArchiveConfig::default()
        };

        Self::with_config(path, config)
    }

    /// Open with an explicit configuration value, bypassing `config.json`
    pub fn with_config(path: &Path, config: ArchiveConfig) -> Result<Self> {
        fs::create_dir_all(path)?;

        let data_root = match &config.data_dir {
            Some(dir) => {
                let dir = PathBuf::from(dir);
                if dir.is_absolute() {
                    dir
                } else {
                    path.join(dir)
                }
            }
            None => path.to_path_buf(),
        };

        let archives_dir = data_root.join(ARCHIVES_DIR);
        let fresh = !archives_dir.is_dir();
        fs::create_dir_all(&archives_dir)?;
        fs::create_dir_all(data_root.join(RULES_DIR))?;

        if fresh {
            for project in &config.default_projects {
                if let Ok(name) = paths::normalize_component("project", project) {
                    fs::create_dir_all(archives_dir.join(name))?;
                }
            }
        }

        Ok(Archive {
            root: path.to_path_buf(),
            data_root,
            config,
        })
    }

    /// Initialize a data directory under the given root, writing a default
    /// `config.json` when none exists
    pub fn init(root_dir: &Path) -> Result<Self> {
        let path = root_dir.join(DEFAULT_DATA_DIR);
        let archive = Self::open(&path)?;

        let config_path = archive.config_path();
        if !config_path.exists() {
            archive.config.save(&config_path)?;
        }

        Ok(archive)
    }

    /// Get the data directory root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the config
    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Get the config file path
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Get the archives directory
    pub fn archives_dir(&self) -> PathBuf {
        self.data_root.join(ARCHIVES_DIR)
    }

    /// Get the custom rules directory
    pub fn rules_dir(&self) -> PathBuf {
        self.data_root.join(RULES_DIR)
    }

    /// Add an entry to the archive.
    ///
    /// Appends to the highest-sequence section file for (project, section),
    /// rolling over to the next sequence when the resulting line count would
    /// exceed the configured maximum or when the current file already holds
    /// an entry with the same title. The read-modify-append sequence runs
    /// under the per-section advisory lock.
    #[tracing::instrument(skip(self, content), fields(project = %project, section = %section))]
    pub fn add(
        &self,
        project: &str,
        section: &str,
        title: &str,
        content: &str,
    ) -> Result<EntryLocation> {
        let project = paths::normalize_component("project", project)?;
        let section = paths::normalize_component("section", section)?;
        let title = validate_title(title)?;

        let section_dir = self.archives_dir().join(&project).join(&section);
        fs::create_dir_all(&section_dir)?;

        let _lock = SectionLock::acquire(&section_dir, &project, &section)?;

        let added = chrono::Local::now().naive_local();
        let block = entry::render_block(&title, content, added);
        let block_lines = block.lines().count();

        let (sequence, target, fresh) = match latest_sequence(&section_dir, &section)? {
            Some((seq, path)) => {
                let existing = fs::read_to_string(&path)?;
                let holds_title = entry::parse_entries(&existing)
                    .iter()
                    .any(|e| e.title == title);
                let over_cap =
                    existing.lines().count() + block_lines > self.config.max_file_lines;
                if holds_title || over_cap {
                    let next = seq + 1;
                    let path = section_dir.join(paths::section_file_name(&section, next));
                    (next, path, true)
                } else {
                    (seq, path, false)
                }
            }
            None => {
                let path = section_dir.join(paths::section_file_name(&section, 0));
                (0, path, true)
            }
        };

        if fresh {
            let mut content = entry::render_header(&project, &section);
            content.push_str(&block);
            fs::write(&target, content)?;
        } else {
            let mut file = OpenOptions::new().append(true).open(&target)?;
            file.write_all(block.as_bytes())?;
        }

        tracing::debug!(file = %target.display(), sequence, fresh, "entry written");

        Ok(EntryLocation {
            project,
            section,
            file: target,
            sequence,
            created_file: fresh,
        })
    }

    /// List project directories under the archive tree
    pub fn list_projects(&self) -> Result<Vec<String>> {
        list_subdirs(&self.archives_dir())
    }

    /// List section directories of a project
    pub fn list_sections(&self, project: &str) -> Result<Vec<String>> {
        let project = paths::normalize_component("project", project)?;
        let dir = self.archives_dir().join(&project);
        if !dir.is_dir() {
            return Err(MnemoError::ProjectNotFound { project });
        }
        list_subdirs(&dir)
    }

    /// Enumerate section files, optionally restricted to one project.
    ///
    /// Fails with the not-found error when the filter names a project
    /// without a directory. Unreadable directory entries are skipped and
    /// logged.
    pub fn section_files(&self, project_filter: Option<&str>) -> Result<Vec<SectionFile>> {
        let archives = self.archives_dir();
        let scan_root = match project_filter {
            Some(project) => {
                let project = paths::normalize_component("project", project)?;
                let dir = archives.join(&project);
                if !dir.is_dir() {
                    return Err(MnemoError::ProjectNotFound { project });
                }
                dir
            }
            None => archives.clone(),
        };

        let mut files = Vec::new();
        for dirent in WalkDir::new(&scan_root).min_depth(1) {
            let dirent = match dirent {
                Ok(dirent) => dirent,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !dirent.file_type().is_file() {
                continue;
            }
            let path = dirent.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }

            // Expect archives/<project>/<section>/<file>.md
            let Ok(rel) = path.strip_prefix(&archives) else {
                continue;
            };
            let parts: Vec<String> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            if parts.len() != 3 {
                continue;
            }

            files.push(SectionFile {
                project: parts[0].clone(),
                section: parts[1].clone(),
                path: path.to_path_buf(),
            });
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}

fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(MnemoError::EmptyField { field: "title" });
    }
    if trimmed.contains('\n') || trimmed.contains('\r') {
        return Err(MnemoError::InvalidName {
            field: "title",
            value: title.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Find the highest-sequence section file in a section directory
fn latest_sequence(dir: &Path, section: &str) -> Result<Option<(u64, PathBuf)>> {
    let mut latest: Option<(u64, PathBuf)> = None;
    for dirent in fs::read_dir(dir)? {
        let dirent = dirent?;
        let name = dirent.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(seq) = paths::parse_sequence(name, section) {
            if latest.as_ref().map_or(true, |(highest, _)| seq > *highest) {
                latest = Some((seq, dirent.path()));
            }
        }
    }
    Ok(latest)
}

fn list_subdirs(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    if !dir.is_dir() {
        return Ok(names);
    }
    for dirent in fs::read_dir(dir)? {
        let dirent = dirent?;
        if !dirent.file_type()?.is_dir() {
            continue;
        }
        if let Some(name) = dirent.file_name().to_str() {
            if !name.starts_with('.') {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}
