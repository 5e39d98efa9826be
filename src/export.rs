//! Scroll cards: a finished reading laid out for display or saving.
//!
//! Export failures are reported with their own notice and never affect the
//! session that produced the reading.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{FortuneResult, UserInput};
use crate::zodiac::format_date;

/// Shown when a scroll could not be saved.
pub const EXPORT_FAILED_NOTICE: &str = "保存失败，请尝试截图保存。";

const RULE: &str = "────────────────────────────────";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ExportError {
    /// User-facing notice; the detail goes to the log.
    pub fn notice(&self) -> &'static str {
        EXPORT_FAILED_NOTICE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollCard {
    zodiac: String,
    birth_date: String,
    direction: &'static str,
    content: String,
}

impl ScrollCard {
    pub fn new(input: &UserInput, result: &FortuneResult) -> Self {
        Self {
            zodiac: result.zodiac.clone(),
            birth_date: format_date(&input.birthday),
            direction: input.direction.label(),
            content: result.content.clone(),
        }
    }

    pub fn title(&self) -> String {
        format!("{}属相 · 丙午年运势", self.zodiac)
    }

    pub fn file_name(&self) -> String {
        format!("天机阁-2026丙午流年-{}属相.txt", self.zodiac)
    }

    /// Write the card into `dir`, creating it if needed. Returns the file path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(self.file_name());
        fs::write(&path, self.to_string()).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "scroll saved");
        Ok(path)
    }
}

impl fmt::Display for ScrollCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "【命理批注】{:>24}", "御笔亲批")?;
        writeln!(f, "{}", self.title())?;
        if !self.birth_date.is_empty() {
            writeln!(f, "生辰：{}　所求：{}", self.birth_date, self.direction)?;
        }
        writeln!(f, "{RULE}")?;
        writeln!(f, "{}", self.content.trim_end())?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "— 天机阁阁主 敬启 —")
    }
}
