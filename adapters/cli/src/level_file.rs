use std::{error::Error, fmt, fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use stonefall_world::LevelLayout;

/// Level description as stored on disk.
///
/// ```toml
/// name = "Quarry"
/// tiles = [
///     [2, 2, 2],
///     [2, 3, 2],
///     [2, 2, 2],
/// ]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LevelFile {
    #[serde(default)]
    name: Option<String>,
    tiles: Vec<Vec<u8>>,
}

impl LevelFile {
    /// Parses a level description from TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self, LevelFileError> {
        let file: Self = toml::from_str(text).map_err(LevelFileError::InvalidToml)?;
        if matches!(&file.name, Some(name) if name.trim().is_empty()) {
            return Err(LevelFileError::BlankName);
        }
        Ok(file)
    }

    /// Converts the file into a layout, naming it `fallback_name` when the file carries no name.
    pub(crate) fn into_layout(self, fallback_name: &str) -> LevelLayout {
        let name = self.name.unwrap_or_else(|| fallback_name.to_owned());
        LevelLayout::new(name, self.tiles)
    }
}

/// Reads and parses the level stored at `path`.
pub(crate) fn load(path: &Path) -> Result<LevelLayout> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file {}", path.display()))?;
    let file = LevelFile::parse(&text)
        .with_context(|| format!("failed to parse level file {}", path.display()))?;
    let fallback = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_owned());
    Ok(file.into_layout(&fallback))
}

/// Errors produced while decoding a level file.
#[derive(Debug)]
pub(crate) enum LevelFileError {
    /// The text is not a valid level document.
    InvalidToml(toml::de::Error),
    /// The `name` key is present but contains only whitespace.
    BlankName,
}

impl fmt::Display for LevelFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToml(error) => write!(f, "could not decode level document: {error}"),
            Self::BlankName => write!(f, "level name must not be blank"),
        }
    }
}

impl Error for LevelFileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidToml(error) => Some(error),
            Self::BlankName => None,
        }
    }
}
