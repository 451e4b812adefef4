use std::path::PathBuf;

use crate::config::ConfigError;

/// Errors that stop the game before the loop starts. Nothing inside the
/// tick pipeline returns these.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("required asset `{name}` not found at {}", path.display())]
    MissingAsset { name: &'static str, path: PathBuf },

    #[error("asset `{name}` at {} contains no drawable cells", path.display())]
    EmptySprite { name: &'static str, path: PathBuf },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
