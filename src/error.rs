use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mod not found: {0}")]
    ModNotFound(String),

    #[error("Mod '{name}' conflicts with the installed mod '{installed}'\n\n\
             Hint: remove '{installed}' first, or re-run with --ignore-conflicts\n\
             if you are sure both mods can coexist.")]
    Conflict { name: String, installed: String },

    #[error("Download failed: {0}\n\n\
             It might happen because your username and/or token are wrong or deactivated.\n\
             Check them in player-data.json and in your config.json.")]
    Download(String),

    #[error("Invalid mod list: {0}")]
    InvalidModList(String),

    #[error("Could not detect the Factorio version: {0}\n\n\
             Hint: check that factorio_path points at your Factorio folder,\n\
             or pin the version with \"factorio_version\" in config.json.")]
    GameVersion(String),

    #[error("{0}")]
    Other(String),
}
