use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("dimensions must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("board must be at least 2x2, got {0}x{0}")]
    TooSmall(usize),
    #[error("cell value must be 0 or a power of two, got {0}")]
    InvalidTile(u32),
    #[error("unknown direction: {0:?}")]
    UnknownDirection(String),
    #[error("winning tile must be a power of two >= 4, got {0}")]
    InvalidWinningTile(u32),
    #[error("tile label must be keyed by 0 or a power of two, got {0}")]
    InvalidLabel(u32),
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
