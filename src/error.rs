use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("error in opening {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("error in reading input: {0}")]
    Io(#[from] io::Error),

    #[error("error in parsing config: {}", .0.message())]
    Config(#[from] toml::de::Error),

    #[error("worker {0} hung up before the input was consumed")]
    WorkerGone(usize),

    #[error("worker {0} panicked")]
    WorkerPanicked(usize),
}
