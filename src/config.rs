use crate::{counter::DEFAULT_CHUNK_SIZE, Error, ParserKind, Strategy};
use serde::{Deserialize, Serialize};
use std::{fs, io::ErrorKind, num::NonZeroUsize, path::Path, thread};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub strategy: Strategy,
    pub parser: ParserKind,
    /// Worker threads for the concurrent strategy, 0 picks one per core.
    pub workers: usize,
    /// Bytes handed to a worker at a time.
    pub chunk_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            parser: ParserKind::default(),
            workers: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Config {
    pub const FILENAME: &'static str = "config.toml";

    /// Reads `filename`, or [`Config::FILENAME`] when it is empty. Only a
    /// missing default file yields the defaults, a named file must exist.
    pub fn parse(filename: &str) -> Result<Config, Error> {
        if filename.is_empty() {
            Config::load(Path::new(Config::FILENAME), false)
        } else {
            Config::load(Path::new(filename), true)
        }
    }

    fn load(path: &Path, required: bool) -> Result<Config, Error> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound && !required => {
                return Ok(Config::default())
            }
            Err(source) => {
                return Err(Error::Open {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Config::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Config, Error> {
        Ok(toml::from_str(contents)?)
    }

    /// Command line values win over the file, `None` keeps the file's value.
    pub fn apply_overrides(
        &mut self,
        strategy: Option<Strategy>,
        parser: Option<ParserKind>,
        workers: Option<usize>,
    ) {
        if let Some(strategy) = strategy {
            self.strategy = strategy;
        }
        if let Some(parser) = parser {
            self.parser = parser;
        }
        if let Some(workers) = workers {
            self.workers = workers;
        }
    }

    pub fn workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }

        thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    }
}
