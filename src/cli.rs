use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Deserialize;
use thiserror::Error;

use crate::listing::{self, ListingOptions};
use crate::png::reader::MAX_TEXT_SIZE;

#[derive(Parser)]
#[command(name = "pngfolio")]
#[command(about = "JSON listing of the PNG images in a directory, described by their text chunks")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Prints the JSON listing
    List {
        /// Directory to list, overrides the config
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// URL prefix for each `src`, overrides the config
        #[arg(short, long)]
        base_url: Option<String>,

        #[arg(long)]
        pretty: bool,
    },

    /// Writes the listing as a CGI response
    Cgi,

    /// Dumps the text chunks and probed details of PNG files
    Inspect {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error("config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub dir: PathBuf,

    // Derived from SCRIPT_NAME when unset
    pub base_url: Option<String>,

    // 0 = no limit
    pub max_file_size: u64,
    pub max_text_size: usize,

    // 0 = one per cpu
    pub jobs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dir: PathBuf::from("portfolio"),
            base_url: None,
            max_file_size: 64 * 1024 * 1024,
            max_text_size: MAX_TEXT_SIZE,
            jobs: 0,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            None => Ok(Config::default()),
            Some(path) => Config::parse(&fs::read_to_string(path)?),
        }
    }

    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn listing_options(&self, script_name: Option<&str>) -> ListingOptions {
        let base_url = match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => listing::base_url_for(script_name, &self.dir),
        };

        ListingOptions {
            dir: self.dir.clone(),
            base_url,
            max_file_size: self.max_file_size,
            max_text_size: if self.max_text_size == 0 { usize::MAX } else { self.max_text_size },
            jobs: self.jobs,
        }
    }
}
