//! Command-line configuration and logging setup.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;

use crate::app::App;
use crate::error::Error;
use crate::persist::{JsonFile, TempFile, read_blogs};
use crate::store::BlogStore;

/// Serve a JSON REST API for blog posts.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Config {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:4000")]
    pub addr: SocketAddr,

    /// JSON file the blogs are loaded from and saved to
    #[arg(long, default_value = "blogs.json")]
    pub data: PathBuf,

    /// Where mutations are saved
    #[arg(long, value_enum, default_value_t = PersistMode::File)]
    pub persist: PersistMode,

    /// Seed the store from this JSON file instead of loading `--data`
    #[arg(long)]
    pub sample: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Persistence modes for [`Config::persist`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum PersistMode {
    /// Load from and save to `--data`
    File,
    /// Save to a temporary file removed on shutdown
    Temp,
    /// Keep everything in memory
    Off,
}

impl Config {
    /// Builds the shared app: seeds the store and picks the persistence hook.
    ///
    /// # Errors
    ///
    /// Fails if `--sample` cannot be read or parsed, or a temporary file
    /// cannot be created. A bad `--data` file is not an error; see
    /// [`App::load`].
    pub fn build_app(&self) -> Result<App, Error> {
        let seeded = match &self.sample {
            Some(path) => {
                let blogs = read_blogs(path)?;
                info!(path = %path.display(), count = blogs.len(), "seeding from sample");
                Some(BlogStore::from_blogs(blogs))
            }
            None => None,
        };

        Ok(match (self.persist, seeded) {
            (PersistMode::File, None) => App::load(JsonFile::new(&self.data)),
            (PersistMode::File, Some(store)) => App::persisted(store, JsonFile::new(&self.data)),
            (PersistMode::Temp, store) => App::persisted(store.unwrap_or_default(), TempFile::new()?),
            (PersistMode::Off, store) => App::in_memory(store.unwrap_or_default()),
        })
    }

    /// Installs the global `tracing` subscriber. `RUST_LOG` directives are
    /// honoured on top of the `-v` level.
    pub fn setup_logging(&self) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}
