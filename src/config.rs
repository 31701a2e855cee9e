use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use dotenv::dotenv;
use std::path::PathBuf;

use crate::api::DEFAULT_API;

#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Route to open on start (`/auth`, `/posts`, `/posts/<id>`, `/profile`)
    #[arg(default_value = "/")]
    route: String,
    /// Base url of the forum REST api
    #[arg(long, env = "FORUM_API", default_value = DEFAULT_API)]
    api: String,
    /// Where the logged in user is remembered between runs
    #[arg(long, env = "FORUM_SESSION", default_value = ".kv-forum/session.json")]
    session: PathBuf,
    /// Posts requested per page
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..))]
    page_size: u32,
    /// Posts shown per screen in the feed
    #[arg(long, default_value = "5")]
    rows: usize,
    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,
}

impl Config {
    /// Parse the configuration from the environment and command line arguments
    pub fn parse() -> Self {
        dotenv().ok();
        <Self as Parser>::parse()
    }
    /// Create a logger with the configured verbosity level
    pub fn init_logger(&self) {
        env_logger::Builder::new()
            .filter_level(self.verbose.log_level_filter())
            .format_target(false)
            .init();
    }
    pub fn route(&self) -> &str {
        &self.route
    }
    pub fn api(&self) -> &str {
        &self.api
    }
    pub fn session(&self) -> &PathBuf {
        &self.session
    }
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }
    pub fn rows(&self) -> usize {
        self.rows.max(1)
    }
}
