mod api;
mod app;
mod config;
mod controller;
mod error;
mod forum;
mod session;
mod view;


use std::{error::Error, sync::Arc};

use api::ForumClient;
use app::App;
use config::Config;
use log::info;
use session::SessionStore;
use view::{Route, ViewOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    config.init_logger();
    info!("# KV Forum #");
    info!("api: {}", config.api());

    let api = Arc::new(ForumClient::new(&config)?);
    let session = Arc::new(SessionStore::open(config.session())?);

    let options = ViewOptions {
        page_size: config.page_size(),
        rows: config.rows(),
    };
    let mut app = App::new(api, session, options);
    app.run(
        Route::parse(config.route()),
        tokio::io::BufReader::new(tokio::io::stdin()),
        std::io::stdout(),
    )
    .await?;

    Ok(())
}
