#![cfg(not(tarpaulin_include))]

use uniresult::app;
use uniresult::remote::RemoteClient;
use uniresult::store::{DEFAULT_HISTORY_FILE, ResultStore};

use std::env;

/// Main entry point for the web application
///
/// Starts the result-sheet API server. The bind address and history file
/// location can be overridden on the command line; the remote mirror's base
/// URL comes from the `UNIRESULT_API_URL` environment variable.
///
/// # Usage
/// `website [bind-addr] [history-file]`
///
/// # Default Configuration
/// * Binds to 127.0.0.1:3000
/// * Stores history in `database/history.json`
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let addr = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "127.0.0.1:3000".to_string());
    let history = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| DEFAULT_HISTORY_FILE.to_string());

    let store = ResultStore::open(&history);
    let remote = RemoteClient::from_env();

    app::run(&addr, store, remote).await
}
