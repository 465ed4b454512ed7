use std::env;
use std::string::ToString;
use log::debug;

mod server;
mod core;
mod clients;
mod config;
mod errors;

const DEFAULT_MODE: &str = "PROVIDER";

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    let mode: String = match args.windows(2).find(|w| w[0] == "--mode") {
        Some(window) => window[1].parse().unwrap_or(DEFAULT_MODE.to_string()),
        None => DEFAULT_MODE.to_string(),
    };
    debug!("mode found = {mode}");
    if mode == DEFAULT_MODE || mode.to_ascii_lowercase() == "provider" || mode.to_ascii_lowercase() == "p" {
        server::provider_server::main()
    } else if mode.to_ascii_lowercase() == "client" || mode.to_ascii_lowercase() == "c" {
        clients::provider_client::main()
    }
}
