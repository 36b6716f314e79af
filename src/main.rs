use anyhow::Result;

mod cli;
mod config;
mod gateways;
mod recurring_update;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    cli::run()
}
