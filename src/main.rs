mod cli;
mod model;
mod ssh;
mod store;
mod ui;
mod validate;

fn main() -> anyhow::Result<()> {
    cli::run()
}
