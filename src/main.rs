use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = portico::cli::Cli::parse();
    if let Err(e) = portico::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
