//! tfcheck - Terraform lifecycle checks for Azure stacks

use clap::Parser;

use tfcheck::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    tfcheck::logging::init(cli.verbose);
    match cli.run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}
