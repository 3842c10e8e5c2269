//! Main entry point for the ipameta CLI.
//!
//! Loads an `.ipa` archive from a local path or HTTP URL and prints its
//! bundle identifier, version, and display name.

use anyhow::Result;
use clap::Parser;
use std::path::Path;

use ipameta::{Cli, extract_meta, io};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let bytes = if cli.is_http_url() {
        io::download(&cli.file).await?
    } else {
        io::read_file(Path::new(&cli.file)).await?
    };

    if !cli.quiet {
        eprintln!("read {} bytes from {}", bytes.len(), cli.file);
    }

    let meta = extract_meta(&bytes)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&meta)?);
    } else {
        println!("bundle id:    {}", meta.bundle_id);
        println!("version:      {}", meta.version);
        println!("display name: {}", meta.display_name);
    }

    Ok(())
}
