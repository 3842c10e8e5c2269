use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ipameta")]
#[command(version)]
#[command(about = "Extract bundle metadata from iOS .ipa archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  ipameta MyApp.ipa                      print bundle id, version and display name\n  \
  ipameta --json MyApp.ipa               emit the metadata as JSON\n  \
  ipameta https://cdn.example.com/a.ipa  fetch a remote archive first")]
pub struct Cli {
    /// IPA file path or HTTP URL
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Emit metadata as a JSON object
    #[arg(long)]
    pub json: bool,

    /// Quiet mode, suppress progress messages
    #[arg(short = 'q')]
    pub quiet: bool,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.file.starts_with("http://") || self.file.starts_with("https://")
    }
}
