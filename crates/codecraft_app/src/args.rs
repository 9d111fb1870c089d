use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command line arguments for the codecraft binary.
#[derive(Parser, Clone, Debug)]
#[command(
    name = "codecraft",
    about = "Describe a website and let the model build a single HTML file"
)]
pub struct Args {
    /// Site description. Read from stdin when omitted.
    pub prompt: Option<String>,

    /// Styling mode for the generated site.
    #[arg(long, value_enum, default_value_t = StyleArg::Simple)]
    pub style: StyleArg,

    /// Directory that receives generated sites.
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Settings file holding the API key and theme preference.
    #[arg(long, default_value = "codecraft.ron")]
    pub settings: PathBuf,

    /// Relay endpoint to use instead of calling the hosted API directly.
    #[arg(long)]
    pub relay: Option<String>,

    /// Model identifier override.
    #[arg(long)]
    pub model: Option<String>,

    /// Request a single completion object instead of a token stream.
    #[arg(long)]
    pub no_stream: bool,

    /// Flip the stored dark/light preference and exit.
    #[arg(long)]
    pub toggle_theme: bool,

    /// Log to the terminal in addition to the log file.
    #[arg(long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleArg {
    /// Plain HTML and JavaScript; fastest to generate.
    NoCss,
    /// Clean, professional design.
    Simple,
    /// Vibrant, playful design.
    Colorful,
}

impl From<StyleArg> for codecraft_core::StyleChoice {
    fn from(value: StyleArg) -> Self {
        match value {
            StyleArg::NoCss => codecraft_core::StyleChoice::NoCss,
            StyleArg::Simple => codecraft_core::StyleChoice::Simple,
            StyleArg::Colorful => codecraft_core::StyleChoice::Colorful,
        }
    }
}
