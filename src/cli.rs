use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "frame-cruiser", about = "Step through directories of JPEG frames and highlight motion between them")]
pub struct CliArgs {
    /// The directory containing the images.
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Number of frames to skip per next/previous.
    #[arg(short = 's', long = "step", value_name = "N")]
    pub step: Option<usize>,

    /// Disable motion highlighting for this run.
    #[arg(long = "no-motion")]
    pub no_motion: bool,
}
