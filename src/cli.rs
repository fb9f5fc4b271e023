use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sb2-rs",
    about = "Scratch 2.0 project document toolkit (block-spec catalog and .sb2 writer)."
)]
pub struct Args {
    #[arg(long, help = "Print the block-spec catalog as JSON.")]
    pub list_specs: bool,

    #[arg(
        long,
        value_name = "PATTERN",
        help = "Print catalog entries whose template or selector matches this regex."
    )]
    pub find: Option<String>,

    #[arg(long, help = "Report duplicate templates in the block-spec catalog.")]
    pub lint_specs: bool,

    #[arg(
        long,
        value_name = "OUTPUT",
        help = "Write a small demonstration project to this .sb2 path."
    )]
    pub demo: Option<PathBuf>,
}
