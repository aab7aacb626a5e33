use std::path::PathBuf;

use blockfall_engine::GameConfig;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DefaultConfigArg {
    /// Write to this file instead of stdout
    #[clap(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DefaultConfigArg) -> anyhow::Result<()> {
    let DefaultConfigArg { output } = arg;
    util::write_json(&GameConfig::default(), output.as_deref())
}
