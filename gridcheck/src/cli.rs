use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use itertools::Itertools;
use libverify::{GridFormat, VerifyConfig};

/// Compare Game of Life grids against a ground-truth grid.
#[derive(Debug, Parser)]
#[command(name = "gridcheck", version)]
pub struct Cli {
    /// Encoding of every grid file.
    #[arg(long, short, default_value_t = GridFormat::Cso)]
    pub format: GridFormat,

    /// The ground-truth grid file.
    #[arg(long)]
    pub gt: PathBuf,

    /// The grid files to compare. A bracketed list such as `[vect.txt, mpi.txt]` is accepted too.
    #[arg(long, required = true, num_args = 1..)]
    pub cmp: Vec<String>,

    /// Maximum number of grids decoded and compared at the same time.
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// JSON config file, see `VerifyConfig`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print a JSON report instead of the text one.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn candidates(&self) -> anyhow::Result<Vec<PathBuf>> {
        let candidates = expand_candidates(&self.cmp);

        if candidates.is_empty() {
            bail!("No grid files to compare");
        }

        Ok(candidates)
    }

    /// Config file values, with command-line overrides applied on top.
    pub fn verify_config(&self) -> anyhow::Result<VerifyConfig> {
        let mut config = match &self.config {
            Some(path) => VerifyConfig::load(path)
                .with_context(|| format!("Couldn't load config {}", path.display()))?,
            None => VerifyConfig::default(),
        };

        if let Some(max_workers) = self.max_workers {
            config.max_workers = max_workers;
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn expand_candidates(raw: &[String]) -> Vec<PathBuf> {
    raw.iter()
        .flat_map(|arg| {
            let arg = arg.trim();

            match arg.strip_prefix('[').and_then(|list| list.strip_suffix(']')) {
                Some(list) => list
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(PathBuf::from)
                    .collect_vec(),
                None => vec![PathBuf::from(arg)],
            }
        })
        .collect()
}

/// The file name of `path`, falling back to the whole path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
