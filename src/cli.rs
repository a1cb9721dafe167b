// Copyright 2026 The pos-tagger Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Command line interface
//!
//! Argument parsing, configuration layering (defaults, optional JSON file, command line flags),
//! logging set-up and the stdin to stdout tagging run.

use crate::common::config::{Config, DeviceOption, TaggerConfig};
use crate::common::error::PosTaggerError;
use crate::pipelines::pos_tagging::{tag_text, TagSet, TokenTagger};
use clap::Parser;
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Exit status of a run whose tagging failed
pub const TAGGING_FAILURE: i32 = 1;

/// Environment variable holding a tracing filter directive, overriding `-v`/`-q`
pub const LOG_ENV: &str = "POS_TAGGER_LOG";

/// Tags the text read from standard input with part-of-speech labels.
#[derive(Parser, Debug)]
#[command(name = "pos-tagger", version, about)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Label set of the printed tags
    #[arg(long, value_enum)]
    pub tagset: Option<TagSet>,

    /// Device to run the model on
    #[arg(long, value_enum)]
    pub device: Option<DeviceOption>,

    /// Cache directory for downloaded models
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Directory holding the model files, used instead of downloading them
    #[arg(long, value_name = "PATH")]
    pub model_dir: Option<PathBuf>,

    /// Never download missing model files
    #[arg(long)]
    pub offline: bool,

    /// Only make the model available locally, then exit
    #[arg(long)]
    pub prepare_only: bool,

    /// More log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Builds the tagger configuration: defaults, then the configuration file, then the flags.
    pub fn tagger_config(&self) -> Result<TaggerConfig, PosTaggerError> {
        let mut config = match &self.config {
            Some(path) => TaggerConfig::from_file(path)?,
            None => TaggerConfig::default(),
        };
        if let Some(tagset) = self.tagset {
            config.tagset = tagset;
        }
        if let Some(device) = self.device {
            config.device = device;
        }
        if let Some(cache_dir) = &self.cache_dir {
            config.cache_dir = Some(cache_dir.clone());
        }
        if let Some(model_dir) = &self.model_dir {
            config.model.local_dir = Some(model_dir.clone());
        }
        if self.offline {
            config.allow_download = false;
        }
        config.validate()?;
        Ok(config)
    }

    /// Default log filter for the verbosity flags
    pub fn log_directive(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

/// Installs the stderr log subscriber. `POS_TAGGER_LOG` takes precedence over the flags.
pub fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(args.log_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Reads the whole input, tags it and writes the tagged line.
///
/// Any failure after the model is loaded (unreadable or non UTF-8 input, tagging error) is
/// reported on `stderr` as `Error in tag_text: <message>`; nothing is written to `stdout` in that
/// case.
///
/// # Returns
///
/// * `i32` process exit status: 0 on success, `TAGGING_FAILURE` otherwise
pub fn run<M, R, W, E>(model: &M, mut input: R, mut stdout: W, mut stderr: E) -> i32
where
    M: TokenTagger + ?Sized,
    R: Read,
    W: Write,
    E: Write,
{
    let result = read_input(&mut input).and_then(|text| tag_text(&text, model));
    let written = match result {
        Ok(line) => writeln!(stdout, "{line}").and_then(|_| stdout.flush()),
        Err(error) => {
            let _ = writeln!(stderr, "Error in tag_text: {error}");
            return TAGGING_FAILURE;
        }
    };
    match written {
        Ok(()) => 0,
        Err(error) => {
            let _ = writeln!(stderr, "Error in tag_text: {error}");
            TAGGING_FAILURE
        }
    }
}

fn read_input<R: Read>(input: &mut R) -> Result<String, PosTaggerError> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    Ok(text)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::config::ModelSpec;

    #[test]
    fn flags_override_configuration_file() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            r#"{{"tagset": "penn", "device": "cuda", "cache_dir": "/from/file"}}"#
        )?;
        let args = Args::try_parse_from([
            "pos-tagger",
            "--config",
            file.path().to_str().unwrap(),
            "--device",
            "cpu",
            "--offline",
        ])?;

        let config = args.tagger_config()?;

        assert_eq!(config.tagset, TagSet::Penn);
        assert_eq!(config.device, DeviceOption::Cpu);
        assert_eq!(config.cache_dir, Some(PathBuf::from("/from/file")));
        assert!(!config.allow_download);
        Ok(())
    }

    #[test]
    fn defaults_without_flags() -> anyhow::Result<()> {
        let args = Args::try_parse_from(["pos-tagger"])?;
        let config = args.tagger_config()?;
        assert_eq!(config, TaggerConfig::default());
        assert_eq!(config.model, ModelSpec::default());
        assert_eq!(args.log_directive(), "info");
        Ok(())
    }

    #[test]
    fn model_dir_selects_local_model() -> anyhow::Result<()> {
        let args = Args::try_parse_from(["pos-tagger", "--model-dir", "models/pos"])?;
        let config = args.tagger_config()?;
        assert_eq!(config.model.local_dir, Some(PathBuf::from("models/pos")));
        Ok(())
    }

    #[test]
    fn verbosity_flags() -> anyhow::Result<()> {
        assert_eq!(
            Args::try_parse_from(["pos-tagger", "-vv"])?.log_directive(),
            "trace"
        );
        assert_eq!(
            Args::try_parse_from(["pos-tagger", "-q"])?.log_directive(),
            "error"
        );
        assert!(Args::try_parse_from(["pos-tagger", "-q", "-v"]).is_err());
        Ok(())
    }

    #[test]
    fn unknown_tagset_is_rejected() {
        assert!(Args::try_parse_from(["pos-tagger", "--tagset", "brown"]).is_err());
    }
}
