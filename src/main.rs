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

use clap::Parser;
use pos_tagger::cli::{self, Args};
use pos_tagger::pipelines::environment::{prepare_files, prepare_model};
use std::io;
use std::process::ExitCode;
use tracing::info;

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    cli::init_logging(&args);

    let config = args.tagger_config()?;
    if args.prepare_only {
        let files = prepare_files(&config)?;
        info!("Model files available in {}", files.model_path.display());
        return Ok(ExitCode::SUCCESS);
    }

    //    Bootstrap failures propagate, tagging failures are reported by `run`
    let pos_model = prepare_model(&config)?;
    let status = cli::run(&pos_model, io::stdin().lock(), io::stdout().lock(), io::stderr());
    Ok(ExitCode::from(status as u8))
}
