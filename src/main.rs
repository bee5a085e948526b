use std::fs;
use std::process;

use argh::FromArgs;
use bww::{import, split_tunes, PipelineConfig};

/// Parse a BWW bagpipe tune file and print its music model as YAML
#[derive(FromArgs)]
struct Args {
    /// input .bww file
    #[argh(positional)]
    input: String,

    /// write the YAML here instead of stdout
    #[argh(option, short = 'o')]
    output: Option<String>,

    /// pipeline configuration file (YAML)
    #[argh(option, short = 'c')]
    config: Option<String>,

    /// fail on any recoverable warning
    #[argh(switch)]
    strict: bool,

    /// do not expand embellishments
    #[argh(switch)]
    no_expand: bool,

    /// only list the tunes of the file with their byte sizes
    #[argh(switch)]
    split: bool,
}

fn main() {
    env_logger::init();
    let args: Args = argh::from_env();

    let bytes = match fs::read(&args.input) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error reading '{}': {}", args.input, e);
            process::exit(1);
        }
    };

    if args.split {
        match split_tunes(&bytes) {
            Ok(tunes) => {
                for (i, tune) in tunes.iter().enumerate() {
                    println!("{}\t{}\t{} bytes", i + 1, tune.title, tune.bytes.len());
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    let mut config = match &args.config {
        Some(path) => match PipelineConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path, e);
                process::exit(1);
            }
        },
        None => PipelineConfig::default(),
    };
    if args.strict {
        config.strict = true;
    }
    if args.no_expand {
        config.expand_embellishments = false;
    }

    let result = match import(&bytes, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Import error: {}", e);
            process::exit(1);
        }
    };
    for warning in &result.warnings {
        eprintln!("warning: {}", warning);
    }

    let yaml = match bww::yaml::to_yaml(&result.model) {
        Ok(y) => y,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match args.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &yaml) {
                eprintln!("Error writing to '{}': {}", path, e);
                process::exit(1);
            }
            eprintln!(
                "Wrote {} tune(s), {} part(s) to {}",
                result.model.tunes.len(),
                result.parts.iter().map(|p| p.len()).sum::<usize>(),
                path
            );
        }
        None => print!("{}", yaml),
    }
}
