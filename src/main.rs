//! Query Templates CLI
//!
//! Usage:
//!   query-templates [OPTIONS] [TEMPLATE]
//!
//! Options:
//!   -d, --dir <DIR>          Template directory (default: templates)
//!   -p, --param <KEY=VALUE>  Substitution value (repeatable)
//!   -c, --params <FILE>      Substitution values from a TOML file
//!       --show-params        Print declared directive parameters and exit
//!   -h, --help               Print help

use std::collections::HashMap;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use query_templates::{extract_params, materialize, ParamSet, TemplateStore};

#[derive(Parser)]
#[command(name = "query-templates")]
#[command(about = "Materialize annotated SQL query templates")]
struct Cli {
    /// Template name, loaded as <dir>/<name>.sql (reads template text from
    /// stdin if not provided)
    template: Option<String>,

    /// Template directory
    #[arg(short, long, default_value = "templates")]
    dir: PathBuf,

    /// Substitution value as key=value (may be repeated)
    #[arg(short, long = "param", value_name = "KEY=VALUE")]
    param: Vec<String>,

    /// TOML file with a [params] table of substitution values
    #[arg(short = 'c', long = "params", value_name = "FILE")]
    params: Option<PathBuf>,

    /// Print the template's declared directive parameters and exit
    #[arg(long)]
    show_params: bool,
}

fn main() {
    let cli = Cli::parse();

    // If no template and stdin is a terminal (interactive), show help
    if cli.template.is_none() && io::stdin().is_terminal() {
        eprintln!("No template given and stdin is a terminal; see --help");
        std::process::exit(2);
    }

    // Read the template text
    let source = match &cli.template {
        Some(name) => {
            let store = TemplateStore::new(&cli.dir);
            match store.load(name) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    if cli.show_params {
        let mut declared: Vec<(String, String)> = extract_params(&source).into_iter().collect();
        declared.sort();
        for (key, value) in declared {
            println!("{}: {}", key, value);
        }
        return;
    }

    // Value precedence: directive defaults < params file < -p flags.
    // Directive defaults are applied inside materialize.
    let mut values: HashMap<String, String> = HashMap::new();

    if let Some(path) = &cli.params {
        match ParamSet::from_file(path) {
            Ok(set) => values.extend(set.values),
            Err(e) => {
                eprintln!("Error loading params file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    for pair in &cli.param {
        match pair.split_once('=') {
            Some((key, value)) => {
                values.insert(key.to_string(), value.to_string());
            }
            None => {
                eprintln!("Error: invalid --param '{}', expected key=value", pair);
                std::process::exit(1);
            }
        }
    }

    match materialize(&source, &values) {
        Ok(query) => {
            println!("{}", query);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
