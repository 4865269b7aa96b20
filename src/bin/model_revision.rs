/*
   Command line front-end of the model revision. It reads a model and one or more observation
   files in the fact format, checks the consistency of the model using the built-in
   enumerative oracle and prints the best repairs.

   Usage: model-revision -m MODEL [-obs FILE UPDATER]... [options]
*/

use biodivine_model_revision::diagnosis::Profile;
use biodivine_model_revision::oracle::{check_consistency, EnumerativeOracle, Optimization};
use biodivine_model_revision::repair::SearchConfig;
use biodivine_model_revision::revision::model_revision;
use biodivine_model_revision::{Network, UpdateDiscipline};
use std::process::exit;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: model-revision -m MODEL [-obs FILE UPDATER]... [options]

Options:
  -m, --model FILE             Model given as logic program facts.
  -obs, --observations FILE U  Observations together with their update discipline
                               (SteadyStateUpdater, SyncUpdater, AsyncUpdater, CompleteUpdater).
  -cc, --check-consistency     Only report the inconsistencies of the model.
  --exhaustive-search          Fall back to non-comparable functions when no comparable
                               function repairs a node.
  --first-opt                  Stop at the first optimal solution.
  --sub-opt                    Also report sub-optimal solutions.
  --show-all-functions         Report every consistent function, not only the first one.
  --no-level-compare           Do not rank non-comparable functions by their level.
  --approximate-middle         Use the approximate test of the middle of the lattice.
  --unknown-limit N            Bound on the number of unknown observed values (default 12).
  -v, --verbose N              Output format: 0 flat, 1 nested, 2 human readable (default 2).
  -d, --debug                  Print debug messages of the search.
  -h, --help                   Print this message.
";

struct Arguments {
    model: String,
    observations: Vec<(String, UpdateDiscipline)>,
    check_consistency: bool,
    verbose: usize,
    debug: bool,
    unknown_limit: Option<usize>,
    config: SearchConfig,
}

fn main() {
    let args = match parse_arguments(std::env::args().skip(1).collect()) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}\n\n{}", message, USAGE);
            exit(1);
        }
    };

    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(message) = run(&args) {
        eprintln!("ERROR: {}", message);
        exit(1);
    }
}

fn run(args: &Arguments) -> Result<(), String> {
    let model = read_file(&args.model)?;
    let mut network = Network::from_facts(&model).map_err(|e| format!("{}: {}", args.model, e))?;
    let mut profiles: Vec<Profile> = Vec::new();
    for (path, discipline) in &args.observations {
        let content = read_file(path)?;
        let read = Profile::from_facts(&mut network, &content, *discipline)
            .map_err(|e| format!("{}: {}", path, e))?;
        profiles.extend(read);
    }
    let oracle = match args.unknown_limit {
        Some(limit) => EnumerativeOracle::new(limit),
        None => EnumerativeOracle::default(),
    };

    if args.check_consistency {
        let check = check_consistency(&network, &oracle, &profiles);
        match check.optimization {
            Optimization::Consistent => println!("This network is consistent!"),
            Optimization::Unsatisfiable | Optimization::NotComputed => {
                println!("ERROR: It is not possible to repair this network for now.")
            }
            Optimization::Repairs(_) => {
                for diagnosis in &check.diagnoses {
                    println!("{}", diagnosis.to_inconsistency_summary(&network));
                }
            }
        }
        return Ok(());
    }

    let result = model_revision(&mut network, &oracle, &profiles, &args.config);
    if result.is_consistent() {
        println!("This network is consistent!");
        return Ok(());
    }
    if result.is_unrepairable() {
        println!("ERROR: It is not possible to repair this network for now.");
        return Ok(());
    }
    if result.get_best().is_none() {
        println!("### It was not possible to repair the model.");
        return Ok(());
    }

    let print_all = args.config.show_all_functions;
    for (diagnosis, optimal) in result.reported() {
        match args.verbose {
            0 | 1 => {
                let marker = if optimal { "" } else { "+" };
                let nested = args.verbose == 1;
                println!("{}{}", marker, diagnosis.to_parsable_string(&network, nested));
            }
            _ => {
                if !optimal {
                    println!("(Sub-Optimal Solution)");
                }
                print!("{}", diagnosis.to_report(&network, print_all));
            }
        }
    }
    Ok(())
}

fn read_file(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Cannot read `{}`: {}", path, e))
}

fn parse_arguments(args: Vec<String>) -> Result<Arguments, String> {
    let mut model = None;
    let mut result = Arguments {
        model: String::new(),
        observations: Vec::new(),
        check_consistency: false,
        verbose: 2,
        debug: false,
        unknown_limit: None,
        config: SearchConfig::default(),
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .ok_or_else(|| format!("Missing value of `{}`.", name))
        };
        match arg.as_str() {
            "-m" | "--model" => model = Some(value(&arg)?),
            "-obs" | "--observations" => {
                let path = value(&arg)?;
                let discipline = UpdateDiscipline::try_from(value(&arg)?.as_str())
                    .map_err(|e| e.to_string())?;
                result.observations.push((path, discipline));
            }
            "-cc" | "--check-consistency" => result.check_consistency = true,
            "--exhaustive-search" => result.config.force_optimum = true,
            "--first-opt" => result.config.all_opt = false,
            "--sub-opt" => result.config.show_sub_optimal = true,
            "--show-all-functions" => result.config.show_all_functions = true,
            "--no-level-compare" => result.config.compare_level_function = false,
            "--approximate-middle" => result.config.exact_middle_determination = false,
            "--unknown-limit" => {
                let limit = value(&arg)?;
                let limit = limit
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid unknown value limit `{}`.", limit))?;
                result.unknown_limit = Some(limit);
            }
            "-v" | "--verbose" => {
                let level = value(&arg)?;
                result.verbose = level
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid verbose level `{}`.", level))?;
            }
            "-d" | "--debug" => result.debug = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                exit(0);
            }
            other => return Err(format!("Unknown argument `{}`.", other)),
        }
    }

    result.model = model.ok_or_else(|| "Missing model file.".to_string())?;
    Ok(result)
}
