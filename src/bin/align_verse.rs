use anyhow::{anyhow, bail, Context as _};
use clap::{ArgAction, Parser};
use paralign::{
    alignment::{greek::GreekAligner, search::align_problem},
    config::{Config, ConfigOpt},
    features::ScoringContext,
    init_logging,
    input::{load_auxiliary_data, load_gold_standard, load_words, problems_from_words},
    validate::{print_errors, validate},
};
use tracing::warn;

/// Aligns a single verse with its paraphrase and prints the edits.
#[derive(Parser, Debug)]
struct Args {
    /// Chant and verse, e.g. "1.1".
    #[arg(value_name = "CHANT.VERSE")]
    problem: String,
    #[arg(short, long, value_name = "PATH")]
    config: Option<std::path::PathBuf>,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Print the edits as JSON.
    #[arg(long)]
    json: bool,
    #[command(flatten)]
    options: ConfigOpt,
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = Config::load(args.config.as_deref(), args.options).map_err(|e| anyhow!("{e}"))?;

    let words = load_words(&config.words).context("loading words")?;
    let data = load_auxiliary_data(&config).context("loading lexical resources")?;

    let weights = if config.weights.is_empty() {
        warn!("no weights given, using 1.0 for every feature");
        vec![1.0; config.features.len()]
    } else {
        config.weights.clone()
    };

    let gold = if config.gold.as_os_str().is_empty() {
        None
    } else {
        let gold = load_gold_standard(&config.gold, &words, &config.source_tag, &config.target_tag)
            .context("loading reference alignments")?;
        gold.into_iter().find(|gold| gold.id == args.problem)
    };
    let problem = match &gold {
        Some(gold) => gold.problem.clone(),
        None => match problems_from_words(&words, &config.source_tag, &config.target_tag).remove(&args.problem) {
            Some(gold) => gold.problem,
            None => bail!("no words for verse {}", args.problem),
        },
    };

    let ctx = ScoringContext::new(&data);
    let alignment = align_problem(&problem, &GreekAligner::new(), &config.features, &weights, config.max_group, &ctx)?;
    print_errors(&validate(&alignment, &problem));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&alignment.to_json())?);
        return Ok(());
    }

    println!("{problem}");
    println!("Got: {alignment}");
    println!("Score: {}", alignment.score(&config.features, &weights, &ctx));
    if let Some(gold) = &gold {
        println!("Expected: {}", gold.alignment);
        println!("Edit accuracy: {}", alignment.edits_accuracy(&gold.alignment));
    }
    Ok(())
}

fn main() {
    if let Err(e) = try_main() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
