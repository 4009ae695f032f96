use anyhow::{anyhow, bail, Context as _};
use clap::{ArgAction, Parser};
use paralign::{
    alignment::{greek::GreekAligner, json::JsonEdit, search::align_problem},
    config::{Config, ConfigOpt},
    evaluation::evaluate,
    init_logging,
    input::{load_auxiliary_data, load_gold_standard, load_words, split_gold},
    learning::learn,
    report::RunReport,
    validate::{print_errors, validate},
};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{stdout, BufWriter};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// Learns feature weights from reference alignments of verses and their paraphrase, then
/// measures how well the learned weights align the held-out verses.
#[derive(Parser, Debug)]
struct Args {
    /// Config file [default: <config dir>/paralign/config.toml]
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// More logging; repeat for more detail.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[command(flatten)]
    options: ConfigOpt,
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = Config::load(args.config.as_deref(), args.options).map_err(|e| anyhow!("{e}"))?;

    if config.words.is_empty() {
        bail!("no word tables given (--words)");
    }
    if config.gold.as_os_str().is_empty() {
        bail!("no reference alignments given (--gold)");
    }

    let words = load_words(&config.words).context("loading words")?;
    let data = load_auxiliary_data(&config).context("loading lexical resources")?;
    let gold = load_gold_standard(&config.gold, &words, &config.source_tag, &config.target_tag)
        .context("loading reference alignments")?;
    let (training, test) = split_gold(gold, config.split);
    info!(training = training.len(), test = test.len(), "split reference alignments");

    let aligner = GreekAligner::new();
    let features = &config.features;

    let (weights, learn_time) = if config.weights.is_empty() {
        let start = Instant::now();
        let outcome = learn(&training, &config.learn_params(), features, &data, |problem, weights, ctx| {
            align_problem(problem, &aligner, features, weights, config.max_group, ctx)
        })?;
        (outcome.weights, start.elapsed())
    } else if config.weights.len() != features.len() {
        bail!("{} weights given for {} features", config.weights.len(), features.len());
    } else {
        (config.weights.clone(), Duration::ZERO)
    };

    let evaluation = evaluate(&test, &aligner, features, &weights, config.max_group, &data)?;
    for (gold, result) in test.iter().zip(&evaluation.problems) {
        print_errors(&validate(&result.predicted, &gold.problem));
    }

    let report = RunReport {
        features: features.clone(),
        weights,
        split: config.split,
        training_problems: training.len(),
        test_problems: test.len(),
        edit_accuracy: evaluation.mean_edit_accuracy(),
        score_accuracy: evaluation.mean_score_accuracy(),
        learn_time,
        align_time: evaluation.elapsed,
    };
    report.print(&mut stdout())?;

    if !config.log_file.as_os_str().is_empty() {
        let index = report
            .append_tsv(&config.log_file)
            .with_context(|| format!("writing {}", config.log_file.display()))?;
        info!(index, path = %config.log_file.display(), "appended run to log");
    }

    if !config.output_json.as_os_str().is_empty() {
        let predictions: BTreeMap<&str, Vec<JsonEdit>> = evaluation
            .problems
            .iter()
            .map(|result| (result.id.as_str(), result.predicted.to_json()))
            .collect();
        let file = File::create(&config.output_json)
            .with_context(|| format!("creating {}", config.output_json.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &predictions)?;
    }

    Ok(())
}

fn main() {
    // Returning Result from main() would print the error with Debug, not Display.
    if let Err(e) = try_main() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
