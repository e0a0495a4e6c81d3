//! CrudeLab CLI — recommendation, blending, and reference inspection.
//!
//! Commands:
//! - `recommend`: nearest historical situation and its action for a query
//! - `blend`: weighted prediction/technical/sentiment decision
//! - `compare`: cosine plus distance metrics against every situation
//! - `batch`: recommend for every row of a CSV query file
//! - `library`: list reference situations and actions

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

use crudelab_core::blend::{BlendOutcome, BlendWeights, InputPolicy, SignalBlender};
use crudelab_core::distance::{compare, DEFAULT_MINKOWSKI_P};
use crudelab_core::domain::ComponentReading;
use crudelab_core::normalize::Trend;
use crudelab_core::{FeatureVector, ReferenceData, SimilarityResult};
use crudelab_runner::{
    load_queries_csv, load_reference, run_advice, run_batch, save_artifacts, write_batch_csv,
    AdviceConfig, AdviceResult, ReferenceConfig, SignalsConfig,
};

#[derive(Parser)]
#[command(
    name = "crudelab",
    about = "CrudeLab CLI — similarity-based crude oil trading recommendations"
)]
struct Cli {
    /// Log at DEBUG instead of INFO.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend an action from the most similar historical situation.
    Recommend {
        /// Path to a TOML advice config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Query vector, comma separated (e.g. "0.35,0.75,0.25,0.45,0.85,0.70").
        #[arg(long, allow_hyphen_values = true)]
        vector: Option<String>,

        /// Seed TOML with situations and actions. Defaults to the built-in set.
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Flag results whose best match scores below this similarity.
        #[arg(long, allow_negative_numbers = true)]
        min_similarity: Option<f64>,

        /// Print the full result as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Save recommendation.json and ranking.csv under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Blend normalized (or raw) signals into a five-level decision.
    Blend {
        /// Normalized prediction signal in [0, 1].
        #[arg(long)]
        prediction: Option<f64>,

        /// Normalized technical signal in [0, 1].
        #[arg(long)]
        technical: Option<f64>,

        /// Normalized sentiment signal in [0, 1].
        #[arg(long)]
        sentiment: Option<f64>,

        /// Raw forecast change in percent (e.g. -3.5).
        #[arg(long, allow_negative_numbers = true)]
        forecast_pct: Option<f64>,

        /// Raw sentiment compound score in [-1, 1].
        #[arg(long, allow_negative_numbers = true)]
        sentiment_compound: Option<f64>,

        /// Raw trend: up, down or sideways.
        #[arg(long)]
        trend: Option<String>,

        /// How out-of-range normalized signals are treated.
        #[arg(long, value_enum, default_value_t = PolicyArg::PassThrough)]
        policy: PolicyArg,

        /// Print the outcome as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Compare a query against every situation with all metrics.
    Compare {
        /// Query vector, comma separated.
        #[arg(long, allow_hyphen_values = true)]
        vector: String,

        /// Seed TOML. Defaults to the built-in set.
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Minkowski order (>= 1).
        #[arg(long, default_value_t = DEFAULT_MINKOWSKI_P)]
        p: f64,
    },
    /// Recommend for every query in a CSV file (`id,v1,...,vn`).
    Batch {
        /// Input CSV with a header row.
        #[arg(long)]
        input: PathBuf,

        /// Output CSV.
        #[arg(long)]
        output: PathBuf,

        /// Seed TOML. Defaults to the built-in set.
        #[arg(long)]
        reference: Option<PathBuf>,
    },
    /// List reference situations, actions, and the tables' fingerprint.
    Library {
        /// Seed TOML. Defaults to the built-in set.
        #[arg(long)]
        reference: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    PassThrough,
    Clamp,
    Reject,
}

impl From<PolicyArg> for InputPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::PassThrough => InputPolicy::PassThrough,
            PolicyArg::Clamp => InputPolicy::Clamp,
            PolicyArg::Reject => InputPolicy::Reject,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Recommend {
            config,
            vector,
            reference,
            min_similarity,
            json,
            output_dir,
        } => run_recommend(
            config,
            vector,
            reference,
            min_similarity,
            json,
            output_dir,
        ),
        Commands::Blend {
            prediction,
            technical,
            sentiment,
            forecast_pct,
            sentiment_compound,
            trend,
            policy,
            json,
        } => {
            let trend = trend
                .map(|t| t.parse::<Trend>())
                .transpose()
                .map_err(anyhow::Error::msg)?;
            let signals = SignalsConfig {
                prediction,
                technical,
                sentiment,
                forecast_pct_change: forecast_pct,
                sentiment_compound,
                trend,
            };
            run_blend(&signals, policy.into(), json)
        }
        Commands::Compare {
            vector,
            reference,
            p,
        } => run_compare(&vector, reference, p),
        Commands::Batch {
            input,
            output,
            reference,
        } => run_batch_cmd(&input, &output, reference),
        Commands::Library { reference } => run_library(reference),
    }
}

fn run_recommend(
    config: Option<PathBuf>,
    vector: Option<String>,
    reference: Option<PathBuf>,
    min_similarity: Option<f64>,
    json: bool,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let mut advice = match (config, vector) {
        (Some(_), Some(_)) => bail!("--config and --vector are mutually exclusive"),
        (None, None) => bail!("one of --config or --vector is required"),
        (Some(path), None) => AdviceConfig::from_file(&path)?,
        (None, Some(v)) => AdviceConfig::for_query(parse_vector(&v)?),
    };

    // Command-line flags win over the config file.
    if reference.is_some() {
        advice.reference.path = reference;
    }
    if min_similarity.is_some() {
        advice.min_similarity = min_similarity;
    }

    let result = run_advice(&advice)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(&result, &dir)?;
        eprintln!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn run_blend(signals: &SignalsConfig, policy: InputPolicy, json: bool) -> Result<()> {
    let signals = signals.resolve()?;
    let outcome = SignalBlender::new(BlendWeights::default(), policy).blend(signals)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_blend(&outcome);
    }
    Ok(())
}

fn run_compare(vector: &str, reference: Option<PathBuf>, p: f64) -> Result<()> {
    let query = parse_vector(vector)?;
    let reference = load_reference(&ReferenceConfig { path: reference })?;
    let rows = compare(query.as_slice(), reference.library(), p)?;

    println!();
    println!(
        "{:<w$} {:>10} {:>10} {:>10} {:>10}",
        "Situation",
        "Cosine",
        "Manhattan",
        "Euclidean",
        format!("Mink(p={p})"),
        w = ID_WIDTH
    );
    println!("{}", "-".repeat(ID_WIDTH + 44));
    for r in &rows {
        println!(
            "{:<w$} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
            r.situation_id.as_str(),
            r.cosine,
            r.manhattan,
            r.euclidean,
            r.minkowski,
            w = ID_WIDTH
        );
    }
    println!();
    Ok(())
}

fn run_batch_cmd(input: &Path, output: &Path, reference: Option<PathBuf>) -> Result<()> {
    let reference = load_reference(&ReferenceConfig { path: reference })?;
    let queries = load_queries_csv(input)?;
    if queries.is_empty() {
        bail!("no queries in {}", input.display());
    }

    let rows = run_batch(&queries, &reference);
    write_batch_csv(&rows, output)?;

    let failed = rows.iter().filter(|r| !r.is_ok()).count();
    println!(
        "Wrote {} row(s) to {} ({} failed)",
        rows.len(),
        output.display(),
        failed
    );
    Ok(())
}

fn run_library(reference: Option<PathBuf>) -> Result<()> {
    let reference = load_reference(&ReferenceConfig { path: reference })?;
    print_library(&reference);
    Ok(())
}

/// Parses "a,b,c" (whitespace tolerated) into a query vector.
fn parse_vector(text: &str) -> Result<FeatureVector> {
    let values = text
        .split(',')
        .map(|s| {
            let s = s.trim();
            s.parse::<f64>()
                .with_context(|| format!("invalid vector component '{s}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    if values.is_empty() {
        bail!("vector is empty");
    }
    Ok(FeatureVector::new(values))
}

/// Column width for situation ids; the longest built-in id has 28 characters.
const ID_WIDTH: usize = 30;

fn component_line(c: &ComponentReading) -> String {
    format!("{:<22} {:>6.2}  {}", c.name, c.value, c.level)
}

fn ranking_line(rank: usize, r: &SimilarityResult) -> String {
    format!(
        "{:>2}. {:<w$} {:.4}",
        rank,
        r.situation_id.as_str(),
        r.score,
        w = ID_WIDTH
    )
}

fn short(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

fn print_summary(result: &AdviceResult) {
    let rec = &result.recommendation;
    println!();
    println!("=== Recommendation ===");
    if !result.description.is_empty() {
        println!("Scenario:       {}", result.description);
    }
    println!("Query:          {}", result.query);
    println!(
        "Best match:     {} ({}): {}",
        rec.matched.id, rec.matched.date, rec.matched.description
    );
    println!("Similarity:     {:.4}", rec.similarity);
    println!();
    println!("--- Action ---");
    println!("Action:         {} [{}]", rec.action.label, rec.action.id);
    println!("Level:          {}", rec.action.level);
    println!("Risk:           {}", rec.action.risk);
    println!("Horizon:        {}", rec.action.horizon);
    println!("Rationale:      {}", rec.action.rationale);
    println!();
    println!("--- Components ---");
    for c in &result.breakdown {
        println!("{}", component_line(c));
    }
    println!();
    println!("--- Ranking ---");
    for (i, r) in rec.ranking.iter().enumerate() {
        println!("{}", ranking_line(i + 1, r));
    }
    if let Some(blend) = &result.blend {
        println!();
        print_blend(blend);
    }
    if result.below_threshold {
        println!();
        println!(
            "WARNING: best match {:.4} is below min similarity {:.4}",
            rec.similarity,
            result.min_similarity.unwrap_or_default()
        );
    }
    println!();
    println!("Run id:         {}", short(&result.run_id));
    println!("Reference:      {}", short(&result.reference_fingerprint));
    println!();
}

fn print_blend(outcome: &BlendOutcome) {
    println!("--- Blended Signal ---");
    println!("Prediction:     {:.3}", outcome.signals.prediction);
    println!("Technical:      {:.3}", outcome.signals.technical);
    println!("Sentiment:      {:.3}", outcome.signals.sentiment);
    println!("Score:          {:.3}", outcome.score);
    println!("Decision:       {}", outcome.action);
    println!("Risk:           {}", outcome.risk);
}

fn print_library(reference: &ReferenceData) {
    let library = reference.library();
    let catalog = reference.catalog();

    println!();
    println!("Situations: {}", library.len());
    println!(
        "{:<w$} {:<12} {:<20} Description",
        "Id",
        "Date",
        "Outcome",
        w = ID_WIDTH
    );
    println!("{}", "-".repeat(ID_WIDTH + 58));
    for s in library.all_situations() {
        println!(
            "{:<w$} {:<12} {:<20} {}",
            s.id.as_str(),
            s.date.to_string(),
            s.outcome.as_str(),
            s.description,
            w = ID_WIDTH
        );
    }
    println!();
    println!("Actions: {}", catalog.len());
    println!("{:<20} {:<22} {:<12} {:<12} Horizon", "Id", "Label", "Level", "Risk");
    println!("{}", "-".repeat(80));
    for a in catalog.all_actions() {
        println!(
            "{:<20} {:<22} {:<12} {:<12} {}",
            a.id.as_str(),
            a.label,
            a.level.to_string(),
            a.risk.to_string(),
            a.horizon
        );
    }
    println!();
    println!("Fingerprint: {}", reference.fingerprint());
    println!();
}
