//! Command implementations for the ACVI CLI.
//!
//! This layer plays the external-collaborator roles the core crates stay
//! out of: reading climate and yield CSVs, driving the scoring pipeline,
//! and writing score/report files.

use clap::Subcommand;

pub mod analyze;
pub mod load;
pub mod score;
pub mod scores_io;
pub mod validate;

#[derive(Subcommand)]
pub enum Command {
    /// Compute ACVI scores for a directory of per-location climate CSVs
    Score {
        /// Directory of per-location daily climate CSVs (one file per
        /// location, named <id>.csv)
        #[arg(short = 'i', long)]
        input_dir: String,

        /// Output path for the scores CSV (ranked, one row per location)
        #[arg(short = 'o', long)]
        scores_csv: String,

        /// Optional output path for the full outcome as JSON
        #[arg(long)]
        scores_json: Option<String>,

        /// Crop whose thresholds drive the derived fields (wheat or maize)
        #[arg(long, default_value = "wheat")]
        crop: String,

        /// First month of the growing season (1-12)
        #[arg(long, default_value_t = 4)]
        season_start: u32,

        /// Last month of the growing season (1-12); wraps when before start
        #[arg(long, default_value_t = 9)]
        season_end: u32,
    },

    /// Run the robustness battery over a scores CSV
    Analyze {
        /// Path to a scores CSV produced by the score command
        #[arg(short = 's', long)]
        scores_csv: String,

        /// Output path for the robustness report JSON
        #[arg(short = 'o', long)]
        report_json: String,

        /// Seed for scenario perturbation and Monte Carlo noise
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of Monte Carlo trials
        #[arg(long, default_value_t = 1000)]
        trials: usize,
    },

    /// Correlate ACVI scores with an external yield-volatility table
    Validate {
        /// Path to a scores CSV produced by the score command
        #[arg(short = 's', long)]
        scores_csv: String,

        /// Yield table CSV: country,crop,mean_yield,cv_yield,detrended_cv
        #[arg(short = 'y', long)]
        yield_csv: String,

        /// Output path for the validation report JSON
        #[arg(short = 'o', long)]
        report_json: String,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Score {
            input_dir,
            scores_csv,
            scores_json,
            crop,
            season_start,
            season_end,
        } => score::run_score(
            &input_dir,
            &scores_csv,
            scores_json.as_deref(),
            &crop,
            season_start,
            season_end,
        ),
        Command::Analyze {
            scores_csv,
            report_json,
            seed,
            trials,
        } => analyze::run_analyze(&scores_csv, &report_json, seed, trials),
        Command::Validate {
            scores_csv,
            yield_csv,
            report_json,
        } => validate::run_validate(&scores_csv, &yield_csv, &report_json),
    }
}
