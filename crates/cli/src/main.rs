//! palletpack scenario runner CLI

use clap::{Parser, Subcommand, ValueEnum};
use palletpack_cli::{print_comparison, ComparisonRow, PackReport, ScenarioParser};
use palletpack_core::{Config, PlacementScoring, SortKey, Solver, Strategy};
use palletpack_engine::Packer;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pallet-pack")]
#[command(about = "Pallet loading runner for palletpack")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a scenario file and report the winning load
    Run {
        /// Path to the JSON scenario file
        file: PathBuf,

        /// Strategies to evaluate (default: all, in standard order)
        #[arg(short, long, value_enum)]
        strategies: Vec<StrategyArg>,

        /// Greedy placement scoring
        #[arg(long, value_enum, default_value = "weighted")]
        scoring: ScoringArg,

        /// Geometric tolerance
        #[arg(short, long, default_value = "0.0005")]
        epsilon: f64,

        /// Run trials one after another instead of in parallel
        #[arg(long)]
        sequential: bool,

        /// Time limit in milliseconds (0 = unlimited)
        #[arg(short, long, default_value = "0")]
        time_limit: u64,

        /// Output file for the report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for the placements (CSV)
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Run every strategy on its own and compare
    Compare {
        /// Path to the JSON scenario file
        file: PathBuf,

        /// Greedy placement scoring
        #[arg(long, value_enum, default_value = "weighted")]
        scoring: ScoringArg,
    },

    /// List strategies in evaluation order
    Strategies,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Greedy, largest volume first
    GreedyVolume,
    /// Greedy, tallest first
    GreedyHeight,
    /// Greedy, heaviest first
    GreedyWeight,
    /// Greedy, largest footprint first
    GreedyBaseArea,
    /// Greedy, densest first
    GreedyDensity,
    /// Layer by layer
    Layer,
    /// Uniform block of the dominant type, then greedy fill
    Hybrid,
    /// Best uniform grid
    Uniform,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::GreedyVolume => Strategy::SortedGreedy(SortKey::Volume),
            StrategyArg::GreedyHeight => Strategy::SortedGreedy(SortKey::Height),
            StrategyArg::GreedyWeight => Strategy::SortedGreedy(SortKey::Weight),
            StrategyArg::GreedyBaseArea => Strategy::SortedGreedy(SortKey::BaseArea),
            StrategyArg::GreedyDensity => Strategy::SortedGreedy(SortKey::Density),
            StrategyArg::Layer => Strategy::LayerBased,
            StrategyArg::Hybrid => Strategy::Hybrid,
            StrategyArg::Uniform => Strategy::UniformGrid,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ScoringArg {
    /// Low-back-left position plus wasted space
    Weighted,
    /// Sum of the empty spans around the box
    Leftover,
}

impl From<ScoringArg> for PlacementScoring {
    fn from(arg: ScoringArg) -> Self {
        match arg {
            ScoringArg::Weighted => PlacementScoring::Weighted,
            ScoringArg::Leftover => PlacementScoring::Leftover,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            strategies,
            scoring,
            epsilon,
            sequential,
            time_limit,
            output,
            csv,
        } => {
            let scenario = ScenarioParser::new().parse_file(&file)?;
            scenario.print_info();

            let mut config = Config::new()
                .with_scoring(scoring.into())
                .with_epsilon(epsilon)
                .with_parallel(!sequential)
                .with_time_limit(time_limit);
            if !strategies.is_empty() {
                config = config.with_strategies(strategies.into_iter().map(Into::into).collect());
            }

            let mut packer = Packer::with_config(scenario.pallet.clone(), config)?;
            let result = packer.solve(&scenario.packages)?;

            let report = PackReport::new(&scenario, &result);
            report.print_summary();
            report.print_trials();

            if let Some(path) = output {
                report.save_json(&path)?;
                println!("Report saved to: {}", path.display());
            }

            if let Some(path) = csv {
                report.save_csv(&path)?;
                println!("CSV saved to: {}", path.display());
            }
        }

        Commands::Compare { file, scoring } => {
            let scenario = ScenarioParser::new().parse_file(&file)?;
            scenario.print_info();

            let mut rows = Vec::new();
            for strategy in Strategy::standard_order() {
                let config = Config::new()
                    .with_scoring(scoring.into())
                    .with_strategy(strategy);
                let mut packer = Packer::with_config(scenario.pallet.clone(), config)?;
                let result = packer.solve(&scenario.packages)?;
                rows.push(ComparisonRow::from_result(strategy.name(), &result));
            }

            print_comparison(&scenario.name, &rows);
        }

        Commands::Strategies => {
            println!("Strategies (evaluation order):");
            println!("==============================");
            for (i, strategy) in Strategy::standard_order().iter().enumerate() {
                println!("  {}. {}", i + 1, strategy.name());
            }
        }
    }

    Ok(())
}
