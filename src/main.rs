use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use nifty_momentum::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nifty-momentum")]
#[command(about = "Prior-month momentum stock selection against a market benchmark", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run the selection and compare it with the benchmark
    Run {
        //json configuration file; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        //start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        //end date, exclusive (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        //any date in the month whose strategy is wanted
        #[arg(long)]
        reference_date: Option<NaiveDate>,

        //investment amount
        #[arg(long)]
        amount: Option<f64>,

        //amount transform (growth, magnify)
        #[arg(long)]
        transform: Option<String>,

        //benchmark symbol (eg ^NSEI)
        #[arg(long)]
        benchmark: Option<String>,

        //suffix appended to listed symbols (eg .NS)
        #[arg(long)]
        suffix: Option<String>,

        //directory of <symbol>.csv price files instead of yahoo finance
        #[arg(long)]
        prices_dir: Option<PathBuf>,

        //name,symbol csv instead of the wikipedia listing
        #[arg(long)]
        constituents_csv: Option<PathBuf>,

        //skip constituents whose prices cannot be loaded
        #[arg(long)]
        skip_failed: bool,

        //output path for the aligned comparison csv
        #[arg(long)]
        output_csv: Option<PathBuf>,

        //output path for the comparison chart svg
        #[arg(long)]
        output_svg: Option<PathBuf>,
    },

    //show per-date figures for one instrument
    Inspect {
        //market symbol (eg RELIANCE.NS)
        #[arg(long)]
        symbol: String,

        #[arg(long)]
        start: NaiveDate,

        //exclusive
        #[arg(long)]
        end: NaiveDate,

        //date to inspect
        #[arg(long)]
        date: NaiveDate,

        //lookback for the n-day return, in trading days
        #[arg(long, default_value = "5")]
        n: usize,

        //directory of <symbol>.csv price files instead of yahoo finance
        #[arg(long)]
        prices_dir: Option<PathBuf>,
    },

    //write the default configuration to a json file
    InitConfig {
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            start,
            end,
            reference_date,
            amount,
            transform,
            benchmark,
            suffix,
            prices_dir,
            constituents_csv,
            skip_failed,
            output_csv,
            output_svg,
        } => {
            let mut analysis = match config {
                Some(path) => AnalysisConfig::from_json_file(&path)
                    .context(format!("Failed to load config from {:?}", path))?,
                None => AnalysisConfig::default(),
            };

            if let Some(start) = start {
                analysis.start_date = start;
            }
            if let Some(end) = end {
                analysis.end_date = end;
            }
            if let Some(reference_date) = reference_date {
                analysis.reference_date = reference_date;
            }
            if amount.is_some() {
                analysis.amount = amount;
            }
            if let Some(name) = transform {
                analysis.transform = AmountTransform::parse(&name)
                    .ok_or_else(|| anyhow::anyhow!("Unknown transform: {}", name))?;
            }
            if let Some(benchmark) = benchmark {
                analysis.benchmark_symbol = benchmark;
            }
            if let Some(suffix) = suffix {
                analysis.symbol_suffix = suffix;
            }
            if prices_dir.is_some() {
                analysis.prices_dir = prices_dir;
            }
            if constituents_csv.is_some() {
                analysis.constituents_csv = constituents_csv;
            }
            if skip_failed {
                analysis.skip_failed_constituents = true;
            }
            if output_csv.is_some() {
                analysis.output_csv = output_csv;
            }
            if output_svg.is_some() {
                analysis.output_svg = output_svg;
            }

            run_analysis(&analysis)?;
        }
        Commands::Inspect {
            symbol,
            start,
            end,
            date,
            n,
            prices_dir,
        } => {
            inspect(&symbol, start, end, date, n, prices_dir)?;
        }
        Commands::InitConfig { path } => {
            AnalysisConfig::default()
                .to_json_file(&path)
                .context(format!("Failed to write config to {:?}", path))?;
            println!("Default configuration written to {:?}", path);
        }
    }

    Ok(())
}

fn run_analysis(config: &AnalysisConfig) -> Result<()> {
    println!("Stock Performance Analysis");
    println!("==========================\n");

    config.validate().context("Invalid configuration")?;

    let engine = AnalysisEngine::from_config(config).context("Failed to set up data sources")?;
    let report = engine.run(config).context(format!(
        "Analysis failed for {} to {} (reference date {})",
        config.start_date, config.end_date, config.reference_date
    ))?;

    TablePresenter::new().present(&report)?;

    if let Some(path) = &config.output_csv {
        CsvPresenter::new(path).present(&report)?;
        if report.comparison.view().is_some() {
            println!("\nComparison saved to {:?}", path);
        }
    }

    if let Some(path) = &config.output_svg {
        SvgChartPresenter::new(path).present(&report)?;
        if report.comparison.view().is_some() {
            println!("Chart saved to {:?}", path);
        }
    }

    Ok(())
}

fn inspect(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    date: NaiveDate,
    n: usize,
    prices_dir: Option<PathBuf>,
) -> Result<()> {
    let range = DateRange::new(start, end)?;

    let fetcher: Box<dyn MarketDataFetcher> = match prices_dir {
        Some(dir) => Box::new(CsvFetcher::new(dir)),
        None => Box::new(YahooFetcher::new()?),
    };

    let samples = fetcher
        .fetch(symbol, range)
        .context(format!("Failed to fetch {} for {}", symbol, range))?;
    let series = PriceSeries::new(symbol, range, samples)?;

    println!("{} on {} ({} trading days loaded)", symbol, date, series.len());

    let rows: [(String, Lookup<f64>); 5] = [
        ("Close".to_string(), series.price_at(date)),
        ("Daily return %".to_string(), series.daily_return(date)),
        (format!("{}-day return %", n), series.n_day_return(n, date)),
        ("Close 30 trading days ago".to_string(), series.trailing_30_price(date)),
        ("Cumulative return %".to_string(), series.cumulative_return(date)),
    ];

    for (label, lookup) in rows {
        match lookup.reason() {
            None => println!("  {:<28} {:.2}", label, lookup),
            Some(reason) => println!("  {:<28} {} ({})", label, lookup, reason),
        }
    }

    Ok(())
}
