mod reference;
mod reports;
mod scenarios;

use anyhow::{Context, Result, ensure};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use sparks_engine::{
    ChartSpec, ChartWarning, ControlSurface, MemoryStore, Metric, ScaleInputSet, Simulator,
    SimulatorConfig,
};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use reference::ReferenceComputation;
use reports::ScenarioResult;
use scenarios::{LogicScenario, ScenarioCtx, list_scenarios, resolve};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "sparks-tester", version)]
#[command(about = "Logic scenario runner for the SpArks financial simulator")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Simulator configuration JSON (defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the chart descriptions for `--inputs` as JSON and exit
    #[arg(long)]
    dump_charts: bool,

    /// Scale factors for `--dump-charts`, e.g. `mau_scale=1.2,staff_scale=0.9`
    #[arg(long, default_value = "")]
    inputs: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;

    if args.dump_charts {
        return dump_charts(&args, config).await;
    }

    announce_banner();

    let start_time = Instant::now();
    let selected = resolve(&split_csv(&args.scenarios))?;
    let ctx = ScenarioCtx {
        config,
        verbose: args.verbose,
    };
    let results = run_scenarios(&ctx, &selected).await;
    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }
    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "📈 SpArks Scenario Tester".bright_cyan().bold());
    println!("{}", "=========================".cyan());
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn load_config(path: Option<&Path>) -> Result<SimulatorConfig> {
    let Some(path) = path else {
        log::debug!("using the default simulator configuration");
        return Ok(SimulatorConfig::default_config());
    };
    log::info!("loading configuration from {}", path.display());
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    SimulatorConfig::from_json(&json).with_context(|| format!("invalid config {}", path.display()))
}

/// Baseline factors overridden by `key=value` pairs.
fn parse_inputs(spec: &str) -> Result<ScaleInputSet> {
    let mut inputs = ScaleInputSet::baseline();
    for pair in split_csv(spec) {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("expected key=value, got {pair:?}"))?;
        let metric: Metric = key.trim().parse()?;
        let value: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("{key} is not a number: {value:?}"))?;
        ensure!(value.is_finite() && value > 0.0, "{key} must be positive, got {value}");
        inputs = inputs.with(metric, value);
    }
    Ok(inputs)
}

#[derive(Serialize)]
struct ChartDump {
    inputs: ScaleInputSet,
    input_charts: Vec<ChartSpec>,
    result_charts: Vec<ChartSpec>,
    warnings: Vec<ChartWarning>,
}

async fn dump_charts(args: &Args, config: SimulatorConfig) -> Result<()> {
    let inputs = parse_inputs(&args.inputs)?;
    log::info!("dumping charts for {} scale factors", inputs.len());
    let sim = Simulator::with_reference(config, ReferenceComputation, MemoryStore::default())
        .context("simulator setup rejected the configuration")?;
    let mut surface = ControlSurface::standard();
    surface.apply(&inputs);
    let view = sim.run(&surface).await?;
    let dump = ChartDump {
        inputs: view.inputs,
        input_charts: view.input_charts,
        result_charts: view.result_charts,
        warnings: view.warnings,
    };
    for warning in &dump.warnings {
        log::warn!("chart skipped: {warning}");
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "{}", serde_json::to_string_pretty(&dump)?)?;
    output_target.flush_inner()?;
    Ok(())
}

async fn run_scenarios(ctx: &ScenarioCtx, selected: &[LogicScenario]) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Logic Scenarios".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let mut results = Vec::with_capacity(selected.len());
    for scenario in selected {
        log::debug!("running scenario {}", scenario.key());
        let started = Instant::now();
        let outcome = scenario.run(ctx).await;
        let duration = started.elapsed();
        log::info!("scenario {} finished in {duration:?}", scenario.key());
        match &outcome {
            Ok(()) => println!("✅ {} - {duration:?}", scenario.key().green()),
            Err(err) => eprintln!("❌ {} - {duration:?}: {err:#}", scenario.key().red()),
        }
        results.push(ScenarioResult {
            scenario_name: scenario.key().to_string(),
            description: scenario.description().to_string(),
            passed: outcome.is_ok(),
            failure: outcome.err().map(|err| format!("{err:#}")),
            duration,
        });
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let generated_at = chrono::Utc::now();

    match args.report {
        ReportFormat::Json => {
            reports::generate_json_report(&mut output_target, results, generated_at)?;
        }
        ReportFormat::Markdown => {
            reports::generate_markdown_report(&mut output_target, results, generated_at)?;
        }
        ReportFormat::Console => {
            reports::generate_console_report(&mut output_target, results, start_time.elapsed())?;
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_drops_empty() {
        assert_eq!(split_csv(" a, ,b ,"), vec!["a", "b"]);
    }

    #[test]
    fn parse_inputs_accepts_wire_keys_and_control_ids() {
        let inputs = parse_inputs("mau_scale=1.2, conv_game_scale=0.8").unwrap();
        assert_eq!(inputs.get(Metric::AudienceGrowth), Some(1.2));
        assert_eq!(inputs.get(Metric::GameConversion), Some(0.8));
        assert_eq!(inputs.get(Metric::Staffing), Some(1.0));
    }

    #[test]
    fn parse_inputs_rejects_bad_pairs() {
        assert!(parse_inputs("mau_scale").is_err());
        assert!(parse_inputs("churn=1.0").is_err());
        assert!(parse_inputs("mau_scale=abc").is_err());
        assert!(parse_inputs("mau_scale=-1").is_err());
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = load_config(Some(Path::new("/nonexistent/sparks.json"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn selected_scenarios_all_pass() {
        let ctx = ScenarioCtx {
            config: SimulatorConfig::default_config(),
            verbose: false,
        };
        let results = run_scenarios(&ctx, &LogicScenario::ALL).await;
        assert!(results.iter().all(|r| r.passed), "{results:?}");
    }
}
