//! Named logic scenarios exercised against the engine with in-process collaborators.
use anyhow::{Context, Result, bail, ensure};
use sparks_engine::{
    BaselineCatalog, ChartId, ComputationResponse, ComputationResult, ControlSurface, MemoryStore,
    Metric, ResultChartKind, ResultMetric, SaveFailure, ScaleInputSet, ScenarioError,
    Simulator, SimulatorConfig, StoredScenario, StubComputation, Tone, build_input_chart, collect,
    project,
};

use crate::reference::ReferenceComputation;

const TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicScenario {
    ProjectionIdentity,
    PhasePartition,
    BandCoverage,
    SaveLoadRoundTrip,
    IdempotentLoad,
    SustainabilityFill,
    EmptyNameSave,
    MissingScenario,
    ForeignKeys,
    ReferenceRun,
}

impl LogicScenario {
    pub const ALL: [Self; 10] = [
        Self::ProjectionIdentity,
        Self::PhasePartition,
        Self::BandCoverage,
        Self::SaveLoadRoundTrip,
        Self::IdempotentLoad,
        Self::SustainabilityFill,
        Self::EmptyNameSave,
        Self::MissingScenario,
        Self::ForeignKeys,
        Self::ReferenceRun,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ProjectionIdentity => "projection-identity",
            Self::PhasePartition => "phase-partition",
            Self::BandCoverage => "band-coverage",
            Self::SaveLoadRoundTrip => "save-load-round-trip",
            Self::IdempotentLoad => "idempotent-load",
            Self::SustainabilityFill => "sustainability-fill",
            Self::EmptyNameSave => "empty-name-save",
            Self::MissingScenario => "missing-scenario",
            Self::ForeignKeys => "foreign-keys",
            Self::ReferenceRun => "reference-run",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ProjectionIdentity => "Scaled series equal baseline x scale x unit for every metric",
            Self::PhasePartition => "Phased ranges cover every year exactly once",
            Self::BandCoverage => "Classified metrics draw one band per interval, others none",
            Self::SaveLoadRoundTrip => "Saved scale factors reload into equal control values",
            Self::IdempotentLoad => "Loading the same scenario twice yields the same controls",
            Self::SustainabilityFill => "Profit below the threshold fills red, above fills green",
            Self::EmptyNameSave => "Saving without a name fails before reaching the store",
            Self::MissingScenario => "Loading an unknown name leaves all controls untouched",
            Self::ForeignKeys => "Stored keys the controls do not know are ignored",
            Self::ReferenceRun => "A full run against the reference projection builds every view",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    /// # Errors
    ///
    /// Describes the first violated expectation.
    pub async fn run(self, ctx: &ScenarioCtx) -> Result<()> {
        match self {
            Self::ProjectionIdentity => projection_identity(ctx),
            Self::PhasePartition => phase_partition(ctx),
            Self::BandCoverage => band_coverage(ctx),
            Self::SaveLoadRoundTrip => save_load_round_trip(ctx).await,
            Self::IdempotentLoad => idempotent_load(ctx).await,
            Self::SustainabilityFill => sustainability_fill(ctx).await,
            Self::EmptyNameSave => empty_name_save(ctx).await,
            Self::MissingScenario => missing_scenario(ctx).await,
            Self::ForeignKeys => foreign_keys(ctx).await,
            Self::ReferenceRun => reference_run(ctx).await,
        }
    }
}

/// Shared inputs for every scenario run.
pub struct ScenarioCtx {
    pub config: SimulatorConfig,
    pub verbose: bool,
}

impl ScenarioCtx {
    fn catalog(&self) -> &'static BaselineCatalog {
        BaselineCatalog::reference()
    }

    fn simulator<C>(&self, service: C, store: MemoryStore) -> Result<Simulator<C, MemoryStore>>
    where
        C: sparks_engine::ComputationService,
    {
        Simulator::with_reference(self.config.clone(), service, store)
            .context("simulator setup rejected the configuration")
    }

    fn note(&self, message: &str) {
        if self.verbose {
            println!("   {message}");
        }
    }
}

/// Every `(scenario key, description)` pair.
#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    LogicScenario::ALL
        .iter()
        .map(|s| (s.key(), s.description()))
        .collect()
}

/// Resolve comma-separated keys; `all` expands to every scenario.
///
/// # Errors
///
/// Names the first unknown key.
pub fn resolve(keys: &[String]) -> Result<Vec<LogicScenario>> {
    if keys.iter().any(|k| k == "all") {
        return Ok(LogicScenario::ALL.to_vec());
    }
    keys.iter()
        .map(|key| {
            LogicScenario::from_key(key).with_context(|| format!("unknown scenario: {key}"))
        })
        .collect()
}

fn sample_surface() -> ControlSurface {
    let mut surface = ControlSurface::standard();
    surface.set_input(Metric::AudienceGrowth, "1.25");
    surface.set_input(Metric::MarketingSpend, "0.7");
    surface.set_input(Metric::ServiceHardwareCoefficient, "1.1");
    surface
}

fn projection_identity(ctx: &ScenarioCtx) -> Result<()> {
    let catalog = ctx.catalog();
    for metric in Metric::ALL {
        for scale in [0.5, 1.0, 1.37] {
            let inputs = ScaleInputSet::baseline().with(metric, scale);
            let series = project(catalog, metric, &inputs, metric.unit_factor())?;
            for (i, base) in catalog.baseline(metric).values().iter().enumerate() {
                let expected = base * scale * metric.unit_factor();
                ensure!(
                    (series.scaled[i] - expected).abs() <= TOLERANCE * expected.abs().max(1.0),
                    "{metric} year {}: {} != {expected}",
                    i + 1,
                    series.scaled[i]
                );
            }
        }
    }
    Ok(())
}

fn phase_partition(ctx: &ScenarioCtx) -> Result<()> {
    let catalog = ctx.catalog();
    let years = catalog.years();
    for metric in Metric::ALL {
        let Some(range) = catalog.range(metric) else {
            continue;
        };
        for year in years.iter() {
            ensure!(
                range.bounds_for(year).is_some(),
                "{metric} has no bounds for year {year}"
            );
        }
        let intervals = range.intervals(years.first(), years.last());
        ensure!(!intervals.is_empty(), "{metric} has no intervals");
        ensure!(intervals[0].first_year == years.first(), "{metric} starts late");
        for pair in intervals.windows(2) {
            ensure!(
                pair[0].last_year + 1 == pair[1].first_year,
                "{metric} intervals overlap or leave a gap at {}",
                pair[0].last_year
            );
        }
        ensure!(
            intervals.last().map(|i| i.last_year) == Some(years.last()),
            "{metric} ends early"
        );
        ctx.note(&format!("{metric}: {} interval(s)", intervals.len()));
    }
    Ok(())
}

fn band_coverage(ctx: &ScenarioCtx) -> Result<()> {
    let catalog = ctx.catalog();
    let years = catalog.years();
    let inputs = ScaleInputSet::baseline();
    for metric in Metric::ALL {
        let spec = build_input_chart(catalog, metric, &inputs)?;
        let expected = catalog
            .range(metric)
            .map_or(0, |r| r.intervals(years.first(), years.last()).len());
        ensure!(
            spec.bands.len() == expected,
            "{metric}: {} bands for {expected} intervals",
            spec.bands.len()
        );
    }
    Ok(())
}

async fn save_load_round_trip(ctx: &ScenarioCtx) -> Result<()> {
    let sim = ctx.simulator(ReferenceComputation, MemoryStore::default())?;
    let original = sample_surface();
    let saved = sim.save("round-trip", &original).await?;

    let mut fresh = ControlSurface::standard();
    sim.load("round-trip", &mut fresh).await?;
    let reloaded = collect(&fresh)?;
    ensure!(
        reloaded.approx_eq(&saved, TOLERANCE),
        "reloaded {reloaded:?} differs from saved {saved:?}"
    );
    Ok(())
}

async fn idempotent_load(ctx: &ScenarioCtx) -> Result<()> {
    let sim = ctx.simulator(ReferenceComputation, MemoryStore::default())?;
    sim.save("twice", &sample_surface()).await?;
    let mut surface = ControlSurface::standard();
    sim.load("twice", &mut surface).await?;
    let first = surface.values();
    sim.load("twice", &mut surface).await?;
    ensure!(surface.values() == first, "second load changed the controls");
    Ok(())
}

async fn sustainability_fill(ctx: &ScenarioCtx) -> Result<()> {
    let result = ComputationResult::default()
        .with_column(ResultMetric::Years, vec![1.0, 2.0])
        .with_column(ResultMetric::Profit, vec![-1e6, 6e6]);
    let stub = StubComputation::returning(ComputationResponse::new(result));
    let sim = ctx.simulator(stub.clone(), MemoryStore::default())?;
    let view = sim.run(&ControlSurface::standard()).await?;

    ensure!(
        stub.requests() == vec![ScaleInputSet::baseline()],
        "submitted inputs were not the unit vector"
    );
    let chart = view
        .result_charts
        .iter()
        .find(|c| c.id == ChartId::Result(ResultChartKind::Sustainability))
        .context("sustainability chart missing")?;
    let tones: Vec<Tone> = chart.bands.iter().map(|b| b.tone).collect();
    ensure!(
        tones == vec![Tone::Red, Tone::Green],
        "expected red then green fill, got {tones:?}"
    );
    Ok(())
}

async fn empty_name_save(ctx: &ScenarioCtx) -> Result<()> {
    let store = MemoryStore::default();
    let sim = ctx.simulator(ReferenceComputation, store.clone())?;
    for name in ["", "   "] {
        match sim.save(name, &ControlSurface::standard()).await {
            Err(ScenarioError::SaveFailed(SaveFailure::EmptyName)) => {}
            other => bail!("save({name:?}) returned {other:?}"),
        }
    }
    ensure!(store.save_calls() == 0, "store was called {} time(s)", store.save_calls());
    Ok(())
}

async fn missing_scenario(ctx: &ScenarioCtx) -> Result<()> {
    let sim = ctx.simulator(ReferenceComputation, MemoryStore::default())?;
    let mut surface = sample_surface();
    let before = surface.values();
    match sim.load("ghost", &mut surface).await {
        Err(ScenarioError::LoadNotFound(name)) if name == "ghost" => {}
        other => bail!("load(ghost) returned {other:?}"),
    }
    ensure!(surface.values() == before, "controls changed after a failed load");
    ensure!(before.len() == Metric::COUNT, "expected all controls present");
    Ok(())
}

async fn foreign_keys(ctx: &ScenarioCtx) -> Result<()> {
    let store = MemoryStore::default();
    store.insert(
        "legacy",
        StoredScenario::default()
            .with_entry("conv_game_scale", 1.2)
            .with_entry("name", "legacy")
            .with_entry("churn_scale", 0.9),
    );
    let sim = ctx.simulator(ReferenceComputation, store)?;
    let mut surface = ControlSurface::standard();
    let report = sim.load("legacy", &mut surface).await?;
    ensure!(
        report.applied == vec![Metric::GameConversion],
        "applied {:?}",
        report.applied
    );
    ensure!(report.ignored.len() == 2, "ignored {:?}", report.ignored);
    ensure!(
        collect(&surface)?.get(Metric::GameConversion) == Some(1.2),
        "control id key did not rehydrate"
    );
    Ok(())
}

async fn reference_run(ctx: &ScenarioCtx) -> Result<()> {
    let sim = ctx.simulator(ReferenceComputation, MemoryStore::default())?;
    let view = sim.run(&sample_surface()).await?;
    ensure!(
        view.input_charts.len() == Metric::COUNT,
        "{} input charts",
        view.input_charts.len()
    );
    ensure!(
        view.warnings.is_empty(),
        "unexpected warnings: {:?}",
        view.warnings
    );
    ensure!(
        view.result_charts.len() == ResultChartKind::ALL.len(),
        "{} result charts",
        view.result_charts.len()
    );
    ensure!(view.signals.is_some(), "reference projection reports signals");
    ctx.note(&format!(
        "{} input / {} result charts",
        view.input_charts.len(),
        view.result_charts.len()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for scenario in LogicScenario::ALL {
            assert_eq!(LogicScenario::from_key(scenario.key()), Some(scenario));
        }
    }

    #[test]
    fn resolve_expands_all_and_rejects_unknown() {
        assert_eq!(resolve(&["all".into()]).unwrap().len(), LogicScenario::ALL.len());
        assert!(resolve(&["nope".into()]).is_err());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn every_scenario_passes_on_defaults() {
        let ctx = ScenarioCtx {
            config: SimulatorConfig::default_config(),
            verbose: false,
        };
        for scenario in LogicScenario::ALL {
            scenario
                .run(&ctx)
                .await
                .unwrap_or_else(|err| panic!("{}: {err:#}", scenario.key()));
        }
    }
}
