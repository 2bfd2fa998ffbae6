//! Async pipeline entry points.
//!
//! Heavy density work runs on tokio's blocking pool. Each invocation owns an
//! [`AbortSignal`]; dropping the returned future raises it so offloaded work
//! stops at its next checkpoint and nothing is published.

use std::time::Instant;

use density_map::{DensityMap, DensityPreferences};
use graft_plan::{DensityEstimator, GraftAllocator, GraftCalculation, GraftPreferences};
use scan_measure::{MeasurementEngine, MeasurementRegion, Measurements, RegionDetector};
use scan_types::{AbortSignal, DensityPoint, ScanMesh};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::density::analyze_density;
use crate::error::{PipelineError, PipelineResult};

/// Raises its signal when dropped.
struct AbortOnDrop(AbortSignal);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Measurements and the graft plan derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct GraftPlan {
    /// Resolved region measurements.
    pub measurements: Measurements,
    /// Graft allocation.
    pub calculation: GraftCalculation,
}

/// Full analysis of one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanAnalysis {
    /// Density map from the scan's density points.
    pub density: DensityMap,
    /// Measurements and graft plan from the scan mesh.
    pub plan: GraftPlan,
}

/// Build a density map on the blocking pool.
///
/// # Errors
///
/// Any error from [`analyze_density`], or [`PipelineError::TaskFailed`] if
/// the blocking task panicked.
pub async fn run_density_pipeline(
    points: Vec<DensityPoint>,
    prefs: DensityPreferences,
) -> PipelineResult<DensityMap> {
    let abort = AbortSignal::new();
    let task = spawn_density(points, prefs, abort.clone());
    await_guarded(task, abort).await
}

fn spawn_density(
    points: Vec<DensityPoint>,
    prefs: DensityPreferences,
    abort: AbortSignal,
) -> JoinHandle<PipelineResult<DensityMap>> {
    tokio::task::spawn_blocking(move || analyze_density(&points, &prefs, &abort))
}

/// Await `task`, raising `abort` if this future is dropped first.
async fn await_guarded<T, F>(task: F, abort: AbortSignal) -> PipelineResult<T>
where
    F: Future<Output = Result<PipelineResult<T>, JoinError>>,
{
    let _guard = AbortOnDrop(abort);
    task.await.map_err(|e| PipelineError::TaskFailed(e.to_string()))?
}

/// Measure the requested regions, then allocate grafts.
///
/// # Errors
///
/// Measurement errors, then allocation errors. A donor shortfall is a
/// warning on the calculation, not an error.
pub async fn run_graft_pipeline<D, E>(
    engine: &MeasurementEngine<D>,
    allocator: &GraftAllocator<E>,
    mesh: &ScanMesh,
    regions: &[MeasurementRegion],
    prefs: &GraftPreferences,
) -> PipelineResult<GraftPlan>
where
    D: RegionDetector,
    E: DensityEstimator,
{
    let start = Instant::now();
    let measurements = engine.measurements(mesh, regions).await?;
    debug!(
        recipient_area = measurements.recipient_area,
        donor_area = measurements.donor_area,
        "measurement stage done"
    );

    let calculation = allocator.allocate(&measurements, prefs)?;
    info!(
        total_grafts = calculation.total_grafts,
        zones = calculation.zones.len(),
        warnings = calculation.warnings.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "graft pipeline complete"
    );
    Ok(GraftPlan {
        measurements,
        calculation,
    })
}

/// Run density analysis and graft planning for one scan concurrently.
///
/// The two branches share no data: the density branch owns `points`, the
/// graft branch reads `mesh`. The first error cancels the other branch.
///
/// # Errors
///
/// The first error from either branch.
pub async fn analyze_scan<D, E>(
    mesh: &ScanMesh,
    points: Vec<DensityPoint>,
    config: &PipelineConfig,
    detector: D,
    estimator: E,
) -> PipelineResult<ScanAnalysis>
where
    D: RegionDetector,
    E: DensityEstimator,
{
    config.validate()?;
    let engine = MeasurementEngine::new(detector).with_params(config.measure);
    let allocator = GraftAllocator::new(estimator);

    let (density, plan) = tokio::try_join!(
        run_density_pipeline(points, config.density.clone()),
        run_graft_pipeline(&engine, &allocator, mesh, &config.regions, &config.graft),
    )?;

    info!(
        regions = density.regions.len(),
        total_grafts = plan.calculation.total_grafts,
        "scan analysis complete"
    );
    Ok(ScanAnalysis { density, plan })
}
