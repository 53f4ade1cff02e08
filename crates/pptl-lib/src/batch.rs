//! Batch driver and the host-facing seams it talks through

use crate::{Config, LineLayer, Outcome, Polygon, PolygonFeature, PptlError, Result, Rotator};
use rayon::prelude::*;

/// Cancellation and progress channel to the host
pub trait Feedback {
    /// Polled once before each feature
    fn is_canceled(&self) -> bool;

    /// Called after each feature with a percentage in 0..=100
    fn set_progress(&self, percent: u8);
}

/// Never cancels, discards progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl Feedback for NoFeedback {
    fn is_canceled(&self) -> bool {
        false
    }

    fn set_progress(&self, _percent: u8) {}
}

/// Feedback backed by two host closures
pub struct CallbackFeedback<C, P> {
    is_canceled: C,
    set_progress: P,
}

impl<C, P> CallbackFeedback<C, P>
where
    C: Fn() -> bool,
    P: Fn(u8),
{
    pub fn new(is_canceled: C, set_progress: P) -> Self {
        Self {
            is_canceled,
            set_progress,
        }
    }
}

impl<C, P> Feedback for CallbackFeedback<C, P>
where
    C: Fn() -> bool,
    P: Fn(u8),
{
    fn is_canceled(&self) -> bool {
        (self.is_canceled)()
    }

    fn set_progress(&self, percent: u8) {
        (self.set_progress)(percent)
    }
}

/// Destination for emitted polygon features
pub trait FeatureSink {
    fn add_feature(&mut self, feature: PolygonFeature) -> Result<()>;
}

impl FeatureSink for Vec<PolygonFeature> {
    fn add_feature(&mut self, feature: PolygonFeature) -> Result<()> {
        self.push(feature);
        Ok(())
    }
}

/// Counters of a finished (or canceled) run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Features in the source
    pub total: usize,
    /// Features written to the sink
    pub processed: usize,
    /// Written features that were rotated
    pub rotated: usize,
    /// Whether the host stopped the run early
    pub canceled: bool,
}

/// Drives every polygon of a source through the rotator into a sink
#[derive(Debug, Clone)]
pub struct BatchDriver<'a> {
    config: Config,
    lines: &'a LineLayer,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<'a> BatchDriver<'a> {
    pub fn new(config: Config, lines: &'a LineLayer) -> Self {
        Self { config, lines }
    }

    /// Process polygons one at a time, in source order
    ///
    /// Cancellation is polled before each feature; features already written stay
    /// written. Progress is reported after each feature. The first fatal error
    /// aborts the run.
    pub fn run<I, S>(&self, polygons: I, sink: &mut S, feedback: &dyn Feedback) -> Result<BatchSummary>
    where
        I: IntoIterator<Item = PolygonFeature>,
        I::IntoIter: ExactSizeIterator,
        S: FeatureSink + ?Sized,
    {
        #[cfg(feature = "profiling")]
        profiling::scope!("batch::run");

        self.config.validate()?;
        let polygons = polygons.into_iter();
        let total = polygons.len();
        if total == 0 {
            return Err(PptlError::EmptyPolygonLayer);
        }

        tracing::info!(
            polygons = total,
            lines = self.lines.len(),
            distance = self.config.distance,
            angle = self.config.angle,
            by_longest = self.config.by_longest,
            skip_multipart = self.config.skip_multipart,
            "Starting polygon alignment"
        );

        let rotator = Rotator::new(self.lines, &self.config);
        let mut summary = BatchSummary {
            total,
            ..BatchSummary::default()
        };

        for (index, feature) in polygons.enumerate() {
            if feedback.is_canceled() {
                summary.canceled = true;
                break;
            }

            let (output, outcome) = align_feature(&rotator, feature)?;
            sink.add_feature(output)?;

            summary.processed += 1;
            if outcome.is_rotated() {
                summary.rotated += 1;
            }
            feedback.set_progress(progress_percent(index + 1, total));
        }

        log_summary(&summary);
        Ok(summary)
    }

    /// Align all polygons on the rayon pool, then write them in source order
    ///
    /// The line layer is shared read-only; each worker owns the polygons it aligns.
    /// No cancellation or progress: nothing reaches the sink until every polygon is done.
    pub fn run_parallel<S>(&self, polygons: Vec<PolygonFeature>, sink: &mut S) -> Result<BatchSummary>
    where
        S: FeatureSink + ?Sized,
    {
        #[cfg(feature = "profiling")]
        profiling::scope!("batch::run_parallel");

        self.config.validate()?;
        let total = polygons.len();
        if total == 0 {
            return Err(PptlError::EmptyPolygonLayer);
        }

        tracing::info!(polygons = total, lines = self.lines.len(), "Starting parallel polygon alignment");

        let rotator = Rotator::new(self.lines, &self.config);
        let results: Result<Vec<(PolygonFeature, Outcome)>> = polygons
            .into_par_iter()
            .map(|feature| align_feature(&rotator, feature))
            .collect();

        let mut summary = BatchSummary {
            total,
            ..BatchSummary::default()
        };

        // Sequential write keeps the sink single-threaded
        for (output, outcome) in results? {
            sink.add_feature(output)?;
            summary.processed += 1;
            if outcome.is_rotated() {
                summary.rotated += 1;
            }
        }

        log_summary(&summary);
        Ok(summary)
    }
}

fn align_feature(rotator: &Rotator<'_>, feature: PolygonFeature) -> Result<(PolygonFeature, Outcome)> {
    let mut polygon = Polygon::from_feature(feature)?;
    let outcome = rotator.align(&mut polygon)?;
    Ok((polygon.into_feature(), outcome))
}

/// Whole percent done after `done` of `total` features, rounded down
fn progress_percent(done: usize, total: usize) -> u8 {
    u8::try_from(done.saturating_mul(100) / total.max(1)).unwrap_or(100)
}

fn log_summary(summary: &BatchSummary) {
    if summary.canceled {
        tracing::info!(
            processed = summary.processed,
            total = summary.total,
            rotated = summary.rotated,
            "Polygon alignment canceled"
        );
    } else {
        tracing::info!(
            processed = summary.processed,
            rotated = summary.rotated,
            "Polygon alignment finished"
        );
    }
}
