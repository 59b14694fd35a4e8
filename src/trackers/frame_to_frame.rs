use crate::cost::SpotCostFunction;
use crate::graph::TrackGraph;
use crate::linker::{AssignmentResult, SparseJaqamanLinker};
use crate::logger::{Logger, NoopLogger};
use crate::spot::collection::SpotCollection;
use crate::spot::SpotRef;
use crate::Errors;
use itertools::Itertools;
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use self::settings::{LinkingSettings, Settings};

/// Tracker settings, keys and validation
pub mod settings;

/// Progress reported once every frame pair is linked
pub const DEFAULT_PROGRESS_SCALE: f64 = 1.0;

const SOLVING_STATUS: &str = "Solving for track segments...";

/// Consecutive pairs of the frames present, in increasing order
///
/// Frames do not need to be contiguous: `[0, 2, 5]` gives `(0, 2)` and `(2, 5)`.
///
pub fn frame_pairs(frames: &[i32]) -> Vec<(i32, i32)> {
    frames.iter().copied().tuple_windows().collect()
}

/// Links the visible spots of every pair of consecutive frames
///
/// Each frame pair is solved as an independent sparse linear assignment problem
/// ([SparseJaqamanLinker]); the pairs are distributed among a fixed number of worker
/// threads and the accepted links are merged into a single [TrackGraph].
///
/// The first failing pair aborts the run: workers stop claiming new pairs and
/// the failure is returned instead of the graph.
///
pub struct SparseLapFrameToFrameTracker<'a, S>
where
    S: SpotCollection + ?Sized,
{
    spots: &'a S,
    settings: &'a Settings,
    logger: &'a dyn Logger,
    num_threads: usize,
    progress_scale: f64,
    processing_time: Option<Duration>,
}

impl<'a, S> SparseLapFrameToFrameTracker<'a, S>
where
    S: SpotCollection + ?Sized,
{
    /// Creates the tracker
    ///
    /// The worker count defaults to the number of logical CPUs.
    ///
    pub fn new(spots: &'a S, settings: &'a Settings) -> Self {
        Self {
            spots,
            settings,
            logger: &NoopLogger,
            num_threads: num_cpus::get(),
            progress_scale: DEFAULT_PROGRESS_SCALE,
            processing_time: None,
        }
    }

    /// Sets the status and progress receiver
    ///
    pub fn logger(mut self, logger: &'a dyn Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Sets the number of worker threads
    ///
    pub fn num_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "At least one worker thread is required.");
        self.num_threads = n;
        self
    }

    /// Sets the progress reported when all frame pairs are done
    ///
    /// Use a value below `1.0` when linking is only the first part of a longer pipeline.
    ///
    pub fn progress_scale(mut self, scale: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&scale),
            "Progress scale must be between 0.0 and 1.0"
        );
        self.progress_scale = scale;
        self
    }

    /// Wall-clock duration of the last successful or failed run
    ///
    pub fn processing_time(&self) -> Option<Duration> {
        self.processing_time
    }

    fn check_input(&self) -> Result<Vec<i32>, Errors> {
        let frames = self.spots.frames();
        if frames.is_empty() {
            return Err(Errors::EmptyCollection);
        }
        if !frames.iter().any(|f| self.spots.n_spots(*f, true) > 0) {
            return Err(Errors::NoVisibleSpots);
        }
        Ok(frames)
    }

    /// Runs the linking
    ///
    /// # Errors
    /// * [Errors::EmptyCollection], [Errors::NoVisibleSpots] - nothing to link;
    /// * [Errors::InvalidSettings] - every settings problem found;
    /// * [Errors::Linking] - the first frame pair that failed;
    /// * [Errors::ThreadPool] - the workers could not be started.
    ///
    pub fn process(&mut self) -> Result<TrackGraph, Errors> {
        let frames = self.check_input()?;
        let settings = self.settings.validate()?;

        let start = Instant::now();
        let pairs = frame_pairs(&frames);
        let cost_function = SpotCostFunction::select(Some(&settings.feature_penalties));

        let mut graph = TrackGraph::new();
        for frame in &frames {
            for spot in self.spots.spots(*frame, true) {
                graph.add_vertex(spot);
            }
        }

        let workers = self.num_threads.min(pairs.len()).max(1);
        info!(
            "Linking {} frame pairs with {} workers, {:?} cost function",
            pairs.len(),
            workers,
            cost_function.kind()
        );

        let job = LinkingJob {
            spots: self.spots,
            pairs: &pairs,
            cost_function: &cost_function,
            settings: &settings,
            logger: self.logger,
            progress_scale: self.progress_scale,
            graph: Mutex::new(graph),
            next_pair: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            ok: AtomicBool::new(true),
            failure: OnceCell::new(),
        };

        self.logger.set_status(SOLVING_STATUS);
        let res = if pairs.is_empty() {
            Ok(())
        } else {
            rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(move |i| format!("sparse-lap-linker {}/{}", i + 1, workers))
                .build()
                .map(|pool| {
                    pool.scope(|scope| {
                        for _ in 0..workers {
                            scope.spawn(|_| job.work());
                        }
                    })
                })
                .map_err(|e| Errors::ThreadPool(e.to_string()))
        };
        self.logger.set_progress(self.progress_scale);
        self.logger.set_status("");
        self.processing_time = Some(start.elapsed());
        res?;

        if let Some(e) = job.failure.into_inner() {
            warn!("Frame-to-frame linking aborted: {}", e);
            return Err(e);
        }

        let graph = job
            .graph
            .into_inner()
            .expect("Access to the track graph must always succeed");
        info!(
            "Linked {} spots with {} edges in {:?}",
            graph.vertex_count(),
            graph.edge_count(),
            self.processing_time.unwrap_or_default()
        );
        Ok(graph)
    }
}

/// Shared state of one linking run
///
struct LinkingJob<'a, S>
where
    S: SpotCollection + ?Sized,
{
    spots: &'a S,
    pairs: &'a [(i32, i32)],
    cost_function: &'a SpotCostFunction,
    settings: &'a LinkingSettings,
    logger: &'a dyn Logger,
    progress_scale: f64,
    graph: Mutex<TrackGraph>,
    next_pair: AtomicUsize,
    completed: AtomicUsize,
    ok: AtomicBool,
    failure: OnceCell<Errors>,
}

impl<'a, S> LinkingJob<'a, S>
where
    S: SpotCollection + ?Sized,
{
    fn work(&self) {
        while self.ok.load(Ordering::SeqCst) {
            let i = self.next_pair.fetch_add(1, Ordering::SeqCst);
            let Some(&(source_frame, target_frame)) = self.pairs.get(i) else {
                break;
            };

            if let Err(e) = self.link(source_frame, target_frame) {
                // the first failure is kept, later ones are dropped
                let _ = self.failure.set(e);
                self.ok.store(false, Ordering::SeqCst);
                break;
            }

            let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
            self.logger
                .set_progress(self.progress_scale * done as f64 / self.pairs.len() as f64);
        }
    }

    fn link(&self, source_frame: i32, target_frame: i32) -> Result<(), Errors> {
        let sources = self.spots.spots(source_frame, true);
        let targets = self.spots.spots(target_frame, true);

        let res = SparseJaqamanLinker::new(
            &sources,
            &targets,
            self.cost_function,
            self.settings.cost_threshold(),
            self.settings.alternative_cost_factor,
            self.settings.cutoff_percentile,
        )
        .process()
        .map_err(|source| Errors::Linking {
            source_frame,
            target_frame,
            source,
        })?;

        debug!(
            "Frames {} -> {}: {} sources, {} targets, {} links",
            source_frame,
            target_frame,
            sources.len(),
            targets.len(),
            res.n_links()
        );

        let mut graph = self
            .graph
            .lock()
            .expect("Access to the track graph must always succeed");
        if !self.ok.load(Ordering::SeqCst) {
            return Ok(());
        }
        merge_links(&mut graph, &sources, &targets, &res);
        Ok(())
    }
}

/// Adds the accepted links of one frame pair to the graph, returns the number of new edges
///
/// Links pointing outside of `sources` or `targets` are skipped.
///
fn merge_links(
    graph: &mut TrackGraph,
    sources: &[SpotRef],
    targets: &[SpotRef],
    res: &AssignmentResult,
) -> usize {
    res.linked()
        .filter(|(s, t, cost)| match (sources.get(*s), targets.get(*t)) {
            (Some(source), Some(target)) => graph.add_edge(source, target, *cost),
            _ => {
                debug!("Dropping link {} -> {}: index out of range", s, t);
                false
            }
        })
        .count()
}

/// Links the visible spots of every pair of consecutive frames with the default worker count
///
pub fn link_frame_to_frame<S>(
    spots: &S,
    settings: &Settings,
    logger: &dyn Logger,
) -> Result<TrackGraph, Errors>
where
    S: SpotCollection + ?Sized,
{
    SparseLapFrameToFrameTracker::new(spots, settings)
        .logger(logger)
        .process()
}
