//! Decomposition Controller
//! Owns the dataset, the column selection and the single background worker.

use crate::charts::ChartSurface;
use crate::data::{Dataset, DatasetError};
use crate::stats::{DecomposeError, DecomposeSettings, Decomposer, Decomposition};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("{0}")]
    Dataset(#[from] DatasetError),
    #[error("Decomposition failed: {0}")]
    Decompose(#[from] DecomposeError),
    #[error("Decomposition worker stopped without a result")]
    WorkerLost,
}

/// Events posted by the worker thread
enum WorkerEvent {
    Progress(f32, String),
    Complete(Decomposition),
    Error(DecomposeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

/// Result of a plot request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// A run is already in flight; the request was dropped.
    AlreadyRunning,
    /// The selected column could not be turned into a series.
    Rejected,
}

/// How a finished run ended.
#[derive(Debug)]
pub enum RunOutcome {
    Rendered { column: String },
    Failed(RunError),
}

/// Progress bar state plus the status line under it.
#[derive(Debug, Clone, PartialEq)]
pub struct BusyIndicator {
    visible: bool,
    progress: f32,
    status: String,
}

impl Default for BusyIndicator {
    fn default() -> Self {
        Self {
            visible: false,
            progress: 0.0,
            status: "Ready".to_string(),
        }
    }
}

impl BusyIndicator {
    /// Reset to zero and make visible.
    pub fn show(&mut self, status: &str) {
        self.progress = 0.0;
        self.visible = true;
        self.status = status.to_string();
    }

    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }

    pub fn hide(&mut self, status: &str) {
        self.visible = false;
        self.status = status.to_string();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Percentage in 0..=100.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}

struct ActiveRun {
    column: String,
    index: Vec<f64>,
    rx: Receiver<WorkerEvent>,
}

/// Idle/Running state machine behind the Plot button.
pub struct DecompositionController {
    dataset: Dataset,
    decomposer: Arc<dyn Decomposer>,
    pub settings: DecomposeSettings,
    selected_column: String,
    busy: BusyIndicator,
    active: Option<ActiveRun>,
}

impl DecompositionController {
    pub fn new(
        dataset: Dataset,
        decomposer: Arc<dyn Decomposer>,
        settings: DecomposeSettings,
    ) -> Self {
        // Dataset guarantees at least one value column.
        let selected_column = dataset.column_names().first().cloned().unwrap_or_default();

        Self {
            dataset,
            decomposer,
            settings,
            selected_column,
            busy: BusyIndicator::default(),
            active: None,
        }
    }

    pub fn column_names(&self) -> &[String] {
        self.dataset.column_names()
    }

    pub fn selected_column(&self) -> &str {
        &self.selected_column
    }

    /// Choose the column for the next run. Unknown names are refused.
    pub fn select_column(&mut self, column: &str) -> bool {
        if self.dataset.column_names().iter().any(|c| c == column) {
            self.selected_column = column.to_string();
            true
        } else {
            log::warn!("Ignoring unknown column '{}'", column);
            false
        }
    }

    pub fn run_state(&self) -> RunState {
        if self.active.is_some() {
            RunState::Running
        } else {
            RunState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn busy(&self) -> &BusyIndicator {
        &self.busy
    }

    /// Start decomposing the selected column in the background.
    pub fn start(&mut self) -> StartOutcome {
        if self.active.is_some() {
            log::warn!("Decomposition is already running, ignoring plot request");
            return StartOutcome::AlreadyRunning;
        }

        let series = match self.dataset.series(&self.selected_column) {
            Ok(series) => series,
            Err(e) => {
                self.report(RunError::from(e));
                return StartOutcome::Rejected;
            }
        };

        self.busy.show(&format!("Decomposing {}...", series.name));

        let (tx, rx) = channel();
        let decomposer = Arc::clone(&self.decomposer);
        let settings = self.settings;
        let values = series.values;

        log::info!(
            "Starting decomposition of '{}' ({} observations, period {}, {} model)",
            series.name,
            values.len(),
            settings.period,
            settings.model
        );

        thread::spawn(move || {
            Self::run_decomposition(tx, decomposer, values, settings);
        });

        self.active = Some(ActiveRun {
            column: series.name,
            index: series.index,
            rx,
        });
        StartOutcome::Started
    }

    /// Run decomposition (called from background thread)
    fn run_decomposition(
        tx: Sender<WorkerEvent>,
        decomposer: Arc<dyn Decomposer>,
        values: Vec<f64>,
        settings: DecomposeSettings,
    ) {
        let _ = tx.send(WorkerEvent::Progress(
            10.0,
            "Estimating trend and seasonal components...".to_string(),
        ));

        let event = match decomposer.decompose(&values, &settings) {
            Ok(decomposition) => WorkerEvent::Complete(decomposition),
            Err(e) => WorkerEvent::Error(e),
        };
        let _ = tx.send(event);
    }

    /// Drain worker events. Returns the outcome once the run has finished.
    pub fn poll(&mut self, chart: &mut ChartSurface) -> Option<RunOutcome> {
        let run = self.active.take()?;

        loop {
            match run.rx.try_recv() {
                Ok(WorkerEvent::Progress(progress, status)) => {
                    self.busy.set_progress(progress, &status);
                }
                Ok(WorkerEvent::Complete(decomposition)) => {
                    self.busy.hide(&format!(
                        "Complete! {} decomposed ({} points)",
                        run.column,
                        decomposition.len()
                    ));
                    chart.render(&run.column, &run.index, &decomposition);
                    log::info!("Decomposition of '{}' complete", run.column);
                    return Some(RunOutcome::Rendered { column: run.column });
                }
                Ok(WorkerEvent::Error(e)) => {
                    return Some(RunOutcome::Failed(self.report(RunError::from(e))));
                }
                Err(TryRecvError::Empty) => {
                    self.active = Some(run);
                    return None;
                }
                Err(TryRecvError::Disconnected) => {
                    return Some(RunOutcome::Failed(self.report(RunError::WorkerLost)));
                }
            }
        }
    }

    fn report(&mut self, error: RunError) -> RunError {
        log::error!("{}", error);
        self.busy.hide(&format!("Error: {}", error));
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_dataset;
    use crate::stats::ClassicalDecomposer;
    use polars::prelude::{Column, DataFrame};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    /// Blocks until the test releases it, counting how many runs reached it.
    struct GatedDecomposer {
        gate: Mutex<Receiver<()>>,
        calls: Arc<AtomicUsize>,
    }

    impl Decomposer for GatedDecomposer {
        fn decompose(
            &self,
            values: &[f64],
            settings: &DecomposeSettings,
        ) -> Result<Decomposition, DecomposeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _ = self.gate.lock().unwrap().recv();
            ClassicalDecomposer.decompose(values, settings)
        }
    }

    struct PanickingDecomposer;

    impl Decomposer for PanickingDecomposer {
        fn decompose(
            &self,
            _values: &[f64],
            _settings: &DecomposeSettings,
        ) -> Result<Decomposition, DecomposeError> {
            panic!("decomposer blew up");
        }
    }

    fn controller_with(decomposer: Arc<dyn Decomposer>, period: usize) -> DecompositionController {
        let settings = DecomposeSettings {
            period,
            ..DecomposeSettings::default()
        };
        DecompositionController::new(sample_dataset().unwrap(), decomposer, settings)
    }

    fn gated(period: usize) -> (DecompositionController, Sender<()>, Arc<AtomicUsize>) {
        let (release, gate) = channel();
        let calls = Arc::new(AtomicUsize::new(0));
        let decomposer = GatedDecomposer {
            gate: Mutex::new(gate),
            calls: Arc::clone(&calls),
        };
        (controller_with(Arc::new(decomposer), period), release, calls)
    }

    fn wait_for_outcome(
        controller: &mut DecompositionController,
        chart: &mut ChartSurface,
    ) -> RunOutcome {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(outcome) = controller.poll(chart) {
                return outcome;
            }
            assert!(Instant::now() < deadline, "worker did not finish");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_defaults_to_first_column() {
        let controller = controller_with(Arc::new(ClassicalDecomposer), 3);
        assert_eq!(controller.selected_column(), "colonne_1");
        assert_eq!(controller.column_names().len(), 2);
        assert_eq!(controller.run_state(), RunState::Idle);
        assert!(!controller.busy().is_visible());
    }

    #[test]
    fn test_end_to_end_success() {
        let mut controller = controller_with(Arc::new(ClassicalDecomposer), 3);
        let mut chart = ChartSurface::new();
        assert!(controller.select_column("colonne_1"));

        assert_eq!(controller.start(), StartOutcome::Started);
        assert!(controller.busy().is_visible());
        assert_eq!(controller.busy().progress(), 0.0);
        assert_eq!(controller.run_state(), RunState::Running);

        let outcome = wait_for_outcome(&mut controller, &mut chart);
        assert!(matches!(outcome, RunOutcome::Rendered { ref column } if column == "colonne_1"));
        assert!(!controller.busy().is_visible());
        assert_eq!(controller.run_state(), RunState::Idle);
        assert!(controller.busy().status().starts_with("Complete"));

        let curves = chart.curves();
        assert_eq!(curves.len(), 3);
        // Trend and residual are undefined at both ends for period 3.
        assert_eq!(curves[0].points.len(), 8);
        assert_eq!(curves[0].summary.undefined, 2);
        assert_eq!(curves[1].points.len(), 10);
        assert_eq!(curves[2].points.len(), 8);
        assert_eq!(chart.revision(), 1);

        // Nothing more arrives for a finished run.
        assert!(controller.poll(&mut chart).is_none());
        assert!(!controller.busy().is_visible());
    }

    #[test]
    fn test_end_to_end_failure_keeps_previous_chart() {
        let mut controller = controller_with(Arc::new(ClassicalDecomposer), 3);
        let mut chart = ChartSurface::new();
        controller.start();
        wait_for_outcome(&mut controller, &mut chart);
        let before = chart.curves().to_vec();

        controller.settings.period = 20;
        assert_eq!(controller.start(), StartOutcome::Started);
        assert!(controller.busy().is_visible());

        let outcome = wait_for_outcome(&mut controller, &mut chart);
        assert!(matches!(
            outcome,
            RunOutcome::Failed(RunError::Decompose(
                DecomposeError::InsufficientObservations {
                    required: 40,
                    actual: 10
                }
            ))
        ));
        assert!(!controller.busy().is_visible());
        assert_eq!(controller.run_state(), RunState::Idle);
        assert!(controller.busy().status().starts_with("Error"));
        assert_eq!(chart.revision(), 1);
        assert_eq!(chart.curves(), before.as_slice());
    }

    #[test]
    fn test_failure_on_empty_chart_leaves_it_empty() {
        let mut controller = controller_with(Arc::new(ClassicalDecomposer), 20);
        let mut chart = ChartSurface::new();
        controller.start();

        let outcome = wait_for_outcome(&mut controller, &mut chart);
        assert!(matches!(outcome, RunOutcome::Failed(_)));
        assert!(chart.is_empty());
        assert!(controller.busy().status().starts_with("Error"));
    }

    #[test]
    fn test_second_start_while_running_is_ignored() {
        let (mut controller, release, calls) = gated(3);
        let mut chart = ChartSurface::new();

        assert_eq!(controller.start(), StartOutcome::Started);
        assert_eq!(controller.start(), StartOutcome::AlreadyRunning);
        assert_eq!(controller.run_state(), RunState::Running);
        assert!(controller.busy().is_visible());
        assert!(controller.poll(&mut chart).is_none());

        release.send(()).unwrap();
        let outcome = wait_for_outcome(&mut controller, &mut chart);
        assert!(matches!(outcome, RunOutcome::Rendered { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(chart.revision(), 1);
    }

    #[test]
    fn test_selection_change_applies_to_next_run() {
        let (mut controller, release, _calls) = gated(3);
        let mut chart = ChartSurface::new();

        controller.start();
        assert!(controller.select_column("colonne_2"));
        release.send(()).unwrap();

        let outcome = wait_for_outcome(&mut controller, &mut chart);
        assert!(matches!(outcome, RunOutcome::Rendered { ref column } if column == "colonne_1"));
        assert_eq!(controller.selected_column(), "colonne_2");

        release.send(()).unwrap();
        controller.start();
        let outcome = wait_for_outcome(&mut controller, &mut chart);
        assert!(matches!(outcome, RunOutcome::Rendered { ref column } if column == "colonne_2"));
        assert!(chart.title().unwrap().starts_with("colonne_2"));
    }

    #[test]
    fn test_unknown_column_is_refused() {
        let mut controller = controller_with(Arc::new(ClassicalDecomposer), 3);
        assert!(!controller.select_column("colonne_9"));
        assert_eq!(controller.selected_column(), "colonne_1");
    }

    #[test]
    fn test_non_numeric_column_is_rejected_without_worker() {
        let frame = DataFrame::new(vec![
            Column::new("t".into(), vec![1i64, 2, 3, 4, 5, 6]),
            Column::new("label".into(), vec!["a", "b", "c", "a", "b", "c"]),
        ])
        .unwrap();
        let dataset = Dataset::new(frame, "t").unwrap();
        let mut controller = DecompositionController::new(
            dataset,
            Arc::new(ClassicalDecomposer),
            DecomposeSettings::default(),
        );

        assert_eq!(controller.start(), StartOutcome::Rejected);
        assert_eq!(controller.run_state(), RunState::Idle);
        assert!(!controller.busy().is_visible());
        assert!(controller.busy().status().contains("not numeric"));
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let mut controller = controller_with(Arc::new(PanickingDecomposer), 3);
        let mut chart = ChartSurface::new();
        controller.start();

        let outcome = wait_for_outcome(&mut controller, &mut chart);
        assert!(matches!(outcome, RunOutcome::Failed(RunError::WorkerLost)));
        assert!(!controller.busy().is_visible());
        assert_eq!(controller.run_state(), RunState::Idle);
    }
}
