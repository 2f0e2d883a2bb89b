use crate::{Result, RunConfig};
use bugscan_engine::{
    CancelToken, EndpointProbe, FileSink, LogScanner, PatternSet, ProbeOutcome, ReportSink,
    ScanOutcome, aggregate, load_lines,
};
use bugscan_types::{Diagnostic, DiagnosticKind, Endpoint, Report, RunVerdict};

/// Phases of a run, in the only order they may occur
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunState {
    Idle,
    LoadingConfig,
    Scanning,
    Probing,
    Aggregating,
    /// Terminal when the report is non-empty
    Reporting,
    /// Terminal when the report is empty
    Done,
}

/// Progress hooks for whoever drives the run
pub trait RunObserver: Send + Sync {
    fn on_state(&self, _state: RunState) {}

    fn on_diagnostic(&self, _diagnostic: &Diagnostic) {}
}

pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: Report,
    pub diagnostics: Vec<Diagnostic>,
    pub verdict: RunVerdict,
    /// Where the report was persisted, when it was
    pub saved_to: Option<String>,
    pub files_scanned: usize,
    pub endpoints_checked: usize,
    /// True when a deadline or interrupt cut the run short
    pub cancelled: bool,
}

/// Accepted and rejected lines of the pattern source
#[derive(Debug, Clone)]
pub struct PatternInspection {
    pub patterns: PatternSet,
    pub diagnostics: Vec<Diagnostic>,
    pub loaded: bool,
}

/// Diagnostics collected during a run, echoed to the observer as they occur
struct DiagnosticLog<'a> {
    observer: &'a dyn RunObserver,
    entries: Vec<Diagnostic>,
}

impl<'a> DiagnosticLog<'a> {
    fn new(observer: &'a dyn RunObserver) -> Self {
        Self {
            observer,
            entries: Vec::new(),
        }
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(kind = %diagnostic.kind, "{}", diagnostic);
        self.observer.on_diagnostic(&diagnostic);
        self.entries.push(diagnostic);
    }

    fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.push(diagnostic);
        }
    }
}

/// Sequences loading, scanning, probing, aggregation and reporting
pub struct Orchestrator {
    config: RunConfig,
    sink: Box<dyn ReportSink>,
    cancel: CancelToken,
}

impl Orchestrator {
    /// Orchestrator writing its report to `config.output`
    pub fn new(config: RunConfig) -> Self {
        let sink = Box::new(FileSink::new(config.output.clone()));
        Self::with_sink(config, sink)
    }

    pub fn with_sink(config: RunConfig, sink: Box<dyn ReportSink>) -> Self {
        Self {
            config,
            sink,
            cancel: CancelToken::new(),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Token that aborts the remaining work of a run when cancelled
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn enter(&self, current: &mut RunState, next: RunState, observer: &dyn RunObserver) {
        debug_assert!(next > *current, "run state {:?} -> {:?}", current, next);
        tracing::info!(from = ?current, to = ?next, "run state");
        *current = next;
        observer.on_state(next);
    }

    /// Full pipeline: load, scan, probe, aggregate, report
    pub async fn run(&self, observer: &dyn RunObserver) -> Result<RunOutcome> {
        let mut state = RunState::Idle;
        let mut diagnostics = DiagnosticLog::new(observer);

        let deadline = self.config.deadline.map(|d| self.cancel.cancel_after(d));

        self.enter(&mut state, RunState::LoadingConfig, observer);
        let patterns = self.load_patterns(&mut diagnostics);
        let endpoints = self.load_endpoints(&mut diagnostics);
        let could_not_run = patterns.is_none() && endpoints.is_none();

        self.enter(&mut state, RunState::Scanning, observer);
        let scan = self.scan(patterns.unwrap_or_default()).await?;
        diagnostics.extend(scan.diagnostics);

        self.enter(&mut state, RunState::Probing, observer);
        let probe = self.probe(&endpoints.unwrap_or_default()).await?;

        if let Some(handle) = deadline {
            handle.abort();
        }

        self.enter(&mut state, RunState::Aggregating, observer);
        let report = aggregate(scan.issues, probe.issues);

        let mut saved_to = None;
        if report.is_empty() {
            self.enter(&mut state, RunState::Done, observer);
        } else {
            self.enter(&mut state, RunState::Reporting, observer);
            match self.sink.write(&report) {
                Ok(()) => saved_to = Some(self.sink.location()),
                Err(err) => diagnostics.push(Diagnostic::new(
                    DiagnosticKind::SinkWrite,
                    self.sink.location(),
                    err,
                )),
            }
        }

        let verdict = if could_not_run {
            RunVerdict::CouldNotRun
        } else if report.is_empty() {
            RunVerdict::Clean
        } else {
            RunVerdict::IssuesFound
        };

        Ok(RunOutcome {
            report,
            diagnostics: diagnostics.entries,
            verdict,
            saved_to,
            files_scanned: scan.files_scanned,
            endpoints_checked: probe.checked,
            cancelled: scan.cancelled || probe.skipped > 0,
        })
    }

    /// Load and compile the pattern source without scanning anything
    pub fn inspect_patterns(&self) -> PatternInspection {
        let mut diagnostics = DiagnosticLog::new(&NoopObserver);
        let patterns = self.load_patterns(&mut diagnostics);
        PatternInspection {
            loaded: patterns.is_some(),
            patterns: patterns.unwrap_or_default(),
            diagnostics: diagnostics.entries,
        }
    }

    /// Scan the log tree only
    pub async fn scan_logs(&self, observer: &dyn RunObserver) -> Result<ScanOutcome> {
        let mut diagnostics = DiagnosticLog::new(observer);
        let patterns = self.load_patterns(&mut diagnostics);

        let mut outcome = self.scan(patterns.unwrap_or_default()).await?;
        diagnostics.extend(std::mem::take(&mut outcome.diagnostics));
        outcome.diagnostics = diagnostics.entries;
        Ok(outcome)
    }

    /// Probe the endpoint list only
    pub async fn probe_endpoints(
        &self,
        observer: &dyn RunObserver,
    ) -> Result<(ProbeOutcome, Vec<Diagnostic>)> {
        let mut diagnostics = DiagnosticLog::new(observer);
        let endpoints = self.load_endpoints(&mut diagnostics).unwrap_or_default();
        let outcome = self.probe(&endpoints).await?;
        Ok((outcome, diagnostics.entries))
    }

    /// `None` when the source is unreadable
    fn load_patterns(&self, diagnostics: &mut DiagnosticLog<'_>) -> Option<PatternSet> {
        match PatternSet::from_file(&self.config.pattern_file) {
            Ok(patterns) => {
                diagnostics.extend(patterns.diagnostics());
                tracing::info!(count = patterns.len(), "loaded error patterns");
                Some(patterns)
            }
            Err(err) => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ConfigLoad,
                    self.config.pattern_file.display().to_string(),
                    err,
                ));
                None
            }
        }
    }

    /// `None` when the source is unreadable
    fn load_endpoints(&self, diagnostics: &mut DiagnosticLog<'_>) -> Option<Vec<Endpoint>> {
        match load_lines(&self.config.endpoint_file) {
            Ok(lines) => {
                let endpoints = Endpoint::parse_all(lines);
                tracing::info!(count = endpoints.len(), "loaded endpoints");
                Some(endpoints)
            }
            Err(err) => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ConfigLoad,
                    self.config.endpoint_file.display().to_string(),
                    err,
                ));
                None
            }
        }
    }

    async fn scan(&self, patterns: PatternSet) -> Result<ScanOutcome> {
        let scanner = LogScanner::new()
            .with_suffix(self.config.log_suffix.clone())
            .with_cancel(self.cancel.clone());
        let root = self.config.log_dir.clone();

        let outcome =
            tokio::task::spawn_blocking(move || scanner.scan(&root, &patterns)).await?;
        Ok(outcome)
    }

    async fn probe(&self, endpoints: &[Endpoint]) -> Result<ProbeOutcome> {
        if endpoints.is_empty() {
            return Ok(ProbeOutcome::default());
        }
        let probe = EndpointProbe::new(self.config.probe)?;
        Ok(probe.check_until(endpoints, &self.cancel).await)
    }
}
