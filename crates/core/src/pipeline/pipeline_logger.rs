use std::collections::BTreeMap;
use std::time::Instant;

/// Cross-cutting logger for deduplication runs.
///
/// Keeps the use case independent of where its progress ends up (stdout,
/// a caller's own reporting, or nowhere in tests).
pub trait PipelineLogger: Send {
    /// Report how many candidate pairs of the current scan have been scored.
    fn progress(&mut self, compared: usize, total: usize);

    /// Record a named count (e.g. detections in, merges performed).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _compared: usize, _total: usize) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI-oriented logger that forwards to the `log` facade and keeps the
/// last value of every metric for a closing summary.
pub struct StdoutPipelineLogger {
    metrics: BTreeMap<String, f64>,
    start_time: Instant,
    comparisons: usize,
}

impl StdoutPipelineLogger {
    pub fn new() -> Self {
        Self {
            metrics: BTreeMap::new(),
            start_time: Instant::now(),
            comparisons: 0,
        }
    }

    /// Returns the formatted summary string, or `None` if nothing recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Dedupe summary ({} comparisons, {elapsed_ms:.1}ms):",
            self.comparisons
        )];
        for (name, value) in &self.metrics {
            lines.push(format!("  {name}: {value}"));
        }
        Some(lines.join("\n"))
    }

    pub fn metric_value(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, compared: usize, total: usize) {
        self.comparisons += 1;
        if compared == total {
            log::debug!("Scan complete: {compared}/{total} pairs");
        }
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.insert(name.to_string(), value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.metric("merges", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_metric_keeps_latest_value() {
        let mut logger = StdoutPipelineLogger::new();
        logger.metric("merges", 1.0);
        logger.metric("merges", 2.0);
        assert_eq!(logger.metric_value("merges"), Some(2.0));
        assert_eq!(logger.metric_value("missing"), None);
    }

    #[test]
    fn test_progress_counts_comparisons() {
        let mut logger = StdoutPipelineLogger::new();
        for i in 1..=6 {
            logger.progress(i, 6);
        }
        assert_eq!(logger.comparisons, 6);
    }

    #[test]
    fn test_summary_lists_metrics_sorted() {
        let mut logger = StdoutPipelineLogger::new();
        logger.metric("merges", 2.0);
        logger.metric("detections_in", 5.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Dedupe summary"));
        let detections = summary.find("detections_in").unwrap();
        let merges = summary.find("merges").unwrap();
        assert!(detections < merges);
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = StdoutPipelineLogger::new();
        assert!(logger.summary_string().is_none());
    }
}
