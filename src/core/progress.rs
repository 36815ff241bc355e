//! Upload progress reporting
//!
//! The transport layer drives a narrow [`ProgressObserver`] capability with
//! raw byte counts; [`ProgressReporter`] turns those into throttled,
//! human-readable status lines on a [`UiSink`]. The reporter runs
//! synchronously on the upload thread and rate-limits with a wall-clock
//! check, so it must stay cheap.

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::ui::UiSink;

/// Default minimum interval between emitted progress updates
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(700);

/// Message shown once all bytes are out but the server is still working
const FINALIZING_MESSAGE: &str = "Waiting for the catalog server to finish processing...";

/// Binary (1024-based) units for human-readable byte quantities
const BYTE_UNITS: [&str; 5] = ["Byte", "KB", "MB", "GB", "TB"];

/// Observer for byte-granularity transfer progress
///
/// Invoked with monotonically non-decreasing `bytes_sent` as the transfer
/// proceeds. Implementations must not block beyond lightweight output.
pub trait ProgressObserver: Send {
    fn report(&mut self, bytes_sent: u64, total_bytes: u64);
}

/// Render a byte count with binary units
///
/// Picks the largest unit where the value is at least 1, rounds to two
/// decimal places and trims trailing zero fractions. Zero renders in the
/// smallest unit.
///
/// # Examples
///
/// ```
/// use box_publisher::core::progress::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 Byte");
/// assert_eq!(format_bytes(1536), "1.5 KB");
/// assert_eq!(format_bytes(1073741824), "1 GB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return format!("0 {}", BYTE_UNITS[0]);
    }

    let mut exponent = 0;
    let mut scale = 1u64;
    while exponent < BYTE_UNITS.len() - 1 && bytes >= scale * 1024 {
        scale *= 1024;
        exponent += 1;
    }
    let value = bytes as f64 / scale as f64;

    let rendered = format!("{:.2}", value);
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');

    format!("{} {}", rendered, BYTE_UNITS[exponent])
}

/// Throttled progress-to-text reporter
///
/// Emits at most one update per throttle window, and only when the rendered
/// text actually changed, so an interactive display is never flooded. The
/// terminal finalizing message bypasses the window (a fast upload would
/// otherwise swallow it) but still requires a text change, so it appears at
/// most once.
pub struct ProgressReporter {
    ui: Arc<dyn UiSink>,
    throttle: Duration,
    last_emit: Option<Instant>,
    last_text: Option<String>,
}

impl ProgressReporter {
    /// Create a reporter with the default 0.7 s throttle window
    pub fn new(ui: Arc<dyn UiSink>) -> Self {
        Self::with_throttle(ui, DEFAULT_THROTTLE)
    }

    /// Create a reporter with a custom throttle window
    pub fn with_throttle(ui: Arc<dyn UiSink>, throttle: Duration) -> Self {
        Self {
            ui,
            throttle,
            last_emit: None,
            last_text: None,
        }
    }

    fn render(bytes_sent: u64, total_bytes: u64) -> String {
        if total_bytes == 0 || bytes_sent >= total_bytes {
            return FINALIZING_MESSAGE.to_string();
        }

        let percentage = ((bytes_sent as f64 / total_bytes as f64) * 100.0).round() as u64;
        format!(
            "Uploading {} of {} ({}%)",
            format_bytes(bytes_sent),
            format_bytes(total_bytes),
            percentage
        )
    }
}

impl ProgressObserver for ProgressReporter {
    fn report(&mut self, bytes_sent: u64, total_bytes: u64) {
        let text = Self::render(bytes_sent, total_bytes);

        if self.last_text.as_deref() == Some(text.as_str()) {
            return;
        }

        let finalizing = total_bytes == 0 || bytes_sent >= total_bytes;
        if !finalizing
            && let Some(emitted_at) = self.last_emit
            && emitted_at.elapsed() < self.throttle
        {
            return;
        }

        self.ui.clear_line();
        self.ui.info(&text);
        self.last_emit = Some(Instant::now());
        self.last_text = Some(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ui::MemoryUi;

    #[test]
    fn test_format_bytes_zero() {
        assert_eq!(format_bytes(0), "0 Byte");
    }

    #[test]
    fn test_format_bytes_below_one_kilobyte() {
        assert_eq!(format_bytes(1), "1 Byte");
        assert_eq!(format_bytes(1023), "1023 Byte");
    }

    #[test]
    fn test_format_bytes_kilobytes() {
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
    }

    #[test]
    fn test_format_bytes_trims_trailing_zero_fractions() {
        assert_eq!(format_bytes(1048576), "1 MB");
        assert_eq!(format_bytes(1073741824), "1 GB");
    }

    #[test]
    fn test_format_bytes_two_decimal_places() {
        // 1.25 MB exactly
        assert_eq!(format_bytes(1310720), "1.25 MB");
    }

    #[test]
    fn test_format_bytes_terabytes_is_largest_unit() {
        let five_tb = 5 * 1024u64.pow(4);
        assert_eq!(format_bytes(five_tb), "5 TB");
        // Beyond TB stays in TB
        assert_eq!(format_bytes(2048 * 1024u64.pow(4)), "2048 TB");
    }

    #[test]
    fn test_first_report_emits_update() {
        let ui = Arc::new(MemoryUi::new());
        let mut reporter = ProgressReporter::new(ui.clone());

        reporter.report(512, 2048);

        let infos = ui.infos();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0], "Uploading 512 Byte of 2 KB (25%)");
    }

    #[test]
    fn test_unchanged_text_is_not_repeated() {
        let ui = Arc::new(MemoryUi::new());
        let mut reporter = ProgressReporter::with_throttle(ui.clone(), Duration::ZERO);

        reporter.report(512, 2048);
        reporter.report(512, 2048);
        reporter.report(512, 2048);

        assert_eq!(ui.infos().len(), 1);
    }

    #[test]
    fn test_changed_text_within_window_is_suppressed() {
        let ui = Arc::new(MemoryUi::new());
        let mut reporter = ProgressReporter::with_throttle(ui.clone(), Duration::from_secs(60));

        reporter.report(512, 2048);
        reporter.report(1024, 2048);
        reporter.report(1536, 2048);

        assert_eq!(ui.infos().len(), 1);
    }

    #[test]
    fn test_changed_text_after_window_emits_exactly_once() {
        let ui = Arc::new(MemoryUi::new());
        let mut reporter = ProgressReporter::with_throttle(ui.clone(), Duration::from_millis(20));

        reporter.report(512, 2048);
        std::thread::sleep(Duration::from_millis(40));
        reporter.report(1024, 2048);
        reporter.report(1024, 2048);

        let infos = ui.infos();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[1], "Uploading 1 KB of 2 KB (50%)");
    }

    #[test]
    fn test_finalizing_message_bypasses_window() {
        let ui = Arc::new(MemoryUi::new());
        let mut reporter = ProgressReporter::with_throttle(ui.clone(), Duration::from_secs(60));

        reporter.report(512, 2048);
        reporter.report(2048, 2048);

        let infos = ui.infos();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[1], FINALIZING_MESSAGE);
    }

    #[test]
    fn test_finalizing_message_emitted_once() {
        let ui = Arc::new(MemoryUi::new());
        let mut reporter = ProgressReporter::with_throttle(ui.clone(), Duration::ZERO);

        reporter.report(2048, 2048);
        reporter.report(2048, 2048);
        reporter.report(4096, 2048);

        assert_eq!(ui.infos().len(), 1);
    }

    #[test]
    fn test_zero_total_renders_finalizing() {
        let ui = Arc::new(MemoryUi::new());
        let mut reporter = ProgressReporter::new(ui.clone());

        reporter.report(0, 0);

        assert_eq!(ui.infos(), vec![FINALIZING_MESSAGE.to_string()]);
    }

    #[test]
    fn test_updates_clear_line_before_writing() {
        use crate::core::ui::UiEvent;

        let ui = Arc::new(MemoryUi::new());
        let mut reporter = ProgressReporter::new(ui.clone());

        reporter.report(512, 2048);

        let events = ui.events();
        assert_eq!(events[0], UiEvent::ClearLine);
        assert!(matches!(events[1], UiEvent::Info(_)));
    }
}
