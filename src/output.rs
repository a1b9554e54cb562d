// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON-lines output modes.

use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Report the outcome for one host.
    pub fn host_result(&self, host: &str, result: Result<&str, &str>) {
        match (self.mode, result) {
            (OutputMode::Normal, Ok(release)) => println!("  ✓ {host}: {release} is live"),
            (OutputMode::Normal, Err(error)) => eprintln!("  ✗ {host}: {error}"),
            (OutputMode::Quiet, Ok(_)) => {}
            (OutputMode::Quiet, Err(error)) => eprintln!("{host}: {error}"),
            (OutputMode::Json, Ok(release)) => emit(&JsonEvent {
                event: "host_success",
                message: release,
                host: Some(host),
                duration_secs: self.duration(),
            }),
            (OutputMode::Json, Err(error)) => emit(&JsonEvent {
                event: "host_error",
                message: error,
                host: Some(host),
                duration_secs: self.duration(),
            }),
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => emit(&JsonEvent {
                event: "success",
                message,
                host: None,
                duration_secs: self.duration(),
            }),
        }
    }

    /// Print a non-fatal warning.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => emit(&JsonEvent {
                event: "warning",
                message,
                host: None,
                duration_secs: None,
            }),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string(&JsonEvent {
                    event: "error",
                    message,
                    host: None,
                    duration_secs: self.duration(),
                }) {
                    eprintln!("{json}");
                }
            }
        }
    }
}

fn emit(event: &JsonEvent<'_>) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_event_omits_empty_fields() {
        let event = JsonEvent {
            event: "success",
            message: "done",
            host: None,
            duration_secs: None,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"success","message":"done"}"#
        );
    }

    #[test]
    fn json_event_includes_host() {
        let event = JsonEvent {
            event: "host_error",
            message: "boom",
            host: Some("web-01"),
            duration_secs: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""host":"web-01""#));
    }

    #[test]
    fn elapsed_is_zero_before_timer() {
        let output = Output::new(OutputMode::Quiet);
        assert_eq!(output.elapsed_secs(), 0.0);
        assert!(output.duration().is_none());
    }
}
