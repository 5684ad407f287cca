//! Observability for a single conversion run.
//!
//! [`ConversionMetrics`] is a plain value: the generator creates one per call,
//! threads it through by mutable reference, and hands it back alongside the
//! output. [`MetricsCollector`] wraps the same value in a
//! start/record/finish protocol for callers that drive a conversion step by
//! step. Nothing recorded here ever reaches the Markdown output.

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::ContentType;
use crate::error::ErrorKind;

/// Outcome of a conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionStatus {
    Success,
    /// Completed, but at least one warning was recorded
    Partial,
    Error,
}

impl ConversionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Error => "error",
        }
    }
}

/// Counters and timings collected during one conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionMetrics {
    #[serde(skip)]
    started: Instant,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<f64>,

    pub message_count: usize,
    /// Sanitized content bytes across all processed messages
    pub total_content_size: usize,
    /// Output length in characters
    pub output_size: usize,

    pub code_blocks_processed: usize,
    pub images_processed: usize,
    pub text_messages_processed: usize,

    pub errors_encountered: usize,
    pub warnings_issued: usize,
    pub status: ConversionStatus,

    /// Sanitized content bytes per second of wall time
    pub processing_rate_bytes_per_sec: Option<f64>,
}

impl ConversionMetrics {
    /// Begin a run now.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            started_at: Utc::now(),
            finished_at: None,
            duration_seconds: None,
            message_count: 0,
            total_content_size: 0,
            output_size: 0,
            code_blocks_processed: 0,
            images_processed: 0,
            text_messages_processed: 0,
            errors_encountered: 0,
            warnings_issued: 0,
            status: ConversionStatus::Success,
            processing_rate_bytes_per_sec: None,
        }
    }

    pub fn record_message(&mut self, kind: ContentType, content_size: usize) {
        self.message_count += 1;
        self.total_content_size += content_size;

        match kind {
            ContentType::Code => self.code_blocks_processed += 1,
            ContentType::Image => self.images_processed += 1,
            ContentType::Text => self.text_messages_processed += 1,
        }
    }

    pub fn record_error(&mut self, error: &dyn fmt::Display) {
        self.errors_encountered += 1;
        self.status = ConversionStatus::Error;
        tracing::error!(error = %error, "Conversion error recorded");
    }

    pub fn record_warning(&mut self, message: &str) {
        self.warnings_issued += 1;
        if self.status == ConversionStatus::Success {
            self.status = ConversionStatus::Partial;
        }
        tracing::warn!("Conversion warning: {}", message);
    }

    /// Stamp the end of the run and derive duration and throughput.
    pub fn finish(&mut self, output_size: usize) {
        let duration = self.started.elapsed().as_secs_f64();

        self.output_size = output_size;
        self.finished_at = Some(Utc::now());
        self.duration_seconds = Some(duration);

        if duration > 0.0 && self.total_content_size > 0 {
            self.processing_rate_bytes_per_sec = Some(self.total_content_size as f64 / duration);
        }

        tracing::info!(
            status = self.status.as_str(),
            messages = self.message_count,
            content_bytes = self.total_content_size,
            output_chars = self.output_size,
            duration_secs = duration,
            "Conversion completed"
        );
    }

    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Pretty-printed JSON for export.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Misuse of the collector protocol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricsError {
    #[error("No conversion in progress")]
    NoConversionInProgress,
}

impl MetricsError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Internal
    }
}

/// Holds at most one in-flight [`ConversionMetrics`].
///
/// Recording calls made while no conversion is running are ignored.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    current: Option<ConversionMetrics>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a new conversion, replacing any unfinished one.
    pub fn start_conversion(&mut self) -> &ConversionMetrics {
        tracing::debug!("Started conversion metrics collection");
        self.current.insert(ConversionMetrics::start())
    }

    pub fn current(&self) -> Option<&ConversionMetrics> {
        self.current.as_ref()
    }

    pub fn record_message_processed(&mut self, kind: ContentType, content_size: usize) {
        if let Some(metrics) = self.current.as_mut() {
            metrics.record_message(kind, content_size);
        }
    }

    pub fn record_error(&mut self, error: &dyn fmt::Display) {
        if let Some(metrics) = self.current.as_mut() {
            metrics.record_error(error);
        }
    }

    pub fn record_warning(&mut self, message: &str) {
        if let Some(metrics) = self.current.as_mut() {
            metrics.record_warning(message);
        }
    }

    /// Finish the in-flight conversion and hand its metrics back.
    pub fn finish_conversion(&mut self, output_size: usize) -> Result<ConversionMetrics, MetricsError> {
        let mut metrics = self
            .current
            .take()
            .ok_or(MetricsError::NoConversionInProgress)?;
        metrics.finish(output_size);
        Ok(metrics)
    }
}
