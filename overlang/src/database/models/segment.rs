//! Segment database model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{Error, Result};

/// A single subtitle line produced by a job.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SegmentDbModel {
    pub id: i64,
    pub job_id: i64,
    /// Seconds from the start of the video, 3 decimal places.
    pub start_time: f64,
    /// Seconds from the start of the video, 3 decimal places.
    pub end_time: f64,
    /// Position within the job, unique per job.
    pub seq: i64,
    pub text: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Values for inserting a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSegment {
    pub start_time: f64,
    pub end_time: f64,
    pub seq: i64,
    pub text: String,
}

impl NewSegment {
    /// Validate and normalize a segment: times rounded to milliseconds,
    /// `0 <= start <= end`, non-blank text.
    pub fn new(start_time: f64, end_time: f64, seq: i64, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let start_time = round_millis(start_time);
        let end_time = round_millis(end_time);

        // Rounding can overflow values near f64::MAX.
        if !start_time.is_finite() || !end_time.is_finite() {
            return Err(Error::validation(format!(
                "segment {}: times must be finite",
                seq
            )));
        }

        if start_time < 0.0 {
            return Err(Error::validation(format!(
                "segment {}: startTime must not be negative",
                seq
            )));
        }
        if end_time < start_time {
            return Err(Error::validation(format!(
                "segment {}: endTime must not precede startTime",
                seq
            )));
        }
        if text.trim().is_empty() {
            return Err(Error::validation(format!("segment {}: text is blank", seq)));
        }

        Ok(Self {
            start_time,
            end_time,
            seq,
            text,
        })
    }
}

fn round_millis(secs: f64) -> f64 {
    (secs * 1000.0).round() / 1000.0
}
