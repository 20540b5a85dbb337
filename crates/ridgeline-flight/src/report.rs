use std::path::Path;

use serde::{Deserialize, Serialize};

/// Timing statistics over a series of samples, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// What happened on one frame of a flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRecord {
    pub center: [i32; 2],
    pub requests: u32,
    pub cold_start: bool,
    pub draws: u32,
    pub update_ms: f64,
    pub frame_ms: f64,
}

/// Summary of one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightResult {
    pub route: String,
    pub render_radius: i32,
    pub frames: u32,
    pub total_requests: u64,
    pub cold_starts: u32,
    pub max_requests_per_frame: u32,
    /// Frames on which the view center moved to a different chunk.
    pub chunk_changes: u32,
    pub final_center: [i32; 2],
    pub update_timings: TimingSeries,
    pub frame_timings: TimingSeries,
}

/// Accumulates frame records for one route.
#[derive(Debug, Clone, Default)]
pub struct FlightStats {
    records: Vec<FrameRecord>,
}

impl FlightStats {
    pub fn with_capacity(frames: usize) -> Self {
        Self {
            records: Vec::with_capacity(frames),
        }
    }

    pub fn record(&mut self, record: FrameRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn finish(&self, route: &str, render_radius: i32) -> FlightResult {
        let chunk_changes = self
            .records
            .windows(2)
            .filter(|pair| pair[0].center != pair[1].center)
            .count() as u32;
        let update_times: Vec<f64> = self.records.iter().map(|r| r.update_ms).collect();
        let frame_times: Vec<f64> = self.records.iter().map(|r| r.frame_ms).collect();

        FlightResult {
            route: route.to_string(),
            render_radius,
            frames: self.records.len() as u32,
            total_requests: self.records.iter().map(|r| r.requests as u64).sum(),
            cold_starts: self.records.iter().filter(|r| r.cold_start).count() as u32,
            max_requests_per_frame: self.records.iter().map(|r| r.requests).max().unwrap_or(0),
            chunk_changes,
            final_center: self.records.last().map_or([0, 0], |r| r.center),
            update_timings: compute_timings(&update_times),
            frame_timings: compute_timings(&frame_times),
        }
    }
}

/// A complete run over one or more routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightReport {
    pub timestamp: String,
    pub results: Vec<FlightResult>,
}

/// Save a report as pretty JSON, creating parent directories.
pub fn save_report(path: &Path, report: &FlightReport) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// Load a report. Returns None if the file is missing or malformed.
pub fn load_report(path: &Path) -> Option<FlightReport> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[FlightResult]) -> String {
    let mut out = String::new();
    out.push_str("| Route | R | Frames | Requests | Cold | Max/frame | Chunk moves | Update mean (ms) | Frame mean (ms) | Frame P95 (ms) |\n");
    out.push_str("|-------|---|--------|----------|------|-----------|-------------|------------------|-----------------|----------------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {:.3} | {:.2} | {:.2} |\n",
            r.route,
            r.render_radius,
            r.frames,
            r.total_requests,
            r.cold_starts,
            r.max_requests_per_frame,
            r.chunk_changes,
            r.update_timings.mean_ms,
            r.frame_timings.mean_ms,
            r.frame_timings.p95_ms,
        ));
    }

    out
}

/// Compute timing statistics from samples in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
