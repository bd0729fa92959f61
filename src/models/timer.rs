use serde::Serialize;

/// A server-persisted stopwatch. Elapsed time is pushed by the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub timer_id: String,
    pub project: String,
    pub start_time: String, // RFC 3339, UTC
    pub elapsed_time: f64,  // seconds
    pub is_running: bool,
}
