use serde::Serialize;

/// A billable project. The name is the key everywhere (settings, exports).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub hourly_rate: f64,
}

impl Project {
    pub fn new(name: impl Into<String>, hourly_rate: f64) -> Self {
        Self {
            name: name.into(),
            hourly_rate,
        }
    }
}
