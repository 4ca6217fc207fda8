/// Where the prediction service lives and how long we wait for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub predict_path: &'static str,
    pub compare_path: &'static str,
    pub timeout_ms: u64,
}

pub struct ServiceDefaults {
    pub base_url: &'static str,
    pub predict_path: &'static str,
    pub compare_path: &'static str,
    pub timeout_ms: u64,
}

pub const SERVICE: ServiceDefaults = ServiceDefaults {
    base_url: "http://127.0.0.1:5000",
    predict_path: "/api/predict",
    compare_path: "/api/compare",
    timeout_ms: 5000,
};

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: SERVICE.base_url.to_string(),
            predict_path: SERVICE.predict_path,
            compare_path: SERVICE.compare_path,
            timeout_ms: SERVICE.timeout_ms,
        }
    }
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn predict_url(&self) -> String {
        join_url(&self.base_url, self.predict_path)
    }

    pub fn compare_url(&self) -> String {
        join_url(&self.base_url, self.compare_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
