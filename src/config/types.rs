use serde::Deserialize;

/// Directory page listing known PrivateBin instances
pub const DEFAULT_DIRECTORY_URL: &str = "https://privatebin.info/directory/";

/// Phrases in an instance's info alert that signal data may be wiped
pub const DEFAULT_SUSPICIOUS_PHRASES: [&str; 4] = [
    "test service",
    "deleted anytime",
    "long-term storage",
    "testing purposes",
];

/// Desktop browser user agents rotated across requests
pub const DEFAULT_USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
];

/// Main configuration structure for Binscout
///
/// Every section falls back to its defaults, so an empty file (or no file at
/// all) gives the reference behavior.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub directory: DirectoryConfig,
    pub probe: ProbeConfig,
    pub classifier: ClassifierConfig,
    pub headers: HeadersConfig,
    pub output: OutputConfig,
}

/// Where the instance list comes from
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// URL of the directory page
    pub url: String,

    /// Literal prefix stripped from each version heading
    #[serde(rename = "version-prefix")]
    pub version_prefix: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DIRECTORY_URL.to_string(),
            version_prefix: "Version ".to_string(),
        }
    }
}

/// Verification pool behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Number of concurrent workers
    pub concurrency: usize,

    /// Upper bound on a single probe (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// Maximum redirect hops followed per request
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// Largest response body read before giving up on a page
    #[serde(rename = "max-body-bytes")]
    pub max_body_bytes: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            concurrency: 50,
            request_timeout_ms: 15_000,
            max_redirects: 10,
            max_body_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Rules for sorting probed instances
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Disclosed uptime below this percentage means `low_uptime`
    #[serde(rename = "uptime-threshold")]
    pub uptime_threshold: f64,

    /// Alert phrases that mark an instance `unreliable`
    #[serde(rename = "suspicious-phrases")]
    pub suspicious_phrases: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            uptime_threshold: 99.0,
            suspicious_phrases: DEFAULT_SUSPICIOUS_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Browser profile used for outgoing requests
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeadersConfig {
    /// User agents to rotate between
    #[serde(rename = "user-agents")]
    pub user_agents: Vec<String>,

    /// Accept-Language header value
    #[serde(rename = "accept-language")]
    pub accept_language: String,
}

impl Default for HeadersConfig {
    fn default() -> Self {
        Self {
            user_agents: DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the JSON report
    #[serde(rename = "report-path")]
    pub report_path: String,

    /// Log progress after this many completed probes
    #[serde(rename = "progress-every")]
    pub progress_every: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: "privatebin_instances.json".to_string(),
            progress_every: 10,
        }
    }
}
