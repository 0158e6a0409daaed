//! Label and value lookup: cache first when enabled, live logcli otherwise.

use lokq_core::builder::LabelSource;
use lokq_core::cache::LabelCache;
use lokq_core::error::QueryError;
use lokq_core::query::TimeRange;
use std::path::PathBuf;
use std::process::Command;

pub struct LogcliSource {
    command: String,
    cache_file: Option<PathBuf>,
}

impl LogcliSource {
    /// `cache_file` of `None` disables cache lookups entirely.
    pub fn new(command: String, cache_file: Option<PathBuf>) -> Self {
        Self {
            command,
            cache_file,
        }
    }

    /// A cache lookup only ever hits or misses; load failures are misses.
    fn cached(&self) -> Option<LabelCache> {
        self.cache_file.as_deref().and_then(LabelCache::load)
    }

    /// Run `logcli labels <extra...> --quiet <time args...>` and collect its
    /// stdout, one candidate per trimmed non-empty line.
    fn run_labels(&self, extra: &[&str], range: &TimeRange) -> Result<Vec<String>, QueryError> {
        let output = Command::new(&self.command)
            .arg("labels")
            .args(extra)
            .arg("--quiet")
            .args(range.args())
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(QueryError::Provider(format!(
                "{} labels {} exited with {}: {}",
                self.command,
                extra.join(" "),
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

impl LabelSource for LogcliSource {
    fn labels(&self, range: &TimeRange) -> Result<Vec<String>, QueryError> {
        if let Some(cache) = self.cached() {
            if let Some(labels) = cache.labels {
                return Ok(labels);
            }
            // "labels" key absent: fall through to the live path.
        }
        self.run_labels(&[], range)
    }

    fn label_values(&self, label: &str, range: &TimeRange) -> Result<Vec<String>, QueryError> {
        if let Some(cache) = self.cached() {
            if let Some(values) = cache.values_for(label) {
                return Ok(values.to_vec());
            }
            // Label absent from the cache: fall through to the live path.
        }
        self.run_labels(&[label], range)
    }
}
