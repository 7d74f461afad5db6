use crate::telemetry::{metrics::MetricsExporter, SubmissionMetrics};
use async_trait::async_trait;
use colored::Colorize;

pub struct ConsolePlugin;

impl ConsolePlugin {
    pub fn new() -> Self {
        ConsolePlugin
    }

    fn render(metrics: &SubmissionMetrics) -> String {
        let status = metrics.status_code.to_string();
        let status = if (200..300).contains(&metrics.status_code) {
            status.green()
        } else if (400..500).contains(&metrics.status_code) {
            status.yellow()
        } else {
            status.red()
        };

        let kind = metrics
            .error_kind
            .map(|k| format!(" kind={:?}", k).to_lowercase())
            .unwrap_or_default();

        format!(
            "{} {} {} {} {}ms {}B{}",
            "[metrics]".cyan(),
            metrics.method,
            metrics.path,
            status,
            metrics.total_latency.as_millis(),
            metrics.request_size,
            kind
        )
    }
}

impl Default for ConsolePlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsExporter for ConsolePlugin {
    async fn export_metrics(
        &self,
        metrics: SubmissionMetrics,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        println!("{}", Self::render(&metrics));
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
