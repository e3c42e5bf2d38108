use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives the three bundling phases and reports progress.
pub struct BundleEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> BundleEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs collect → render → write and returns the written targets.
    pub async fn run(&self) -> Result<Vec<String>> {
        tracing::info!("🔍 Collecting icon sources...");
        let pairs = self.pipeline.collect().await?;
        tracing::info!("📦 Collected {} icon pairs", pairs.len());
        self.monitor.log_stats("Collect");

        let artifacts = self.pipeline.render(pairs).await?;
        let rules: usize = artifacts.iter().map(|artifact| artifact.rules).sum();
        tracing::info!(
            "🎨 Rendered {} CSS rules into {} targets",
            rules,
            artifacts.len()
        );
        self.monitor.log_stats("Render");

        let targets = self.pipeline.write(artifacts).await?;
        tracing::info!("📁 Wrote {} targets", targets.len());
        self.monitor.log_stats("Write");

        self.monitor.log_final_stats();
        Ok(targets)
    }
}
