//! Engine configuration.

use derive_builder::Builder;

/// Configuration for the workflow execution engine.
///
/// The engine enforces no timeouts and performs no retries; those belong to
/// the providers behind the capability traits.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct EngineConfig {
    /// Maximum number of concurrent workflow runs.
    #[builder(default = "10")]
    pub max_concurrent_runs: usize,
}

impl EngineConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(max) = self.max_concurrent_runs {
            if max == 0 {
                return Err("max_concurrent_runs must be at least 1".into());
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_runs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        assert_eq!(EngineConfig::default().max_concurrent_runs, 10);
    }

    #[test]
    fn test_builder_rejects_zero_runs() {
        let result = EngineConfigBuilder::default().max_concurrent_runs(0usize).build();
        assert!(result.is_err());
    }
}
