use std::env;

use crate::config::stage::Stage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
}

#[derive(Debug, Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
    /// Captured while parsing and logged once tracing is up.
    pub(crate) warnings: Vec<String>,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        Self::resolve(component, env_string("SERVICE_NAME"), env_string("STAGE"))
    }

    pub(crate) fn resolve(
        component: &str,
        service_name: Option<String>,
        stage: Option<String>,
    ) -> Self {
        let component = component.trim().to_string();
        let mut warnings = Vec::new();

        let service_name = service_name
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| component.clone());

        let environment = match stage.filter(|v| !v.trim().is_empty()) {
            Some(raw) => match Stage::try_from(&raw) {
                Ok(stage) => stage.to_string(),
                Err(_) => {
                    warnings.push(format!(
                        "STAGE is invalid (value: {raw}); defaulting to {}",
                        Stage::default()
                    ));
                    Stage::default().to_string()
                }
            },
            None => Stage::default().to_string(),
        };

        Self {
            service_context: ServiceContext {
                service_name,
                environment,
                component,
            },
            warnings,
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok()
}
