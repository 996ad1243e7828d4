use crate::errors::{CalcError, CalcResult};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub default_risk_free_rate: f64,
    pub strike_step: f64,
    pub presets_path: Option<PathBuf>,
    pub initial_ticker: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 3001,
            default_risk_free_rate: 3.0,
            strike_step: 2.5,
            presets_path: None,
            initial_ticker: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> CalcResult<Self> {
        dotenvy::dotenv().ok();

        let server_port = env_var_or("SERVER_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| CalcError::Config(format!("SERVER_PORT: {e}")))?;

        let default_risk_free_rate = env_var_or("DEFAULT_RISK_FREE_RATE", "3")
            .parse::<f64>()
            .map_err(|e| CalcError::Config(format!("DEFAULT_RISK_FREE_RATE: {e}")))?;
        if !default_risk_free_rate.is_finite() {
            return Err(CalcError::Config("DEFAULT_RISK_FREE_RATE must be finite".into()));
        }

        let strike_step = env_var_or("STRIKE_STEP", "2.5")
            .parse::<f64>()
            .map_err(|e| CalcError::Config(format!("STRIKE_STEP: {e}")))?;
        if !strike_step.is_finite() || strike_step <= 0.0 {
            return Err(CalcError::Config(format!(
                "STRIKE_STEP must be positive, got {strike_step}"
            )));
        }

        Ok(Self {
            server_port,
            default_risk_free_rate,
            strike_step,
            presets_path: env_var_opt("PRESETS_PATH").map(PathBuf::from),
            initial_ticker: env_var_opt("INITIAL_TICKER"),
        })
    }
}

fn env_var_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
