use std::env;

use crate::constants::EXPECTED_SERVICE_ENV_VAR;

pub fn get_env_var(var: &str) -> Option<String> {
    env::var(var).ok()
}

/// Service name the operator expects to be running. Diagnostic only: callers log it and
/// nothing branches on it.
pub fn expected_service_name() -> Option<String> {
    get_env_var(EXPECTED_SERVICE_ENV_VAR)
}
