//! Environment variable validation and configuration module for Advodir
//!
//! This module provides centralized validation and configuration management
//! for all environment variables used by the advodir directory service.
//!
//! # Supported Environment Variables
//!
//! ## Server Configuration
//! - `ADVODIR_HOST`: Server bind address (default: "0.0.0.0")
//! - `ADVODIR_PORT`: Server port (default: "3000")
//!
//! ## Data Configuration
//! - `ADVODIR_DATA_FILE`: Path to the advocate dataset JSON file
//!   (default: "data/advocates.json")
//!
//! ## Logging Configuration
//! - `RUST_LOG`: Standard Rust logging configuration
//! - `ADVODIR_LOG_LEVEL`: Application-specific log level override
//!
//! ## Rate Limiting Configuration
//! - `ADVODIR_RATE_LIMIT_WINDOW_SECS`: Sliding window length in seconds (default: "60")
//! - `ADVODIR_RATE_LIMIT_MAX_REQUESTS`: Requests allowed per client per window (default: "60")
//!
//! Rate-limit values of zero are configuration contract violations and fail
//! validation at startup; they are never surfaced at request time.

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use tracing::{info, warn};

/// Environment validation errors
#[derive(Debug, Clone)]
pub struct EnvValidationError {
    pub variable: String,
    pub message: String,
    pub severity: ErrorSeverity,
}

impl fmt::Display for EnvValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} - {}: {}", self.severity, self.variable, self.message)
    }
}

/// Severity level for environment validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    /// Critical errors that prevent application startup
    Critical,
    /// Warnings about missing optional variables or suboptimal configurations
    Warning,
    /// Informational messages about default values being used
    Info,
}

/// Validated application configuration derived from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Server
    pub host: String,
    pub port: u16,
    pub bind_address: SocketAddr,

    // Data
    pub data_file: String,

    // Logging
    pub log_level: String,

    // Rate limiting
    pub rate_limit_window_secs: u64,
    pub rate_limit_max_requests: usize,
}

/// Validate all environment variables and return configuration or errors
pub fn validate_environment() -> Result<AppConfig, Vec<EnvValidationError>> {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Server configuration
    let host = env::var("ADVODIR_HOST").unwrap_or_else(|_| {
        warnings.push(EnvValidationError {
            variable: "ADVODIR_HOST".to_string(),
            message: "Using default host '0.0.0.0'".to_string(),
            severity: ErrorSeverity::Info,
        });
        "0.0.0.0".to_string()
    });

    // Validate host is a valid IP address
    if IpAddr::from_str(&host).is_err() {
        errors.push(EnvValidationError {
            variable: "ADVODIR_HOST".to_string(),
            message: format!("Invalid IP address: {}", host),
            severity: ErrorSeverity::Critical,
        });
    }

    let port = match env::var("ADVODIR_PORT") {
        Ok(port_str) => match port_str.parse::<u16>() {
            Ok(port) => {
                if port < 1024 && port != 0 {
                    warnings.push(EnvValidationError {
                        variable: "ADVODIR_PORT".to_string(),
                        message: format!(
                            "Using privileged port {}, may require root privileges",
                            port
                        ),
                        severity: ErrorSeverity::Warning,
                    });
                }
                port
            }
            Err(_) => {
                errors.push(EnvValidationError {
                    variable: "ADVODIR_PORT".to_string(),
                    message: format!("Invalid port number: {}", port_str),
                    severity: ErrorSeverity::Critical,
                });
                3000 // fallback
            }
        },
        Err(_) => {
            warnings.push(EnvValidationError {
                variable: "ADVODIR_PORT".to_string(),
                message: "Using default port 3000".to_string(),
                severity: ErrorSeverity::Info,
            });
            3000
        }
    };

    // Create bind address
    let bind_address = match format!("{}:{}", host, port).parse::<SocketAddr>() {
        Ok(addr) => addr,
        Err(_) => {
            errors.push(EnvValidationError {
                variable: "ADVODIR_HOST/ADVODIR_PORT".to_string(),
                message: format!("Cannot create valid socket address from {}:{}", host, port),
                severity: ErrorSeverity::Critical,
            });
            "0.0.0.0:3000".parse().unwrap() // fallback
        }
    };

    // Data configuration
    let data_file = env::var("ADVODIR_DATA_FILE").unwrap_or_else(|_| {
        warnings.push(EnvValidationError {
            variable: "ADVODIR_DATA_FILE".to_string(),
            message: "Using default data file 'data/advocates.json'".to_string(),
            severity: ErrorSeverity::Info,
        });
        "data/advocates.json".to_string()
    });

    // Logging configuration
    let log_level = env::var("ADVODIR_LOG_LEVEL")
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| {
            warnings.push(EnvValidationError {
                variable: "RUST_LOG/ADVODIR_LOG_LEVEL".to_string(),
                message: "Using default log level 'advodir=info,tower_http=debug'".to_string(),
                severity: ErrorSeverity::Info,
            });
            "advodir=info,tower_http=debug".to_string()
        });

    // Rate limiting configuration
    let rate_limit_window_secs =
        parse_env_var_with_default("ADVODIR_RATE_LIMIT_WINDOW_SECS", 60u64, &mut warnings);

    let rate_limit_max_requests =
        parse_env_var_with_default("ADVODIR_RATE_LIMIT_MAX_REQUESTS", 60usize, &mut warnings);

    // A zero-length window or zero ceiling would deny every request forever.
    if rate_limit_window_secs == 0 {
        errors.push(EnvValidationError {
            variable: "ADVODIR_RATE_LIMIT_WINDOW_SECS".to_string(),
            message: "Rate limit window must be greater than zero".to_string(),
            severity: ErrorSeverity::Critical,
        });
    }
    if rate_limit_max_requests == 0 {
        errors.push(EnvValidationError {
            variable: "ADVODIR_RATE_LIMIT_MAX_REQUESTS".to_string(),
            message: "Rate limit request ceiling must be greater than zero".to_string(),
            severity: ErrorSeverity::Critical,
        });
    }

    // Add all warnings to errors for reporting
    errors.extend(warnings);

    // Check if we have any critical errors
    let has_critical_errors = errors.iter().any(|e| e.severity == ErrorSeverity::Critical);

    if has_critical_errors {
        return Err(errors);
    }

    // Log non-critical issues
    for error in &errors {
        match error.severity {
            ErrorSeverity::Warning => warn!("{}: {}", error.variable, error.message),
            ErrorSeverity::Info => info!("{}: {}", error.variable, error.message),
            ErrorSeverity::Critical => {} // Already handled above
        }
    }

    Ok(AppConfig {
        host,
        port,
        bind_address,
        data_file,
        log_level,
        rate_limit_window_secs,
        rate_limit_max_requests,
    })
}

/// Parse a numeric environment variable, falling back to a default on
/// absence or malformed input
fn parse_env_var_with_default<T: FromStr + fmt::Display + Copy>(
    var_name: &str,
    default: T,
    warnings: &mut Vec<EnvValidationError>,
) -> T {
    match env::var(var_name) {
        Ok(value_str) => match value_str.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warnings.push(EnvValidationError {
                    variable: var_name.to_string(),
                    message: format!(
                        "Invalid value '{}', using default {}",
                        value_str, default
                    ),
                    severity: ErrorSeverity::Warning,
                });
                default
            }
        },
        Err(_) => {
            warnings.push(EnvValidationError {
                variable: var_name.to_string(),
                message: format!("Using default value {}", default),
                severity: ErrorSeverity::Info,
            });
            default
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_var_falls_back_on_garbage() {
        let mut warnings = Vec::new();
        unsafe { env::set_var("ADVODIR_TEST_NUMERIC", "not-a-number") };
        let value = parse_env_var_with_default("ADVODIR_TEST_NUMERIC", 42u64, &mut warnings);
        unsafe { env::remove_var("ADVODIR_TEST_NUMERIC") };
        assert_eq!(value, 42);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, ErrorSeverity::Warning);
    }

    #[test]
    fn parse_env_var_uses_default_when_absent() {
        let mut warnings = Vec::new();
        let value =
            parse_env_var_with_default("ADVODIR_TEST_MISSING_VAR", 7usize, &mut warnings);
        assert_eq!(value, 7);
        assert_eq!(warnings[0].severity, ErrorSeverity::Info);
    }
}
