//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream target parses into a usable origin
//! - Reject empty blocklist/mask entries that would match nothing
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic validation failure.
#[derive(Debug)]
pub enum ValidationError {
    /// `targetUrl` does not parse or uses an unsupported scheme.
    TargetUrl { value: String, reason: String },
    /// `targetPort` is not a valid TCP port.
    TargetPort { value: String },
    /// A blocklist or mask list contains an empty entry.
    EmptyEntry { field: &'static str },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::TargetUrl { value, reason } => {
                write!(f, "targetUrl {:?} is invalid: {}", value, reason)
            }
            ValidationError::TargetPort { value } => {
                write!(f, "targetPort {:?} is not a valid port", value)
            }
            ValidationError::EmptyEntry { field } => {
                write!(f, "{} contains an empty entry", field)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, collecting every semantic error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.target_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::TargetUrl {
            value: config.target_url.clone(),
            reason: format!("unsupported scheme {:?}", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::TargetUrl {
            value: config.target_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.target_port.parse::<u16>().is_err() {
        errors.push(ValidationError::TargetPort {
            value: config.target_port.clone(),
        });
    }

    let lists = [
        ("blockedHeaders", &config.blocked_headers),
        ("blockedQueryParams", &config.blocked_query_params),
        ("maskedNeededKeys", &config.masked_needed_keys),
    ];
    for (field, entries) in lists {
        if entries.iter().any(|entry| entry.is_empty()) {
            errors.push(ValidationError::EmptyEntry { field });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
