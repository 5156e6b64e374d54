use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use axum::http::HeaderName;
use rolegate_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_IDENTITY_HEADER: &str = "x-user-id";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub identity_header: HeaderName,
    pub seed_default_roles: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let database_max_connections =
            parse_max_connections(optional_env("DATABASE_MAX_CONNECTIONS"))?;
        let frontend_url =
            optional_env("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());

        let api_host = optional_env("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = optional_env("API_PORT")
            .map(|value| {
                value
                    .parse::<u16>()
                    .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))
            })
            .transpose()?
            .unwrap_or(3001);

        let identity_header = parse_identity_header(optional_env("IDENTITY_HEADER"))?;
        let seed_default_roles =
            parse_flag("SEED_DEFAULT_ROLES", optional_env("SEED_DEFAULT_ROLES"), true)?;

        Ok(Self {
            migrate_only,
            database_url,
            database_max_connections,
            frontend_url,
            api_host,
            api_port,
            identity_header,
            seed_default_roles,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    optional_env(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_max_connections(value: Option<String>) -> Result<u32, AppError> {
    let Some(value) = value else {
        return Ok(10);
    };

    match value.parse::<u32>() {
        Ok(connections) if connections > 0 => Ok(connections),
        _ => Err(AppError::Validation(format!(
            "DATABASE_MAX_CONNECTIONS must be a positive integer, got '{value}'"
        ))),
    }
}

fn parse_identity_header(value: Option<String>) -> Result<HeaderName, AppError> {
    let value = value.unwrap_or_else(|| DEFAULT_IDENTITY_HEADER.to_owned());
    HeaderName::from_bytes(value.to_ascii_lowercase().as_bytes()).map_err(|error| {
        AppError::Validation(format!("invalid IDENTITY_HEADER '{value}': {error}"))
    })
}

fn parse_flag(name: &str, value: Option<String>, default: bool) -> Result<bool, AppError> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "{name} must be 'true' or 'false', got '{value}'"
        ))),
    }
}
