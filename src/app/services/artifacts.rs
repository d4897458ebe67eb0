//! Service configuration and deployment descriptor synthesis.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use include_dir::{Dir, include_dir};
use minijinja::{AutoEscape, Environment, context};
use serde::Deserialize;

use crate::domain::{
    AppError, COMPOSE_FILE, CONFIG_FILE, FAKE_CERT_LEN, MASK_PORT, METRICS_ALLOWLIST,
    METRICS_PORT, PROXY_USERNAME, Secret, ServiceConfig, TlsDomain,
};

static PROXY_TEMPLATES: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/proxy");

/// Rendered file contents, ready to be written to the install directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifacts {
    pub config: String,
    pub compose: String,
}

/// Render both artifacts for `config`.
///
/// Identical input always yields byte-identical output.
pub fn render(config: &ServiceConfig) -> Result<RenderedArtifacts, AppError> {
    let env = template_environment()?;
    let ctx = context! {
        port => config.port,
        tls_domain => config.tls_domain().as_str(),
        secret => config.secret.raw_hex(),
        username => PROXY_USERNAME,
        metrics_enabled => config.metrics_enabled,
        metrics_port => METRICS_PORT,
        metrics_allowlist => METRICS_ALLOWLIST.to_vec(),
        mask_port => MASK_PORT,
        fake_cert_len => FAKE_CERT_LEN,
        image => config.image.as_str(),
        container_name => config.container_name.as_str(),
        config_file => CONFIG_FILE,
    };

    let rendered = RenderedArtifacts {
        config: render_template(&env, CONFIG_FILE, &ctx)?,
        compose: render_template(&env, COMPOSE_FILE, &ctx)?,
    };

    toml::from_str::<toml::Value>(&rendered.config).map_err(|e| {
        AppError::Internal(format!("Rendered {} is not valid TOML: {}", CONFIG_FILE, e))
    })?;
    serde_yaml::from_str::<serde_yaml::Value>(&rendered.compose).map_err(|e| {
        AppError::Internal(format!("Rendered {} is not valid YAML: {}", COMPOSE_FILE, e))
    })?;

    Ok(rendered)
}

fn template_environment() -> Result<Environment<'static>, AppError> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);

    for name in [CONFIG_FILE, COMPOSE_FILE] {
        let source = PROXY_TEMPLATES
            .get_file(format!("{}.j2", name))
            .and_then(|file| file.contents_utf8())
            .ok_or_else(|| AppError::Internal(format!("Missing embedded template {}.j2", name)))?;
        env.add_template(name, source).map_err(|e| {
            AppError::Internal(format!("Failed to register template '{}': {}", name, e))
        })?;
    }
    Ok(env)
}

fn render_template(
    env: &Environment<'_>,
    name: &str,
    ctx: &minijinja::Value,
) -> Result<String, AppError> {
    let template = env
        .get_template(name)
        .map_err(|e| AppError::Internal(format!("Failed to load template '{}': {}", name, e)))?;
    template
        .render(ctx)
        .map_err(|e| AppError::Internal(format!("Failed to render template '{}': {}", name, e)))
}

/// Write both artifacts into `dir`, creating it if needed.
///
/// The configuration holds the credential and is readable by root only.
pub fn write(dir: &Path, artifacts: &RenderedArtifacts) -> Result<(), AppError> {
    fs::create_dir_all(dir)?;
    let config_path = dir.join(CONFIG_FILE);
    fs::write(&config_path, &artifacts.config)?;
    restrict_permissions(&config_path, 0o600)?;
    let compose_path = dir.join(COMPOSE_FILE);
    fs::write(&compose_path, &artifacts.compose)?;
    restrict_permissions(&compose_path, 0o644)?;
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) -> Result<(), AppError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) -> Result<(), AppError> {
    Ok(())
}

/// Values recovered from a configuration artifact written by a previous install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedInstall {
    pub port: u16,
    pub secret: Secret,
    pub metrics_enabled: bool,
}

#[derive(Deserialize)]
struct SavedConfigFile {
    server: SavedServer,
    censorship: SavedCensorship,
    access: SavedAccess,
}

#[derive(Deserialize)]
struct SavedServer {
    port: u16,
    #[serde(default)]
    metrics_port: Option<u16>,
}

#[derive(Deserialize)]
struct SavedCensorship {
    tls_domain: String,
}

#[derive(Deserialize)]
struct SavedAccess {
    #[serde(default)]
    users: BTreeMap<String, String>,
}

/// Read back the system-of-record configuration at `path`.
pub fn read_saved(path: &Path) -> Result<SavedInstall, AppError> {
    let content = fs::read_to_string(path)?;
    let file: SavedConfigFile = toml::from_str(&content)?;
    let raw = file.access.users.get(PROXY_USERNAME).ok_or_else(|| {
        AppError::config_error(format!(
            "{} has no credential for user '{}'",
            path.display(),
            PROXY_USERNAME
        ))
    })?;
    let domain = TlsDomain::parse(&file.censorship.tls_domain)?;
    Ok(SavedInstall {
        port: file.server.port,
        secret: Secret::from_raw_hex(raw, domain)?,
        metrics_enabled: file.server.metrics_port.is_some(),
    })
}
