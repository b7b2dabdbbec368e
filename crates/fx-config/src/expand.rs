//! `${VAR}` expansion for configuration strings.
//!
//! Secrets such as the chat API key are never written into `fx.toml`
//! directly; the file references an environment variable instead and the
//! value is substituted once, when the configuration is loaded.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// Only braced references are expanded. Text outside them, a bare `$name`
/// included, is copied as is. An unclosed `${` is literal too.
/// `field` names the config key in the error message.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let reference = &rest[start..=start + len];
        let expanded = shellexpand::env_with_context(reference, lookup).map_err(|e| {
            ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("${{{}}} not set", e.var_name),
            }
        })?;

        out.push_str(&rest[..start]);
        out.push_str(&expanded);
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);

    Ok(out)
}

/// Expand an optional value in place, leaving `None` alone.
pub(crate) fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(raw) = value.as_deref() {
        *value = Some(expand_env(raw, field)?);
    }
    Ok(())
}

/// Environment lookup that treats an unset variable as an error.
///
/// Returning `Err` makes `shellexpand` fall back to the `:-default` part
/// when one is present, and report the variable otherwise.
fn lookup(var: &str) -> Result<Option<String>, UnsetVar> {
    std::env::var(var).map(Some).map_err(|_| UnsetVar)
}

/// Marker error for an unset environment variable.
#[derive(Debug)]
struct UnsetVar;
