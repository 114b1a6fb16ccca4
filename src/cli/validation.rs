use tracing::warn;

use crate::cli::args::{Action, CliArgs, Command};
use crate::config::Profile;
use crate::model::{RatingKind, FUNDING_KINDS};
use crate::output::OutputFormat;

/// Splits a `FIELD=VALUE` assignment. The value may itself contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(&str, &str), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| "expected FIELD=VALUE".to_string())?;
    let field = field.trim();
    if field.is_empty() {
        return Err("field name is empty".to_string());
    }
    Ok((field, value))
}

/// Known values for enumerated fields the backend stores as text.
pub fn known_values(field: &str) -> Option<&'static [&'static str]> {
    match field {
        "financ" => Some(FUNDING_KINDS),
        "tipo" => Some(RatingKind::KNOWN),
        _ => None,
    }
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    if let Some(raw) = args.format.as_deref() {
        OutputFormat::parse(raw).ok_or_else(|| format!("invalid --format '{raw}'"))?;
    }
    if let Some(raw) = args.profile.as_deref() {
        Profile::parse(raw).ok_or_else(|| {
            format!("invalid --profile '{raw}', expected production or local")
        })?;
    }
    if let Some(raw) = args.api_url.as_deref() {
        reqwest::Url::parse(raw).map_err(|e| format!("invalid --api-url '{raw}': {e}"))?;
    }

    let action = match &args.command {
        Command::Clinicas { action }
        | Command::Ratings { action }
        | Command::Productos { action } => action,
        Command::Chrome | Command::InitConfig => return Ok(()),
    };
    match action {
        Action::Create { set } | Action::Update { set, .. } => {
            for raw in set {
                let (field, value) =
                    parse_assignment(raw).map_err(|e| format!("invalid --set '{raw}': {e}"))?;
                if let Some(known) = known_values(field) {
                    if !known.contains(&value.trim().to_lowercase().as_str()) {
                        warn!(field, value, "value outside the known set: {}", known.join(", "));
                    }
                }
            }
        }
        Action::Delete { id } if id.trim().is_empty() => {
            return Err("delete requires a record identifier".to_string());
        }
        _ => {}
    }
    Ok(())
}
