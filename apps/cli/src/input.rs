//! Form input gathered from the command line and from JSON files.

use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use shared::domain::{FieldName, FormState};

/// Parses `NAME=VALUE`. The value is kept as raw text, like a form input.
pub fn parse_assignment(raw: &str) -> Result<(FieldName, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let field = name.trim().parse::<FieldName>().map_err(|err| err.to_string())?;
    Ok((field, value.to_string()))
}

/// Loads a JSON object of field values into `form`. Numbers are written as
/// text, strings verbatim and `null` as an empty input.
pub fn apply_json_object(form: &mut FormState, json: &Value) -> Result<()> {
    let object = json
        .as_object()
        .ok_or_else(|| anyhow!("transaction input must be a JSON object"))?;
    for (name, value) in object {
        let text = match value {
            Value::Null => String::new(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            other => bail!("field '{name}' must be a number, string or null, got {other}"),
        };
        form.set_named(name, text)?;
    }
    Ok(())
}

pub fn load_json_file(form: &mut FormState, path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read transaction file '{}'", path.display()))?;
    let json: Value = serde_json::from_str(&raw)
        .with_context(|| format!("'{}' is not valid JSON", path.display()))?;
    apply_json_object(form, &json).with_context(|| format!("in '{}'", path.display()))
}
