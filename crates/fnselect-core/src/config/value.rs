//! Conversion of service files into TOML documents.
//!
//! Function settings are held as JSON values so JSON service files keep every
//! value, including `null`. TOML output is built explicitly from them: dates
//! read from a TOML file become TOML datetimes again, and values TOML cannot
//! hold are rejected with the key path that carries them.

use anyhow::Result;
use serde_json::{Map, Value};
use toml::value::Datetime;

use super::schema::{FunctionEntry, ProviderConfig, ServiceConfig};

/// Key serde uses when a TOML datetime is read into a self-describing value.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// Build the TOML document for `config`, keeping function order.
pub fn service_to_toml(config: &ServiceConfig) -> Result<toml::Table> {
    let mut root = toml::Table::new();

    if let Some(service) = &config.service {
        root.insert("service".into(), toml::Value::String(service.clone()));
    }
    for (key, value) in &config.extra {
        root.insert(key.clone(), json_to_toml(value, key)?);
    }
    if !config.provider.is_empty() {
        root.insert("provider".into(), provider_to_toml(&config.provider));
    }

    let mut functions = toml::Table::new();
    for (name, entry) in config.functions.iter() {
        functions.insert(name.to_string(), function_to_toml(name, entry)?);
    }
    if !functions.is_empty() {
        root.insert("functions".into(), toml::Value::Table(functions));
    }

    Ok(root)
}

fn provider_to_toml(provider: &ProviderConfig) -> toml::Value {
    let mut table = toml::Table::new();
    let fields = [
        ("name", &provider.name),
        ("region", &provider.region),
        ("stage", &provider.stage),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            table.insert(key.into(), toml::Value::String(value.clone()));
        }
    }
    toml::Value::Table(table)
}

fn function_to_toml(name: &str, entry: &FunctionEntry) -> Result<toml::Value> {
    let mut table = toml::Table::new();
    if let Some(regions) = &entry.regions {
        table.insert("regions".into(), string_array(regions));
    }
    if let Some(stages) = &entry.stages {
        table.insert("stages".into(), string_array(stages));
    }
    for (key, value) in &entry.settings {
        let path = format!("functions.{name}.{key}");
        table.insert(key.clone(), json_to_toml(value, &path)?);
    }
    Ok(toml::Value::Table(table))
}

fn string_array(values: &[String]) -> toml::Value {
    toml::Value::Array(values.iter().cloned().map(toml::Value::String).collect())
}

/// Convert one setting value, naming `path` when TOML cannot represent it.
pub fn json_to_toml(value: &Value, path: &str) -> Result<toml::Value> {
    let converted = match value {
        Value::Null => anyhow::bail!("'{}' is null, which TOML cannot represent", path),
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                toml::Value::Integer(i)
            } else if n.is_f64() {
                toml::Value::Float(n.as_f64().unwrap_or_default())
            } else {
                anyhow::bail!("'{}' = {} is out of range for a TOML integer", path, n);
            }
        }
        Value::String(s) => toml::Value::String(s.clone()),
        Value::Array(items) => toml::Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(idx, item)| json_to_toml(item, &format!("{path}[{idx}]")))
                .collect::<Result<_>>()?,
        ),
        Value::Object(map) => match toml_datetime(map) {
            Some(datetime) => toml::Value::Datetime(datetime),
            None => {
                let mut table = toml::Table::new();
                for (key, item) in map {
                    table.insert(key.clone(), json_to_toml(item, &format!("{path}.{key}"))?);
                }
                toml::Value::Table(table)
            }
        },
    };
    Ok(converted)
}

fn toml_datetime(map: &Map<String, Value>) -> Option<Datetime> {
    if map.len() != 1 {
        return None;
    }
    map.get(TOML_DATETIME_KEY)?.as_str()?.parse().ok()
}

/// Replace datetimes read from TOML with their plain string form.
pub fn plain_datetimes(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let datetime = toml_datetime(map).map(|datetime| datetime.to_string());
            match datetime {
                Some(datetime) => *value = Value::String(datetime),
                None => map.values_mut().for_each(plain_datetimes),
            }
        }
        Value::Array(items) => items.iter_mut().for_each(plain_datetimes),
        _ => {}
    }
}
