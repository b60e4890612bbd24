use anyhow::{Context, Result};
use std::path::Path;
use strum::{Display, EnumString};
use tokio::io::AsyncWriteExt;
use toml_edit::{Array, DocumentMut, InlineTable, Value, value};

use crate::requirements::ProjectRequirements;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Toml,
}

/// Serializes the record with its fields in declaration order.
pub fn render(record: &ProjectRequirements, format: OutputFormat) -> Result<String> {
    let mut document = match format {
        OutputFormat::Json => serde_json::to_string_pretty(record)
            .context("Failed to serialize requirements as JSON")?,
        OutputFormat::Toml => to_toml(record).to_string(),
    };
    if !document.ends_with('\n') {
        document.push('\n');
    }
    Ok(document)
}

fn string_array<'a>(items: impl IntoIterator<Item = &'a String>) -> Array {
    items.into_iter().map(String::as_str).collect()
}

/// `features` is an inline array so that it stays in place instead of being
/// hoisted below the plain keys as `[[features]]`.
fn to_toml(record: &ProjectRequirements) -> DocumentMut {
    let mut features = Array::new();
    for feature in record.features() {
        let mut table = InlineTable::new();
        table.insert("title", feature.title().into());
        table.insert("description", feature.description().into());
        table.decor_mut().set_prefix("\n    ");
        features.push_formatted(Value::InlineTable(table));
    }
    if !features.is_empty() {
        features.set_trailing_comma(true);
        features.set_trailing("\n");
    }

    let mut document = DocumentMut::new();
    document["project_name"] = value(record.project_name());
    document["project_type"] = value(record.project_type().to_string());
    document["stakeholder"] = value(record.stakeholder());
    document["problem_statement"] = value(record.problem_statement());
    document["features"] = value(features);
    document["success_metrics"] = value(string_array(record.success_metrics()));
    if let Some(constraints) = record.constraints() {
        document["constraints"] = value(string_array(constraints));
    }
    document
}

/// Writes the record to `path`, or to stdout when no path is given.
pub async fn write(
    record: &ProjectRequirements,
    format: OutputFormat,
    path: Option<&Path>,
) -> Result<()> {
    let document = render(record, format)?;

    match path {
        Some(path) => tokio::fs::write(path, document)
            .await
            .with_context(|| format!("Failed to write requirements to {}", path.display())),
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(document.as_bytes())
                .await
                .context("Failed to write requirements to stdout")?;
            stdout.flush().await.context("Failed to flush stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::tests::checkout_revamp_json;
    use std::str::FromStr;

    fn record() -> ProjectRequirements {
        let mut document = checkout_revamp_json();
        document["constraints"] = serde_json::json!(["Ship by Q3"]);
        ProjectRequirements::from_json(&document.to_string()).unwrap()
    }

    #[test]
    fn json_output_reads_back_as_the_same_record() {
        let rendered = render(&record(), OutputFormat::Json).unwrap();

        assert!(rendered.starts_with("{\n  \"project_name\": \"Checkout Revamp\""));
        assert_eq!(ProjectRequirements::from_json(&rendered).unwrap(), record());
    }

    #[test]
    fn toml_output_keeps_field_order() {
        let rendered = render(&record(), OutputFormat::Toml).unwrap();

        let positions: Vec<usize> = [
            "project_name =",
            "project_type =",
            "stakeholder =",
            "problem_statement =",
            "features =",
            "success_metrics =",
            "constraints =",
        ]
        .iter()
        .map(|key| rendered.find(key).unwrap())
        .collect();

        assert!(rendered.starts_with("project_name = \"Checkout Revamp\"\n"));
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{rendered}");
        assert!(!rendered.contains("[[features]]"));
    }

    #[test]
    fn toml_output_reads_back_with_the_same_values() {
        let rendered = render(&record(), OutputFormat::Toml).unwrap();
        let table: toml::Table = toml::from_str(&rendered).unwrap();

        assert_eq!(table["project_type"].as_str(), Some("FEATURE_ENHANCEMENT"));
        assert_eq!(
            table["features"][0]["title"].as_str(),
            Some("One-page checkout")
        );
        assert_eq!(
            table["success_metrics"][0].as_str(),
            Some("Abandonment below 20%")
        );
        assert_eq!(table["constraints"][0].as_str(), Some("Ship by Q3"));
    }

    #[tokio::test]
    async fn writes_to_the_given_file() {
        let path = std::env::temp_dir().join(format!(
            "requirements-intake-{}.json",
            std::process::id()
        ));

        write(&record(), OutputFormat::Json, Some(&path)).await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();
        assert_eq!(ProjectRequirements::from_json(&written).unwrap(), record());
    }

    #[test]
    fn format_names_parse_from_cli() {
        assert_eq!(OutputFormat::from_str("toml").unwrap(), OutputFormat::Toml);
        assert!(OutputFormat::from_str("yaml").is_err());
    }
}
