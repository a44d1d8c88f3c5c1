// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Loads QA records from a JSON file on disk.
//
// Supported layouts:
//
//   records.jsonl   one JSON object per line
//     {"id": "1", "question": "...", "context": "..."}
//
//   records.json    a top-level array of objects
//     [{"question": "...", "context": "..."}, ...]
//
//   squad.json      the nested SQuAD layout
//     {"data": [{"title": "...", "paragraphs": [
//         {"context": "...", "qas": [{"id": "...", "question": "..."}]}
//     ]}]}
//
// The SQuAD layout is flattened into one record per question,
// repeating the paragraph context on each one. That repetition
// is what the batcher later has to keep apart.
//
// Reference: serde_json documentation
//            Rust Book §9 (Error Handling)

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::record::Record;
use crate::domain::traits::RecordSource;

/// Loads records from a .json / .jsonl / .ndjson file.
/// Implements the RecordSource trait from Layer 3.
pub struct JsonDatasetLoader {
    path: PathBuf,
}

impl JsonDatasetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_line_delimited(&self) -> bool {
        matches!(
            self.path.extension().and_then(|e| e.to_str()),
            Some("jsonl") | Some("ndjson")
        )
    }
}

impl RecordSource for JsonDatasetLoader {
    fn load_all(&self) -> Result<Vec<Record>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read dataset '{}'", self.path.display()))?;

        let records = if self.is_line_delimited() {
            parse_json_lines(&text, &self.path)?
        } else {
            parse_json_document(&text, &self.path)?
        };

        tracing::info!(
            "Loaded {} records from '{}'",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

/// One object per non-blank line
fn parse_json_lines(text: &str, path: &Path) -> Result<Vec<Record>> {
    let mut records = Vec::new();

    for (n, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: invalid JSON", path.display(), n + 1))?;
        let record = into_record(value)
            .with_context(|| format!("{}:{}", path.display(), n + 1))?;
        records.push(record);
    }

    Ok(records)
}

/// A whole-file JSON document: array of records or SQuAD layout
fn parse_json_document(text: &str, path: &Path) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_str(text)
        .with_context(|| format!("'{}' is not valid JSON", path.display()))?;

    if value.as_object().is_some_and(|obj| obj.contains_key("data")) {
        let squad: SquadFile = serde_json::from_value(value)
            .with_context(|| format!("'{}' looks like SQuAD but does not parse", path.display()))?;
        return Ok(flatten_squad(squad));
    }

    match value {
        Value::Array(rows) => rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| into_record(row).with_context(|| format!("{} row {}", path.display(), i)))
            .collect(),
        _ => bail!(
            "'{}' must hold an array of records or a SQuAD-style {{\"data\": [...]}} object",
            path.display()
        ),
    }
}

fn into_record(value: Value) -> Result<Record> {
    match value {
        Value::Object(fields) => Ok(Record::new(fields)),
        other => Err(anyhow!("expected a JSON object, found {}", json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_)  => "an array",
        Value::Object(_) => "an object",
    }
}

// ─── SQuAD layout ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SquadFile {
    data: Vec<SquadArticle>,
}

#[derive(Deserialize)]
struct SquadArticle {
    #[serde(default)]
    title: Option<String>,
    paragraphs: Vec<SquadParagraph>,
}

#[derive(Deserialize)]
struct SquadParagraph {
    context: String,
    qas: Vec<SquadQuestion>,
}

#[derive(Deserialize)]
struct SquadQuestion {
    #[serde(default)]
    id: Option<String>,
    question: String,
}

fn flatten_squad(squad: SquadFile) -> Vec<Record> {
    let mut records = Vec::new();

    for article in squad.data {
        for paragraph in article.paragraphs {
            for qa in paragraph.qas {
                let mut fields = Map::new();
                if let Some(id) = qa.id {
                    fields.insert("id".to_string(), Value::String(id));
                }
                if let Some(title) = &article.title {
                    fields.insert("title".to_string(), Value::String(title.clone()));
                }
                fields.insert("question".to_string(), Value::String(qa.question));
                fields.insert("context".to_string(), Value::String(paragraph.context.clone()));
                records.push(Record::new(fields));
            }
        }
    }

    records
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_loads_json_lines_skipping_blanks() {
        let dir  = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "rows.jsonl",
            "{\"question\":\"q1\",\"context\":\"A\"}\n\n{\"question\":\"q2\",\"context\":\"B\"}\n",
        );

        let records = JsonDatasetLoader::new(path).load_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].text("question"), Some(Some("q2")));
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let dir  = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "rows.jsonl", "{\"question\":\"q1\"}\n[1, 2]\n");

        let err = JsonDatasetLoader::new(path).load_all().unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("rows.jsonl:2"), "{msg}");
        assert!(msg.contains("an array"), "{msg}");
    }

    #[test]
    fn test_loads_json_array() {
        let dir  = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "rows.json", r#"[{"question":"q1","context":"A"}]"#);

        let records = JsonDatasetLoader::new(path).load_all().unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_flattens_squad_layout() {
        let dir  = tempfile::tempdir().unwrap();
        let body = r#"{"version": "1.1", "data": [{"title": "Notre_Dame", "paragraphs": [
            {"context": "P1", "qas": [{"id": "a", "question": "q1"}, {"id": "b", "question": "q2"}]},
            {"context": "P2", "qas": [{"id": "c", "question": "q3"}]}
        ]}]}"#;
        let path = write_file(&dir, "squad.json", body);

        let records = JsonDatasetLoader::new(path).load_all().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].text("context"), Some(Some("P1")));
        assert_eq!(records[1].text("context"), Some(Some("P1")));
        assert_eq!(records[2].text("question"), Some(Some("q3")));
        assert_eq!(records[2].text("title"), Some(Some("Notre_Dame")));
    }

    #[test]
    fn test_scalar_document_is_rejected() {
        let dir  = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "rows.json", "42");
        assert!(JsonDatasetLoader::new(path).load_all().is_err());
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let err = JsonDatasetLoader::new("/no/such/dataset.jsonl").load_all().unwrap_err();
        assert!(err.to_string().contains("/no/such/dataset.jsonl"));
    }
}
