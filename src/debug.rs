use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::compliance::ComplianceFlag;

#[derive(Clone)]
pub(crate) struct DebugLogger {
    inner: Arc<Mutex<DebugState>>,
}

struct DebugState {
    writer: BufWriter<File>,
    counters: BTreeMap<String, u64>,
}

impl DebugLogger {
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(DebugState {
                writer: BufWriter::new(file),
                counters: BTreeMap::new(),
            })),
        })
    }

    pub fn log_record(&self, record: &Value) {
        if let Ok(mut state) = self.inner.lock() {
            let _ = writeln!(state.writer, "{record}");
        }
    }

    pub fn log_flag(&self, variant: &str, origin: &str, flag: &ComplianceFlag) {
        self.log_record(&json!({
            "type": "debug.flag",
            "variant": variant,
            "origin": origin,
            "kind": flag.kind.as_str(),
            "severity": flag.severity.as_str(),
            "location": flag.location,
            "description": flag.description,
        }));
        self.increment(&format!("flag.{}", flag.kind.as_str()), 1);
    }

    pub fn increment(&self, key: &str, amount: u64) {
        if let Ok(mut state) = self.inner.lock() {
            let entry = state.counters.entry(key.to_string()).or_insert(0);
            *entry = entry.saturating_add(amount);
        }
    }

    pub fn emit_summary(&self, context: &str) {
        if let Ok(mut state) = self.inner.lock() {
            let counts = std::mem::take(&mut state.counters);
            let record = json!({
                "type": "debug.summary",
                "context": context,
                "counts": counts,
            });
            let _ = writeln!(state.writer, "{record}");
        }
    }

    pub fn flush(&self) {
        if let Ok(mut state) = self.inner.lock() {
            let _ = state.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::{FlagKind, Severity};

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .expect("read log")
            .lines()
            .map(|line| serde_json::from_str(line).expect("jsonl line"))
            .collect()
    }

    #[test]
    fn flags_and_summary_are_jsonl() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("debug.jsonl");
        let logger = DebugLogger::new(&path).expect("logger");
        let flag = ComplianceFlag::new(
            FlagKind::NumberMissing,
            Severity::Error,
            "36.2%",
            "Statistic \"36.2%\" not found",
        );
        logger.log_flag("heatmap", "programmatic", &flag);
        logger.log_flag("timeline", "programmatic", &flag);
        logger.emit_summary("run");
        logger.emit_summary("empty");
        logger.flush();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0]["type"], "debug.flag");
        assert_eq!(lines[0]["kind"], "number_missing");
        assert_eq!(lines[0]["description"], "Statistic \"36.2%\" not found");
        assert_eq!(lines[2]["counts"]["flag.number_missing"], 2);
        assert_eq!(lines[3]["counts"], json!({}));
    }
}
