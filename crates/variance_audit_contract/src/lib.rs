use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

pub const CONTRACT_ID: &str = "variance.audit_contract";
pub const CONTRACT_VERSION: &str = "1";

const FLAG_REGISTRY_ID: &str = "variance.flag_registry.v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOrigin {
    Programmatic,
    Semantic,
}

impl FlagOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagOrigin::Programmatic => "programmatic",
            FlagOrigin::Semantic => "semantic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagKindDef {
    pub id: &'static str,
    pub origin: FlagOrigin,
    pub default_severity: &'static str,
    pub summary: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantDef {
    pub id: &'static str,
    pub label: &'static str,
}

pub const FLAG_KINDS_V1: [FlagKindDef; 10] = [
    FlagKindDef { id: "number_missing", origin: FlagOrigin::Programmatic, default_severity: "error", summary: "Source statistic absent from the visible text of a variant." },
    FlagKindDef { id: "citation_missing", origin: FlagOrigin::Programmatic, default_severity: "error", summary: "Source citation absent from a variant." },
    FlagKindDef { id: "unexpected_number", origin: FlagOrigin::Programmatic, default_severity: "error", summary: "Visible percentage with no matching source statistic." },
    FlagKindDef { id: "qualifier_missing", origin: FlagOrigin::Programmatic, default_severity: "warning", summary: "Study qualifier absent from a variant." },
    FlagKindDef { id: "endpoint_missing", origin: FlagOrigin::Programmatic, default_severity: "warning", summary: "Clinical endpoint absent from a variant." },
    FlagKindDef { id: "claim_expansion", origin: FlagOrigin::Semantic, default_severity: "error", summary: "Variant adds claims or data not in the source." },
    FlagKindDef { id: "superiority_implication", origin: FlagOrigin::Semantic, default_severity: "error", summary: "Variant implies superiority without source support." },
    FlagKindDef { id: "dropped_qualifier", origin: FlagOrigin::Semantic, default_severity: "error", summary: "Variant omits an important source qualifier." },
    FlagKindDef { id: "tone_shift", origin: FlagOrigin::Semantic, default_severity: "warning", summary: "Variant uses promotional or exaggerated language." },
    FlagKindDef { id: "endpoint_misrepresentation", origin: FlagOrigin::Semantic, default_severity: "error", summary: "Variant mischaracterizes the clinical endpoint." },
];

// Registry order is render order for every multi-variant run.
pub const VARIANTS_V1: [VariantDef; 5] = [
    VariantDef { id: "grouped_bar", label: "Efficacy by Subgroup" },
    VariantDef { id: "timeline", label: "Response Over Time" },
    VariantDef { id: "spotlight_cards", label: "Clinical Spotlight" },
    VariantDef { id: "heatmap", label: "Efficacy Matrix" },
    VariantDef { id: "infographic", label: "Clinical Overview" },
];

// Compiled into the binary; runtime never reads the registry from disk.
const FLAG_REGISTRY_V1_JSON: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/registry/flag_registry.v1.json"
));

#[derive(Debug, Clone)]
pub struct AuditContractMetadata {
    pub contract_id: &'static str,
    pub contract_version: &'static str,
    pub contract_fingerprint_sha256: String,
    pub flag_registry_id: &'static str,
    pub flag_registry_hash_sha256: String,
    pub flag_kind_count: usize,
    pub variant_count: usize,
}

fn hex_sha256(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        use std::fmt::Write;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

static FLAG_REGISTRY_HASH: OnceLock<String> = OnceLock::new();
static CONTRACT_FINGERPRINT: OnceLock<String> = OnceLock::new();
static FLAG_REGISTRY_JSON_VALUE: OnceLock<Value> = OnceLock::new();

fn flag_registry_value() -> &'static Value {
    FLAG_REGISTRY_JSON_VALUE.get_or_init(|| {
        serde_json::from_str(FLAG_REGISTRY_V1_JSON)
            .expect("embedded flag registry must be valid JSON")
    })
}

pub fn registry_json() -> &'static str {
    FLAG_REGISTRY_V1_JSON
}

pub fn registry_hash_sha256() -> String {
    FLAG_REGISTRY_HASH
        .get_or_init(|| hex_sha256(FLAG_REGISTRY_V1_JSON.as_bytes()))
        .clone()
}

pub fn contract_fingerprint_sha256() -> String {
    CONTRACT_FINGERPRINT
        .get_or_init(|| {
            let mut material = String::new();
            material.push_str(CONTRACT_ID);
            material.push('\n');
            material.push_str(CONTRACT_VERSION);
            material.push('\n');
            material.push_str(FLAG_REGISTRY_ID);
            material.push('=');
            material.push_str(&registry_hash_sha256());
            material.push('\n');
            for def in &FLAG_KINDS_V1 {
                material.push_str(def.id);
                material.push(':');
                material.push_str(def.origin.as_str());
                material.push(':');
                material.push_str(def.default_severity);
                material.push('\n');
            }
            for def in &VARIANTS_V1 {
                material.push_str(def.id);
                material.push('\n');
            }
            hex_sha256(material.as_bytes())
        })
        .clone()
}

pub fn flag_kind_defs_v1() -> &'static [FlagKindDef] {
    &FLAG_KINDS_V1
}

pub fn flag_kind_def(id: &str) -> Option<&'static FlagKindDef> {
    FLAG_KINDS_V1.iter().find(|def| def.id == id)
}

pub fn variant_defs_v1() -> &'static [VariantDef] {
    &VARIANTS_V1
}

pub fn variant_def(id: &str) -> Option<&'static VariantDef> {
    VARIANTS_V1.iter().find(|def| def.id == id)
}

pub fn default_severity(flag_kind: &str) -> Option<&'static str> {
    flag_kind_def(flag_kind).map(|def| def.default_severity)
}

/// Summary text for a flag kind as published in the embedded registry.
pub fn registry_summary(flag_kind: &str) -> Option<&'static str> {
    flag_registry_value()
        .get("flag_kinds")
        .and_then(Value::as_array)?
        .iter()
        .find(|entry| entry.get("id").and_then(Value::as_str) == Some(flag_kind))
        .and_then(|entry| entry.get("summary"))
        .and_then(Value::as_str)
}

pub fn metadata() -> AuditContractMetadata {
    AuditContractMetadata {
        contract_id: CONTRACT_ID,
        contract_version: CONTRACT_VERSION,
        contract_fingerprint_sha256: contract_fingerprint_sha256(),
        flag_registry_id: FLAG_REGISTRY_ID,
        flag_registry_hash_sha256: registry_hash_sha256(),
        flag_kind_count: FLAG_KINDS_V1.len(),
        variant_count: VARIANTS_V1.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_embedded_registry() -> Value {
        serde_json::from_str(registry_json()).expect("embedded flag registry JSON")
    }

    #[test]
    fn contract_fingerprint_is_stable_and_nonempty() {
        let a = contract_fingerprint_sha256();
        let b = contract_fingerprint_sha256();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, registry_hash_sha256());
    }

    #[test]
    fn registry_id_matches_embedded_payload() {
        let root = parse_embedded_registry();
        assert_eq!(root.get("id").and_then(Value::as_str), Some(FLAG_REGISTRY_ID));
        assert_eq!(root.get("version").and_then(Value::as_u64), Some(1));
    }

    #[test]
    fn flag_kind_exports_match_embedded_registry() {
        let root = parse_embedded_registry();
        let entries = root
            .get("flag_kinds")
            .and_then(Value::as_array)
            .expect("flag_kinds array");
        assert_eq!(entries.len(), FLAG_KINDS_V1.len(), "flag kind set size drift");
        for (entry, def) in entries.iter().zip(FLAG_KINDS_V1.iter()) {
            let id = entry.get("id").and_then(Value::as_str).expect("flag kind id");
            assert_eq!(id, def.id, "flag kind order drift");
            assert_eq!(
                entry.get("origin").and_then(Value::as_str),
                Some(def.origin.as_str()),
                "origin drift for {id}"
            );
            assert_eq!(
                entry.get("default_severity").and_then(Value::as_str),
                Some(def.default_severity),
                "default severity drift for {id}"
            );
            assert_eq!(registry_summary(id), Some(def.summary), "summary drift for {id}");
        }
    }

    #[test]
    fn variant_exports_match_embedded_registry() {
        let root = parse_embedded_registry();
        let entries = root
            .get("variants")
            .and_then(Value::as_array)
            .expect("variants array");
        let ids: Vec<&str> = entries
            .iter()
            .map(|e| e.get("id").and_then(Value::as_str).expect("variant id"))
            .collect();
        let expected: Vec<&str> = VARIANTS_V1.iter().map(|v| v.id).collect();
        assert_eq!(ids, expected);
        for entry in entries {
            let id = entry.get("id").and_then(Value::as_str).unwrap_or_default();
            let label = entry.get("label").and_then(Value::as_str);
            assert_eq!(label, variant_def(id).map(|v| v.label), "label drift for {id}");
        }
    }

    #[test]
    fn programmatic_kinds_split_between_error_and_warning() {
        let programmatic: Vec<&FlagKindDef> = flag_kind_defs_v1()
            .iter()
            .filter(|def| def.origin == FlagOrigin::Programmatic)
            .collect();
        assert_eq!(programmatic.len(), 5);
        assert_eq!(default_severity("citation_missing"), Some("error"));
        assert_eq!(default_severity("qualifier_missing"), Some("warning"));
        assert_eq!(default_severity("endpoint_missing"), Some("warning"));
        assert_eq!(default_severity("tone_shift"), Some("warning"));
        assert_eq!(default_severity("not_a_kind"), None);
    }

    #[test]
    fn metadata_reports_counts() {
        let meta = metadata();
        assert_eq!(meta.contract_id, CONTRACT_ID);
        assert_eq!(meta.flag_kind_count, 10);
        assert_eq!(meta.variant_count, 5);
        assert_eq!(meta.flag_registry_hash_sha256, registry_hash_sha256());
    }
}
