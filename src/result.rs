use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::compliance::ComplianceReport;

// One rendered variant with its verification outcome. The overall verdict
// is derived from the reports and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "VariantResultWire", from = "VariantResultWire")]
pub struct VariantResult {
    variant_type: String,
    markup: String,
    programmatic: ComplianceReport,
    semantic: Option<ComplianceReport>,
}

#[derive(Serialize, Deserialize)]
struct VariantResultWire {
    variant_type: String,
    #[serde(rename = "html")]
    markup: String,
    programmatic: ComplianceReport,
    #[serde(default)]
    semantic: Option<ComplianceReport>,
    // Output only; ignored on input.
    #[serde(default, skip_deserializing)]
    overall_passed: bool,
    #[serde(default, skip_deserializing)]
    markup_sha256: String,
}

impl From<VariantResult> for VariantResultWire {
    fn from(result: VariantResult) -> Self {
        let overall_passed = result.overall_passed();
        let markup_sha256 = result.markup_sha256();
        VariantResultWire {
            variant_type: result.variant_type,
            markup: result.markup,
            programmatic: result.programmatic,
            semantic: result.semantic,
            overall_passed,
            markup_sha256,
        }
    }
}

impl From<VariantResultWire> for VariantResult {
    fn from(wire: VariantResultWire) -> Self {
        VariantResult::new(wire.variant_type, wire.markup, wire.programmatic, wire.semantic)
    }
}

impl VariantResult {
    pub fn new(
        variant_type: impl Into<String>,
        markup: impl Into<String>,
        programmatic: ComplianceReport,
        semantic: Option<ComplianceReport>,
    ) -> Self {
        Self {
            variant_type: variant_type.into(),
            markup: markup.into(),
            programmatic,
            semantic,
        }
    }

    pub fn variant_type(&self) -> &str {
        &self.variant_type
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn programmatic(&self) -> &ComplianceReport {
        &self.programmatic
    }

    pub fn semantic(&self) -> Option<&ComplianceReport> {
        self.semantic.as_ref()
    }

    pub fn overall_passed(&self) -> bool {
        self.programmatic.passed() && self.semantic.as_ref().is_none_or(ComplianceReport::passed)
    }

    pub fn markup_sha256(&self) -> String {
        let digest = Sha256::digest(self.markup.as_bytes());
        let mut out = String::with_capacity(64);
        for byte in digest {
            out.push_str(&format!("{byte:02x}"));
        }
        out
    }

    pub fn summary_json(&self) -> serde_json::Value {
        serde_json::json!({
            "variant_type": self.variant_type,
            "programmatic": self.programmatic,
            "semantic": self.semantic,
            "overall_passed": self.overall_passed(),
            "markup_sha256": self.markup_sha256(),
        })
    }
}
