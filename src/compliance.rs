use crate::claim::Claim;
use crate::normalize::{
    Decimal, decode_entities, extract_percentages, normalize_number, numeric_tokens, visible_text,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    NumberMissing,
    CitationMissing,
    UnexpectedNumber,
    QualifierMissing,
    EndpointMissing,
    // Populated only by an external semantic reviewer.
    ClaimExpansion,
    SuperiorityImplication,
    DroppedQualifier,
    ToneShift,
    EndpointMisrepresentation,
}

impl FlagKind {
    pub const ALL: [FlagKind; 10] = [
        FlagKind::NumberMissing,
        FlagKind::CitationMissing,
        FlagKind::UnexpectedNumber,
        FlagKind::QualifierMissing,
        FlagKind::EndpointMissing,
        FlagKind::ClaimExpansion,
        FlagKind::SuperiorityImplication,
        FlagKind::DroppedQualifier,
        FlagKind::ToneShift,
        FlagKind::EndpointMisrepresentation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlagKind::NumberMissing => "number_missing",
            FlagKind::CitationMissing => "citation_missing",
            FlagKind::UnexpectedNumber => "unexpected_number",
            FlagKind::QualifierMissing => "qualifier_missing",
            FlagKind::EndpointMissing => "endpoint_missing",
            FlagKind::ClaimExpansion => "claim_expansion",
            FlagKind::SuperiorityImplication => "superiority_implication",
            FlagKind::DroppedQualifier => "dropped_qualifier",
            FlagKind::ToneShift => "tone_shift",
            FlagKind::EndpointMisrepresentation => "endpoint_misrepresentation",
        }
    }

    pub fn from_str(raw: &str) -> Option<Self> {
        FlagKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw.trim())
    }

    pub fn is_semantic(&self) -> bool {
        variance_audit_contract::flag_kind_def(self.as_str())
            .is_some_and(|def| def.origin == variance_audit_contract::FlagOrigin::Semantic)
    }

    pub fn default_severity(&self) -> Severity {
        match variance_audit_contract::default_severity(self.as_str()) {
            Some("warning") => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComplianceFlag {
    pub kind: FlagKind,
    pub severity: Severity,
    pub location: String,
    pub description: String,
}

impl ComplianceFlag {
    pub fn new(
        kind: FlagKind,
        severity: Severity,
        location: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            location: location.into(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// Flags plus a verdict derived from them: `passed` is true exactly when no
// flag has error severity. Deserializing recomputes the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ReportWire", from = "ReportWire")]
pub struct ComplianceReport {
    flags: Vec<ComplianceFlag>,
}

#[derive(Serialize, Deserialize)]
struct ReportWire {
    #[serde(default)]
    passed: bool,
    #[serde(default)]
    flags: Vec<ComplianceFlag>,
}

impl From<ComplianceReport> for ReportWire {
    fn from(report: ComplianceReport) -> Self {
        ReportWire {
            passed: report.passed(),
            flags: report.flags,
        }
    }
}

impl From<ReportWire> for ComplianceReport {
    fn from(wire: ReportWire) -> Self {
        ComplianceReport::new(wire.flags)
    }
}

impl ComplianceReport {
    pub fn new(flags: Vec<ComplianceFlag>) -> Self {
        Self { flags }
    }

    pub fn clean() -> Self {
        Self { flags: Vec::new() }
    }

    pub fn passed(&self) -> bool {
        !self.flags.iter().any(ComplianceFlag::is_error)
    }

    pub fn flags(&self) -> &[ComplianceFlag] {
        &self.flags
    }

    pub fn into_flags(self) -> Vec<ComplianceFlag> {
        self.flags
    }

    pub fn error_count(&self) -> usize {
        self.flags.iter().filter(|f| f.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.flags.len() - self.error_count()
    }

    pub fn count_of(&self, kind: FlagKind) -> usize {
        self.flags.iter().filter(|f| f.kind == kind).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceField {
    Citation,
    Qualifier,
    Endpoint,
}

impl PresenceField {
    pub fn values<'a>(&self, claim: &'a Claim) -> Vec<&'a str> {
        match self {
            PresenceField::Citation => vec![claim.citation()],
            PresenceField::Qualifier => claim.qualifiers().iter().map(String::as_str).collect(),
            PresenceField::Endpoint => vec![claim.endpoint()],
        }
    }

    pub fn flag_kind(&self) -> FlagKind {
        match self {
            PresenceField::Citation => FlagKind::CitationMissing,
            PresenceField::Qualifier => FlagKind::QualifierMissing,
            PresenceField::Endpoint => FlagKind::EndpointMissing,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PresenceField::Citation => "Citation",
            PresenceField::Qualifier => "Qualifier",
            PresenceField::Endpoint => "Endpoint",
        }
    }
}

pub fn check_field_present(
    markup: &str,
    claims: &[Claim],
    field: PresenceField,
) -> Vec<ComplianceFlag> {
    let haystack = markup.to_lowercase();
    let kind = field.flag_kind();
    let severity = kind.default_severity();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut flags = Vec::new();
    for claim in claims {
        for value in field.values(claim) {
            if !seen.insert(value) {
                continue;
            }
            if !haystack.contains(&value.to_lowercase()) {
                flags.push(ComplianceFlag::new(
                    kind,
                    severity,
                    value,
                    format!("{} not found in markup: {}", field.label(), value),
                ));
            }
        }
    }
    flags
}

pub fn check_numbers(markup: &str, claims: &[Claim]) -> Vec<ComplianceFlag> {
    let visible = visible_text(markup);
    let mut visible_numbers: Option<HashSet<Decimal>> = None;
    let mut seen: HashSet<&str> = HashSet::new();
    let mut flags = Vec::new();
    for claim in claims {
        let stat = claim.statistic();
        if !seen.insert(stat) {
            continue;
        }
        let raw_number = stat.replace('%', "");
        let raw_number = raw_number.trim();
        let mut found = (!raw_number.is_empty() && visible.contains(raw_number))
            || visible.contains(stat);
        if !found {
            if let Some(expected) = normalize_number(stat) {
                let numbers =
                    visible_numbers.get_or_insert_with(|| numeric_tokens(&visible).collect());
                found = numbers.contains(&expected);
            }
        }
        if !found {
            flags.push(ComplianceFlag::new(
                FlagKind::NumberMissing,
                FlagKind::NumberMissing.default_severity(),
                stat,
                format!("Source statistic {stat} not found in markup"),
            ));
        }
    }
    flags
}

pub fn check_citations(markup: &str, claims: &[Claim]) -> Vec<ComplianceFlag> {
    check_field_present(markup, claims, PresenceField::Citation)
}

pub fn check_qualifiers(markup: &str, claims: &[Claim]) -> Vec<ComplianceFlag> {
    check_field_present(markup, claims, PresenceField::Qualifier)
}

pub fn check_endpoints(markup: &str, claims: &[Claim]) -> Vec<ComplianceFlag> {
    check_field_present(markup, claims, PresenceField::Endpoint)
}

// Flags any visible percentage that matches no claim statistic. 0% and 100%
// are treated as layout values and never flagged, even when a claim genuinely
// reports one of them.
pub fn check_unexpected_numbers(markup: &str, claims: &[Claim]) -> Vec<ComplianceFlag> {
    let known: HashSet<Decimal> = claims
        .iter()
        .filter_map(|claim| normalize_number(claim.statistic()))
        .collect();
    extract_percentages(markup)
        .into_iter()
        .filter(|token| !known.contains(&token.value))
        .map(|token| {
            ComplianceFlag::new(
                FlagKind::UnexpectedNumber,
                FlagKind::UnexpectedNumber.default_severity(),
                format!("{}%", token.text),
                format!(
                    "Percentage {}% in markup not found in source claims",
                    token.text
                ),
            )
        })
        .collect()
}

pub fn run_compliance_checks(markup: &str, claims: &[Claim]) -> ComplianceReport {
    let decoded = decode_entities(markup);
    let mut flags = check_numbers(&decoded, claims);
    flags.extend(check_citations(&decoded, claims));
    flags.extend(check_unexpected_numbers(&decoded, claims));
    flags.extend(check_qualifiers(&decoded, claims));
    flags.extend(check_endpoints(&decoded, claims));
    ComplianceReport::new(flags)
}
