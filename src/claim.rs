use crate::error::VarianceError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ClaimFields", into = "ClaimFields")]
pub struct Claim {
    statistic: String,
    context: String,
    timepoint: String,
    treatment_arm: String,
    sample_size: String,
    citation: String,
    qualifiers: Vec<String>,
    endpoint: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimFields {
    pub statistic: String,
    pub context: String,
    pub timepoint: String,
    pub treatment_arm: String,
    pub sample_size: String,
    pub citation: String,
    pub qualifiers: Vec<String>,
    pub endpoint: String,
}

impl ClaimFields {
    pub fn validate(self, index: usize) -> Result<Claim, VarianceError> {
        let required = [
            ("statistic", &self.statistic),
            ("context", &self.context),
            ("timepoint", &self.timepoint),
            ("treatment_arm", &self.treatment_arm),
            ("sample_size", &self.sample_size),
            ("citation", &self.citation),
            ("endpoint", &self.endpoint),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(VarianceError::InvalidClaim { index, field });
            }
        }
        Ok(Claim {
            statistic: self.statistic,
            context: self.context,
            timepoint: self.timepoint,
            treatment_arm: self.treatment_arm,
            sample_size: self.sample_size,
            citation: self.citation,
            qualifiers: self.qualifiers,
            endpoint: self.endpoint,
        })
    }
}

impl TryFrom<ClaimFields> for Claim {
    type Error = VarianceError;

    fn try_from(fields: ClaimFields) -> Result<Self, Self::Error> {
        fields.validate(0)
    }
}

impl From<Claim> for ClaimFields {
    fn from(claim: Claim) -> Self {
        ClaimFields {
            statistic: claim.statistic,
            context: claim.context,
            timepoint: claim.timepoint,
            treatment_arm: claim.treatment_arm,
            sample_size: claim.sample_size,
            citation: claim.citation,
            qualifiers: claim.qualifiers,
            endpoint: claim.endpoint,
        }
    }
}

impl Claim {
    pub fn new(fields: ClaimFields) -> Result<Self, VarianceError> {
        fields.validate(0)
    }

    pub fn statistic(&self) -> &str {
        &self.statistic
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn timepoint(&self) -> &str {
        &self.timepoint
    }

    pub fn treatment_arm(&self) -> &str {
        &self.treatment_arm
    }

    pub fn sample_size(&self) -> &str {
        &self.sample_size
    }

    pub fn citation(&self) -> &str {
        &self.citation
    }

    pub fn qualifiers(&self) -> &[String] {
        &self.qualifiers
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn field(&self, field: ClaimField) -> &str {
        field.get(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimField {
    Statistic,
    Context,
    Timepoint,
    TreatmentArm,
    SampleSize,
    Citation,
    Endpoint,
}

impl ClaimField {
    pub fn get(self, claim: &Claim) -> &str {
        match self {
            ClaimField::Statistic => &claim.statistic,
            ClaimField::Context => &claim.context,
            ClaimField::Timepoint => &claim.timepoint,
            ClaimField::TreatmentArm => &claim.treatment_arm,
            ClaimField::SampleSize => &claim.sample_size,
            ClaimField::Citation => &claim.citation,
            ClaimField::Endpoint => &claim.endpoint,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimField::Statistic => "statistic",
            ClaimField::Context => "context",
            ClaimField::Timepoint => "timepoint",
            ClaimField::TreatmentArm => "treatment_arm",
            ClaimField::SampleSize => "sample_size",
            ClaimField::Citation => "citation",
            ClaimField::Endpoint => "endpoint",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClaimSet {
    claims: Vec<Claim>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClaimSetWire {
    Bare(Vec<ClaimFields>),
    Envelope { claims: Vec<ClaimFields> },
}

impl<'de> Deserialize<'de> for ClaimSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = match ClaimSetWire::deserialize(deserializer)? {
            ClaimSetWire::Bare(claims) => claims,
            ClaimSetWire::Envelope { claims } => claims,
        };
        ClaimSet::from_fields(raw).map_err(serde::de::Error::custom)
    }
}

impl ClaimSet {
    pub fn new(claims: Vec<Claim>) -> Self {
        Self { claims }
    }

    pub fn from_fields(fields: Vec<ClaimFields>) -> Result<Self, VarianceError> {
        let claims = fields
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.validate(index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { claims })
    }

    pub fn from_json(raw: &str) -> Result<Self, VarianceError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, VarianceError> {
        Ok(serde_json::to_string_pretty(&serde_json::json!({ "claims": self }))?)
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Claim> {
        self.claims.iter()
    }

    pub fn ensure_min_len(&self, required: usize) -> Result<(), VarianceError> {
        if self.claims.len() < required {
            return Err(VarianceError::InsufficientClaims {
                found: self.claims.len(),
                required,
            });
        }
        Ok(())
    }
}

impl From<Vec<Claim>> for ClaimSet {
    fn from(claims: Vec<Claim>) -> Self {
        Self::new(claims)
    }
}

impl<'a> IntoIterator for &'a ClaimSet {
    type Item = &'a Claim;
    type IntoIter = std::slice::Iter<'a, Claim>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.iter()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn fields() -> ClaimFields {
        ClaimFields {
            statistic: "36.2%".to_string(),
            context: "All patients".to_string(),
            timepoint: "Week 24".to_string(),
            treatment_arm: "Drug A 50 mg (n=130)".to_string(),
            sample_size: "n=130".to_string(),
            citation: "Zhang X, et al. EADV 2022.".to_string(),
            qualifiers: Vec::new(),
            endpoint: "SALT ≤20".to_string(),
        }
    }

    #[test]
    fn empty_qualifiers_are_allowed() {
        let claim = Claim::new(fields()).expect("valid claim");
        assert!(claim.qualifiers().is_empty());
        assert_eq!(claim.field(ClaimField::Timepoint), "Week 24");
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let mut raw = fields();
        raw.citation = "   ".to_string();
        match Claim::new(raw) {
            Err(VarianceError::InvalidClaim { field, .. }) => assert_eq!(field, "citation"),
            other => panic!("expected InvalidClaim, got {other:?}"),
        }
    }

    #[test]
    fn claim_set_reports_offending_index() {
        let mut bad = fields();
        bad.endpoint.clear();
        let err = ClaimSet::from_fields(vec![fields(), bad]).expect_err("second claim invalid");
        match err {
            VarianceError::InvalidClaim { index, field } => {
                assert_eq!(index, 1);
                assert_eq!(field, "endpoint");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn claim_set_parses_bare_array_and_envelope() {
        let one = serde_json::to_string(&fields()).expect("serialize");
        let bare = ClaimSet::from_json(&format!("[{one}]")).expect("bare array");
        let envelope = ClaimSet::from_json(&format!("{{\"claims\":[{one},{one}]}}"))
            .expect("envelope");
        assert_eq!(bare.len(), 1);
        assert_eq!(envelope.len(), 2);
    }

    #[test]
    fn claim_json_missing_field_is_an_error() {
        let raw = r#"[{"statistic":"36.2%","context":"x","timepoint":"Week 1"}]"#;
        assert!(ClaimSet::from_json(raw).is_err());

        let without_qualifiers = r#"[{"statistic":"36.2%","context":"x","timepoint":"Week 1",
            "treatment_arm":"A","sample_size":"n=10","citation":"Ref 1","endpoint":"SALT"}]"#;
        assert!(ClaimSet::from_json(without_qualifiers).is_err());
    }

    #[test]
    fn claim_json_round_trips_through_envelope() {
        let set = ClaimSet::new(sample_claims());
        let json = set.to_json_pretty().expect("serialize");
        let parsed = ClaimSet::from_json(&json).expect("parse");
        assert_eq!(parsed, set);
    }

    #[test]
    fn quality_gate_requires_minimum_claims() {
        let set = ClaimSet::new(sample_claims());
        assert!(set.ensure_min_len(2).is_ok());
        match set.ensure_min_len(20) {
            Err(VarianceError::InsufficientClaims { found, required }) => {
                assert_eq!(found, 2);
                assert_eq!(required, 20);
            }
            other => panic!("expected InsufficientClaims, got {other:?}"),
        }
    }

    #[test]
    fn claims_compare_by_value() {
        assert_eq!(sample_claims()[0], sample_claims()[0]);
        assert_ne!(sample_claims()[0], sample_claims()[1]);
    }
}
