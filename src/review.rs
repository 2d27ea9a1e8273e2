use crate::claim::{Claim, ClaimSet};
use crate::compliance::ComplianceReport;
use crate::error::VarianceError;

pub trait ClaimExtractor: Send + Sync {
    fn extract(&self, source_text: &str) -> Result<ClaimSet, VarianceError>;
}

pub trait SemanticReviewer: Send + Sync {
    fn review(&self, markup: &str, claims: &[Claim]) -> Result<ComplianceReport, VarianceError>;
}

impl<F> ClaimExtractor for F
where
    F: Fn(&str) -> Result<ClaimSet, VarianceError> + Send + Sync,
{
    fn extract(&self, source_text: &str) -> Result<ClaimSet, VarianceError> {
        self(source_text)
    }
}
