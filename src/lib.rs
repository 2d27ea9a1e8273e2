mod claim;
mod color;
mod compliance;
mod debug;
mod error;
mod grouping;
mod markup;
mod normalize;
mod perf;
mod result;
mod review;
mod skeleton;
mod variants;

pub use claim::{Claim, ClaimField, ClaimFields, ClaimSet};
pub use color::{
    CARD_BORDER_COLORS, CellStyle, HEAT_HIGH, HEAT_LOW, HeatScale, Rgb, SERIES_COLORS,
    card_border_color, series_color,
};
pub use compliance::{
    ComplianceFlag, ComplianceReport, FlagKind, PresenceField, Severity, check_citations,
    check_endpoints, check_field_present, check_numbers, check_qualifiers,
    check_unexpected_numbers, run_compliance_checks,
};
use debug::DebugLogger;
pub use error::VarianceError;
pub use grouping::{
    ClaimGroup, DEFAULT_SUBJECT, TimeUnit, TimepointKey, chronological_key, collect_qualifiers,
    group_by_keys, parse_stat, sort_timepoints, subject_name, unique_values,
};
pub use normalize::{Decimal, PercentToken, extract_percentages, normalize_number, visible_text};
use perf::PerfLogger;
pub use result::VariantResult;
pub use review::{ClaimExtractor, SemanticReviewer};
pub use skeleton::{CHART_LIBRARY_URL, DocumentOptions, assemble_document};
pub use variants::{
    Renderer, VARIANT_RENDERERS, render_grouped_bar, render_heatmap, render_infographic,
    render_spotlight_cards, render_timeline, renderer, section_label, variant_names,
};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub const DEFAULT_MIN_CLAIMS: usize = 20;

const DEFAULT_PERF_LOG: &str = "variance_perf.log";

pub struct VarianceEngine {
    variants: Vec<&'static str>,
    reviewer: Option<Arc<dyn SemanticReviewer>>,
    min_claims: usize,
    parallel: bool,
    debug: Option<Arc<DebugLogger>>,
    perf: Option<Arc<PerfLogger>>,
}

#[derive(Clone)]
pub struct VarianceEngineBuilder {
    variants: Option<Vec<String>>,
    reviewer: Option<Arc<dyn SemanticReviewer>>,
    min_claims: usize,
    parallel: bool,
    debug_path: Option<PathBuf>,
    perf_enabled: bool,
    perf_path: Option<PathBuf>,
}

#[derive(Debug)]
pub enum VariantOutcome {
    Completed(VariantResult),
    Failed {
        variant_type: &'static str,
        error: VarianceError,
    },
}

impl VariantOutcome {
    pub fn variant_type(&self) -> &str {
        match self {
            VariantOutcome::Completed(result) => result.variant_type(),
            VariantOutcome::Failed { variant_type, .. } => variant_type,
        }
    }

    pub fn result(&self) -> Option<&VariantResult> {
        match self {
            VariantOutcome::Completed(result) => Some(result),
            VariantOutcome::Failed { .. } => None,
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

impl VarianceEngine {
    pub fn builder() -> VarianceEngineBuilder {
        VarianceEngineBuilder::new()
    }

    pub fn variants(&self) -> &[&'static str] {
        &self.variants
    }

    pub fn min_claims(&self) -> usize {
        self.min_claims
    }

    pub fn render(&self, name: &str, claims: &[Claim]) -> Result<String, VarianceError> {
        let render = renderer(name)?;
        let started = Instant::now();
        let markup = render(claims);
        let ms = elapsed_ms(started);
        if let Some(perf) = self.perf.as_deref() {
            perf.log_span_ms("variant.render", Some(name), ms);
        }
        debug!(variant = name, bytes = markup.len(), ms, "rendered variant");
        Ok(markup)
    }

    pub fn verify(&self, markup: &str, claims: &[Claim]) -> ComplianceReport {
        self.verify_as(None, markup, claims)
    }

    fn verify_as(
        &self,
        variant: Option<&str>,
        markup: &str,
        claims: &[Claim],
    ) -> ComplianceReport {
        let started = Instant::now();
        let report = run_compliance_checks(markup, claims);
        let ms = elapsed_ms(started);
        if let Some(perf) = self.perf.as_deref() {
            perf.log_span_ms("variant.verify", variant, ms);
        }
        if let Some(logger) = self.debug.as_deref() {
            for flag in report.flags() {
                logger.log_flag(variant.unwrap_or("-"), "programmatic", flag);
            }
        }
        debug!(
            variant = variant.unwrap_or("-"),
            passed = report.passed(),
            flags = report.flags().len(),
            "verified markup"
        );
        report
    }

    fn review(
        &self,
        name: &str,
        markup: &str,
        claims: &[Claim],
    ) -> Result<Option<ComplianceReport>, VarianceError> {
        let Some(reviewer) = self.reviewer.as_deref() else {
            return Ok(None);
        };
        let started = Instant::now();
        let report = reviewer.review(markup, claims)?;
        if let Some(perf) = self.perf.as_deref() {
            perf.log_span_ms("variant.review", Some(name), elapsed_ms(started));
        }
        if let Some(logger) = self.debug.as_deref() {
            for flag in report.flags() {
                logger.log_flag(name, "semantic", flag);
            }
        }
        Ok(Some(report))
    }

    pub fn render_and_verify(
        &self,
        name: &str,
        claims: &[Claim],
    ) -> Result<VariantResult, VarianceError> {
        let markup = self.render(name, claims)?;
        let programmatic = self.verify_as(Some(name), &markup, claims);
        let semantic = self.review(name, &markup, claims)?;
        let result = VariantResult::new(name, markup, programmatic, semantic);
        if let Some(perf) = self.perf.as_deref() {
            let (errors, warnings) = flag_counts(&result);
            perf.log_counts(
                "variant.flags",
                Some(name),
                &[("error", errors as u64), ("warning", warnings as u64)],
            );
        }
        Ok(result)
    }

    // Every configured variant, in configured order whatever the completion
    // order. A failing variant is recorded and the rest still run.
    pub fn render_all(&self, claims: &[Claim]) -> Vec<VariantOutcome> {
        let run_one = |name: &'static str| match self.render_and_verify(name, claims) {
            Ok(result) => VariantOutcome::Completed(result),
            Err(error) => {
                warn!(variant = name, %error, "variant failed");
                VariantOutcome::Failed {
                    variant_type: name,
                    error,
                }
            }
        };

        if !self.parallel {
            return self.variants.iter().map(|name| run_one(*name)).collect();
        }

        use rayon::prelude::*;
        let mut results: Vec<(usize, VariantOutcome)> = self
            .variants
            .par_iter()
            .enumerate()
            .map(|(idx, name)| (idx, run_one(*name)))
            .collect();
        results.sort_by_key(|(idx, _)| *idx);
        results.into_iter().map(|(_, outcome)| outcome).collect()
    }

    pub fn run<E>(&self, source_text: &str, extractor: &E) -> Result<PipelineRun, VarianceError>
    where
        E: ClaimExtractor + ?Sized,
    {
        let started = Instant::now();
        let claims = extractor.extract(source_text)?;
        if let Some(perf) = self.perf.as_deref() {
            perf.log_span_ms("extract", None, elapsed_ms(started));
        }
        claims.ensure_min_len(self.min_claims)?;

        let outcomes = self.render_all(claims.claims());
        let run = PipelineRun { claims, outcomes };
        if let Some(logger) = self.debug.as_deref() {
            logger.increment("claims", run.claims.len() as u64);
            logger.increment("variants.passed", run.passed_count() as u64);
            logger.increment("variants.failed_generation", run.failed_count() as u64);
        }
        info!(
            claims = run.claims.len(),
            variants = run.outcomes.len(),
            passed = run.passed_count(),
            failed_generation = run.failed_count(),
            ms = elapsed_ms(started),
            "pipeline complete"
        );
        self.emit_debug_summary("pipeline");
        Ok(run)
    }

    fn emit_debug_summary(&self, context: &str) {
        if let Some(logger) = self.debug.as_deref() {
            logger.emit_summary(context);
            logger.flush();
        }
        if let Some(perf) = self.perf.as_deref() {
            perf.flush();
        }
    }
}

fn flag_counts(result: &VariantResult) -> (usize, usize) {
    let mut errors = result.programmatic().error_count();
    let mut warnings = result.programmatic().warning_count();
    if let Some(semantic) = result.semantic() {
        errors += semantic.error_count();
        warnings += semantic.warning_count();
    }
    (errors, warnings)
}

impl Default for VarianceEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VarianceEngineBuilder {
    pub fn new() -> Self {
        Self {
            variants: None,
            reviewer: None,
            min_claims: DEFAULT_MIN_CLAIMS,
            parallel: true,
            debug_path: None,
            perf_enabled: false,
            perf_path: None,
        }
    }

    // Subset and order of registry names to produce; defaults to all of them.
    pub fn variants<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.variants = Some(names.iter().map(|n| n.as_ref().to_string()).collect());
        self
    }

    pub fn semantic_reviewer(mut self, reviewer: Arc<dyn SemanticReviewer>) -> Self {
        self.reviewer = Some(reviewer);
        self
    }

    pub fn min_claims(mut self, min_claims: usize) -> Self {
        self.min_claims = min_claims;
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    // JSONL record per compliance flag plus counter summaries.
    pub fn debug_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.debug_path = Some(path.into());
        self
    }

    pub fn perf_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.perf_enabled = true;
        self.perf_path = Some(path.into());
        self
    }

    // Uses the default file when enabled and no path is set.
    pub fn perf_enabled(mut self, enabled: bool) -> Self {
        self.perf_enabled = enabled;
        self
    }

    pub fn build(self) -> Result<VarianceEngine, VarianceError> {
        let variants = match self.variants {
            None => variant_names(),
            Some(names) => {
                if names.is_empty() {
                    return Err(VarianceError::InvalidConfiguration(
                        "variants must name at least one variant".to_string(),
                    ));
                }
                let mut resolved: Vec<&'static str> = Vec::with_capacity(names.len());
                for name in &names {
                    let Some(&(registered, _)) =
                        VARIANT_RENDERERS.iter().find(|(candidate, _)| *candidate == name.as_str())
                    else {
                        return Err(VarianceError::UnknownVariant(name.clone()));
                    };
                    if resolved.contains(&registered) {
                        return Err(VarianceError::InvalidConfiguration(format!(
                            "variant {registered:?} listed twice"
                        )));
                    }
                    resolved.push(registered);
                }
                resolved
            }
        };
        let debug = if let Some(path) = self.debug_path {
            Some(Arc::new(DebugLogger::new(path)?))
        } else {
            None
        };
        let perf = if self.perf_enabled || self.perf_path.is_some() {
            let path = self
                .perf_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PERF_LOG));
            Some(Arc::new(PerfLogger::new(path)?))
        } else {
            None
        };
        Ok(VarianceEngine {
            variants,
            reviewer: self.reviewer,
            min_claims: self.min_claims,
            parallel: self.parallel,
            debug,
            perf,
        })
    }
}

#[derive(Debug)]
pub struct PipelineRun {
    claims: ClaimSet,
    outcomes: Vec<VariantOutcome>,
}

const INDEX_TITLE: &str = "Content Variance Engine — Pipeline Results";
const STATUS_PASSED: (&str, &str) = ("#22c55e", "PASSED");
const STATUS_FAILED: (&str, &str) = ("#ef4444", "FAILED");
const STATUS_NOT_GENERATED: (&str, &str) = ("#6b7280", "GENERATION FAILED");

impl PipelineRun {
    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }

    pub fn outcomes(&self) -> &[VariantOutcome] {
        &self.outcomes
    }

    pub fn results(&self) -> impl Iterator<Item = &VariantResult> {
        self.outcomes.iter().filter_map(VariantOutcome::result)
    }

    pub fn passed_count(&self) -> usize {
        self.results().filter(|r| r.overall_passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.results().count()
    }

    pub fn variant_file_name(index: usize) -> String {
        format!("variant_{index}.html")
    }

    pub fn index_html(&self) -> String {
        let mut rows = Vec::with_capacity(self.outcomes.len());
        for (idx, outcome) in self.outcomes.iter().enumerate() {
            let name = markup::esc(outcome.variant_type());
            let row = match outcome.result() {
                None => {
                    let (color, text) = STATUS_NOT_GENERATED;
                    format!(
                        "<tr><td>{idx}</td><td>{name}</td><td style=\"color:{color}\">{text}</td><td>—</td></tr>"
                    )
                }
                Some(result) => {
                    let (color, text) = if result.overall_passed() {
                        STATUS_PASSED
                    } else {
                        STATUS_FAILED
                    };
                    let file = Self::variant_file_name(idx);
                    format!(
                        "<tr><td>{idx}</td><td>{name}</td><td style=\"color:{color}\">{text}</td><td><a href=\"{file}\">{file}</a></td></tr>"
                    )
                }
            };
            rows.push(row);
        }
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{INDEX_TITLE}</title>
  <style>
    body {{ font-family: sans-serif; max-width: 800px; margin: 2rem auto; padding: 0 1rem; }}
    h1 {{ font-size: 1.5rem; margin-bottom: 1.5rem; }}
    table {{ width: 100%; border-collapse: collapse; }}
    th, td {{ text-align: left; padding: 0.5rem 1rem; border-bottom: 1px solid #e5e7eb; }}
    th {{ background: #f9fafb; font-weight: 600; }}
  </style>
</head>
<body>
  <h1>{INDEX_TITLE}</h1>
  <table>
    <thead><tr><th>#</th><th>Variant Type</th><th>Compliance</th><th>File</th></tr></thead>
    <tbody>
{}
    </tbody>
  </table>
</body>
</html>"#,
            rows.join("\n")
        )
    }

    pub fn compliance_summary(&self) -> serde_json::Value {
        serde_json::Value::Array(self.results().map(VariantResult::summary_json).collect())
    }

    pub fn claims_json(&self) -> Result<String, VarianceError> {
        self.claims.to_json_pretty()
    }
}
