use crate::claim::{Claim, ClaimField};
use crate::color::{HeatScale, card_border_color, series_color};
use crate::error::VarianceError;
use crate::grouping::{
    ClaimGroup, group_by_keys, parse_stat, sort_timepoints, subject_name, unique_values,
};
use crate::markup::{
    ChartKind, bar_dataset, chart_script, data_table, esc, footer, line_dataset, script_block,
};
use crate::skeleton::{DocumentOptions, assemble_document};
use serde_json::{Value, json};

pub type Renderer = fn(&[Claim]) -> String;

pub const GROUPED_BAR: &str = "grouped_bar";
pub const TIMELINE: &str = "timeline";
pub const SPOTLIGHT_CARDS: &str = "spotlight_cards";
pub const HEATMAP: &str = "heatmap";
pub const INFOGRAPHIC: &str = "infographic";

pub const VARIANT_RENDERERS: [(&str, Renderer); 5] = [
    (GROUPED_BAR, render_grouped_bar),
    (TIMELINE, render_timeline),
    (SPOTLIGHT_CARDS, render_spotlight_cards),
    (HEATMAP, render_heatmap),
    (INFOGRAPHIC, render_infographic),
];

pub fn variant_names() -> Vec<&'static str> {
    VARIANT_RENDERERS.iter().map(|(name, _)| *name).collect()
}

pub fn renderer(name: &str) -> Result<Renderer, VarianceError> {
    VARIANT_RENDERERS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, render)| *render)
        .ok_or_else(|| VarianceError::UnknownVariant(name.to_string()))
}

pub fn section_label(name: &str) -> &'static str {
    variance_audit_contract::variant_def(name)
        .map(|def| def.label)
        .unwrap_or("")
}

fn claim_refs(claims: &[Claim]) -> Vec<&Claim> {
    claims.iter().collect()
}

fn document(
    name: &str,
    subject: &str,
    body: &str,
    script: &str,
    chart_library: bool,
    extra_style: &str,
) -> String {
    let label = section_label(name);
    let options = DocumentOptions::new()
        .chart_library(chart_library)
        .extra_style(extra_style)
        .subject_name(subject)
        .section_label(label);
    assemble_document(&format!("{subject} {label}"), body, script, &options)
}

fn comparison_datasets(claims: &[&Claim]) -> Value {
    let datasets: Vec<Value> = claims
        .iter()
        .enumerate()
        .map(|(i, claim)| {
            let arm = claim.treatment_arm();
            let repeats = claims.iter().filter(|c| c.treatment_arm() == arm).count() > 1;
            let label = if repeats {
                format!("{arm} ({})", claim.context())
            } else {
                arm.to_string()
            };
            bar_dataset(&label, &[parse_stat(claim.statistic())], json!(series_color(i)))
        })
        .collect();
    Value::Array(datasets)
}

pub fn render_grouped_bar(claims: &[Claim]) -> String {
    let refs = claim_refs(claims);
    let subject = subject_name(&refs);
    let groups = group_by_keys(&refs, ClaimField::Timepoint, ClaimField::Endpoint);

    let mut body_parts = Vec::with_capacity(groups.len() + 1);
    let mut statements = Vec::with_capacity(groups.len());
    for (idx, ClaimGroup { key: (timepoint, endpoint), claims: group }) in groups.iter().enumerate() {
        let canvas_id = format!("chart-{idx}");
        body_parts.push(format!(
            "<div class=\"card\"><h2>{} — {}</h2><canvas id=\"{canvas_id}\"></canvas>{}</div>",
            esc(endpoint),
            esc(timepoint),
            data_table(group),
        ));
        statements.push(chart_script(
            &canvas_id,
            ChartKind::Bar,
            &json!([endpoint]),
            &comparison_datasets(group),
            Some(format!("{endpoint} — {timepoint}").as_str()),
        ));
    }
    body_parts.push(footer(&refs));

    document(
        GROUPED_BAR,
        &subject,
        &body_parts.join("\n"),
        &script_block(&statements),
        true,
        "",
    )
}

pub fn render_timeline(claims: &[Claim]) -> String {
    let refs = claim_refs(claims);
    let timepoints = unique_values(&refs, ClaimField::Timepoint);
    if timepoints.len() <= 1 {
        return render_timeline_as_bar(&refs);
    }

    let subject = subject_name(&refs);
    let sorted = sort_timepoints(&timepoints);
    let series = group_by_keys(&refs, ClaimField::TreatmentArm, ClaimField::Endpoint);

    let endpoints = unique_values(&refs, ClaimField::Endpoint);
    let mut body_parts = Vec::with_capacity(endpoints.len() + 1);
    let mut statements = Vec::with_capacity(endpoints.len());
    for (idx, endpoint) in endpoints.iter().enumerate() {
        let canvas_id = format!("chart-{idx}");
        let datasets: Vec<Value> = series
            .iter()
            .filter(|group| group.key.1 == *endpoint)
            .enumerate()
            .map(|(i, group)| {
                let points: Vec<Option<f64>> = sorted
                    .iter()
                    .map(|tp| {
                        group
                            .claims
                            .iter()
                            .find(|c| c.timepoint() == *tp)
                            .and_then(|c| parse_stat(c.statistic()))
                    })
                    .collect();
                line_dataset(group.key.0, &points, series_color(i))
            })
            .collect();

        let endpoint_claims: Vec<&Claim> = refs
            .iter()
            .copied()
            .filter(|c| c.endpoint() == *endpoint)
            .collect();
        body_parts.push(format!(
            "<div class=\"card\"><h2>{}</h2><canvas id=\"{canvas_id}\"></canvas>{}</div>",
            esc(endpoint),
            data_table(&endpoint_claims),
        ));
        statements.push(chart_script(
            &canvas_id,
            ChartKind::Line,
            &json!(sorted),
            &Value::Array(datasets),
            Some(*endpoint),
        ));
    }
    body_parts.push(footer(&refs));

    document(
        TIMELINE,
        &subject,
        &body_parts.join("\n"),
        &script_block(&statements),
        true,
        "",
    )
}

// A single timepoint has no trend to draw: one bar chart per endpoint.
fn render_timeline_as_bar(refs: &[&Claim]) -> String {
    let subject = subject_name(refs);
    let endpoints = unique_values(refs, ClaimField::Endpoint);

    let mut body_parts = Vec::with_capacity(endpoints.len() + 1);
    let mut statements = Vec::with_capacity(endpoints.len());
    for (idx, endpoint) in endpoints.iter().enumerate() {
        let canvas_id = format!("chart-{idx}");
        let endpoint_claims: Vec<&Claim> = refs
            .iter()
            .copied()
            .filter(|c| c.endpoint() == *endpoint)
            .collect();
        body_parts.push(format!(
            "<div class=\"card\"><h2>{}</h2><canvas id=\"{canvas_id}\"></canvas>{}</div>",
            esc(endpoint),
            data_table(&endpoint_claims),
        ));
        statements.push(chart_script(
            &canvas_id,
            ChartKind::Bar,
            &json!([endpoint]),
            &comparison_datasets(&endpoint_claims),
            None,
        ));
    }
    body_parts.push(footer(refs));

    document(
        TIMELINE,
        &subject,
        &body_parts.join("\n"),
        &script_block(&statements),
        true,
        "",
    )
}

const SPOTLIGHT_STYLE: &str = r#"
        .spotlight-grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
            gap: 24px;
            margin-bottom: 24px;
        }
        .spotlight-card {
            background: var(--color-surface);
            backdrop-filter: blur(20px);
            -webkit-backdrop-filter: blur(20px);
            border: 1px solid var(--color-border);
            border-radius: var(--radius);
            padding: 28px 32px;
            box-shadow: var(--shadow-card);
            transition: box-shadow 0.3s ease, transform 0.3s ease;
        }
        .spotlight-card:hover {
            box-shadow: var(--shadow-card-hover);
            transform: translateY(-2px);
        }
        .spotlight-hero-stat {
            font-size: 3rem;
            font-weight: 800;
            background: var(--gradient-accent);
            -webkit-background-clip: text;
            -webkit-text-fill-color: transparent;
            background-clip: text;
            line-height: 1.1;
            margin-bottom: 8px;
        }
        .spotlight-subtitle {
            font-size: 0.875rem;
            color: var(--color-text-secondary);
            margin-bottom: 16px;
        }
        .stat-row {
            display: flex;
            flex-wrap: wrap;
            align-items: baseline;
            gap: 8px;
            padding: 8px 0;
            border-top: 1px solid var(--color-border);
        }
        .stat-label {
            font-size: 0.8rem;
            color: var(--color-text-secondary);
            flex: 1;
        }
        .stat-value {
            font-size: 1rem;
            font-weight: 600;
            color: var(--color-navy);
        }
        .stat-endpoint {
            font-size: 0.75rem;
            color: var(--color-text-muted);
            width: 100%;
        }
"#;

pub fn render_spotlight_cards(claims: &[Claim]) -> String {
    let refs = claim_refs(claims);
    let subject = subject_name(&refs);
    let contexts = unique_values(&refs, ClaimField::Context);

    let mut cards = String::new();
    for (idx, context) in contexts.iter().enumerate() {
        let members: Vec<&Claim> = refs
            .iter()
            .copied()
            .filter(|c| c.context() == *context)
            .collect();
        let Some(hero) = members.first() else {
            continue;
        };
        let rows: String = members
            .iter()
            .map(|c| {
                format!(
                    "<div class=\"stat-row\"><span class=\"stat-label\">{}</span><span class=\"stat-value\">{}</span><span class=\"stat-endpoint\">{} — {}</span></div>",
                    esc(c.treatment_arm()),
                    esc(c.statistic()),
                    esc(c.endpoint()),
                    esc(c.timepoint()),
                )
            })
            .collect();
        cards.push_str(&format!(
            "<div class=\"spotlight-card\" style=\"border-left: 4px solid {};\"><div class=\"spotlight-hero-stat\">{}</div><div class=\"spotlight-subtitle\">{}</div><h3>{}</h3>{rows}</div>",
            card_border_color(idx),
            esc(hero.statistic()),
            esc(hero.treatment_arm()),
            esc(context),
        ));
    }

    let body = format!("<div class=\"spotlight-grid\">{cards}</div>{}", footer(&refs));
    document(SPOTLIGHT_CARDS, &subject, &body, "", false, SPOTLIGHT_STYLE)
}

const HEATMAP_STYLE: &str = r#"
        .color-legend {
            display: flex;
            align-items: center;
            gap: 12px;
            margin-bottom: 24px;
            padding: 12px 16px;
            background: var(--color-surface);
            border-radius: var(--radius-sm);
            border: 1px solid var(--color-border);
            width: fit-content;
        }
        .legend-bar {
            width: 200px;
            height: 12px;
            border-radius: 6px;
            background: linear-gradient(90deg, #e0f2fe 0%, #0d9488 50%, #1a2b4a 100%);
        }
        .legend-label {
            font-size: 0.6875rem;
            font-weight: 600;
            color: var(--color-text-secondary);
            text-transform: uppercase;
            letter-spacing: 0.06em;
        }
"#;

const COLOR_LEGEND: &str = "<div class=\"color-legend\"><span class=\"legend-label\">Low</span><div class=\"legend-bar\"></div><span class=\"legend-label\">High</span></div>";

pub fn render_heatmap(claims: &[Claim]) -> String {
    let refs = claim_refs(claims);
    let subject = subject_name(&refs);
    let groups = group_by_keys(&refs, ClaimField::Timepoint, ClaimField::Endpoint);
    let scale = HeatScale::from_values(refs.iter().map(|c| parse_stat(c.statistic())));

    let mut tables = String::new();
    for ClaimGroup { key: (timepoint, endpoint), claims: group } in &groups {
        let mut rows = String::new();
        for claim in group {
            let style = scale.cell_style(parse_stat(claim.statistic()));
            rows.push_str(&format!(
                "<tr><td>{}</td><td style=\"background-color: {}; color: {}; font-weight: 600; text-align: center; border-radius: 6px;\">{}</td><td>{}</td><td>{}</td></tr>\n",
                esc(claim.treatment_arm()),
                style.background,
                style.text,
                esc(claim.statistic()),
                esc(claim.context()),
                esc(claim.sample_size()),
            ));
        }
        tables.push_str(&format!(
            "<div class=\"card\"><h2>{} — {}</h2><table><thead><tr><th>Treatment Arm</th><th>Statistic</th><th>Context</th><th>Sample Size</th></tr></thead><tbody>{rows}</tbody></table></div>",
            esc(endpoint),
            esc(timepoint),
        ));
    }

    let body = format!("{COLOR_LEGEND}{tables}{}", footer(&refs));
    document(HEATMAP, &subject, &body, "", false, HEATMAP_STYLE)
}

const INFOGRAPHIC_STYLE: &str = r#"
        .hero {
            background: var(--gradient-header);
            color: white;
            border-radius: var(--radius);
            padding: 48px 32px;
            text-align: center;
            margin-bottom: 24px;
        }
        .hero-stat {
            font-size: 4rem;
            font-weight: 800;
            line-height: 1;
            margin-bottom: 12px;
        }
        .hero-label {
            font-size: 1.1rem;
            opacity: 0.9;
            margin-bottom: 8px;
        }
        .hero-context {
            font-size: 0.875rem;
            opacity: 0.7;
        }
        .detail-grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
            gap: 16px;
            margin-bottom: 24px;
        }
        .detail-item {
            background: var(--color-surface);
            backdrop-filter: blur(20px);
            -webkit-backdrop-filter: blur(20px);
            border: 1px solid var(--color-border);
            border-radius: var(--radius-sm);
            padding: 20px 24px;
            transition: box-shadow 0.3s ease;
        }
        .detail-item:hover {
            box-shadow: var(--shadow-card-hover);
        }
        .detail-stat {
            font-size: 1.75rem;
            font-weight: 700;
            color: var(--color-navy);
        }
        .detail-arm {
            font-size: 0.875rem;
            color: var(--color-text);
            margin-top: 4px;
        }
        .detail-meta {
            font-size: 0.75rem;
            color: var(--color-text-muted);
            margin-top: 8px;
        }
"#;

pub fn render_infographic(claims: &[Claim]) -> String {
    let refs = claim_refs(claims);
    let subject = subject_name(&refs);

    let hero = refs
        .first()
        .map(|c| {
            format!(
                "<div class=\"hero\"><div class=\"hero-stat\">{}</div><div class=\"hero-label\">{}</div><div class=\"hero-context\">{} — {} — {}</div></div>",
                esc(c.statistic()),
                esc(c.treatment_arm()),
                esc(c.endpoint()),
                esc(c.context()),
                esc(c.timepoint()),
            )
        })
        .unwrap_or_default();

    let details: String = refs
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "<div class=\"detail-item\" style=\"border-left: 4px solid {};\"><div class=\"detail-stat\">{}</div><div class=\"detail-arm\">{}</div><div class=\"detail-meta\">{} — {} — {}</div></div>",
                series_color(i),
                esc(c.statistic()),
                esc(c.treatment_arm()),
                esc(c.endpoint()),
                esc(c.context()),
                esc(c.timepoint()),
            )
        })
        .collect();

    let labels: Vec<&str> = refs.iter().map(|c| c.treatment_arm()).collect();
    let values: Vec<Option<f64>> = refs.iter().map(|c| parse_stat(c.statistic())).collect();
    let colors: Vec<&str> = (0..refs.len()).map(series_color).collect();
    let datasets = json!([bar_dataset("Value", &values, json!(colors))]);

    let body = format!(
        "{hero}<div class=\"detail-grid\">{details}</div><div class=\"card\"><h2>Summary</h2><canvas id=\"chart-0\"></canvas></div>{}{}",
        data_table(&refs),
        footer(&refs),
    );
    let script = script_block(&[chart_script(
        "chart-0",
        ChartKind::Bar,
        &json!(labels),
        &datasets,
        Some("Summary"),
    )]);
    document(INFOGRAPHIC, &subject, &body, &script, true, INFOGRAPHIC_STYLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::fixtures::*;
    use crate::compliance::run_compliance_checks;
    use crate::normalize::visible_text;
    use crate::skeleton::CHART_LIBRARY_URL;
    use kuchiki::traits::TendrilSink;

    fn all_fixtures() -> Vec<Vec<Claim>> {
        vec![sample_claims(), fabricated_claims(), multi_timepoint_claims()]
    }

    #[test]
    fn registry_matches_contract_variants() {
        let contract: Vec<&str> = variance_audit_contract::variant_defs_v1()
            .iter()
            .map(|def| def.id)
            .collect();
        assert_eq!(variant_names(), contract);
        for name in variant_names() {
            assert!(!section_label(name).is_empty(), "{name} has a label");
        }
    }

    #[test]
    fn unknown_variant_is_rejected() {
        match renderer("pie_chart") {
            Err(VarianceError::UnknownVariant(name)) => assert_eq!(name, "pie_chart"),
            other => panic!("expected unknown variant, got {:?}", other.map(|_| ())),
        }
        assert!(renderer(GROUPED_BAR).is_ok());
    }

    #[test]
    fn rendering_is_deterministic() {
        for claims in all_fixtures() {
            for (name, render) in VARIANT_RENDERERS {
                assert_eq!(render(&claims), render(&claims), "{name} is not deterministic");
            }
        }
    }

    #[test]
    fn every_renderer_output_passes_compliance() {
        for claims in all_fixtures() {
            for (name, render) in VARIANT_RENDERERS {
                let markup = render(&claims);
                let report = run_compliance_checks(&markup, &claims);
                assert!(
                    report.passed() && report.flags().is_empty(),
                    "{name} produced flags: {:?}",
                    report.flags()
                );
            }
        }
    }

    #[test]
    fn empty_claims_render_valid_documents() {
        for (name, render) in VARIANT_RENDERERS {
            let markup = render(&[]);
            assert!(markup.starts_with("<!DOCTYPE html>"), "{name}");
            assert!(markup.ends_with("</html>"), "{name}");
            let doc = kuchiki::parse_html().one(markup.as_str());
            assert!(doc.select_first("div.container").is_ok(), "{name} has a container");
            assert!(run_compliance_checks(&markup, &[]).passed(), "{name}");
        }
    }

    #[test]
    fn injected_markup_stays_text() {
        let claims = vec![claim(
            "<script>alert(1)</script>",
            "<img src=x onerror=alert(1)>",
            "Week 4",
            "<b>Arm</b> (n=5)",
            "Doe J. <i>Journal</i> 2020.",
            &["<script>alert(1)</script>"],
            "Endpoint </script>",
        )];
        for (name, render) in VARIANT_RENDERERS {
            let markup = render(&claims);
            assert!(!visible_text(&markup).contains("<script>alert(1)</script>"), "{name}");
            let doc = kuchiki::parse_html().one(markup.as_str());
            assert!(doc.select_first("img").is_err(), "{name} created an element from claim text");
            assert!(doc.select_first("b").is_err(), "{name}");
            let text = doc.text_contents();
            assert!(text.contains("<script>alert(1)</script>"), "{name} lost the literal text");
        }
    }

    #[test]
    fn apostrophes_survive_script_embedding() {
        let claims = vec![
            claim("40%", "All", "Week 4", "Drug A (n=10)", "c", &[], "Patient's Global Assessment"),
            claim("20%", "All", "Week 8", "Drug A (n=10)", "c", &[], "Patient's Global Assessment"),
        ];
        for (name, render) in VARIANT_RENDERERS {
            let markup = render(&claims);
            assert!(!markup.contains("'Patient's"), "{name} broke a quoted literal");
            assert!(run_compliance_checks(&markup, &claims).passed(), "{name}");
        }
    }

    #[test]
    fn qualitative_statistics_render_as_text() {
        let claims = vec![
            claim("not reported", "All", "Week 4", "Drug A (n=10)", "c", &[], "e"),
            claim("31.5%", "All", "Week 12", "Drug A (n=10)", "c", &[], "e"),
        ];
        for (name, render) in VARIANT_RENDERERS {
            let markup = render(&claims);
            assert!(visible_text(&markup).contains("not reported"), "{name}");
        }
        let timeline = render_timeline(&claims);
        assert!(timeline.contains("\"data\":[null,31.5]"));
        let bars = render_grouped_bar(&claims);
        assert!(bars.contains("\"data\":[0.0]"));
    }

    #[test]
    fn single_timepoint_timeline_falls_back_to_bar() {
        let markup = render_timeline(&sample_claims());
        assert!(markup.contains("type: 'bar'"));
        assert!(!markup.contains("type: 'line'"));
        assert_eq!(markup.matches("<canvas").count(), 1);
        assert!(markup.contains("Response Over Time"));
    }

    #[test]
    fn single_timepoint_timeline_charts_each_endpoint() {
        let claims = vec![
            claim("36.2%", "Overall", "Week 24", "Drug A", "Ref 1", &[], "SALT ≤20"),
            claim("12.0%", "Overall", "Week 24", "Drug A", "Ref 1", &[], "EASI-75"),
        ];
        let markup = render_timeline(&claims);
        let report = run_compliance_checks(&markup, &claims);
        assert!(report.flags().is_empty(), "{:?}", report.flags());

        let doc = kuchiki::parse_html().one(markup.as_str());
        let headings: Vec<String> = doc
            .select("div.card h2")
            .expect("selector")
            .map(|h| h.as_node().text_contents())
            .collect();
        assert_eq!(headings, vec!["SALT ≤20", "EASI-75"]);
        assert_eq!(markup.matches("<canvas").count(), 2);
    }

    #[test]
    fn negative_statistics_pass_every_renderer() {
        let claims = vec![
            claim("-12.5%", "Change from baseline", "Week 12", "Drug A", "Ref 1", &[], "EASI"),
            claim("-3.1%", "Change from baseline", "Week 12", "Placebo", "Ref 1", &[], "EASI"),
            claim("-20%", "Change from baseline", "Week 24", "Drug A", "Ref 1", &[], "EASI"),
        ];
        for (name, render) in VARIANT_RENDERERS {
            let markup = render(&claims);
            let report = run_compliance_checks(&markup, &claims);
            assert!(report.flags().is_empty(), "{name} produced flags: {:?}", report.flags());
        }
    }

    #[test]
    fn timeline_orders_points_chronologically() {
        let markup = render_timeline(&multi_timepoint_claims());
        assert!(markup.contains("type: 'line'"));
        assert!(markup.contains("[\"Week 12\",\"Week 24\",\"Week 48\"]"));
        assert!(markup.contains("\"data\":[22.4,36.2,41.7]"));
        assert_eq!(markup.matches("<canvas").count(), 1);
    }

    #[test]
    fn grouped_bar_draws_one_chart_per_group() {
        let markup = render_grouped_bar(&multi_timepoint_claims());
        assert_eq!(markup.matches("<canvas").count(), 3);
        assert!(markup.contains("id=\"chart-2\""));
        let one = render_grouped_bar(&sample_claims());
        assert_eq!(one.matches("<canvas").count(), 1);

        let repeated = vec![
            claim("30%", "Adults", "Week 12", "Drug A (n=50)", "c", &[], "e"),
            claim("25%", "Adolescents", "Week 12", "Drug A (n=50)", "c", &[], "e"),
        ];
        let markup = render_grouped_bar(&repeated);
        assert!(markup.contains("\"Drug A (n=50) (Adults)\""), "repeated arm is disambiguated");
        assert!(markup.contains("\"Drug A (n=50) (Adolescents)\""));
    }

    #[test]
    fn spotlight_has_one_card_per_context_and_no_chart_library() {
        let markup = render_spotlight_cards(&sample_claims());
        let doc = kuchiki::parse_html().one(markup.as_str());
        let cards = doc.select("div.spotlight-card").expect("selector").count();
        assert_eq!(cards, 2);
        assert!(!markup.contains(CHART_LIBRARY_URL));
    }

    #[test]
    fn heatmap_colors_cells_without_chart_library() {
        let markup = render_heatmap(&fabricated_claims());
        assert!(!markup.contains(CHART_LIBRARY_URL));
        assert!(markup.contains("background-color: rgb(224,242,254)"));
        assert!(markup.contains("background-color: rgb(26,43,74)"));
        assert!(markup.contains("class=\"legend-bar\""));
    }

    #[test]
    fn infographic_promotes_first_claim() {
        let claims = fabricated_claims();
        let markup = render_infographic(&claims);
        let doc = kuchiki::parse_html().one(markup.as_str());
        let hero = doc.select_first("div.hero-stat").expect("hero");
        assert_eq!(hero.as_node().text_contents(), "55.1%");
        assert_eq!(doc.select("div.detail-item").expect("selector").count(), claims.len());
        assert!(markup.contains(CHART_LIBRARY_URL));
    }

    #[test]
    fn header_uses_subject_and_label() {
        let markup = render_heatmap(&sample_claims());
        assert!(markup.contains("<title>Ritlecitinib Efficacy Matrix</title>"));
        assert!(markup.contains("<h1>Ritlecitinib</h1>"));
        let empty = render_heatmap(&[]);
        assert!(empty.contains("<h1>Clinical Data</h1>"));
    }
}
