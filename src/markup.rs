use crate::claim::{Claim, ClaimField};
use crate::grouping::{collect_qualifiers, unique_values};
use serde::Serialize;
use serde_json::{Value, json};

pub fn esc(raw: &str) -> String {
    html_escape::encode_text(raw).into_owned()
}

// JSON literal safe to embed inside a `<script>` element: `<`, `>`, `&` and
// the JS line separators are written as unicode escapes so no claim text can
// close the script block.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> String {
    let raw = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
    let mut out = String::with_capacity(raw.len() + 16);
    for ch in raw.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
        }
    }
}

const AXIS_TICKS: &str = "ticks: { font: { size: 11, family: 'Inter' } }";
const GRID_Y: &str = "grid: { color: 'rgba(148,163,184,0.15)' }";

pub fn chart_script(
    canvas_id: &str,
    kind: ChartKind,
    labels: &Value,
    datasets: &Value,
    title: Option<&str>,
) -> String {
    let legend = "legend: { labels: { font: { size: 11, family: 'Inter' }, usePointStyle: true, pointStyle: 'circle' } }";
    let plugins = match title {
        Some(text) => format!(
            "plugins: {{ title: {{ display: true, text: {}, font: {{ size: 14, family: 'Inter', weight: '600' }}, color: '#1a2b4a' }}, {legend} }}",
            script_json(text)
        ),
        None => format!("plugins: {{ {legend} }}"),
    };
    let x_grid = match kind {
        ChartKind::Bar => "grid: { display: false }",
        ChartKind::Line => "grid: { color: 'rgba(148,163,184,0.08)' }",
    };
    let scales = format!(
        "scales: {{ y: {{ {GRID_Y}, {AXIS_TICKS} }}, x: {{ {x_grid}, {AXIS_TICKS} }} }}"
    );
    format!(
        "\nnew Chart(document.getElementById({}), {{\n  type: '{}',\n  data: {{ labels: {}, datasets: {} }},\n  options: {{ responsive: true, {plugins}, {scales} }}\n}});",
        script_json(canvas_id),
        kind.as_str(),
        script_json(labels),
        script_json(datasets),
    )
}

pub fn script_block(statements: &[String]) -> String {
    if statements.is_empty() {
        return String::new();
    }
    format!("<script>{}\n</script>", statements.join("\n"))
}

pub fn bar_dataset(label: &str, values: &[Option<f64>], color: Value) -> Value {
    let data: Vec<f64> = values.iter().map(|v| v.unwrap_or(0.0)).collect();
    json!({
        "label": label,
        "data": data,
        "backgroundColor": color,
        "borderRadius": 6,
        "borderSkipped": false,
    })
}

// Line dataset for one series. Missing or unparseable points are `null` so
// the line shows a gap instead of a fabricated zero.
pub fn line_dataset(label: &str, values: &[Option<f64>], color: &str) -> Value {
    json!({
        "label": label,
        "data": values,
        "borderColor": color,
        "backgroundColor": color,
        "fill": false,
        "tension": 0.3,
        "pointRadius": 5,
        "pointHoverRadius": 7,
        "spanGaps": true,
    })
}

pub fn data_table(claims: &[&Claim]) -> String {
    let mut rows = String::new();
    for claim in claims {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            esc(claim.treatment_arm()),
            esc(claim.statistic()),
            esc(claim.context()),
            esc(claim.sample_size()),
        ));
    }
    format!(
        "<table><thead><tr><th>Treatment Arm</th><th>Statistic</th><th>Context</th><th>Sample Size</th></tr></thead><tbody>{rows}</tbody></table>"
    )
}

pub fn citations_section(claims: &[&Claim]) -> String {
    let items: String = unique_values(claims, ClaimField::Citation)
        .into_iter()
        .map(|citation| format!("<p class=\"citation\">{}</p>", esc(citation)))
        .collect();
    format!("<h2>Citations</h2>{items}")
}

pub fn qualifiers_section(claims: &[&Claim]) -> String {
    let qualifiers = collect_qualifiers(claims);
    if qualifiers.is_empty() {
        return String::new();
    }
    let items: String = qualifiers
        .into_iter()
        .map(|q| format!("<span class=\"qualifier\">{}</span>", esc(q)))
        .collect();
    format!("<h2>Qualifiers</h2><div>{items}</div>")
}

pub fn footer(claims: &[&Claim]) -> String {
    format!(
        "<div class=\"footer-section\">{}{}</div>",
        citations_section(claims),
        qualifiers_section(claims)
    )
}
