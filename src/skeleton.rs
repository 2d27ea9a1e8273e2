use crate::grouping::DEFAULT_SUBJECT;
use crate::markup::esc;

pub const CHART_LIBRARY_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    pub include_chart_library: bool,
    pub extra_style: String,
    pub subject_name: String,
    pub section_label: String,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            include_chart_library: true,
            extra_style: String::new(),
            subject_name: DEFAULT_SUBJECT.to_string(),
            section_label: String::new(),
        }
    }
}

impl DocumentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chart_library(mut self, enabled: bool) -> Self {
        self.include_chart_library = enabled;
        self
    }

    pub fn extra_style(mut self, style: impl Into<String>) -> Self {
        self.extra_style = style.into();
        self
    }

    pub fn subject_name(mut self, name: impl Into<String>) -> Self {
        self.subject_name = name.into();
        self
    }

    pub fn section_label(mut self, label: impl Into<String>) -> Self {
        self.section_label = label.into();
        self
    }
}

const BASE_STYLE: &str = r#"
        @import url('https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700;800&display=swap');

        :root {
            --color-navy: #1a2b4a;
            --color-navy-light: #2d4a7a;
            --color-teal: #0d9488;
            --color-teal-light: #5eead4;
            --color-magenta: #a855f7;
            --color-magenta-light: #e9d5ff;
            --color-rose: #e879a0;
            --color-text: #1e293b;
            --color-text-secondary: #64748b;
            --color-text-muted: #94a3b8;
            --color-surface: rgba(255, 255, 255, 0.72);
            --color-surface-hover: rgba(255, 255, 255, 0.88);
            --color-border: rgba(148, 163, 184, 0.2);
            --gradient-bg: linear-gradient(135deg, #f0e6ff 0%, #e8f0fe 30%, #fce7f3 60%, #e0f2fe 100%);
            --gradient-header: linear-gradient(135deg, #1a2b4a 0%, #2d4a7a 50%, #4a3a6a 100%);
            --gradient-accent: linear-gradient(135deg, #0d9488 0%, #a855f7 100%);
            --shadow-card: 0 4px 24px rgba(0, 0, 0, 0.06), 0 1px 2px rgba(0, 0, 0, 0.04);
            --shadow-card-hover: 0 12px 40px rgba(0, 0, 0, 0.1), 0 4px 8px rgba(0, 0, 0, 0.06);
            --radius: 16px;
            --radius-sm: 8px;
            --radius-xs: 4px;
        }

        *, *::before, *::after {
            box-sizing: border-box;
            margin: 0;
            padding: 0;
        }

        body {
            font-family: 'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
            color: var(--color-text);
            background: var(--gradient-bg);
            min-height: 100vh;
            line-height: 1.6;
            -webkit-font-smoothing: antialiased;
        }

        .page-header {
            background: var(--gradient-header);
            padding: 40px 48px 32px;
            margin-bottom: 32px;
        }

        .page-header h1 {
            color: white;
            font-size: 2rem;
            font-weight: 800;
            letter-spacing: -0.03em;
            text-transform: uppercase;
            margin: 0;
        }

        .page-header .subtitle {
            color: rgba(255,255,255,0.7);
            font-size: 0.875rem;
            font-weight: 400;
            margin-top: 4px;
            letter-spacing: 0.05em;
            text-transform: uppercase;
        }

        .container {
            max-width: 1200px;
            margin: 0 auto;
            padding: 0 32px 48px;
        }

        .card {
            background: var(--color-surface);
            backdrop-filter: blur(20px);
            -webkit-backdrop-filter: blur(20px);
            border: 1px solid var(--color-border);
            border-radius: var(--radius);
            padding: 28px 32px;
            margin-bottom: 24px;
            box-shadow: var(--shadow-card);
            transition: box-shadow 0.3s ease, transform 0.3s ease;
        }

        .card:hover {
            box-shadow: var(--shadow-card-hover);
            transform: translateY(-1px);
        }

        h2 {
            font-size: 1.125rem;
            font-weight: 700;
            color: var(--color-navy);
            margin-bottom: 20px;
            letter-spacing: -0.01em;
        }

        h3 {
            font-size: 0.875rem;
            font-weight: 600;
            color: var(--color-text-secondary);
            margin-bottom: 12px;
            text-transform: uppercase;
            letter-spacing: 0.06em;
        }

        table {
            width: 100%;
            border-collapse: collapse;
            font-size: 0.8125rem;
        }

        th {
            font-weight: 600;
            text-align: left;
            padding: 10px 16px;
            border-bottom: 2px solid var(--color-navy);
            color: var(--color-navy);
            text-transform: uppercase;
            font-size: 0.6875rem;
            letter-spacing: 0.08em;
        }

        td {
            padding: 10px 16px;
            border-bottom: 1px solid var(--color-border);
            color: var(--color-text);
        }

        tr:last-child td {
            border-bottom: none;
        }

        .citation {
            font-size: 0.7rem;
            color: var(--color-text-muted);
            line-height: 1.5;
            margin-top: 8px;
        }

        .qualifier {
            display: inline-block;
            background: var(--color-magenta-light);
            color: #7c3aed;
            font-size: 0.6875rem;
            font-weight: 500;
            padding: 4px 12px;
            border-radius: 20px;
            margin-right: 6px;
            margin-bottom: 6px;
        }

        .footer-section {
            margin-top: 40px;
            padding-top: 24px;
            border-top: 1px solid var(--color-border);
        }

        .footer-section h2 {
            font-size: 0.75rem;
            text-transform: uppercase;
            letter-spacing: 0.1em;
            color: var(--color-text-muted);
            margin-bottom: 12px;
        }
"#;

const PRINT_STYLE: &str = r#"
        @media print {
            body {
                background: white;
            }
            .page-header {
                -webkit-print-color-adjust: exact;
                print-color-adjust: exact;
            }
            .container {
                max-width: none;
                padding: 0;
            }
            .card {
                box-shadow: none;
                border: 1px solid #ddd;
                break-inside: avoid;
            }
        }
"#;

pub fn assemble_document(title: &str, body: &str, script: &str, options: &DocumentOptions) -> String {
    let mut out = String::with_capacity(BASE_STYLE.len() + body.len() + script.len() + 2048);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("    <meta charset=\"UTF-8\">\n");
    out.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    out.push_str("    <title>");
    out.push_str(&esc(title));
    out.push_str("</title>\n");
    if options.include_chart_library {
        out.push_str("    <script src=\"");
        out.push_str(CHART_LIBRARY_URL);
        out.push_str("\"></script>\n");
    }
    out.push_str("    <style>");
    out.push_str(BASE_STYLE);
    if !options.extra_style.is_empty() {
        out.push_str(&options.extra_style);
        out.push('\n');
    }
    out.push_str(PRINT_STYLE);
    out.push_str("    </style>\n</head>\n<body>\n");
    out.push_str("    <div class=\"page-header\">\n        <h1>");
    out.push_str(&esc(&options.subject_name));
    out.push_str("</h1>\n");
    if !options.section_label.is_empty() {
        out.push_str("        <div class=\"subtitle\">");
        out.push_str(&esc(&options.section_label));
        out.push_str("</div>\n");
    }
    out.push_str("    </div>\n    <div class=\"container\">\n        ");
    out.push_str(body);
    out.push_str("\n    </div>\n    ");
    out.push_str(script);
    out.push_str("\n</body>\n</html>");
    out
}
