pub const SERIES_COLORS: [&str; 10] = [
    "#0d9488", "#a855f7", "#e879a0", "#2d4a7a", "#5eead4", "#F39C12", "#E74C3C", "#8E44AD",
    "#27AE60", "#D35400",
];

pub const CARD_BORDER_COLORS: [&str; 6] = [
    "#0d9488", "#2d4a7a", "#c026d3", "#7c3aed", "#e879a0", "#F39C12",
];

pub fn series_color(index: usize) -> &'static str {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

pub fn card_border_color(index: usize) -> &'static str {
    CARD_BORDER_COLORS[index % CARD_BORDER_COLORS.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn css(&self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

pub const HEAT_LOW: Rgb = Rgb::new(224, 242, 254);
pub const HEAT_HIGH: Rgb = Rgb::new(26, 43, 74);
pub const NEUTRAL_BACKGROUND: &str = "#FFFFFF";
pub const DEFAULT_TEXT: &str = "#1e293b";
pub const DARK_TEXT: &str = "#1a2b4a";
pub const LIGHT_TEXT: &str = "#ffffff";

// Cells past this fraction of the range are dark enough to need light text.
const LIGHT_TEXT_THRESHOLD: f64 = 0.6;

fn lerp_channel(low: u8, high: u8, t: f64) -> u8 {
    let value = low as f64 + (high as f64 - low as f64) * t;
    value.clamp(0.0, 255.0) as u8
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellStyle {
    pub background: String,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatScale {
    min: f64,
    range: f64,
}

impl HeatScale {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        for value in values.into_iter().flatten() {
            min = Some(min.map_or(value, |m| m.min(value)));
            max = Some(max.map_or(value, |m| m.max(value)));
        }
        let min = min.unwrap_or(0.0);
        let max = max.unwrap_or(1.0);
        let range = if max != min { max - min } else { 1.0 };
        Self { min, range }
    }

    pub fn position(&self, value: f64) -> f64 {
        (value - self.min) / self.range
    }

    pub fn color(&self, value: f64) -> Rgb {
        let t = self.position(value);
        Rgb::new(
            lerp_channel(HEAT_LOW.r, HEAT_HIGH.r, t),
            lerp_channel(HEAT_LOW.g, HEAT_HIGH.g, t),
            lerp_channel(HEAT_LOW.b, HEAT_HIGH.b, t),
        )
    }

    pub fn cell_style(&self, value: Option<f64>) -> CellStyle {
        match value {
            None => CellStyle {
                background: NEUTRAL_BACKGROUND.to_string(),
                text: DEFAULT_TEXT,
            },
            Some(v) => CellStyle {
                background: self.color(v).css(),
                text: if self.position(v) > LIGHT_TEXT_THRESHOLD {
                    LIGHT_TEXT
                } else {
                    DARK_TEXT
                },
            },
        }
    }
}
