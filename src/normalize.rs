use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

// Exact decimal value kept as a canonical digit string and base-10 exponent,
// so that `36.20` and `36.2` compare equal while `36.2` and `36.3` do not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal {
    negative: bool,
    // No leading or trailing zeros; empty for zero.
    digits: String,
    exponent: i64,
}

// Bounds the rendered length of any parsed value.
const MAX_EXPONENT: i64 = 1000;

impl Decimal {
    pub fn parse(raw: &str) -> Option<Decimal> {
        let text = raw.trim();
        let (negative, body) = if let Some(rest) = text.strip_prefix(['-', '\u{2212}']) {
            (true, rest)
        } else if let Some(rest) = text.strip_prefix('+') {
            (false, rest)
        } else {
            (false, text)
        };
        let (mantissa, exp_part) = match body.find(['e', 'E']) {
            Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
            None => (body, None),
        };
        let mut exponent: i64 = match exp_part {
            Some(exp) => parse_exponent(exp)?,
            None => 0,
        };

        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((i, f)) => (i, f),
            None => (mantissa, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        exponent = exponent.checked_sub(i64::try_from(frac_part.len()).ok()?)?;
        let mut digits = String::with_capacity(int_part.len() + frac_part.len());
        digits.push_str(int_part);
        digits.push_str(frac_part);

        let trimmed_leading = digits.trim_start_matches('0');
        let trimmed = trimmed_leading.trim_end_matches('0');
        let trailing = trimmed_leading.len() - trimmed.len();
        if trimmed.is_empty() {
            return Some(Decimal::zero());
        }
        exponent = exponent.checked_add(i64::try_from(trailing).ok()?)?;
        if exponent.abs() > MAX_EXPONENT {
            return None;
        }
        Some(Decimal {
            negative,
            digits: trimmed.to_string(),
            exponent,
        })
    }

    pub fn zero() -> Decimal {
        Decimal {
            negative: false,
            digits: String::new(),
            exponent: 0,
        }
    }

    pub fn from_u32(value: u32) -> Decimal {
        Decimal::parse(&value.to_string()).unwrap_or_else(Decimal::zero)
    }

    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }
}

fn parse_exponent(raw: &str) -> Option<i64> {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<i64>().ok()
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        if self.negative {
            write!(f, "-")?;
        }
        let len = self.digits.len() as i64;
        if self.exponent >= 0 {
            write!(f, "{}", self.digits)?;
            for _ in 0..self.exponent {
                write!(f, "0")?;
            }
            return Ok(());
        }
        let point = len + self.exponent;
        if point > 0 {
            let (int, frac) = self.digits.split_at(point as usize);
            write!(f, "{int}.{frac}")
        } else {
            write!(f, "0.")?;
            for _ in 0..(-point) {
                write!(f, "0")?;
            }
            write!(f, "{}", self.digits)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PercentToken {
    pub value: Decimal,
    pub text: String,
}

pub fn normalize_number(token: &str) -> Option<Decimal> {
    let stripped = token.trim();
    let stripped = stripped.strip_suffix('%').unwrap_or(stripped);
    Decimal::parse(stripped.trim())
}

fn style_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("style block regex"))
}

fn script_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("script block regex"))
}

fn percentage_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([-\x{2212}]?)(\d+\.?\d*)\s*%").expect("percentage regex"))
}

fn numeric_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d+\.?\d*)").expect("numeric token regex"))
}

pub fn visible_text(markup: &str) -> String {
    let without_style = style_block_re().replace_all(markup, "");
    script_block_re()
        .replace_all(&without_style, "")
        .into_owned()
}

pub fn decode_entities(markup: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(markup)
}

pub fn extract_percentages(text: &str) -> Vec<PercentToken> {
    let visible = visible_text(text);
    let zero = Decimal::zero();
    let hundred = Decimal::from_u32(100);
    let mut out: Vec<PercentToken> = Vec::new();
    for caps in percentage_re().captures_iter(&visible) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        // A dash joined to a preceding word or number is a range or hyphen.
        let signed = !caps[1].is_empty()
            && !visible[..whole.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == '.' || c == '%');
        let raw = if signed {
            format!("-{}", &caps[2])
        } else {
            caps[2].to_string()
        };
        let Some(value) = Decimal::parse(&raw) else {
            continue;
        };
        if value == zero || value == hundred {
            continue;
        }
        if out.iter().any(|tok| tok.value == value) {
            continue;
        }
        out.push(PercentToken { value, text: raw });
    }
    out
}

pub fn numeric_tokens(text: &str) -> impl Iterator<Item = Decimal> + '_ {
    numeric_token_re()
        .captures_iter(text)
        .filter_map(|caps| normalize_number(&caps[1]))
}
