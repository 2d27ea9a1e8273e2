use crate::claim::{Claim, ClaimField};
use std::cmp::Ordering;
use std::collections::HashMap;

pub const DEFAULT_SUBJECT: &str = "Clinical Data";

pub fn unique_values<'a>(claims: &[&'a Claim], field: ClaimField) -> Vec<&'a str> {
    let mut seen: Vec<&'a str> = Vec::new();
    for &claim in claims {
        let value = field.get(claim);
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

pub fn collect_qualifiers<'a>(claims: &[&'a Claim]) -> Vec<&'a str> {
    let mut seen: Vec<&'a str> = Vec::new();
    for &claim in claims {
        for qualifier in claim.qualifiers() {
            if !seen.contains(&qualifier.as_str()) {
                seen.push(qualifier.as_str());
            }
        }
    }
    seen
}

#[derive(Debug, Clone)]
pub struct ClaimGroup<'a> {
    pub key: (&'a str, &'a str),
    pub claims: Vec<&'a Claim>,
}

pub fn group_by_keys<'a>(
    claims: &[&'a Claim],
    first: ClaimField,
    second: ClaimField,
) -> Vec<ClaimGroup<'a>> {
    let mut groups: Vec<ClaimGroup<'a>> = Vec::new();
    let mut index: HashMap<(&'a str, &'a str), usize> = HashMap::new();
    for &claim in claims {
        let key = (first.get(claim), second.get(claim));
        match index.get(&key) {
            Some(&pos) => groups[pos].claims.push(claim),
            None => {
                index.insert(key, groups.len());
                groups.push(ClaimGroup {
                    key,
                    claims: vec![claim],
                });
            }
        }
    }
    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeUnit {
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "day" => Some(TimeUnit::Day),
            "week" => Some(TimeUnit::Week),
            "month" => Some(TimeUnit::Month),
            "year" => Some(TimeUnit::Year),
            _ => None,
        }
    }
}

// Sort key for free-text timepoint labels. Recognized `<Unit> <number>` labels
// order by unit then value; everything else sorts after them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimepointKey {
    Recognized { unit: TimeUnit, value: f64 },
    Unrecognized,
}

impl Eq for TimepointKey {}

impl Ord for TimepointKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (
                TimepointKey::Recognized { unit: a, value: x },
                TimepointKey::Recognized { unit: b, value: y },
            ) => a.cmp(b).then_with(|| x.total_cmp(y)),
            (TimepointKey::Recognized { .. }, TimepointKey::Unrecognized) => Ordering::Less,
            (TimepointKey::Unrecognized, TimepointKey::Recognized { .. }) => Ordering::Greater,
            (TimepointKey::Unrecognized, TimepointKey::Unrecognized) => Ordering::Equal,
        }
    }
}

impl PartialOrd for TimepointKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub fn chronological_key(label: &str) -> TimepointKey {
    let mut parts = label.split_whitespace();
    let (Some(word), Some(number)) = (parts.next(), parts.next()) else {
        return TimepointKey::Unrecognized;
    };
    let Some(unit) = TimeUnit::from_word(word) else {
        return TimepointKey::Unrecognized;
    };
    // "Week 24 (primary)" still keys on the leading number.
    let numeric: String = number
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match numeric.parse::<f64>() {
        Ok(value) if value.is_finite() => TimepointKey::Recognized { unit, value },
        _ => TimepointKey::Unrecognized,
    }
}

pub fn sort_timepoints<'a>(labels: &[&'a str]) -> Vec<&'a str> {
    let mut sorted = labels.to_vec();
    sorted.sort_by_key(|label| chronological_key(label));
    sorted
}

pub fn parse_stat(statistic: &str) -> Option<f64> {
    let cleaned = statistic.trim();
    let cleaned = cleaned.strip_suffix('%').unwrap_or(cleaned).trim_end();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn subject_name(claims: &[&Claim]) -> String {
    claims
        .first()
        .and_then(|claim| claim.treatment_arm().split_whitespace().next())
        .unwrap_or(DEFAULT_SUBJECT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::fixtures::*;

    fn refs(claims: &[Claim]) -> Vec<&Claim> {
        claims.iter().collect()
    }

    #[test]
    fn unique_values_preserve_first_occurrence() {
        let claims = vec![
            claim("1%", "A", "Week 1", "X (n=1)", "c", &[], "e"),
            claim("2%", "B", "Week 1", "X (n=1)", "c", &[], "e"),
            claim("3%", "A", "Week 1", "X (n=1)", "c", &[], "e"),
        ];
        assert_eq!(unique_values(&refs(&claims), ClaimField::Context), vec!["A", "B"]);
    }

    #[test]
    fn unique_values_is_not_sorted() {
        let claims = fabricated_claims();
        assert_eq!(
            unique_values(&refs(&claims), ClaimField::Context),
            vec!["Mild severity", "Moderate severity"]
        );
        let reversed: Vec<&Claim> = claims.iter().rev().collect();
        assert_eq!(
            unique_values(&reversed, ClaimField::Context),
            vec!["Moderate severity", "Mild severity"]
        );
    }

    #[test]
    fn qualifiers_flatten_and_dedupe() {
        let claims = fabricated_claims();
        assert_eq!(
            collect_qualifiers(&refs(&claims)),
            vec!["ITT population", "Exploratory"]
        );
    }

    #[test]
    fn grouping_keeps_key_and_member_order() {
        let claims = multi_timepoint_claims();
        let groups = group_by_keys(&refs(&claims), ClaimField::Timepoint, ClaimField::Endpoint);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.0).collect();
        assert_eq!(keys, vec!["Week 24", "Week 12", "Week 48"]);
        assert_eq!(groups[0].claims[0].statistic(), "36.2%");
        assert_eq!(groups[0].claims[1].statistic(), "12.1%");
    }

    #[test]
    fn chronological_key_orders_units() {
        assert!(chronological_key("Day 7") < chronological_key("Week 1"));
        assert!(chronological_key("Week 1") < chronological_key("Month 1"));
        assert!(chronological_key("Month 1") < chronological_key("Year 1"));
        assert!(chronological_key("Week 12") < chronological_key("Week 24"));
        assert!(chronological_key("Week 52") < chronological_key("Month 1"));
        assert!(chronological_key("week 4") < chronological_key("WEEK 8"));
    }

    #[test]
    fn unrecognized_labels_sort_last() {
        assert!(chronological_key("Baseline") > chronological_key("Week 1"));
        assert_eq!(chronological_key("Weeks 4"), TimepointKey::Unrecognized);
        assert_eq!(chronological_key("Week"), TimepointKey::Unrecognized);
        assert_eq!(chronological_key("Week x"), TimepointKey::Unrecognized);
    }

    #[test]
    fn sort_is_stable_for_unrecognized_labels() {
        let sorted = sort_timepoints(&["End of study", "Week 24", "Baseline", "Day 1"]);
        assert_eq!(sorted, vec!["Day 1", "Week 24", "End of study", "Baseline"]);
    }

    #[test]
    fn parse_stat_handles_qualitative_values() {
        assert_eq!(parse_stat("36.2%"), Some(36.2));
        assert_eq!(parse_stat("42"), Some(42.0));
        assert_eq!(parse_stat("0.5"), Some(0.5));
        assert_eq!(parse_stat("-3.1%"), Some(-3.1));
        assert_eq!(parse_stat("not reported"), None);
        assert_eq!(parse_stat("N/A"), None);
        assert_eq!(parse_stat("inf"), None);
    }

    #[test]
    fn subject_name_defaults_when_empty() {
        assert_eq!(subject_name(&[]), DEFAULT_SUBJECT);
        let claims = sample_claims();
        assert_eq!(subject_name(&refs(&claims)), "Ritlecitinib");
    }
}
