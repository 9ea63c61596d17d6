//! Maps an averaged weather value to a display color using a variable's ordered
//! threshold rules.

use crate::types::variable::{Color, ColorRule, Variable};

/// Classifies `value` using `variable`'s rules.
///
/// See [`classify_with_rules`] for the matching policy.
///
/// # Examples
///
/// ```
/// use polygon_weather::{classify, Variable, VariableId};
///
/// let temperature = Variable::get(VariableId::Temperature);
/// assert_eq!(classify(15.0, &temperature).as_str(), "#22c55e");
/// ```
pub fn classify(value: f64, variable: &Variable) -> Color {
    classify_with_rules(value, &variable.rules)
}

/// Returns the color of the first rule with `min <= value < max`.
///
/// When no rule matches (below the first minimum, in a gap between rules, at or
/// above the last maximum, or NaN) the color of the *last* rule is returned.
/// Values below the range are therefore colored like the top of the range.
/// An empty rule list yields [`Color::NEUTRAL`].
pub fn classify_with_rules(value: f64, rules: &[ColorRule]) -> Color {
    rules
        .iter()
        .find(|rule| rule.contains(value))
        .or_else(|| rules.last())
        .map(|rule| rule.color)
        .unwrap_or(Color::NEUTRAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::variable::VariableId;

    const A: &str = "#0000aa";
    const B: &str = "#0000bb";
    const C: &str = "#0000cc";

    fn rules() -> Vec<ColorRule> {
        vec![
            ColorRule::new(-20.0, 0.0, A),
            ColorRule::new(0.0, 10.0, B),
            ColorRule::new(10.0, 20.0, C),
        ]
    }

    #[test]
    fn test_first_matching_rule_wins() {
        assert_eq!(classify_with_rules(5.0, &rules()), Color(B));
        assert_eq!(classify_with_rules(-20.0, &rules()), Color(A));
        assert_eq!(classify_with_rules(0.0, &rules()), Color(B));
        assert_eq!(classify_with_rules(19.99, &rules()), Color(C));
    }

    #[test]
    fn test_out_of_range_falls_back_to_last_rule() {
        assert_eq!(classify_with_rules(-25.0, &rules()), Color(C));
        assert_eq!(classify_with_rules(25.0, &rules()), Color(C));
        assert_eq!(classify_with_rules(20.0, &rules()), Color(C));
    }

    #[test]
    fn test_gap_falls_back_to_last_rule() {
        let gapped = vec![ColorRule::new(0.0, 1.0, A), ColorRule::new(2.0, 3.0, B)];
        assert_eq!(classify_with_rules(1.5, &gapped), Color(B));
    }

    #[test]
    fn test_overlap_prefers_earlier_rule() {
        let overlapping = vec![ColorRule::new(0.0, 10.0, A), ColorRule::new(5.0, 15.0, B)];
        assert_eq!(classify_with_rules(7.0, &overlapping), Color(A));
    }

    #[test]
    fn test_nan_and_infinities_hit_fallback() {
        assert_eq!(classify_with_rules(f64::NAN, &rules()), Color(C));
        assert_eq!(classify_with_rules(f64::NEG_INFINITY, &rules()), Color(C));
        assert_eq!(classify_with_rules(f64::INFINITY, &rules()), Color(C));
    }

    #[test]
    fn test_empty_rules_are_neutral() {
        assert_eq!(classify_with_rules(1.0, &[]), Color::NEUTRAL);
    }

    #[test]
    fn test_very_cold_temperature_is_colored_as_hottest() {
        let temperature = Variable::get(VariableId::Temperature);
        let hottest = temperature.rules.last().unwrap().color;
        assert_eq!(classify(-60.0, &temperature), hottest);
    }
}
