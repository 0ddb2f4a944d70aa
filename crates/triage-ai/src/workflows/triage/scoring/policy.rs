use super::super::domain::SeverityLabel;

/// Compounds severity when many symptoms are affirmed at once. Any critical
/// symptom forces at least the 1.15 floor.
pub(crate) fn symptom_multiplier(affirmative_count: usize, has_critical: bool) -> f64 {
    let mut multiplier: f64 = if affirmative_count >= 5 {
        1.2
    } else if affirmative_count >= 3 {
        1.1
    } else {
        1.0
    };

    if has_critical {
        multiplier = multiplier.max(1.15);
    }

    multiplier
}

/// Maps the capped final score onto the severity bands. Thresholds are
/// hand-tuned and deliberately kept as-is; changing them changes the
/// user-facing assessment.
pub(crate) fn label_for_score(score: f64) -> SeverityLabel {
    if score >= 0.75 {
        SeverityLabel::High
    } else if score >= 0.50 {
        SeverityLabel::ModerateHigh
    } else if score >= 0.35 {
        SeverityLabel::Moderate
    } else if score >= 0.20 {
        SeverityLabel::LowModerate
    } else {
        SeverityLabel::Low
    }
}

/// Builds the rationale sentence for a band, citing up to the first two
/// critical symptoms. Always non-empty.
pub(crate) fn rationale(label: SeverityLabel, criticals: &[String]) -> String {
    match label {
        SeverityLabel::High => {
            if criticals.is_empty() {
                "critical condition with multiple severe symptoms".to_string()
            } else {
                let cited = criticals
                    .iter()
                    .take(2)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("critical condition with concerning symptoms including {cited}")
            }
        }
        SeverityLabel::ModerateHigh => match criticals.first() {
            Some(first) => {
                format!("significant condition requiring prompt medical attention, with {first}")
            }
            None => "significant condition requiring prompt medical attention".to_string(),
        },
        SeverityLabel::Moderate => {
            "concerning condition that needs proper care and monitoring".to_string()
        }
        SeverityLabel::LowModerate => {
            "mild to moderate condition requiring attention and home care".to_string()
        }
        SeverityLabel::Low => {
            "mild condition that can be managed with rest and basic care".to_string()
        }
    }
}
