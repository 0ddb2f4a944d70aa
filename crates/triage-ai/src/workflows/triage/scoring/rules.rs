use std::collections::BTreeMap;

use super::super::domain::AnswerValue;

/// Semantic role assigned to an answer key. Each role selects exactly one
/// contribution rule; dispatch never guesses from the shape of the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    /// Body temperature in °F.
    Temperature,
    /// Symptom duration in days.
    DurationDays,
    /// Blood pressure reading as a `systolic/diastolic` string.
    BloodPressure,
    /// Episode frequency per day.
    EpisodeFrequency,
    /// Yes/no symptom that forces an elevated contribution when affirmed.
    CriticalFlag,
    /// Free-text pain or cough quality.
    PainQuality,
    /// Free-text discharge description.
    DischargeQuality,
    /// Self-reported overall severity.
    SelfReported,
}

/// Explicit key-name to role mapping consulted by the engine.
#[derive(Debug, Clone)]
pub struct KeyRoleTable {
    roles: BTreeMap<String, KeyRole>,
}

impl KeyRoleTable {
    /// The role table matching the shipped condition catalog.
    pub fn standard() -> Self {
        let mut roles = BTreeMap::new();
        roles.insert("temperature".to_string(), KeyRole::Temperature);
        roles.insert("duration".to_string(), KeyRole::DurationDays);
        roles.insert("bp_level".to_string(), KeyRole::BloodPressure);
        roles.insert("frequency".to_string(), KeyRole::EpisodeFrequency);
        for key in [
            "difficulty_breathing",
            "chest_pain",
            "blood_sputum",
            "blood_in_urine",
            "self_harm",
            "wave_pain",
        ] {
            roles.insert(key.to_string(), KeyRole::CriticalFlag);
        }
        roles.insert("pain_type".to_string(), KeyRole::PainQuality);
        roles.insert("cough_type".to_string(), KeyRole::PainQuality);
        roles.insert("discharge_type".to_string(), KeyRole::DischargeQuality);
        roles.insert("severity".to_string(), KeyRole::SelfReported);
        Self { roles }
    }

    /// Adds or overrides a single key's role.
    pub fn with_role(mut self, key: &str, role: KeyRole) -> Self {
        self.roles.insert(key.to_string(), role);
        self
    }

    pub fn role(&self, key: &str) -> Option<KeyRole> {
        self.roles.get(key).copied()
    }
}

/// Outcome of applying a rule to one answered key.
pub(crate) struct Contribution {
    /// Fraction of the formula weight awarded. May exceed 1.0 for critical
    /// answers.
    pub(crate) fraction: f64,
    /// Band note recorded in the audit trail.
    pub(crate) note: &'static str,
    /// Human-readable description when the answer qualifies as critical.
    pub(crate) critical: Option<String>,
}

pub(crate) enum RuleOutcome {
    Scored(Contribution),
    /// No rule could interpret the answer; contributes zero and is surfaced
    /// in the ignored-key diagnostics.
    Ignored,
}

fn scored(fraction: f64, note: &'static str) -> RuleOutcome {
    RuleOutcome::Scored(Contribution {
        fraction,
        note,
        critical: None,
    })
}

fn critical(fraction: f64, note: &'static str, description: String) -> RuleOutcome {
    RuleOutcome::Scored(Contribution {
        fraction,
        note,
        critical: Some(description),
    })
}

/// Applies the rule selected by `role` to an answered key.
pub(crate) fn contribution(
    role: Option<KeyRole>,
    key: &str,
    answer: &AnswerValue,
) -> RuleOutcome {
    match role {
        Some(KeyRole::Temperature) => temperature(answer),
        Some(KeyRole::DurationDays) => duration(answer),
        Some(KeyRole::BloodPressure) => blood_pressure(answer),
        Some(KeyRole::EpisodeFrequency) => frequency(answer),
        Some(KeyRole::CriticalFlag) => critical_flag(key, answer),
        Some(KeyRole::PainQuality) => pain_quality(answer),
        Some(KeyRole::DischargeQuality) => discharge_quality(answer),
        Some(KeyRole::SelfReported) => self_reported(answer),
        None => plain_symptom(answer),
    }
}

fn temperature(answer: &AnswerValue) -> RuleOutcome {
    let Some(value) = answer.as_number() else {
        return RuleOutcome::Ignored;
    };
    if value >= 104.0 {
        critical(1.2, "very high fever", format!("Very high fever ({value}°F)"))
    } else if value >= 103.0 {
        critical(1.0, "high fever", format!("High fever ({value}°F)"))
    } else if value >= 101.0 {
        scored(0.75, "moderate fever")
    } else if value >= 99.5 {
        scored(0.5, "low-grade fever")
    } else if value >= 98.6 {
        scored(0.25, "slight elevation")
    } else {
        scored(0.0, "within normal range")
    }
}

fn duration(answer: &AnswerValue) -> RuleOutcome {
    let Some(value) = answer.as_number() else {
        return RuleOutcome::Ignored;
    };
    if value >= 14.0 {
        critical(
            1.0,
            "chronic duration",
            format!("Prolonged duration ({value} days)"),
        )
    } else if value >= 7.0 {
        scored(0.8, "extended duration")
    } else if value >= 3.0 {
        scored(0.6, "moderate duration")
    } else {
        scored(0.4, "acute onset")
    }
}

fn blood_pressure(answer: &AnswerValue) -> RuleOutcome {
    let Some(raw) = answer.as_text() else {
        return RuleOutcome::Ignored;
    };
    let Some((systolic, diastolic)) = parse_blood_pressure(raw) else {
        return RuleOutcome::Ignored;
    };
    if systolic >= 180 || diastolic >= 120 {
        critical(
            1.2,
            "hypertensive crisis",
            format!("Severe hypertension ({})", raw.trim()),
        )
    } else if systolic >= 140 || diastolic >= 90 {
        scored(0.9, "stage 2 hypertension")
    } else if systolic >= 130 || diastolic >= 80 {
        scored(0.6, "stage 1 hypertension")
    } else {
        scored(0.3, "elevated reading")
    }
}

fn frequency(answer: &AnswerValue) -> RuleOutcome {
    let Some(value) = answer.as_number() else {
        return RuleOutcome::Ignored;
    };
    if value >= 10.0 {
        critical(
            1.0,
            "very frequent episodes",
            format!("Very frequent episodes ({value}/day)"),
        )
    } else if value >= 6.0 {
        scored(0.8, "frequent episodes")
    } else if value >= 3.0 {
        scored(0.6, "moderate frequency")
    } else {
        scored(0.4, "occasional episodes")
    }
}

fn critical_flag(key: &str, answer: &AnswerValue) -> RuleOutcome {
    match answer.as_boolean() {
        Some(true) => critical(1.2, "critical symptom affirmed", key.replace('_', " ")),
        Some(false) => scored(0.0, "denied"),
        None => RuleOutcome::Ignored,
    }
}

fn pain_quality(answer: &AnswerValue) -> RuleOutcome {
    let Some(raw) = answer.as_text() else {
        return RuleOutcome::Ignored;
    };
    let lower = raw.to_lowercase();
    if ["constant", "severe", "sharp", "radiating"]
        .iter()
        .any(|marker| lower.contains(marker))
    {
        scored(0.9, "severe quality")
    } else if lower.contains("intermittent") || lower.contains("moderate") {
        scored(0.6, "moderate quality")
    } else {
        scored(0.4, "mild quality")
    }
}

fn discharge_quality(answer: &AnswerValue) -> RuleOutcome {
    let Some(raw) = answer.as_text() else {
        return RuleOutcome::Ignored;
    };
    let lower = raw.to_lowercase();
    if lower.contains("green") || lower.contains("blood") {
        critical(0.9, "infected discharge", format!("{lower} discharge"))
    } else if lower.contains("yellow") {
        scored(0.7, "discoloured discharge")
    } else {
        scored(0.4, "clear discharge")
    }
}

fn self_reported(answer: &AnswerValue) -> RuleOutcome {
    let Some(raw) = answer.as_text() else {
        return RuleOutcome::Ignored;
    };
    let lower = raw.to_lowercase();
    if lower.contains("severe") {
        scored(1.0, "self-reported severe")
    } else if lower.contains("moderate") {
        scored(0.6, "self-reported moderate")
    } else {
        scored(0.3, "self-reported mild")
    }
}

/// Keys without a dedicated role score as ordinary yes/no symptoms.
fn plain_symptom(answer: &AnswerValue) -> RuleOutcome {
    match answer.as_boolean() {
        Some(true) => scored(1.0, "affirmative"),
        Some(false) => scored(0.0, "denied"),
        None => RuleOutcome::Ignored,
    }
}

/// Extracts the first `systolic/diastolic` integer pair from a reading.
fn parse_blood_pressure(raw: &str) -> Option<(u32, u32)> {
    let bytes = raw.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        if !bytes[index].is_ascii_digit() {
            index += 1;
            continue;
        }

        let start = index;
        while index < bytes.len() && bytes[index].is_ascii_digit() {
            index += 1;
        }
        let systolic = raw[start..index].parse::<u32>().ok();

        if index < bytes.len() && bytes[index] == b'/' {
            index += 1;
            let diastolic_start = index;
            while index < bytes.len() && bytes[index].is_ascii_digit() {
                index += 1;
            }
            if index > diastolic_start {
                if let (Some(systolic), Ok(diastolic)) =
                    (systolic, raw[diastolic_start..index].parse::<u32>())
                {
                    return Some((systolic, diastolic));
                }
            }
        }
    }
    None
}
