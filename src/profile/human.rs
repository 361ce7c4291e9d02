//! Human personality inference from Likert survey answers.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::lunar::{chinese_zodiac, BoundaryAnswer, ChineseZodiac, WesternZodiac};
use crate::persona::{MbtiAxis, MbtiType};

/// Likert scale bounds
pub const LIKERT_MIN: u8 = 1;
pub const LIKERT_MAX: u8 = 5;
const LIKERT_NEUTRAL: f64 = 3.0;

/// Keeps confidence ratios finite when every answer is neutral
const CONFIDENCE_EPSILON: f64 = 1e-4;

/// An MBTI survey item: statement, axis it loads on, and the pole it favors.
#[derive(Debug, Clone, Copy)]
pub struct MbtiQuestion {
    pub text: &'static str,
    pub axis: MbtiAxis,
    pub pole: char,
}

pub const MBTI_QUESTIONS: [MbtiQuestion; 10] = [
    MbtiQuestion { text: "I feel energized by leading group discussions.", axis: MbtiAxis::EnergyEI, pole: 'E' },
    MbtiQuestion { text: "I prefer to reflect before sharing in meetings.", axis: MbtiAxis::EnergyEI, pole: 'I' },
    MbtiQuestion { text: "I focus on tangible facts more than abstract ideas.", axis: MbtiAxis::PerceptionSN, pole: 'S' },
    MbtiQuestion { text: "I enjoy exploring future possibilities.", axis: MbtiAxis::PerceptionSN, pole: 'N' },
    MbtiQuestion { text: "I prioritize objective logic over personal values.", axis: MbtiAxis::JudgmentTF, pole: 'T' },
    MbtiQuestion { text: "I consider the human impact first.", axis: MbtiAxis::JudgmentTF, pole: 'F' },
    MbtiQuestion { text: "I like plans and schedules.", axis: MbtiAxis::LifestyleJP, pole: 'J' },
    MbtiQuestion { text: "I stay open to last-minute changes.", axis: MbtiAxis::LifestyleJP, pole: 'P' },
    MbtiQuestion { text: "I decide quickly once I have enough information.", axis: MbtiAxis::LifestyleJP, pole: 'J' },
    MbtiQuestion { text: "I recharge best with solo time.", axis: MbtiAxis::EnergyEI, pole: 'I' },
];

/// Two statements per Enneagram type, types 1 through 9 in order.
pub const ENNEAGRAM_QUESTIONS: [(u8, &str); 18] = [
    (1, "I notice flaws and feel driven to correct them."),
    (1, "I set high standards for myself."),
    (2, "I feel valued when I help others succeed."),
    (2, "I naturally look for ways to support people."),
    (3, "Achievement motivates me more than comfort."),
    (3, "I like clear goals and measurable wins."),
    (4, "I often feel different from others."),
    (4, "I value depth and authenticity above polish."),
    (5, "I conserve my energy and observe before acting."),
    (5, "I feel secure when I understand systems deeply."),
    (6, "I look for risks and contingency plans."),
    (6, "Loyalty and responsibility matter a lot to me."),
    (7, "I seek new options when things feel constrained."),
    (7, "I dislike feeling stuck in routine."),
    (8, "I protect my autonomy and push back on control."),
    (8, "I respect strength and directness."),
    (9, "I prefer harmony over confrontation."),
    (9, "I adapt to keep the peace in a group."),
];

/// A ranked inference result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ranked<T> {
    pub value: T,
    pub confidence: f64,
}

/// Two decimals, halves to even.
fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

fn validate_answers(kind: &str, answers: &[u8], expected: usize) -> Result<()> {
    if answers.len() != expected {
        return Err(Error::invalid_profile(
            kind,
            format!("expected {} answers, got {}", expected, answers.len()),
        ));
    }
    for (i, answer) in answers.iter().enumerate() {
        if !(LIKERT_MIN..=LIKERT_MAX).contains(answer) {
            return Err(Error::InvalidAnswer {
                question: format!("{} question {}", kind, i + 1),
                value: i64::from(*answer),
                min: i64::from(LIKERT_MIN),
                max: i64::from(LIKERT_MAX),
            });
        }
    }
    Ok(())
}

/// Top-2 MBTI types with confidences, plus the raw signed axis scores.
///
/// Each answer contributes `answer - 3`, added for E/S/T/J items and
/// subtracted otherwise. A zero axis resolves to E/S/T/J. The runner-up
/// flips the weakest axis (first in EI, SN, TF, JP order on ties).
pub fn infer_mbti(answers: &[u8]) -> Result<(Vec<Ranked<MbtiType>>, BTreeMap<MbtiAxis, f64>)> {
    validate_answers("mbti", answers, MBTI_QUESTIONS.len())?;

    let mut scores = [0.0f64; 4];
    for (question, answer) in MBTI_QUESTIONS.iter().zip(answers) {
        let delta = f64::from(*answer) - LIKERT_NEUTRAL;
        let (positive, _) = question.axis.poles();
        if question.pole == positive {
            scores[question.axis.index()] += delta;
        } else {
            scores[question.axis.index()] -= delta;
        }
    }

    let letters = MbtiAxis::ALL.map(|axis| {
        let (positive, negative) = axis.poles();
        if scores[axis.index()] >= 0.0 {
            positive
        } else {
            negative
        }
    });
    let primary = MbtiType::from_letters(letters)?;

    let margins = scores.map(f64::abs);
    let mut weakest = MbtiAxis::EnergyEI;
    for axis in MbtiAxis::ALL {
        if margins[axis.index()] < margins[weakest.index()] {
            weakest = axis;
        }
    }
    let secondary = primary.flipped(weakest);

    let total: f64 = margins.iter().sum();
    let strength = total + CONFIDENCE_EPSILON;
    let weakest_margin = margins[weakest.index()];

    let ranked = vec![
        Ranked { value: primary, confidence: round2((total - weakest_margin) / strength) },
        Ranked { value: secondary, confidence: round2(weakest_margin / strength) },
    ];
    let raw = MbtiAxis::ALL
        .iter()
        .map(|axis| (*axis, scores[axis.index()]))
        .collect();
    Ok((ranked, raw))
}

/// Top-3 Enneagram types with confidences, plus the raw per-type sums.
pub fn infer_enneagram(answers: &[u8]) -> Result<(Vec<Ranked<u8>>, BTreeMap<u8, f64>)> {
    validate_answers("enneagram", answers, ENNEAGRAM_QUESTIONS.len())?;

    let mut raw: BTreeMap<u8, f64> = (1..=9).map(|t| (t, 0.0)).collect();
    for ((core, _), answer) in ENNEAGRAM_QUESTIONS.iter().zip(answers) {
        *raw.entry(*core).or_insert(0.0) += f64::from(*answer);
    }

    let mut sorted: Vec<(u8, f64)> = raw.iter().map(|(t, s)| (*t, *s)).collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
    sorted.truncate(3);

    let top_total: f64 = sorted.iter().map(|(_, s)| s).sum::<f64>() + CONFIDENCE_EPSILON;
    let ranked = sorted
        .into_iter()
        .map(|(core, score)| Ranked { value: core, confidence: round2(score / top_total) })
        .collect();
    Ok((ranked, raw))
}

// ─────────────────────────────────────────────────────────────────
// Human Profile
// ─────────────────────────────────────────────────────────────────

/// The acting human's inferred personality and zodiac, built once per session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumanProfile {
    pub top_mbti: Vec<Ranked<MbtiType>>,
    pub top_enneagram: Vec<Ranked<u8>>,
    pub western_zodiac: WesternZodiac,
    pub chinese_zodiac: ChineseZodiac,
    pub raw_mbti_scores: BTreeMap<MbtiAxis, f64>,
    pub raw_enneagram_scores: BTreeMap<u8, f64>,
}

impl HumanProfile {
    /// Run both inferences and classify the birth date.
    pub fn from_answers(
        mbti_answers: &[u8],
        enneagram_answers: &[u8],
        birth_date: NaiveDate,
        boundary: Option<BoundaryAnswer>,
    ) -> Result<Self> {
        let (top_mbti, raw_mbti_scores) = infer_mbti(mbti_answers)?;
        let (top_enneagram, raw_enneagram_scores) = infer_enneagram(enneagram_answers)?;
        Ok(Self {
            top_mbti,
            top_enneagram,
            western_zodiac: WesternZodiac::for_date(birth_date),
            chinese_zodiac: chinese_zodiac(birth_date, boundary)?,
            raw_mbti_scores,
            raw_enneagram_scores,
        })
    }

    /// Profile with known types and no survey data.
    pub fn with_types(mbti: MbtiType, enneagram: u8, western_zodiac: WesternZodiac, chinese_zodiac: ChineseZodiac) -> Self {
        Self {
            top_mbti: vec![Ranked { value: mbti, confidence: 1.0 }],
            top_enneagram: vec![Ranked { value: enneagram, confidence: 1.0 }],
            western_zodiac,
            chinese_zodiac,
            raw_mbti_scores: BTreeMap::new(),
            raw_enneagram_scores: BTreeMap::new(),
        }
    }

    /// Highest-ranked MBTI type. Every constructor fills at least one entry.
    pub fn primary_mbti(&self) -> Option<MbtiType> {
        self.top_mbti.first().map(|r| r.value)
    }

    pub fn primary_enneagram(&self) -> Option<u8> {
        self.top_enneagram.first().map(|r| r.value)
    }

    /// "6 (36%), 1 (32%), 3 (32%)"
    pub fn enneagram_summary(&self) -> String {
        self.top_enneagram
            .iter()
            .map(|r| format!("{} ({}%)", r.value, (r.confidence * 100.0) as i64))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn mbti_summary(&self) -> String {
        self.top_mbti
            .iter()
            .map(|r| format!("{} ({}%)", r.value, (r.confidence * 100.0) as i64))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
