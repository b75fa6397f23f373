//! Crop doctor: vision-report parsing and the offline symptom checker

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::i18n::Localized;

/// Structured diagnosis extracted from the vision model's reply
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResult {
    pub crop_detected: String,
    pub disease: String,
    pub severity: String,
    pub treatment: Vec<String>,
    pub prevention: Vec<String>,
    /// 0-100
    #[serde(default)]
    pub confidence: f32,
}

impl DiagnosticResult {
    /// High/severe findings get rendered with emphasis
    pub fn is_severe(&self) -> bool {
        let severity = self.severity.to_lowercase();
        severity.contains("high") || severity.contains("severe")
    }
}

/// Parse the model's reply into a [`DiagnosticResult`].
///
/// The model wraps JSON in markdown code fences more often than not; strip
/// them before parsing. Anything unparsable becomes [`Error::Diagnosis`] and
/// the caller shows a generic "try a clearer photo" message.
pub fn parse_diagnostic(raw: &str) -> Result<DiagnosticResult> {
    let clean = raw.replace("```json", "").replace("```", "");
    let clean = clean.trim();
    serde_json::from_str(clean).map_err(|e| Error::Diagnosis(e.to_string()))
}

/// One recognizable symptom with preliminary advice
#[derive(Debug)]
pub struct Symptom {
    pub id: &'static str,
    pub description: Localized,
    pub possible_issue: Localized,
    pub preliminary_action: Localized,
}

/// Offline symptom table for one crop
#[derive(Debug)]
pub struct SymptomMatcher {
    pub crop: &'static str,
    pub symptoms: &'static [Symptom],
}

impl SymptomMatcher {
    pub fn find_symptom(&self, id: &str) -> Option<&Symptom> {
        self.symptoms.iter().find(|s| s.id == id)
    }
}

pub const SYMPTOM_DATA: &[SymptomMatcher] = &[
    SymptomMatcher {
        crop: "Wheat",
        symptoms: &[
            Symptom {
                id: "w1",
                description: Localized {
                    en: "Yellow leaves",
                    ur: "پتے پیلے ہو رہے ہیں",
                    pa: "پتر پیلے ہو رہے نیں",
                },
                possible_issue: Localized {
                    en: "Nitrogen Deficiency",
                    ur: "نائٹروجن کی کمی",
                    pa: "یوریا دی کمی",
                },
                preliminary_action: Localized {
                    en: "Apply Urea irrigation.",
                    ur: "یوریا کھاد پانی کے ساتھ دیں۔",
                    pa: "پانی لا کے یوریا سٹ دو۔",
                },
            },
            Symptom {
                id: "w2",
                description: Localized {
                    en: "Orange dust on leaves",
                    ur: "پتوں پر نارنجی پاؤڈر",
                    pa: "پتیاں تے زنگ",
                },
                possible_issue: Localized {
                    en: "Rust Disease",
                    ur: "رسٹ (زنگ) کی بیماری",
                    pa: "رسٹ دی بیماری",
                },
                preliminary_action: Localized {
                    en: "Spray Propiconazole immediately.",
                    ur: "فوری طور پر پروپیکونازول کا سپرے کریں۔",
                    pa: "پروپیکونازول دا سپرے کرو۔",
                },
            },
        ],
    },
    SymptomMatcher {
        crop: "Rice",
        symptoms: &[Symptom {
            id: "r1",
            description: Localized {
                en: "Brown spots",
                ur: "بھورے دھبے",
                pa: "بھورے داغ",
            },
            possible_issue: Localized {
                en: "Brown Spot Disease",
                ur: "براؤن سپاٹ بیماری",
                pa: "براؤن سپاٹ",
            },
            preliminary_action: Localized {
                en: "Balanced fertilizer usage.",
                ur: "متوازن کھاد کا استعمال کریں۔",
                pa: "کھاد دا صحیح استعمال کرو۔",
            },
        }],
    },
];

/// Symptom table for a crop, matched case-insensitively
pub fn find_crop(crop: &str) -> Option<&'static SymptomMatcher> {
    SYMPTOM_DATA
        .iter()
        .find(|m| m.crop.eq_ignore_ascii_case(crop.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;

    const REPORT: &str = r#"{
        "cropDetected": "Wheat",
        "disease": "Leaf Rust",
        "severity": "High",
        "treatment": ["Spray Propiconazole", "Repeat after 15 days"],
        "prevention": ["Use resistant varieties"],
        "confidence": 87
    }"#;

    #[test]
    fn test_parse_plain_json() {
        let result = parse_diagnostic(REPORT).unwrap();
        assert_eq!(result.crop_detected, "Wheat");
        assert_eq!(result.disease, "Leaf Rust");
        assert_eq!(result.treatment.len(), 2);
        assert_eq!(result.confidence, 87.0);
    }

    #[test]
    fn test_parse_strips_code_fences() {
        let fenced = format!("```json\n{}\n```", REPORT);
        let result = parse_diagnostic(&fenced).unwrap();
        assert_eq!(result.disease, "Leaf Rust");
    }

    #[test]
    fn test_parse_missing_confidence_defaults() {
        let raw = r#"{
            "cropDetected": "Rice",
            "disease": "Healthy",
            "severity": "None",
            "treatment": [],
            "prevention": []
        }"#;
        let result = parse_diagnostic(raw).unwrap();
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_parse_garbage_is_diagnosis_error() {
        let err = parse_diagnostic("I am not JSON at all").unwrap_err();
        assert!(matches!(err, Error::Diagnosis(_)));
    }

    #[test]
    fn test_is_severe() {
        let mut result = parse_diagnostic(REPORT).unwrap();
        assert!(result.is_severe());

        result.severity = "Severe infestation".to_string();
        assert!(result.is_severe());

        result.severity = "Low".to_string();
        assert!(!result.is_severe());
    }

    #[test]
    fn test_symptom_lookup() {
        let wheat = find_crop("wheat").unwrap();
        let symptom = wheat.find_symptom("w2").unwrap();
        assert_eq!(symptom.possible_issue.get(Language::English), "Rust Disease");
        assert!(wheat.find_symptom("w9").is_none());
        assert!(find_crop("Mango").is_none());
    }
}
