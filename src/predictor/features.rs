use serde::{de, Deserialize, Deserializer, Serialize};

use crate::predictor::error::ValidationError;

/// Column order of the feature vector fed to the preprocessor.
pub const FEATURE_NAMES: [&str; 22] = [
    "Age", "BMI", "Exercise_Level", "Sleep_Hours", "Stress_Level", "Mental_Health_Priority",
    "Smoking_Status", "Telehealth_Preference", "Vegetarian", "PCOD", "PCOS", "Heart_Disease",
    "Diabetes", "High_BP", "Low_BP", "Hypertension", "Migraine", "Thyroid", "Endometriosis",
    "Osteoporosis", "Anemia", "Depression",
];

pub const NUM_FEATURES: usize = FEATURE_NAMES.len();

/// One patient record as posted to `/predict`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HealthInput {
    #[serde(rename = "Age")]
    pub age: f64,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    #[serde(rename = "Exercise_Level")]
    pub exercise_level: f64,
    #[serde(rename = "Sleep_Hours")]
    pub sleep_hours: f64,
    #[serde(rename = "Stress_Level")]
    pub stress_level: f64,
    #[serde(rename = "Mental_Health_Priority")]
    pub mental_health_priority: f64,
    #[serde(rename = "Smoking_Status", deserialize_with = "integral")]
    pub smoking_status: i64,
    #[serde(rename = "Telehealth_Preference", deserialize_with = "integral")]
    pub telehealth_preference: i64,
    #[serde(rename = "Vegetarian", deserialize_with = "integral")]
    pub vegetarian: i64,
    #[serde(rename = "PCOD", deserialize_with = "integral")]
    pub pcod: i64,
    #[serde(rename = "PCOS", deserialize_with = "integral")]
    pub pcos: i64,
    #[serde(rename = "Heart_Disease", deserialize_with = "integral")]
    pub heart_disease: i64,
    #[serde(rename = "Diabetes", deserialize_with = "integral")]
    pub diabetes: i64,
    #[serde(rename = "High_BP", deserialize_with = "integral")]
    pub high_bp: i64,
    #[serde(rename = "Low_BP", deserialize_with = "integral")]
    pub low_bp: i64,
    #[serde(rename = "Hypertension", deserialize_with = "integral")]
    pub hypertension: i64,
    #[serde(rename = "Migraine", deserialize_with = "integral")]
    pub migraine: i64,
    #[serde(rename = "Thyroid", deserialize_with = "integral")]
    pub thyroid: i64,
    #[serde(rename = "Endometriosis", deserialize_with = "integral")]
    pub endometriosis: i64,
    #[serde(rename = "Osteoporosis", deserialize_with = "integral")]
    pub osteoporosis: i64,
    #[serde(rename = "Anemia", deserialize_with = "integral")]
    pub anemia: i64,
    #[serde(rename = "Depression", deserialize_with = "integral")]
    pub depression: i64,
}

/// Accepts a JSON integer, or a float with no fractional part such as `1.0`.
fn integral<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    match Number::deserialize(deserializer) {
        Ok(Number::Int(value)) => Ok(value),
        Ok(Number::Float(value))
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        Ok(Number::Float(value)) => Err(de::Error::custom(format!(
            "invalid value: floating point `{value}`, expected an integer"
        ))),
        Err(_) => Err(de::Error::custom("invalid type: expected an integer")),
    }
}

fn check_range(
    value: f64,
    min: f64,
    max: f64,
    message: impl FnOnce() -> String,
) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError(message()))
    }
}

fn check_score(feature: &str, value: f64) -> Result<(), ValidationError> {
    check_range(value, 0.0, 10.0, || format!("{feature} must be between 0 and 10"))
}

impl HealthInput {
    /// Range checks in column order; the first failing field is reported.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range(self.age, 18.0, 100.0, || "Age must be between 18 and 100".to_string())?;
        check_range(self.bmi, 10.0, 50.0, || "BMI must be between 10 and 50".to_string())?;
        check_score("Exercise_Level", self.exercise_level)?;
        check_range(self.sleep_hours, 0.0, 24.0, || {
            "Sleep Hours must be between 0 and 24".to_string()
        })?;
        check_score("Stress_Level", self.stress_level)?;
        check_score("Mental_Health_Priority", self.mental_health_priority)?;
        Ok(())
    }

    /// Values in `FEATURE_NAMES` order.
    pub fn to_features(&self) -> [f64; NUM_FEATURES] {
        [
            self.age,
            self.bmi,
            self.exercise_level,
            self.sleep_hours,
            self.stress_level,
            self.mental_health_priority,
            self.smoking_status as f64,
            self.telehealth_preference as f64,
            self.vegetarian as f64,
            self.pcod as f64,
            self.pcos as f64,
            self.heart_disease as f64,
            self.diabetes as f64,
            self.high_bp as f64,
            self.low_bp as f64,
            self.hypertension as f64,
            self.migraine as f64,
            self.thyroid as f64,
            self.endometriosis as f64,
            self.osteoporosis as f64,
            self.anemia as f64,
            self.depression as f64,
        ]
    }
}
