//! The prediction adapter.
//!
//! Turns a validated `PredictionInput` into the fixed-order `FeatureVector`
//! and forwards it to whichever `Classifier` was loaded at startup. The
//! adapter owns feature derivation only; it never interprets the label.

use std::sync::Arc;

use tracing::debug;

use carebook_contracts::{
    error::CarebookResult,
    premium::{FeatureVector, Prediction, PredictionInput},
};
use carebook_core::{derive, traits::Classifier};

/// Derive every model feature from raw input.
pub fn features(input: &PredictionInput) -> FeatureVector {
    let bmi = derive::bmi(input.weight, input.height);
    FeatureVector {
        bmi,
        age_group: derive::age_group(input.age),
        lifestyle_risk: derive::lifestyle_risk(input.smoker, bmi),
        city_tier: derive::city_tier(&input.city),
        income_lpa: input.income_lpa,
        occupation: input.occupation,
    }
}

#[derive(Clone)]
pub struct PremiumAdapter {
    classifier: Arc<dyn Classifier>,
}

impl PremiumAdapter {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    pub fn predict(&self, input: &PredictionInput) -> CarebookResult<Prediction> {
        let features = features(input);
        let label = self.classifier.predict(&features)?;

        debug!(
            model = self.classifier.model_name(),
            bmi = features.bmi,
            age_group = features.age_group.as_str(),
            lifestyle_risk = features.lifestyle_risk.as_str(),
            city_tier = u8::from(features.city_tier),
            predicted = %label,
            "premium category predicted"
        );

        Ok(Prediction {
            predicted_category: label,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use carebook_contracts::{
        error::CarebookResult,
        premium::{AgeGroup, CityTier, FeatureVector, LifestyleRisk, Occupation, PredictionInput},
    };
    use carebook_core::traits::Classifier;

    use super::{features, PremiumAdapter};

    /// Records the vectors it sees and answers with a fixed label.
    struct RecordingClassifier {
        seen: Arc<Mutex<Vec<FeatureVector>>>,
    }

    impl Classifier for RecordingClassifier {
        fn predict(&self, features: &FeatureVector) -> CarebookResult<String> {
            self.seen.lock().unwrap().push(features.clone());
            Ok("High".to_string())
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    fn input(smoker: bool, weight: f64, city: &str) -> PredictionInput {
        PredictionInput {
            age: 52,
            weight,
            height: 1.7,
            income_lpa: 18.0,
            smoker,
            city: city.to_string(),
            occupation: Occupation::BusinessOwner,
        }
    }

    #[test]
    fn smoker_with_high_bmi_in_mumbai() {
        let f = features(&input(true, 95.0, "Mumbai"));
        assert_eq!(f.bmi, 32.87);
        assert_eq!(f.lifestyle_risk, LifestyleRisk::High);
        assert_eq!(f.city_tier, CityTier::One);
        assert_eq!(f.age_group, AgeGroup::Senior);
        assert_eq!(f.income_lpa, 18.0);
        assert_eq!(f.occupation, Occupation::BusinessOwner);
    }

    #[test]
    fn non_smoker_normal_weight_in_unlisted_city() {
        let f = features(&input(false, 65.0, "Shimla"));
        assert_eq!(f.lifestyle_risk, LifestyleRisk::Low);
        assert_eq!(f.city_tier, CityTier::Three);
    }

    #[test]
    fn adapter_forwards_features_and_returns_label_verbatim() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let adapter = PremiumAdapter::new(Arc::new(RecordingClassifier { seen: seen.clone() }));

        let prediction = adapter.predict(&input(true, 95.0, "Jaipur")).unwrap();

        assert_eq!(prediction.predicted_category, "High");
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].city_tier, CityTier::Two);
    }
}
