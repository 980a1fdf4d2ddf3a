//! Decision-forest classifier loaded from a JSON artifact.
//!
//! The artifact is produced offline by whatever training pipeline owns the
//! model. This module only evaluates it:
//!
//! ```json
//! {
//!   "model_name": "premium-forest-v1",
//!   "classes": ["Low", "Medium", "High"],
//!   "trees": [
//!     { "threshold": { "feature": "bmi", "value": 30.0,
//!                      "below": { "leaf": { "label": "Low" } },
//!                      "above": { "leaf": { "label": "High" } } } }
//!   ]
//! }
//! ```
//!
//! Numeric splits send values `<= value` to `below`. Categorical splits send
//! a feature whose value is listed in `any_of` to `then`. Every tree casts one
//! vote; the class with most votes wins, and ties go to the class listed first
//! in `classes`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use carebook_contracts::{
    error::{CarebookError, CarebookResult},
    premium::FeatureVector,
};
use carebook_core::traits::Classifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericFeature {
    Bmi,
    IncomeLpa,
    CityTier,
}

impl NumericFeature {
    fn value(&self, features: &FeatureVector) -> f64 {
        match self {
            Self::Bmi => features.bmi,
            Self::IncomeLpa => features.income_lpa,
            Self::CityTier => f64::from(u8::from(features.city_tier)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalFeature {
    AgeGroup,
    LifestyleRisk,
    Occupation,
}

impl CategoricalFeature {
    fn value(&self, features: &FeatureVector) -> &'static str {
        match self {
            Self::AgeGroup => features.age_group.as_str(),
            Self::LifestyleRisk => features.lifestyle_risk.as_str(),
            Self::Occupation => features.occupation.as_str(),
        }
    }

    fn known_values(&self) -> &'static [&'static str] {
        match self {
            Self::AgeGroup => &["child", "young", "middle_aged", "senior"],
            Self::LifestyleRisk => &["low", "medium", "high"],
            Self::Occupation => &[
                "retired",
                "freelancer",
                "student",
                "government_job",
                "business_owner",
                "unemployed",
                "private_job",
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Leaf {
        label: String,
    },
    Threshold {
        feature: NumericFeature,
        value: f64,
        below: Box<TreeNode>,
        above: Box<TreeNode>,
    },
    Category {
        feature: CategoricalFeature,
        any_of: Vec<String>,
        then: Box<TreeNode>,
        otherwise: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Walk from this node to a leaf and return its label.
    fn evaluate(&self, features: &FeatureVector) -> &str {
        let mut node = self;
        loop {
            node = match node {
                TreeNode::Leaf { label } => return label,
                TreeNode::Threshold {
                    feature,
                    value,
                    below,
                    above,
                } => {
                    if feature.value(features) <= *value {
                        below.as_ref()
                    } else {
                        above.as_ref()
                    }
                }
                TreeNode::Category {
                    feature,
                    any_of,
                    then,
                    otherwise,
                } => {
                    let actual = feature.value(features);
                    if any_of.iter().any(|v| v == actual) {
                        then.as_ref()
                    } else {
                        otherwise.as_ref()
                    }
                }
            };
        }
    }

    /// Check every node under this one against the declared classes.
    fn check(&self, classes: &[String], problems: &mut Vec<String>) {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                TreeNode::Leaf { label } => {
                    if !classes.contains(label) {
                        problems.push(format!("leaf label '{label}' is not a declared class"));
                    }
                }
                TreeNode::Threshold {
                    value, below, above, ..
                } => {
                    if !value.is_finite() {
                        problems.push(format!("threshold {value} is not finite"));
                    }
                    pending.push(below);
                    pending.push(above);
                }
                TreeNode::Category {
                    feature,
                    any_of,
                    then,
                    otherwise,
                } => {
                    for v in any_of {
                        if !feature.known_values().contains(&v.as_str()) {
                            problems.push(format!("'{v}' is not a value of {feature:?}"));
                        }
                    }
                    pending.push(then);
                    pending.push(otherwise);
                }
            }
        }
    }
}

/// The serialized model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestArtifact {
    pub model_name: String,
    /// Every label the model can emit, in tie-breaking priority order.
    pub classes: Vec<String>,
    pub trees: Vec<TreeNode>,
}

/// A `Classifier` backed by a decision-forest artifact.
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    artifact: ForestArtifact,
    digest: String,
}

impl ForestClassifier {
    /// Parse and check an artifact held in memory.
    ///
    /// Returns `CarebookError::Model` if the JSON is malformed, the forest is
    /// empty, or a node references an undeclared class or category value.
    pub fn from_json_str(s: &str) -> CarebookResult<Self> {
        let artifact: ForestArtifact =
            serde_json::from_str(s).map_err(|e| CarebookError::Model {
                reason: format!("failed to parse model artifact: {e}"),
            })?;

        let mut problems = Vec::new();
        if artifact.classes.is_empty() {
            problems.push("no classes declared".to_string());
        }
        if artifact.trees.is_empty() {
            problems.push("forest has no trees".to_string());
        }
        for tree in &artifact.trees {
            tree.check(&artifact.classes, &mut problems);
        }
        if !problems.is_empty() {
            return Err(CarebookError::Model {
                reason: format!(
                    "model artifact '{}' is invalid: {}",
                    artifact.model_name,
                    problems.join("; ")
                ),
            });
        }

        let digest = hex::encode(Sha256::digest(s.as_bytes()));
        Ok(Self { artifact, digest })
    }

    /// Read the artifact at `path`. Intended to run once at process start.
    pub fn from_file(path: &Path) -> CarebookResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CarebookError::Model {
            reason: format!("failed to read model artifact '{}': {}", path.display(), e),
        })?;
        let classifier = Self::from_json_str(&contents)?;

        info!(
            path = %path.display(),
            model = %classifier.artifact.model_name,
            trees = classifier.artifact.trees.len(),
            classes = ?classifier.classes(),
            features = ?FeatureVector::FIELDS,
            sha256 = %classifier.digest,
            "premium model loaded"
        );
        Ok(classifier)
    }

    /// Lowercase hex SHA-256 of the artifact text.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn classes(&self) -> &[String] {
        &self.artifact.classes
    }
}

impl Classifier for ForestClassifier {
    fn predict(&self, features: &FeatureVector) -> CarebookResult<String> {
        let classes = &self.artifact.classes;
        let mut votes = vec![0usize; classes.len()];

        for tree in &self.artifact.trees {
            let label = tree.evaluate(features);
            let index = classes
                .iter()
                .position(|c| c == label)
                .ok_or_else(|| CarebookError::Model {
                    reason: format!("tree produced undeclared label '{label}'"),
                })?;
            votes[index] += 1;
        }

        // First class with the maximum vote count wins ties.
        let mut best = 0;
        for (index, count) in votes.iter().enumerate() {
            if *count > votes[best] {
                best = index;
            }
        }
        Ok(classes[best].clone())
    }

    fn model_name(&self) -> &str {
        &self.artifact.model_name
    }
}
