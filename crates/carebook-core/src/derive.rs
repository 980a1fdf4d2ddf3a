//! Derived-field calculations.
//!
//! Everything here is a pure function of its arguments. Thresholds use strict
//! `<` comparisons, so a value sitting exactly on a boundary lands in the
//! upper bucket (BMI 18.5 is `Normal`, not `Underweight`).

use carebook_contracts::{
    patient::{Patient, PatientId, PatientView, Verdict},
    premium::{AgeGroup, CityTier, LifestyleRisk},
};

pub const TIER_1_CITIES: [&str; 7] = [
    "Mumbai",
    "Delhi",
    "Bangalore",
    "Chennai",
    "Kolkata",
    "Hyderabad",
    "Pune",
];

pub const TIER_2_CITIES: [&str; 48] = [
    "Jaipur",
    "Chandigarh",
    "Indore",
    "Lucknow",
    "Patna",
    "Ranchi",
    "Visakhapatnam",
    "Coimbatore",
    "Bhopal",
    "Nagpur",
    "Vadodara",
    "Surat",
    "Rajkot",
    "Jodhpur",
    "Raipur",
    "Amritsar",
    "Varanasi",
    "Agra",
    "Dehradun",
    "Mysore",
    "Jabalpur",
    "Guwahati",
    "Thiruvananthapuram",
    "Ludhiana",
    "Nashik",
    "Allahabad",
    "Udaipur",
    "Aurangabad",
    "Hubli",
    "Belgaum",
    "Salem",
    "Vijayawada",
    "Tiruchirappalli",
    "Bhavnagar",
    "Gwalior",
    "Dhanbad",
    "Bareilly",
    "Aligarh",
    "Gaya",
    "Kozhikode",
    "Warangal",
    "Kolhapur",
    "Bilaspur",
    "Jalandhar",
    "Noida",
    "Guntur",
    "Asansol",
    "Siliguri",
];

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Body Mass Index, `weight / height²`, rounded to two decimals.
pub fn bmi(weight_kg: f64, height_m: f64) -> f64 {
    round2(weight_kg / height_m.powi(2))
}

pub fn verdict(bmi: f64) -> Verdict {
    if bmi < 18.5 {
        Verdict::Underweight
    } else if bmi < 25.0 {
        Verdict::Normal
    } else if bmi < 30.0 {
        Verdict::Overweight
    } else if bmi < 35.0 {
        Verdict::Obese
    } else {
        Verdict::ExtremelyObese
    }
}

/// Age bucket used as a model feature. 45 itself is still `MiddleAged`.
pub fn age_group(age: u32) -> AgeGroup {
    if age < 18 {
        AgeGroup::Child
    } else if age < 30 {
        AgeGroup::Young
    } else if age <= 45 {
        AgeGroup::MiddleAged
    } else {
        AgeGroup::Senior
    }
}

pub fn lifestyle_risk(smoker: bool, bmi: f64) -> LifestyleRisk {
    if smoker && bmi > 30.0 {
        LifestyleRisk::High
    } else if smoker || bmi > 27.0 {
        LifestyleRisk::Medium
    } else {
        LifestyleRisk::Low
    }
}

/// Classify a city by list membership. Matching ignores surrounding
/// whitespace and ASCII case; unlisted cities are tier 3.
pub fn city_tier(city: &str) -> CityTier {
    let city = city.trim();
    let listed = |list: &[&str]| list.iter().any(|c| c.eq_ignore_ascii_case(city));

    if listed(&TIER_1_CITIES) {
        CityTier::One
    } else if listed(&TIER_2_CITIES) {
        CityTier::Two
    } else {
        CityTier::Three
    }
}

/// Attach derived fields to a stored record.
pub fn view(id: Option<&PatientId>, patient: &Patient) -> PatientView {
    let bmi = bmi(patient.weight, patient.height);
    PatientView {
        id: id.cloned(),
        patient: patient.clone(),
        bmi,
        verdict: verdict(bmi),
    }
}
