use serde::{Deserialize, Serialize};
use crate::models::{TeachingStyle, TutorCandidate, WeightConfig};

/// Highest possible average star rating
pub const MAX_RATING: f64 = 5.0;

/// Per-factor values (each in [0, 1]) for one tutor against one student
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub rating: f64,
    pub availability: f64,
    pub price: f64,
    pub language: f64,
    pub learning_style: f64,
}

impl FactorBreakdown {
    /// Weighted sum of the factors
    pub fn weighted(&self, weights: &WeightConfig) -> f64 {
        weights.rating * self.rating
            + weights.availability * self.availability
            + weights.price * self.price
            + weights.language * self.language
            + weights.learning_style * self.learning_style
    }

    /// Feature vector in weight order (rating, availability, price, language, style)
    pub fn as_array(&self) -> [f64; 5] {
        [self.rating, self.availability, self.price, self.language, self.learning_style]
    }
}

/// Compute the five scoring factors for a tutor
///
/// A missing rating counts as 0 here and nowhere else.
pub fn calculate_factors(
    tutor: &TutorCandidate,
    available: bool,
    budget: f64,
    language: &str,
    learning_style: TeachingStyle,
) -> FactorBreakdown {
    FactorBreakdown {
        rating: tutor.average_rating.unwrap_or(0.0) / MAX_RATING,
        availability: if available { 1.0 } else { 0.0 },
        price: price_factor(tutor.price, budget),
        // Exact, case-sensitive comparison
        language: if tutor.preferred_language == language { 1.0 } else { 0.0 },
        learning_style: if tutor.teaching_style == learning_style { 1.0 } else { 0.0 },
    }
}

/// Calculate the raw compatibility score for a tutor
///
/// Scoring formula:
/// score = (
///     rating / 5        * w.rating +          # Missing rating = 0
///     available         * w.availability +    # Open slot on the date
///     price_factor      * w.price +           # Affordability curve
///     language match    * w.language +
///     style match       * w.learning_style
/// )
///
/// The result is not normalized; see [`match_percentage`].
pub fn calculate_match_score(
    tutor: &TutorCandidate,
    available: bool,
    budget: f64,
    language: &str,
    learning_style: TeachingStyle,
    weights: &WeightConfig,
) -> f64 {
    calculate_factors(tutor, available, budget, language, learning_style).weighted(weights)
}

/// Affordability factor (0-1)
///
/// 1.0 within budget, decaying linearly to 0 at twice the budget. A zero
/// budget only accepts free tutors.
#[inline]
pub fn price_factor(tutor_price: f64, budget: f64) -> f64 {
    if budget == 0.0 {
        return if tutor_price == 0.0 { 1.0 } else { 0.0 };
    }

    if tutor_price <= budget {
        return 1.0;
    }

    let excess = tutor_price - budget;
    (1.0 - excess / budget).max(0.0)
}

/// Express a raw score as a 0-100 percentage of the total weight
///
/// Returns 0 when the weights sum to 0.
#[inline]
pub fn match_percentage(score: f64, weights: &WeightConfig) -> u8 {
    let total = weights.sum();
    if total <= 0.0 {
        return 0;
    }

    ((score / total) * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_tutor(rating: Option<f64>, price: f64, language: &str, style: TeachingStyle) -> TutorCandidate {
        TutorCandidate {
            tutor_id: 1,
            name: "Test Tutor".to_string(),
            profile_pic_url: None,
            average_rating: rating,
            price,
            preferred_language: language.to_string(),
            teaching_style: style,
        }
    }

    fn equal_weights() -> WeightConfig {
        WeightConfig {
            rating: 1.0,
            availability: 1.0,
            price: 1.0,
            language: 1.0,
            learning_style: 1.0,
        }
    }

    #[test]
    fn test_price_factor_within_budget() {
        assert_eq!(price_factor(40.0, 50.0), 1.0);
        assert_eq!(price_factor(50.0, 50.0), 1.0);
        assert_eq!(price_factor(0.0, 50.0), 1.0);
    }

    #[test]
    fn test_price_factor_linear_falloff() {
        assert!((price_factor(60.0, 50.0) - 0.8).abs() < 1e-9);
        assert!((price_factor(75.0, 50.0) - 0.5).abs() < 1e-9);
        assert_eq!(price_factor(100.0, 50.0), 0.0);
        assert_eq!(price_factor(250.0, 50.0), 0.0);
    }

    #[test]
    fn test_price_factor_zero_budget() {
        assert_eq!(price_factor(0.0, 0.0), 1.0);
        assert_eq!(price_factor(0.01, 0.0), 0.0);
        assert_eq!(price_factor(30.0, 0.0), 0.0);
    }

    #[test]
    fn test_missing_rating_scores_as_zero() {
        let tutor = create_test_tutor(None, 10.0, "English", TeachingStyle::Visual);
        let factors = calculate_factors(&tutor, true, 50.0, "English", TeachingStyle::Visual);
        assert_eq!(factors.rating, 0.0);

        let rated = create_test_tutor(Some(4.5), 10.0, "English", TeachingStyle::Visual);
        let factors = calculate_factors(&rated, true, 50.0, "English", TeachingStyle::Visual);
        assert!((factors.rating - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_language_match_is_case_sensitive() {
        let tutor = create_test_tutor(Some(5.0), 10.0, "English", TeachingStyle::Visual);
        let exact = calculate_factors(&tutor, true, 50.0, "English", TeachingStyle::Visual);
        let lower = calculate_factors(&tutor, true, 50.0, "english", TeachingStyle::Visual);
        assert_eq!(exact.language, 1.0);
        assert_eq!(lower.language, 0.0);
    }

    #[test]
    fn test_calculate_match_score_weighted_sum() {
        let tutor = create_test_tutor(Some(4.0), 60.0, "English", TeachingStyle::Auditory);
        let weights = WeightConfig {
            rating: 0.4,
            availability: 0.3,
            price: 0.2,
            language: 0.1,
            learning_style: 0.5,
        };

        let score = calculate_match_score(&tutor, false, 50.0, "English", TeachingStyle::Visual, &weights);

        // 0.4*0.8 + 0.3*0 + 0.2*0.8 + 0.1*1 + 0.5*0
        assert!((score - 0.58).abs() < 1e-9);
    }

    #[test]
    fn test_perfect_tutor_scores_weight_sum() {
        let tutor = create_test_tutor(Some(5.0), 20.0, "English", TeachingStyle::Visual);
        let weights = WeightConfig::default();
        let score = calculate_match_score(&tutor, true, 50.0, "English", TeachingStyle::Visual, &weights);

        assert!((score - weights.sum()).abs() < 1e-9);
        assert_eq!(match_percentage(score, &weights), 100);
    }

    #[test]
    fn test_score_monotonic_in_each_factor() {
        let weights = equal_weights();
        let low = create_test_tutor(Some(2.0), 90.0, "French", TeachingStyle::Auditory);
        let base = calculate_match_score(&low, false, 50.0, "English", TeachingStyle::Visual, &weights);

        let better_rating = create_test_tutor(Some(3.0), 90.0, "French", TeachingStyle::Auditory);
        let cheaper = create_test_tutor(Some(2.0), 70.0, "French", TeachingStyle::Auditory);
        let same_language = create_test_tutor(Some(2.0), 90.0, "English", TeachingStyle::Auditory);
        let same_style = create_test_tutor(Some(2.0), 90.0, "French", TeachingStyle::Visual);

        for (tutor, available) in [
            (&better_rating, false),
            (&cheaper, false),
            (&same_language, false),
            (&same_style, false),
            (&low, true),
        ] {
            let score = calculate_match_score(tutor, available, 50.0, "English", TeachingStyle::Visual, &weights);
            assert!(score >= base);
        }
    }

    #[test]
    fn test_match_percentage() {
        let weights = WeightConfig::default();
        assert_eq!(match_percentage(0.5, &weights), 50);
        assert_eq!(match_percentage(0.0, &weights), 0);

        let zero = WeightConfig {
            rating: 0.0,
            availability: 0.0,
            price: 0.0,
            language: 0.0,
            learning_style: 0.0,
        };
        assert_eq!(match_percentage(0.7, &zero), 0);
    }

    #[test]
    fn test_match_percentage_uses_unnormalized_weights() {
        let weights = equal_weights();
        // 3 of 5 factors fully satisfied
        assert_eq!(match_percentage(3.0, &weights), 60);
        assert_eq!(match_percentage(2.345, &weights), 47);
    }
}
