//! Facet Inference — expanding the Big Five into 30 facets.
//!
//! Each Big Five dimension is split into six facets (IPIP-NEO layout).
//! Facets are sampled around the parent score:
//!
//!   facet = clamp(base + N(0, σ_facet), 0, 100)
//!
//! σ is fixed per facet and deliberately non-uniform (4–9) so generated
//! profiles do not look flat: liberalism and modesty drift the most,
//! intellect and altruism the least.
//!
//! The random source is injectable ([`infer_facets_with_rng`]) so callers
//! can seed it; [`infer_facets_from_big_five`] uses the thread RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{BigFiveTraits, Dimension};

/// Default strength for [`adjust_facets_towards_big_five`].
pub const DEFAULT_ADJUST_STRENGTH: f32 = 0.5;

/// Deviation (in points) at which facet consistency reaches zero.
pub const MAX_CONSISTENCY_DEVIATION: f32 = 50.0;

macro_rules! facet_group {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$fmeta:meta])* $field:ident : $sigma:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $( $(#[$fmeta])* #[serde(default = "neutral_facet")] pub $field: f32, )+
        }

        impl $name {
            /// Per-facet standard deviation used during inference.
            pub const SIGMAS: [f32; 6] = [$($sigma),+];

            /// Facet values in declaration order.
            #[must_use]
            pub fn values(&self) -> [f32; 6] {
                [$(self.$field),+]
            }

            /// Build from values in declaration order.
            #[must_use]
            pub fn from_values(values: [f32; 6]) -> Self {
                let [$($field),+] = values;
                Self { $($field),+ }
            }

            /// Mean of the six facets.
            #[must_use]
            pub fn average(&self) -> f32 {
                calculate_facet_average(&self.values())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::from_values([neutral_facet(); 6])
            }
        }
    };
}

facet_group! {
    /// Openness facets.
    OpennessFacets {
        /// Imaginative, fantasy-prone.
        imagination: 6.0,
        /// Appreciation of art, music, literature.
        artistic_interests: 7.0,
        /// Depth of emotional experience.
        emotionality: 5.0,
        /// Appetite for new experiences.
        adventurousness: 7.0,
        /// Love of abstract ideas.
        intellect: 4.0,
        /// Openness to non-traditional values.
        liberalism: 9.0,
    }
}

facet_group! {
    /// Conscientiousness facets.
    ConscientiousnessFacets {
        /// Confidence in one's own ability.
        self_efficacy: 5.0,
        /// Desire for order.
        orderliness: 7.0,
        /// Sense of duty.
        dutifulness: 5.0,
        /// Drive to reach goals.
        achievement_striving: 6.0,
        /// Ability to stay on task.
        self_discipline: 5.0,
        /// Thinking before acting.
        cautiousness: 6.0,
    }
}

facet_group! {
    /// Extraversion facets.
    ExtraversionFacets {
        /// Warmth towards others.
        friendliness: 5.0,
        /// Preference for company.
        gregariousness: 7.0,
        /// Taking charge.
        assertiveness: 6.0,
        /// Pace and energy.
        activity_level: 6.0,
        /// Need for stimulation.
        excitement_seeking: 8.0,
        /// Positive emotions.
        cheerfulness: 5.0,
    }
}

facet_group! {
    /// Agreeableness facets.
    AgreeablenessFacets {
        /// Belief in others' good intentions.
        trust: 7.0,
        /// Honesty and candour.
        morality: 6.0,
        /// Concern for others' welfare.
        altruism: 4.0,
        /// Preference for cooperation over competition.
        cooperation: 6.0,
        /// Humility.
        modesty: 9.0,
        /// Compassion.
        sympathy: 5.0,
    }
}

facet_group! {
    /// Neuroticism facets.
    NeuroticismFacets {
        /// Worry and fear.
        anxiety: 5.0,
        /// Proneness to anger.
        anger: 7.0,
        /// Proneness to low mood.
        depression: 6.0,
        /// Social shyness.
        self_consciousness: 6.0,
        /// Difficulty resisting urges.
        immoderation: 8.0,
        /// Susceptibility to stress.
        vulnerability: 6.0,
    }
}

/// All 30 facets, grouped by dimension.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BigFiveFacets {
    /// Openness facets.
    pub openness: OpennessFacets,
    /// Conscientiousness facets.
    pub conscientiousness: ConscientiousnessFacets,
    /// Extraversion facets.
    pub extraversion: ExtraversionFacets,
    /// Agreeableness facets.
    pub agreeableness: AgreeablenessFacets,
    /// Neuroticism facets.
    pub neuroticism: NeuroticismFacets,
}

impl BigFiveFacets {
    /// The six facet values of one dimension.
    #[must_use]
    pub fn dimension_values(&self, dimension: Dimension) -> [f32; 6] {
        match dimension {
            Dimension::Openness => self.openness.values(),
            Dimension::Conscientiousness => self.conscientiousness.values(),
            Dimension::Extraversion => self.extraversion.values(),
            Dimension::Agreeableness => self.agreeableness.values(),
            Dimension::Neuroticism => self.neuroticism.values(),
        }
    }

    /// Mean of one dimension's facets.
    #[must_use]
    pub fn dimension_average(&self, dimension: Dimension) -> f32 {
        calculate_facet_average(&self.dimension_values(dimension))
    }

    /// Iterate every facet value (30 values).
    pub fn iter_values(&self) -> impl Iterator<Item = f32> + '_ {
        Dimension::ALL
            .into_iter()
            .flat_map(move |d| self.dimension_values(d))
    }

    fn sigmas(dimension: Dimension) -> [f32; 6] {
        match dimension {
            Dimension::Openness => OpennessFacets::SIGMAS,
            Dimension::Conscientiousness => ConscientiousnessFacets::SIGMAS,
            Dimension::Extraversion => ExtraversionFacets::SIGMAS,
            Dimension::Agreeableness => AgreeablenessFacets::SIGMAS,
            Dimension::Neuroticism => NeuroticismFacets::SIGMAS,
        }
    }

    fn from_dimension_values(mut value_of: impl FnMut(Dimension) -> [f32; 6]) -> Self {
        Self {
            openness: OpennessFacets::from_values(value_of(Dimension::Openness)),
            conscientiousness: ConscientiousnessFacets::from_values(value_of(
                Dimension::Conscientiousness,
            )),
            extraversion: ExtraversionFacets::from_values(value_of(Dimension::Extraversion)),
            agreeableness: AgreeablenessFacets::from_values(value_of(Dimension::Agreeableness)),
            neuroticism: NeuroticismFacets::from_values(value_of(Dimension::Neuroticism)),
        }
    }
}

fn neutral_facet() -> f32 {
    50.0
}

/// Infer 30 facets from the Big Five using the thread-local RNG.
///
/// Stochastic: two calls on the same input yield different facets.
#[must_use]
pub fn infer_facets_from_big_five(big_five: &BigFiveTraits) -> BigFiveFacets {
    infer_facets_with_rng(big_five, &mut rand::thread_rng())
}

/// Infer 30 facets from the Big Five with a caller-supplied RNG.
///
/// Every output is clamped to [0, 100] and rounded to a whole point.
pub fn infer_facets_with_rng<R: Rng + ?Sized>(
    big_five: &BigFiveTraits,
    rng: &mut R,
) -> BigFiveFacets {
    BigFiveFacets::from_dimension_values(|dimension| {
        let base = big_five.get(dimension);
        BigFiveFacets::sigmas(dimension)
            .map(|sigma| (base + gaussian(rng) * sigma).clamp(0.0, 100.0).round())
    })
}

/// Standard normal sample via the Box–Muller transform.
fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    // u1 in (0, 1] keeps ln() finite.
    let u1: f64 = 1.0 - rng.gen_range(0.0..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    z as f32
}

/// How well facets match their parent dimensions, in [0, 1].
///
/// Averages |base − facet mean| over the five dimensions; a deviation of 0
/// maps to 1.0 and [`MAX_CONSISTENCY_DEVIATION`] or more maps to 0.0.
#[must_use]
pub fn check_facet_consistency(big_five: &BigFiveTraits, facets: &BigFiveFacets) -> f32 {
    let total: f32 = Dimension::ALL
        .iter()
        .map(|&d| (big_five.get(d) - facets.dimension_average(d)).abs())
        .sum();
    let avg_deviation = total / Dimension::ALL.len() as f32;
    (1.0 - avg_deviation / MAX_CONSISTENCY_DEVIATION).max(0.0)
}

/// Nudge every facet towards closing the gap between its dimension's base
/// score and the facet mean. `strength` 1.0 closes the gap entirely (up to
/// clamping), 0.0 leaves facets unchanged.
#[must_use]
pub fn adjust_facets_towards_big_five(
    big_five: &BigFiveTraits,
    facets: &BigFiveFacets,
    strength: f32,
) -> BigFiveFacets {
    BigFiveFacets::from_dimension_values(|dimension| {
        let shift = (big_five.get(dimension) - facets.dimension_average(dimension)) * strength;
        facets
            .dimension_values(dimension)
            .map(|v| (v + shift).clamp(0.0, 100.0))
    })
}

/// Simple mean of facet values. Returns 0.0 for an empty slice.
#[must_use]
pub fn calculate_facet_average(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;

    fn sample_traits() -> BigFiveTraits {
        BigFiveTraits::new(85.0, 70.0, 60.0, 75.0, 40.0)
    }

    #[test]
    fn infers_thirty_facets_in_range() {
        let facets = infer_facets_from_big_five(&sample_traits());
        let values: Vec<f32> = facets.iter_values().collect();
        assert_eq!(values.len(), 30);
        assert!(values.iter().all(|v| (0.0..=100.0).contains(v)));
    }

    #[test]
    fn extremes_are_clamped() {
        let extremes = BigFiveTraits::new(100.0, 0.0, 100.0, 0.0, 100.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let facets = infer_facets_with_rng(&extremes, &mut rng);
            assert!(facets.iter_values().all(|v| (0.0..=100.0).contains(&v)));
        }
    }

    #[test]
    fn zero_noise_reproduces_base_scores() {
        // StepRng(0, 0) yields u1 = 1, so every Box–Muller sample is exactly 0.
        let traits = sample_traits();
        let facets = infer_facets_with_rng(&traits, &mut StepRng::new(0, 0));

        assert_eq!(facets.openness.values(), [85.0; 6]);
        assert_eq!(facets.neuroticism.values(), [40.0; 6]);
        assert!((check_facet_consistency(&traits, &facets) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn seeded_inference_is_reproducible() {
        let traits = sample_traits();
        let a = infer_facets_with_rng(&traits, &mut StdRng::seed_from_u64(42));
        let b = infer_facets_with_rng(&traits, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn facet_means_stay_near_parent() {
        let traits = sample_traits();
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..100 {
            let facets = infer_facets_with_rng(&traits, &mut rng);
            for d in Dimension::ALL {
                let diff = (facets.dimension_average(d) - traits.get(d)).abs();
                assert!(diff < 15.0, "{d} drifted by {diff}");
            }
        }
    }

    #[test]
    fn consistency_decreases_with_deviation() {
        let traits = BigFiveTraits::default();
        let exact = BigFiveFacets::default();
        assert!((check_facet_consistency(&traits, &exact) - 1.0).abs() < f32::EPSILON);

        let mut last = 1.0;
        for offset in [5.0_f32, 15.0, 30.0, 45.0] {
            let facets = BigFiveFacets::from_dimension_values(|_| [50.0 + offset; 6]);
            let score = check_facet_consistency(&traits, &facets);
            assert!(score < last, "offset {offset}: {score} >= {last}");
            last = score;
        }
    }

    #[test]
    fn consistency_floors_at_zero() {
        let traits = BigFiveTraits::new(0.0, 0.0, 0.0, 0.0, 0.0);
        let facets = BigFiveFacets::from_dimension_values(|_| [100.0; 6]);
        assert!(check_facet_consistency(&traits, &facets).abs() < f32::EPSILON);
    }

    #[test]
    fn adjustment_halves_the_gap() {
        let traits = BigFiveTraits::new(80.0, 50.0, 50.0, 50.0, 50.0);
        let facets = BigFiveFacets::default();
        let adjusted = adjust_facets_towards_big_five(&traits, &facets, DEFAULT_ADJUST_STRENGTH);

        assert!((adjusted.openness.average() - 65.0).abs() < 1e-4);
        assert_eq!(adjusted.conscientiousness, facets.conscientiousness);
        assert!(
            check_facet_consistency(&traits, &adjusted) > check_facet_consistency(&traits, &facets)
        );
    }

    #[test]
    fn facet_average_of_empty_is_zero() {
        assert!(calculate_facet_average(&[]).abs() < f32::EPSILON);
        assert!((calculate_facet_average(&[10.0, 20.0, 30.0]) - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn facets_serialize_camel_case() {
        let json = serde_json::to_value(BigFiveFacets::default()).expect("serialize");
        assert!(json["openness"]["artisticInterests"].is_number());
        assert!(json["neuroticism"]["selfConsciousness"].is_number());
    }
}
