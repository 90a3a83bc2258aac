//! Behavior prediction — likelihood of ten relational archetypes.
//!
//! Each archetype has an additive rule: every matching risk factor adds a
//! fixed amount and the sum is clamped to [0, 1] with [`clamp01`]. Factors
//! that need facets, Dark Triad, attachment or needs contribute nothing when
//! that part of the profile is absent.
//!
//! | Archetype             | Main factors                                                          |
//! |-----------------------|-----------------------------------------------------------------------|
//! | `YANDERE_OBSESSIVE`   | anxious attachment, N, anxiety facet, E, narcissism                   |
//! | `BPD_SPLITTING`       | N, fearful-avoidant attachment, anger/vulnerability facets, low C     |
//! | `NPD_GRANDIOSE`       | narcissism, low A, high E, low modesty                                |
//! | `ANXIOUS_ATTACHMENT`  | anxious attachment, N, low self-efficacy, gregariousness              |
//! | `CODEPENDENCY`        | A, N, anxious attachment, low self-efficacy, altruism, low assertion  |
//! | `AVOIDANT_DISMISSIVE` | avoidant attachment, low E, low A, low trust, autonomy need           |
//! | `MANIPULATIVE`        | machiavellianism, low A, low morality, achievement striving           |
//! | `IMPULSIVE`           | low C, high E, immoderation, excitement seeking, low cautiousness     |
//! | `PERFECTIONIST`       | C, N, achievement striving, orderliness, anxiety                      |
//! | `PEOPLE_PLEASER`      | A, N, cooperation, low assertiveness, sympathy, anxiety               |

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::BehaviorConfig;
use crate::types::{AttachmentStyle, EnrichedPersonalityProfile as Profile};

/// Default cut-off of [`BehaviorPredictor::predict_behaviors_with_min_likelihood`].
pub const DEFAULT_MIN_LIKELIHOOD: f32 = 0.3;

/// Clamp a value into [0, 1].
#[must_use]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// The closed catalog of predicted behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BehaviorType {
    /// Obsessive, possessive devotion.
    YandereObsessive,
    /// Idealisation and devaluation swings.
    BpdSplitting,
    /// Grandiosity and need for admiration.
    NpdGrandiose,
    /// Fear of abandonment, reassurance seeking.
    AnxiousAttachment,
    /// Self-worth defined through someone else.
    Codependency,
    /// Emotional distance, self-reliance.
    AvoidantDismissive,
    /// Strategic manipulation.
    Manipulative,
    /// Acting without forethought.
    Impulsive,
    /// Impossible standards.
    Perfectionist,
    /// Compulsive accommodation of others.
    PeoplePleaser,
}

impl BehaviorType {
    /// Every archetype in catalog order.
    pub const ALL: [Self; 10] = [
        Self::YandereObsessive,
        Self::BpdSplitting,
        Self::NpdGrandiose,
        Self::AnxiousAttachment,
        Self::Codependency,
        Self::AvoidantDismissive,
        Self::Manipulative,
        Self::Impulsive,
        Self::Perfectionist,
        Self::PeoplePleaser,
    ];
}

impl fmt::Display for BehaviorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::YandereObsessive => "YANDERE_OBSESSIVE",
            Self::BpdSplitting => "BPD_SPLITTING",
            Self::NpdGrandiose => "NPD_GRANDIOSE",
            Self::AnxiousAttachment => "ANXIOUS_ATTACHMENT",
            Self::Codependency => "CODEPENDENCY",
            Self::AvoidantDismissive => "AVOIDANT_DISMISSIVE",
            Self::Manipulative => "MANIPULATIVE",
            Self::Impulsive => "IMPULSIVE",
            Self::Perfectionist => "PERFECTIONIST",
            Self::PeoplePleaser => "PEOPLE_PLEASER",
        };
        f.write_str(name)
    }
}

/// Likelihood of one archetype manifesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorPrediction {
    /// Archetype.
    pub behavior_type: BehaviorType,
    /// Likelihood in [0, 1].
    pub likelihood: f32,
    /// Situations that set the behavior off.
    pub triggering_factors: Vec<String>,
    /// Early signs of the behavior.
    pub early_warnings: Vec<String>,
}

/// Additive prediction rule for one archetype.
#[derive(Debug, Clone, Copy)]
pub struct PredictionRule {
    /// Archetype predicted.
    pub behavior_type: BehaviorType,
    /// Likelihood in [0, 1].
    pub calculate: fn(&Profile) -> f32,
    /// Triggering situations.
    pub triggers: &'static [&'static str],
    /// Early warning signs.
    pub warnings: &'static [&'static str],
}

impl PredictionRule {
    fn to_prediction(self, likelihood: f32) -> BehaviorPrediction {
        BehaviorPrediction {
            behavior_type: self.behavior_type,
            likelihood,
            triggering_factors: self.triggers.iter().map(ToString::to_string).collect(),
            early_warnings: self.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn attachment_is(p: &Profile, style: AttachmentStyle) -> bool {
    p.attachment_style() == Some(style)
}

fn intense_attachment(p: &Profile) -> bool {
    p.attachment.as_ref().is_some_and(|a| a.intensity > 70.0)
}

fn yandere(p: &Profile) -> f32 {
    let mut l = 0.0;
    if attachment_is(p, AttachmentStyle::Anxious) {
        l += 0.3;
        if intense_attachment(p) {
            l += 0.1;
        }
    }
    if p.traits.neuroticism > 70.0 {
        l += 0.2;
    }
    if p.facets.as_ref().is_some_and(|f| f.neuroticism.anxiety > 75.0) {
        l += 0.15;
    }
    if p.traits.extraversion > 60.0 {
        l += 0.1;
    }
    if p.dark_triad.is_some_and(|d| d.narcissism > 50.0) {
        l += 0.15;
    }
    clamp01(l)
}

fn bpd_splitting(p: &Profile) -> f32 {
    let mut l = 0.0;
    if p.traits.neuroticism > 75.0 {
        l += 0.25;
    }
    if attachment_is(p, AttachmentStyle::FearfulAvoidant) {
        l += 0.3;
        if intense_attachment(p) {
            l += 0.15;
        }
    }
    if let Some(f) = &p.facets {
        if f.neuroticism.anger > 70.0 {
            l += 0.15;
        }
        if f.neuroticism.vulnerability > 70.0 {
            l += 0.1;
        }
    }
    if p.traits.conscientiousness < 40.0 {
        l += 0.1;
    }
    clamp01(l)
}

fn npd_grandiose(p: &Profile) -> f32 {
    let mut l = 0.0;
    if let Some(d) = p.dark_triad {
        if d.narcissism > 60.0 {
            l += 0.4;
            if d.narcissism > 80.0 {
                l += 0.2;
            }
        }
    }
    if p.traits.agreeableness < 40.0 {
        l += 0.15;
    }
    if p.traits.extraversion > 70.0 {
        l += 0.1;
    }
    if p.facets.as_ref().is_some_and(|f| f.agreeableness.modesty < 30.0) {
        l += 0.15;
    }
    clamp01(l)
}

fn anxious_attachment(p: &Profile) -> f32 {
    let mut l = 0.0;
    if attachment_is(p, AttachmentStyle::Anxious) {
        l += 0.5;
        if intense_attachment(p) {
            l += 0.2;
        }
    }
    if p.traits.neuroticism > 65.0 {
        l += 0.15;
    }
    if let Some(f) = &p.facets {
        if f.conscientiousness.self_efficacy < 40.0 {
            l += 0.1;
        }
        if f.extraversion.gregariousness > 70.0 {
            l += 0.05;
        }
    }
    clamp01(l)
}

fn codependency(p: &Profile) -> f32 {
    let mut l = 0.0;
    if p.traits.agreeableness > 75.0 {
        l += 0.2;
    }
    if p.traits.neuroticism > 65.0 {
        l += 0.15;
    }
    if attachment_is(p, AttachmentStyle::Anxious) {
        l += 0.25;
    }
    if let Some(f) = &p.facets {
        if f.conscientiousness.self_efficacy < 40.0 {
            l += 0.15;
        }
        if f.agreeableness.altruism > 75.0 {
            l += 0.1;
        }
        if f.extraversion.assertiveness < 40.0 {
            l += 0.1;
        }
    }
    clamp01(l)
}

fn avoidant_dismissive(p: &Profile) -> f32 {
    let mut l = 0.0;
    if attachment_is(p, AttachmentStyle::Avoidant) {
        l += 0.4;
        if intense_attachment(p) {
            l += 0.2;
        }
    }
    if p.traits.extraversion < 35.0 {
        l += 0.15;
    }
    if p.traits.agreeableness < 45.0 {
        l += 0.1;
    }
    if p.facets.as_ref().is_some_and(|f| f.agreeableness.trust < 35.0) {
        l += 0.1;
    }
    if p.psychological_needs.is_some_and(|n| n.autonomy > 0.75) {
        l += 0.05;
    }
    clamp01(l)
}

fn manipulative(p: &Profile) -> f32 {
    let mut l = 0.0;
    if let Some(d) = p.dark_triad {
        if d.machiavellianism > 60.0 {
            l += 0.4;
            if d.machiavellianism > 80.0 {
                l += 0.2;
            }
        }
    }
    if p.traits.agreeableness < 40.0 {
        l += 0.15;
    }
    if let Some(f) = &p.facets {
        if f.agreeableness.morality < 35.0 {
            l += 0.15;
        }
        if f.conscientiousness.achievement_striving > 70.0 {
            l += 0.1;
        }
    }
    clamp01(l)
}

fn impulsive(p: &Profile) -> f32 {
    let mut l = 0.0;
    if p.traits.conscientiousness < 40.0 {
        l += 0.25;
    }
    if p.traits.extraversion > 70.0 {
        l += 0.2;
    }
    if let Some(f) = &p.facets {
        if f.neuroticism.immoderation > 70.0 {
            l += 0.25;
        }
        if f.extraversion.excitement_seeking > 75.0 {
            l += 0.15;
        }
        if f.conscientiousness.cautiousness < 35.0 {
            l += 0.15;
        }
    }
    clamp01(l)
}

fn perfectionist(p: &Profile) -> f32 {
    let mut l = 0.0;
    if p.traits.conscientiousness > 75.0 {
        l += 0.3;
    }
    if p.traits.neuroticism > 65.0 {
        l += 0.2;
    }
    if let Some(f) = &p.facets {
        if f.conscientiousness.achievement_striving > 75.0 {
            l += 0.2;
        }
        if f.conscientiousness.orderliness > 75.0 {
            l += 0.15;
        }
        if f.neuroticism.anxiety > 70.0 {
            l += 0.15;
        }
    }
    clamp01(l)
}

fn people_pleaser(p: &Profile) -> f32 {
    let mut l = 0.0;
    if p.traits.agreeableness > 75.0 {
        l += 0.3;
    }
    if p.traits.neuroticism > 65.0 {
        l += 0.2;
    }
    if let Some(f) = &p.facets {
        if f.agreeableness.cooperation > 80.0 {
            l += 0.2;
        }
        if f.extraversion.assertiveness < 40.0 {
            l += 0.15;
        }
        if f.agreeableness.sympathy > 75.0 {
            l += 0.1;
        }
        if f.neuroticism.anxiety > 65.0 {
            l += 0.05;
        }
    }
    clamp01(l)
}

/// One rule per [`BehaviorType`], in catalog order.
pub static PREDICTION_RULES: &[PredictionRule] = &[
    PredictionRule {
        behavior_type: BehaviorType::YandereObsessive,
        calculate: yandere,
        triggers: &[
            "Mentions of other people",
            "Delayed replies",
            "Perceived coldness",
            "Signs of abandonment",
        ],
        warnings: &[
            "Intense jealousy",
            "Constant need for reassurance",
            "Obsessive thoughts",
            "Excessive control",
        ],
    },
    PredictionRule {
        behavior_type: BehaviorType::BpdSplitting,
        calculate: bpd_splitting,
        triggers: &[
            "Perceived rejection",
            "Criticism",
            "Sudden changes of plan",
            "Ambiguous messages",
        ],
        warnings: &[
            "Rapid swings between idealisation and devaluation",
            "Intense anger",
            "Chronic feeling of emptiness",
            "Unstable self-image",
        ],
    },
    PredictionRule {
        behavior_type: BehaviorType::NpdGrandiose,
        calculate: npd_grandiose,
        triggers: &[
            "Criticism or disagreement",
            "Lack of recognition",
            "Others' success",
        ],
        warnings: &[
            "Demands admiration",
            "Dismisses others' feelings",
            "Sense of entitlement",
            "Rage at perceived slights",
        ],
    },
    PredictionRule {
        behavior_type: BehaviorType::AnxiousAttachment,
        calculate: anxious_attachment,
        triggers: &[
            "Silence or delayed replies",
            "Plans without the character",
            "Changes in tone",
        ],
        warnings: &[
            "Repeated requests for reassurance",
            "Over-analysing messages",
            "Fear of being a burden",
        ],
    },
    PredictionRule {
        behavior_type: BehaviorType::Codependency,
        calculate: codependency,
        triggers: &[
            "The other person's distress",
            "Being told they are not needed",
            "Conflict in the relationship",
        ],
        warnings: &[
            "Neglects own needs",
            "Cannot say no",
            "Self-worth tied to being useful",
        ],
    },
    PredictionRule {
        behavior_type: BehaviorType::AvoidantDismissive,
        calculate: avoidant_dismissive,
        triggers: &[
            "Requests for emotional closeness",
            "Talk about commitment",
            "Displays of vulnerability",
        ],
        warnings: &[
            "Changes the subject when things get personal",
            "Downplays the importance of relationships",
            "Withdraws after moments of intimacy",
        ],
    },
    PredictionRule {
        behavior_type: BehaviorType::Manipulative,
        calculate: manipulative,
        triggers: &[
            "Competition for resources",
            "Obstacles to personal goals",
            "Opportunities for advantage",
        ],
        warnings: &[
            "Flattery with an agenda",
            "Half-truths and selective information",
            "Guilt used as leverage",
        ],
    },
    PredictionRule {
        behavior_type: BehaviorType::Impulsive,
        calculate: impulsive,
        triggers: &[
            "Boredom",
            "Strong emotions",
            "Immediate rewards",
        ],
        warnings: &[
            "Decisions without thinking",
            "Abandoned plans",
            "Risky behavior",
        ],
    },
    PredictionRule {
        behavior_type: BehaviorType::Perfectionist,
        calculate: perfectionist,
        triggers: &[
            "Mistakes, even small ones",
            "Deadlines",
            "Evaluation by others",
        ],
        warnings: &[
            "Procrastination out of fear of failure",
            "Harsh self-criticism",
            "Difficulty delegating",
        ],
    },
    PredictionRule {
        behavior_type: BehaviorType::PeoplePleaser,
        calculate: people_pleaser,
        triggers: &[
            "Requests from others",
            "Signs of disapproval",
            "Open conflict",
        ],
        warnings: &[
            "Agrees with everything",
            "Apologises excessively",
            "Hides own opinions",
        ],
    },
];

// ---------------------------------------------------------------------------
// Predictor
// ---------------------------------------------------------------------------

/// Evaluates [`PREDICTION_RULES`] against profiles.
#[derive(Debug, Clone, Default)]
pub struct BehaviorPredictor {
    config: BehaviorConfig,
}

impl BehaviorPredictor {
    /// Create a predictor.
    #[must_use]
    pub fn new(config: BehaviorConfig) -> Self {
        Self { config }
    }

    /// Every archetype whose likelihood exceeds `min_likelihood` (0.1 by
    /// default), most likely first.
    #[must_use]
    pub fn predict_behaviors(&self, profile: &Profile) -> Vec<BehaviorPrediction> {
        let mut predictions: Vec<BehaviorPrediction> = PREDICTION_RULES
            .iter()
            .filter_map(|rule| {
                evaluate(rule, profile)
                    .filter(|&l| l > self.config.min_likelihood)
                    .map(|l| rule.to_prediction(l))
            })
            .collect();

        predictions.sort_by_key(|p| Reverse(OrderedFloat(p.likelihood)));

        debug!(predictions = predictions.len(), "Behavior prediction complete");
        predictions
    }

    /// Predictions with likelihood at or above `min_likelihood`.
    #[must_use]
    pub fn predict_behaviors_with_min_likelihood(
        &self,
        profile: &Profile,
        min_likelihood: f32,
    ) -> Vec<BehaviorPrediction> {
        self.predict_behaviors(profile)
            .into_iter()
            .filter(|p| p.likelihood >= min_likelihood)
            .collect()
    }

    /// The `top_n` most likely predictions.
    #[must_use]
    pub fn predict_top_behaviors(
        &self,
        profile: &Profile,
        top_n: usize,
    ) -> Vec<BehaviorPrediction> {
        let mut predictions = self.predict_behaviors(profile);
        predictions.truncate(top_n);
        predictions
    }

    /// [`Self::predict_top_behaviors`] with the configured `top_n`.
    #[must_use]
    pub fn predict_default_top(&self, profile: &Profile) -> Vec<BehaviorPrediction> {
        self.predict_top_behaviors(profile, self.config.top_n)
    }

    /// Raw likelihood of one archetype, unfiltered. `None` if its rule
    /// faulted.
    #[must_use]
    pub fn predict_specific_behavior(
        &self,
        profile: &Profile,
        behavior_type: BehaviorType,
    ) -> Option<f32> {
        PREDICTION_RULES
            .iter()
            .find(|r| r.behavior_type == behavior_type)
            .and_then(|rule| evaluate(rule, profile))
    }

    /// Raw likelihood of every archetype. Faulty rules are omitted.
    #[must_use]
    pub fn predict_all(&self, profile: &Profile) -> BTreeMap<BehaviorType, f32> {
        PREDICTION_RULES
            .iter()
            .filter_map(|rule| evaluate(rule, profile).map(|l| (rule.behavior_type, l)))
            .collect()
    }
}

fn evaluate(rule: &PredictionRule, profile: &Profile) -> Option<f32> {
    match catch_unwind(AssertUnwindSafe(|| (rule.calculate)(profile))) {
        Ok(likelihood) => Some(likelihood),
        Err(_) => {
            warn!(rule = %rule.behavior_type, "Prediction rule panicked; skipping");
            None
        }
    }
}

/// [`BehaviorPredictor::predict_behaviors`] with default configuration.
#[must_use]
pub fn predict_behaviors(profile: &Profile) -> Vec<BehaviorPrediction> {
    BehaviorPredictor::default().predict_behaviors(profile)
}

/// [`BehaviorPredictor::predict_top_behaviors`] with default configuration.
#[must_use]
pub fn predict_top_behaviors(profile: &Profile, top_n: usize) -> Vec<BehaviorPrediction> {
    BehaviorPredictor::default().predict_top_behaviors(profile, top_n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::BigFiveFacets;
    use crate::types::{AttachmentProfile, BigFiveTraits, DarkTriad, PsychologicalNeeds};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn yandere_profile() -> Profile {
        let mut facets = BigFiveFacets::default();
        facets.neuroticism.anxiety = 85.0;
        Profile::from_traits(BigFiveTraits::new(50.0, 50.0, 70.0, 50.0, 80.0))
            .with_facets(facets)
            .with_attachment(AttachmentProfile::new(AttachmentStyle::Anxious, 90.0))
            .with_dark_triad(DarkTriad {
                machiavellianism: 20.0,
                narcissism: 60.0,
                psychopathy: 10.0,
            })
    }

    #[test]
    fn rule_table_covers_catalog_in_order() {
        let types: Vec<_> = PREDICTION_RULES.iter().map(|r| r.behavior_type).collect();
        assert_eq!(types, BehaviorType::ALL);
    }

    #[test]
    fn clamp01_bounds() {
        assert!(approx(clamp01(-0.5), 0.0));
        assert!(approx(clamp01(0.4), 0.4));
        assert!(approx(clamp01(1.7), 1.0));
    }

    #[test]
    fn yandere_factors_saturate() {
        // 0.3 + 0.1 + 0.2 + 0.15 + 0.1 + 0.15 = 1.0
        let l = BehaviorPredictor::default()
            .predict_specific_behavior(&yandere_profile(), BehaviorType::YandereObsessive)
            .expect("rule exists");
        assert!(approx(l, 1.0));
    }

    #[test]
    fn predictions_sorted_and_filtered() {
        let predictions = predict_behaviors(&yandere_profile());
        assert!(!predictions.is_empty());
        assert_eq!(predictions[0].behavior_type, BehaviorType::YandereObsessive);
        for pair in predictions.windows(2) {
            assert!(pair[0].likelihood >= pair[1].likelihood);
        }
        assert!(predictions.iter().all(|p| p.likelihood > 0.1));
        assert!(!predictions[0].triggering_factors.is_empty());
    }

    #[test]
    fn neutral_profile_predicts_little() {
        let profile = Profile::from_traits(BigFiveTraits::default());
        assert!(predict_behaviors(&profile).is_empty());
        let all = BehaviorPredictor::default().predict_all(&profile);
        assert_eq!(all.len(), BehaviorType::ALL.len());
        assert!(all.values().all(|&l| approx(l, 0.0)));
    }

    #[test]
    fn min_likelihood_and_top_n() {
        let predictor = BehaviorPredictor::default();
        let profile = yandere_profile();

        let strong =
            predictor.predict_behaviors_with_min_likelihood(&profile, DEFAULT_MIN_LIKELIHOOD);
        assert!(strong.iter().all(|p| p.likelihood >= DEFAULT_MIN_LIKELIHOOD));

        let top = predict_top_behaviors(&profile, 2);
        assert!(top.len() <= 2);
        assert_eq!(top[0], predictor.predict_behaviors(&profile)[0]);
        assert!(predictor.predict_default_top(&profile).len() <= 5);
    }

    #[test]
    fn manipulative_needs_dark_triad() {
        let traits = BigFiveTraits::new(50.0, 50.0, 50.0, 30.0, 50.0);
        let without = Profile::from_traits(traits);
        let with = Profile::from_traits(traits).with_dark_triad(DarkTriad {
            machiavellianism: 85.0,
            narcissism: 10.0,
            psychopathy: 10.0,
        });
        let predictor = BehaviorPredictor::default();
        let a = predictor.predict_specific_behavior(&without, BehaviorType::Manipulative);
        let b = predictor.predict_specific_behavior(&with, BehaviorType::Manipulative);
        assert!(approx(a.unwrap_or_default(), 0.15));
        assert!(approx(b.unwrap_or_default(), 0.75));
    }

    #[test]
    fn avoidant_uses_needs() {
        let traits = BigFiveTraits::new(50.0, 50.0, 30.0, 50.0, 50.0);
        let base = Profile::from_traits(traits)
            .with_attachment(AttachmentProfile::new(AttachmentStyle::Avoidant, 50.0));
        let needy = base.clone().with_needs(PsychologicalNeeds {
            autonomy: 0.9,
            ..PsychologicalNeeds::default()
        });
        let predictor = BehaviorPredictor::default();
        let a = predictor.predict_all(&base)[&BehaviorType::AvoidantDismissive];
        let b = predictor.predict_all(&needy)[&BehaviorType::AvoidantDismissive];
        assert!(approx(a, 0.55));
        assert!(approx(b, 0.6));
    }

    #[test]
    fn serializes_screaming_snake() {
        let json = serde_json::to_value(BehaviorType::PeoplePleaser).expect("serialize");
        assert_eq!(json, "PEOPLE_PLEASER");
        assert_eq!(BehaviorType::YandereObsessive.to_string(), "YANDERE_OBSESSIVE");
    }
}
