//! Enrichment inference — deriving Dark Triad, attachment and needs from
//! the Big Five.
//!
//! Used when a character was authored with only the five base scores. The
//! rules are deterministic and deliberately conservative: most profiles land
//! on a secure attachment and low Dark Triad scores.
//!
//! Attachment branches are tried in order, first match wins:
//!
//! | Style            | Condition                    | Intensity                   |
//! |------------------|------------------------------|-----------------------------|
//! | anxious          | N > 70, E > 60               | min(N, 85)                  |
//! | secure           | N < 40, A > 60, E > 50       | 40                          |
//! | avoidant         | E < 40, A < 50               | min(100 − E, 80)            |
//! | fearful-avoidant | N > 60, E < 50, A < 50       | min((N + 100 − E) / 2, 90)  |
//! | secure           | otherwise                    | 50                          |
//!
//! Inputs are expected on the 0–100 scale.

use rand::Rng;

use crate::facets;
use crate::types::{
    AttachmentProfile, AttachmentStyle, BigFiveTraits, DarkTriad, EnrichedPersonalityProfile,
    PsychologicalNeeds,
};

/// Dark Triad baseline for profiles that trigger no correlation rule.
pub const BASELINE_DARK_TRIAD: DarkTriad = DarkTriad {
    machiavellianism: 20.0,
    narcissism: 15.0,
    psychopathy: 10.0,
};

/// Infer the dominant attachment style and its intensity.
#[must_use]
pub fn infer_attachment_profile(big_five: &BigFiveTraits) -> AttachmentProfile {
    let BigFiveTraits {
        extraversion: e,
        agreeableness: a,
        neuroticism: n,
        ..
    } = *big_five;

    let (style, intensity) = if n > 70.0 && e > 60.0 {
        (AttachmentStyle::Anxious, n.min(85.0))
    } else if n < 40.0 && a > 60.0 && e > 50.0 {
        (AttachmentStyle::Secure, 40.0)
    } else if e < 40.0 && a < 50.0 {
        (AttachmentStyle::Avoidant, (100.0 - e).min(80.0))
    } else if n > 60.0 && e < 50.0 && a < 50.0 {
        (AttachmentStyle::FearfulAvoidant, ((n + 100.0 - e) / 2.0).min(90.0))
    } else {
        (AttachmentStyle::Secure, 50.0)
    };

    AttachmentProfile {
        primary_style: style,
        intensity: intensity.round(),
        manifestations: attachment_manifestations(style)
            .iter()
            .map(|m| (*m).to_string())
            .collect(),
    }
}

/// Typical ways each attachment style shows up in a relationship.
#[must_use]
pub fn attachment_manifestations(style: AttachmentStyle) -> &'static [&'static str] {
    match style {
        AttachmentStyle::Secure => &[
            "Trusts the people close to them",
            "Communicates openly",
            "Balances closeness and independence",
        ],
        AttachmentStyle::Anxious => &[
            "Needs constant reassurance",
            "Fears abandonment",
            "Hypervigilant to signs of rejection",
        ],
        AttachmentStyle::Avoidant => &[
            "Values independence highly",
            "Uncomfortable with emotional intimacy",
            "Pulls away when things get close",
        ],
        AttachmentStyle::FearfulAvoidant => &[
            "Ambivalent about intimacy",
            "Wants and fears closeness at once",
            "Finds it hard to trust",
        ],
    }
}

/// Infer Dark Triad scores from agreeableness, conscientiousness and
/// neuroticism.
///
/// - Machiavellianism rises with low A and high C: `40 + round((100 − A) · 0.2)`
/// - Narcissism rises with low A and low N: `35 + round((100 − A) · 0.15)`
/// - Psychopathy rises with very low A and low N: `30 + round((100 − A) · 0.2)`
#[must_use]
pub fn infer_dark_triad(big_five: &BigFiveTraits) -> DarkTriad {
    let a = big_five.agreeableness;
    let c = big_five.conscientiousness;
    let n = big_five.neuroticism;
    let disagreeable = 100.0 - a;

    let mut dark_triad = BASELINE_DARK_TRIAD;
    if a < 40.0 && c > 60.0 {
        dark_triad.machiavellianism = 40.0 + (disagreeable * 0.2).round();
    }
    if a < 40.0 && n < 40.0 {
        dark_triad.narcissism = 35.0 + (disagreeable * 0.15).round();
    }
    if a < 30.0 && n < 30.0 {
        dark_triad.psychopathy = 30.0 + (disagreeable * 0.2).round();
    }

    DarkTriad {
        machiavellianism: dark_triad.machiavellianism.min(100.0),
        narcissism: dark_triad.narcissism.min(100.0),
        psychopathy: dark_triad.psychopathy.min(100.0),
    }
}

/// Map the Big Five onto need strengths:
/// connection = E, autonomy = 100 − N, competence = mean(C, O), novelty = O,
/// each divided by 100.
#[must_use]
pub fn infer_psychological_needs(big_five: &BigFiveTraits) -> PsychologicalNeeds {
    PsychologicalNeeds {
        connection: big_five.extraversion / 100.0,
        autonomy: (100.0 - big_five.neuroticism) / 100.0,
        competence: (big_five.conscientiousness + big_five.openness) / 200.0,
        novelty: big_five.openness / 100.0,
    }
}

/// Build a fully enriched profile from the five base scores, sampling
/// facets from `rng`.
#[must_use]
pub fn enrich_profile_with_rng<R: Rng + ?Sized>(
    big_five: &BigFiveTraits,
    rng: &mut R,
) -> EnrichedPersonalityProfile {
    EnrichedPersonalityProfile::from_traits(*big_five)
        .with_facets(facets::infer_facets_with_rng(big_five, rng))
        .with_dark_triad(infer_dark_triad(big_five))
        .with_attachment(infer_attachment_profile(big_five))
        .with_needs(infer_psychological_needs(big_five))
}

/// [`enrich_profile_with_rng`] using the thread RNG.
#[must_use]
pub fn enrich_profile(big_five: &BigFiveTraits) -> EnrichedPersonalityProfile {
    enrich_profile_with_rng(big_five, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn traits(o: f32, c: f32, e: f32, a: f32, n: f32) -> BigFiveTraits {
        BigFiveTraits::new(o, c, e, a, n)
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-5, "{actual} != {expected}");
    }

    // -- attachment ---------------------------------------------------------

    #[test]
    fn anxious_when_neurotic_and_extraverted() {
        let profile = infer_attachment_profile(&traits(50.0, 50.0, 70.0, 20.0, 80.0));
        assert_eq!(profile.primary_style, AttachmentStyle::Anxious);
        assert_close(profile.intensity, 80.0);

        let capped = infer_attachment_profile(&traits(50.0, 50.0, 70.0, 50.0, 95.0));
        assert_close(capped.intensity, 85.0);
    }

    #[test]
    fn secure_when_stable_warm_and_social() {
        let profile = infer_attachment_profile(&traits(50.0, 50.0, 60.0, 70.0, 30.0));
        assert_eq!(profile.primary_style, AttachmentStyle::Secure);
        assert_close(profile.intensity, 40.0);
    }

    #[test]
    fn avoidant_when_introverted_and_cold() {
        let profile = infer_attachment_profile(&traits(50.0, 50.0, 30.0, 40.0, 50.0));
        assert_eq!(profile.primary_style, AttachmentStyle::Avoidant);
        assert_close(profile.intensity, 70.0);

        let capped = infer_attachment_profile(&traits(50.0, 50.0, 5.0, 40.0, 50.0));
        assert_close(capped.intensity, 80.0);
    }

    #[test]
    fn avoidant_branch_shadows_fearful_for_very_low_extraversion() {
        // Also satisfies the fearful-avoidant condition; order decides.
        let profile = infer_attachment_profile(&traits(50.0, 50.0, 30.0, 40.0, 80.0));
        assert_eq!(profile.primary_style, AttachmentStyle::Avoidant);
    }

    #[test]
    fn fearful_avoidant_when_neurotic_reserved_and_cold() {
        let profile = infer_attachment_profile(&traits(50.0, 50.0, 45.0, 40.0, 75.0));
        assert_eq!(profile.primary_style, AttachmentStyle::FearfulAvoidant);
        assert_close(profile.intensity, 65.0);
    }

    #[test]
    fn neutral_traits_fall_back_to_secure() {
        let profile = infer_attachment_profile(&BigFiveTraits::default());
        assert_eq!(profile.primary_style, AttachmentStyle::Secure);
        assert_close(profile.intensity, 50.0);
        assert_eq!(profile.manifestations.len(), 3);
        assert_eq!(profile.manifestations[0], "Trusts the people close to them");
    }

    #[test]
    fn intensity_is_rounded() {
        // (81 + 100 - 42) / 2 = 69.5
        let profile = infer_attachment_profile(&traits(50.0, 50.0, 42.0, 40.0, 81.0));
        assert_eq!(profile.primary_style, AttachmentStyle::FearfulAvoidant);
        assert_close(profile.intensity, 70.0);
    }

    // -- dark triad ---------------------------------------------------------

    #[test]
    fn agreeable_profiles_keep_baseline_dark_triad() {
        assert_eq!(infer_dark_triad(&BigFiveTraits::default()), BASELINE_DARK_TRIAD);
    }

    #[test]
    fn cold_calculating_profile_raises_all_three() {
        let dt = infer_dark_triad(&traits(50.0, 70.0, 50.0, 20.0, 20.0));
        assert_close(dt.machiavellianism, 56.0);
        assert_close(dt.narcissism, 47.0);
        assert_close(dt.psychopathy, 46.0);
    }

    #[test]
    fn psychopathy_needs_very_low_agreeableness() {
        let dt = infer_dark_triad(&traits(50.0, 50.0, 50.0, 35.0, 20.0));
        assert_close(dt.machiavellianism, 20.0);
        assert_close(dt.narcissism, 45.0);
        assert_close(dt.psychopathy, 10.0);
    }

    // -- needs --------------------------------------------------------------

    #[test]
    fn needs_follow_trait_formulas() {
        let needs = infer_psychological_needs(&traits(80.0, 60.0, 30.0, 50.0, 70.0));
        assert_close(needs.connection, 0.3);
        assert_close(needs.autonomy, 0.3);
        assert_close(needs.competence, 0.7);
        assert_close(needs.novelty, 0.8);
    }

    // -- full enrichment ----------------------------------------------------

    #[test]
    fn enriched_profile_has_every_dimension() {
        let big_five = traits(72.0, 65.0, 58.0, 70.0, 35.0);
        let profile = enrich_profile_with_rng(&big_five, &mut StdRng::seed_from_u64(3));
        assert!(profile.has_enriched_dimensions());
        assert!(profile.facets.is_some());
        assert_eq!(profile.attachment_style(), Some(AttachmentStyle::Secure));
        assert_eq!(profile.dark_triad, Some(BASELINE_DARK_TRIAD));
        assert_eq!(profile.psychological_needs, Some(infer_psychological_needs(&big_five)));
    }
}
