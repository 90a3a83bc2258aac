//! Conflict rule table.
//!
//! Each rule is plain data: an id, a severity, a category, a predicate and
//! the text shown to the author. New rules are appended to
//! [`CONFLICT_RULES`]; the detector needs no change.
//!
//! Thresholds are calibration values on the 0–100 scale ("high" is
//! usually > 70, "low" < 30–40). Predicates that need an optional
//! substructure return `false` when it is absent.

use super::{ConflictCategory, ConflictRule, Severity};
use crate::facets::check_facet_consistency;
use crate::types::{AttachmentStyle, Dimension, EnrichedPersonalityProfile as Profile};

// ---------------------------------------------------------------------------
// Big Five
// ---------------------------------------------------------------------------

fn impulsivity_risk(p: &Profile) -> bool {
    p.traits.extraversion > 70.0 && p.traits.conscientiousness < 40.0
}

fn perfectionist_anxiety(p: &Profile) -> bool {
    p.traits.neuroticism > 70.0 && p.traits.conscientiousness > 70.0
}

fn social_isolation(p: &Profile) -> bool {
    p.traits.extraversion < 30.0 && p.traits.neuroticism > 60.0
}

fn conflict_avoidance(p: &Profile) -> bool {
    p.traits.agreeableness > 80.0 && p.traits.neuroticism > 60.0
}

fn creative_chaos(p: &Profile) -> bool {
    p.traits.openness > 80.0 && p.traits.conscientiousness < 40.0
}

fn rigid_skepticism(p: &Profile) -> bool {
    p.traits.openness < 30.0 && p.traits.conscientiousness > 70.0
}

fn emotional_storm(p: &Profile) -> bool {
    p.traits.neuroticism > 90.0
}

fn hostile_reactivity(p: &Profile) -> bool {
    p.traits.agreeableness < 25.0 && p.traits.neuroticism > 70.0
}

fn domineering_disregard(p: &Profile) -> bool {
    p.traits.extraversion > 80.0 && p.traits.agreeableness < 25.0
}

fn apathetic_withdrawal(p: &Profile) -> bool {
    p.traits.extraversion < 20.0 && p.traits.openness < 20.0 && p.traits.conscientiousness < 30.0
}

fn flat_profile(p: &Profile) -> bool {
    p.traits.values().iter().all(|v| (45.0..=55.0).contains(v))
}

// ---------------------------------------------------------------------------
// Facets
// ---------------------------------------------------------------------------

fn facet_big_five_mismatch(p: &Profile) -> bool {
    // Average deviation above 20 points ⇔ consistency below 0.6.
    p.facets
        .as_ref()
        .is_some_and(|f| check_facet_consistency(&p.traits, f) < 0.6)
}

fn facet_internal_spread(p: &Profile) -> bool {
    p.facets.as_ref().is_some_and(|f| {
        Dimension::ALL.iter().any(|&d| {
            let values = f.dimension_values(d);
            let max = values.iter().copied().fold(f32::MIN, f32::max);
            let min = values.iter().copied().fold(f32::MAX, f32::min);
            max - min > 60.0
        })
    })
}

fn calm_but_anxious(p: &Profile) -> bool {
    p.facets
        .as_ref()
        .is_some_and(|f| p.traits.neuroticism < 30.0 && f.neuroticism.anxiety > 75.0)
}

fn curious_without_intellect(p: &Profile) -> bool {
    p.facets.as_ref().is_some_and(|f| {
        p.traits.openness > 70.0 && f.openness.intellect < 30.0 && f.openness.imagination < 30.0
    })
}

fn solitary_extravert(p: &Profile) -> bool {
    p.facets
        .as_ref()
        .is_some_and(|f| p.traits.extraversion > 70.0 && f.extraversion.gregariousness < 25.0)
}

fn distrustful_agreeableness(p: &Profile) -> bool {
    p.facets.as_ref().is_some_and(|f| {
        p.traits.agreeableness > 70.0
            && f.agreeableness.trust < 25.0
            && f.agreeableness.morality < 30.0
    })
}

fn undisciplined_conscientiousness(p: &Profile) -> bool {
    p.facets.as_ref().is_some_and(|f| {
        p.traits.conscientiousness > 70.0 && f.conscientiousness.self_discipline < 25.0
    })
}

// ---------------------------------------------------------------------------
// Dark Triad
// ---------------------------------------------------------------------------

fn high_machiavellianism(p: &Profile) -> bool {
    p.dark_triad
        .is_some_and(|d| d.machiavellianism > 60.0 && p.traits.agreeableness < 40.0)
}

fn extreme_narcissism(p: &Profile) -> bool {
    p.dark_triad.is_some_and(|d| d.narcissism > 80.0)
}

fn psychopathy_indicators(p: &Profile) -> bool {
    p.dark_triad
        .is_some_and(|d| d.psychopathy > 70.0 && p.traits.agreeableness < 30.0)
}

fn dark_triad_cluster(p: &Profile) -> bool {
    p.dark_triad.is_some_and(|d| {
        d.machiavellianism > 60.0 && d.narcissism > 60.0 && d.psychopathy > 60.0
    })
}

fn charming_facade(p: &Profile) -> bool {
    p.dark_triad
        .is_some_and(|d| d.average() > 60.0 && p.traits.agreeableness > 70.0)
}

fn fragile_narcissism(p: &Profile) -> bool {
    p.dark_triad
        .is_some_and(|d| d.narcissism > 60.0 && p.traits.neuroticism > 70.0)
}

fn reckless_psychopathy(p: &Profile) -> bool {
    p.dark_triad
        .is_some_and(|d| d.psychopathy > 70.0 && p.traits.conscientiousness < 30.0)
}

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

fn anxious_attachment_high_neuroticism(p: &Profile) -> bool {
    p.attachment_style() == Some(AttachmentStyle::Anxious) && p.traits.neuroticism > 70.0
}

fn avoidant_attachment_low_agreeableness(p: &Profile) -> bool {
    p.attachment_style().is_some_and(AttachmentStyle::is_avoidant) && p.traits.agreeableness < 40.0
}

fn fearful_avoidant_paradox(p: &Profile) -> bool {
    p.attachment.as_ref().is_some_and(|a| {
        a.primary_style == AttachmentStyle::FearfulAvoidant && a.intensity > 70.0
    })
}

fn secure_but_volatile(p: &Profile) -> bool {
    p.attachment_style() == Some(AttachmentStyle::Secure) && p.traits.neuroticism > 80.0
}

fn anxious_but_serene(p: &Profile) -> bool {
    p.attachment_style() == Some(AttachmentStyle::Anxious) && p.traits.neuroticism < 25.0
}

fn avoidant_social_butterfly(p: &Profile) -> bool {
    p.attachment_style() == Some(AttachmentStyle::Avoidant) && p.traits.extraversion > 80.0
}

fn secure_dark_triad(p: &Profile) -> bool {
    p.attachment_style() == Some(AttachmentStyle::Secure)
        && p.dark_triad.is_some_and(|d| d.average() > 70.0)
}

// ---------------------------------------------------------------------------
// Cross-dimensional
// ---------------------------------------------------------------------------

fn low_trust_high_extraversion(p: &Profile) -> bool {
    p.facets
        .as_ref()
        .is_some_and(|f| f.agreeableness.trust < 30.0 && p.traits.extraversion > 70.0)
}

fn high_anxiety_low_self_efficacy(p: &Profile) -> bool {
    p.facets.as_ref().is_some_and(|f| {
        f.neuroticism.anxiety > 70.0 && f.conscientiousness.self_efficacy < 40.0
    })
}

fn impulsive_narcissist(p: &Profile) -> bool {
    match (&p.facets, &p.dark_triad) {
        (Some(f), Some(d)) => f.neuroticism.immoderation > 70.0 && d.narcissism > 60.0,
        _ => false,
    }
}

fn achievement_without_discipline(p: &Profile) -> bool {
    p.facets.as_ref().is_some_and(|f| {
        f.conscientiousness.achievement_striving > 70.0
            && f.conscientiousness.self_discipline < 40.0
    })
}

fn possessive_jealousy(p: &Profile) -> bool {
    p.attachment_style() == Some(AttachmentStyle::Anxious)
        && p.dark_triad.is_some_and(|d| d.narcissism > 60.0 || d.machiavellianism > 60.0)
}

fn altruistic_manipulator(p: &Profile) -> bool {
    match (&p.facets, &p.dark_triad) {
        (Some(f), Some(d)) => d.machiavellianism > 60.0 && f.agreeableness.altruism > 75.0,
        _ => false,
    }
}

fn lonely_introvert(p: &Profile) -> bool {
    p.psychological_needs
        .is_some_and(|n| n.connection > 0.8 && p.traits.extraversion < 25.0)
}

fn clinging_independence(p: &Profile) -> bool {
    p.psychological_needs.is_some_and(|n| n.autonomy > 0.8)
        && p.attachment_style() == Some(AttachmentStyle::Anxious)
}

fn restless_traditionalist(p: &Profile) -> bool {
    p.psychological_needs
        .is_some_and(|n| n.novelty > 0.8 && p.traits.openness < 25.0)
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Every conflict rule, in evaluation order.
pub static CONFLICT_RULES: &[ConflictRule] = &[
    // Big Five
    ConflictRule {
        id: "impulsivity-risk",
        severity: Severity::Warning,
        category: ConflictCategory::BigFive,
        detect: impulsivity_risk,
        title: "Impulsivity risk",
        description: "High extraversion with low conscientiousness leads to impulsive decisions and little planning.",
        implications: &[
            "Acts without weighing consequences",
            "Struggles to keep long-term commitments",
            "Chases novelty and stimulation",
            "Weak self-discipline",
        ],
        mitigations: &[
            "Give the character routines or an accountability partner",
            "Write in a habit of pausing before big decisions",
            "Let other characters handle planning",
            "Use mindfulness moments to show impulse control",
        ],
    },
    ConflictRule {
        id: "perfectionist-anxiety",
        severity: Severity::Warning,
        category: ConflictCategory::BigFive,
        detect: perfectionist_anxiety,
        title: "Perfectionist anxiety",
        description: "High neuroticism with high conscientiousness produces analysis paralysis and impossible standards.",
        implications: &[
            "Paralysis from over-analysis",
            "Impossibly high standards",
            "Burnout from overexertion",
            "Cannot enjoy achievements",
        ],
        mitigations: &[
            "Show self-compassion and accepting \"good enough\"",
            "Set time limits on decisions",
            "Let the character work on perfectionism over time",
        ],
    },
    ConflictRule {
        id: "social-isolation",
        severity: Severity::Info,
        category: ConflictCategory::BigFive,
        detect: social_isolation,
        title: "Social isolation risk",
        description: "Low extraversion with high neuroticism drifts into social avoidance and loneliness.",
        implications: &[
            "Avoids social interaction",
            "Chronic loneliness despite wanting connection",
            "Marked social anxiety",
            "Hard time asking for help",
        ],
        mitigations: &[
            "Gradual exposure to social situations",
            "Small communities built around shared interests",
            "Favour a few deep relationships over many shallow ones",
        ],
    },
    ConflictRule {
        id: "conflict-avoidance",
        severity: Severity::Info,
        category: ConflictCategory::BigFive,
        detect: conflict_avoidance,
        title: "Conflict avoidance",
        description: "Very high agreeableness with high neuroticism avoids necessary conflict and builds resentment.",
        implications: &[
            "Cannot set boundaries",
            "Unspoken resentment accumulates",
            "Excessive people-pleasing",
            "Loses authenticity in relationships",
        ],
        mitigations: &[
            "Let assertiveness grow step by step",
            "Practise saying \"no\" respectfully",
            "Make clear that conflict is not rejection",
        ],
    },
    ConflictRule {
        id: "creative-chaos",
        severity: Severity::Info,
        category: ConflictCategory::BigFive,
        detect: creative_chaos,
        title: "Creative chaos",
        description: "Very high openness with low conscientiousness yields brilliant ideas and little execution.",
        implications: &[
            "Many ideas, few finished",
            "Hard to focus on one project",
            "Disorganised execution",
            "Frustration at unrealised potential",
        ],
        mitigations: &[
            "External organisation systems",
            "Pair with organised companions",
            "External deadlines",
        ],
    },
    ConflictRule {
        id: "rigid-skepticism",
        severity: Severity::Info,
        category: ConflictCategory::BigFive,
        detect: rigid_skepticism,
        title: "Rigid skepticism",
        description: "Low openness with high conscientiousness leads to mental rigidity and resistance to change.",
        implications: &[
            "Resists new ideas and methods",
            "Adapts poorly to change",
            "Black-and-white thinking",
            "Misses opportunities through conservatism",
        ],
        mitigations: &[
            "Gradual exposure to new experiences",
            "Ask for evidence rather than rejecting outright",
            "Recognise when rigidity is costly",
        ],
    },
    ConflictRule {
        id: "emotional-storm",
        severity: Severity::Warning,
        category: ConflictCategory::BigFive,
        detect: emotional_storm,
        title: "Emotional storm",
        description: "Neuroticism above 90 leaves almost no emotional baseline; every exchange risks escalation.",
        implications: &[
            "Disproportionate reactions to small events",
            "Mood rarely settles between conversations",
            "Exhausting for conversation partners",
        ],
        mitigations: &[
            "Lower neuroticism slightly to leave room for calm moments",
            "Give the character explicit coping rituals",
        ],
    },
    ConflictRule {
        id: "hostile-reactivity",
        severity: Severity::Warning,
        category: ConflictCategory::BigFive,
        detect: hostile_reactivity,
        title: "Hostile reactivity",
        description: "Very low agreeableness with high neuroticism turns stress into open hostility.",
        implications: &[
            "Irritability aimed at others",
            "Frequent arguments",
            "Holds grudges",
        ],
        mitigations: &[
            "Show remorse after outbursts",
            "Give the hostility a specific, understandable source",
        ],
    },
    ConflictRule {
        id: "domineering-disregard",
        severity: Severity::Warning,
        category: ConflictCategory::BigFive,
        detect: domineering_disregard,
        title: "Domineering disregard",
        description: "Very high extraversion with very low agreeableness dominates conversations without regard for others.",
        implications: &[
            "Talks over others",
            "Treats people as an audience",
            "Relationships feel one-sided",
        ],
        mitigations: &[
            "Add moments of genuine curiosity about others",
            "Raise agreeableness a little",
        ],
    },
    ConflictRule {
        id: "apathetic-withdrawal",
        severity: Severity::Warning,
        category: ConflictCategory::BigFive,
        detect: apathetic_withdrawal,
        title: "Apathetic withdrawal",
        description: "Very low extraversion, openness and conscientiousness together leave the character with little drive to engage at all.",
        implications: &[
            "Minimal initiative in conversation",
            "Flat, disengaged responses",
            "Hard to build a storyline around",
        ],
        mitigations: &[
            "Give the character one strong interest",
            "Raise one of the three dimensions",
        ],
    },
    ConflictRule {
        id: "flat-profile",
        severity: Severity::Info,
        category: ConflictCategory::BigFive,
        detect: flat_profile,
        title: "Undifferentiated profile",
        description: "All five dimensions sit between 45 and 55; the character has no defining tendencies.",
        implications: &[
            "Generic, forgettable personality",
            "Responses lack a recognisable voice",
        ],
        mitigations: &["Push at least one or two dimensions towards an extreme"],
    },
    // Facets
    ConflictRule {
        id: "facet-big-five-mismatch",
        severity: Severity::Warning,
        category: ConflictCategory::Facets,
        detect: facet_big_five_mismatch,
        title: "Facet / Big Five mismatch",
        description: "Detailed facets disagree with the Big Five scores they belong to, suggesting a contradictory profile.",
        implications: &[
            "Inconsistent psychological profile",
            "Unpredictable behavior",
            "Possible lack of self-knowledge",
        ],
        mitigations: &[
            "Review and realign the facets",
            "Decide whether the inconsistency is intentional",
            "Re-evaluate the Big Five or the facets",
        ],
    },
    ConflictRule {
        id: "facet-internal-spread",
        severity: Severity::Info,
        category: ConflictCategory::Facets,
        detect: facet_internal_spread,
        title: "Wide facet spread",
        description: "Within one dimension, facets differ by more than 60 points.",
        implications: &[
            "The dimension score hides two very different sides",
            "Behavior may look contradictory across situations",
        ],
        mitigations: &["Explain the split in the backstory or narrow the spread"],
    },
    ConflictRule {
        id: "calm-but-anxious",
        severity: Severity::Warning,
        category: ConflictCategory::Facets,
        detect: calm_but_anxious,
        title: "Calm yet anxious",
        description: "Low neuroticism overall but a very high anxiety facet.",
        implications: &[
            "Emotionally stable on paper, constantly worried in practice",
            "Confusing emotional reactions",
        ],
        mitigations: &["Lower the anxiety facet or raise neuroticism"],
    },
    ConflictRule {
        id: "curious-without-intellect",
        severity: Severity::Info,
        category: ConflictCategory::Facets,
        detect: curious_without_intellect,
        title: "Openness without imagination or intellect",
        description: "High openness while both imagination and intellect are low.",
        implications: &["Openness shows up only as adventurousness or liberal values"],
        mitigations: &["Make the source of the character's openness explicit"],
    },
    ConflictRule {
        id: "solitary-extravert",
        severity: Severity::Info,
        category: ConflictCategory::Facets,
        detect: solitary_extravert,
        title: "Solitary extravert",
        description: "High extraversion with a very low gregariousness facet.",
        implications: &["Energetic and assertive, yet avoids groups"],
        mitigations: &["Frame it as one-on-one sociability"],
    },
    ConflictRule {
        id: "distrustful-agreeableness",
        severity: Severity::Warning,
        category: ConflictCategory::Facets,
        detect: distrustful_agreeableness,
        title: "Distrustful kindness",
        description: "High agreeableness while trust and morality facets are both very low.",
        implications: &[
            "Friendly surface over suspicion and bending of rules",
            "Kindness may read as insincere",
        ],
        mitigations: &["Raise trust or morality, or lower agreeableness"],
    },
    ConflictRule {
        id: "undisciplined-conscientiousness",
        severity: Severity::Info,
        category: ConflictCategory::Facets,
        detect: undisciplined_conscientiousness,
        title: "Conscientious without discipline",
        description: "High conscientiousness with a very low self-discipline facet.",
        implications: &["Values order and duty but cannot stay on task"],
        mitigations: &["Use the gap as a deliberate inner struggle"],
    },
    // Dark Triad
    ConflictRule {
        id: "high-machiavellianism",
        severity: Severity::Warning,
        category: ConflictCategory::DarkTriad,
        detect: high_machiavellianism,
        title: "High machiavellianism",
        description: "High machiavellianism with low agreeableness indicates strategic manipulation and little empathy.",
        implications: &[
            "Systematic manipulation of others",
            "Transactional relationships",
            "No trust in close relationships",
            "Frequent interpersonal conflict",
        ],
        mitigations: &[
            "Show perspective-taking",
            "Acknowledge long-term costs of manipulation",
            "Seek win-win arrangements",
        ],
    },
    ConflictRule {
        id: "extreme-narcissism",
        severity: Severity::Danger,
        category: ConflictCategory::DarkTriad,
        detect: extreme_narcissism,
        title: "Extreme narcissism",
        description: "Very high narcissism seriously interferes with healthy relationships and emotional wellbeing.",
        implications: &[
            "Insatiable need for admiration",
            "Cannot accept criticism",
            "Superficial or exploitative relationships",
            "Extreme sensitivity to narcissistic injury",
        ],
        mitigations: &[
            "Work towards realistic self-acceptance",
            "Develop genuine empathy",
            "Distinguish intrinsic from external worth",
        ],
    },
    ConflictRule {
        id: "psychopathy-indicators",
        severity: Severity::Critical,
        category: ConflictCategory::DarkTriad,
        detect: psychopathy_indicators,
        title: "Psychopathy indicators",
        description: "High psychopathy with very low agreeableness suggests a marked lack of empathy and remorse.",
        implications: &[
            "Severe lack of empathy",
            "Extreme impulsivity",
            "Risk of antisocial behavior",
            "Cannot sustain deep relationships",
        ],
        mitigations: &[
            "Develop compensating strategies",
            "Keep the character in supervised social contexts",
        ],
    },
    ConflictRule {
        id: "dark-triad-cluster",
        severity: Severity::Critical,
        category: ConflictCategory::DarkTriad,
        detect: dark_triad_cluster,
        title: "Full Dark Triad",
        description: "All three Dark Triad dimensions above 60 form a highly problematic personality pattern.",
        implications: &[
            "Complete antisocial pattern",
            "Extremely dysfunctional relationships",
            "High risk of exploitative behavior",
        ],
        mitigations: &[
            "Reduce at least one dimension",
            "Give the character insight into the impact on others",
            "Provide structured support systems",
        ],
    },
    ConflictRule {
        id: "charming-facade",
        severity: Severity::Warning,
        category: ConflictCategory::DarkTriad,
        detect: charming_facade,
        title: "Charming facade",
        description: "A high Dark Triad average alongside high agreeableness; the warmth reads as a mask.",
        implications: &[
            "Kindness that hides calculation",
            "Sudden, jarring reveals of coldness",
        ],
        mitigations: &["Make the facade intentional in the backstory or lower agreeableness"],
    },
    ConflictRule {
        id: "fragile-narcissism",
        severity: Severity::Danger,
        category: ConflictCategory::DarkTriad,
        detect: fragile_narcissism,
        title: "Fragile narcissism",
        description: "High narcissism with high neuroticism: grandiosity that collapses into rage or shame under criticism.",
        implications: &[
            "Explosive reactions to slights",
            "Alternates between grandiosity and despair",
        ],
        mitigations: &["Give the character a stable source of self-worth"],
    },
    ConflictRule {
        id: "reckless-psychopathy",
        severity: Severity::Danger,
        category: ConflictCategory::DarkTriad,
        detect: reckless_psychopathy,
        title: "Reckless psychopathy",
        description: "High psychopathy with very low conscientiousness removes every brake on risky behavior.",
        implications: &[
            "Thrill seeking without regard for consequences",
            "Broken promises and unreliability",
        ],
        mitigations: &["Raise conscientiousness or lower psychopathy"],
    },
    // Attachment
    ConflictRule {
        id: "anxious-attachment-high-neuroticism",
        severity: Severity::Warning,
        category: ConflictCategory::Attachment,
        detect: anxious_attachment_high_neuroticism,
        title: "Anxious attachment + high neuroticism",
        description: "Anxious attachment amplified by high neuroticism intensifies fear of abandonment and need for reassurance.",
        implications: &[
            "Intensified fear of abandonment",
            "Constant need for reassurance",
            "Hypervigilance to signs of rejection",
            "Clinging behavior",
        ],
        mitigations: &[
            "Develop self-soothing",
            "Build tolerance for uncertainty",
            "Communicate needs clearly",
        ],
    },
    ConflictRule {
        id: "avoidant-attachment-low-agreeableness",
        severity: Severity::Warning,
        category: ConflictCategory::Attachment,
        detect: avoidant_attachment_low_agreeableness,
        title: "Avoidant attachment + low agreeableness",
        description: "Avoidant attachment with low agreeableness leads to extreme isolation and lack of intimacy.",
        implications: &[
            "Severe difficulty with intimacy",
            "Chronic emotional isolation",
            "Only superficial relationships",
            "Hidden loneliness",
        ],
        mitigations: &[
            "Gradual exposure to intimacy",
            "Work on emotional vulnerability",
            "Acknowledge the need for connection",
        ],
    },
    ConflictRule {
        id: "fearful-avoidant-paradox",
        severity: Severity::Danger,
        category: ConflictCategory::Attachment,
        detect: fearful_avoidant_paradox,
        title: "Fearful-avoidant paradox",
        description: "Intense fearful-avoidant attachment produces extreme push-pull patterns in relationships.",
        implications: &[
            "Intense push-pull patterns",
            "Chaotic, unstable relationships",
            "Considerable emotional suffering",
        ],
        mitigations: &[
            "Emotional regulation practice",
            "Build inner security",
            "Be explicit about contradictory needs",
        ],
    },
    ConflictRule {
        id: "secure-but-volatile",
        severity: Severity::Info,
        category: ConflictCategory::Attachment,
        detect: secure_but_volatile,
        title: "Secure attachment, volatile emotions",
        description: "Secure attachment is rare alongside neuroticism above 80.",
        implications: &["Relational calm contradicts emotional turbulence"],
        mitigations: &["Consider anxious attachment or lower neuroticism"],
    },
    ConflictRule {
        id: "anxious-but-serene",
        severity: Severity::Info,
        category: ConflictCategory::Attachment,
        detect: anxious_but_serene,
        title: "Anxious attachment, serene temperament",
        description: "Anxious attachment with very low neuroticism; the anxiety has no emotional substrate.",
        implications: &["Fear of abandonment appears without visible distress"],
        mitigations: &["Raise neuroticism or confine the anxiety to one relationship"],
    },
    ConflictRule {
        id: "avoidant-social-butterfly",
        severity: Severity::Info,
        category: ConflictCategory::Attachment,
        detect: avoidant_social_butterfly,
        title: "Avoidant social butterfly",
        description: "Avoidant attachment with very high extraversion: many contacts, no closeness.",
        implications: &["Wide social circle kept at arm's length"],
        mitigations: &["Make the distance visible in one-on-one moments"],
    },
    ConflictRule {
        id: "secure-dark-triad",
        severity: Severity::Warning,
        category: ConflictCategory::Attachment,
        detect: secure_dark_triad,
        title: "Secure attachment with strong Dark Triad",
        description: "A Dark Triad average above 70 rarely coexists with genuinely secure attachment.",
        implications: &["Bonding appears healthy while intentions are exploitative"],
        mitigations: &["Switch to avoidant attachment or lower the Dark Triad"],
    },
    // Cross-dimensional
    ConflictRule {
        id: "low-trust-high-extraversion",
        severity: Severity::Info,
        category: ConflictCategory::CrossDimensional,
        detect: low_trust_high_extraversion,
        title: "Low trust + high extraversion",
        description: "High extraversion with low trust produces many relationships, none of them deep.",
        implications: &[
            "Many relationships but none close",
            "Hard to be vulnerable",
            "Feels alone in a crowd",
        ],
        mitigations: &[
            "Selective vulnerability",
            "Quality over quantity",
            "Identify safe relationships to deepen",
        ],
    },
    ConflictRule {
        id: "high-anxiety-low-self-efficacy",
        severity: Severity::Warning,
        category: ConflictCategory::CrossDimensional,
        detect: high_anxiety_low_self_efficacy,
        title: "High anxiety + low self-efficacy",
        description: "High anxiety with low confidence in one's abilities produces paralysis and avoidance.",
        implications: &[
            "Anticipatory anxiety paralysis",
            "Avoids challenges",
            "Self-fulfilling prophecies of failure",
        ],
        mitigations: &[
            "Gradual competence building",
            "Celebrate small wins",
        ],
    },
    ConflictRule {
        id: "impulsive-narcissist",
        severity: Severity::Danger,
        category: ConflictCategory::CrossDimensional,
        detect: impulsive_narcissist,
        title: "Impulsivity + narcissism",
        description: "High immoderation combined with narcissism leads to risky and grandiose behavior.",
        implications: &[
            "Risk taking without considering consequences",
            "Grandiose, reckless behavior",
            "Relationships damaged by impulsivity",
        ],
        mitigations: &[
            "Develop a pause-and-think habit",
            "Work on humility and realism",
        ],
    },
    ConflictRule {
        id: "achievement-without-discipline",
        severity: Severity::Info,
        category: ConflictCategory::CrossDimensional,
        detect: achievement_without_discipline,
        title: "Ambition without discipline",
        description: "A strong drive to achieve without self-discipline breeds frustration over unmet goals.",
        implications: &[
            "Chronic frustration over unmet goals",
            "Motivation-procrastination cycle",
            "Self-criticism for lack of progress",
        ],
        mitigations: &[
            "Systems and habits",
            "Concrete goals instead of aspirations",
        ],
    },
    ConflictRule {
        id: "possessive-jealousy",
        severity: Severity::Danger,
        category: ConflictCategory::CrossDimensional,
        detect: possessive_jealousy,
        title: "Possessive jealousy",
        description: "Anxious attachment combined with marked narcissism or machiavellianism turns fear of abandonment into control.",
        implications: &[
            "Jealous monitoring of the partner",
            "Guilt-tripping and manipulation to keep closeness",
        ],
        mitigations: &[
            "Keep jealousy verbal, never controlling",
            "Lower the Dark Triad scores",
        ],
    },
    ConflictRule {
        id: "altruistic-manipulator",
        severity: Severity::Warning,
        category: ConflictCategory::CrossDimensional,
        detect: altruistic_manipulator,
        title: "Altruistic manipulator",
        description: "High machiavellianism with a very high altruism facet; help becomes leverage.",
        implications: &["Favours given to create debts"],
        mitigations: &["Decide which side is genuine and lower the other"],
    },
    ConflictRule {
        id: "lonely-introvert",
        severity: Severity::Info,
        category: ConflictCategory::CrossDimensional,
        detect: lonely_introvert,
        title: "Strong need for connection, very introverted",
        description: "A connection need above 0.8 with extraversion below 25.",
        implications: &["Longs for closeness but avoids the situations that create it"],
        mitigations: &["Let closeness come through one trusted relationship"],
    },
    ConflictRule {
        id: "clinging-independence",
        severity: Severity::Warning,
        category: ConflictCategory::CrossDimensional,
        detect: clinging_independence,
        title: "Clinging independence",
        description: "A very high autonomy need paired with anxious attachment.",
        implications: &["Demands space, then panics when given it"],
        mitigations: &["Lower the autonomy need or change attachment style"],
    },
    ConflictRule {
        id: "restless-traditionalist",
        severity: Severity::Info,
        category: ConflictCategory::CrossDimensional,
        detect: restless_traditionalist,
        title: "Restless traditionalist",
        description: "A novelty need above 0.8 with openness below 25.",
        implications: &["Craves change while rejecting new ideas"],
        mitigations: &["Channel novelty into familiar activities"],
    },
];

/// Rules of one category, in table order.
pub fn rules_in_category(
    category: ConflictCategory,
) -> impl Iterator<Item = &'static ConflictRule> {
    CONFLICT_RULES.iter().filter(move |r| r.category == category)
}

/// Rules of one severity, in table order.
pub fn rules_with_severity(severity: Severity) -> impl Iterator<Item = &'static ConflictRule> {
    CONFLICT_RULES.iter().filter(move |r| r.severity == severity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::BigFiveFacets;
    use crate::types::{AttachmentProfile, BigFiveTraits, DarkTriad, PsychologicalNeeds};
    use std::collections::HashSet;

    fn neutral() -> Profile {
        Profile::from_traits(BigFiveTraits::new(60.0, 60.0, 40.0, 60.0, 40.0))
    }

    fn fired(profile: &Profile) -> Vec<&'static str> {
        CONFLICT_RULES
            .iter()
            .filter(|r| (r.detect)(profile))
            .map(|r| r.id)
            .collect()
    }

    #[test]
    fn table_has_unique_ids_and_covers_every_category() {
        assert!(CONFLICT_RULES.len() >= 30);
        let ids: HashSet<&str> = CONFLICT_RULES.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), CONFLICT_RULES.len(), "duplicate rule id");
        for category in ConflictCategory::ALL {
            assert!(rules_in_category(category).count() > 0, "{category:?} empty");
        }
        assert!(rules_with_severity(Severity::Critical).count() >= 2);
    }

    #[test]
    fn every_rule_has_text() {
        for rule in CONFLICT_RULES {
            assert!(!rule.title.is_empty(), "{}", rule.id);
            assert!(!rule.description.is_empty(), "{}", rule.id);
            assert!(!rule.implications.is_empty(), "{}", rule.id);
            assert!(!rule.mitigations.is_empty(), "{}", rule.id);
        }
    }

    #[test]
    fn neutral_profile_fires_nothing() {
        assert!(fired(&neutral()).is_empty());
    }

    #[test]
    fn enrichment_rules_ignore_missing_substructures() {
        // Extreme base scores, but no facets / dark triad / attachment / needs.
        let p = Profile::from_traits(BigFiveTraits::new(10.0, 10.0, 90.0, 10.0, 95.0));
        let ids = fired(&p);
        for rule in CONFLICT_RULES {
            if matches!(
                rule.category,
                ConflictCategory::Facets
                    | ConflictCategory::DarkTriad
                    | ConflictCategory::Attachment
            ) {
                assert!(!ids.contains(&rule.id), "{} fired without data", rule.id);
            }
        }
    }

    #[test]
    fn impulsivity_risk_fires() {
        let p = Profile::from_traits(BigFiveTraits::new(70.0, 25.0, 85.0, 60.0, 50.0));
        assert!(fired(&p).contains(&"impulsivity-risk"));
    }

    #[test]
    fn dark_triad_cluster_fires() {
        let p = neutral().with_dark_triad(DarkTriad {
            machiavellianism: 80.0,
            narcissism: 75.0,
            psychopathy: 65.0,
        });
        assert!(fired(&p).contains(&"dark-triad-cluster"));
    }

    #[test]
    fn facet_mismatch_fires_on_shifted_facets() {
        let traits = BigFiveTraits::new(80.0, 80.0, 80.0, 80.0, 80.0);
        let p = Profile::from_traits(traits).with_facets(BigFiveFacets::default());
        // Deviation of 30 on every dimension.
        assert!(fired(&p).contains(&"facet-big-five-mismatch"));
    }

    #[test]
    fn fearful_avoidant_paradox_needs_intensity() {
        let mild = neutral()
            .with_attachment(AttachmentProfile::new(AttachmentStyle::FearfulAvoidant, 50.0));
        let intense = neutral()
            .with_attachment(AttachmentProfile::new(AttachmentStyle::FearfulAvoidant, 85.0));
        assert!(!fired(&mild).contains(&"fearful-avoidant-paradox"));
        assert!(fired(&intense).contains(&"fearful-avoidant-paradox"));
    }

    #[test]
    fn needs_rules_fire() {
        let mut p = neutral();
        p.traits.extraversion = 20.0;
        let p = p.with_needs(PsychologicalNeeds {
            connection: 0.9,
            ..PsychologicalNeeds::default()
        });
        assert!(fired(&p).contains(&"lonely-introvert"));
    }
}
