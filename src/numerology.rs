//! Chaldean numerology engine and Chinese zodiac tables.
//!
//! Values reduce to a single digit unless they land on a master number
//! (11, 22, 33). Some computations must preserve masters and others must
//! collapse them; [`reduce`] and [`reduce_forced`] are both public and the
//! caller always picks one explicitly.

use serde::Serialize;

// ---------------------------
// ## Reduction
// ---------------------------

/// Master-preserving reduction: repeatedly sum decimal digits until the
/// value is a single digit or exactly 11, 22 or 33.
pub fn reduce(mut n: u32) -> u32 {
    while n > 9 && n != 11 && n != 22 && n != 33 {
        n = digit_sum(n);
    }
    n
}

/// Forced reduction to a single digit. Master numbers are collapsed too.
pub fn reduce_forced(mut n: u32) -> u32 {
    while n > 9 {
        n = digit_sum(n);
    }
    n
}

fn digit_sum(mut n: u32) -> u32 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

// ---------------------------
// ## Chaldean scoring
// ---------------------------

/// Chaldean value of a single letter. Unmapped characters score 0.
pub fn chaldean_letter(c: char) -> u32 {
    match c.to_ascii_uppercase() {
        'A' | 'I' | 'J' | 'Q' | 'Y' => 1,
        'B' | 'K' | 'R' => 2,
        'C' | 'G' | 'L' | 'S' => 3,
        'D' | 'M' | 'T' => 4,
        'E' | 'H' | 'N' | 'X' => 5,
        'U' | 'V' | 'W' => 6,
        'O' | 'Z' => 7,
        'F' | 'P' => 8,
        _ => 0,
    }
}

/// Score one token: digits add their numeric value, letters their Chaldean
/// value, anything else adds 0; the total is master-preserving-reduced.
/// The literal strings "11", "22" and "33" pass through unreduced.
pub fn chaldean_value(token: &str) -> u32 {
    match token {
        "11" => return 11,
        "22" => return 22,
        "33" => return 33,
        _ => {}
    }

    let mut total = 0;
    for c in token.chars() {
        total += match c.to_digit(10) {
            Some(d) => d,
            None => chaldean_letter(c),
        };
    }
    reduce(total)
}

/// Numerology value of a sequence of input strings.
///
/// Each input splits on spaces and its tokens are scored independently and
/// summed; the running accumulator is then re-reduced through
/// [`chaldean_value`] after every input. The per-token pass is what lets a
/// multi-word input reach a master number that a flat digit sum over the
/// same characters would not.
pub fn value_of(inputs: &[&str]) -> u32 {
    let mut acc: u32 = 0;
    for input in inputs {
        let token_total: u32 = input.split(' ').map(chaldean_value).sum();
        acc = chaldean_value(&(acc + token_total).to_string());
    }
    acc
}

// ---------------------------
// ## Number meanings
// ---------------------------

/// Meaning text for a numerology value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumerologyMeaning {
    pub meaning: &'static str,
    pub description: &'static str,
}

/// Meaning and description for the values 1-9, 11, 22 and 33.
pub fn number_meaning(n: u32) -> Option<NumerologyMeaning> {
    let (meaning, description) = match n {
        1 => (
            "The Leader",
            "masculine, independent, direct, leadership, originality, courage, new beginnings",
        ),
        2 => ("The Peacemaker", "feminine, partnership, balance, peaceful"),
        3 => ("The Communicator", "social, network, friendships, cheating"),
        4 => (
            "The Worker",
            "stability, security, responsibility, overworking",
        ),
        5 => ("The Adventurer", "change, travel, movement, chaos"),
        6 => (
            "The Nurturer",
            "family, pets, romance, intimacy, overgiving",
        ),
        7 => ("The Seeker", "spirituality, creativity, artistic"),
        8 => (
            "The Achiever",
            "money, karma, power, privacy, make money fast, lose money fast",
        ),
        9 => (
            "The Humanitarian",
            "wisdom, growth, mastery, shamanic journey",
        ),
        11 => (
            "The Visionary",
            "partnership, inspiration, intuition, and enlightenment, visionary, the dreamer, and the seer. It is the number of the psychic, the healer, and the teacher.",
        ),
        22 => (
            "The Master Builder",
            "building mastery, power, and achievement, master builder, the architect, and the engineer. It is the number of the visionary, the leader, and the manager.",
        ),
        33 => (
            "The Master Teacher",
            "compassion, healing, and guidance, master teacher, the counselor, and the mentor. It is the number of the humanitarian, the philanthropist, and the healer.",
        ),
        _ => return None,
    };
    Some(NumerologyMeaning {
        meaning,
        description,
    })
}

// ---------------------------
// ## Chinese zodiac
// ---------------------------

/// The 12 Chinese zodiac animals in cycle order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ChineseZodiac {
    Rat,
    Ox,
    Tiger,
    Rabbit,
    Dragon,
    Snake,
    Horse,
    Goat,
    Monkey,
    Rooster,
    Dog,
    Pig,
}

/// Animals in cycle order starting at Rat.
pub const ZODIAC_CYCLE: [ChineseZodiac; 12] = [
    ChineseZodiac::Rat,
    ChineseZodiac::Ox,
    ChineseZodiac::Tiger,
    ChineseZodiac::Rabbit,
    ChineseZodiac::Dragon,
    ChineseZodiac::Snake,
    ChineseZodiac::Horse,
    ChineseZodiac::Goat,
    ChineseZodiac::Monkey,
    ChineseZodiac::Rooster,
    ChineseZodiac::Dog,
    ChineseZodiac::Pig,
];

impl ChineseZodiac {
    /// Animal for a Gregorian year: `cycle[(year - 4) mod 12]`.
    pub fn for_year(year: i32) -> Self {
        ZODIAC_CYCLE[(year - 4).rem_euclid(12) as usize]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Rat => "Rat",
            Self::Ox => "Ox",
            Self::Tiger => "Tiger",
            Self::Rabbit => "Rabbit",
            Self::Dragon => "Dragon",
            Self::Snake => "Snake",
            Self::Horse => "Horse",
            Self::Goat => "Goat",
            Self::Monkey => "Monkey",
            Self::Rooster => "Rooster",
            Self::Dog => "Dog",
            Self::Pig => "Pig",
        }
    }

    /// Meaning block for the animal.
    pub const fn meaning(self) -> ZodiacMeaning {
        match self {
            Self::Rat => ZodiacMeaning {
                themes: "Intelligence, strategy, adaptability, alertness",
                challenges: "Sneakiness, overthinking, anxiety, control",
                gifts: "Clever solutions, resourcefulness, sharp instincts",
                reflection: "Where am I trying to manipulate or outsmart life instead of trusting my wisdom?",
            },
            Self::Ox => ZodiacMeaning {
                themes: "Stability, discipline, patience, perseverance",
                challenges: "Stubbornness, rigidity, emotional detachment",
                gifts: "Long-term strength, grounded action, reliability",
                reflection: "What belief am I holding onto that\u{2019}s keeping me stuck?",
            },
            Self::Tiger => ZodiacMeaning {
                themes: "Courage, boldness, independence, rebellion",
                challenges: "Impulsiveness, ego, aggressive dominance",
                gifts: "Fearless leadership, catalytic energy, protector spirit",
                reflection: "Where can I channel my fire into inspired action instead of reaction?",
            },
            Self::Rabbit => ZodiacMeaning {
                themes: "Grace, diplomacy, softness, intuition",
                challenges: "Avoidance, fear of conflict, indecision",
                gifts: "Peacekeeping, beauty, emotional intelligence",
                reflection: "Where am I avoiding discomfort that would help me grow?",
            },
            Self::Dragon => ZodiacMeaning {
                themes: "Power, charisma, innovation, spiritual strength",
                challenges: "Arrogance, drama, control issues",
                gifts: "Visionary potential, magnetism, transformative force",
                reflection: "Am I embodying power through presence or projection?",
            },
            Self::Snake => ZodiacMeaning {
                themes: "Wisdom, mysticism, charm, strategy",
                challenges: "Manipulation, secrecy, jealousy",
                gifts: "Deep perception, seduction, psychological mastery",
                reflection: "Where can I speak truth instead of hiding behind illusion?",
            },
            Self::Horse => ZodiacMeaning {
                themes: "Freedom, movement, joy, momentum",
                challenges: "Restlessness, burnout, lack of follow-through",
                gifts: "Inspiration, speed, trailblazing spirit",
                reflection: "What does freedom actually mean to me now?",
            },
            Self::Goat => ZodiacMeaning {
                themes: "Compassion, creativity, gentleness, emotional depth",
                challenges: "Over-sensitivity, indecision, dependency",
                gifts: "Artistic gifts, healing energy, nurturing leadership",
                reflection: "Where can I hold myself the way I hold others?",
            },
            Self::Monkey => ZodiacMeaning {
                themes: "Wit, playfulness, innovation, communication",
                challenges: "Scattered energy, deception, performance-based identity",
                gifts: "Creative genius, joyful expression, sharp thinking",
                reflection: "Am I being clever or being real?",
            },
            Self::Rooster => ZodiacMeaning {
                themes: "Precision, integrity, beauty, truth",
                challenges: "Perfectionism, judgment, rigidity",
                gifts: "Clarity, style, accountability",
                reflection: "What would shift if I let go of being right?",
            },
            Self::Dog => ZodiacMeaning {
                themes: "Loyalty, justice, protection, community",
                challenges: "Cynicism, fear-based loyalty, defensiveness",
                gifts: "Grounded faith, service, honorable leadership",
                reflection: "Is my loyalty empowering or enabling?",
            },
            Self::Pig => ZodiacMeaning {
                themes: "Compassion, pleasure, abundance, sensuality",
                challenges: "Laziness, indulgence, victimhood",
                gifts: "Emotional generosity, deep joy, spiritual softness",
                reflection: "Where am I confusing comfort with fulfillment?",
            },
        }
    }
}

/// Themes, challenges, gifts and a reflection prompt for one animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZodiacMeaning {
    pub themes: &'static str,
    pub challenges: &'static str,
    pub gifts: &'static str,
    pub reflection: &'static str,
}

// ---------------------------
// ## Compatibility matrix
// ---------------------------

/// Compatibility between two zodiac animals, six labels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Compatibility {
    #[serde(rename = "perfect match")]
    Perfect,
    #[serde(rename = "good match")]
    Good,
    #[serde(rename = "above average")]
    AboveAverage,
    #[serde(rename = "average")]
    Average,
    #[serde(rename = "good match OR enemy")]
    Ambiguous,
    #[serde(rename = "worst")]
    Worst,
}

impl Compatibility {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Perfect => "perfect match",
            Self::Good => "good match",
            Self::AboveAverage => "above average",
            Self::Average => "average",
            Self::Ambiguous => "good match OR enemy",
            Self::Worst => "worst",
        }
    }
}

// Matrix rows and columns run in a fixed Ox-first order, distinct from the
// year cycle above.
const fn matrix_index(z: ChineseZodiac) -> usize {
    match z {
        ChineseZodiac::Ox => 0,
        ChineseZodiac::Tiger => 1,
        ChineseZodiac::Rabbit => 2,
        ChineseZodiac::Dragon => 3,
        ChineseZodiac::Snake => 4,
        ChineseZodiac::Horse => 5,
        ChineseZodiac::Goat => 6,
        ChineseZodiac::Monkey => 7,
        ChineseZodiac::Rooster => 8,
        ChineseZodiac::Dog => 9,
        ChineseZodiac::Pig => 10,
        ChineseZodiac::Rat => 11,
    }
}

use Compatibility::{
    AboveAverage as D, Ambiguous as Q, Average as N, Good as T, Perfect as H, Worst as X,
};

/// Row = first animal (home year), column = second animal (birth year).
const COMPATIBILITY_MATRIX: [[Compatibility; 12]; 12] = [
    [N, X, D, X, D, X, X, H, H, D, Q, H], // Ox
    [X, X, N, H, X, H, T, X, D, D, H, N], // Tiger
    [D, N, N, N, X, N, H, H, X, H, H, H], // Rabbit
    [X, H, N, T, H, N, X, D, D, X, T, H], // Dragon
    [D, X, X, H, X, T, X, T, H, N, X, T], // Snake
    [X, H, N, N, T, X, H, N, X, N, D, X], // Horse
    [X, T, H, X, X, H, D, D, N, X, H, Q], // Goat
    [H, X, H, D, T, N, D, T, N, D, X, H], // Monkey
    [H, D, X, D, H, X, N, N, X, X, N, X], // Rooster
    [D, D, H, X, N, N, X, D, X, N, D, D], // Dog
    [Q, H, H, T, X, D, H, X, N, D, T, D], // Pig
    [H, N, H, H, T, X, Q, H, X, D, D, N], // Rat
];

/// Compatibility of a pair of animals, first typically the home year and
/// second the birth year.
pub fn compatibility(first: ChineseZodiac, second: ChineseZodiac) -> Compatibility {
    COMPATIBILITY_MATRIX[matrix_index(first)][matrix_index(second)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduce_fixed_points() {
        for n in [1, 2, 3, 4, 5, 6, 7, 8, 9, 11, 22, 33] {
            assert_eq!(reduce(n), n);
        }
    }

    #[test]
    fn reduce_converges_to_fixed_point() {
        let fixed = [1, 2, 3, 4, 5, 6, 7, 8, 9, 11, 22, 33];
        for n in 1..10_000u32 {
            assert!(fixed.contains(&reduce(n)), "reduce({n}) = {}", reduce(n));
        }
    }

    #[test]
    fn reduce_preserves_masters_mid_chain() {
        // 29 -> 11 stops there; 56 -> 11 as well.
        assert_eq!(reduce(29), 11);
        assert_eq!(reduce(56), 11);
        assert_eq!(reduce(49), 22);
    }

    #[test]
    fn reduce_forced_collapses_masters() {
        assert_eq!(reduce_forced(11), 2);
        assert_eq!(reduce_forced(22), 4);
        assert_eq!(reduce_forced(33), 6);
        assert_eq!(reduce_forced(29), 2);
    }

    #[test]
    fn chaldean_letters() {
        assert_eq!(chaldean_letter('A'), 1);
        assert_eq!(chaldean_letter('f'), 8);
        assert_eq!(chaldean_letter('Z'), 7);
        assert_eq!(chaldean_letter('-'), 0);
    }

    #[test]
    fn chaldean_value_mixes_digits_and_letters() {
        // O+A+K = 7+1+2 = 10 -> 1
        assert_eq!(chaldean_value("Oak"), 1);
        // 1+2+3 = 6
        assert_eq!(chaldean_value("123"), 6);
    }

    #[test]
    fn chaldean_value_master_literals() {
        assert_eq!(chaldean_value("11"), 11);
        assert_eq!(chaldean_value("22"), 22);
        assert_eq!(chaldean_value("33"), 33);
        // Not a literal master: reduces normally.
        assert_eq!(chaldean_value("110"), 2);
    }

    #[test]
    fn value_of_tokenized_date_reaches_master() {
        // Per-token reduction: 2026 -> 1, 01 -> 1, 09 -> 9, sum 11 preserved.
        assert_eq!(value_of(&["2026", "01", "09"]), 11);
        assert_eq!(value_of(&["2026 01 09"]), 11);
        // Flat digit sum over the same characters reduces all the way down.
        assert_eq!(value_of(&["20260109"]), 2);
    }

    #[test]
    fn value_of_accumulates_across_calls() {
        // Life path for 2002-08-28: digit sum 22, preserved as a master.
        assert_eq!(value_of(&["20020828"]), 22);
    }

    #[test]
    fn value_of_empty_input() {
        assert_eq!(value_of(&[]), 0);
        assert_eq!(value_of(&[""]), 0);
    }

    #[test]
    fn zodiac_known_years() {
        assert_eq!(ChineseZodiac::for_year(2002), ChineseZodiac::Horse);
        assert_eq!(ChineseZodiac::for_year(1996), ChineseZodiac::Rat);
        assert_eq!(ChineseZodiac::for_year(2000), ChineseZodiac::Dragon);
    }

    #[test]
    fn zodiac_period_is_twelve() {
        for year in 1900..2100 {
            assert_eq!(
                ChineseZodiac::for_year(year),
                ChineseZodiac::for_year(year + 12)
            );
        }
    }

    #[test]
    fn compatibility_pinned_cells() {
        use ChineseZodiac::*;
        assert_eq!(compatibility(Dragon, Horse), Compatibility::Average);
        assert_eq!(compatibility(Ox, Monkey), Compatibility::Perfect);
        assert_eq!(compatibility(Goat, Tiger), Compatibility::Good);
        assert_eq!(compatibility(Ox, Rabbit), Compatibility::AboveAverage);
        assert_eq!(compatibility(Ox, Pig), Compatibility::Ambiguous);
        assert_eq!(compatibility(Tiger, Ox), Compatibility::Worst);
    }

    #[test]
    fn compatibility_pairs_agree_in_both_orders() {
        use ChineseZodiac::*;
        assert_eq!(compatibility(Snake, Dog), Compatibility::Average);
        assert_eq!(compatibility(Dog, Snake), Compatibility::Average);
        assert_eq!(compatibility(Rooster, Tiger), Compatibility::AboveAverage);
        assert_eq!(compatibility(Tiger, Rooster), Compatibility::AboveAverage);
        assert_eq!(compatibility(Horse, Goat), Compatibility::Perfect);
        assert_eq!(compatibility(Goat, Horse), Compatibility::Perfect);
        assert_eq!(compatibility(Monkey, Pig), Compatibility::Worst);
        assert_eq!(compatibility(Pig, Monkey), Compatibility::Worst);
    }

    #[test]
    fn meanings_cover_all_values() {
        for n in [1, 2, 3, 4, 5, 6, 7, 8, 9, 11, 22, 33] {
            assert!(number_meaning(n).is_some(), "missing meaning for {n}");
        }
        assert!(number_meaning(10).is_none());
        assert!(number_meaning(0).is_none());
    }

    #[test]
    fn labels_match_vocabulary() {
        assert_eq!(Compatibility::Perfect.label(), "perfect match");
        assert_eq!(Compatibility::Ambiguous.label(), "good match OR enemy");
    }
}
