use std::fmt;

/// Strength bucket for a scored password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl Category {
    fn from_score(score: u8) -> Self {
        if score >= 80 {
            Category::VeryStrong
        } else if score >= 60 {
            Category::Strong
        } else if score >= 40 {
            Category::Moderate
        } else if score >= 20 {
            Category::Weak
        } else {
            Category::VeryWeak
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::VeryWeak => "Very Weak",
            Category::Weak => "Weak",
            Category::Moderate => "Moderate",
            Category::Strong => "Strong",
            Category::VeryStrong => "Very Strong",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrengthReport {
    pub score: u8,
    pub category: Category,
}

/// Scores any string on a 0..=100 heuristic scale.
///
/// Additive and order-independent: length bucket, one bonus per ASCII
/// character class present, and a variety bonus when at least three classes
/// appear. Total for every input, including the empty string.
pub fn score(password: &str) -> StrengthReport {
    let char_count = password.chars().count();

    let mut score: u32 = if char_count >= 12 {
        25
    } else if char_count >= 8 {
        15
    } else {
        5
    };

    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_punctuation = password.chars().any(|c| c.is_ascii_punctuation());

    if has_lowercase {
        score += 10;
    }
    if has_uppercase {
        score += 10;
    }
    if has_digit {
        score += 15;
    }
    if has_punctuation {
        score += 20;
    }

    let class_count = [has_lowercase, has_uppercase, has_digit, has_punctuation]
        .into_iter()
        .filter(|&present| present)
        .count();

    if class_count >= 3 {
        score += 20;
    }

    let score = score.min(100) as u8;

    StrengthReport {
        score,
        category: Category::from_score(score),
    }
}
