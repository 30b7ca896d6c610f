use std::collections::HashSet;

const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "aren't",
    "wasn't", "weren't", "won't", "wouldn't", "couldn't", "shouldn't",
    "hardly", "barely", "neither", "nor", "without",
];

/// A polarity word within this many tokens after a negation word has its
/// polarity flipped.
const NEGATION_WINDOW: usize = 3;

/// Word-list sentiment scorer. Scores are normalized to [-1, 1] by the
/// number of polarity matches, so a short headline and a long article
/// body land on the same scale.
pub struct SentimentLexicon {
    positive_words: HashSet<&'static str>,
    negative_words: HashSet<&'static str>,
    negation_words: HashSet<&'static str>,
}

impl SentimentLexicon {
    pub fn new() -> Self {
        Self {
            positive_words: [
                "bullish", "rally", "surge", "surges", "gain", "gains", "profit",
                "growth", "beat", "beats", "upgrade", "outperform", "strong",
                "positive", "rise", "rises", "increase", "breakthrough",
                "innovation", "success", "exceed", "exceeds", "momentum", "buy",
                "recommend", "optimistic", "record", "advance", "dividend",
                "buyback", "upside", "recovery", "rebound", "expansion", "robust",
                "accelerating", "raised", "upgraded", "tailwind", "partnership",
                "expanding",
            ]
            .into_iter()
            .collect(),
            negative_words: [
                "bearish", "decline", "declined", "loss", "fall", "falls",
                "plunge", "plunges", "crash", "miss", "misses", "downgrade",
                "underperform", "weak", "negative", "drop", "drops", "decrease",
                "concern", "risk", "fail", "disappoint", "slump", "sell",
                "warning", "warns", "pessimistic", "retreat", "fear", "trouble",
                "headwind", "lawsuit", "litigation", "recall", "investigation",
                "probe", "default", "bankruptcy", "restructuring", "layoff",
                "layoffs", "downside", "overvalued", "lowered", "suspended",
                "uncertainty",
            ]
            .into_iter()
            .collect(),
            negation_words: NEGATION_WORDS.iter().copied().collect(),
        }
    }

    /// Score free text. Total: unmatched text scores 0.0.
    pub fn score_text(&self, text: &str) -> f64 {
        let text_lower = text.to_lowercase();
        let words: Vec<&str> = text_lower
            .split(|c: char| {
                c.is_whitespace() || c == ',' || c == ';' || c == '.' || c == '!' || c == '?'
            })
            .filter(|w| !w.is_empty())
            .collect();

        let negation_positions: Vec<usize> = words
            .iter()
            .enumerate()
            .filter(|(_, w)| self.negation_words.contains(*w))
            .map(|(i, _)| i)
            .collect();

        let mut score: i32 = 0;
        let mut matches: u32 = 0;

        for (i, word) in words.iter().enumerate() {
            let is_positive = self.positive_words.contains(*word);
            let is_negative = self.negative_words.contains(*word);

            if !is_positive && !is_negative {
                continue;
            }
            matches += 1;

            let negated = negation_positions
                .iter()
                .any(|&neg_pos| neg_pos < i && (i - neg_pos) <= NEGATION_WINDOW);

            if is_positive {
                score += if negated { -1 } else { 1 };
            } else {
                score += if negated { 1 } else { -1 };
            }
        }

        if matches == 0 {
            0.0
        } else {
            f64::from(score) / f64::from(matches)
        }
    }
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        Self::new()
    }
}
