use analysis_core::{AggregateSentiment, SentimentSample};
use std::collections::HashSet;

/// Combine per-source sentiment samples into one overall score and one
/// de-duplicated headline list.
///
/// A sample whose score is `None` is skipped entirely; per the pairing
/// invariant on [`SentimentSample`] such a sample carries no titles
/// anyway. Each contributing sample adds exactly one scalar to the
/// unweighted mean regardless of how many titles it carries. No
/// clipping or re-normalization is applied after averaging.
///
/// Titles keep first-seen order and are never truncated here; display
/// sampling is the caller's concern.
pub fn aggregate(samples: &[SentimentSample]) -> AggregateSentiment {
    let mut scores: Vec<f64> = Vec::with_capacity(samples.len());
    let mut titles: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for sample in samples {
        let Some(score) = sample.score else {
            continue;
        };
        scores.push(score);

        for title in &sample.titles {
            if seen.insert(title.as_str()) {
                titles.push(title.clone());
            }
        }
    }

    let overall_score = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    };

    AggregateSentiment {
        overall_score,
        titles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::NewsSourceId;

    fn scored(score: f64, titles: &[&str]) -> SentimentSample {
        SentimentSample::scored(
            NewsSourceId::NewsApi,
            score,
            titles.iter().map(|t| t.to_string()).collect(),
        )
    }

    #[test]
    fn empty_input_yields_empty_aggregate() {
        let result = aggregate(&[]);
        assert_eq!(result.overall_score, None);
        assert!(result.titles.is_empty());
    }

    #[test]
    fn mean_of_two_sources() {
        let result = aggregate(&[scored(0.5, &["a"]), scored(-0.5, &["b"])]);
        assert_eq!(result.overall_score, Some(0.0));
        assert_eq!(result.titles, vec!["a", "b"]);
    }

    #[test]
    fn null_score_samples_are_skipped() {
        let result = aggregate(&[
            SentimentSample::empty(NewsSourceId::GNews),
            scored(0.8, &["x"]),
        ]);
        assert_eq!(result.overall_score, Some(0.8));
        assert_eq!(result.titles, vec!["x"]);
    }

    #[test]
    fn all_sources_failed() {
        let result = aggregate(&[
            SentimentSample::empty(NewsSourceId::NewsApi),
            SentimentSample::empty(NewsSourceId::GoogleNewsRss),
        ]);
        assert_eq!(result.overall_score, None);
        assert!(result.titles.is_empty());
    }

    #[test]
    fn titles_deduplicated_across_and_within_sources() {
        let result = aggregate(&[
            scored(0.2, &["Title A", "Title A"]),
            scored(0.4, &["Title A"]),
        ]);
        assert_eq!(result.titles, vec!["Title A"]);
        let mean = result.overall_score.unwrap();
        assert!((mean - 0.3).abs() < 1e-12);
    }

    #[test]
    fn first_seen_order_is_preserved() {
        let result = aggregate(&[
            scored(0.1, &["c", "a"]),
            scored(0.2, &["b", "a", "d"]),
        ]);
        assert_eq!(result.titles, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn one_scalar_per_sample_regardless_of_title_count() {
        let result = aggregate(&[
            scored(1.0, &["a", "b", "c", "d"]),
            scored(0.0, &["e"]),
        ]);
        assert_eq!(result.overall_score, Some(0.5));
    }

    #[test]
    fn aggregation_is_idempotent() {
        let samples = vec![
            scored(0.37, &["alpha", "beta"]),
            SentimentSample::empty(NewsSourceId::GNews),
            scored(-0.12, &["beta", "gamma"]),
        ];
        let first = aggregate(&samples);
        let second = aggregate(&samples);
        assert_eq!(first, second);
        assert_eq!(first.overall_score.unwrap().to_bits(), second.overall_score.unwrap().to_bits());
    }
}
