use analysis_core::{EventImpact, FinancialEvent, ImpactLevel, TradeSignal};

/// Keyword table routing news text to event tags. Scanned in order; each
/// tag is reported at most once.
const EVENT_KEYWORDS: &[(FinancialEvent, &[&str])] = &[
    (
        FinancialEvent::Earnings,
        &["earnings", "quarterly", "results", "eps", "net profit", "revenue"],
    ),
    (
        FinancialEvent::Guidance,
        &["guidance", "outlook", "forecast"],
    ),
    (
        FinancialEvent::MergerAcquisition,
        &["merger", "acquisition", "acquire", "buyout", "takeover", "spin-off", "spinoff"],
    ),
    (
        FinancialEvent::Partnership,
        &["partnership", "joint venture", "collaboration", "alliance"],
    ),
    (
        FinancialEvent::Restructuring,
        &["restructuring", "cost-cutting", "cost cutting", "layoff", "downsizing"],
    ),
    (
        FinancialEvent::Legal,
        &["lawsuit", "litigation", "settlement", "sued", "court", "indictment"],
    ),
    (
        FinancialEvent::Regulatory,
        &["antitrust", "anti-trust", "regulator", "fda", "sec", "doj", "probe", "investigation"],
    ),
    (
        FinancialEvent::ProductLaunch,
        &["launch", "unveil", "new product", "patent"],
    ),
    (
        FinancialEvent::CapitalReturn,
        &["dividend", "buyback", "repurchase", "stock split"],
    ),
    (
        FinancialEvent::ManagementChange,
        &["ceo", "cfo", "resign", "appoint", "board reshuffle"],
    ),
];

/// Extract named financial events from free text. Case-insensitive,
/// each tag at most once, in table order. Total: unmatched text yields
/// an empty list.
pub fn extract_events(text: &str) -> Vec<FinancialEvent> {
    let text_lower = text.to_lowercase();

    EVENT_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| matches_keyword(&text_lower, kw)))
        .map(|(event, _)| *event)
        .collect()
}

/// Longer keywords match as substrings so stems cover their inflections
/// ("launch" hits "launched"). Short acronyms ("sec", "doj", "eps",
/// "ceo") match whole tokens only; a substring would hit "sector".
fn matches_keyword(text: &str, keyword: &str) -> bool {
    if keyword.len() > 3 {
        text.contains(keyword)
    } else {
        text.split(|c: char| !c.is_alphanumeric())
            .any(|token| token == keyword)
    }
}

fn sentiment_band(sentiment: f64) -> i32 {
    if sentiment >= 0.5 {
        2
    } else if sentiment >= 0.15 {
        1
    } else if sentiment <= -0.5 {
        -2
    } else if sentiment <= -0.15 {
        -1
    } else {
        0
    }
}

fn level_from_score(score: i32) -> ImpactLevel {
    match score.clamp(-2, 2) {
        -2 => ImpactLevel::StronglyNegative,
        -1 => ImpactLevel::Negative,
        0 => ImpactLevel::Neutral,
        1 => ImpactLevel::Positive,
        _ => ImpactLevel::StronglyPositive,
    }
}

/// Assess the qualitative price impact of a set of events given the
/// sentiment of the text they came from. Total and pure; alerts are
/// human-readable callouts for the high-impact event classes.
pub fn assess_impact(events: &[FinancialEvent], sentiment: f64) -> (EventImpact, Vec<String>) {
    let mut short_score = sentiment_band(sentiment);
    let mut long_score: i32 = 0;
    let mut alerts = Vec::new();

    for event in events {
        match event {
            FinancialEvent::Legal => {
                short_score -= 1;
                long_score -= 1;
                alerts.push("Ongoing legal action adds uncertainty".to_string());
            }
            FinancialEvent::Regulatory => {
                short_score -= 1;
                long_score -= 1;
                alerts.push("Regulatory scrutiny may weigh on the stock".to_string());
            }
            FinancialEvent::Restructuring => {
                short_score -= 1;
                alerts.push(
                    "Restructuring signals near-term costs, possible long-term efficiency gains"
                        .to_string(),
                );
            }
            FinancialEvent::MergerAcquisition => {
                // M&A amplifies whatever direction the text already leans
                short_score += if short_score >= 0 { 1 } else { -1 };
                alerts.push("M&A activity: expect elevated volatility".to_string());
            }
            FinancialEvent::Partnership | FinancialEvent::ProductLaunch => {
                long_score += 1;
            }
            FinancialEvent::CapitalReturn => {
                short_score += 1;
                long_score += 1;
            }
            FinancialEvent::ManagementChange => {
                alerts.push("Leadership change noted".to_string());
            }
            FinancialEvent::Earnings | FinancialEvent::Guidance => {
                // Direction already captured by the text's sentiment band
            }
        }
    }

    let long_term = if events.is_empty() {
        None
    } else {
        Some(level_from_score(long_score))
    };

    let impact = EventImpact {
        events: events.to_vec(),
        short_term: level_from_score(short_score),
        long_term,
    };

    (impact, alerts)
}

/// Map assessed short-term impact to a trade signal. Total over the
/// full `ImpactLevel` enumeration; `Unknown` degrades to `Hold`.
pub fn derive_signal(impact: &EventImpact) -> TradeSignal {
    match impact.short_term {
        ImpactLevel::StronglyPositive => TradeSignal::StrongBuy,
        ImpactLevel::Positive => TradeSignal::Buy,
        ImpactLevel::Neutral => TradeSignal::Hold,
        ImpactLevel::Negative => TradeSignal::Sell,
        ImpactLevel::StronglyNegative => TradeSignal::StrongSell,
        ImpactLevel::Unknown => TradeSignal::Hold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_each_tag_at_most_once() {
        let events = extract_events(
            "Company announced strong quarterly earnings; earnings beat expectations. \
             A new strategic partnership was also announced.",
        );
        assert_eq!(
            events,
            vec![FinancialEvent::Earnings, FinancialEvent::Partnership]
        );
    }

    #[test]
    fn extraction_is_case_insensitive() {
        let events = extract_events("DOJ files ANTITRUST LAWSUIT");
        assert!(events.contains(&FinancialEvent::Legal));
        assert!(events.contains(&FinancialEvent::Regulatory));
    }

    #[test]
    fn short_acronyms_match_on_token_boundaries() {
        assert!(extract_events("Company fined by the SEC.").contains(&FinancialEvent::Regulatory));
        assert!(extract_events("fined by the SEC").contains(&FinancialEvent::Regulatory));
        assert!(extract_events("tech sector rotation continued").is_empty());
        assert!(extract_events("EPS beat expectations").contains(&FinancialEvent::Earnings));
    }

    #[test]
    fn no_events_in_plain_text() {
        assert!(extract_events("shares traded sideways today").is_empty());
    }

    #[test]
    fn legal_events_drag_impact_down() {
        let (impact, alerts) = assess_impact(&[FinancialEvent::Legal], 0.0);
        assert_eq!(impact.short_term, ImpactLevel::Negative);
        assert_eq!(impact.long_term, Some(ImpactLevel::Negative));
        assert!(!alerts.is_empty());
    }

    #[test]
    fn positive_sentiment_with_no_events_is_positive_and_quiet() {
        let (impact, alerts) = assess_impact(&[], 0.6);
        assert_eq!(impact.short_term, ImpactLevel::StronglyPositive);
        assert_eq!(impact.long_term, None);
        assert!(alerts.is_empty());
    }

    #[test]
    fn merger_amplifies_direction() {
        let (up, _) = assess_impact(&[FinancialEvent::MergerAcquisition], 0.2);
        assert_eq!(up.short_term, ImpactLevel::StronglyPositive);

        let (down, _) = assess_impact(&[FinancialEvent::MergerAcquisition], -0.2);
        assert_eq!(down.short_term, ImpactLevel::StronglyNegative);
    }

    #[test]
    fn impact_score_is_clamped() {
        let events = [
            FinancialEvent::Legal,
            FinancialEvent::Regulatory,
            FinancialEvent::Restructuring,
        ];
        let (impact, _) = assess_impact(&events, -0.9);
        assert_eq!(impact.short_term, ImpactLevel::StronglyNegative);
    }

    #[test]
    fn derive_signal_is_total() {
        for level in ImpactLevel::ALL {
            let impact = EventImpact {
                events: vec![],
                short_term: level,
                long_term: None,
            };
            // Must return a defined signal for every level without panicking
            let _ = derive_signal(&impact);
        }
    }

    #[test]
    fn signal_table() {
        let table = [
            (ImpactLevel::StronglyPositive, TradeSignal::StrongBuy),
            (ImpactLevel::Positive, TradeSignal::Buy),
            (ImpactLevel::Neutral, TradeSignal::Hold),
            (ImpactLevel::Negative, TradeSignal::Sell),
            (ImpactLevel::StronglyNegative, TradeSignal::StrongSell),
            (ImpactLevel::Unknown, TradeSignal::Hold),
        ];
        for (level, expected) in table {
            let impact = EventImpact {
                events: vec![],
                short_term: level,
                long_term: None,
            };
            assert_eq!(derive_signal(&impact), expected);
        }
    }
}
