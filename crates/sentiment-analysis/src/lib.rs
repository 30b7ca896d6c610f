pub mod aggregate;
pub mod events;
pub mod lexicon;

pub use aggregate::aggregate;
pub use events::{assess_impact, derive_signal, extract_events};
pub use lexicon::SentimentLexicon;
