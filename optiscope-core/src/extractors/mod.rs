//! Feature extractors for optiscope analysis
//!
//! Extractors turn a validated snippet into the numeric features the
//! classifier, scorer and predictors consume.

pub mod features;

pub use features::FeatureExtractor;
