//! # Tagging pipeline
//!
//! - `environment`: pre-flight preparation of the pre-trained model (lookup, download, load)
//! - `pos_tagging`: part-of-speech tagging and output formatting

pub mod environment;
pub mod pos_tagging;
