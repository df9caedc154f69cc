pub mod synthesizer;

pub use synthesizer::{AudioItemRequest, Reply, ResponseSynthesizer};
