mod client;
mod input_source;
mod wire;

pub use client::{HttpPredictionClient, PredictionClient};
pub use input_source::InputSource;
pub use wire::{ComparePayload, parse_pair, parse_single};
