pub mod arrangement;
pub mod error;
pub mod track;

pub use crate::arrangement::Arrangement;
pub use crate::error::TrackError;
pub use crate::track::{
    share, EnvelopeTrack, Member, Sample, SharedSet, SharedTrack, Track, TrackId, TrackSet,
    TrackSetBuilder, TrackSummary,
};

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sample rate used by arrangements that don't name one.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// WASM-exposed: return the trackmix version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: perform a JSON arrangement and render it to mono f32 samples.
#[wasm_bindgen]
pub fn render_arrangement_samples(json: &str) -> Result<Vec<f32>, JsValue> {
    let arrangement = Arrangement::from_json(json).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    let samples = arrangement
        .render()
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(samples.iter().map(|&s| s as f32).collect())
}

/// WASM-exposed: perform a JSON arrangement and return a summary of the final tree.
#[wasm_bindgen]
pub fn describe_arrangement(json: &str) -> Result<JsValue, JsValue> {
    let summary = Arrangement::from_json(json)
        .and_then(|a| a.describe())
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    serde_wasm_bindgen::to_value(&summary).map_err(|e| JsValue::from_str(&format!("{e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_matches_manifest() {
        assert_eq!(core_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn renders_arrangement_to_f32() {
        let json = r#"{
          "sample_rate": 100,
          "tracks": {
            "a": { "kind": "envelope", "volume": 0.25, "seconds": 1.0 },
            "b": { "kind": "envelope", "volume": 0.5, "seconds": 2.0 }
          },
          "steps": [ { "op": "even_out" } ]
        }"#;
        let samples = render_arrangement_samples(json).unwrap();
        assert_eq!(samples.len(), 200);
        assert!(samples.iter().all(|&s| (s - 0.75).abs() < 1e-6), "even_out should hold both levels");
    }
}
