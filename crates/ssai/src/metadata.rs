//! Timed metadata forwarding to the ad-stream source.

use std::collections::BTreeMap;

use tracing::trace;

use crate::effect::Effect;
use crate::types::TimelineRegion;

/// Forward a manifest timeline region if it carries ad-stream metadata.
pub(crate) fn forward_timeline_region(region: TimelineRegion, dai_scheme_id_uri: &str) -> Vec<Effect> {
    if region.scheme_id_uri != dai_scheme_id_uri {
        trace!(scheme = %region.scheme_id_uri, "Ignoring timeline region");
        return Vec::new();
    }

    vec![Effect::ProcessMetadata {
        scheme_id_uri: region.scheme_id_uri,
        data: region.message_data,
        timestamp: region.start_time,
    }]
}

/// Forward one in-band metadata cue as a single-entry map.
pub(crate) fn forward_timed_metadata(key: String, data: String) -> Vec<Effect> {
    let mut metadata = BTreeMap::new();
    metadata.insert(key, data);
    vec![Effect::TimedMetadata(metadata)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DAI_SCHEME_ID_URI;

    #[test]
    fn test_matching_scheme_is_forwarded() {
        let region = TimelineRegion {
            scheme_id_uri: DEFAULT_DAI_SCHEME_ID_URI.to_string(),
            message_data: Some("google_1234".to_string()),
            start_time: 42.0,
        };

        assert_eq!(
            forward_timeline_region(region, DEFAULT_DAI_SCHEME_ID_URI),
            vec![Effect::ProcessMetadata {
                scheme_id_uri: DEFAULT_DAI_SCHEME_ID_URI.to_string(),
                data: Some("google_1234".to_string()),
                timestamp: 42.0,
            }]
        );
    }

    #[test]
    fn test_other_scheme_is_ignored() {
        let region = TimelineRegion {
            scheme_id_uri: "urn:scte:scte35:2014:xml+bin".to_string(),
            message_data: None,
            start_time: 42.0,
        };

        assert!(forward_timeline_region(region, DEFAULT_DAI_SCHEME_ID_URI).is_empty());
    }

    #[test]
    fn test_timed_metadata_single_entry() {
        let effects = forward_timed_metadata("TXXX".to_string(), "google_abc".to_string());
        let Effect::TimedMetadata(map) = &effects[0] else {
            panic!("expected timed metadata effect");
        };
        assert_eq!(map.len(), 1);
        assert_eq!(map["TXXX"], "google_abc");
    }
}
