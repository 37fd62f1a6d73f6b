use std::sync::OnceLock;

use tracing::warn;

use crate::config::TRACK_ENV;
use crate::{Tracker, TrackerConfig, TrackerError};

static GLOBAL_TRACKER: OnceLock<Tracker> = OnceLock::new();

/// The process-wide tracker, created on first use.
///
/// Configured from the environment. When `LINGER_TRACK` is set to `all`,
/// `*`, `1` or a type tag, tracking starts immediately with that filter.
pub fn global() -> &'static Tracker {
    GLOBAL_TRACKER.get_or_init(|| {
        let tracker = Tracker::with_config(TrackerConfig::from_env());
        if let Ok(value) = std::env::var(TRACK_ENV) {
            if let Err(err) = apply_track_setting(&tracker, &value) {
                warn!(%err, value = %value, "ignoring {TRACK_ENV}");
            }
        }
        tracker
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TrackSetting {
    Off,
    All,
    Only(String),
}

fn parse_track_setting(value: &str) -> TrackSetting {
    let value = value.trim();
    match value.to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "off" => TrackSetting::Off,
        "1" | "true" | "on" | "all" | "*" => TrackSetting::All,
        _ => TrackSetting::Only(value.to_string()),
    }
}

fn apply_track_setting(tracker: &Tracker, value: &str) -> Result<(), TrackerError> {
    match parse_track_setting(value) {
        TrackSetting::Off => Ok(()),
        TrackSetting::All => {
            tracker.enable_all();
            Ok(())
        }
        TrackSetting::Only(kind) => tracker.enable(Some(&kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Filter, TrackerStatus};
    use linger_types::TypeTag;

    #[test]
    fn track_setting_values() {
        assert_eq!(parse_track_setting(""), TrackSetting::Off);
        assert_eq!(parse_track_setting("off"), TrackSetting::Off);
        assert_eq!(parse_track_setting("0"), TrackSetting::Off);
        assert_eq!(parse_track_setting("1"), TrackSetting::All);
        assert_eq!(parse_track_setting(" ALL "), TrackSetting::All);
        assert_eq!(parse_track_setting("*"), TrackSetting::All);
        assert_eq!(
            parse_track_setting("promise"),
            TrackSetting::Only("promise".to_string())
        );
    }

    #[test]
    fn applying_a_type_enables_a_filtered_session() {
        let tracker = Tracker::new();
        apply_track_setting(&tracker, "Timeout").expect("TIMEOUT is built in");
        assert_eq!(
            tracker.status(),
            TrackerStatus::Enabled(Filter::Only(TypeTag::new("TIMEOUT")))
        );
        tracker.disable();
    }

    #[test]
    fn applying_an_unknown_type_leaves_tracking_off() {
        let tracker = Tracker::new();
        assert_eq!(
            apply_track_setting(&tracker, "NOT_A_TYPE"),
            Err(TrackerError::UnknownType {
                kind: TypeTag::new("NOT_A_TYPE")
            })
        );
        assert_eq!(tracker.status(), TrackerStatus::Disabled);

        assert_eq!(apply_track_setting(&tracker, "off"), Ok(()));
        assert_eq!(tracker.status(), TrackerStatus::Disabled);

        apply_track_setting(&tracker, "all").expect("no filter");
        assert_eq!(tracker.status(), TrackerStatus::Enabled(Filter::All));
        tracker.disable();
    }
}
