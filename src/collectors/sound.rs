use tracing::{debug, warn};

use crate::error::Result;
use crate::models::SoundProfile;
use crate::platform::android::{RINGER_MODE_NORMAL, RINGER_MODE_SILENT, RINGER_MODE_VIBRATE};
use crate::platform::ios::AudioSessionState;

pub struct SoundProfileProbe;

impl SoundProfileProbe {
    /// Capable platform: the ringer mode maps one to one.
    pub fn from_ringer(mode: Result<i32>) -> SoundProfile {
        match mode {
            Ok(RINGER_MODE_NORMAL) => SoundProfile::Sound,
            Ok(RINGER_MODE_VIBRATE) => SoundProfile::Vibrate,
            Ok(RINGER_MODE_SILENT) => SoundProfile::Silent,
            Ok(other) => {
                debug!(mode = other, "Unrecognized ringer mode");
                SoundProfile::Unknown
            }
            Err(e) => {
                warn!("Ringer mode unavailable: {}", e);
                SoundProfile::Unknown
            }
        }
    }

    /// Restricted platform: the hardware silent switch is not observable, so
    /// this never answers `silent` or `vibrate`. A session that expects to play
    /// audio, or one we cannot read, is reported as `sound`.
    pub fn from_audio_session(session: Option<&AudioSessionState>) -> SoundProfile {
        match session {
            Some(state) if state.category.expects_playback() => SoundProfile::Sound,
            Some(state) => {
                // Zero volume is not the silent switch; it only mutes media.
                debug!(category = ?state.category, volume = ?state.output_volume, "Ringer state indeterminate");
                SoundProfile::Sound
            }
            None => SoundProfile::Sound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TelemetryError;
    use crate::platform::ios::AudioCategory;

    #[test]
    fn test_ringer_mapping() {
        assert_eq!(SoundProfileProbe::from_ringer(Ok(2)), SoundProfile::Sound);
        assert_eq!(SoundProfileProbe::from_ringer(Ok(1)), SoundProfile::Vibrate);
        assert_eq!(SoundProfileProbe::from_ringer(Ok(0)), SoundProfile::Silent);
        assert_eq!(SoundProfileProbe::from_ringer(Ok(7)), SoundProfile::Unknown);
        assert_eq!(
            SoundProfileProbe::from_ringer(Err(TelemetryError::platform("getRingerMode", "gone"))),
            SoundProfile::Unknown
        );
    }

    #[test]
    fn test_audio_session_never_silent() {
        let categories = [
            AudioCategory::Ambient,
            AudioCategory::SoloAmbient,
            AudioCategory::Playback,
            AudioCategory::Record,
            AudioCategory::PlayAndRecord,
            AudioCategory::MultiRoute,
            AudioCategory::Unknown,
        ];
        for category in categories {
            for volume in [None, Some(0.0), Some(1.0)] {
                let state = AudioSessionState { category, output_volume: volume };
                assert_eq!(SoundProfileProbe::from_audio_session(Some(&state)), SoundProfile::Sound);
            }
        }
        assert_eq!(SoundProfileProbe::from_audio_session(None), SoundProfile::Sound);
    }
}
