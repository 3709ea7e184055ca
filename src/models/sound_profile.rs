use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundProfile {
    Sound,
    Vibrate,
    Silent,
    Unknown,
}

impl SoundProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundProfile::Sound => "sound",
            SoundProfile::Vibrate => "vibrate",
            SoundProfile::Silent => "silent",
            SoundProfile::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SoundProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
