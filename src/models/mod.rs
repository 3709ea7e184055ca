mod app_record;
mod usage_record;
mod sound_profile;
mod capabilities;

pub use app_record::AppRecord;
pub use usage_record::UsageRecord;
pub use sound_profile::SoundProfile;
pub use capabilities::Capabilities;
