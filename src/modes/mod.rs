pub mod collect;
pub mod human;
pub mod inspect;

pub use collect::{CollectConfig, CollectMode, EpisodeSummary};
pub use human::HumanMode;
pub use inspect::InspectMode;
