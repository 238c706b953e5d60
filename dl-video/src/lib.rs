//! dl-video library interface
//!
//! Turns generated lessons into avatar videos: the lesson's voice texts are
//! submitted to the video synthesis API, the job is polled until it
//! finishes, and the finished file is copied into object storage.

pub mod avatar;
pub mod config;
pub mod heygen;
pub mod processor;
pub mod script;

pub use avatar::{Avatar, AvatarCatalog, AvatarIds};
pub use heygen::{HeygenClient, VideoJob, VideoService, VideoStatus};
pub use processor::{GeneratedVideo, LessonVideoProcessor, ProcessorSettings, VideoOutcome};
pub use script::{extract_script, LessonScript};
