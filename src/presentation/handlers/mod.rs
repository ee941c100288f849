mod generate_video;
mod ping;
mod transcribe;

pub use generate_video::generate_video_handler;
pub use ping::ping_handler;
pub use transcribe::transcribe_handler;
