mod audio_decoder;
mod candle_whisper_model;

pub use audio_decoder::decode_audio_file;
pub use candle_whisper_model::{CandleWhisperFactory, CandleWhisperModel};
