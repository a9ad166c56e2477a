pub mod ffmpeg_source;
pub mod ffmpeg_writer;
