pub mod audio_graph;
pub mod audio_recorder;
pub mod audio_session;
pub mod file_reader;
pub mod power_meter;
pub mod sample_converter;
