pub(crate) mod ffmpeg;
pub(crate) mod gif;
pub(crate) mod sink;
pub(crate) mod still;
