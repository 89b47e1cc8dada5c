pub(crate) mod config;
pub(crate) mod room_session;
