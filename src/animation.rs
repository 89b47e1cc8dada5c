pub(crate) mod ease;
pub(crate) mod export;
pub(crate) mod preview;
pub(crate) mod step;
