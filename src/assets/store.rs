use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use rayon::prelude::*;

use crate::{
    assets::decode::{DecodedImage, ImageDecoder, ImageId},
    foundation::error::{TilewallError, TilewallResult},
    foundation::math::Fnv1a64,
};

/// Where the encoded bytes of a tile or floor image come from.
///
/// Two sources with the same [`ImageSource::key`] are the same image and decode once. Memory
/// sources are keyed by their label and their content, so equal labels with different bytes stay
/// distinct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Image file on disk, read at decode time.
    File(PathBuf),
    /// Encoded bytes already in memory, labelled by `key`.
    Memory { key: String, bytes: Arc<[u8]> },
}

impl ImageSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn memory(key: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Memory {
            key: key.into(),
            bytes: bytes.into(),
        }
    }

    pub fn key(&self) -> String {
        match self {
            Self::File(path) => normalize_path_key(path),
            Self::Memory { key, bytes } => {
                let mut h = Fnv1a64::new_default();
                h.write_bytes(bytes);
                format!("mem:{key}#{:016x}:{}", h.finish(), bytes.len())
            }
        }
    }

    pub fn id(&self) -> ImageId {
        let mut h = Fnv1a64::new_default();
        h.write_bytes(self.key().as_bytes());
        ImageId(h.finish())
    }

    fn read_bytes(&self) -> TilewallResult<Arc<[u8]>> {
        match self {
            Self::File(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("read image '{}'", path.display()))
                    .map_err(|e| TilewallError::decode(format!("{e:#}")))?;
                Ok(bytes.into())
            }
            Self::Memory { bytes, .. } => Ok(bytes.clone()),
        }
    }
}

fn normalize_path_key(path: &Path) -> String {
    format!("file:{}", path.to_string_lossy().replace('\\', "/"))
}

/// A source that failed to read or decode.
#[derive(Debug)]
pub struct DecodeFailure {
    pub key: String,
    pub error: TilewallError,
}

/// All distinct images needed by one regeneration, decoded with an all-settled join.
#[derive(Debug, Default)]
pub struct DecodedImageSet {
    images: HashMap<String, Arc<DecodedImage>>,
    failures: Vec<DecodeFailure>,
}

impl DecodedImageSet {
    /// Decode every distinct source in `sources` in parallel and wait for all of them.
    ///
    /// A failing source is logged and recorded in [`DecodedImageSet::failures`]; the remaining
    /// sources are unaffected.
    pub fn decode_all<'a, D>(sources: impl IntoIterator<Item = &'a ImageSource>, decoder: &D) -> Self
    where
        D: ImageDecoder + ?Sized,
    {
        let mut unique: BTreeMap<String, &ImageSource> = BTreeMap::new();
        for source in sources {
            unique.entry(source.key()).or_insert(source);
        }

        let settled: Vec<(String, TilewallResult<DecodedImage>)> = unique
            .into_par_iter()
            .map(|(key, source)| {
                let id = source.id();
                let result = source
                    .read_bytes()
                    .and_then(|bytes| decoder.decode(id, &bytes));
                (key, result)
            })
            .collect();

        let mut out = Self::default();
        for (key, result) in settled {
            match result {
                Ok(img) => {
                    tracing::debug!(%key, width = img.width, height = img.height, "decoded image");
                    out.images.insert(key, Arc::new(img));
                }
                Err(error) => {
                    tracing::warn!(%key, %error, "image failed to decode; tile treated as absent");
                    out.failures.push(DecodeFailure { key, error });
                }
            }
        }
        out
    }

    pub fn get(&self, source: &ImageSource) -> Option<&Arc<DecodedImage>> {
        self.images.get(&source.key())
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn failures(&self) -> &[DecodeFailure] {
        &self.failures
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
