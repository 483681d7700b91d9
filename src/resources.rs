use derive_more::{AsRef, Deref, Display, From, Into};
use freedesktop_icons::lookup;
use gdk_pixbuf::Pixbuf;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const THEME_ICON_SIZE: u16 = 512;

/// Names an image: a file path (absolute or relative to the loader's base
/// directory) or an icon-theme name.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ImageRef(String);

crate::impl_string_newtype!(ImageRef);

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Empty image reference")]
    Empty,
    #[error("Image not found: {0}")]
    NotFound(ImageRef),
    #[error("Failed to decode image '{reference}': {source}")]
    Decode {
        reference: ImageRef,
        #[source]
        source: glib::Error,
    },
}

pub trait ResourceLoader {
    fn load_image(&self, reference: &ImageRef) -> Result<Pixbuf, ResourceError>;
}

#[derive(Debug, Clone, Default)]
pub struct IconLoader {
    base_dir: Option<PathBuf>,
    size: Option<i32>,
}

impl IconLoader {
    pub fn new(base_dir: Option<PathBuf>, size: Option<i32>) -> Self {
        Self { base_dir, size }
    }

    pub fn resolve(&self, reference: &ImageRef) -> Option<PathBuf> {
        if reference.is_empty() {
            return None;
        }

        let path = Path::new(reference.as_str());
        if path.is_absolute() {
            return path.exists().then(|| path.to_path_buf());
        }

        if let Some(candidate) = self.base_dir.as_ref().map(|dir| dir.join(path))
            && candidate.is_file()
        {
            return Some(candidate);
        }

        let theme_size = self
            .size
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or(THEME_ICON_SIZE);
        lookup(reference.as_str())
            .with_size(theme_size)
            .with_scale(1)
            .find()
    }
}

impl ResourceLoader for IconLoader {
    fn load_image(&self, reference: &ImageRef) -> Result<Pixbuf, ResourceError> {
        if reference.is_empty() {
            return Err(ResourceError::Empty);
        }
        let path = self
            .resolve(reference)
            .ok_or_else(|| ResourceError::NotFound(reference.clone()))?;

        log::debug!("Decoding '{}' from {}", reference, path.display());

        match self.size {
            Some(size) => Pixbuf::from_file_at_scale(&path, size, size, true),
            None => Pixbuf::from_file(&path),
        }
        .map_err(|source| ResourceError::Decode {
            reference: reference.clone(),
            source,
        })
    }
}
