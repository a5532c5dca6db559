//! Micrograph identity.

use crate::model::is_file_safe_name;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use uuid::Uuid;

/// Stable identifier for one micrograph.
pub type MicrographId = Uuid;

/// Micrograph handle shared by every record on that image.
pub type SharedMicrograph = Rc<Micrograph>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MicrographValidationError {
    EmptyName,
    UnsafeName(String),
}

impl Display for MicrographValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "micrograph name must not be empty"),
            Self::UnsafeName(name) => {
                write!(f, "micrograph name `{name}` cannot be used in a filename")
            }
        }
    }
}

impl Error for MicrographValidationError {}

/// An EM image under examination.
///
/// Image handles are opaque to core and only carried for the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Micrograph {
    id: MicrographId,
    name: String,
    image: Option<PathBuf>,
}

impl Micrograph {
    pub fn new(name: impl Into<String>) -> Result<Self, MicrographValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MicrographValidationError::EmptyName);
        }
        if !is_file_safe_name(&name) {
            return Err(MicrographValidationError::UnsafeName(name));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            image: None,
        })
    }

    /// Attaches the image file the shell loads for display.
    pub fn with_image(mut self, image: impl Into<PathBuf>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn into_shared(self) -> SharedMicrograph {
        Rc::new(self)
    }

    pub fn id(&self) -> MicrographId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::{Micrograph, MicrographValidationError};
    use std::path::Path;

    #[test]
    fn new_generates_identity_without_image() {
        let micrograph = Micrograph::new("mic07").unwrap();
        assert!(!micrograph.id().is_nil());
        assert_eq!(micrograph.name(), "mic07");
        assert_eq!(micrograph.image(), None);

        let micrograph = micrograph.with_image("/data/mic07.mrc");
        assert_eq!(micrograph.image(), Some(Path::new("/data/mic07.mrc")));
    }

    #[test]
    fn new_rejects_empty_name() {
        assert_eq!(
            Micrograph::new("").unwrap_err(),
            MicrographValidationError::EmptyName
        );
    }
}
