use unicode_segmentation::UnicodeSegmentation;

use crate::domain::subscription::ValidationError;

const MAX_CHAR_LENGTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ServiceName(String);

impl ServiceName {
    pub fn parse(name: String) -> Result<ServiceName, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::ServiceNameRequired);
        }

        if name.graphemes(true).count() > MAX_CHAR_LENGTH {
            return Err(ValidationError::ServiceNameTooLong);
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
