use thiserror::Error;

use super::selector::Selector;

#[derive(Debug, Error)]
pub enum GraphicError {
    #[error("unable to load svg asset {name:?}: {reason}")]
    AssetNotFound { name: String, reason: String },

    #[error("unable to find sub svg matching {selector}")]
    ElementNotFound { selector: Selector },

    #[error("malformed svg document: {reason}")]
    Malformed { reason: String },
}

impl GraphicError {
    pub fn not_found(selector: &Selector) -> Self {
        GraphicError::ElementNotFound {
            selector: selector.clone(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        GraphicError::Malformed {
            reason: reason.into(),
        }
    }
}
