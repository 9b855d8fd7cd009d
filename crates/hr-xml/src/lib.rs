//! XML wire/boundary support for health record fragments.
//!
//! Record nodes never touch `quick-xml` directly. Reading goes through [`XmlElement`], an owned
//! element tree that supports "select single child by name" and "iterate children by name"
//! navigation. Writing goes through [`XmlWriter`], a thin streaming writer offering the start
//! element / element-with-text / end element primitives the record nodes are written against.

mod reader;
mod writer;

pub use reader::XmlElement;
pub use writer::XmlWriter;

use thiserror::Error;

/// Errors returned by the `hr-xml` boundary crate.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Malformed(String),

    #[error("document contains no root element")]
    Empty,

    #[error("invalid UTF-8 in XML: {0}")]
    Utf8(String),

    #[error("failed to write XML: {0}")]
    Write(String),

    #[error("end element requested with no open element")]
    UnbalancedEnd,
}

/// Type alias for Results that can fail with an [`XmlError`].
pub type XmlResult<T> = Result<T, XmlError>;
