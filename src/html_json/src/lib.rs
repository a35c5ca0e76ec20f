//! Converts HTML markup into a JSON document that mirrors element nesting.
//!
//! Every element becomes a single-entry object keyed by its tag name, or by
//! `tag#id` when the element carries an `id` attribute. The value holds the
//! remaining `attributes` and the element's `child` content, which is either a
//! trimmed text string or an array of nested element objects.
//!
//! ```
//! let json = html_json::html_to_json(r#"<div id="main">Content</div>"#).unwrap();
//! assert!(json.contains("\"div#main\""));
//! ```

pub mod convert;
pub mod dom;
pub mod error;
pub mod key;
pub mod transform;

pub use convert::{html_to_json, ConvertOptions, Converter};
pub use dom::{ParseMode, ParsedElement, ParsedNode};
pub use error::{ConvertError, ConvertResult};
pub use key::element_key;
pub use transform::{Child, Element, ElementWrapper, Value};
