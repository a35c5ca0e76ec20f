use serde::{ser::Error as _, Serialize};
use serde_json::ser::PrettyFormatter;
use tracing::{debug, trace};

use crate::{
    dom::{self, ParseMode},
    error::{ConvertError, ConvertResult},
    transform::{self, Value},
};

pub const DEFAULT_INDENT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub mode: ParseMode,
    /// Reject input the HTML5 parser had to recover from.
    pub strict: bool,
    /// Spaces per nesting level; `0` emits compact single-line JSON.
    pub indent: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            mode: ParseMode::Auto,
            strict: false,
            indent: DEFAULT_INDENT,
        }
    }
}

/// Converts HTML text to JSON text. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Converter { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Parses and transforms `html` without serializing it.
    pub fn to_value(&self, html: &str) -> ConvertResult<Value> {
        let tree = dom::parse(html, self.options.mode, self.options.strict)?;
        let value = transform::transform(&tree);
        trace!(absent = value.is_absent(), "transformed parse tree");
        Ok(value)
    }

    pub fn convert(&self, html: &str) -> ConvertResult<String> {
        let value = self.to_value(html)?;
        let json = self.serialize(&value)?;
        debug!(input_bytes = html.len(), output_bytes = json.len(), "converted html to json");
        Ok(json)
    }

    fn serialize(&self, value: &Value) -> ConvertResult<String> {
        if self.options.indent == 0 {
            return Ok(serde_json::to_string(value)?);
        }

        let indent = vec![b' '; self.options.indent];
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
        value.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(|err| ConvertError::Serialize(serde_json::Error::custom(err)))
    }
}

/// Converts `html` with the default options: auto-detected parse mode,
/// recovery from malformed markup, four-space indentation.
///
/// The HTML5 tokenizer discards repeated attributes on a tag, so for
/// `<p class="a" class="b">` the output keeps `"class": "a"`. Last-wins only
/// applies to attribute lists built by hand, see [`crate::transform::transform_element`].
pub fn html_to_json(html: &str) -> ConvertResult<String> {
    Converter::default().convert(html)
}
