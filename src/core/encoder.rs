use crate::domain::model::IconFile;
use crate::utils::error::{BundleError, Result};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use regex::Regex;

pub const DEFAULT_SELECTOR_PREFIX: &str = ".";
pub const DEFAULT_FALLBACK_PREFIX: &str = ".i-ua_svg_no";
pub const DEFAULT_MAX_DATA_URI_SIZE: usize = 32000;

/// Renders one CSS rule per icon file, in the four supported encodings.
///
/// Every rule starts with a `/* <relative path> */` comment line. Selectors
/// are derived from the file name with the source suffix and extension
/// stripped.
#[derive(Debug, Clone)]
pub struct CssEncoder {
    selector_prefix: String,
    fallback_prefix: String,
    sources_suffix: String,
    svg_to_base64: bool,
    max_data_uri_size: usize,
    whitespace: Regex,
}

impl CssEncoder {
    pub fn new(
        selector_prefix: &str,
        fallback_prefix: &str,
        sources_suffix: &str,
        svg_to_base64: bool,
        max_data_uri_size: usize,
    ) -> Self {
        Self {
            selector_prefix: selector_prefix.to_string(),
            fallback_prefix: fallback_prefix.to_string(),
            sources_suffix: sources_suffix.to_string(),
            svg_to_base64,
            max_data_uri_size,
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Vector rule: URL-encoded SVG by default, base64 when configured.
    pub fn vector_rule(&self, file: &IconFile) -> Result<String> {
        if self.svg_to_base64 {
            self.base64_rule(file)
        } else {
            self.encoded_svg_rule(file)
        }
    }

    /// `background-image:url(data:image/<type>;base64,...)`.
    pub fn base64_rule(&self, file: &IconFile) -> Result<String> {
        let data = file_data(file)?;
        let content = format!(
            "data:image/{};base64,{}",
            media_type(&file.ext),
            BASE64_STANDARD.encode(data)
        );

        if content.len() > self.max_data_uri_size {
            return Err(BundleError::DataUriTooLarge {
                filename: file.filename.clone(),
                size: content.len(),
                limit: self.max_data_uri_size,
            });
        }

        Ok(format!(
            "/* {} */\n{} {{background-image:url({});}}",
            file.filename,
            self.selector(file, false),
            content
        ))
    }

    /// SVG source embedded as a minimally URL-encoded `charset=utf8` data URI.
    /// Non-SVG input falls back to base64.
    pub fn encoded_svg_rule(&self, file: &IconFile) -> Result<String> {
        if !file.is_vector() {
            return self.base64_rule(file);
        }

        let data = String::from_utf8_lossy(file_data(file)?)
            .replace('"', "'")
            .replace('%', "%25")
            .replace('<', "%3C")
            .replace('>', "%3E")
            .replace('&', "%26")
            .replace('#', "%23");
        let data = self.whitespace.replace_all(&data, " ");

        Ok(format!(
            "/* {} */\n{} {{background-image:url(\"data:image/svg+xml;charset=utf8,{}\");}}",
            file.filename,
            self.selector(file, false),
            data
        ))
    }

    /// Plain link to the source file.
    pub fn link_rule(&self, file: &IconFile, fallback: bool) -> String {
        format!(
            "/* {} */\n{} {{background-image:url({});}}",
            file.filename,
            self.selector(file, fallback),
            file.filename
        )
    }

    /// Legacy ie6 AlphaImageLoader filter.
    pub fn filter_rule(&self, file: &IconFile) -> String {
        format!(
            "/* {} */\n{} {{background:none !important;-filter:progid:DXImageTransform.Microsoft.AlphaImageLoader(src={},sizingMethod='crop');}}",
            file.filename,
            self.selector(file, false),
            file.filename
        )
    }

    fn selector(&self, file: &IconFile, fallback: bool) -> String {
        let pattern = format!(
            r"(\.{})?{}$",
            regex::escape(&self.sources_suffix),
            regex::escape(&file.ext)
        );
        // Built from escaped fragments, always compiles.
        let re = Regex::new(&pattern).unwrap();
        let stripped = re.replace(&file.name, "");

        if fallback {
            format!("{} {}{}", self.fallback_prefix, self.selector_prefix, stripped)
        } else {
            format!("{}{}", self.selector_prefix, stripped)
        }
    }
}

fn media_type(ext: &str) -> &str {
    let ext = ext.trim_start_matches('.');
    if ext == "svg" {
        "svg+xml"
    } else {
        ext
    }
}

fn file_data(file: &IconFile) -> Result<&[u8]> {
    file.data
        .as_deref()
        .ok_or_else(|| BundleError::ProcessingError {
            message: format!("File contents were not loaded for \"{}\"", file.filename),
        })
}
