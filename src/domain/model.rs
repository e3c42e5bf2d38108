use crate::utils::error::{BundleError, Result};

/// Raster extensions accepted as degradation images.
pub const RASTER_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// One candidate icon source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconFile {
    /// Path relative to the source root, used in CSS comments and links.
    pub filename: String,
    /// Basename including the extension.
    pub name: String,
    /// Extension with the leading dot (e.g. `.svg`).
    pub ext: String,
    /// Raw file contents, loaded only when a requested type embeds them.
    pub data: Option<Vec<u8>>,
}

impl IconFile {
    pub fn from_relative_path(filename: &str) -> Self {
        let name = filename
            .rsplit('/')
            .next()
            .unwrap_or(filename)
            .to_string();
        let ext = match name.rfind('.') {
            Some(pos) => name[pos..].to_string(),
            None => String::new(),
        };
        Self {
            filename: filename.to_string(),
            name,
            ext,
            data: None,
        }
    }

    /// Basename without the extension; pair key for deduplication.
    pub fn base(&self) -> &str {
        &self.name[..self.name.len() - self.ext.len()]
    }

    pub fn is_vector(&self) -> bool {
        self.ext == ".svg"
    }
}

/// One logical icon: at most one vector file and one bitmap file per base name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconPair {
    pub name: String,
    pub vector: Option<IconFile>,
    pub bitmap: Option<IconFile>,
}

/// The two render lists derived from the deduplicated pairs.
///
/// `vectors` carries the pair's vector file, falling back to its bitmap when
/// no vector exists, so vector targets still cover every icon. `bitmaps`
/// carries only real bitmaps.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    pub vectors: Vec<IconFile>,
    pub bitmaps: Vec<IconFile>,
}

impl IconSet {
    pub fn from_pairs(pairs: Vec<IconPair>) -> Self {
        let mut set = Self::default();
        for pair in pairs {
            match (pair.vector, pair.bitmap) {
                (Some(v), Some(b)) => {
                    set.vectors.push(v);
                    set.bitmaps.push(b);
                }
                (Some(v), None) => set.vectors.push(v),
                (None, Some(b)) => {
                    set.vectors.push(b.clone());
                    set.bitmaps.push(b);
                }
                (None, None) => {}
            }
        }
        set
    }
}

/// Requested output kind for one generated CSS target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputType {
    /// `v`: vector rules (URL-encoded SVG or base64).
    Vector,
    /// `b`: bitmap base64 data URIs.
    Bitmap,
    /// `combo`: vector rules plus link fallbacks for older browsers.
    Combo,
    /// `ie`: plain file links.
    IeLink,
    /// `ie6`: AlphaImageLoader filter rules.
    Ie6Filter,
}

impl OutputType {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "v" => Ok(Self::Vector),
            "b" => Ok(Self::Bitmap),
            "combo" => Ok(Self::Combo),
            "ie" => Ok(Self::IeLink),
            "ie6" => Ok(Self::Ie6Filter),
            other => Err(BundleError::UnknownTargetType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vector => "v",
            Self::Bitmap => "b",
            Self::Combo => "combo",
            Self::IeLink => "ie",
            Self::Ie6Filter => "ie6",
        }
    }

    /// Whether rules of this type embed file contents and need the bytes read.
    pub fn needs_file_data(&self) -> bool {
        matches!(self, Self::Vector | Self::Bitmap | Self::Combo)
    }
}

/// One generated text artifact: a CSS file for a (type, group) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssArtifact {
    pub target: String,
    pub css: String,
    pub rules: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_file_from_relative_path() {
        let file = IconFile::from_relative_path("blocks/search/search.icon.svg");
        assert_eq!(file.name, "search.icon.svg");
        assert_eq!(file.ext, ".svg");
        assert_eq!(file.base(), "search.icon");
        assert!(file.is_vector());

        let file = IconFile::from_relative_path("mail.icon.png");
        assert_eq!(file.name, "mail.icon.png");
        assert_eq!(file.ext, ".png");
        assert!(!file.is_vector());
    }

    #[test]
    fn test_icon_file_without_extension() {
        let file = IconFile::from_relative_path("weird");
        assert_eq!(file.ext, "");
        assert_eq!(file.base(), "weird");
    }

    #[test]
    fn test_output_type_parse() {
        assert_eq!(OutputType::parse("v").unwrap(), OutputType::Vector);
        assert_eq!(OutputType::parse("combo").unwrap(), OutputType::Combo);
        assert_eq!(OutputType::parse("ie6").unwrap(), OutputType::Ie6Filter);
        assert!(OutputType::parse("png").is_err());
    }

    #[test]
    fn test_icon_set_vector_fallback() {
        let vector = IconFile::from_relative_path("a.icon.svg");
        let bitmap = IconFile::from_relative_path("b.icon.png");
        let pairs = vec![
            IconPair {
                name: "a.icon".to_string(),
                vector: Some(vector.clone()),
                bitmap: None,
            },
            IconPair {
                name: "b.icon".to_string(),
                vector: None,
                bitmap: Some(bitmap.clone()),
            },
        ];

        let set = IconSet::from_pairs(pairs);

        // Vector list substitutes the bitmap when no vector exists.
        assert_eq!(set.vectors, vec![vector, bitmap.clone()]);
        // Bitmap list only carries real bitmaps.
        assert_eq!(set.bitmaps, vec![bitmap]);
    }
}
