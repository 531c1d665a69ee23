use crate::content::error::ValidationError;
use crate::content::schema::RawFrontMatter;

pub const TOML_DELIMITER: &str = "+++";
pub const YAML_DELIMITER: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterFormat {
    Toml,
    Yaml,
}

impl FrontMatterFormat {
    fn from_delimiter(line: &str) -> Option<FrontMatterFormat> {
        match line {
            TOML_DELIMITER => Some(FrontMatterFormat::Toml),
            YAML_DELIMITER => Some(FrontMatterFormat::Yaml),
            _ => None,
        }
    }

    pub fn delimiter(&self) -> &'static str {
        match self {
            FrontMatterFormat::Toml => TOML_DELIMITER,
            FrontMatterFormat::Yaml => YAML_DELIMITER,
        }
    }
}

/// Splits a markdown source into its front-matter block and the body that follows it.
///
/// ```text
/// ---                          +++
/// title: Hello                 title = "Hello"
/// publishDate: 2024-01-01      publishDate = 2024-01-01
/// ---                          +++
///
/// Body starts here             Body starts here
/// ```
///
/// `---` opens a YAML block, `+++` a TOML one, and the block is closed by the same delimiter.
/// Blank lines before the opening delimiter are ok. Leading blank lines of the body are dropped.
pub fn split_front_matter(source: &str) -> Result<(FrontMatterFormat, &str, &str), ValidationError> {
    let mut lines = source.split_inclusive('\n');
    let mut offset = 0;

    let (format, start) = loop {
        let Some(line) = lines.next() else {
            return Err(ValidationError::MissingFrontMatter);
        };
        offset += line.len();

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match FrontMatterFormat::from_delimiter(line) {
            Some(format) => break (format, offset),
            None => return Err(ValidationError::MissingFrontMatter),
        }
    };

    for line in lines {
        if line.trim() == format.delimiter() {
            let front = &source[start..offset];
            let body = &source[offset + line.len()..];
            return Ok((format, front, body.trim_start_matches(['\r', '\n'])));
        }
        offset += line.len();
    }

    Err(ValidationError::UnclosedFrontMatter)
}

pub fn parse(source: &str) -> Result<(RawFrontMatter, &str), ValidationError> {
    let (format, front, body) = split_front_matter(source)?;
    let raw = match format {
        FrontMatterFormat::Toml => RawFrontMatter::from_toml(front)?,
        FrontMatterFormat::Yaml => RawFrontMatter::from_yaml(front)?,
    };
    Ok((raw, body))
}
