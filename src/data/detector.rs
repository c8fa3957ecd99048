//! Format detection.
//!
//! Every dialect is tried in a fixed priority order and the first one that
//! both parses the input and yields a non-empty plan wins. Later dialects are
//! never run, so the same bytes always produce the same [`Detection`].

use crate::constants::MAX_FILE_SIZE_MB;
use crate::data::error::{DataError, DataResult, ParseError};
use crate::data::formats::{DialectRules, FormatId, FormatParser, Parsed, parser_for, parsers_in_priority};
use crate::data::recipe::SeriesPlan;
use crate::data::record::SourceInput;
use crate::perf::DETECTION_PASS_MS;
use crate::time_pass;
use std::path::Path;
use tracing::{debug, info, warn};

/// Outcome of a successful detection or forced parse
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub format: FormatId,
    pub parsed: Parsed,
    pub plan: SeriesPlan,
    pub title: String,
}

pub struct FormatDetector {
    parsers: Vec<Box<dyn FormatParser>>,
    rules: DialectRules,
    max_file_size_mb: u64,
}

impl FormatDetector {
    pub fn new(rules: &DialectRules) -> Self {
        Self {
            parsers: parsers_in_priority(rules),
            rules: rules.clone(),
            max_file_size_mb: MAX_FILE_SIZE_MB,
        }
    }

    pub fn with_max_file_size_mb(mut self, max_mb: u64) -> Self {
        self.max_file_size_mb = max_mb;
        self
    }

    /// Dialects in the order they are tried
    pub fn order(&self) -> Vec<FormatId> {
        self.parsers.iter().map(|p| p.format()).collect()
    }

    /// Read a file and detect its dialect, titled after the file stem
    pub fn detect_file(&self, path: &Path) -> DataResult<Detection> {
        let bytes = self.read_file(path)?;
        self.detect_bytes(&bytes, &title_for(path))
    }

    /// Try every dialect in priority order
    pub fn detect_bytes(&self, bytes: &[u8], title: &str) -> DataResult<Detection> {
        time_pass!("detector.detect", DETECTION_PASS_MS);
        if bytes.is_empty() {
            return Err(DataError::EmptyFile);
        }

        let input = SourceInput::new(bytes);
        let mut attempts = Vec::with_capacity(self.parsers.len());
        for parser in &self.parsers {
            let format = parser.format();
            match run_parser(parser.as_ref(), &input, title) {
                Ok((parsed, plan)) => {
                    info!(
                        format = %format,
                        series = plan.series.len(),
                        points = plan.point_count(),
                        "Detected {}",
                        title
                    );
                    return Ok(Detection {
                        format,
                        parsed,
                        plan,
                        title: title.to_string(),
                    });
                }
                Err(err) => {
                    debug!(format = %format, "Rejected {}: {}", title, err);
                    attempts.push((format, err));
                }
            }
        }

        warn!(attempts = attempts.len(), "Unrecognized format for {}", title);
        Err(DataError::UnrecognizedFormat { attempts })
    }

    /// Read bytes with one dialect, skipping detection
    pub fn parse_as(&self, format: FormatId, bytes: &[u8], title: &str) -> DataResult<Detection> {
        time_pass!("detector.parse_as", DETECTION_PASS_MS);
        if bytes.is_empty() {
            return Err(DataError::EmptyFile);
        }
        let parser = parser_for(format, &self.rules);
        let input = SourceInput::new(bytes);
        let (parsed, plan) = run_parser(parser.as_ref(), &input, title)
            .map_err(|source| DataError::Parse { format, source })?;
        info!(format = %format, series = plan.series.len(), "Read {} as forced format", title);
        Ok(Detection {
            format,
            parsed,
            plan,
            title: title.to_string(),
        })
    }

    pub fn parse_file_as(&self, path: &Path, format: FormatId) -> DataResult<Detection> {
        let bytes = self.read_file(path)?;
        self.parse_as(format, &bytes, &title_for(path))
    }

    fn read_file(&self, path: &Path) -> DataResult<Vec<u8>> {
        // Check file size before reading
        let metadata = std::fs::metadata(path)?;
        let size_mb = metadata.len() / (1024 * 1024);
        if size_mb > self.max_file_size_mb {
            return Err(DataError::TooLarge {
                size_mb,
                max_mb: self.max_file_size_mb,
            });
        }
        let bytes = std::fs::read(path)?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(bytes)
    }
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::new(&DialectRules::default())
    }
}

/// Parse and plan; a plan without points counts as a rejection
fn run_parser(
    parser: &dyn FormatParser,
    input: &SourceInput<'_>,
    title: &str,
) -> Result<(Parsed, SeriesPlan), ParseError> {
    let parsed = parser.try_parse(input)?;
    let plan = parser.plan(&parsed, title)?;
    if plan.point_count() == 0 {
        return Err(ParseError::Truncated("no data points".to_string()));
    }
    Ok((parsed, plan))
}

fn title_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Data")
        .to_string()
}
