//! Reader for the text reports written by t_tide style harmonic analysis.
//!
//! # File Format
//!
//! ```text
//! file name: ofs_x8575512.dat
//! date: 03-Jul-2020
//! nobs = 8784,  ngood = 8784,  record length (days) = 366.00
//! rayleigh criterion = 1.0
//!
//! var(x)= 0.0639   var(xp)= 0.0587   var(xres)= 0.00521
//! percent var predicted/var original= 91.9 %
//!
//!      tidal amplitude and phase with 95% CI estimates
//!
//! tide   freq       amp     amp_err    pha    pha_err     snr
//!  SA   0.0001141     0.0864     0.036   160.91    25.12       5.7
//! *M2   0.0805114     0.1344     0.003   214.19     1.34   2.1e+03
//! ```
//!
//! Constituents flagged with `*` are significant; the flag is dropped from the name.

use crate::harmonics::error::HarmonicsError;
use log::debug;
use std::path::Path;

const HEADER_TIDE: &str = "tide";
const HEADER_FREQ: &str = "freq";
const HEADER_AMP: &str = "amp";
const HEADER_AMP_ERR: &str = "amp_err";
const HEADER_PHA: &str = "pha";
const HEADER_PHA_ERR: &str = "pha_err";
const HEADER_SNR: &str = "snr";

/// One row of the constituent table.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstituentFit {
    /// Constituent name (e.g. "M2"), without the significance flag.
    pub name: String,
    /// Frequency in cycles per hour.
    pub frequency: f64,
    pub amplitude: f64,
    pub amplitude_error: f64,
    /// Greenwich phase in degrees.
    pub phase: f64,
    pub phase_error: f64,
    pub snr: Option<f64>,
}

/// Parsed harmonic-analysis report for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicReport {
    /// Share of the original variance reproduced by the fitted tide, in percent.
    pub percent: Option<f64>,
    pub constituents: Vec<ConstituentFit>,
}

struct ColumnIndices {
    freq: usize,
    amp: usize,
    amp_err: usize,
    pha: usize,
    pha_err: usize,
    snr: Option<usize>,
}

impl ColumnIndices {
    fn from_header(header: &[&str]) -> Result<Self, HarmonicsError> {
        let find = |name: &'static str| header.iter().position(|h| *h == name);
        let require = |name: &'static str| find(name).ok_or(HarmonicsError::MissingColumn(name));
        Ok(Self {
            freq: require(HEADER_FREQ)?,
            amp: require(HEADER_AMP)?,
            amp_err: require(HEADER_AMP_ERR)?,
            pha: require(HEADER_PHA)?,
            pha_err: require(HEADER_PHA_ERR)?,
            snr: find(HEADER_SNR),
        })
    }
}

impl HarmonicReport {
    pub fn from_path(path: &Path) -> Result<Self, HarmonicsError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| HarmonicsError::ReportRead(path.to_path_buf(), e))?;
        debug!("Parsing harmonic report {}", path.display());
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, HarmonicsError> {
        let lines: Vec<&str> = text.lines().collect();
        // A report may repeat the percent line; the last one wins.
        let percent = lines.iter().rev().find_map(|line| parse_percent(line));

        // The last line starting with "tide" is the table header.
        let header_index = lines
            .iter()
            .rposition(|line| line.split_whitespace().next() == Some(HEADER_TIDE))
            .ok_or(HarmonicsError::TableNotFound)?;
        let header: Vec<&str> = lines[header_index].split_whitespace().collect();
        let indices = ColumnIndices::from_header(&header)?;

        let constituents = lines
            .iter()
            .enumerate()
            .skip(header_index + 1)
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| parse_row(line, index + 1, header.len(), &indices))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            percent,
            constituents,
        })
    }

    /// Finds a constituent by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&ConstituentFit> {
        self.constituents
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Reads the value of `percent var predicted/var original= 91.9 %`.
fn parse_percent(line: &str) -> Option<f64> {
    if line.split_whitespace().next() != Some("percent") {
        return None;
    }
    let (_, value) = line.split_once('=')?;
    value
        .split_whitespace()
        .find_map(|token| token.parse::<f64>().ok())
}

fn parse_row(
    line: &str,
    line_number: usize,
    width: usize,
    indices: &ColumnIndices,
) -> Result<ConstituentFit, HarmonicsError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != width {
        return Err(HarmonicsError::Parse {
            line: line_number,
            message: format!("expected {} values, found {}", width, tokens.len()),
        });
    }
    let value = |index: usize| {
        tokens[index]
            .parse::<f64>()
            .map_err(|e| HarmonicsError::Parse {
                line: line_number,
                message: format!("invalid number '{}': {}", tokens[index], e),
            })
    };
    Ok(ConstituentFit {
        name: tokens[0].replace('*', ""),
        frequency: value(indices.freq)?,
        amplitude: value(indices.amp)?,
        amplitude_error: value(indices.amp_err)?,
        phase: value(indices.pha)?,
        phase_error: value(indices.pha_err)?,
        snr: indices.snr.map(value).transpose()?,
    })
}
