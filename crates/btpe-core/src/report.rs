// Copyright (c) 2026 Joseph Verdicchio and btpe-count Contributors
// SPDX-License-Identifier: Apache-2.0

//! Textual result stream.
//!
//! The default text layout is two lines per case:
//!
//! ```text
//! Case 32 0.3125
//! 4 2 2 6
//! ```
//!
//! Every count is followed by a single space, including the last one.
//! Probabilities below `1e-3` switch to scientific notation, e.g.
//! `Case 16384 6.103515625E-4`.

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::experiment::CaseResult;

const CASE_TAG: &str = "Case";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
}

impl std::str::FromStr for OutputFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "jsonl" => Ok(Self::Jsonl),
            other => Err(ReportError::UnknownFormat(other.to_owned())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unknown output format: {0}")]
    UnknownFormat(String),
    #[error("line {line}: malformed case header: {text}")]
    MalformedHeader { line: usize, text: String },
    #[error("line {line}: malformed count: {text}")]
    MalformedCount { line: usize, text: String },
    #[error("line {line}: counts without a preceding case header")]
    OrphanCounts { line: usize },
    #[error("line {line}: case header without counts")]
    MissingCounts { line: usize },
}

/// Shortest round-trip digits of an `f64`, in plain decimal for magnitudes in
/// `[1e-3, 1e7)` and as `<mantissa>E<exponent>` otherwise. The mantissa always
/// carries a fractional digit (`1.0E-5`, not `1E-5`).
#[derive(Debug, Clone, Copy)]
pub struct PlainOrScientific(pub f64);

impl fmt::Display for PlainOrScientific {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_nan() {
            return f.write_str("NaN");
        }
        if v.is_infinite() {
            return f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
        }
        if v == 0.0 {
            return f.write_str(if v.is_sign_negative() { "-0.0" } else { "0.0" });
        }

        if (1e-3..1e7).contains(&v.abs()) {
            let plain = v.to_string();
            f.write_str(&plain)?;
            if !plain.contains('.') {
                f.write_str(".0")?;
            }
            return Ok(());
        }

        let sci = format!("{v:E}");
        match sci.split_once('E') {
            Some((mantissa, exp)) if !mantissa.contains('.') => write!(f, "{mantissa}.0E{exp}"),
            _ => f.write_str(&sci),
        }
    }
}

/// The two-line text layout, both lines newline-terminated.
impl fmt::Display for CaseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{CASE_TAG} {} {}", self.n, PlainOrScientific(self.p))?;
        for count in &self.counts {
            write!(f, "{count} ")?;
        }
        writeln!(f)
    }
}

/// Streams cases to `out` as they finish.
pub struct ReportWriter<W> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn write_case(&mut self, case: &CaseResult) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Text => write!(self.out, "{case}")?,
            OutputFormat::Jsonl => {
                serde_json::to_writer(&mut self.out, case)?;
                self.out.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> anyhow::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Reads the text layout back. Blank lines are skipped.
pub fn parse_text(input: &str) -> Result<Vec<CaseResult>, ReportError> {
    let mut cases = Vec::new();
    let mut pending: Option<(usize, u64, f64)> = None;

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        if fields.next() == Some(CASE_TAG) {
            if let Some((header_line, _, _)) = pending {
                return Err(ReportError::MissingCounts { line: header_line });
            }
            let malformed = || ReportError::MalformedHeader {
                line,
                text: trimmed.to_owned(),
            };
            let n = fields
                .next()
                .and_then(|f| f.parse::<u64>().ok())
                .ok_or_else(malformed)?;
            let p = fields
                .next()
                .and_then(|f| f.parse::<f64>().ok())
                .ok_or_else(malformed)?;
            if fields.next().is_some() {
                return Err(malformed());
            }
            pending = Some((line, n, p));
            continue;
        }

        let (_, n, p) = pending.take().ok_or(ReportError::OrphanCounts { line })?;
        let counts = trimmed
            .split_whitespace()
            .map(|f| {
                f.parse::<u32>().map_err(|_| ReportError::MalformedCount {
                    line,
                    text: f.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        cases.push(CaseResult { n, p, counts });
    }

    if let Some((line, _, _)) = pending {
        return Err(ReportError::MissingCounts { line });
    }
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_case() -> CaseResult {
        CaseResult {
            n: 32,
            p: 0.3125,
            counts: vec![4, 2, 2, 6],
        }
    }

    #[test]
    fn text_layout_has_trailing_space_before_newline() {
        assert_eq!(sample_case().to_string(), "Case 32 0.3125\n4 2 2 6 \n");
    }

    #[test]
    fn small_probabilities_switch_to_scientific_notation() {
        let case = CaseResult {
            n: 16_384,
            p: 10.0 / 16_384.0,
            counts: vec![2],
        };
        assert_eq!(case.to_string(), "Case 16384 6.103515625E-4\n2 \n");

        let case = CaseResult {
            n: 1_048_576,
            p: 10.0 / 1_048_576.0,
            counts: vec![2],
        };
        assert_eq!(case.to_string(), "Case 1048576 9.5367431640625E-6\n2 \n");
    }

    #[test]
    fn notation_boundaries() {
        let show = |v: f64| PlainOrScientific(v).to_string();
        assert_eq!(show(0.5), "0.5");
        assert_eq!(show(0.6875), "0.6875");
        assert_eq!(show(0.001), "0.001");
        assert_eq!(show(0.000999), "9.99E-4");
        assert_eq!(show(0.00001), "1.0E-5");
        assert_eq!(show(1.0), "1.0");
        assert_eq!(show(-9.0), "-9.0");
        assert_eq!(show(1e7), "1.0E7");
        assert_eq!(show(0.0), "0.0");
        assert_eq!(show(f64::NAN), "NaN");
    }

    #[test]
    fn jsonl_writes_one_object_per_line() {
        let mut writer = ReportWriter::new(Vec::new(), OutputFormat::Jsonl);
        writer.write_case(&sample_case()).expect("write");
        writer.write_case(&sample_case()).expect("write");
        let bytes = writer.finish().expect("flush");
        let text = String::from_utf8(bytes).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let back: CaseResult = serde_json::from_str(lines[0]).expect("json");
        assert_eq!(back, sample_case());
    }

    #[test]
    fn parse_reads_back_written_stream() {
        let mut writer = ReportWriter::new(Vec::new(), OutputFormat::Text);
        let second = CaseResult {
            n: 64,
            p: 0.84375,
            counts: vec![10, 12],
        };
        let sparse = CaseResult {
            n: 65_536,
            p: 10.0 / 65_536.0,
            counts: vec![2, 4],
        };
        writer.write_case(&sample_case()).expect("write");
        writer.write_case(&second).expect("write");
        writer.write_case(&sparse).expect("write");
        let text = String::from_utf8(writer.finish().expect("flush")).expect("utf8");
        assert!(text.contains("Case 65536 1.52587890625E-4\n"));

        let parsed = parse_text(&text).expect("parse");
        assert_eq!(parsed, vec![sample_case(), second, sparse]);
    }

    #[test]
    fn parse_rejects_broken_streams() {
        assert!(matches!(
            parse_text("1 2 3 \n"),
            Err(ReportError::OrphanCounts { line: 1 })
        ));
        assert!(matches!(
            parse_text("Case 32\n1 2\n"),
            Err(ReportError::MalformedHeader { line: 1, .. })
        ));
        assert!(matches!(
            parse_text("Case 32 0.5\n1 x 3\n"),
            Err(ReportError::MalformedCount { line: 2, .. })
        ));
        assert!(matches!(
            parse_text("Case 32 0.5\nCase 64 0.5\n1\n"),
            Err(ReportError::MissingCounts { line: 1 })
        ));
        assert!(matches!(
            parse_text("Case 32 0.5\n\n"),
            Err(ReportError::MissingCounts { line: 1 })
        ));
    }

    #[test]
    fn format_names_parse() {
        assert_eq!("text".parse::<OutputFormat>().ok(), Some(OutputFormat::Text));
        assert_eq!("jsonl".parse::<OutputFormat>().ok(), Some(OutputFormat::Jsonl));
        assert!("csv".parse::<OutputFormat>().is_err());
    }
}
