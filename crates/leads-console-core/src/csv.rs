//! CSV import and export for lead collections.
//!
//! # Format
//!
//! ```text
//! ID,Name,Company,Email,Source,Score,Status
//! l-001,"Ana Silva","Acme, Inc.",ana@acme.com,referral,82,qualified
//! ```
//!
//! `Name` and `Company` are always double-quoted on export; a literal quote
//! inside them is written doubled (`""`). Every other field is written bare.
//!
//! # Parsing
//!
//! Parsing is row-tolerant: a malformed row is logged with its line number
//! (the header is line 1) and skipped, and the remaining rows are still
//! decoded. Only input without a header and at least one data row fails as
//! a whole.

use std::fmt;

use crate::error::CsvError;
use crate::models::{Lead, LeadSource, LeadStatus};
use crate::validation::{generate_id, validate_email};

pub const CSV_HEADER: &str = "ID,Name,Company,Email,Source,Score,Status";

/// Number of columns a data row must have.
const COLUMN_COUNT: usize = 7;

/// Why a data row was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    InsufficientColumns(usize),
    EmptyRequiredField,
    InvalidEmail(String),
    InvalidScore(String),
    InvalidStatus(String),
    InvalidSource(String),
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::InsufficientColumns(n) => {
                write!(f, "insufficient columns ({} of {})", n, COLUMN_COUNT)
            }
            RowRejection::EmptyRequiredField => f.write_str("empty required fields"),
            RowRejection::InvalidEmail(v) => write!(f, "invalid email: {}", v),
            RowRejection::InvalidScore(v) => write!(f, "invalid score: {}", v),
            RowRejection::InvalidStatus(v) => write!(f, "invalid status: {}", v),
            RowRejection::InvalidSource(v) => write!(f, "invalid source: {}", v),
        }
    }
}

/// A skipped data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based line number; the header is line 1.
    pub line: usize,
    pub reason: RowRejection,
}

/// Result of [`parse_leads`].
#[derive(Debug, Clone, Default)]
pub struct ParsedLeads {
    pub leads: Vec<Lead>,
    pub rejected: Vec<RejectedRow>,
}

/// Serialize leads to CSV text, preserving input order.
pub fn export_leads(leads: &[Lead]) -> String {
    let mut lines = Vec::with_capacity(leads.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for lead in leads {
        lines.push(format!(
            "{},{},{},{},{},{},{}",
            lead.id,
            quote(&lead.name),
            quote(&lead.company),
            lead.email,
            lead.source,
            lead.score,
            lead.status
        ));
    }
    lines.join("\n")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Parse CSV text into validated leads.
///
/// Blank lines are ignored and the first non-blank line is taken as the
/// header. Rows with an empty `ID` get a generated one.
pub fn parse_leads(text: &str) -> Result<ParsedLeads, CsvError> {
    let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Err(CsvError::MissingRows);
    }

    let mut parsed = ParsedLeads::default();
    for (i, raw) in lines.iter().enumerate().skip(1) {
        let line_no = i + 1;
        match parse_row(raw.trim()) {
            Ok(lead) => parsed.leads.push(lead),
            Err(reason) => {
                tracing::warn!(line = line_no, "skipping CSV row: {}", reason);
                parsed.rejected.push(RejectedRow {
                    line: line_no,
                    reason,
                });
            }
        }
    }
    Ok(parsed)
}

fn parse_row(line: &str) -> Result<Lead, RowRejection> {
    let values = split_line(line);
    if values.len() < COLUMN_COUNT {
        return Err(RowRejection::InsufficientColumns(values.len()));
    }

    let (id, name, company, email) = (&values[0], &values[1], &values[2], &values[3]);
    let (source, score, status) = (&values[4], &values[5], &values[6]);

    if name.trim().is_empty() || company.trim().is_empty() || email.trim().is_empty() {
        return Err(RowRejection::EmptyRequiredField);
    }
    if !validate_email(email) {
        return Err(RowRejection::InvalidEmail(email.clone()));
    }
    let score = match score.parse::<u8>() {
        Ok(s) if s <= 100 => s,
        _ => return Err(RowRejection::InvalidScore(score.clone())),
    };
    let status: LeadStatus = status
        .parse()
        .map_err(|_| RowRejection::InvalidStatus(status.clone()))?;
    let source = LeadSource::parse_importable(source)
        .ok_or_else(|| RowRejection::InvalidSource(source.clone()))?;

    let id = match id.trim() {
        "" => generate_id(),
        id => id.to_string(),
    };

    Ok(Lead {
        id,
        name: name.trim().to_string(),
        company: company.trim().to_string(),
        email: email.trim().to_string(),
        source,
        score,
        status,
    })
}

/// Split one CSV line into trimmed fields.
///
/// A `"` toggles quoted mode, a `,` outside quotes ends the field, and `""`
/// inside quotes is a literal quote. Structural quotes are dropped.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn lead(id: &str, name: &str, company: &str, email: &str) -> Lead {
        Lead {
            id: id.to_string(),
            name: name.to_string(),
            company: company.to_string(),
            email: email.to_string(),
            source: LeadSource::Website,
            score: 50,
            status: LeadStatus::New,
        }
    }

    #[test]
    fn test_export_header_and_quoting() {
        let csv = export_leads(&[lead("l1", "Ana Silva", "Acme, Inc.", "ana@acme.com")]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            r#"l1,"Ana Silva","Acme, Inc.",ana@acme.com,website,50,new"#
        );
    }

    #[test]
    fn test_export_empty_is_header_only() {
        assert_eq!(export_leads(&[]), CSV_HEADER);
    }

    #[test]
    fn test_round_trip_with_commas_and_quotes() {
        let leads = vec![
            lead("l1", "Ana \"Nani\" Silva", "Acme, Inc.", "ana@acme.com"),
            lead("l2", "O'Brien, Pat", "\"Quoted\" Corp", "pat@quoted.io"),
            Lead {
                source: LeadSource::TradeShow,
                score: 100,
                status: LeadStatus::Won,
                ..lead("l3", "Bo", "B, \"C\", D", "bo@bcd.org")
            },
        ];
        let parsed = parse_leads(&export_leads(&leads)).unwrap();
        assert!(parsed.rejected.is_empty());
        assert_eq!(parsed.leads, leads);
    }

    fn arb_text() -> impl Strategy<Value = String> {
        "[A-Za-z,\"'][A-Za-z ,\"']{0,20}[A-Za-z,\"']"
    }

    fn arb_lead() -> impl Strategy<Value = Lead> {
        (
            "[a-z0-9]{1,8}",
            arb_text(),
            arb_text(),
            "[a-z]{1,8}@[a-z]{1,8}\\.(com|io|org)",
            proptest::sample::select(LeadSource::IMPORTABLE.to_vec()),
            0u8..=100,
            proptest::sample::select(LeadStatus::ALL.to_vec()),
        )
            .prop_map(|(id, name, company, email, source, score, status)| Lead {
                id,
                name,
                company,
                email,
                source,
                score,
                status,
            })
    }

    proptest! {
        #[test]
        fn test_round_trip_preserves_any_names(leads in proptest::collection::vec(arb_lead(), 1..8)) {
            let parsed = parse_leads(&export_leads(&leads)).unwrap();
            prop_assert!(parsed.rejected.is_empty(), "rejected: {:?}", parsed.rejected);
            prop_assert_eq!(parsed.leads, leads);
        }
    }

    #[test]
    fn test_parse_requires_header_and_row() {
        assert_eq!(parse_leads("").unwrap_err(), CsvError::MissingRows);
        assert_eq!(
            parse_leads(&format!("{}\n\n  \n", CSV_HEADER)).unwrap_err(),
            CsvError::MissingRows
        );
    }

    #[test]
    fn test_invalid_rows_are_skipped() {
        let text = [
            CSV_HEADER,
            r#"a,"Ana","Acme",ana@acme.com,website,150,new"#,
            r#"b,"Bo","Beta",bo@beta.com,website,40,archived"#,
            r#"c,"Cy","Gamma",cy@gamma.com,referral,70,won"#,
            r#"d,"Di","Delta",not-an-email,website,10,new"#,
            r#"e,"","Eps",e@eps.com,website,10,new"#,
            r#"f,"Fay","Phi",fay@phi.com,fax,10,new"#,
            r#"g,"Gus","Gee""#,
        ]
        .join("\n");

        let parsed = parse_leads(&text).unwrap();
        assert_eq!(parsed.leads.len(), 1);
        assert_eq!(parsed.leads[0].id, "c");
        assert_eq!(parsed.leads[0].status, LeadStatus::Won);

        let lines: Vec<usize> = parsed.rejected.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![2, 3, 5, 6, 7, 8]);
        assert_eq!(
            parsed.rejected[0].reason,
            RowRejection::InvalidScore("150".to_string())
        );
        assert_eq!(
            parsed.rejected[1].reason,
            RowRejection::InvalidStatus("archived".to_string())
        );
        assert_eq!(parsed.rejected[5].reason, RowRejection::InsufficientColumns(3));
    }

    #[test]
    fn test_converted_back_source_is_not_importable() {
        let text = format!(
            "{}\nx,\"Ana\",\"Acme\",ana@acme.com,converted_back,75,qualified",
            CSV_HEADER
        );
        let parsed = parse_leads(&text).unwrap();
        assert!(parsed.leads.is_empty());
        assert_eq!(
            parsed.rejected[0].reason,
            RowRejection::InvalidSource("converted_back".to_string())
        );
    }

    #[test]
    fn test_empty_id_is_generated() {
        let text = format!(
            "{}\n,\"Ana\",\"Acme\",ana@acme.com,website,10,new\r\n",
            CSV_HEADER
        );
        let parsed = parse_leads(&text).unwrap();
        assert_eq!(parsed.leads.len(), 1);
        assert!(!parsed.leads[0].id.is_empty());
    }

    #[test]
    fn test_split_line_quotes() {
        assert_eq!(
            split_line(r#"1, "a, b" ,c"#),
            vec!["1".to_string(), "a, b".to_string(), "c".to_string()]
        );
        assert_eq!(split_line(r#""x ""y"" z""#), vec![r#"x "y" z"#.to_string()]);
    }
}
