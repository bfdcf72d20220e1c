//! Splits raw bank descriptions into a display name and a reference.
//!
//! Each payment type has an ordered table of heuristics. The first heuristic
//! whose predicate holds and whose extractor produces a result wins; when none
//! does, the whole cleaned description becomes the name. Parsing never fails.

use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDescription {
    pub name: String,
    pub reference: String,
}

impl ParsedDescription {
    fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
        }
    }

    fn whole(description: &str) -> Self {
        Self::new(description, "")
    }
}

// ---------------------------------------------------------------------------
// Payment types: enum dispatch over static heuristic tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentType {
    DirectDebit,
    BankPayment,
    FasterPaymentOut,
    FasterPaymentIn,
    Other,
}

impl PaymentType {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "DD" => Self::DirectDebit,
            "BP" => Self::BankPayment,
            "FPO" => Self::FasterPaymentOut,
            "FPI" => Self::FasterPaymentIn,
            _ => Self::Other,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DirectDebit => "Direct debit",
            Self::BankPayment => "Bank payment",
            Self::FasterPaymentOut => "Faster payment out",
            Self::FasterPaymentIn => "Faster payment in",
            Self::Other => "Other",
        }
    }

    fn heuristics(&self) -> &'static [Heuristic] {
        match self {
            Self::DirectDebit => DIRECT_DEBIT,
            Self::BankPayment => BANK_PAYMENT,
            Self::FasterPaymentOut | Self::FasterPaymentIn => FASTER_PAYMENT,
            Self::Other => &[],
        }
    }
}

struct Heuristic {
    label: &'static str,
    applies: fn(&str) -> bool,
    extract: fn(&str) -> Option<ParsedDescription>,
}

const DIRECT_DEBIT: &[Heuristic] = &[
    Heuristic {
        label: "playerdata",
        applies: |d| d.starts_with(PLAYERDATA_TOKEN),
        extract: extract_playerdata,
    },
    Heuristic {
        label: "hosting provider",
        applies: |d| HOSTING_PREFIXES.iter().any(|p| d.starts_with(p)),
        extract: extract_hosting_provider,
    },
];

const BANK_PAYMENT: &[Heuristic] = &[
    Heuristic {
        label: "students' union",
        applies: |d| d.starts_with(STUDENTS_UNION),
        extract: extract_students_union,
    },
    Heuristic {
        label: "union income",
        applies: |d| d.contains(UNION_INCOME_MARKER),
        extract: |_| Some(ParsedDescription::new("EDIN UNIVERSITY EUSU", "MSL INCOME")),
    },
];

const FASTER_PAYMENT: &[Heuristic] = &[
    Heuristic {
        label: "university club account",
        applies: |d| d.starts_with(UNIVERSITY_PREFIX),
        extract: extract_university,
    },
    Heuristic {
        label: "christmas meals",
        applies: |d| EVENT_MARKERS.iter().any(|m| d.contains(m)),
        extract: extract_event,
    },
    Heuristic {
        label: "interbank reference",
        applies: |_| true,
        extract: extract_interbank,
    },
];

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Collapse whitespace runs to single spaces and trim.
pub fn clean_description(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn parse_description(description: &str, transaction_type: &str) -> ParsedDescription {
    if description.is_empty() {
        return ParsedDescription::default();
    }
    let cleaned = clean_description(description);
    let payment_type = PaymentType::from_code(transaction_type);

    for heuristic in payment_type.heuristics() {
        if !(heuristic.applies)(&cleaned) {
            continue;
        }
        if let Some(parsed) = (heuristic.extract)(&cleaned) {
            tracing::trace!(heuristic = heuristic.label, "parsed {cleaned:?}");
            return parsed;
        }
    }
    ParsedDescription::whole(&cleaned)
}

/// The raw text a fixed display name stands for, for names that never appear
/// verbatim in the description they were parsed from.
pub fn raw_name_token(name: &str) -> Option<&'static str> {
    match name {
        PLAYERDATA_NAME => Some(PLAYERDATA_TOKEN),
        UNIVERSITY_NAME => Some(UNIVERSITY_PREFIX),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Direct debits
// ---------------------------------------------------------------------------

const PLAYERDATA_TOKEN: &str = "PLYRDATA";
const PLAYERDATA_NAME: &str = "Playerdata";
const HOSTING_PREFIXES: &[&str] = &["IONOS CLOUD LTD.", "1&1 INTERNET LTD."];

fn extract_playerdata(description: &str) -> Option<ParsedDescription> {
    let reference = description.replacen(PLAYERDATA_TOKEN, "", 1);
    Some(ParsedDescription::new(PLAYERDATA_NAME, reference.trim()))
}

fn extract_hosting_provider(description: &str) -> Option<ParsedDescription> {
    let tokens: Vec<&str> = description.split(' ').collect();
    let split = tokens.len().min(3);
    Some(ParsedDescription::new(
        tokens[..split].join(" "),
        tokens[split..].join(" "),
    ))
}

// ---------------------------------------------------------------------------
// Bank payments
// ---------------------------------------------------------------------------

const STUDENTS_UNION: &str = "EDIN UNIVERSITY SU";
const UNION_INCOME_MARKER: &str = "EDIN UNIVERSITY EUSU MSL INCOME";

fn extract_students_union(description: &str) -> Option<ParsedDescription> {
    let reference = description.split(' ').skip(3).collect::<Vec<_>>().join(" ");
    Some(ParsedDescription::new(STUDENTS_UNION, reference))
}

// ---------------------------------------------------------------------------
// Faster payments
// ---------------------------------------------------------------------------

const UNIVERSITY_PREFIX: &str = "EDINBURGH UNIVERSI";
const UNIVERSITY_NAME: &str = "EUWHC";
const EVENT_MARKERS: &[&str] = &["XMAS MEALS", "CHRISTMASMEALS"];
const EVENT_LABEL: &str = "XMAS MEALS";
// Checked in order, first one present wins.
const EVENT_SUB_CODES: &[&str] = &["M1", "M6S", "7S", "4S"];

static LONG_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{15}|[0-9]{6}").expect("valid regex"));

static EVENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(.*?)(?:XMAS MEALS|CHRISTMASMEALS[A-Za-z0-9_]*)\s*(?:[0-9]{15}|[A-Za-z0-9_]{16,}|[0-9]{6}).*$",
    )
    .expect("valid regex")
});

static INTERBANK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)\s+([0-9]{3})([0-9]{15})\s+(.*?)(?:\s+([0-9]{6})\s+.*)?$")
        .expect("valid regex")
});

fn is_long_number(token: &str) -> bool {
    token.len() >= 6 && token.bytes().all(|b| b.is_ascii_digit())
}

/// The university's own account: fixed short name, reference is the free
/// text after the prefix with interbank numbers cut away.
fn extract_university(description: &str) -> Option<ParsedDescription> {
    let rest = description[UNIVERSITY_PREFIX.len()..].trim_start();
    let mut tokens = rest.split(' ').peekable();
    while tokens.next_if(|t| is_long_number(t)).is_some() {}
    let rest = tokens.collect::<Vec<_>>().join(" ");

    let reference = match LONG_NUMBER.find(&rest) {
        Some(m) => &rest[..m.start()],
        None => rest.as_str(),
    };
    Some(ParsedDescription::new(UNIVERSITY_NAME, reference.trim()))
}

fn extract_event(description: &str) -> Option<ParsedDescription> {
    let caps = EVENT_PATTERN.captures(description)?;
    let name = caps.get(1)?.as_str().trim();
    if name.is_empty() {
        return None;
    }
    let reference = match EVENT_SUB_CODES.iter().find(|c| description.contains(*c)) {
        Some(code) => format!("{EVENT_LABEL} {code}"),
        None => EVENT_LABEL.to_string(),
    };
    Some(ParsedDescription::new(name, reference))
}

/// `<name> <3 digits><15 digits> <reference> [<6 digits> <trailing>]`
fn extract_interbank(description: &str) -> Option<ParsedDescription> {
    let caps = INTERBANK_PATTERN.captures(description)?;
    let name = caps.get(1)?.as_str().trim();
    let reference = caps.get(4)?.as_str().trim();
    if name.is_empty() || reference.is_empty() {
        return None;
    }
    Some(ParsedDescription::new(name, reference))
}
