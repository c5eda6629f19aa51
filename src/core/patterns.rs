//! Pattern definitions for PII detection
//!
//! Every PII category is an independent, stateless predicate over a single
//! string. The predicates are collected in a [`PatternRegistry`] keyed by
//! category name so new categories can be added without touching extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Two alphabetic tokens separated by a single whitespace character
    static ref NAME_PATTERN: Regex = Regex::new(r"[a-zA-Z]{2,25}\s[a-zA-Z]{2,25}")
        .expect("name regex is valid");

    /// Exactly 10 or exactly 12 decimal digits, whole string
    static ref BANK_ACCOUNT_PATTERN: Regex = Regex::new(r"^(?:[0-9]{10}|[0-9]{12})$")
        .expect("bank account regex is valid");

    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[\w!#+$&~?*=-]+@[\w.]+$")
        .expect("email regex is valid");

    static ref PHONE_PATTERN: Regex = Regex::new(r"(?:\([0-9]{3}\)\s?|\b[0-9]{3}[-. ])[0-9]{3}[-. ][0-9]{4}\b")
        .expect("phone regex is valid");

    static ref SSN_PATTERN: Regex = Regex::new(r"\b[0-9]{3}-[0-9]{2}-[0-9]{4}\b")
        .expect("ssn regex is valid");
}

/// Coarse "First Last" heuristic.
///
/// True when the text contains two alphabetic tokens of 2-25 letters joined by
/// one whitespace character. Any two-word alphabetic phrase matches.
pub fn is_likely_name(text: &str) -> bool {
    NAME_PATTERN.is_match(text)
}

/// True only when the whole string is a 10 or 12 digit account number
pub fn is_bank_account_number(text: &str) -> bool {
    BANK_ACCOUNT_PATTERN.is_match(text)
}

/// True only when the whole string is `local-part@domain`.
///
/// Emails embedded in a longer sentence do not match; pass candidate tokens.
pub fn is_email_address(text: &str) -> bool {
    EMAIL_PATTERN.is_match(text)
}

/// True when the text contains a North American phone number
pub fn is_phone_number(text: &str) -> bool {
    PHONE_PATTERN.is_match(text)
}

/// True when the text contains a social security number (`ddd-dd-dddd`)
pub fn is_ssn(text: &str) -> bool {
    SSN_PATTERN.is_match(text)
}

/// How a pattern relates to the string it is given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchoring {
    /// The pattern may match anywhere inside the string
    Substring,
    /// The pattern must cover the entire string
    WholeString,
}

#[derive(Debug, Clone)]
enum Rule {
    Predicate(fn(&str) -> bool),
    Regex(Regex),
}

/// A named PII classification rule
#[derive(Debug, Clone)]
pub struct PiiPattern {
    name: String,
    description: String,
    anchoring: Anchoring,
    rule: Rule,
}

impl PiiPattern {
    /// Create a pattern backed by a predicate function
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        anchoring: Anchoring,
        predicate: fn(&str) -> bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            anchoring,
            rule: Rule::Predicate(predicate),
        }
    }

    /// Create a pattern from a user supplied regular expression
    ///
    /// # Arguments
    ///
    /// * `name` - Category name the pattern is registered under
    /// * `pattern` - Regular expression source
    /// * `anchored` - Whether the expression must cover the whole string
    ///
    /// # Returns
    ///
    /// The compiled pattern, or the regex compilation error
    pub fn from_regex(
        name: impl Into<String>,
        pattern: &str,
        anchored: bool,
    ) -> Result<Self, regex::Error> {
        let name = name.into();
        let (source, anchoring) = if anchored {
            (format!("^(?:{})$", pattern), Anchoring::WholeString)
        } else {
            (pattern.to_string(), Anchoring::Substring)
        };
        let regex = Regex::new(&source)?;

        Ok(Self {
            description: format!("Custom pattern '{}'", name),
            name,
            anchoring,
            rule: Rule::Regex(regex),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn anchoring(&self) -> Anchoring {
        self.anchoring
    }

    /// Evaluate the rule against `text`
    pub fn matches(&self, text: &str) -> bool {
        match &self.rule {
            Rule::Predicate(predicate) => predicate(text),
            Rule::Regex(regex) => regex.is_match(text),
        }
    }
}

/// Builtin pattern names
pub const NAME: &str = "name";
pub const BANK_ACCOUNT: &str = "bank_account";
pub const EMAIL: &str = "email";
pub const PHONE: &str = "phone";
pub const SSN: &str = "ssn";

/// Get the builtin PII patterns in registration order.
pub fn builtin_patterns() -> Vec<PiiPattern> {
    vec![
        PiiPattern::new(NAME, "Person name", Anchoring::Substring, is_likely_name),
        PiiPattern::new(
            BANK_ACCOUNT,
            "Bank account number",
            Anchoring::WholeString,
            is_bank_account_number,
        ),
        PiiPattern::new(EMAIL, "Email address", Anchoring::WholeString, is_email_address),
        PiiPattern::new(PHONE, "Phone number", Anchoring::Substring, is_phone_number),
        PiiPattern::new(SSN, "Social Security Number", Anchoring::Substring, is_ssn),
    ]
}

/// Ordered collection of PII patterns keyed by name
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    patterns: Vec<PiiPattern>,
}

impl PatternRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every builtin pattern
    pub fn with_defaults() -> Self {
        Self {
            patterns: builtin_patterns(),
        }
    }

    /// Add a pattern, replacing any existing pattern with the same name
    pub fn register(&mut self, pattern: PiiPattern) {
        match self.patterns.iter_mut().find(|p| p.name == pattern.name) {
            Some(existing) => *existing = pattern,
            None => self.patterns.push(pattern),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PiiPattern> {
        self.patterns.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.patterns.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PiiPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Keep only the named patterns
    ///
    /// # Returns
    ///
    /// Names that were requested but are not registered
    pub fn retain<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<String> {
        let unknown = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| self.get(name).is_none())
            .map(str::to_string)
            .collect();

        self.patterns
            .retain(|p| names.iter().any(|name| name.as_ref() == p.name));

        unknown
    }

    /// Evaluate a single named pattern; `None` when the name is unknown
    pub fn matches(&self, name: &str, text: &str) -> Option<bool> {
        self.get(name).map(|pattern| pattern.matches(text))
    }

    /// Names of every pattern matching `text` as given
    pub fn classify(&self, text: &str) -> Vec<&str> {
        self.patterns
            .iter()
            .filter(|p| p.matches(text))
            .map(|p| p.name.as_str())
            .collect()
    }
}
