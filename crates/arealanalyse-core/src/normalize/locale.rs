use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Display locale for numbers and label ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    /// Space as group separator, dot as decimal separator.
    #[default]
    Default,
    /// Norwegian Bokmål: no-break space groups, decimal comma, æ/ø/å after z.
    NbNo,
}

impl Locale {
    pub fn group_separator(self) -> char {
        match self {
            Locale::Default => ' ',
            Locale::NbNo => '\u{a0}',
        }
    }

    pub fn decimal_separator(self) -> char {
        match self {
            Locale::Default => '.',
            Locale::NbNo => ',',
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Locale> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "default" | "" => Some(Locale::Default),
            "nb-no" | "nb" | "no" => Some(Locale::NbNo),
            _ => None,
        }
    }

    /// Format a decimal with grouped thousands and trailing zeros trimmed.
    pub fn format_decimal(self, value: Decimal) -> String {
        let text = value.normalize().to_string();
        let (sign, unsigned) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text.as_str()),
        };
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (unsigned, None),
        };

        let mut out = String::with_capacity(text.len() + int_part.len() / 3);
        out.push_str(sign);
        out.push_str(&group_digits(int_part, self.group_separator()));
        if let Some(frac) = frac_part {
            out.push(self.decimal_separator());
            out.push_str(frac);
        }
        out
    }

    /// Compare two labels the way a reader of this locale expects them ordered.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        let primary = a
            .chars()
            .map(|c| collation_weight(self, c))
            .cmp(b.chars().map(|c| collation_weight(self, c)));
        primary.then_with(|| a.cmp(b))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Default => write!(f, "default"),
            Locale::NbNo => write!(f, "nb-NO"),
        }
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Case-insensitive sort weight. Norwegian letters are placed after 'z'.
fn collation_weight(locale: Locale, c: char) -> (u32, u32) {
    let lower = c.to_lowercase().next().unwrap_or(c);
    if locale == Locale::NbNo {
        let tail = match lower {
            'æ' | 'ä' => Some(1),
            'ø' | 'ö' => Some(2),
            'å' => Some(3),
            _ => None,
        };
        if let Some(rank) = tail {
            return ('z' as u32, rank);
        }
    }
    (lower as u32, 0)
}
