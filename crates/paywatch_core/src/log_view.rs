use serde_json::Value;

use crate::SignalRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Failure,
}

impl StatusClass {
    pub fn css_class(self) -> &'static str {
        match self {
            StatusClass::Success => "status-success",
            StatusClass::Failure => "status-fail",
        }
    }
}

/// One rendered line of the signal log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// 1-based position within the current session.
    pub position: usize,
    pub class: StatusClass,
    pub status: String,
    pub currency: String,
    pub amount: String,
    pub latency_ms: String,
}

impl LogEntry {
    fn from_record(position: usize, record: &SignalRecord) -> Self {
        let class = if record.status.is_success() {
            StatusClass::Success
        } else {
            StatusClass::Failure
        };
        Self {
            position,
            class,
            status: record.status.as_str().to_string(),
            currency: record.currency.clone(),
            amount: format_amount(&record.amount),
            latency_ms: record.latency_ms.to_string(),
        }
    }
}

/// Two decimals for numbers; anything else is shown as received.
pub fn format_amount(amount: &Value) -> String {
    match amount {
        Value::Number(number) => match number.as_f64() {
            Some(value) => two_decimals(value),
            None => number.to_string(),
        },
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Rounds to two decimals with exact ties going away from zero.
///
/// `{:.2}` already rounds every non-tie to the nearest value; only a binary
/// value lying exactly halfway (0.125, 12.625, ...) needs the carry done here.
fn two_decimals(value: f64) -> String {
    let nearest = format!("{value:.2}");
    if !value.is_finite() {
        return nearest;
    }
    // 1074 fractional digits spell out any f64 exactly.
    let exact = format!("{:.1074}", value.abs());
    let Some((whole, fraction)) = exact.split_once('.') else {
        return nearest;
    };
    let (kept, rest) = fraction.split_at(2);
    let is_tie = rest.starts_with('5') && rest[1..].bytes().all(|digit| digit == b'0');
    if !is_tie {
        return nearest;
    }

    let mut digits: Vec<char> = whole.chars().chain(kept.chars()).collect();
    let mut carry = true;
    for digit in digits.iter_mut().rev() {
        if *digit == '9' {
            *digit = '0';
        } else {
            *digit = char::from(*digit as u8 + 1);
            carry = false;
            break;
        }
    }
    if carry {
        digits.insert(0, '1');
    }
    let split = digits.len() - 2;
    let sign = if value < 0.0 { "-" } else { "" };
    let units: String = digits[..split].iter().collect();
    let cents: String = digits[split..].iter().collect();
    format!("{sign}{units}.{cents}")
}

/// Append-only log of the signals seen in the current session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogRenderer {
    entries: Vec<LogEntry>,
    generation: u64,
}

impl LogRenderer {
    pub fn append(&mut self, record: &SignalRecord) -> &LogEntry {
        let entry = LogEntry::from_record(self.entries.len() + 1, record);
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Bumped on every reset so a presenter can tell a cleared log from a grown one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.generation += 1;
    }
}
