use std::cmp::Ordering;

/// Removes the whitespace margin common to every non-blank line.
///
/// Lines consisting only of whitespace are normalized to bare line endings and
/// do not take part in computing the margin.
pub fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(leading_whitespace)
        .reduce(common_prefix)
        .unwrap_or("");

    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            if line.ends_with('\n') {
                out.push('\n');
            }
        } else {
            out.push_str(&line[margin.len()..]);
        }
    }
    out
}

fn leading_whitespace(line: &str) -> &str {
    let rest = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - rest.len()]
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    // Both inputs are ASCII whitespace, so any byte index is a char boundary.
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}

/// Shortens `text` to its first `length - 3` characters plus `...` once it has
/// more than `length - 3` characters. Anything that long is shortened even if
/// it would have fit in `length`.
pub fn maybe_truncate(text: &str, length: usize) -> String {
    let keep = length.saturating_sub(3);
    if text.chars().count() > keep {
        let mut out: String = text.chars().take(keep).collect();
        out.push_str("...");
        out
    } else {
        text.to_owned()
    }
}

/// One run of a [`numeric_sort_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortKeyPart {
    Text(String),
    Number(String),
}

impl SortKeyPart {
    fn digits(&self) -> &str {
        match self {
            SortKeyPart::Number(digits) => digits.trim_start_matches('0'),
            SortKeyPart::Text(text) => text,
        }
    }
}

impl Ord for SortKeyPart {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKeyPart::Number(raw_a), SortKeyPart::Number(raw_b)) => {
                let (a, b) = (self.digits(), other.digits());
                a.len()
                    .cmp(&b.len())
                    .then_with(|| a.cmp(b))
                    .then_with(|| raw_a.len().cmp(&raw_b.len()))
            }
            (SortKeyPart::Text(a), SortKeyPart::Text(b)) => a.cmp(b),
            (SortKeyPart::Text(_), SortKeyPart::Number(_)) => Ordering::Less,
            (SortKeyPart::Number(_), SortKeyPart::Text(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for SortKeyPart {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Splits `text` into alternating text and digit runs so that embedded numbers
/// sort by value (`file2` before `file10`).
///
/// The key always starts with a (possibly empty) text run, so keys of different
/// strings compare text with text and numbers with numbers.
pub fn numeric_sort_key(text: &str) -> Vec<SortKeyPart> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;

    for ch in text.chars() {
        if ch.is_ascii_digit() != in_digits {
            let run = std::mem::take(&mut current);
            parts.push(if in_digits {
                SortKeyPart::Number(run)
            } else {
                SortKeyPart::Text(run)
            });
            in_digits = !in_digits;
        }
        current.push(ch);
    }

    parts.push(if in_digits {
        SortKeyPart::Number(current)
    } else {
        SortKeyPart::Text(current)
    });
    if in_digits {
        parts.push(SortKeyPart::Text(String::new()));
    }
    parts
}
