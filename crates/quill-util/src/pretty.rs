//! Pretty printers for boolean formulas over named atoms.

/// Formats a conjunction, parenthesized when it has more than one term.
///
/// `["a", "b"]` becomes `(a & b)`; the empty conjunction is `true`.
pub fn pretty_conjunction<S: AsRef<str>>(conjunction: &[S]) -> String {
    match conjunction {
        [] => "true".to_owned(),
        [single] => single.as_ref().to_owned(),
        terms => {
            let joined = terms
                .iter()
                .map(|term| term.as_ref())
                .collect::<Vec<&str>>()
                .join(" & ");
            format!("({joined})")
        }
    }
}

/// Formats a disjunction of conjunctions.
///
/// `[["a", "b"], ["c"]]` becomes `(a & b) | c`; the empty disjunction is `false`.
pub fn pretty_dnf<S: AsRef<str>>(dnf: &[Vec<S>]) -> String {
    if dnf.is_empty() {
        return "false".to_owned();
    }
    dnf.iter()
        .map(|conjunction| pretty_conjunction(conjunction))
        .collect::<Vec<_>>()
        .join(" | ")
}
