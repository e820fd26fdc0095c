//! Predicate evaluation for the router

use super::operator::Operator;
use std::borrow::Cow;

/// Compare `input_text` against `match_text`.
///
/// Both operands are lower-cased first unless `case_sensitive` is set.
/// An unrecognized operator evaluates to `false`.
pub fn evaluate_condition(
    input_text: &str,
    match_text: &str,
    operator: &Operator,
    case_sensitive: bool,
) -> bool {
    let (input, needle): (Cow<str>, Cow<str>) = if case_sensitive {
        (Cow::Borrowed(input_text), Cow::Borrowed(match_text))
    } else {
        (
            Cow::Owned(input_text.to_lowercase()),
            Cow::Owned(match_text.to_lowercase()),
        )
    };

    match operator {
        Operator::Equals => input == needle,
        Operator::NotEquals => input != needle,
        Operator::Contains => input.contains(needle.as_ref()),
        Operator::StartsWith => input.starts_with(needle.as_ref()),
        Operator::EndsWith => input.ends_with(needle.as_ref()),
        Operator::Unrecognized(label) => {
            log::warn!("Unrecognized operator '{}', treating as no match", label);
            false
        }
    }
}
