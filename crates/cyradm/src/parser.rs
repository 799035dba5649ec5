//! Reply payload parsers.
//!
//! These tokenize the multi-field reply lines of the admin protocol (ACL
//! listings, quota tuples, identity key/value pairs) into structured
//! values. A line that passed classification but lacks the structural
//! markers a parser requires fails with [`Error::Parse`]; the parsers never
//! index past the token sequence.

use crate::types::{AccessControl, QuotaSnapshot, ServerIdentity};
use crate::{Error, Result};

/// Extracts the innermost parenthesised group of a reply line.
fn paren_group(line: &str) -> Result<&str> {
    let open = line
        .rfind('(')
        .ok_or_else(|| Error::Parse(format!("missing '(' in reply: {line:?}")))?;
    let close = line[open..]
        .find(')')
        .map(|i| open + i)
        .ok_or_else(|| Error::Parse(format!("missing ')' in reply: {line:?}")))?;
    Ok(&line[open + 1..close])
}

/// Parses an ACL listing reply into an [`AccessControl`] map.
///
/// The listing is a parenthesised group of whitespace-separated
/// principal/rights pairs, e.g. `. OK (alice lrs bob lrwi)`. A dangling
/// unpaired token is a parse failure, not a silent drop.
pub fn parse_acl(line: &str) -> Result<AccessControl> {
    let group = paren_group(line)?;
    let tokens: Vec<&str> = group.split_whitespace().collect();
    if tokens.len() % 2 != 0 {
        return Err(Error::Parse(format!(
            "unpaired principal/rights token in ACL reply: {line:?}"
        )));
    }

    let mut acl = AccessControl::new();
    for pair in tokens.chunks(2) {
        acl.insert(pair[0], pair[1]);
    }
    Ok(acl)
}

/// Parses a quota reply of the shape `* QUOTA <mailbox> (STORAGE <used>
/// <limit>)` into a [`QuotaSnapshot`].
pub fn parse_quota(line: &str) -> Result<QuotaSnapshot> {
    let group = paren_group(line)?;
    let tokens: Vec<&str> = group.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(Error::Parse(format!(
            "quota reply needs 3 tokens, got {}: {line:?}",
            tokens.len()
        )));
    }

    let used = parse_number(tokens[1], line)?;
    let limit = parse_number(tokens[2], line)?;
    QuotaSnapshot::new(used, limit)
}

fn parse_number(token: &str, line: &str) -> Result<u64> {
    token
        .parse()
        .map_err(|_| Error::Parse(format!("non-numeric quota field {token:?} in {line:?}")))
}

/// Parses an identity reply of the shape `* ID ("<key>" "<value>" ...)`
/// into a [`ServerIdentity`] map.
///
/// The group holds quoted string tokens alternating key/value; an odd token
/// count is a parse failure.
pub fn parse_identity(line: &str) -> Result<ServerIdentity> {
    let group = paren_group(line)?;

    // Quote-delimited split: segments between quote pairs are the tokens.
    let segments: Vec<&str> = group.split('"').collect();
    if segments.len() < 3 || segments.len() % 2 == 0 {
        return Err(Error::Parse(format!(
            "malformed quoted group in identity reply: {line:?}"
        )));
    }
    let tokens: Vec<&str> = segments
        .iter()
        .skip(1)
        .step_by(2)
        .copied()
        .collect();
    if tokens.len() % 2 != 0 {
        return Err(Error::Parse(format!(
            "unpaired key/value token in identity reply: {line:?}"
        )));
    }

    let mut identity = ServerIdentity::new();
    for pair in tokens.chunks(2) {
        identity.insert(pair[0], pair[1]);
    }
    Ok(identity)
}
