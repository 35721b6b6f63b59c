use anyhow::{Context, Result, bail};
use std::collections::HashSet;

const DEFAULT_SEED: u64 = 1337;
const MAX_RANGE_SPAN: u64 = 100_000;

/// Resolve a list of CLI seed arguments into session seeds.
///
/// Supports literal integers (negative values use their magnitude) and
/// ranges written `a..b` (exclusive) or `a..=b` (inclusive). Duplicates are
/// dropped while keeping first-seen order.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut pending: Vec<u64> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if let Some((start, end)) = token.split_once("..") {
            pending.extend(parse_range(token, start, end)?);
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            pending.push(value.unsigned_abs());
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            pending.push(value);
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    let mut seen = HashSet::new();
    let mut deduped: Vec<u64> = pending.into_iter().filter(|s| seen.insert(*s)).collect();

    if deduped.is_empty() {
        deduped.push(DEFAULT_SEED);
    }

    Ok(deduped)
}

fn parse_range(token: &str, start: &str, end: &str) -> Result<std::ops::Range<u64>> {
    let (end, inclusive) = match end.strip_prefix('=') {
        Some(rest) => (rest, true),
        None => (end, false),
    };
    let start: u64 = start
        .trim()
        .parse()
        .with_context(|| format!("invalid range start in {token}"))?;
    let mut end: u64 = end
        .trim()
        .parse()
        .with_context(|| format!("invalid range end in {token}"))?;
    if inclusive {
        end = end.saturating_add(1);
    }
    if end < start {
        bail!("seed range {token} is reversed");
    }
    if end - start > MAX_RANGE_SPAN {
        bail!("seed range {token} spans more than {MAX_RANGE_SPAN} seeds");
    }
    Ok(start..end)
}
