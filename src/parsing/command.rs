// src/parsing/command.rs

use crate::domain::OfferStatus;
use crate::parsing::fields::field_lines;

/// Command tokens in lifecycle order; the first one found wins.
const COMMAND_TOKENS: [(&str, OfferStatus); 4] = [
    ("/reserve", OfferStatus::Reserved),
    ("/reservar", OfferStatus::Reserved),
    ("/collect", OfferStatus::Collected),
    ("/coletar", OfferStatus::Collected),
];

const ACTOR_KEYS: [&str; 2] = ["entity", "entity_id"];

/// A lifecycle command found in a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub target: OfferStatus,
    /// Entity acting on the offer, when the comment names one.
    pub actor: Option<String>,
}

/// Look for a lifecycle command anywhere in `text`, ignoring case.
///
/// The actor comes from an `entity:` / `entity_id:` line when present,
/// otherwise from the word right after the command token.
pub fn detect_command(text: &str) -> Option<Command> {
    // ASCII lowercasing keeps byte offsets aligned with `text`
    let lowered = text.to_ascii_lowercase();

    let (target, end) = COMMAND_TOKENS.iter().find_map(|(token, status)| {
        lowered
            .find(token)
            .map(|start| (*status, start + token.len()))
    })?;

    let actor = actor_from_fields(text).or_else(|| actor_after(&text[end..]));

    Some(Command { target, actor })
}

/// Last non-empty `entity:` / `entity_id:` line.
fn actor_from_fields(text: &str) -> Option<String> {
    field_lines(text)
        .filter(|(key, value)| {
            !value.is_empty() && ACTOR_KEYS.iter().any(|k| key.eq_ignore_ascii_case(k))
        })
        .last()
        .map(|(_, value)| value.to_string())
}

fn actor_after(rest: &str) -> Option<String> {
    // "/reserved" matched "/reserve": the trailing "d" is not an actor
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    // only the rest of the command's own line
    let word = rest
        .lines()
        .next()?
        .split_whitespace()
        .next()?
        .trim_matches(|c: char| matches!(c, ',' | '.' | ';' | ':' | '!' | '?'));

    (!word.is_empty() && !word.starts_with('/')).then(|| word.to_string())
}
