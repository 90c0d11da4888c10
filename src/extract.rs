//! Participant roster extraction
//!
//! Given the receiver of a layout-refresh call, searches its object graph
//! for the roster container: an array of space ids one object level down,
//! next to a space-id keyed collection of participant records. Absence is
//! normal (a single-participant call renders no roster); conflicting
//! candidates are a structural ambiguity and must be reported, never
//! guessed away.

use thiserror::Error;
use tracing::debug;

use crate::graph::{HostGraph, HostValue, ObjectId};

/// Errors for roster extraction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("two non-identical space-id arrays in layout receiver")]
    AmbiguousRoster,
    #[error("roster container holds no space-id keyed collection")]
    RosterMapMissing,
}

/// Search `root` for the participant roster and return display names in
/// collection order. `Ok(None)` when no candidate array exists.
pub fn participant_names(
    graph: &HostGraph,
    root: ObjectId,
    space_prefix: &str,
    name_field: &str,
) -> Result<Option<Vec<String>>, ExtractError> {
    let is_space_id = |s: &str| s.starts_with(space_prefix);

    let mut roster_keys: Option<&Vec<String>> = None;
    let mut container: Option<ObjectId> = None;
    for (_, value) in &graph.object(root).fields {
        let HostValue::Object(candidate) = value else {
            continue;
        };
        for (_, inner) in &graph.object(*candidate).fields {
            let HostValue::StrList(keys) = inner else {
                continue;
            };
            if keys.is_empty() || !keys.iter().all(|k| is_space_id(k)) {
                continue;
            }
            match roster_keys {
                Some(prev) if prev != keys => return Err(ExtractError::AmbiguousRoster),
                _ => {
                    roster_keys = Some(keys);
                    container = Some(*candidate);
                }
            }
        }
    }
    let Some(container) = container else {
        return Ok(None);
    };

    // The sibling collection: space-id keyed entries holding the records
    let mut roster_map: Option<ObjectId> = None;
    for (_, value) in &graph.object(container).fields {
        let HostValue::Object(candidate) = value else {
            continue;
        };
        if let Some(entries) = &graph.object(*candidate).entries {
            if !entries.is_empty() && entries.iter().all(|(k, _)| is_space_id(k)) {
                roster_map = Some(*candidate);
            }
        }
    }
    let Some(roster_map) = roster_map else {
        return Err(ExtractError::RosterMapMissing);
    };

    let mut names = Vec::new();
    if let Some(entries) = &graph.object(roster_map).entries {
        for (_, record) in entries {
            let HostValue::Object(record) = record else {
                continue;
            };
            if let Some(HostValue::Str(name)) = graph.object(*record).field(name_field) {
                names.push(name.clone());
            }
        }
    }
    debug!(count = names.len(), "participant roster extracted");
    Ok(Some(names))
}
