//! Join-point discovery.
//!
//! Each forward jump contributes one marker in front of its target. Markers
//! at one target are ordered by descending source offset: the innermost
//! construct closes first, so its marker must come first.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use undis_ir::InstructionSet;

use super::decode::Decoded;
use crate::DecodeError;

/// A marker to insert: its kind and the `start` of the jump that lands here.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(super) struct Join {
    pub kind: &'static str,
    pub source: u32,
}

/// Resolved jump targets by instruction start, plus the markers per target.
pub(super) struct Joins {
    pub targets: BTreeMap<u32, u32>,
    pub markers: BTreeMap<u32, Vec<Join>>,
}

impl Joins {
    /// Jump target of the instruction starting at `start`.
    pub fn target_of(&self, start: u32) -> Option<u32> {
        self.targets.get(&start).copied()
    }
}

fn marker_kind(name: &str) -> Option<&'static str> {
    match name {
        "SETUP_LOOP" => Some("COME_FROM_LOOP"),
        "SETUP_EXCEPT" => Some("COME_FROM_EXCEPT"),
        "SETUP_FINALLY" => Some("COME_FROM_FINALLY"),
        // Loop exits and with/finally bodies close without a marker.
        "FOR_ITER" | "SETUP_WITH" | "SETUP_ASYNC_WITH" | "CALL_FINALLY" => None,
        _ => Some("COME_FROM"),
    }
}

pub(super) fn locate(decoded: &[Decoded], set: &InstructionSet) -> Result<Joins, DecodeError> {
    let starts: FxHashSet<u32> = decoded.iter().map(|d| d.start).collect();
    let mut targets = BTreeMap::new();
    let mut markers: BTreeMap<u32, Vec<Join>> = BTreeMap::new();

    for d in decoded {
        let Some(kind) = set.jump_kind(d.name) else {
            continue;
        };
        let arg = d.arg.ok_or(DecodeError::MissingOperand {
            offset: d.offset,
            op: d.name,
        })?;
        let target = set.jump_target(kind, d.offset, arg);
        if !starts.contains(&target) {
            return Err(DecodeError::JumpOutOfRange {
                offset: d.offset,
                op: d.name,
                target,
            });
        }
        targets.insert(d.start, target);

        if target > d.start {
            if let Some(kind) = marker_kind(d.name) {
                markers.entry(target).or_default().push(Join {
                    kind,
                    source: d.start,
                });
            }
        }
    }

    for joins in markers.values_mut() {
        joins.sort_by(|a, b| b.source.cmp(&a.source));
    }
    tracing::trace!(jumps = targets.len(), join_points = markers.len(), "joins located");
    Ok(Joins { targets, markers })
}
