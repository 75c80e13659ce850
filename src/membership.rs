//! Lazy, cycle-safe expansion of group membership.
//!
//! A walk starts from the direct members of a group and climbs upward through
//! the parent groups of every group it meets. Ids are only ever enqueued once,
//! so cyclic group graphs terminate.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::resolver::PrincipalResolver;
use crate::types::{AuthorizableRecord, Principal};

/// Pull-based membership walk over an explicit frontier.
///
/// `frontier[..position]` has been consumed; `frontier[position..]` is pending.
/// `visited` holds every id ever enqueued, so no id is processed twice.
/// Dropping the walk abandons it.
pub struct GroupMembership {
    resolver: PrincipalResolver,
    frontier: Vec<String>,
    position: usize,
    visited: HashSet<String>,
}

impl GroupMembership {
    /// Start a walk for `principal`.
    ///
    /// With `implicit_everyone` set, every principal other than everyone itself
    /// also yields the everyone principal.
    pub fn new(resolver: PrincipalResolver, principal: &Principal, implicit_everyone: bool) -> Self {
        let mut walk = GroupMembership {
            frontier: Vec::new(),
            position: 0,
            visited: HashSet::new(),
            resolver,
        };

        if let Some(record) = walk.origin_record(principal) {
            for member_id in record.member_ids() {
                walk.enqueue(member_id);
            }
        }

        let well_known = Arc::clone(walk.resolver.well_known());
        if well_known.everyone_includes(principal, implicit_everyone) {
            walk.enqueue(well_known.everyone().name());
        }

        debug!(
            event = "Membership",
            phase = "Seeded",
            principal = principal.name(),
            frontier = walk.frontier.len()
        );
        walk
    }

    fn origin_record(&self, principal: &Principal) -> Option<AuthorizableRecord> {
        if let Some(record) = principal.record() {
            return Some(record.clone());
        }
        match self.resolver.store().find_authorizable(principal.name()) {
            Ok(record) => record,
            Err(err) => {
                debug!(
                    event = "Membership",
                    phase = "SeedError",
                    principal = principal.name(),
                    error = %err
                );
                None
            }
        }
    }

    /// Append `id` unless it has been seen before.
    fn enqueue(&mut self, id: &str) -> bool {
        if self.visited.insert(id.to_string()) {
            self.frontier.push(id.to_string());
            true
        } else {
            false
        }
    }

    /// Consume frontier ids until one yields a principal or the frontier runs out.
    pub fn advance(&mut self) -> Option<Arc<Principal>> {
        while self.position < self.frontier.len() {
            let id = self.frontier[self.position].clone();
            self.position += 1;

            if self.resolver.well_known().is_everyone(&id) {
                return Some(Arc::clone(self.resolver.well_known().everyone()));
            }

            let record = match self.resolver.store().find_authorizable(&id) {
                Ok(Some(record)) => record,
                Ok(None) => {
                    debug!(event = "Membership", phase = "Missing", id = id);
                    continue;
                }
                Err(err) => {
                    debug!(event = "Membership", phase = "LookupError", id = id, error = %err);
                    continue;
                }
            };

            if record.is_group() {
                for parent_id in record.group_ids() {
                    self.enqueue(parent_id);
                }
            }
            return Some(self.resolver.wrap(record));
        }
        None
    }

    pub fn frontier(&self) -> &[String] {
        &self.frontier
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.frontier.len()
    }
}

impl Iterator for GroupMembership {
    type Item = Arc<Principal>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

impl std::fmt::Debug for GroupMembership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupMembership")
            .field("frontier", &self.frontier)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
