//! Lifetime planning for escaping closures.
//!
//! A plan says when the origin side acquires the holder that keeps a target
//! callable reachable, and which events release it. Acquire and release each
//! happen exactly once per bound closure instance; the holder belongs to the
//! storage location, never to the caller.

use jbridge_model::{BindingSite, SiteKind, StoreShape};
use serde::Serialize;

use crate::error::LifetimePlanConflictError;
use crate::naming::SiteNames;
use crate::select::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlanShape {
    /// One live closure at a time; setting while bound overwrites.
    Slot,
    /// Many live closures; acquire-on-add, release-on-remove-all.
    Collection,
}

/// When the holder is acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AcquirePoint {
    /// Entry of a call that stores its escaping parameter.
    CallEntry,
    /// Property set.
    Set,
    /// Append to a collection store.
    Add,
}

/// Events that run the release step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReleaseTrigger {
    /// Explicit clear: release immediately.
    Clear,
    /// A new closure replaced this one: release once in-flight invocations
    /// have been dispatched into the bridge.
    Overwrite,
    /// Remove-all on a collection store.
    RemoveAll,
    /// Teardown of the object owning the storage location.
    OwnerTeardown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcquireStep {
    /// Holder variable in generated code.
    pub holder: String,
    pub at: AcquirePoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseStep {
    /// Whichever trigger fires first runs the release; the others are then no-ops.
    pub triggers: Vec<ReleaseTrigger>,
}

impl ReleaseStep {
    pub fn releases_on(&self, trigger: ReleaseTrigger) -> bool {
        self.triggers.contains(&trigger)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifetimePlan {
    pub shape: PlanShape,
    /// The storage location owning the holder (`Scope.member`).
    pub owner: String,
    pub acquire: AcquireStep,
    pub release: ReleaseStep,
}

/// Plans the holder lifetime for a selected site.
///
/// Returns `Ok(None)` when nothing outlives the call: non-escaping closures
/// and escaping parameters the receiving API does not store.
pub fn plan_lifetime(
    site: &BindingSite,
    selection: &Selection,
    names: &SiteNames,
) -> Result<Option<LifetimePlan>, LifetimePlanConflictError> {
    check_conflict(site)?;
    if !selection.strategy.is_escaping() || !selection.has_storage {
        log::trace!("{}: no lifetime plan", site);
        return Ok(None);
    }

    let owner = format!("{}.{}", site.scope, site.member);
    let plan = match &site.kind {
        SiteKind::Parameter { .. } => LifetimePlan {
            shape: PlanShape::Slot,
            owner,
            acquire: AcquireStep {
                holder: names.holder.clone(),
                at: AcquirePoint::CallEntry,
            },
            release: ReleaseStep {
                triggers: vec![ReleaseTrigger::OwnerTeardown],
            },
        },
        SiteKind::Property(accessors) => match accessors.store {
            StoreShape::Single => {
                let mut triggers = Vec::new();
                if accessors.clear.is_some() {
                    triggers.push(ReleaseTrigger::Clear);
                }
                if accessors.overwrites {
                    triggers.push(ReleaseTrigger::Overwrite);
                }
                triggers.push(ReleaseTrigger::OwnerTeardown);
                LifetimePlan {
                    shape: PlanShape::Slot,
                    owner,
                    acquire: AcquireStep {
                        holder: names.holder.clone(),
                        at: AcquirePoint::Set,
                    },
                    release: ReleaseStep { triggers },
                }
            }
            StoreShape::Collection => {
                let mut triggers = Vec::new();
                if accessors.clear.is_some() {
                    triggers.push(ReleaseTrigger::RemoveAll);
                }
                triggers.push(ReleaseTrigger::OwnerTeardown);
                LifetimePlan {
                    shape: PlanShape::Collection,
                    owner,
                    acquire: AcquireStep {
                        holder: names.holder.clone(),
                        at: AcquirePoint::Add,
                    },
                    release: ReleaseStep { triggers },
                }
            }
        },
    };
    log::debug!(
        "{}: {:?} plan, acquire at {:?}, release on {:?}",
        site,
        plan.shape,
        plan.acquire.at,
        plan.release.triggers
    );
    Ok(Some(plan))
}

/// Rejects overwrite semantics on a collection-backed store.
pub fn check_conflict(site: &BindingSite) -> Result<(), LifetimePlanConflictError> {
    match site.accessors() {
        Some(accessors) if accessors.store == StoreShape::Collection && accessors.overwrites => {
            Err(LifetimePlanConflictError {
                site: site.to_string(),
            })
        }
        _ => Ok(()),
    }
}
