use std::fmt;
use std::sync::Weak;

use tracing::trace;

use crate::{Behaviour, ToolboxError};

/// The two passes of a frame, in the order they run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    Singletons,
    Instances,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Singletons => write!(f, "singletons"),
            Pass::Instances => write!(f, "instances"),
        }
    }
}

/// Outcome of one dispatch pass.
#[derive(Debug, Default)]
pub struct PassReport {
    /// Update hooks that returned `Ok`.
    pub visited: usize,
    /// Entries whose object had already been dropped.
    pub skipped_dead: usize,
    /// The fault that ended the pass early, if any.
    pub fault: Option<ToolboxError>,
}

impl PassReport {
    /// Whether the pass ran to the end.
    pub fn is_complete(&self) -> bool {
        self.fault.is_none()
    }
}

/// Outcome of [`Toolbox::on_update`](crate::Toolbox::on_update).
#[derive(Debug, Default)]
pub struct FrameReport {
    pub singletons: PassReport,
    pub instances: PassReport,
}

impl FrameReport {
    pub fn faults(&self) -> impl Iterator<Item = &ToolboxError> {
        self.singletons.fault.iter().chain(self.instances.fault.iter())
    }
}

/// Calls `game_update` on each live handle in order, stopping at the first error.
///
/// The handles are a snapshot: objects registered by an update hook are picked
/// up on the next pass. Logging the fault is left to the caller.
pub(crate) fn dispatch_pass(
    pass: Pass,
    handles: Vec<Weak<dyn Behaviour>>,
    trace_updates: bool,
) -> PassReport {
    let mut report = PassReport::default();

    for handle in handles {
        let Some(object) = handle.upgrade() else {
            report.skipped_dead += 1;
            continue;
        };

        if trace_updates {
            trace!(target: "frame_toolbox", %pass, "update {}", object.identity());
        }

        if let Err(source) = object.game_update() {
            report.fault = Some(ToolboxError::UpdateFailed {
                object: object.identity(),
                source,
            });
            break;
        }
        report.visited += 1;
    }

    report
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::ObjectCore;

    struct Counter {
        core: ObjectCore,
        calls: AtomicUsize,
        fail: bool,
    }

    impl Counter {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                core: ObjectCore::plain::<Counter>(),
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    impl Behaviour for Counter {
        fn core(&self) -> &ObjectCore {
            &self.core
        }

        fn game_update(&self) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("counter refused");
            }
            Ok(())
        }
    }

    fn weak(c: &Arc<Counter>) -> Weak<dyn Behaviour> {
        let handle: Weak<dyn Behaviour> = Arc::<Counter>::downgrade(c);
        handle
    }

    #[test]
    fn test_pass_visits_all() {
        let (a, b) = (Counter::new(false), Counter::new(false));
        let report = dispatch_pass(Pass::Instances, vec![weak(&a), weak(&b)], false);

        assert!(report.is_complete());
        assert_eq!(report.visited, 2);
        assert_eq!(a.calls.load(Ordering::SeqCst), 1);
        assert_eq!(b.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pass_stops_at_first_fault() {
        let (a, b, c) = (Counter::new(false), Counter::new(true), Counter::new(false));
        let report = dispatch_pass(
            Pass::Instances,
            vec![weak(&a), weak(&b), weak(&c)],
            true,
        );

        assert_eq!(report.visited, 1);
        assert_eq!(c.calls.load(Ordering::SeqCst), 0);
        match report.fault {
            Some(ToolboxError::UpdateFailed { object, source }) => {
                assert_eq!(object, b.identity());
                assert_eq!(source.to_string(), "counter refused");
            }
            other => panic!("unexpected fault: {other:?}"),
        }
    }

    #[test]
    fn test_dead_handles_are_skipped() {
        let a = Counter::new(false);
        let gone = Counter::new(true);
        let handles = vec![weak(&gone), weak(&a)];
        drop(gone);

        let report = dispatch_pass(Pass::Singletons, handles, false);
        assert!(report.is_complete());
        assert_eq!(report.skipped_dead, 1);
        assert_eq!(report.visited, 1);
    }

    #[test]
    fn test_pass_display() {
        assert_eq!(Pass::Singletons.to_string(), "singletons");
        assert_eq!(Pass::Instances.to_string(), "instances");
    }
}
