/// Identifies an observer attached to an [`Observable`](crate::observable::Observable)
/// or [`ObservableVec`](crate::collection::ObservableVec). Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(pub u64);

/// Identifies a tick subscriber registered on a [`TickEngine`](crate::tick::TickEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);
