use super::{SegmentDescriptor, SegmentLayout};
use std::cmp::Ordering;

/// Rank order of the legal window: segments of this run before foreign ones,
/// then newer sequence first, then the name itself so equal keys still have
/// a fixed order.
fn rank(a: &SegmentDescriptor, b: &SegmentDescriptor) -> Ordering {
    b.current_run
        .cmp(&a.current_run)
        .then_with(|| b.sequence.cmp(&a.sequence))
        .then_with(|| b.name.cmp(&a.name))
}

/// The newest `window + buffer` managed segments among `names`, best first.
///
/// Unparseable names are dropped, not reported. With fewer candidates than the
/// window, every candidate is returned.
pub fn select_legal<S: AsRef<str>>(
    layout: &SegmentLayout,
    names: &[S],
    window: usize,
    buffer: usize,
) -> Vec<SegmentDescriptor> {
    let mut segments: Vec<SegmentDescriptor> = names
        .iter()
        .filter_map(|name| layout.parse(name.as_ref()))
        .collect();
    segments.sort_by(rank);
    segments.dedup_by(|a, b| a.name == b.name);
    segments.truncate(window.saturating_add(buffer));
    segments
}
