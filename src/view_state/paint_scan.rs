//! Back-to-front paint ordering.
//!
//! Slots are painted from the highest index down so that lower slots end
//! up on top. An unread gradient is wider than its avatar, so before a slot's
//! foreground is drawn the gradient of the slot below it (the next one to be
//! painted) may have to go first, otherwise that gradient would cover this
//! slot's avatar. The compact row's skipped leading item only exists in one
//! sub-layout and is slotted in at the right moment.
//!
//! [`PaintScan`] produces the ordered [`PaintStep`]s without drawing
//! anything, so the order can be checked on its own.

/// What the scan needs to know about one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotSummary {
    /// The compact sub-layout maps an item to this slot.
    pub has_small: bool,
    /// Either mapped item has unread stories.
    pub unread: bool,
}

/// One paint pass over one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintStep {
    /// Name label and unread gradient of the slot.
    Gradient(i32),
    /// Background ring and avatar of the slot.
    Foreground(i32),
}

/// Cross-iteration state of the backward scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaintScan {
    next_gradient_painted: bool,
    skipped_painted: bool,
}

impl PaintScan {
    /// Fresh scan state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the skipped leading slot has been painted.
    pub fn skipped_painted(&self) -> bool {
        self.skipped_painted
    }

    /// Order the paint passes for slots `first..count`, highest first.
    ///
    /// `lookup` returns `None` for slots that map to no item (including
    /// negative slots). Slots below `first` are only painted as the skipped
    /// item, at most once.
    pub fn run<F>(&mut self, count: i32, first: i32, lookup: F) -> Vec<PaintStep>
    where
        F: Fn(i32) -> Option<SlotSummary>,
    {
        let mut steps = Vec::new();
        let mut i = count;
        while i > first {
            i -= 1;
            let next = if i > 0 { lookup(i - 1) } else { None };
            let gradient_painted = self.next_gradient_painted;
            self.next_gradient_painted = false;
            let Some(current) = lookup(i) else {
                continue;
            };
            if i == first && next.is_some() && !self.skipped_painted {
                self.skipped_painted = true;
                steps.push(PaintStep::Gradient(i - 1));
                steps.push(PaintStep::Foreground(i - 1));
            }
            if !gradient_painted {
                steps.push(PaintStep::Gradient(i));
            }
            if let Some(next) = next.filter(|_| i > first && current.unread) {
                if current.has_small || !next.has_small {
                    if i - 1 == first && first > 0 && !self.skipped_painted && lookup(i - 2).is_some() {
                        self.skipped_painted = true;
                        steps.push(PaintStep::Gradient(i - 2));
                        steps.push(PaintStep::Foreground(i - 2));
                    }
                    self.next_gradient_painted = true;
                    steps.push(PaintStep::Gradient(i - 1));
                }
            }
            steps.push(PaintStep::Foreground(i));
        }
        steps
    }
}
