use std::time::Duration;

use crate::{
    runtime::scheduler::{Handle, Scheduler, Task, TaskKind, WidgetId},
    widget::view::BarRowView,
};

/// When and how far one bar row reveals.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RevealStep {
    pub index: usize,
    /// `index * stagger` after the reveal starts.
    pub delay: Duration,
    /// `count / max(1, largest count) * 100`.
    pub width_pct: f64,
}

/// Staggered bar-row reveal.
#[derive(Clone, Debug)]
pub struct BarRevealEngine {
    stagger: Duration,
    targets: Vec<f64>,
}

impl BarRevealEngine {
    pub fn new(stagger: Duration) -> Self {
        Self {
            stagger,
            targets: Vec::new(),
        }
    }

    pub fn stagger(&self) -> Duration {
        self.stagger
    }

    /// Reveal schedule for rows with these counts, in document order.
    pub fn plan(&self, counts: &[u64]) -> Vec<RevealStep> {
        let max = counts.iter().copied().max().unwrap_or(0).max(1) as f64;
        counts
            .iter()
            .enumerate()
            .map(|(index, &count)| RevealStep {
                index,
                delay: self.stagger.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX)),
                width_pct: count as f64 / max * 100.0,
            })
            .collect()
    }

    /// Schedule one reveal timer per row, registering each handle in `pending`.
    /// Returns the number of timers armed; empty `rows` arms nothing.
    pub fn reveal(
        &mut self,
        sched: &mut dyn Scheduler,
        pending: &mut Vec<Handle>,
        widget: WidgetId,
        rows: &[BarRowView],
    ) -> usize {
        let counts: Vec<u64> = rows.iter().map(|r| r.count).collect();
        let steps = self.plan(&counts);
        self.targets = steps.iter().map(|s| s.width_pct).collect();
        for step in &steps {
            let task = Task::new(widget, TaskKind::RevealRow { index: step.index });
            pending.push(sched.set_timeout(step.delay, task));
        }
        steps.len()
    }

    /// Show row `index` at its planned width. Returns `false` for unknown rows.
    pub fn apply(&self, rows: &mut [BarRowView], index: usize) -> bool {
        let (Some(row), Some(&width)) = (rows.get_mut(index), self.targets.get(index)) else {
            return false;
        };
        row.revealed = true;
        row.width_pct = width;
        row.value_opacity = 1.0;
        true
    }

    /// Put every row back to its unrevealed, zero-width state.
    pub fn reset(&mut self, rows: &mut [BarRowView]) {
        self.targets.clear();
        for row in rows {
            row.revealed = false;
            row.hover = false;
            row.width_pct = 0.0;
            row.value_opacity = 0.0;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/bars.rs"]
mod tests;
