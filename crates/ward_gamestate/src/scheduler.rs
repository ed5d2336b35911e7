//! Deferred one-shot actions
//!
//! Time only moves when the frame loop calls [`Scheduler::advance`], so a
//! torn-down game never sees a callback.

/// Handle to a scheduled action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Task<A> {
    id: TaskId,
    due: f64,
    action: A,
}

/// Fires actions after a delay
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    now: f64,
    next_id: u64,
    tasks: Vec<Task<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            tasks: Vec::new(),
        }
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds advanced so far
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Run `action` once, `delay` seconds from now
    pub fn schedule(&mut self, delay: f32, action: A) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.tasks.push(Task {
            id,
            due: self.now + f64::from(delay.max(0.0)),
            action,
        });
        id
    }

    /// Drop a pending action. Returns false if it already ran.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Whether an action is still pending
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Advance time, returning due actions ordered by due time
    /// (ties in scheduling order)
    pub fn advance(&mut self, dt: f32) -> Vec<A> {
        self.now += f64::from(dt.max(0.0));
        let now = self.now;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|t| t.due <= now);
        self.tasks = pending;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.0.cmp(&b.id.0)));
        due.into_iter().map(|t| t.action).collect()
    }

    /// Drop everything pending
    pub fn clear(&mut self) {
        if !self.tasks.is_empty() {
            log::debug!("Cancelling {} deferred actions", self.tasks.len());
        }
        self.tasks.clear();
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_when_due() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(3.0, "close");

        assert!(scheduler.advance(2.9).is_empty());
        assert_eq!(scheduler.advance(0.2), vec!["close"]);
        assert!(scheduler.advance(10.0).is_empty());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(14.0, "escape");
        scheduler.schedule(3.0, "close");
        scheduler.schedule(3.0, "close again");

        assert_eq!(scheduler.advance(20.0), vec!["close", "close again", "escape"]);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(1.0, 1);
        scheduler.schedule(1.0, 2);

        assert!(scheduler.is_pending(id));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert_eq!(scheduler.advance(1.0), vec![2]);
    }

    #[test]
    fn test_clear() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1.0, ());
        scheduler.schedule(2.0, ());
        scheduler.clear();
        assert!(scheduler.advance(5.0).is_empty());
    }
}
