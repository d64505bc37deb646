use super::Page;
use crate::host::{Host, TimerId};
use crate::runtime_state::{PendingTimer, ScheduledTask, TaskCallback};
use crate::{Error, Result};

impl Page {
    pub fn now_ms(&self) -> i64 {
        self.scheduler.now_ms
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .scheduler
            .task_queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
                kind: task.callback.kind(),
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    pub fn clear_all_timers(&mut self) -> usize {
        let cleared = self.scheduler.task_queue.len();
        self.scheduler.task_queue.clear();
        self.scheduler.intersection_check_queued = false;
        self.trace_timer_line(format!("[timer] clear_all cleared={cleared}"));
        cleared
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let target = self.scheduler.now_ms.saturating_add(delta_ms);
        let from = self.scheduler.now_ms;
        let ran = self.run_until(target)?;
        self.trace_timer_line(format!(
            "[timer] advance delta_ms={delta_ms} from={from} to={} ran_due={ran}",
            self.scheduler.now_ms
        ));
        Ok(())
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        if target_ms < self.scheduler.now_ms {
            return Err(Error::Runtime(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={})",
                self.scheduler.now_ms
            )));
        }
        let from = self.scheduler.now_ms;
        let ran = self.run_until(target_ms)?;
        self.trace_timer_line(format!(
            "[timer] advance_to from={from} to={} ran_due={ran}",
            self.scheduler.now_ms
        ));
        Ok(())
    }

    /// Runs every queued task, moving the clock forward to each due time.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.scheduler.now_ms;
        let ran = self.run_timer_queue(None)?;
        self.trace_timer_line(format!(
            "[timer] flush from={from} to={} ran={ran}",
            self.scheduler.now_ms
        ));
        Ok(())
    }

    pub fn run_due_timers(&mut self) -> Result<usize> {
        let ran = self.run_timer_queue(Some(self.scheduler.now_ms))?;
        self.trace_timer_line(format!(
            "[timer] run_due now_ms={} ran={ran}",
            self.scheduler.now_ms
        ));
        Ok(ran)
    }

    // Tasks run at their own due time, so a timeout scheduled by a task
    // that fires inside the window also runs inside it.
    fn run_until(&mut self, target_ms: i64) -> Result<usize> {
        let ran = self.run_timer_queue(Some(target_ms))?;
        self.scheduler.now_ms = target_ms;
        Ok(ran)
    }

    fn run_timer_queue(&mut self, due_limit: Option<i64>) -> Result<usize> {
        let mut steps = 0usize;
        while let Some(next_idx) = self.next_task_index(due_limit) {
            steps += 1;
            if steps > self.scheduler.timer_step_limit {
                return Err(self.timer_step_limit_error(steps, due_limit));
            }
            let task = self.scheduler.task_queue.remove(next_idx);
            if task.due_at > self.scheduler.now_ms {
                self.scheduler.now_ms = task.due_at;
            }
            self.execute_task(task)?;
        }
        Ok(steps)
    }

    fn timer_step_limit_error(&self, steps: usize, due_limit: Option<i64>) -> Error {
        let due_limit_desc = due_limit
            .map(|value| value.to_string())
            .unwrap_or_else(|| "none".into());
        let next_task_desc = self
            .next_task_index(due_limit)
            .and_then(|idx| self.scheduler.task_queue.get(idx))
            .map(|task| {
                format!(
                    "id={},due_at={},order={},kind={:?}",
                    task.id,
                    task.due_at,
                    task.order,
                    task.callback.kind()
                )
            })
            .unwrap_or_else(|| "none".into());

        Error::Runtime(format!(
            "flush exceeded max task steps (possible endless animation frame loop): limit={}, steps={steps}, now_ms={}, due_limit={due_limit_desc}, pending_tasks={}, next_task={next_task_desc}",
            self.scheduler.timer_step_limit,
            self.scheduler.now_ms,
            self.scheduler.task_queue.len(),
        ))
    }

    fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.scheduler
            .task_queue
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }

    fn execute_task(&mut self, task: ScheduledTask) -> Result<()> {
        self.trace_timer_line(format!(
            "[timer] run id={} kind={:?} due_at={} now_ms={}",
            task.id,
            task.callback.kind(),
            task.due_at,
            self.scheduler.now_ms
        ));
        match task.callback {
            TaskCallback::Timeout(callback) => {
                let host: &mut dyn Host = self;
                callback(host)
            }
            TaskCallback::Frame(callback) => {
                let timestamp = self.scheduler.now_ms as f64;
                let host: &mut dyn Host = self;
                callback(host, timestamp)
            }
            TaskCallback::IntersectionCheck => {
                self.scheduler.intersection_check_queued = false;
                self.run_intersection_check()
            }
        }
    }

    pub(crate) fn schedule_task(&mut self, due_at: i64, callback: TaskCallback) -> TimerId {
        let id = self.scheduler.next_timer_id;
        self.scheduler.next_timer_id += 1;
        let order = self.scheduler.next_task_order;
        self.scheduler.next_task_order += 1;
        let kind = callback.kind();
        self.scheduler.task_queue.push(ScheduledTask {
            id,
            due_at,
            order,
            callback,
        });
        self.trace_timer_line(format!(
            "[timer] schedule id={id} kind={kind:?} due_at={due_at} now_ms={}",
            self.scheduler.now_ms
        ));
        TimerId(id)
    }

    pub(crate) fn cancel_task(&mut self, timer: TimerId) {
        let before = self.scheduler.task_queue.len();
        self.scheduler.task_queue.retain(|task| task.id != timer.0);
        let removed = before != self.scheduler.task_queue.len();
        self.trace_timer_line(format!("[timer] clear id={} removed={removed}", timer.0));
    }

    pub(crate) fn next_frame_due(&self) -> i64 {
        let interval = self.scheduler.frame_interval_ms;
        (self.scheduler.now_ms / interval + 1) * interval
    }

    pub(crate) fn queue_intersection_check(&mut self) {
        if self.scheduler.intersection_check_queued || self.observers.is_empty() {
            return;
        }
        self.scheduler.intersection_check_queued = true;
        let due_at = self.scheduler.now_ms;
        self.schedule_task(due_at, TaskCallback::IntersectionCheck);
    }
}
