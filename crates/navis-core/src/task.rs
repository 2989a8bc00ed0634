//! 延迟任务队列。
//!
//! # 教案式说明
//! - **意图（Why）**：导航进行中（`routing == true`）由中间件发起的重定向不能内联执行，
//!   否则会与正在运行的导航争抢 `canonical_context` 与地址栏；
//! - **逻辑（How）**：任务以零参闭包入队，导航收尾时 [`TaskQueue::take`] 原子地取走快照并清空，
//!   随后并发启动全部任务并等待其完成；排空期间新入队的任务留给下一次排空；
//! - **契约（What）**：启动顺序与入队顺序一致（FIFO），每个任务恰好执行一次。

use futures_util::future::{BoxFuture, join_all};
use parking_lot::Mutex;

/// 入队的任务：调用后返回待驱动的 Future。
pub type Task = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

#[derive(Default)]
pub struct TaskQueue {
    pending: Mutex<Vec<Task>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, task: Task) {
        self.pending.lock().push(task);
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// 交换出当前全部任务，队列随即为空。
    pub fn take(&self) -> Vec<Task> {
        core::mem::take(&mut *self.pending.lock())
    }

    /// 排空队列：按入队顺序启动快照中的任务并等待全部完成，返回执行的任务数。
    pub async fn drain(&self) -> usize {
        let tasks = self.take();
        let count = tasks.len();
        if count == 0 {
            return 0;
        }
        tracing::debug!(count, "draining deferred navigation tasks");
        join_all(tasks.into_iter().map(|task| task())).await;
        count
    }
}

impl core::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use std::sync::Arc;

    #[test]
    fn drain_runs_in_fifo_order_exactly_once() {
        let queue = TaskQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for name in ["r1", "r2"] {
            let log = Arc::clone(&log);
            queue.push(Box::new(move || {
                async move { log.lock().push(name) }.boxed()
            }));
        }
        assert_eq!(futures::executor::block_on(queue.drain()), 2);
        assert_eq!(futures::executor::block_on(queue.drain()), 0);
        assert_eq!(*log.lock(), vec!["r1", "r2"]);
    }

    #[test]
    fn tasks_pushed_while_draining_wait_for_next_pass() {
        let queue = Arc::new(TaskQueue::new());
        let ran = Arc::new(Mutex::new(Vec::new()));
        {
            let queue_in_task = Arc::clone(&queue);
            let ran = Arc::clone(&ran);
            queue.push(Box::new(move || {
                async move {
                    ran.lock().push("outer");
                    let ran_inner = Arc::clone(&ran);
                    queue_in_task.push(Box::new(move || {
                        async move { ran_inner.lock().push("inner") }.boxed()
                    }));
                }
                .boxed()
            }));
        }
        futures::executor::block_on(queue.drain());
        assert_eq!(*ran.lock(), vec!["outer"]);
        assert_eq!(queue.len(), 1);
        futures::executor::block_on(queue.drain());
        assert_eq!(*ran.lock(), vec!["outer", "inner"]);
    }
}
