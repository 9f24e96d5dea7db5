//! Dispatch Module Tests
//!
//! Unit and integration tests for the orchestrator-side core.
//!
//! ## Test Scopes
//! - **Queue**: FIFO ordering, single consumption, non-blocking pop.
//! - **Registry**: at-most-once delivery, buffered one-shot handoff,
//!   bounded waits.
//! - **Dispatch flow**: the submit/fetch/deliver/await round trip the
//!   expression decomposer relies on.

#[cfg(test)]
mod tests {
    use crate::dispatch::Dispatcher;
    use crate::dispatch::handlers::handle_fetch_task;
    use crate::dispatch::queue::TaskQueue;
    use crate::dispatch::registry::ResultRegistry;
    use crate::dispatch::types::{
        DispatchError, ExpressionStatus, Operation, Task, TaskResult,
    };

    use axum::Extension;
    use axum::http::StatusCode;
    use std::sync::Arc;
    use std::time::Duration;

    fn task(id: u64, arg1: f64, arg2: f64, operation: Operation) -> Task {
        Task {
            id,
            arg1,
            arg2,
            operation,
            operation_time_ms: 0,
        }
    }

    // ============================================================
    // TEST 1: TaskQueue - FIFO order, single consumption
    // ============================================================

    #[test]
    fn test_queue_is_fifo_and_consumes_once() {
        let queue = TaskQueue::new();

        queue.enqueue(task(1, 1.0, 1.0, Operation::Add));
        queue.enqueue(task(2, 2.0, 2.0, Operation::Subtract));
        queue.enqueue(task(3, 3.0, 3.0, Operation::Multiply));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.try_dequeue().map(|t| t.id), Some(1));
        assert_eq!(queue.try_dequeue().map(|t| t.id), Some(2));
        assert_eq!(queue.try_dequeue().map(|t| t.id), Some(3));

        // Dequeued tasks are gone; the queue never returns one twice.
        assert_eq!(queue.try_dequeue(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_empty_queue_pop_is_immediate() {
        let queue = TaskQueue::new();
        // Non-blocking contract: empty is an answer, not a wait.
        assert_eq!(queue.try_dequeue(), None);
    }

    // ============================================================
    // TEST 2: ResultRegistry - delivery rules
    // ============================================================

    #[test]
    fn test_deliver_unknown_id_fails_not_found() {
        let registry = ResultRegistry::new();

        let err = registry
            .deliver(&TaskResult { id: 99, value: 1.0 })
            .unwrap_err();

        assert_eq!(err, DispatchError::NotFound(99));
    }

    #[tokio::test]
    async fn test_second_delivery_fails_already_complete() {
        let registry = ResultRegistry::new();
        let _handle = registry.register(5, "alice");

        registry.deliver(&TaskResult { id: 5, value: 2.5 }).unwrap();
        let err = registry
            .deliver(&TaskResult { id: 5, value: 9.9 })
            .unwrap_err();

        assert_eq!(err, DispatchError::AlreadyComplete(5));
        // The first value wins and is retained.
        assert_eq!(registry.value(5), Some(2.5));
        assert_eq!(registry.status(5), ExpressionStatus::Done);
    }

    #[tokio::test]
    async fn test_await_after_delivery_observes_buffered_value() {
        let registry = ResultRegistry::new();
        let handle = registry.register(7, "alice");

        // Delivery happens before anyone waits; the one-shot slot buffers it.
        registry.deliver(&TaskResult { id: 7, value: 7.0 }).unwrap();

        let value = handle.await_result(Duration::from_millis(100)).await.unwrap();
        assert_eq!(value, 7.0);
    }

    #[tokio::test]
    async fn test_await_blocks_until_delivery() {
        let registry = Arc::new(ResultRegistry::new());
        let handle = registry.register(8, "bob");
        assert_eq!(registry.status(8), ExpressionStatus::InProcess);

        let delivering = registry.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            delivering
                .deliver(&TaskResult { id: 8, value: -3.5 })
                .unwrap();
        });

        let value = handle.await_result(Duration::from_secs(2)).await.unwrap();
        assert_eq!(value, -3.5);
        assert_eq!(registry.status(8), ExpressionStatus::Done);
    }

    #[tokio::test]
    async fn test_await_deadline_expires_as_task_timeout() {
        let registry = ResultRegistry::new();
        let handle = registry.register(9, "carol");

        let err = handle
            .await_result(Duration::from_millis(20))
            .await
            .unwrap_err();

        assert_eq!(err, DispatchError::TaskTimeout(9));
        // The entry itself is untouched; a late worker result still lands.
        assert_eq!(registry.status(9), ExpressionStatus::InProcess);
        registry.deliver(&TaskResult { id: 9, value: 1.0 }).unwrap();
    }

    #[tokio::test]
    async fn test_reregistration_abandons_stale_handle() {
        let registry = ResultRegistry::new();
        let stale = registry.register(4, "alice");
        let fresh = registry.register(4, "alice");

        let err = stale.await_result(Duration::from_secs(1)).await.unwrap_err();
        assert_eq!(err, DispatchError::Abandoned(4));

        registry.deliver(&TaskResult { id: 4, value: 8.0 }).unwrap();
        let value = fresh.await_result(Duration::from_secs(1)).await.unwrap();
        assert_eq!(value, 8.0);
    }

    #[test]
    fn test_status_of_unknown_id_is_undefined() {
        let registry = ResultRegistry::new();
        assert_eq!(registry.status(12345), ExpressionStatus::Undefined);
        assert_eq!(registry.value(12345), None);
    }

    // ============================================================
    // TEST 3: Operation - closed symbol set and wire format
    // ============================================================

    #[test]
    fn test_operation_symbols_resolve_once() {
        assert_eq!(Operation::from_symbol("+").unwrap(), Operation::Add);
        assert_eq!(Operation::from_symbol("/").unwrap(), Operation::Divide);

        let err = Operation::from_symbol("%").unwrap_err();
        assert_eq!(err, DispatchError::UnsupportedOperation("%".to_string()));
    }

    #[test]
    fn test_task_wire_format_uses_symbols() {
        let json = serde_json::to_value(task(7, 3.0, 4.0, Operation::Add)).unwrap();
        assert_eq!(json["operation"], "+");
        assert_eq!(json["id"], 7);
    }

    // ============================================================
    // TEST 4: Dispatcher - producer-side validation
    // ============================================================

    #[test]
    fn test_dispatcher_rejects_identifier_zero() {
        let dispatcher = Dispatcher::new();

        let err = dispatcher
            .submit(task(0, 1.0, 1.0, Operation::Add), "alice")
            .unwrap_err();

        assert_eq!(err, DispatchError::InvalidTask);
        assert!(dispatcher.queue().is_empty());
        assert!(dispatcher.registry().is_empty());
    }

    #[test]
    fn test_dispatcher_registers_before_enqueueing() {
        let dispatcher = Dispatcher::new();
        let _handle = dispatcher
            .submit(task(11, 1.0, 2.0, Operation::Add), "alice")
            .unwrap();

        // The pending entry exists by the time a worker could fetch.
        assert_eq!(dispatcher.registry().status(11), ExpressionStatus::InProcess);
        assert_eq!(dispatcher.registry().owner(11).as_deref(), Some("alice"));
        assert_eq!(dispatcher.queue().len(), 1);
    }

    // ============================================================
    // TEST 5: Fetch handler - identifier 0 never reaches a worker
    // ============================================================

    #[tokio::test]
    async fn test_fetch_handler_drops_identifier_zero() {
        let queue = Arc::new(TaskQueue::new());
        // Bypass the dispatcher's producer-side check on purpose.
        queue.enqueue(task(0, 1.0, 1.0, Operation::Add));

        let (status, body) = handle_fetch_task(Extension(queue.clone())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.task.is_none());
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_handler_serves_queued_task() {
        let queue = Arc::new(TaskQueue::new());
        queue.enqueue(task(21, 6.0, 3.0, Operation::Divide));

        let (status, body) = handle_fetch_task(Extension(queue.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.0.task.map(|t| t.id), Some(21));

        let (status, body) = handle_fetch_task(Extension(queue)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.task.is_none());
    }

    // ============================================================
    // TEST 6: Full flow - submit, worker round trip, await
    // ============================================================

    #[tokio::test]
    async fn test_full_dispatch_round_trip() {
        let dispatcher = Dispatcher::new();
        let handle = dispatcher
            .submit(task(7, 3.0, 4.0, Operation::Add), "alice")
            .unwrap();

        // A stand-in worker: pop, compute, deliver.
        let queue = dispatcher.queue();
        let registry = dispatcher.registry();
        tokio::spawn(async move {
            let fetched = queue.try_dequeue().expect("task should be queued");
            let value = fetched.operation.apply(fetched.arg1, fetched.arg2);
            registry
                .deliver(&TaskResult { id: fetched.id, value })
                .unwrap();
        });

        let value = handle.await_result(Duration::from_secs(2)).await.unwrap();
        assert_eq!(value, 7.0);

        // A straggler delivering the same identifier is rejected.
        let err = dispatcher
            .registry()
            .deliver(&TaskResult { id: 7, value: 7.0 })
            .unwrap_err();
        assert_eq!(err, DispatchError::AlreadyComplete(7));
    }
}
