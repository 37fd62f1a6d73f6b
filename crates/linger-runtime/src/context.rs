use std::cell::RefCell;
use std::marker::PhantomData;

use linger_types::AsyncId;

thread_local! {
    static EXECUTION_STACK: RefCell<Vec<AsyncId>> = const { RefCell::new(Vec::new()) };
}

/// Id of the async resource whose callback is currently executing on this
/// thread, or [`AsyncId::ROOT`] outside of any.
pub fn execution_async_id() -> AsyncId {
    EXECUTION_STACK.with(|stack| stack.borrow().last().copied().unwrap_or(AsyncId::ROOT))
}

/// Marks `id` as the current execution context until the guard drops.
///
/// Resources created while the guard is alive report `id` as their trigger.
pub fn enter_scope(id: AsyncId) -> ExecutionScope {
    EXECUTION_STACK.with(|stack| stack.borrow_mut().push(id));
    ExecutionScope {
        id,
        _not_send: PhantomData,
    }
}

/// Guard returned by [`enter_scope`]. Bound to the thread that created it.
pub struct ExecutionScope {
    id: AsyncId,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ExecutionScope {
    fn drop(&mut self) {
        EXECUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            // Guards normally drop in LIFO order; tolerate anything else.
            if let Some(position) = stack.iter().rposition(|entry| *entry == self.id) {
                stack.remove(position);
            }
        });
    }
}
