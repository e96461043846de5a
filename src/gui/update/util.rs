//! gui/update/util.rs
use std::time::Duration;

use iced::Task;
use iced::futures::channel::oneshot;

use super::super::state::Message;

/// Run a blocking function on a background thread and await the result.
///
/// Avoids repeating the oneshot + thread boilerplate for every
/// "do work off-thread, then send Message::Finished(...)" case.
///
/// `None` only if the worker panicked before answering.
pub(crate) async fn spawn_blocking<T>(f: impl FnOnce() -> T + Send + 'static) -> Option<T>
where
    T: Send + 'static,
{
    let (tx, rx) = oneshot::channel::<T>();

    std::thread::spawn(move || {
        let _ = tx.send(f());
    });

    rx.await.ok()
}

/// Emit `message` after `delay`, on iced's tokio executor.
pub(crate) fn after(delay: Duration, message: Message) -> Task<Message> {
    Task::perform(delayed(delay, message), std::convert::identity)
}

async fn delayed<T>(delay: Duration, value: T) -> T {
    tokio::time::sleep(delay).await;
    value
}
