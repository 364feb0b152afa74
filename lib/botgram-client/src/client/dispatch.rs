// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Decides whether an outgoing call runs now or on a detached timer task,
//! and chains the optional post-delivery deletion.

use crate::errors::SendError;
use crate::types::Envelope;
use botgram_sender::{InvocationError, Part};
use botgram_types::{Message, Peer};
use log::{debug, warn};
use std::future::Future;
use std::time::Duration;
use tokio::task::AbortHandle;

/// What sending produced: the delivered message, or a handle to a call
/// that is still waiting on its timer.
#[derive(Debug)]
pub enum Sent {
    /// The call ran right away and this is the server's answer.
    Delivered(Message),
    /// The call was moved onto a detached timer task. Its eventual result
    /// is not delivered anywhere; the handle can only cancel it.
    Scheduled(ScheduledSend),
}

impl Sent {
    /// The delivered message, if the call ran right away.
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Delivered(message) => Some(message),
            Self::Scheduled(_) => None,
        }
    }

    pub fn into_message(self) -> Option<Message> {
        match self {
            Self::Delivered(message) => Some(message),
            Self::Scheduled(_) => None,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled(_))
    }
}

/// Handle to a send waiting on its timer.
///
/// Dropping the handle does *not* cancel the send; the task keeps its own
/// timeline. Cancelling releases the files the task had captured.
#[derive(Debug)]
pub struct ScheduledSend {
    abort: AbortHandle,
}

impl ScheduledSend {
    /// Cancels the pending send. Has no effect once the call has started
    /// running; a delivery that already happened stays delivered, as does a
    /// deletion already chained from it.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// Whether the task has finished, successfully or not. A send that was
    /// cancelled in time also counts as finished.
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Runs `send` either right now or, when the envelope asks for a delay,
/// on a detached task; chains the deletion either way.
///
/// `send` must perform exactly one transport call. `delete` is only used
/// when the envelope carries a post-delivery deletion delay, with the chat
/// and message identifiers captured from the delivered message.
pub(crate) async fn dispatch<S, SF, D, DF>(
    mut envelope: Envelope,
    send: S,
    delete: D,
) -> Result<Sent, SendError>
where
    S: FnOnce(Vec<Part>) -> SF + Send + 'static,
    SF: Future<Output = Result<Message, InvocationError>> + Send + 'static,
    D: FnOnce(Peer, i32) -> DF + Send + 'static,
    DF: Future<Output = Result<(), InvocationError>> + Send + 'static,
{
    match envelope.after.take() {
        None => {
            let message = run(envelope, send, delete).await?;
            Ok(Sent::Delivered(message))
        }
        Some(delay) => {
            // The envelope moves into the task whole: attachments included,
            // so the task is the one exit path left that can release them.
            let task = tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Err(error) = run(envelope, send, delete).await {
                    warn!("deferred send failed: {}", error);
                }
            });
            Ok(Sent::Scheduled(ScheduledSend {
                abort: task.abort_handle(),
            }))
        }
    }
}

/// The part of the pipeline shared by both paths: stream, clean up, chain.
async fn run<S, SF, D, DF>(
    mut envelope: Envelope,
    send: S,
    delete: D,
) -> Result<Message, InvocationError>
where
    S: FnOnce(Vec<Part>) -> SF,
    SF: Future<Output = Result<Message, InvocationError>>,
    D: FnOnce(Peer, i32) -> DF + Send + 'static,
    DF: Future<Output = Result<(), InvocationError>> + Send + 'static,
{
    let delete_after = envelope.delete_after;
    let parts = envelope.take_parts();
    let result = send(parts).await;
    envelope.discard();

    let message = result?;
    if let Some(delay) = delete_after {
        schedule_delete(delete, Peer::Id(message.chat.id), message.id, delay);
    }
    Ok(message)
}

/// Starts the fire-and-forget deletion of a delivered message. The result
/// never reaches a caller; failures go to the log and nowhere else.
fn schedule_delete<D, DF>(delete: D, peer: Peer, message_id: i32, delay: Duration)
where
    D: FnOnce(Peer, i32) -> DF + Send + 'static,
    DF: Future<Output = Result<(), InvocationError>> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        match delete(peer, message_id).await {
            Ok(()) => debug!("deleted message {} as scheduled", message_id),
            Err(error) => warn!("deferred deletion of message {} failed: {}", message_id, error),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use botgram_types::{Chat, ChatKind};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;
    use tokio::time::Instant;

    fn message(id: i32) -> Message {
        Message {
            id,
            chat: Chat {
                id: 10,
                kind: ChatKind::Private,
                title: None,
                username: None,
                first_name: Some("Ada".to_string()),
                last_name: None,
            },
            from: None,
            date: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            text: Some("hi".to_string()),
            caption: None,
            photo: None,
            video: None,
            document: None,
            reply_to_message: None,
        }
    }

    fn no_delete() -> impl FnOnce(
        Peer,
        i32,
    ) -> std::future::Ready<Result<(), InvocationError>>
    + Send
    + 'static {
        |_, _| {
            panic!("no deletion should have been scheduled");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_send_invokes_once_and_returns_the_result() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);

        let sent = dispatch(
            Envelope::new(),
            move |parts| async move {
                assert!(parts.is_empty());
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(message(42))
            },
            no_delete(),
        )
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(sent.message().unwrap().id, 42);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_failure_is_returned_unchanged() {
        let sent = dispatch(
            Envelope::new(),
            |_| async { Err(InvocationError::Empty) },
            no_delete(),
        )
        .await;

        assert!(matches!(
            sent,
            Err(SendError::Invoke(InvocationError::Empty))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn deferred_send_returns_placeholder_and_runs_after_the_delay() {
        let started = Instant::now();
        let (tx, rx) = oneshot::channel();

        let mut envelope = Envelope::new();
        envelope.after = Some(Duration::from_secs(2));

        let sent = dispatch(
            envelope,
            move |_| async move {
                tx.send(Instant::now()).unwrap();
                Ok(message(7))
            },
            no_delete(),
        )
        .await
        .unwrap();

        // Control came back before the timer fired.
        assert!(sent.is_scheduled());
        assert!(started.elapsed() < Duration::from_secs(2));

        let invoked_at = rx.await.unwrap();
        assert!(invoked_at - started >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn delete_chain_targets_the_delivered_message() {
        let started = Instant::now();
        let (tx, rx) = oneshot::channel();

        let mut envelope = Envelope::new();
        envelope.after = Some(Duration::from_secs(2));
        envelope.delete_after = Some(Duration::from_secs(5));

        dispatch(
            envelope,
            |_| async { Ok(message(7)) },
            move |peer, message_id| {
                tx.send((Instant::now(), peer, message_id)).unwrap();
                std::future::ready(Ok(()))
            },
        )
        .await
        .unwrap();

        let (deleted_at, peer, message_id) = rx.await.unwrap();
        assert_eq!(peer, Peer::Id(10));
        assert_eq!(message_id, 7);
        assert!(deleted_at - started >= Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn delete_chain_runs_from_the_immediate_path_too() {
        let (tx, rx) = oneshot::channel();

        let mut envelope = Envelope::new();
        envelope.delete_after = Some(Duration::from_secs(5));

        let started = Instant::now();
        let sent = dispatch(
            envelope,
            |_| async { Ok(message(42)) },
            move |_, message_id| {
                tx.send((Instant::now(), message_id)).unwrap();
                std::future::ready(Ok(()))
            },
        )
        .await
        .unwrap();
        assert_eq!(sent.into_message().unwrap().id, 42);

        let (deleted_at, message_id) = rx.await.unwrap();
        assert_eq!(message_id, 42);
        assert!(deleted_at - started >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_send_does_not_chain_a_deletion() {
        let deletions = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&deletions);

        let mut envelope = Envelope::new();
        envelope.delete_after = Some(Duration::from_secs(5));

        let sent = dispatch(
            envelope,
            |_| async { Err(InvocationError::Empty) },
            move |_, _| {
                seen.fetch_add(1, Ordering::SeqCst);
                std::future::ready(Ok(()))
            },
        )
        .await;
        assert!(sent.is_err());

        // Give a wrongly spawned deletion every chance to run.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(deletions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_send_never_invokes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);

        let mut envelope = Envelope::new();
        envelope.after = Some(Duration::from_secs(2));

        let sent = dispatch(
            envelope,
            move |_| async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(message(7))
            },
            no_delete(),
        )
        .await
        .unwrap();

        match &sent {
            Sent::Scheduled(handle) => handle.cancel(),
            Sent::Delivered(_) => panic!("expected a scheduled send"),
        }

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        match sent {
            Sent::Scheduled(handle) => assert!(handle.is_finished()),
            Sent::Delivered(_) => unreachable!(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn deferred_failure_is_swallowed() {
        let mut envelope = Envelope::new();
        envelope.after = Some(Duration::from_secs(1));

        let sent = dispatch(
            envelope,
            |_| async { Err(InvocationError::Empty) },
            no_delete(),
        )
        .await
        .unwrap();
        assert!(sent.is_scheduled());

        // The task runs, fails, and nothing of it reaches us.
        tokio::time::sleep(Duration::from_secs(2)).await;
        if let Sent::Scheduled(handle) = sent {
            assert!(handle.is_finished());
        }
    }
}
