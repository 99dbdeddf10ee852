use crate::error::Re;
use crate::reactive::{Dispatcher, InputEvent, OutputUpdate};
use anyhow::{anyhow, Context};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

const QUEUE_DEPTH: usize = 64;

type Reply = oneshot::Sender<Re<Vec<OutputUpdate>>>;

/// A single consumer that runs events one at a time, in the order they were submitted.
///
/// No two recomputations ever overlap, whichever connection they came from.
#[derive(Debug)]
pub struct EventLoop {
    handle: EventLoopHandle,
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// The sending side of an `EventLoop`. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventLoopHandle {
    tx: mpsc::Sender<(InputEvent, Reply)>,
}

impl EventLoop {
    /// Starts the consumer task. It runs until `shutdown` is called or the `EventLoop` is
    /// dropped.
    pub fn spawn(dispatcher: Arc<Dispatcher>) -> Self {
        let (tx, mut rx) = mpsc::channel::<(InputEvent, Reply)>(QUEUE_DEPTH);
        let (stop, mut stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    next = rx.recv() => match next {
                        Some((event, reply)) => run(&dispatcher, event, reply),
                        None => break,
                    },
                    _ = &mut stop_rx => {
                        // Answer whatever is already queued, refuse anything new.
                        rx.close();
                        while let Some((event, reply)) = rx.recv().await {
                            run(&dispatcher, event, reply);
                        }
                        break;
                    }
                }
            }
            debug!("Event loop stopped");
        });
        Self {
            handle: EventLoopHandle { tx },
            stop,
            task,
        }
    }

    pub fn handle(&self) -> EventLoopHandle {
        self.handle.clone()
    }

    /// Stops accepting events, answers the ones already queued and waits for the task to end.
    /// Handles that are still alive get an error from `submit`.
    pub async fn shutdown(self) -> Re<()> {
        let _ = self.stop.send(());
        self.task.await.context("The event loop task panicked")
    }
}

fn run(dispatcher: &Dispatcher, event: InputEvent, reply: Reply) {
    trace!("Dispatching {event:?}");
    let result = dispatcher.dispatch(&event);
    if reply.send(result).is_err() {
        debug!("The submitter of an event went away before its result was ready");
    }
}

impl EventLoopHandle {
    /// Queues `event` and waits for its outputs.
    pub async fn submit(&self, event: InputEvent) -> Re<Vec<OutputUpdate>> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send((event, reply))
            .await
            .map_err(|_| anyhow!("The event loop has stopped"))?;
        rx.await
            .map_err(|_| anyhow!("The event loop dropped an event without answering"))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Figure, Layout};
    use crate::model::SystemType;
    use crate::reactive::{Callback, ControlState, InputId, OutputId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_submit_returns_updates() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(Callback::new(
            OutputId::WasteGraph,
            InputId::ALL,
            |s: &ControlState| Ok(Figure::new(Vec::new(), Layout::new().title(s.region()))),
        ));
        let event_loop = EventLoop::spawn(Arc::new(dispatcher));
        let handle = event_loop.handle();

        let state = ControlState::new(2024, "WA", SystemType::SmallScale);
        let updates = handle
            .submit(InputEvent::changed(InputId::RegionFilter, state))
            .await
            .unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].figure().layout().title_text(), Some("WA"));

        event_loop.shutdown().await.unwrap();
        assert!(handle
            .submit(InputEvent::initial(ControlState::new(
                2024,
                "WA",
                SystemType::SmallScale
            )))
            .await
            .is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_events_never_overlap() {
        let running = Arc::new(AtomicUsize::new(0));
        let overlaps = Arc::new(AtomicUsize::new(0));
        let (r, o) = (running.clone(), overlaps.clone());

        let mut dispatcher = Dispatcher::new();
        dispatcher.register(Callback::new(
            OutputId::WasteGraph,
            InputId::ALL,
            move |_: &ControlState| {
                if r.fetch_add(1, Ordering::SeqCst) != 0 {
                    o.fetch_add(1, Ordering::SeqCst);
                }
                std::thread::sleep(std::time::Duration::from_millis(2));
                r.fetch_sub(1, Ordering::SeqCst);
                Ok(Figure::new(Vec::new(), Layout::new()))
            },
        ));
        let event_loop = EventLoop::spawn(Arc::new(dispatcher));

        let mut tasks = Vec::new();
        for year in 2023..2043 {
            let handle = event_loop.handle();
            tasks.push(tokio::spawn(async move {
                let state = ControlState::new(year, "Australia", SystemType::LargeScale);
                handle
                    .submit(InputEvent::changed(InputId::YearSlider, state))
                    .await
            }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap().len(), 1);
        }
        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
        event_loop.shutdown().await.unwrap();
    }
}
