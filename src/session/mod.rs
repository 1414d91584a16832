use tokio::sync::mpsc;

use crate::timer::CancellableTimer;
use crate::view::{Effect, Frame, Timings, UiEvent, ViewModel};

/// Drives a `ViewModel` from a stream of UI events, owning the search
/// debounce and the settle delay. A frame is published after every change.
#[derive(Debug)]
pub struct Session {
    view: ViewModel,
    timings: Timings,
    debounce: CancellableTimer,
    settle: CancellableTimer,
}

impl Session {
    pub fn new(view: ViewModel, timings: Timings) -> Self {
        Self {
            view,
            timings,
            debounce: CancellableTimer::new(),
            settle: CancellableTimer::new(),
        }
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn search_pending(&self) -> bool {
        self.debounce.is_armed()
    }

    pub fn recompute_pending(&self) -> bool {
        self.settle.is_armed()
    }

    /// Applies one event. Returns whether the view changed.
    pub fn dispatch(&mut self, event: UiEvent) -> bool {
        let effect = self.view.handle(event);
        self.apply(effect)
    }

    fn apply(&mut self, effect: Effect) -> bool {
        match effect {
            Effect::None => false,
            Effect::Render => true,
            Effect::DebounceSearch => {
                self.debounce.restart(self.timings.search_debounce);
                true
            }
            Effect::Recompute => {
                // The recompute reads the live search text, so a pending
                // debounce has nothing left to do.
                self.debounce.cancel();
                if self.settle.arm_if_idle(self.timings.settle_delay) {
                    tracing::trace!("recompute scheduled");
                }
                self.view.begin_recompute();
                true
            }
        }
    }

    /// Runs until the event channel closes or the frame receiver goes away,
    /// then hands the final state back.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<UiEvent>,
        frames: mpsc::Sender<Frame>,
    ) -> ViewModel {
        if frames.send(self.view.frame()).await.is_err() {
            return self.view;
        }
        loop {
            let changed = tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.dispatch(event),
                    None => break,
                },
                _ = self.debounce.fired() => self.apply(Effect::Recompute),
                _ = self.settle.fired() => {
                    self.view.finish_recompute();
                    true
                }
            };
            if changed && frames.send(self.view.frame()).await.is_err() {
                break;
            }
        }
        self.view
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::filter::SelectControl;
    use crate::loader::Directory;

    fn directory() -> Directory {
        Directory::from_json(
            r#"[
                {"Name":"Climate Action Now","Operational Domain":"Policy"},
                {"Name":"Ocean Watch","Operational Domain":"Research"},
                {"Name":"Acting Locally","Flagged for Review":"true"}
            ]"#,
        )
        .unwrap()
    }

    fn start() -> (
        mpsc::Sender<UiEvent>,
        mpsc::Receiver<Frame>,
        tokio::task::JoinHandle<ViewModel>,
    ) {
        let (event_tx, event_rx) = mpsc::channel(16);
        let (frame_tx, frame_rx) = mpsc::channel(64);
        let session = Session::new(ViewModel::new(directory()), Timings::default());
        let handle = tokio::spawn(session.run(event_rx, frame_tx));
        (event_tx, frame_rx, handle)
    }

    #[tokio::test(start_paused = true)]
    async fn typing_burst_recomputes_once_after_quiet_period() {
        let (tx, mut frames, handle) = start();
        let initial = frames.recv().await.unwrap();
        assert_eq!(initial.stats, "Showing 2 of 3 organizations");

        tx.send(UiEvent::SearchInput("ac".to_string())).await.unwrap();
        let typed = frames.recv().await.unwrap();
        assert!(!typed.loading);
        assert!(typed.clear_search_visible);

        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(UiEvent::SearchInput("act".to_string())).await.unwrap();
        frames.recv().await.unwrap();
        let typed_at = Instant::now();

        let loading = frames.recv().await.unwrap();
        assert!(loading.loading);
        assert_eq!(typed_at.elapsed(), Duration::from_millis(300));

        let done = frames.recv().await.unwrap();
        assert!(!done.loading);
        assert_eq!(typed_at.elapsed(), Duration::from_millis(450));
        assert_eq!(done.stats, "Showing 1 of 3 organizations");
        assert!(done.badges.contains("act"));

        drop(tx);
        let view = handle.await.unwrap();
        assert_eq!(view.applied_filters().search, "act");
        assert_eq!(view.visible(), &[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn selection_recomputes_after_settle_delay() {
        let (tx, mut frames, handle) = start();
        frames.recv().await.unwrap();

        let sent_at = Instant::now();
        tx.send(UiEvent::Select(SelectControl::Domain, "Research".to_string()))
            .await
            .unwrap();
        let loading = frames.recv().await.unwrap();
        assert!(loading.loading);
        assert_eq!(loading.stats, "Showing 2 of 3 organizations");

        let done = frames.recv().await.unwrap();
        assert_eq!(sent_at.elapsed(), Duration::from_millis(150));
        assert_eq!(done.stats, "Showing 1 of 3 organizations");

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_search_cancels_pending_debounce() {
        let (tx, mut frames, handle) = start();
        frames.recv().await.unwrap();

        tx.send(UiEvent::SearchInput("ocean".to_string())).await.unwrap();
        frames.recv().await.unwrap();
        tx.send(UiEvent::ClearSearch).await.unwrap();
        assert!(frames.recv().await.unwrap().loading);
        let done = frames.recv().await.unwrap();
        assert!(!done.loading);
        assert!(!done.clear_search_visible);

        // No second recompute once the old debounce deadline has passed.
        let late = tokio::time::timeout(Duration::from_secs(1), frames.recv()).await;
        assert!(late.is_err());

        drop(tx);
        let view = handle.await.unwrap();
        assert_eq!(view.visible(), &[1, 2]);
    }

    #[tokio::test]
    async fn dispatch_reports_changes() {
        let mut session = Session::new(ViewModel::new(directory()), Timings::default());
        assert!(!session.dispatch(UiEvent::CloseDetails));
        assert!(session.dispatch(UiEvent::SearchInput("x".to_string())));
        assert!(session.search_pending());
        assert!(session.dispatch(UiEvent::ResetFilters));
        assert!(!session.search_pending());
        assert!(session.recompute_pending());
        assert!(session.view().is_loading());
    }
}
