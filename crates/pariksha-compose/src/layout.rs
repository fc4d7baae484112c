// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout watcher: re-paginates the session's document after a settle delay
// whenever it changes, and after a debounce whenever the host width changes.

use std::time::Duration;

use pariksha_core::AppConfig;
use pariksha_core::types::PageSetup;
use pariksha_typeset::{Measure, MetricMeasure, Pagination, paginate_blocks, render_document};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::session::AuthoringSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutTiming {
    /// Wait after a change before measuring, so the host can lay out.
    pub settle: Duration,
    /// Width changes closer together than this are coalesced.
    pub resize_debounce: Duration,
}

impl LayoutTiming {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            settle: config.layout_settle(),
            resize_debounce: config.resize_debounce(),
        }
    }
}

/// Background pagination for one authoring session.
///
/// The task stops when the watcher is dropped or the session goes away.
pub struct LayoutWatcher {
    width: watch::Sender<f32>,
    pages: watch::Receiver<Option<Pagination>>,
    task: JoinHandle<()>,
}

impl LayoutWatcher {
    /// Watch `session`, measuring blocks with whatever `measure_for` builds
    /// for the current host width in points.
    pub fn spawn<F, M>(
        session: &AuthoringSession,
        setup: PageSetup,
        timing: LayoutTiming,
        initial_width_pt: f32,
        measure_for: F,
    ) -> Self
    where
        F: Fn(f32) -> M + Send + 'static,
        M: Measure + Send + 'static,
    {
        let document = session.document_source();
        let mut revisions = session.subscribe();
        let (width, mut width_rx) = watch::channel(initial_width_pt);
        let (pages_tx, pages) = watch::channel(None);
        let page_content_height = setup.content_height_pt();

        let task = tokio::spawn(async move {
            loop {
                tokio::time::sleep(timing.settle).await;

                revisions.borrow_and_update();
                let host_width = *width_rx.borrow_and_update();
                let pagination = {
                    let paper = render_document(&document());
                    paginate_blocks(&paper, &measure_for(host_width), page_content_height)
                };
                debug!(host_width, pages = pagination.page_count(), "layout pass");
                pages_tx.send_replace(Some(pagination));

                tokio::select! {
                    changed = revisions.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    changed = width_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        loop {
                            let next = width_rx.changed();
                            match tokio::time::timeout(timing.resize_debounce, next).await {
                                Ok(Ok(())) => continue,
                                Ok(Err(_)) => return,
                                Err(_) => break,
                            }
                        }
                    }
                }
            }
            info!("layout watcher stopped");
        });

        Self { width, pages, task }
    }

    /// Watcher using [`MetricMeasure`] for the configured page, starting at
    /// the page's content width.
    pub fn metric(session: &AuthoringSession, config: &AppConfig) -> Self {
        let setup = config.page;
        Self::spawn(
            session,
            setup,
            LayoutTiming::from_config(config),
            setup.content_width_pt(),
            move |width| MetricMeasure {
                content_width_pt: width,
                ..MetricMeasure::new(&setup)
            },
        )
    }

    /// Report a new host width in points.
    pub fn set_width(&self, width_pt: f32) {
        self.width.send_if_modified(|current| {
            if *current == width_pt {
                return false;
            }
            *current = width_pt;
            true
        });
    }

    /// Most recent pagination, once the first pass has run.
    pub fn latest(&self) -> Option<Pagination> {
        self.pages.borrow().clone()
    }

    /// Pagination stream for callers that want to await updates.
    pub fn subscribe(&self) -> watch::Receiver<Option<Pagination>> {
        self.pages.clone()
    }
}

impl Drop for LayoutWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use pariksha_bridge::{Category, MemorySaveEndpoint};
    use pariksha_core::model::{Item, Payload};
    use pariksha_core::types::GroupKind;
    use pariksha_typeset::FixedMeasure;

    fn timing() -> LayoutTiming {
        LayoutTiming {
            settle: Duration::from_millis(5),
            resize_debounce: Duration::from_millis(20),
        }
    }

    fn group(id: &str) -> Category {
        Category::new(id, id, Payload::Flat(vec![Item::new(format!("{id}-q"), "?")]))
            .with_kind(GroupKind::FreeText)
    }

    async fn next_pages(rx: &mut watch::Receiver<Option<Pagination>>) -> Pagination {
        tokio::time::timeout(Duration::from_secs(2), rx.changed())
            .await
            .expect("pagination in time")
            .expect("watcher alive");
        rx.borrow_and_update().clone().expect("pagination present")
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn repaginates_on_document_change() {
        let session =
            AuthoringSession::new(Arc::new(MemorySaveEndpoint::new()), &AppConfig::default());
        let setup = PageSetup::default();
        let page = setup.content_height_pt();
        let watcher = LayoutWatcher::spawn(&session, setup, timing(), 500.0, move |_| {
            FixedMeasure::uniform(page * 0.6)
        });
        let mut rx = watcher.subscribe();

        assert_eq!(next_pages(&mut rx).await.page_count(), 0);

        session.toggle(&group("a"));
        session.toggle(&group("b"));
        let mut pagination = next_pages(&mut rx).await;
        while pagination.heights.len() < 2 {
            pagination = next_pages(&mut rx).await;
        }
        assert_eq!(pagination.page_count(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn width_changes_are_debounced_into_one_pass() {
        let session =
            AuthoringSession::new(Arc::new(MemorySaveEndpoint::new()), &AppConfig::default());
        session.toggle(&group("a"));
        let setup = PageSetup::default();
        let watcher = LayoutWatcher::spawn(&session, setup, timing(), 500.0, FixedMeasure::uniform);
        let mut rx = watcher.subscribe();
        next_pages(&mut rx).await;

        for width in [400.0, 300.0, 200.0] {
            watcher.set_width(width);
        }
        let pagination = next_pages(&mut rx).await;
        assert_eq!(pagination.heights, vec![200.0]);
        assert_eq!(watcher.latest(), Some(pagination));
    }
}
