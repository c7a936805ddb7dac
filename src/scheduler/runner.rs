//! Page scheduler — arbitrates mutually-exclusive page loops over the
//! shared capture device and render sink.
//!
//! # Switching protocol
//!
//! ```text
//! activate(B)
//!   ├─ cancel A's token            (A observes it at its next checkpoint)
//!   ├─ await A's join handle       (real completion acknowledgment)
//!   └─ spawn B with a fresh token + fresh PageContext clone
//! ```
//!
//! Because the scheduler awaits the outgoing task before spawning the next
//! one, the mutual-exclusion invariant is hard: once `activate` returns, no
//! previous loop can touch the sink or the capture source again.  There is
//! no grace-period delay and no race against an in-flight remote call — the
//! join only completes after the loop has fully unwound.
//!
//! # Failure semantics
//!
//! A page loop that returns an error has already terminated on its own.  The
//! wrapper task logs the failure and surfaces it through
//! [`RenderSink::show_error`]; the scheduler then reports no active page.
//! There is no automatic retry.
//!
//! [`RenderSink::show_error`]: crate::render::RenderSink::show_error

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::page::{Page, PageContext, PageId};

// ---------------------------------------------------------------------------
// SchedulerError
// ---------------------------------------------------------------------------

/// Errors from scheduler operations.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// `activate` was called with a page id not registered at startup.
    #[error("unknown page: {0:?}")]
    UnknownPage(PageId),
}

// ---------------------------------------------------------------------------
// PageScheduler
// ---------------------------------------------------------------------------

struct ActivePage {
    id: PageId,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the static page set and guarantees at most one live page loop.
pub struct PageScheduler {
    pages: HashMap<PageId, Arc<dyn Page>>,
    ctx: PageContext,
    active: Option<ActivePage>,
}

impl PageScheduler {
    /// Build a scheduler over the static page set.
    ///
    /// Pages are created once here and toggled repeatedly for the life of
    /// the session.
    pub fn new(pages: Vec<Arc<dyn Page>>, ctx: PageContext) -> Self {
        let pages = pages.into_iter().map(|p| (p.id(), p)).collect();
        Self {
            pages,
            ctx,
            active: None,
        }
    }

    /// The currently active page, or `None` when idle or after the active
    /// loop has terminated (cancellation or failure).
    pub fn active_page(&self) -> Option<PageId> {
        self.active
            .as_ref()
            .filter(|a| !a.handle.is_finished())
            .map(|a| a.id)
    }

    /// Switch to `id`: stop the current page, wait for it to fully exit,
    /// then start the new page's loop.
    ///
    /// Re-activating the already-active page restarts it from scratch
    /// (per-activation state such as the announced-class set is rebuilt).
    pub async fn activate(&mut self, id: PageId) -> Result<(), SchedulerError> {
        let page = self
            .pages
            .get(&id)
            .cloned()
            .ok_or(SchedulerError::UnknownPage(id))?;

        self.deactivate().await;

        log::info!("scheduler: activating {}", id.label());

        let token = CancellationToken::new();
        let ctx = self.ctx.clone();
        let sink = ctx.sink.clone();
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            match page.run(ctx, task_token).await {
                Ok(()) => {
                    log::debug!("page {} exited cleanly", id.label());
                }
                Err(e) => {
                    log::error!("page {} failed: {e}", id.label());
                    sink.show_error(&format!("{} stopped: {e}", id.label()));
                }
            }
        });

        self.active = Some(ActivePage { id, token, handle });
        Ok(())
    }

    /// Stop the active page, if any, and wait for its loop to exit.
    pub async fn deactivate(&mut self) {
        if let Some(active) = self.active.take() {
            log::info!("scheduler: deactivating {}", active.id.label());
            active.token.cancel();
            if let Err(e) = active.handle.await {
                // The wrapper task never panics on page errors; this only
                // fires if the page itself panicked.
                log::warn!("page {} task panicked: {e}", active.id.label());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
