use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::events::{ClickHub, Subscription};
use crate::fetch::ApiClient;
use crate::render;
use crate::sort::{SortOrder, SortState};
use crate::table::{IconGlyphs, LoadingGuard, TableModel};
use crate::task::TaskPage;

#[derive(Clone)]
pub struct SortController {
    table: Rc<RefCell<TableModel>>,
    state: Rc<RefCell<SortState>>,
    last_page: Rc<RefCell<Option<TaskPage>>>,
    client: ApiClient,
    api_url: String,
    glyphs: IconGlyphs,
}

impl SortController {
    pub fn new(
        table: Rc<RefCell<TableModel>>,
        client: ApiClient,
        api_url: &str,
        glyphs: IconGlyphs,
    ) -> Self {
        Self {
            table,
            state: Rc::new(RefCell::new(SortState::new())),
            last_page: Rc::new(RefCell::new(None)),
            client,
            api_url: api_url.to_string(),
            glyphs,
        }
    }

    pub fn sort_state(&self) -> SortState {
        self.state.borrow().clone()
    }

    pub fn last_page(&self) -> Option<TaskPage> {
        self.last_page.borrow().clone()
    }

    /// Synchronous part of a header click; the returned refresh job is
    /// spawned by the caller. Jobs are neither serialized nor cancelled, so
    /// overlapping responses land in whatever order they resolve.
    pub fn click(&self, field: &str) -> Pin<Box<dyn Future<Output = ()>>> {
        let order = self.state.borrow_mut().apply_click(field);
        self.table
            .borrow_mut()
            .set_sort_icons(field, order, &self.glyphs);
        debug!(field, order = order.as_str(), "sort state updated");

        let this = self.clone();
        let field = field.to_string();
        Box::pin(async move { this.refresh(&field, order).await })
    }

    async fn refresh(&self, field: &str, order: SortOrder) {
        let _loading = LoadingGuard::begin(Rc::clone(&self.table));

        match self.client.fetch_sorted(&self.api_url, field, order).await {
            Ok(page) => {
                let mut table = self.table.borrow_mut();
                table.body.html = render::render_body(&page.tasks, table.kind);
                info!(
                    field,
                    order = order.as_str(),
                    tasks = page.tasks.len(),
                    "re-rendered table body"
                );
                drop(table);
                *self.last_page.borrow_mut() = Some(page);
            }
            Err(err) => {
                // body keeps whatever was last rendered successfully
                error!(error = %format!("{err:#}"), field, "failed fetching sorted tasks");
            }
        }
    }
}

pub struct SortingHandle {
    controller: SortController,
    // held for their disposers; dropping the handle detaches the handlers
    _subscriptions: Vec<Subscription>,
    jobs: Rc<RefCell<Vec<tokio::task::JoinHandle<()>>>>,
}

impl SortingHandle {
    pub fn controller(&self) -> &SortController {
        &self.controller
    }

    /// Awaits every outstanding refresh job, without ordering them.
    pub async fn settle(&self) {
        loop {
            let job = self.jobs.borrow_mut().pop();
            match job {
                Some(job) => {
                    let _ = job.await;
                }
                None => break,
            }
        }
    }
}

/// Wires a click handler for every sortable header of the table. Call once
/// per table instance; separate tables get independent controllers and sort
/// states. Dropping the returned handle detaches all handlers.
///
/// Handlers spawn their refresh jobs with `tokio::task::spawn_local`, so
/// dispatches must happen inside a `LocalSet`.
#[tracing::instrument(skip(hub, table, client, cfg))]
pub fn init_table_sorting(
    hub: &ClickHub,
    table: Rc<RefCell<TableModel>>,
    api_url: &str,
    client: ApiClient,
    cfg: &Config,
) -> SortingHandle {
    let glyphs = IconGlyphs::from_config(cfg);
    let controller = SortController::new(Rc::clone(&table), client, api_url, glyphs);
    let jobs: Rc<RefCell<Vec<tokio::task::JoinHandle<()>>>> = Rc::new(RefCell::new(Vec::new()));

    let fields = table.borrow().sortable_fields();
    if fields.is_empty() {
        warn!(table = %table.borrow().element_id, "table has no sortable headers");
    }

    let mut subscriptions = Vec::with_capacity(fields.len());
    for field in fields {
        let controller = controller.clone();
        let jobs = Rc::clone(&jobs);
        let handler_field = field.clone();
        subscriptions.push(hub.subscribe(&field, move || {
            let job = controller.click(&handler_field);
            jobs.borrow_mut().push(tokio::task::spawn_local(job));
        }));
    }

    info!(
        table = %table.borrow().element_id,
        headers = subscriptions.len(),
        "wired sortable headers"
    );

    SortingHandle {
        controller,
        _subscriptions: subscriptions,
        jobs,
    }
}
