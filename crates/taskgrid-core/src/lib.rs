pub mod cli;
pub mod config;
pub mod events;
pub mod fetch;
pub mod render;
pub mod sort;
pub mod sorter;
pub mod table;
pub mod task;

use std::cell::RefCell;
use std::ffi::OsString;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let pre = cli::preprocess_args(&raw_args)?;
    let cli = cli::GlobalCli::parse_from(pre.cleaned_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(verbose = cli.verbose, quiet = cli.quiet, "starting taskgrid CLI");
    debug!(?pre.rc_overrides, "preprocessed rc overrides");

    let mut cfg = config::Config::load(cli.config.as_deref())?;
    cfg.apply_overrides(
        pre.rc_overrides
            .into_iter()
            .chain(cli.rc_overrides.iter().map(|kv| (kv.key.clone(), kv.value.clone()))),
    );

    let api_url = cli
        .api_url
        .clone()
        .or_else(|| cfg.get("api.url"))
        .context("no API url: pass --api-url or set api.url in the config")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    let local = tokio::task::LocalSet::new();

    runtime.block_on(local.run_until(drive(&cfg, &cli, &api_url)))?;

    info!("done");
    Ok(())
}

async fn drive(cfg: &config::Config, cli: &cli::GlobalCli, api_url: &str) -> anyhow::Result<()> {
    let client = fetch::ApiClient::new(cfg)?;
    let table = Rc::new(RefCell::new(table::TableModel::task_table(&cli.table, cfg)));
    let hub = events::ClickHub::new();

    let handle = sorter::init_table_sorting(&hub, Rc::clone(&table), api_url, client, cfg);

    for field in &cli.clicks {
        if hub.dispatch(field) == 0 {
            warn!(field = %field, "no sortable header with this field");
        }
        // settle between dispatches so the printed body is deterministic
        handle.settle().await;
    }

    match cli.format {
        cli::OutputFormat::Html => {
            println!("{}", table.borrow().body.html);
        }
        cli::OutputFormat::Text => {
            let page = handle.controller().last_page();
            let tasks = page.map(|p| p.tasks).unwrap_or_default();
            let mut renderer = render::Renderer::new(cfg)?;
            renderer.print_task_table(&table.borrow(), &tasks)?;
        }
    }

    Ok(())
}
