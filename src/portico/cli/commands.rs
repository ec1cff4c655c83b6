//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs the tracing subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: main dispatch logic (called by `main.rs`)
//! - `init_context()`: loads configuration and builds the `AppContext`
//! - `handle_*()`: per-command handlers that call the API and print

use super::logging;
use super::print::{
    print_categories, print_messages, print_project_detail, print_projects, print_row_info,
    print_settings, print_status,
};
use super::setup::{
    print_grouped_help, print_help_for_command, BrowseCommands, Cli, Commands, DataCommands,
    EditCommands, MiscCommands, ProjectFields, SiteCommands,
};
use clap::Parser;
use portico::api::PorticoApi;
use portico::config::{config_file_path, PorticoConfig};
use portico::error::Result;
use portico::model::{
    DisplayMode, MainCategory, ProjectDraft, ProjectId, ProjectPatch, SocialLinks,
    SubCategories,
};
use portico::query::RowFilters;
use portico::repository::{ChangeKind, ProjectRepository, RepositoryOptions};
use portico::store::fs_backend::FsBackend;
use portico::store::mirror::LocalMirror;
use portico::store::remote::NetworkStatus;
use portico::store::rest::RestRemote;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::debug;

struct AppContext {
    api: PorticoApi<RestRemote, FsBackend>,
    poll_interval: Duration,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if cli.help {
        match &cli.command {
            Some(command) => print_help_for_command(command.name()),
            None => print_grouped_help(),
        }
        return Ok(());
    }

    // Commands that need neither configuration nor a store.
    match &cli.command {
        Some(Commands::Misc(MiscCommands::Help { command })) => {
            return handle_help(command.as_deref());
        }
        Some(Commands::Misc(MiscCommands::Categories { main })) => {
            return handle_categories(*main);
        }
        _ => {}
    }

    let ctx = init_context(cli.config)?;

    match cli.command {
        Some(Commands::Browse(cmd)) => match cmd {
            BrowseCommands::List { archived } => handle_list(&ctx, archived),
            BrowseCommands::Show { id } => handle_show(&ctx, id),
            BrowseCommands::Featured { mode } => handle_featured(&ctx, mode),
            BrowseCommands::Row {
                page,
                main_category,
                sub_categories,
            } => handle_row(&ctx, page, main_category, sub_categories),
        },
        Some(Commands::Edit(cmd)) => match cmd {
            EditCommands::Add {
                title,
                main_category,
                sub_categories,
                featured,
                fields,
            } => handle_add(
                &ctx,
                title.join(" "),
                main_category,
                sub_categories,
                featured,
                fields,
            ),
            EditCommands::Update {
                id,
                title,
                main_category,
                sub_categories,
                fields,
            } => handle_update(&ctx, id, title, main_category, sub_categories, fields),
            EditCommands::Archive { ids } => {
                print_messages(&ctx.api.archive_projects(&ids)?.messages);
                Ok(())
            }
            EditCommands::Unarchive { ids } => {
                print_messages(&ctx.api.unarchive_projects(&ids)?.messages);
                Ok(())
            }
            EditCommands::Delete { ids } => {
                print_messages(&ctx.api.delete_projects(&ids)?.messages);
                Ok(())
            }
            EditCommands::Feature { ids } => {
                print_messages(&ctx.api.feature_projects(&ids)?.messages);
                Ok(())
            }
            EditCommands::Unfeature { ids } => {
                print_messages(&ctx.api.unfeature_projects(&ids)?.messages);
                Ok(())
            }
            EditCommands::Replace { outgoing, incoming } => {
                print_messages(&ctx.api.replace_featured(outgoing, incoming)?.messages);
                Ok(())
            }
        },
        Some(Commands::Site(cmd)) => match cmd {
            SiteCommands::Social {
                instagram,
                twitter,
                linkedin,
                clear,
            } => handle_social(&ctx, instagram, twitter, linkedin, clear),
            SiteCommands::Mode { mode } => handle_mode(&ctx, mode),
        },
        Some(Commands::Data(cmd)) => match cmd {
            DataCommands::Import { path, append } => handle_import(&ctx, path, append),
            DataCommands::Sync => handle_sync(&ctx),
            DataCommands::Watch { ticks } => handle_watch(&ctx, ticks),
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Status => handle_status(&ctx),
            MiscCommands::Categories { main } => handle_categories(main),
            MiscCommands::Help { command } => handle_help(command.as_deref()),
        },
        None => handle_list(&ctx, false),
    }
}

fn init_context(config_path: Option<PathBuf>) -> Result<AppContext> {
    let config = PorticoConfig::load_from(config_path.or_else(config_file_path))?;
    let mirror_dir = config.mirror_dir();
    debug!(mirror = %mirror_dir.display(), "loaded configuration");

    let remote = RestRemote::new(config.rest_settings()?, NetworkStatus::online())?;
    let mirror = LocalMirror::new(FsBackend::new(mirror_dir));
    let repo = ProjectRepository::new(remote, mirror, RepositoryOptions::from(&config));

    Ok(AppContext {
        api: PorticoApi::new(repo),
        poll_interval: config.poll_interval(),
    })
}

fn handle_list(ctx: &AppContext, archived: bool) -> Result<()> {
    let result = ctx.api.list_projects(archived)?;
    print_projects(&result.projects);
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext, id: ProjectId) -> Result<()> {
    let result = ctx.api.view_project(id)?;
    if let Some(project) = result.projects.first() {
        print_project_detail(project, &result.related);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_featured(ctx: &AppContext, mode: Option<DisplayMode>) -> Result<()> {
    let result = ctx.api.featured_projects(mode)?;
    print_projects(&result.projects);
    print_messages(&result.messages);
    Ok(())
}

fn handle_row(
    ctx: &AppContext,
    page: usize,
    main_category: Option<MainCategory>,
    sub_categories: Vec<String>,
) -> Result<()> {
    let filters = RowFilters {
        main_category,
        sub_categories,
    };
    let result = ctx.api.project_row(page, &filters)?;
    print_projects(&result.projects);
    if let Some(row) = &result.row {
        print_row_info(row);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(
    ctx: &AppContext,
    title: String,
    main_category: MainCategory,
    sub_categories: Vec<String>,
    featured: bool,
    fields: ProjectFields,
) -> Result<()> {
    let mut draft = ProjectDraft::new(title, main_category, SubCategories::new(sub_categories));
    draft.featured = featured;
    draft.year = fields.year.unwrap_or_default();
    draft.location = fields.location.unwrap_or_default();
    draft.description = fields.description.unwrap_or_default();
    draft.image_url = fields.image_url.unwrap_or_default();
    draft.architect = fields.architect.unwrap_or_default();
    draft.area = fields.area.unwrap_or_default();
    draft.status = fields.status.unwrap_or_default();
    draft.client = fields.client.unwrap_or_default();
    if !fields.gallery_images.is_empty() {
        draft.gallery_images = Some(fields.gallery_images);
    }

    let result = ctx.api.create_project(draft)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_update(
    ctx: &AppContext,
    id: ProjectId,
    title: Option<String>,
    main_category: Option<MainCategory>,
    sub_categories: Vec<String>,
    fields: ProjectFields,
) -> Result<()> {
    let patch = ProjectPatch {
        title,
        main_category,
        sub_category: (!sub_categories.is_empty()).then(|| SubCategories::new(sub_categories)),
        year: fields.year,
        image_url: fields.image_url,
        gallery_images: (!fields.gallery_images.is_empty()).then_some(fields.gallery_images),
        description: fields.description,
        location: fields.location,
        architect: fields.architect,
        area: fields.area,
        status: fields.status,
        client: fields.client,
        ..Default::default()
    };

    let result = ctx.api.update_project(id, patch)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_social(
    ctx: &AppContext,
    instagram: Option<String>,
    twitter: Option<String>,
    linkedin: Option<String>,
    clear: bool,
) -> Result<()> {
    let links = SocialLinks {
        instagram,
        twitter,
        linkedin,
    };
    let update = if clear || links != SocialLinks::default() {
        Some(links)
    } else {
        None
    };

    let result = ctx.api.social_links(update)?;
    if let Some(settings) = &result.settings {
        print_settings(settings);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_mode(ctx: &AppContext, mode: Option<DisplayMode>) -> Result<()> {
    let result = ctx.api.display_mode(mode)?;
    if let Some(settings) = &result.settings {
        print_settings(settings);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &AppContext, path: PathBuf, append: bool) -> Result<()> {
    let result = ctx.api.import_projects(&path, append)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_sync(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.sync()?;
    print_messages(&result.messages);
    Ok(())
}

/// Polls until `ticks` runs out, or forever. Change events are logged at
/// debug level.
fn handle_watch(ctx: &AppContext, ticks: Option<u64>) -> Result<()> {
    let _subscription = ctx.api.on_change(|event| match &event.kind {
        ChangeKind::Synced => debug!(at = %event.at, "synced"),
        other => debug!(at = %event.at, kind = ?other, "change event"),
    });

    let mut done = 0;
    loop {
        let result = ctx.api.sync()?;
        print_messages(&result.messages);
        done += 1;
        if ticks.is_some_and(|limit| done >= limit) {
            return Ok(());
        }
        thread::sleep(ctx.poll_interval);
    }
}

fn handle_status(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.status()?;
    if let Some(status) = &result.status {
        print_status(status);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_categories(main: Option<MainCategory>) -> Result<()> {
    let result = portico::commands::categories::run(main);
    print_categories(&result.categories);
    Ok(())
}

fn handle_help(command: Option<&str>) -> Result<()> {
    match command {
        Some(cmd) => print_help_for_command(cmd),
        None => print_grouped_help(),
    }
    Ok(())
}
