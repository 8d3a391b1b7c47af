//! # CLI Layer
//!
//! This module is one client of `toyverseapp`, not the application itself.
//! It is the only place that:
//!
//! - parses shell arguments,
//! - knows where config and data live on disk,
//! - sets up the logger,
//! - writes to stdout and stderr.
//!
//! Each handler turns parsed arguments into one [`ToyverseApi`] call and hands
//! the returned [`CmdResult`] to `print.rs`, or to `serde_json` under `--json`.

use super::print::{
    print_detail, print_facets, print_messages, print_stats, print_toy_list, print_usage,
};
use super::setup::{Cli, Commands, DraftArgs, ListArgs};
use anyhow::{bail, Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use env_logger::{Builder, Env};
use serde::Serialize;
use std::path::{Path, PathBuf};
use toyverseapp::api::{MessageLevel, ToyverseApi};
use toyverseapp::auth::{AuthEvent, LocalAuth};
use toyverseapp::catalog::FilterConfig;
use toyverseapp::commands::{CmdResult, ToyUpdate};
use toyverseapp::config::{ToyverseConfig, CONFIG_FILE_NAME};
use toyverseapp::model::{ImageUpload, ToyDraft};
use toyverseapp::palette::TypeColors;
use toyverseapp::storage::FsStorage;
use toyverseapp::store::fs::FileStore;

type CliApi = ToyverseApi<FileStore, FsStorage, LocalAuth>;

struct AppContext {
    api: CliApi,
    config: ToyverseConfig,
    colors: TypeColors,
    json: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(Commands::Config) = &cli.command {
        print!("{}", ToyverseConfig::template());
        return Ok(());
    }

    let mut ctx = init_context(&cli)?;

    match cli.command {
        None => handle_list(&mut ctx, &ListArgs::default()),
        Some(Commands::List(args)) => handle_list(&mut ctx, &args),
        Some(Commands::Stats) => handle_stats(&mut ctx),
        Some(Commands::Facets) => handle_facets(&mut ctx),
        Some(Commands::View { id }) => handle_view(&mut ctx, &id),
        Some(Commands::Add {
            name,
            toy_type,
            image,
            extra_images,
            fields,
        }) => {
            sign_in(&mut ctx, cli.password.as_deref())?;
            handle_add(&mut ctx, name, toy_type, image, &extra_images, &fields)
        }
        Some(Commands::Edit {
            id,
            name,
            toy_type,
            image,
            add_images,
            remove_images,
            clear_labels,
            fields,
        }) => {
            sign_in(&mut ctx, cli.password.as_deref())?;
            let edit = EditArgs {
                name,
                toy_type,
                image,
                add_images,
                remove_images,
                clear_labels,
            };
            handle_edit(&mut ctx, &id, edit, &fields)
        }
        Some(Commands::Delete { id }) => {
            sign_in(&mut ctx, cli.password.as_deref())?;
            handle_delete(&mut ctx, &id)
        }
        Some(Commands::Usage) => handle_usage(&mut ctx),
        Some(Commands::Config) => Ok(()),
    }
}

fn init_logging(verbose: bool) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None);
    // A logger may already be installed when running under a test harness
    let _ = builder.try_init();
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "toyverse", "toyverse")
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let dirs = project_dirs();
    let config_path = match (&cli.config, &dirs) {
        (Some(path), _) => path.clone(),
        (None, Some(dirs)) => dirs.config_dir().join(CONFIG_FILE_NAME),
        (None, None) => PathBuf::from(CONFIG_FILE_NAME),
    };
    let config = ToyverseConfig::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let data_dir = dirs
        .as_ref()
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".toyverse"));
    let data_file = config.data_file(&data_dir);
    let images_dir = config.images_dir(&data_dir);
    log::debug!(
        "config: {}, data: {}, images: {}",
        config_path.display(),
        data_file.display(),
        images_dir.display()
    );

    let mut storage = FsStorage::new(images_dir);
    if let Some(base) = &config.public_url_base {
        storage = storage.with_public_url_base(base.as_str());
    }

    let mut auth = LocalAuth::new();
    if let Some(password) = &config.owner_password {
        auth = auth.with_account(&config.owner_email, password);
    }

    let mut api = ToyverseApi::new(FileStore::open(data_file), storage, auth);
    api.on_auth_change(Box::new(|event| match event {
        AuthEvent::SignedIn(user) => log::debug!("session started for {}", user.email),
        AuthEvent::SignedOut => log::debug!("session ended"),
    }));

    Ok(AppContext {
        api,
        config,
        colors: TypeColors::new(),
        json: cli.json,
    })
}

fn sign_in(ctx: &mut AppContext, password: Option<&str>) -> Result<()> {
    if ctx.config.owner_password.is_none() {
        bail!(
            "No owner account is configured; \
             set owner_password in the config file or TOYVERSE_OWNER_PASSWORD"
        );
    }
    let Some(password) = password else {
        bail!("This command needs a session; pass --password or set TOYVERSE_PASSWORD");
    };
    let email = ctx.config.owner_email.clone();
    ctx.api.sign_in(&email, password)?;
    Ok(())
}

fn handle_list(ctx: &mut AppContext, args: &ListArgs) -> Result<()> {
    let config = args.to_filter(ctx.config.default_sort()?);
    let result = ctx.api.list_toys(&config, args.search())?;
    if let Some(view) = &result.catalog {
        if ctx.json {
            print_json(&view.toys)?;
        } else if !view.toys.is_empty() {
            print_toy_list(
                &view.toys,
                &mut ctx.colors,
                &ctx.config.currency,
                view.active_filters,
            );
        }
    }
    emit_messages(ctx, &result);
    Ok(())
}

fn handle_stats(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.list_toys(&FilterConfig::default(), "")?;
    if let Some(view) = &result.catalog {
        if ctx.json {
            print_json(&view.stats)?;
        } else {
            print_stats(&view.stats, &ctx.config.currency);
        }
    }
    Ok(())
}

fn handle_facets(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.list_toys(&FilterConfig::default(), "")?;
    if let Some(view) = &result.catalog {
        if ctx.json {
            print_json(&view.facets)?;
        } else {
            print_facets(&view.facets);
        }
    }
    Ok(())
}

fn handle_view(ctx: &mut AppContext, id: &str) -> Result<()> {
    let result = ctx.api.view_toy(id)?;
    if let Some(detail) = &result.detail {
        if ctx.json {
            print_json(detail)?;
        } else {
            print_detail(detail, &mut ctx.colors, &ctx.config.currency);
        }
    }
    emit_messages(ctx, &result);
    Ok(())
}

fn handle_add(
    ctx: &mut AppContext,
    name: String,
    toy_type: String,
    image: Option<PathBuf>,
    extra_images: &[PathBuf],
    fields: &DraftArgs,
) -> Result<()> {
    let mut draft = ToyDraft::new(name, toy_type);
    fields.apply(&mut draft);

    let primary = image.as_deref().map(read_upload).transpose()?;
    let additional = read_uploads(extra_images)?;

    let result = ctx.api.create_toy(&draft, primary.as_ref(), &additional)?;
    print_affected(ctx, &result)?;
    emit_messages(ctx, &result);
    Ok(())
}

struct EditArgs {
    name: Option<String>,
    toy_type: Option<String>,
    image: Option<PathBuf>,
    add_images: Vec<PathBuf>,
    remove_images: Vec<String>,
    clear_labels: bool,
}

fn handle_edit(ctx: &mut AppContext, id: &str, edit: EditArgs, fields: &DraftArgs) -> Result<()> {
    let mut draft = ctx.api.draft_for(id)?;
    if let Some(name) = edit.name {
        draft.name = name;
    }
    if let Some(toy_type) = edit.toy_type {
        draft.toy_type = toy_type;
    }
    if edit.clear_labels {
        draft.labels.clear();
    }
    fields.apply(&mut draft);

    let mut update = ToyUpdate::new(draft);
    update.primary_image = edit.image.as_deref().map(read_upload).transpose()?;
    update.add_images = read_uploads(&edit.add_images)?;
    update.remove_image_urls = edit.remove_images;

    let result = ctx.api.update_toy(id, &update)?;
    print_affected(ctx, &result)?;
    emit_messages(ctx, &result);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, id: &str) -> Result<()> {
    let result = ctx.api.delete_toy(id)?;
    print_affected(ctx, &result)?;
    emit_messages(ctx, &result);
    Ok(())
}

fn handle_usage(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.usage()?;
    if let Some(usage) = &result.usage {
        if ctx.json {
            print_json(usage)?;
        } else {
            print_usage(usage);
        }
    }
    Ok(())
}

fn read_upload(path: &Path) -> Result<ImageUpload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(ImageUpload::new(file_name, bytes))
}

fn read_uploads(paths: &[PathBuf]) -> Result<Vec<ImageUpload>> {
    paths.iter().map(|p| read_upload(p)).collect()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_affected(ctx: &AppContext, result: &CmdResult) -> Result<()> {
    if ctx.json {
        print_json(&result.affected_toys)?;
    }
    Ok(())
}

/// Under `--json` stdout carries only JSON, so only warnings and errors are shown.
fn emit_messages(ctx: &AppContext, result: &CmdResult) {
    if ctx.json {
        let problems: Vec<_> = result
            .messages
            .iter()
            .filter(|m| matches!(m.level, MessageLevel::Warning | MessageLevel::Error))
            .cloned()
            .collect();
        print_messages(&problems);
    } else {
        print_messages(&result.messages);
    }
}
