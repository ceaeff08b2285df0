use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use padclip::api::{ClipboardController, PadSummary, ToggleEntry};
use padclip::commands::select::sanitize_toggles;
use padclip::config::ClipboardConfig;
use padclip::error::{ClipError, Result};
use padclip::key::{SelectionKey, KEY_SEPARATOR, PATH_MARKER};
use padclip::model::{Mode, RECORD_MARKER};
use padclip::resolve::{Collaborators, FsPathResolver, SchemaList};
use padclip::store::fs::FileStorage;
use padclip::store::UserKey;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands};

const HOME_ENV: &str = "PADCLIP_HOME";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppPaths {
    config: PathBuf,
    persistent: PathBuf,
    session: PathBuf,
}

struct AppContext {
    controller: ClipboardController<FileStorage>,
    config: ClipboardConfig,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = resolve_paths()?;

    if let Some(Commands::Config { key, value }) = &cli.command {
        return handle_config(&paths, key.as_deref(), value.as_deref());
    }

    let mut ctx = init_context(&cli, &paths)?;
    if cli.lock {
        ctx.controller.lock();
    }

    let outcome = match cli.command {
        Some(Commands::Select { schema, ids, copy }) => {
            handle_select(&mut ctx, &schema, &ids, copy)
        }
        Some(Commands::SelectFile { paths, copy }) => handle_select_files(&mut ctx, &paths, copy),
        Some(Commands::Deselect { key, file }) => handle_deselect(&mut ctx, &key, file),
        Some(Commands::Remove { key }) => handle_remove(&mut ctx, &key),
        Some(Commands::Clear { pad }) => handle_clear(&mut ctx, pad),
        Some(Commands::Pad { name }) => handle_pad(&mut ctx, &name),
        Some(Commands::Mode { mode }) => handle_mode(&mut ctx, &mode),
        Some(Commands::List { files }) => handle_list(&ctx, files),
        Some(Commands::Prune) => handle_prune(&mut ctx),
        Some(Commands::Paste { target, update }) => {
            handle_paste(&mut ctx, &target, update.as_deref())
        }
        Some(Commands::PasteFiles { target }) => handle_paste_files(&mut ctx, &target),
        Some(Commands::Delete { files }) => handle_delete(&mut ctx, files),
        Some(Commands::Config { .. }) => Ok(()),
        None => handle_list(&ctx, false),
    };

    // partial progress of a failed command is kept, nothing is rolled back
    let saved = ctx.controller.end_session();
    match (outcome, saved) {
        (Err(e), Err(save_error)) => {
            warn!(error = %save_error, "clipboard not saved");
            Err(e)
        }
        (Err(e), Ok(_)) => Err(e),
        (Ok(()), saved) => saved.map(|_| ()),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_paths() -> Result<AppPaths> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        let home = PathBuf::from(home);
        return Ok(AppPaths {
            config: home.clone(),
            persistent: home.join("data"),
            session: home.join("session"),
        });
    }

    let proj_dirs = ProjectDirs::from("com", "padclip", "padclip")
        .ok_or_else(|| ClipError::Config("Could not determine config dir".to_string()))?;
    Ok(AppPaths {
        config: proj_dirs.config_dir().to_path_buf(),
        persistent: proj_dirs.data_dir().to_path_buf(),
        session: std::env::temp_dir().join("padclip-session"),
    })
}

fn init_context(cli: &Cli, paths: &AppPaths) -> Result<AppContext> {
    let config = ClipboardConfig::load(&paths.config)?;

    let user_name = cli
        .user
        .clone()
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "default".to_string());
    let user: UserKey = user_name.parse()?;

    let schemas = SchemaList::new(config.schemas.iter().cloned());
    let collaborators = Collaborators::new(schemas.clone(), schemas, FsPathResolver);
    let storage = FileStorage::new(Some(paths.session.clone()), paths.persistent.clone());

    let controller = ClipboardController::initialize(storage, user, &config, collaborators)?;
    Ok(AppContext { controller, config })
}

fn handle_select(ctx: &mut AppContext, schema: &str, ids: &[String], copy: bool) -> Result<()> {
    if schema == PATH_MARKER {
        return Err(ClipError::Api(format!(
            "{} is not a record schema, use select-file",
            PATH_MARKER
        )));
    }
    if !ctx.config.schemas.iter().any(|s| s == schema) {
        print_warning(&format!(
            "Schema {} is not registered; its selection stays hidden",
            schema
        ));
    }

    let raw = ids.iter().map(|id| {
        (
            format!("{}{}{}", schema, KEY_SEPARATOR, id),
            Some(RECORD_MARKER.to_string()),
        )
    });
    let toggles = sanitize_toggles(raw, schema, true);
    if toggles.is_empty() {
        return Err(ClipError::Api(format!("Nothing to select in {}", schema)));
    }

    ctx.controller.apply_toggle_batch(&toggles);
    if copy {
        ctx.controller.set_mode(true);
    }
    print_success(&format!(
        "Selected {} on {}",
        toggles.len(),
        ctx.controller.pads().current()
    ));
    Ok(())
}

fn handle_select_files(ctx: &mut AppContext, paths: &[String], copy: bool) -> Result<()> {
    let toggles: Vec<ToggleEntry> = paths.iter().map(|p| ToggleEntry::select_path(p)).collect();
    ctx.controller.apply_toggle_batch(&toggles);
    if copy {
        ctx.controller.set_mode(true);
    }
    print_success(&format!(
        "Selected {} file(s) on {}",
        toggles.len(),
        ctx.controller.pads().current()
    ));
    Ok(())
}

fn handle_deselect(ctx: &mut AppContext, key: &str, file: bool) -> Result<()> {
    let key = if file {
        SelectionKey::path(key)
    } else {
        key.parse()?
    };
    ctx.controller
        .apply_toggle_batch(&[ToggleEntry::deselect(key.clone())]);
    print_success(&format!("Deselected {}", key));
    Ok(())
}

fn handle_remove(ctx: &mut AppContext, key: &str) -> Result<()> {
    let key: SelectionKey = key.parse()?;
    ctx.controller.remove_key(&key);
    print_success(&format!("Removed {}", key));
    Ok(())
}

fn handle_clear(ctx: &mut AppContext, pad: Option<String>) -> Result<()> {
    let pad = pad.unwrap_or_else(|| ctx.controller.pads().current().to_string());
    ctx.controller.clear_pad(&pad);
    print_success(&format!("Cleared {}", pad));
    Ok(())
}

fn handle_pad(ctx: &mut AppContext, name: &str) -> Result<()> {
    ctx.controller.switch_pad(name);
    let current = ctx.controller.pads().current();
    if current.to_string() == name {
        print_success(&format!("Active pad: {}", current));
    } else {
        print_warning(&format!("Pad {} unavailable, staying on {}", name, current));
    }
    Ok(())
}

fn handle_mode(ctx: &mut AppContext, mode: &str) -> Result<()> {
    let requested: Mode = mode.parse()?;
    ctx.controller.set_mode(requested == Mode::Copy);
    let current = ctx.controller.current_mode();
    if current == requested {
        print_success(&format!("Mode: {}", current));
    } else {
        print_warning(&format!("Active pad is empty, mode stays {}", current));
    }
    Ok(())
}

fn handle_list(ctx: &AppContext, files: bool) -> Result<()> {
    print_pads(&ctx.controller.pad_summaries(files));

    let kind = if files { PATH_MARKER } else { "" };
    let selection = ctx.controller.selection_view(kind, None);
    if selection.is_empty() {
        println!("{}", "Nothing selected.".dimmed());
        return Ok(());
    }

    println!();
    for (key, payload) in &selection {
        if files {
            println!("  {}", payload);
        } else {
            println!("  {}", key.to_string().cyan());
        }
    }
    Ok(())
}

fn handle_prune(ctx: &mut AppContext) -> Result<()> {
    let pruned = ctx.controller.prune_active_pad()?;
    if pruned == 0 {
        println!("{}", "Nothing to prune.".dimmed());
    } else {
        print_success(&format!("Pruned {} stale selection(s)", pruned));
    }
    Ok(())
}

fn handle_paste(ctx: &mut AppContext, target: &str, update: Option<&str>) -> Result<()> {
    let update = match update {
        Some(raw) => match serde_json::from_str::<Value>(raw)? {
            Value::Object(map) => Some(map),
            _ => return Err(ClipError::Api("--update must be a JSON object".to_string())),
        },
        None => None,
    };

    let batch = ctx.controller.compile_paste_batch(target, update.as_ref());
    print_batch(&batch)
}

fn handle_paste_files(ctx: &mut AppContext, target: &str) -> Result<()> {
    let batch = ctx.controller.compile_path_paste_batch(target);
    print_batch(&batch)
}

fn handle_delete(ctx: &mut AppContext, files: bool) -> Result<()> {
    if files {
        print_batch(&ctx.controller.compile_path_delete_batch())
    } else {
        print_batch(&ctx.controller.compile_delete_batch())
    }
}

fn handle_config(paths: &AppPaths, key: Option<&str>, value: Option<&str>) -> Result<()> {
    let mut config = ClipboardConfig::load(&paths.config)?;
    match (key, value) {
        (None, _) => {
            for key in ["pads", "persistent", "schemas"] {
                println!("{} = {}", key, config.get(key)?);
            }
        }
        (Some(key), None) => println!("{} = {}", key, config.get(key)?),
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save(&paths.config)?;
            print_success(&format!("{} = {}", key, config.get(key)?));
        }
    }
    Ok(())
}

fn print_batch<T: Serialize>(batch: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(batch)?);
    Ok(())
}

fn print_pads(pads: &[PadSummary]) {
    for pad in pads {
        let marker = if pad.is_current { "*" } else { " " };
        let name = format!("{:<8}", pad.id.to_string());
        let name = if pad.is_current {
            name.green().bold()
        } else {
            name.normal()
        };
        let mode = format!("{:<5}", pad.mode.as_str());
        let mode = if pad.items > 0 {
            mode.yellow()
        } else {
            mode.dimmed()
        };
        println!("{} {} {} {}", marker, name, mode, pad.items);
    }
}

fn print_success(message: &str) {
    println!("{}", message.green());
}

fn print_warning(message: &str) {
    println!("{}", message.yellow());
}
