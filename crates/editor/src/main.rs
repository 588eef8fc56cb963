//! Headless editor runner: load a scene, replay a command batch, write the result.

use std::path::PathBuf;
use std::process::ExitCode;

use blockcad_lib::codec;
use blockcad_lib::command::execute_json_batch;
use blockcad_lib::state::scene::SceneState;
use blockcad_lib::state::{AppSettings, EditorSession};

#[derive(Debug, Default)]
struct Args {
    scene: Option<PathBuf>,
    commands: Option<PathBuf>,
    out: Option<PathBuf>,
    resume: bool,
    autosave: bool,
    save_settings: bool,
}

const USAGE: &str =
    "usage: blockcad [--scene <path>] [--commands <path>] [--out <path>] [--resume] [--autosave] [--save-settings]";

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut path_value = |flag: &str| {
            it.next()
                .map(PathBuf::from)
                .ok_or_else(|| format!("{flag} needs a path"))
        };
        match arg.as_str() {
            "--scene" => args.scene = Some(path_value("--scene")?),
            "--commands" => args.commands = Some(path_value("--commands")?),
            "--out" => args.out = Some(path_value("--out")?),
            "--resume" => args.resume = true,
            "--autosave" => args.autosave = true,
            "--save-settings" => args.save_settings = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn run(args: Args) -> Result<(), String> {
    let mut session = EditorSession::with_settings(AppSettings::load());

    if let Some(path) = &args.scene {
        let doc = codec::load_document(path)
            .map_err(|e| format!("Failed to load scene {}: {e}", path.display()))?;
        let count = session
            .import_document(&doc)
            .map_err(|e| format!("Failed to import scene {}: {e}", path.display()))?;
        tracing::info!("Loaded scene from {} ({count} entities)", path.display());
    } else if args.resume && SceneState::has_autosave() {
        if let Some(doc) = SceneState::load_autosave() {
            match session.import_document(&doc) {
                Ok(count) => tracing::info!("Resumed autosave ({count} entities)"),
                Err(e) => tracing::warn!("Ignoring unusable autosave: {e}"),
            }
        }
    }

    if let Some(path) = &args.commands {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read commands {}: {e}", path.display()))?;
        let responses = execute_json_batch(&mut session, &json)?;
        let failed = responses.iter().filter(|r| !r.success).count();
        tracing::info!(total = responses.len(), failed, "commands executed");
        let out = serde_json::to_string_pretty(&responses).map_err(|e| e.to_string())?;
        println!("{out}");
    }

    if let Some(path) = &args.out {
        codec::save_document(&session.export_document(), path)
            .map_err(|e| format!("Failed to write scene {}: {e}", path.display()))?;
        tracing::info!("Wrote scene to {}", path.display());
    }

    if args.autosave {
        session.autosave();
    }

    if args.save_settings {
        session.settings.save();
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blockcad=info".into()),
        )
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
