use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use level::LevelMetadata;
use level_editor::cli::{Cli, Command, EditOp};
use level_editor::render::{render_grid, render_legend};
use level_editor::{EditorSession, EditorSettings};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(EditorSettings::default_path);
    let loaded = match config_path.as_deref() {
        Some(path) => EditorSettings::read(path),
        None => Ok(None),
    };
    let log_level = loaded
        .as_ref()
        .ok()
        .and_then(|settings| settings.as_ref())
        .map(|settings| settings.log_level)
        .unwrap_or_default()
        .raised(cli.verbose);

    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("level_editor={}", log_level.as_filter()).parse()?)
                .add_directive(format!("level={}", log_level.as_filter()).parse()?),
        )
        .init();

    let settings = EditorSettings::resolve(config_path.as_deref(), loaded);

    match cli.command {
        Command::Validate { file } => validate(&settings, &file),
        Command::Show { file, json } => show(&settings, &file, json),
        Command::Edit {
            input,
            output,
            name,
            allow_incomplete,
            ops,
        } => edit(
            &settings,
            input.as_deref(),
            &output,
            name,
            allow_incomplete,
            &ops,
        ),
        Command::Palette => {
            println!("{}", render_legend());
            Ok(())
        }
        Command::Config { write } => config(&settings, config_path.as_deref(), write),
    }
}

fn open(settings: &EditorSettings, file: &Path) -> Result<EditorSession> {
    let mut session = EditorSession::from_settings(settings);
    session
        .import(file)
        .with_context(|| format!("无法导入关卡: {:?}", file))?;
    Ok(session)
}

fn validate(settings: &EditorSettings, file: &Path) -> Result<()> {
    let session = open(settings, file)?;
    println!("{}: valid ({})", file.display(), session.status());
    Ok(())
}

fn show(settings: &EditorSettings, file: &Path, json: bool) -> Result<()> {
    let session = open(settings, file)?;
    if json {
        let text =
            serde_json::to_string_pretty(&session.snapshot()).context("序列化网格快照失败")?;
        println!("{}", text);
        return Ok(());
    }

    let metadata = session.metadata();
    println!(
        "{} (#{}, {} {})",
        metadata.name, metadata.level_index, metadata.game_name, metadata.version
    );
    print!("{}", render_grid(&session.snapshot()));
    println!("{}", session.status());
    Ok(())
}

fn edit(
    settings: &EditorSettings,
    input: Option<&Path>,
    output: &Path,
    name: Option<String>,
    allow_incomplete: bool,
    ops: &[EditOp],
) -> Result<()> {
    let mut session = match input {
        Some(file) => open(settings, file)?,
        None => EditorSession::from_settings(settings),
    };

    for op in ops {
        match *op {
            EditOp::Place { row, col, kind } => {
                if !session.place(row, col, kind) {
                    warn!("操作未改变网格: {},{}={}", row, col, kind);
                }
            }
            EditOp::Clear => session.clear(),
        }
    }

    if let Some(name) = name {
        session.set_metadata(LevelMetadata {
            name,
            ..session.metadata().clone()
        });
    }

    let result = if allow_incomplete {
        session.export_incomplete(output)
    } else {
        session.export(output)
    };
    result.with_context(|| format!("无法导出关卡: {:?}", output))?;

    println!("{}: written ({})", output.display(), session.status());
    Ok(())
}

fn config(settings: &EditorSettings, path: Option<&Path>, write: bool) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(settings).context("序列化设置失败")?
    );
    if write {
        let path = path.context("无法获取配置目录")?;
        settings.save(path)?;
        println!("saved to {}", path.display());
    }
    Ok(())
}
