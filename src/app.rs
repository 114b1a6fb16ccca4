use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::chrome::hover::RowHover;
use crate::chrome::Chrome;
use crate::cli::args::{Action, CliArgs, Command};
use crate::cli::validation;
use crate::client::{ApiClient, ClientOptions};
use crate::config::{self, ConfigFile, Profile};
use crate::controller::{mode_from_query, Controller, Mode, Notice, NoticeKind, Shell, ViewState};
use crate::model::{Clinic, Entity, Product, Rating, ResourceId};
use crate::output::page::{self, PageContext};
use crate::output::{self, OutputFormat, View};

/// Shell for a terminal session: notices are printed, navigations are
/// reported, reloads are remembered so the caller can list again.
#[derive(Debug, Default)]
struct TerminalShell {
    reloaded: AtomicBool,
}

impl TerminalShell {
    fn reloaded(&self) -> bool {
        self.reloaded.load(Ordering::SeqCst)
    }
}

impl Shell for TerminalShell {
    fn notify(&self, notice: &Notice) {
        match notice.kind {
            NoticeKind::Success => {
                println!("{} {}", "[OK]".bold().green(), notice.message.bold().white())
            }
            NoticeKind::Failure => {
                let detail = notice
                    .detail
                    .as_deref()
                    .map(|d| format!(" ({d})"))
                    .unwrap_or_default();
                eprintln!(
                    "{} {}{}",
                    "[ERR]".bold().red(),
                    notice.message.bold().white(),
                    detail.yellow()
                );
            }
        }
    }

    fn navigate(&self, page: &str) {
        println!("{} {}", "->".bold().cyan(), page.cyan());
    }

    fn reload(&self) {
        self.reloaded.store(true, Ordering::SeqCst);
    }
}

#[derive(Clone, Debug)]
struct RunConfig {
    command: Command,
    api_url: String,
    client: ClientOptions,
    format: OutputFormat,
    output: Option<String>,
    page_url: Option<String>,
    config_path: Option<PathBuf>,
}

fn build_run_config(
    args: CliArgs,
    cfg: ConfigFile,
    config_path: Option<PathBuf>,
    env_api_url: Option<String>,
) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let profile_raw = args.profile.or(cfg.profile.clone());
    let profile = match profile_raw.as_deref() {
        Some(raw) => Profile::parse(raw).ok_or_else(|| format!("invalid profile '{raw}'"))?,
        None => Profile::default(),
    };
    let api_url = config::resolve_api_url(
        args.api_url.as_deref(),
        env_api_url.as_deref(),
        &cfg,
        profile,
    );

    let timeout_seconds = args.timeout.or(cfg.timeout).unwrap_or(10);
    if timeout_seconds == 0 {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    let follow_redirects = !args.no_redirects && cfg.follow_redirects.unwrap_or(true);
    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());

    let output = args
        .output
        .map(|p| config::expand_tilde(&p).to_string_lossy().to_string());
    let format = match args.format.or(cfg.format) {
        Some(raw) => {
            OutputFormat::parse(&raw).ok_or_else(|| format!("invalid output format '{raw}'"))?
        }
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    Ok(RunConfig {
        command: args.command,
        api_url,
        client: ClientOptions {
            timeout_seconds,
            proxy,
            follow_redirects,
        },
        format,
        output,
        page_url: args.page_url,
        config_path,
    })
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},elegirclinica={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn with_spinner<F: Future>(label: &str, fut: F) -> F::Output {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(label.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    let out = fut.await;
    pb.finish_and_clear();
    out
}

async fn write_rendered(run: &RunConfig, rendered: &[u8]) -> Result<(), String> {
    match run.output.as_deref() {
        Some(path) => {
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .await
                .map_err(|e| format!("failed to open output file: {e}"))?;
            outfile
                .write_all(rendered)
                .await
                .map_err(|e| format!("failed to write output file: {e}"))?;
            outfile
                .flush()
                .await
                .map_err(|e| format!("failed to write output file: {e}"))?;
            info!(path, "view written");
            Ok(())
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(rendered)
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))?;
            stdout
                .flush()
                .await
                .map_err(|e| format!("failed to write to stdout: {e}"))
        }
    }
}

async fn emit<E: Entity>(run: &RunConfig, state: &ViewState<E>, view: View) -> Result<(), String> {
    let rendered = match run.format {
        OutputFormat::Text => output::render_text(state, view),
        OutputFormat::Json => output::render_json(state, view),
        OutputFormat::Html => {
            let chrome = Chrome::default();
            let hover = RowHover::default();
            let ctx = PageContext {
                chrome: &chrome,
                location: run.page_url.as_deref(),
                hover: &hover,
            };
            page::render_html(state, view, &ctx)
        }
    };
    write_rendered(run, &rendered).await
}

fn apply_mode<E: Entity>(action: &Action) -> Result<Mode, String> {
    let descriptor = E::DESCRIPTOR;
    match action {
        Action::List { query } => {
            let Some(query) = query.as_deref() else {
                return Ok(Mode::List);
            };
            match mode_from_query(&descriptor, query) {
                Mode::Edit(_) => Err(format!(
                    "query '{query}' selects a single record, use 'show' instead of 'list'"
                )),
                mode => Ok(mode),
            }
        }
        Action::Show { query } | Action::Update { query, .. } => {
            match mode_from_query(&descriptor, query) {
                Mode::Edit(id) => Ok(Mode::Edit(id)),
                _ => Err(format!(
                    "query '{query}' carries no '{}' identifier",
                    descriptor.id_param
                )),
            }
        }
        Action::Search { .. } | Action::Create { .. } | Action::Delete { .. } => Ok(Mode::List),
    }
}

async fn apply_assignments<E: Entity, S: Shell>(
    controller: &Controller<E, S>,
    assignments: &[String],
) -> Result<(), String> {
    for raw in assignments {
        let (field, value) = validation::parse_assignment(raw)
            .map_err(|e| format!("invalid --set '{raw}': {e}"))?;
        controller
            .set_field(field, value)
            .await
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}

async fn run_entity<E: Entity>(run: &RunConfig, action: &Action) -> Result<(), String> {
    let mode = apply_mode::<E>(action)?;
    let client = ApiClient::new(&run.client).map_err(|e| e.to_string())?;
    let shell = Arc::new(TerminalShell::default());
    let controller: Controller<E, _> = Controller::new(&run.api_url, mode, client, Arc::clone(&shell));
    debug!(base = controller.base_url(), mode = ?controller.mode(), "controller mounted");

    let title = E::DESCRIPTOR.default_title;
    match action {
        Action::List { .. } => {
            let loaded = with_spinner(title, controller.mount()).await;
            emit(run, &controller.snapshot().await, View::List).await?;
            loaded.map(|_| ()).map_err(|e| e.to_string())
        }
        Action::Show { .. } => {
            let loaded = with_spinner(title, controller.mount()).await;
            emit(run, &controller.snapshot().await, View::Form).await?;
            loaded.map(|_| ()).map_err(|e| e.to_string())
        }
        Action::Search { term } => {
            let searched = with_spinner(title, controller.search(term)).await;
            emit(run, &controller.snapshot().await, View::List).await?;
            searched.map(|_| ()).map_err(|e| e.to_string())
        }
        Action::Create { set } => {
            apply_assignments(&controller, set).await?;
            controller.create().await.map_err(|e| e.to_string())
        }
        Action::Update { set, .. } => {
            with_spinner(title, controller.mount())
                .await
                .map_err(|e| e.to_string())?;
            apply_assignments(&controller, set).await?;
            controller.update().await.map_err(|e| e.to_string())
        }
        Action::Delete { id } => {
            controller
                .remove(&ResourceId::new(id.trim()))
                .await
                .map_err(|e| e.to_string())?;
            if !shell.reloaded() {
                return Ok(());
            }
            let reloaded = with_spinner(title, controller.mount()).await;
            emit(run, &controller.snapshot().await, View::List).await?;
            reloaded.map(|_| ()).map_err(|e| e.to_string())
        }
    }
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    match &run.command {
        Command::Clinicas { action } => run_entity::<Clinic>(&run, action).await,
        Command::Ratings { action } => run_entity::<Rating>(&run, action).await,
        Command::Productos { action } => run_entity::<Product>(&run, action).await,
        Command::Chrome => {
            let chrome = Chrome::default();
            let mut rendered = chrome.render_header(run.page_url.as_deref());
            rendered.push_str(&chrome.render_footer());
            write_rendered(&run, rendered.as_bytes()).await
        }
        Command::InitConfig => {
            let path = run
                .config_path
                .as_ref()
                .ok_or_else(|| "cannot determine config path, pass --config".to_string())?;
            if config::ensure_default_config_file(path)? {
                println!("{} {}", "created".bold().green(), path.display());
            } else {
                println!("{} {}", "exists".bold().yellow(), path.display());
            }
            Ok(())
        }
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.verbose);

    let (config_path, allow_missing) = match args.config.as_deref() {
        Some(path) => (Some(config::expand_tilde(path)), false),
        None => (config::default_config_path(), true),
    };
    let cfg = match config_path.as_ref() {
        Some(path) if !matches!(args.command, Command::InitConfig) => {
            config::load_config(path, allow_missing)?
        }
        _ => ConfigFile::default(),
    };

    if args.no_color || cfg.no_color.unwrap_or(false) {
        colored::control::set_override(false);
    }

    let run = build_run_config(args, cfg, config_path, config::api_url_from_env())?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    fn run_config(argv: &[&str], cfg: ConfigFile, env: Option<&str>) -> Result<RunConfig, String> {
        let args = CliArgs::try_parse_from(argv).map_err(|e| e.to_string())?;
        build_run_config(args, cfg, None, env.map(str::to_string))
    }

    #[test]
    fn defaults_to_production_text_output() {
        let run = run_config(&["elegirclinica", "clinicas", "list"], ConfigFile::default(), None)
            .unwrap();
        assert_eq!(run.api_url, config::PRODUCTION_API_URL);
        assert_eq!(run.format, OutputFormat::Text);
        assert!(run.client.follow_redirects);
        assert_eq!(run.client.timeout_seconds, 10);
    }

    #[test]
    fn local_profile_and_env_override() {
        let run = run_config(
            &["elegirclinica", "--profile", "local", "ratings", "list"],
            ConfigFile::default(),
            None,
        )
        .unwrap();
        assert_eq!(run.api_url, config::LOCAL_API_URL);

        let run = run_config(
            &["elegirclinica", "--profile", "local", "ratings", "list"],
            ConfigFile::default(),
            Some("http://staging:8000/"),
        )
        .unwrap();
        assert_eq!(run.api_url, "http://staging:8000");
    }

    #[test]
    fn format_is_inferred_from_output_path() {
        let run = run_config(
            &["elegirclinica", "clinicas", "list", "-o", "clinicas.html"],
            ConfigFile::default(),
            None,
        )
        .unwrap();
        assert_eq!(run.format, OutputFormat::Html);
    }

    #[test]
    fn config_values_apply_when_flags_are_absent() {
        let cfg = ConfigFile {
            timeout: Some(3),
            follow_redirects: Some(false),
            format: Some("json".to_string()),
            ..ConfigFile::default()
        };
        let run = run_config(&["elegirclinica", "productos", "list"], cfg, None).unwrap();
        assert_eq!(run.client.timeout_seconds, 3);
        assert!(!run.client.follow_redirects);
        assert_eq!(run.format, OutputFormat::Json);
    }

    #[test]
    fn rejects_bad_assignments_and_formats() {
        assert!(run_config(
            &["elegirclinica", "clinicas", "create", "--set", "nombre"],
            ConfigFile::default(),
            None
        )
        .is_err());
        assert!(run_config(
            &["elegirclinica", "--format", "xml", "clinicas", "list"],
            ConfigFile::default(),
            None
        )
        .is_err());
    }

    #[test]
    fn edit_actions_require_an_identifier() {
        let show = Action::Show {
            query: "?nombre=x".to_string(),
        };
        assert!(apply_mode::<Clinic>(&show).is_err());

        let show = Action::Show {
            query: "?id=7".to_string(),
        };
        assert_eq!(
            apply_mode::<Clinic>(&show).unwrap(),
            Mode::Edit(ResourceId::from(7))
        );

        let list = Action::List {
            query: Some("?id_clinica=12".to_string()),
        };
        assert!(matches!(
            apply_mode::<Rating>(&list).unwrap(),
            Mode::Scoped { .. }
        ));
    }

    #[test]
    fn list_rejects_single_record_queries() {
        let list = Action::List {
            query: Some("?id=7".to_string()),
        };
        let err = apply_mode::<Clinic>(&list).unwrap_err();
        assert!(err.contains("show"));

        let list = Action::List {
            query: Some("?nombre=x".to_string()),
        };
        assert_eq!(apply_mode::<Clinic>(&list).unwrap(), Mode::List);
    }

    #[tokio::test]
    async fn list_output_file_holds_the_rendered_rows() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/clinicas"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"id": 1, "nombre": "Hospital Británico"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("clinicas.json");
        let out_arg = out.to_string_lossy().to_string();
        let run = run_config(
            &[
                "elegirclinica",
                "--api-url",
                &server.uri(),
                "clinicas",
                "list",
                "-o",
                &out_arg,
            ],
            ConfigFile::default(),
            None,
        )
        .unwrap();
        assert_eq!(run.format, OutputFormat::Json);

        let Command::Clinicas { action } = &run.command else {
            panic!("expected clinicas command");
        };
        run_entity::<Clinic>(&run, action).await.unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        let rows: Vec<Clinic> = serde_json::from_str(&written).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Hospital Británico");
    }
}
