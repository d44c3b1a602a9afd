mod engine;
mod sessions;
mod telegram;

use clap::Parser;
use cob_core::Config;
use cob_gateway::SshGateway;
use cob_store::PgContactStore;
use engine::Engine;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use teloxide::Bot;
use tracing::{error, info};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "cob-bot")]
struct Args {
    #[arg(long, default_value = "")]
    log_file: String,
    #[arg(long, default_value_t = false)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let _log_guard = init_logging(&args);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(event = "config_error", error = %err);
            return Err(err.into());
        }
    };

    let store = Arc::new(PgContactStore::new(&config.store));
    if !store.probe_connectivity().await {
        error!(event = "startup_aborted", reason = "database unavailable");
        anyhow::bail!("database unavailable after startup probe");
    }

    let gateway = Arc::new(SshGateway::new(config.remote.clone()));
    let engine = Arc::new(Engine::new(
        store,
        gateway,
        config.bot.repl_log_path.clone(),
    ));

    let bot = Bot::new(&config.bot.token);
    info!(event = "bot_started", remote_host = %config.remote.host);
    telegram::run(bot, engine).await;
    info!(event = "bot_stopped");
    Ok(())
}

fn init_logging(args: &Args) -> Option<LogGuard> {
    let level = if args.debug {
        "debug".to_string()
    } else if let Ok(level) = std::env::var("BOT_LOG_LEVEL") {
        level
    } else {
        "info".to_string()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let writer = match open_log_file(&resolve_log_path(&args.log_file)) {
        Ok(log_guard) => log_guard,
        Err(err) => {
            eprintln!("log_file_error: {err}");
            LogGuard { file: None }
        }
    };
    let file = writer.file.clone();
    let make_writer = BoxMakeWriter::new(move || MultiWriter::new(file.clone()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(make_writer)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return None;
    }
    Some(writer)
}

fn resolve_log_path(arg: &str) -> String {
    if !arg.trim().is_empty() {
        return arg.to_string();
    }
    if let Ok(value) = std::env::var("BOT_LOG_FILE") {
        if !value.trim().is_empty() {
            return value;
        }
    }
    "bot.log".to_string()
}

struct LogGuard {
    file: Option<Arc<Mutex<std::fs::File>>>,
}

struct MultiWriter {
    stdout: io::Stdout,
    file: Option<Arc<Mutex<std::fs::File>>>,
}

impl MultiWriter {
    fn new(file: Option<Arc<Mutex<std::fs::File>>>) -> Self {
        Self {
            stdout: io::stdout(),
            file,
        }
    }
}

impl Write for MultiWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _ = self.stdout.write_all(buf);
        if let Some(file) = &self.file {
            let mut file = file.lock().expect("log file lock");
            let _ = file.write_all(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = self.stdout.flush();
        if let Some(file) = &self.file {
            let mut file = file.lock().expect("log file lock");
            let _ = file.flush();
        }
        Ok(())
    }
}

fn open_log_file(path: &str) -> io::Result<LogGuard> {
    let path = PathBuf::from(path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && std::fs::create_dir_all(parent).is_err() {
            return Ok(LogGuard { file: None });
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(LogGuard {
        file: Some(Arc::new(Mutex::new(file))),
    })
}
