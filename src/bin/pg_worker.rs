//! Runs embedded `PostgreSQL` lifecycle steps for the task store's test
//! cluster from an unprivileged worker process.
//!
//! Usage:
//!
//! ```text
//! pg_worker <setup|start|stop> <payload-path>
//! ```
//!
//! The payload is the JSON [`WorkerPayload`] written by
//! `pg-embed-setup-unpriv`: cluster settings plus environment overrides.
//! When launched as root the worker re-executes itself as `nobody` before
//! touching the data directory, because `initdb` refuses to run as root.

#[cfg(unix)]
use camino::{Utf8Path, Utf8PathBuf};
#[cfg(unix)]
use nix::unistd::{Uid, User, initgroups, setgid, setuid};
#[cfg(unix)]
use pg_embedded_setup_unpriv::ambient_dir_and_path;
#[cfg(unix)]
use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
#[cfg(unix)]
use postgresql_embedded::{PostgreSQL, Status};
#[cfg(unix)]
use std::{env, ffi::CString, io::Read, mem::ManuallyDrop, process::Command};
#[cfg(unix)]
use thiserror::Error;

#[cfg(unix)]
const REEXEC_MARKER_ENV: &str = "PG_WORKER_REEXEC";
#[cfg(unix)]
const TRUSTED_PATH: &str = "/usr/sbin:/usr/bin:/sbin:/bin";
#[cfg(unix)]
const UNPRIVILEGED_USER: &str = "nobody";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(unix)]
#[derive(Debug, Error)]
enum WorkerError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("failed to read worker payload: {0}")]
    PayloadRead(#[source] BoxError),
    #[error("failed to parse worker payload: {0}")]
    PayloadParse(#[source] serde_json::Error),
    #[error("invalid cluster settings: {0}")]
    Settings(String),
    #[error("failed to build runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to drop privileges: {0}")]
    PrivilegeDrop(String),
    #[error("postgres {operation} failed: {reason}")]
    Postgres {
        operation: &'static str,
        reason: String,
    },
}

#[cfg(unix)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Setup,
    Start,
    Stop,
}

#[cfg(unix)]
impl Operation {
    fn parse(raw: &str) -> Result<Self, WorkerError> {
        match raw {
            "setup" => Ok(Self::Setup),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(WorkerError::InvalidArgs(format!(
                "unknown operation '{other}'; expected setup, start or stop"
            ))),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

#[cfg(unix)]
fn main() -> Result<(), BoxError> {
    let args = collect_args()?;
    reexec_unprivileged(&args)?;
    let (operation, payload_path) = parse_args(args.into_iter())?;
    run(operation, &payload_path).map_err(Into::into)
}

#[cfg(not(unix))]
fn main() -> Result<(), BoxError> {
    Err("pg_worker only runs on Unix platforms".into())
}

#[cfg(unix)]
fn collect_args() -> Result<Vec<Utf8PathBuf>, WorkerError> {
    env::args_os()
        .map(|arg| {
            arg.into_string()
                .map(Utf8PathBuf::from)
                .map_err(|_| WorkerError::InvalidArgs("argument is not valid UTF-8".into()))
        })
        .collect()
}

#[cfg(unix)]
fn parse_args(
    mut args: impl Iterator<Item = Utf8PathBuf>,
) -> Result<(Operation, Utf8PathBuf), WorkerError> {
    let _program = args.next();
    let operation = args
        .next()
        .ok_or_else(|| WorkerError::InvalidArgs("missing operation argument".into()))
        .and_then(|arg| Operation::parse(arg.as_str()))?;
    let payload_path = args
        .next()
        .ok_or_else(|| WorkerError::InvalidArgs("missing payload path argument".into()))?;
    if let Some(extra) = args.next() {
        return Err(WorkerError::InvalidArgs(format!(
            "unexpected extra argument: {extra}"
        )));
    }
    Ok((operation, payload_path))
}

#[cfg(unix)]
fn run(operation: Operation, payload_path: &Utf8Path) -> Result<(), WorkerError> {
    let payload = load_payload(payload_path)?;
    drop_privileges(UNPRIVILEGED_USER)?;
    let settings = payload
        .settings
        .into_settings()
        .map_err(|err| WorkerError::Settings(err.to_string()))?;
    apply_environment(&payload.environment);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(WorkerError::Runtime)?;
    // The server must outlive this process; dropping the handle stops it.
    let mut postgres = ManuallyDrop::new(PostgreSQL::new(settings));
    runtime.block_on(async {
        match operation {
            Operation::Setup => {
                postgres
                    .setup()
                    .await
                    .map_err(|err| postgres_error(operation, &err))?;
                ensure_started(&mut postgres, operation).await
            }
            Operation::Start => ensure_started(&mut postgres, operation).await,
            Operation::Stop => postgres
                .stop()
                .await
                .map_err(|err| postgres_error(operation, &err)),
        }
    })?;
    Ok(())
}

#[cfg(unix)]
async fn ensure_started(postgres: &mut PostgreSQL, operation: Operation) -> Result<(), WorkerError> {
    if matches!(postgres.status(), Status::Started) {
        return Ok(());
    }
    postgres
        .start()
        .await
        .map_err(|err| postgres_error(operation, &err))
}

#[cfg(unix)]
fn postgres_error(operation: Operation, err: &impl std::fmt::Display) -> WorkerError {
    WorkerError::Postgres {
        operation: operation.as_str(),
        reason: err.to_string(),
    }
}

#[cfg(unix)]
fn load_payload(path: &Utf8Path) -> Result<WorkerPayload, WorkerError> {
    let bytes = read_payload(path).map_err(WorkerError::PayloadRead)?;
    serde_json::from_slice(&bytes).map_err(WorkerError::PayloadParse)
}

#[cfg(unix)]
fn read_payload(path: &Utf8Path) -> Result<Vec<u8>, BoxError> {
    let (dir, relative) = ambient_dir_and_path(path)?;
    let mut file = dir.open(relative.as_std_path())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[cfg(unix)]
fn reexec_unprivileged(args: &[Utf8PathBuf]) -> Result<(), WorkerError> {
    if !Uid::effective().is_root() || env::var_os(REEXEC_MARKER_ENV).is_some() {
        return Ok(());
    }

    let exe = env::current_exe()
        .map_err(WorkerError::Runtime)?
        .into_os_string()
        .into_string()
        .map(Utf8PathBuf::from)
        .map_err(|_| WorkerError::InvalidArgs("executable path is not valid UTF-8".into()))?;
    let forwarded = args.get(1..).unwrap_or_default();

    let status = match Command::new("runuser")
        .args(["-u", UNPRIVILEGED_USER, "--"])
        .arg(exe.as_std_path())
        .args(forwarded.iter().map(|arg| arg.as_std_path()))
        .env(REEXEC_MARKER_ENV, "1")
        .env("PATH", TRUSTED_PATH)
        .status()
    {
        Ok(status) => status,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Command::new("/bin/su")
                .args(["-s", "/bin/sh", UNPRIVILEGED_USER, "-c"])
                .arg(su_command(&exe, forwarded))
                .env("PATH", TRUSTED_PATH)
                .status()
                .map_err(|su_err| WorkerError::PrivilegeDrop(su_err.to_string()))?
        }
        Err(err) => return Err(WorkerError::PrivilegeDrop(err.to_string())),
    };

    std::process::exit(status.code().unwrap_or(1));
}

/// Builds the `su -c` command line that re-runs the worker.
#[cfg(unix)]
fn su_command(exe: &Utf8Path, args: &[Utf8PathBuf]) -> String {
    let mut command = format!("{REEXEC_MARKER_ENV}=1 exec {}", shell_quote(exe.as_str()));
    for arg in args {
        command.push(' ');
        command.push_str(&shell_quote(arg.as_str()));
    }
    command
}

/// Wraps a value in single quotes for a POSIX shell.
#[cfg(unix)]
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

#[cfg(unix)]
fn drop_privileges(username: &str) -> Result<(), WorkerError> {
    if !Uid::effective().is_root() {
        return Ok(());
    }

    let user = User::from_name(username)
        .map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?
        .ok_or_else(|| WorkerError::PrivilegeDrop(format!("user '{username}' not found")))?;
    let name = CString::new(user.name.clone())
        .map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;
    initgroups(&name, user.gid).map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;
    setgid(user.gid).map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;
    setuid(user.uid).map_err(|err| WorkerError::PrivilegeDrop(err.to_string()))?;

    // SAFETY: the worker is single-threaded at this point.
    unsafe {
        env::set_var("HOME", user.dir);
        env::set_var("USER", &user.name);
        env::set_var("LOGNAME", &user.name);
    }
    Ok(())
}

#[cfg(unix)]
fn apply_environment(environment: &[(String, Option<PlainSecret>)]) {
    for (key, value) in environment {
        // SAFETY: the worker is single-threaded and owns its environment.
        unsafe {
            match value {
                Some(secret) => env::set_var(key, secret.expose()),
                None => env::remove_var(key),
            }
        }
    }
}
