//! Worker binary discovery and preparation.

use super::BoxError;
use super::fs_utils::open_parent_dir;
use camino::{Utf8Path, Utf8PathBuf};
#[cfg(unix)]
use cap_std::fs::{Permissions, PermissionsExt};
use std::io::Write;
use std::sync::OnceLock;

static PREPARED_WORKER: OnceLock<Utf8PathBuf> = OnceLock::new();

pub(super) fn locate_pg_worker_path() -> Option<Utf8PathBuf> {
    crate::test_helpers::locate_pg_worker_path()
}

/// Copies the worker into the temp directory behind a wrapper script.
///
/// The build directory is often unreadable for `nobody`, so the copy is what
/// the cluster bootstrap executes.
pub(super) fn prepare_pg_worker(worker: &Utf8Path) -> Result<Utf8PathBuf, BoxError> {
    if let Some(prepared) = PREPARED_WORKER.get() {
        return Ok(prepared.clone());
    }

    let temp_dir = Utf8PathBuf::try_from(std::env::temp_dir()).map_err(|err| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("temp directory path is not valid UTF-8: {err}"),
        )) as BoxError
    })?;
    let wrapper_path = temp_dir.join(format!("taskboard_pg_worker_{}", std::process::id()));
    let binary_path = wrapper_path.with_extension("bin");

    let (source_dir, source_name) = open_parent_dir(worker)?;
    let (wrapper_dir, wrapper_name) = open_parent_dir(&wrapper_path)?;
    let (binary_dir, binary_name) = open_parent_dir(&binary_path)?;
    remove_if_present(&wrapper_dir, wrapper_name)?;
    remove_if_present(&binary_dir, binary_name)?;

    source_dir
        .copy(source_name, &binary_dir, binary_name)
        .map_err(|err| Box::new(err) as BoxError)?;
    let mut wrapper = wrapper_dir
        .create(wrapper_name)
        .map_err(|err| Box::new(err) as BoxError)?;
    let script = format!(
        concat!(
            "#!/bin/sh\n",
            "if [ \"$(id -u)\" -eq 0 ]; then\n",
            "  exec /usr/sbin/runuser -u nobody -- {worker} \"$@\"\n",
            "fi\n",
            "exec {worker} \"$@\"\n",
        ),
        worker = binary_path.as_str()
    );
    wrapper
        .write_all(script.as_bytes())
        .map_err(|err| Box::new(err) as BoxError)?;
    drop(wrapper);

    #[cfg(unix)]
    for (dir, name) in [(&wrapper_dir, wrapper_name), (&binary_dir, binary_name)] {
        dir.set_permissions(name, Permissions::from_mode(0o755))
            .map_err(|err| Box::new(err) as BoxError)?;
    }

    Ok(PREPARED_WORKER.get_or_init(|| wrapper_path).clone())
}

fn remove_if_present(dir: &cap_std::fs_utf8::Dir, name: &str) -> Result<(), BoxError> {
    match dir.remove_file(name) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(Box::new(err) as BoxError),
    }
}
