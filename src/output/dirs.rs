use std::fs::{self, DirBuilder};
use std::io;
use std::path::Path;

use crate::utils::{OutputError, Result};

/// rwxrwxr-x
#[cfg(unix)]
const DIR_MODE: u32 = 0o775;

/// Ensures every component of `path` exists as a directory.
///
/// Components are walked top-down; existing directories are left alone, so
/// calling this again for the same path is a no-op. A component that exists
/// but is not a directory fails with `PathNotADirectory`.
pub fn ensure_dir(path: &Path) -> Result<()> {
    let mut components: Vec<&Path> = path
        .ancestors()
        .filter(|p| !p.as_os_str().is_empty() && p.parent().is_some())
        .collect();
    components.reverse();

    for dir in components {
        make_dir(dir)?;
    }
    Ok(())
}

fn make_dir(dir: &Path) -> Result<()> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(OutputError::PathNotADirectory(dir.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => match dir_builder().create(dir) {
            Ok(()) => Ok(()),
            // lost a race with another writer
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
            Err(source) => Err(OutputError::DirectoryCreate {
                path: dir.to_path_buf(),
                source,
            }),
        },
        Err(source) => Err(OutputError::DirectoryCreate {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

fn dir_builder() -> DirBuilder {
    #[allow(unused_mut)]
    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder
}
