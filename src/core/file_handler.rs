use super::error::{CoreError, Result};
use super::paths::PathResolver;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// File mutations and reads on workspace-confined paths.
///
/// Every method takes client-relative paths and resolves them through the
/// [`PathResolver`] before touching the filesystem.
pub struct FileHandler<'a> {
    resolver: &'a PathResolver,
}

impl<'a> FileHandler<'a> {
    pub fn new(resolver: &'a PathResolver) -> Self {
        Self { resolver }
    }

    pub fn read_file(&self, relative: &str) -> Result<String> {
        let full_path = self.resolver.resolve(relative)?;
        if !full_path.is_file() {
            return Err(CoreError::NotFound(relative.to_string()));
        }
        let bytes = fs::read(&full_path).map_err(|e| CoreError::io(e, &full_path))?;
        String::from_utf8(bytes).map_err(|_| CoreError::NotText(relative.to_string()))
    }

    /// Creates a new file. Parent directories are created first and are kept
    /// even if the file turns out to exist already.
    pub fn create_file(&self, relative: &str, content: &str) -> Result<()> {
        let full_path = self.resolver.resolve_or_create(relative)?;
        if full_path.exists() {
            return Err(CoreError::Conflict(relative.to_string()));
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => CoreError::Conflict(relative.to_string()),
                _ => CoreError::io(e, &full_path),
            })?;
        file.write_all(content.as_bytes())
            .map_err(|e| CoreError::io(e, &full_path))?;

        tracing::info!("Created {} ({} bytes)", relative, content.len());
        Ok(())
    }

    /// Replaces the content of an existing file. The new content is written to a
    /// sibling temporary file and renamed over the target.
    pub fn update_file(&self, relative: &str, content: &str) -> Result<()> {
        let full_path = self.resolver.resolve(relative)?;
        if !full_path.is_file() {
            return Err(CoreError::NotFound(relative.to_string()));
        }
        write_atomically(&full_path, content)?;

        tracing::info!("Updated {} ({} bytes)", relative, content.len());
        Ok(())
    }

    pub fn rename(&self, old_relative: &str, new_relative: &str) -> Result<()> {
        let old_path = self.resolver.resolve(old_relative)?;
        let new_path = self.resolver.resolve(new_relative)?;
        if !old_path.exists() {
            return Err(CoreError::NotFound(old_relative.to_string()));
        }
        relocate(&old_path, &new_path)?;

        tracing::info!("Renamed {} -> {}", old_relative, new_relative);
        Ok(())
    }

    /// Moves a file or directory. Missing destination parents are created. When
    /// the destination is an existing directory the source keeps its name inside it.
    pub fn move_path(&self, src_relative: &str, dest_relative: &str) -> Result<()> {
        let src_path = self.resolver.resolve(src_relative)?;
        let mut dest_path = self.resolver.resolve_or_create(dest_relative)?;
        if !src_path.exists() {
            return Err(CoreError::NotFound(src_relative.to_string()));
        }
        if dest_path.is_dir() {
            if let Some(name) = src_path.file_name() {
                dest_path = dest_path.join(name);
            }
        }
        relocate(&src_path, &dest_path)?;

        tracing::info!("Moved {} -> {}", src_relative, dest_relative);
        Ok(())
    }

    pub fn delete_file(&self, relative: &str) -> Result<()> {
        let full_path = self.resolver.resolve(relative)?;
        if !full_path.is_file() {
            return Err(CoreError::NotFound(relative.to_string()));
        }
        fs::remove_file(&full_path).map_err(|e| CoreError::io(e, &full_path))?;

        tracing::info!("Deleted {}", relative);
        Ok(())
    }
}

fn write_atomically(target: &Path, content: &str) -> Result<()> {
    let dir = target.parent().unwrap_or(target);
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| CoreError::io(e, dir))?;
    temp.write_all(content.as_bytes())
        .map_err(|e| CoreError::io(e, temp.path()))?;
    if let Ok(metadata) = fs::metadata(target) {
        // Keep the original permission bits; the temp file starts out as 0600.
        fs::set_permissions(temp.path(), metadata.permissions())
            .map_err(|e| CoreError::io(e, temp.path()))?;
    }
    temp.persist(target)
        .map_err(|e| CoreError::io(e.error, target))?;
    Ok(())
}

/// Renames `from` to `to`, falling back to copy-and-delete for regular files
/// when a plain rename is not possible (e.g. across filesystems).
fn relocate(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if from.is_file() && !to.is_dir() => {
            tracing::debug!("rename {:?} failed ({}), copying instead", from, e);
            fs::copy(from, to).map_err(|e| CoreError::io(e, to))?;
            fs::remove_file(from).map_err(|e| CoreError::io(e, from))
        }
        Err(e) => Err(CoreError::io(e, from)),
    }
}
