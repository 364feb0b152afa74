// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use log::{debug, warn};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;

/// A local file wrapped for streaming into an outgoing request.
///
/// The file is not touched on creation. [`open`] acquires the handle, the
/// transport takes and consumes it while the request is sent, and
/// [`dispose`] releases whatever is left. Files created by the library
/// itself (extracted video frames) are marked temporary and are also
/// removed from disk on release; user-supplied files never are.
///
/// An attachment belongs to exactly one outgoing request and is released
/// exactly once, on whichever path that request ends up taking.
///
/// [`open`]: Attachment::open
/// [`dispose`]: Attachment::dispose
#[derive(Debug)]
pub struct Attachment {
    field: &'static str,
    path: PathBuf,
    file_name: String,
    file: Option<File>,
    temporary: bool,
    released: bool,
}

impl Attachment {
    /// Wraps a user-supplied file, to be sent under the given parameter
    /// name (`"photo"`, `"video"`, `"document"`, `"thumbnail"`, ...).
    pub(crate) fn new(field: &'static str, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        Self {
            field,
            path,
            file_name,
            file: None,
            temporary: false,
            released: false,
        }
    }

    /// Wraps a file generated by the library, which is deleted from disk
    /// when the attachment is released.
    pub(crate) fn temporary(field: &'static str, path: impl Into<PathBuf>) -> Self {
        let mut attachment = Self::new(field, path);
        attachment.temporary = true;
        attachment
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub(crate) fn field(&self) -> &'static str {
        self.field
    }

    /// The mime type guessed from the file extension, if any.
    pub(crate) fn guessed_mime(&self) -> Option<String> {
        mime_guess::from_path(&self.path)
            .first()
            .map(|mime| mime.essence_str().to_string())
    }

    /// Opens the underlying file for streaming. Called exactly once per
    /// attachment, before the request is handed to the transport.
    pub(crate) async fn open(&mut self) -> io::Result<()> {
        self.file = Some(File::open(&self.path).await?);
        Ok(())
    }

    /// Takes the open handle out so the transport can stream it. Returns
    /// `None` if the attachment was never opened.
    pub(crate) fn take_file(&mut self) -> Option<File> {
        self.file.take()
    }

    /// Releases the attachment: drops the handle if it is still held and
    /// removes generated temporaries from disk. A failed unlink is logged,
    /// never surfaced.
    pub(crate) fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        drop(self.file.take());
        if self.temporary {
            match std::fs::remove_file(&self.path) {
                Ok(()) => debug!("removed temporary file {:?}", self.path),
                Err(error) if error.kind() == io::ErrorKind::NotFound => {}
                Err(error) => warn!("failed to remove temporary file {:?}: {}", self.path, error),
            }
        }
    }
}

// A scheduled task that is aborted drops its attachments without going
// through `dispose`; temporaries must still not linger on disk.
impl Drop for Attachment {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn scratch_file(contents: &[u8]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(contents)
            .unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn user_file_survives_release() {
        let (_dir, path) = scratch_file(b"not really a video");

        let mut attachment = Attachment::new("video", &path);
        attachment.open().await.unwrap();
        attachment.dispose();

        assert_eq!(std::fs::read(&path).unwrap(), b"not really a video");
    }

    #[tokio::test]
    async fn temporary_file_is_removed_once() {
        let (_dir, path) = scratch_file(b"jpeg bytes");

        let mut attachment = Attachment::temporary("thumbnail", &path);
        attachment.open().await.unwrap();
        attachment.dispose();

        assert!(!path.exists());
    }

    #[test]
    fn unopened_temporary_is_removed_on_drop() {
        let (_dir, path) = scratch_file(b"jpeg bytes");

        drop(Attachment::temporary("thumbnail", &path));

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn open_failure_reports_missing_file() {
        let mut attachment = Attachment::new("document", "/no/such/file.bin");
        let error = attachment.open().await.unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn taken_handle_is_not_closed_twice() {
        let (_dir, path) = scratch_file(b"payload");

        let mut attachment = Attachment::new("document", &path);
        attachment.open().await.unwrap();
        let file = attachment.take_file().expect("handle was opened");
        attachment.dispose();

        // The transport owns the handle now; releasing the attachment must
        // not have invalidated it.
        drop(file);
        assert!(path.exists());
    }
}
