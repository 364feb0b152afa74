// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use super::deleter;
use crate::client::dispatch;
use crate::errors::SendError;
use crate::media;
use crate::types::{Attachment, Envelope};
use crate::{Client, Sent};
use botgram_types::{Message, Method, ParseMode, Peer};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where in the video the generated thumbnail frame is grabbed.
const THUMBNAIL_OFFSET: Duration = Duration::from_secs(1);

#[derive(Serialize)]
struct SendVideoRequest {
    chat_id: Peer,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    supports_streaming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    has_spoiler: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disable_notification: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_message_id: Option<i32>,
}

impl Method for SendVideoRequest {
    const NAME: &'static str = "sendVideo";
    type Response = Message;
}

/// Builder for the `sendVideo` call: an MPEG-4 video from the local disk.
///
/// Dimensions and duration can be filled in by hand, or left to
/// [`probe`](Self::probe); [`auto_thumbnail`](Self::auto_thumbnail) grabs
/// a preview frame with `ffmpeg`. Both run when [`send`](Self::send) does,
/// and a failure of either aborts the call before the network is touched.
pub struct SendVideo {
    client: Client,
    envelope: Envelope,
    path: PathBuf,
    caption: Option<String>,
    parse_mode: Option<ParseMode>,
    duration: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
    streaming: bool,
    spoiler: bool,
    silent: bool,
    reply_to: Option<i32>,
    probe: bool,
    auto_thumbnail: bool,
    has_thumbnail: bool,
}

impl SendVideo {
    /// Builds a new video message from the file at `path`. A target chat
    /// must be set with [`to`](Self::to) before sending.
    pub fn new(client: &Client, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut envelope = Envelope::new();
        envelope.attach(Attachment::new("video", &path));

        Self {
            client: client.clone(),
            envelope,
            path,
            caption: None,
            parse_mode: None,
            duration: None,
            width: None,
            height: None,
            streaming: true,
            spoiler: false,
            silent: false,
            reply_to: None,
            probe: false,
            auto_thumbnail: false,
            has_thumbnail: false,
        }
    }

    /// The chat the video is sent to.
    pub fn to(mut self, peer: impl Into<Peer>) -> Self {
        self.envelope.peer = Some(peer.into());
        self
    }

    /// The caption shown below the video, which may be empty for none.
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Parses the caption for formatting entities, server-side.
    pub fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }

    /// The duration of the video, in whole seconds.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration.as_secs() as u32);
        self
    }

    /// The dimensions of the video frame, in pixels.
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Fills duration and dimensions from the file itself via `ffprobe`
    /// when the call is sent. Values set explicitly win over probed ones.
    pub fn probe(mut self) -> Self {
        self.probe = true;
        self
    }

    /// Uses the file at `path` as the preview shown before the video
    /// plays. The server wants a JPEG under 200 kB.
    pub fn thumbnail(mut self, path: impl AsRef<Path>) -> Self {
        self.envelope
            .attach(Attachment::new("thumbnail", path.as_ref()));
        self.has_thumbnail = true;
        self
    }

    /// Extracts the preview frame from the video itself via `ffmpeg` when
    /// the call is sent. An explicit [`thumbnail`](Self::thumbnail) takes
    /// precedence.
    pub fn auto_thumbnail(mut self) -> Self {
        self.auto_thumbnail = true;
        self
    }

    /// Whether clients may start playing the video while it is still
    /// downloading. Defaults to `true`.
    pub fn streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Blurs the video until the recipient chooses to reveal it.
    pub fn spoiler(mut self, spoiler: bool) -> Self {
        self.spoiler = spoiler;
        self
    }

    /// Whether the message should be delivered without sounding a
    /// notification on the receiving devices.
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// The message identifier this video should reply to, if any.
    pub fn reply_to(mut self, reply_to: Option<i32>) -> Self {
        self.reply_to = reply_to;
        self
    }

    /// Holds the video back and sends it only once `delay` has passed. The
    /// caller gets a placeholder back right away; see
    /// [`SendMessage::after`](super::SendMessage::after).
    pub fn after(mut self, delay: Duration) -> Self {
        self.envelope.after = Some(delay);
        self
    }

    /// Deletes the video message once `delay` has passed, measured from
    /// the moment it was delivered.
    pub fn delete_after(mut self, delay: Duration) -> Self {
        self.envelope.delete_after = Some(delay);
        self
    }

    /// Probes, extracts and opens everything the call needs, capturing the
    /// first failure on the envelope. Each step is skipped once a failure
    /// is recorded.
    async fn prepare(&mut self) {
        if self.envelope.is_defective() {
            return;
        }

        if self.probe && (self.duration.is_none() || self.width.is_none() || self.height.is_none())
        {
            match media::probe(&self.path).await {
                Ok(meta) => {
                    self.duration.get_or_insert(meta.duration.as_secs() as u32);
                    self.width.get_or_insert(meta.width);
                    self.height.get_or_insert(meta.height);
                }
                Err(error) => {
                    self.envelope.flag(error.into());
                    return;
                }
            }
        }

        if self.auto_thumbnail && !self.has_thumbnail {
            match media::extract_frame(&self.path, THUMBNAIL_OFFSET).await {
                Ok(frame) => self.envelope.attach(frame),
                Err(error) => {
                    self.envelope.flag(error.into());
                    return;
                }
            }
        }

        self.envelope.open_attachments().await;
    }

    /// Issues the call.
    pub async fn send(mut self) -> Result<Sent, SendError> {
        if self.envelope.peer.is_none() {
            self.envelope.discard();
            return Err(SendError::Invalid("missing target chat"));
        }

        self.prepare().await;

        let Self {
            client,
            mut envelope,
            caption,
            parse_mode,
            duration,
            width,
            height,
            streaming,
            spoiler,
            silent,
            reply_to,
            ..
        } = self;

        if let Some(defect) = envelope.take_defect() {
            envelope.discard();
            return Err(defect);
        }

        let request = SendVideoRequest {
            // Checked above; the envelope was not touched since.
            chat_id: envelope.peer.clone().expect("peer was validated"),
            caption,
            parse_mode,
            duration,
            width,
            height,
            supports_streaming: streaming.then_some(true),
            has_spoiler: spoiler.then_some(true),
            disable_notification: silent.then_some(true),
            reply_to_message_id: reply_to,
        };

        let invoke = client.clone();
        dispatch(
            envelope,
            move |parts| async move { invoke.invoke_with_parts(&request, parts).await },
            deleter(client),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    fn client() -> Client {
        Client::new(Config {
            token: "123:abc".to_string(),
            params: Default::default(),
        })
    }

    #[tokio::test]
    async fn missing_video_fails_before_any_network_call() {
        let dir = tempfile::tempdir().unwrap();
        let thumb = dir.path().join("cover.jpg");
        std::fs::write(&thumb, b"jpeg").unwrap();

        let result = SendVideo::new(&client(), dir.path().join("missing.mp4"))
            .to(10)
            .thumbnail(&thumb)
            .send()
            .await;

        match result {
            Err(SendError::Attachment(error)) => {
                assert_eq!(error.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("expected attachment error, got {other:?}"),
        }
        // The cover the caller handed us is not ours to delete.
        assert_eq!(std::fs::read(&thumb).unwrap(), b"jpeg");
    }

    #[tokio::test]
    async fn probe_failure_surfaces_as_media_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"not actually mpeg4").unwrap();

        let result = SendVideo::new(&client(), &path).to(10).probe().send().await;

        // Depending on the machine this is either "ffprobe missing" or
        // "ffprobe rejected the bytes"; both must map to a media error and
        // leave the input file alone.
        assert!(matches!(result, Err(SendError::Media(_))));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn explicit_metadata_skips_probing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"bytes").unwrap();

        // With all three values given, `probe()` has nothing to fill in,
        // so sending must get past preparation even where ffprobe would
        // fail; it then stops at the missing target.
        let result = SendVideo::new(&client(), &path)
            .probe()
            .duration(Duration::from_secs(12))
            .dimensions(640, 360)
            .send()
            .await;

        assert!(matches!(
            result,
            Err(SendError::Invalid("missing target chat"))
        ));
    }
}
