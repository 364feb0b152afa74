// Copyright 2024 - developers of the `botgram` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use super::Attachment;
use crate::errors::SendError;
use botgram_sender::Part;
use botgram_types::Peer;
use std::time::Duration;

/// The accumulated state of one outgoing call: where it goes, when it
/// should run, the files it streams, and the first error captured while it
/// was being put together.
///
/// An envelope is owned by a single builder and moved, by value, into
/// whichever path ends up executing the call. Nothing on the original call
/// stack keeps a reference past that point, which is what makes the
/// release-exactly-once guarantee hold across the immediate/deferred fork.
#[derive(Debug, Default)]
pub(crate) struct Envelope {
    pub(crate) peer: Option<Peer>,
    pub(crate) after: Option<Duration>,
    pub(crate) delete_after: Option<Duration>,
    attachments: Vec<Attachment>,
    defect: Option<SendError>,
}

impl Envelope {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers an attachment so that every exit path releases it.
    pub(crate) fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// Captures the first failure observed while building the request.
    /// Later failures are ignored; the first one is what `send()` reports.
    pub(crate) fn flag(&mut self, error: SendError) {
        if self.defect.is_none() {
            self.defect = Some(error);
        }
    }

    pub(crate) fn is_defective(&self) -> bool {
        self.defect.is_some()
    }

    pub(crate) fn take_defect(&mut self) -> Option<SendError> {
        self.defect.take()
    }

    /// Opens every registered attachment in order, capturing the first
    /// failure as the envelope's defect. Attachments past the failing one
    /// are left unopened; [`discard`](Self::discard) handles both.
    pub(crate) async fn open_attachments(&mut self) {
        if self.defect.is_some() {
            return;
        }

        for attachment in self.attachments.iter_mut() {
            if let Err(error) = attachment.open().await {
                self.defect = Some(SendError::Attachment(error));
                return;
            }
        }
    }

    /// Pairs every opened handle with its parameter name for the transport.
    pub(crate) fn take_parts(&mut self) -> Vec<Part> {
        self.attachments
            .iter_mut()
            .filter_map(|attachment| {
                let mime = attachment.guessed_mime();
                let file_name = attachment.file_name().to_string();
                attachment
                    .take_file()
                    .map(|file| Part::new(attachment.field(), file_name, mime, file))
            })
            .collect()
    }

    /// Releases every registered attachment. Handles already taken by the
    /// transport are not affected; temporary files are removed from disk.
    pub(crate) fn discard(self) {
        for attachment in self.attachments {
            attachment.dispose();
        }
    }
}
