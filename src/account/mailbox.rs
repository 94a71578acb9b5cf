//-
// Copyright (c) 2024, Jason Lingle
//
// This file is part of Movemap.
//
// Movemap is free software: you can  redistribute it and/or modify it under
// the terms of  the GNU General Public  License as published  by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// Movemap is distributed  in the hope that  it will be useful,  but WITHOUT
// ANY WARRANTY; without even  the implied warranty of MERCHANTABILITY  or
// FITNESS FOR  A PARTICULAR PURPOSE.  See the GNU  General Public License
// for more details.
//
// You should have received a copy of the GNU General Public License along
// with Movemap. If not, see <http://www.gnu.org/licenses/>.

use std::sync::Arc;

use log::{info, warn};

use crate::account::model::*;
use crate::account::snapshot::MessageSnapshot;
use crate::storage::MailFolder;
use crate::support::config::Settings;
use crate::support::error::Error;
use crate::support::log_prefix::LogPrefix;

/// The session's view of the currently selected mailbox.
///
/// Holds the folder handle plus the removal notices that have accumulated
/// since the last flush. One `SelectedMailbox` lives for the duration of a
/// selection; snapshots are captured from it once per command.
pub struct SelectedMailbox<F> {
    name: String,
    folder: F,
    settings: Arc<Settings>,
    log_prefix: LogPrefix,
    /// Original (snapshot) sequence numbers of messages removed by this
    /// session but not yet reported to the client.
    pending_expunge: Vec<Seqnum>,
}

impl<F: MailFolder> SelectedMailbox<F> {
    pub fn new(
        name: String,
        folder: F,
        settings: Arc<Settings>,
        log_prefix: LogPrefix,
    ) -> Self {
        log_prefix.set_mailbox(name.clone());
        SelectedMailbox {
            name,
            folder,
            settings,
            log_prefix,
            pending_expunge: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capture the snapshot a command resolves identifiers against.
    pub fn snapshot(&self) -> Result<MessageSnapshot, Error> {
        Ok(MessageSnapshot::new(self.folder.uids()?))
    }

    /// The RFC 6851 `MOVE` command.
    ///
    /// The sequence numbers are translated through the snapshot up front;
    /// everything below this point works in UIDs only.
    pub fn seqnum_moove(
        &mut self,
        snapshot: &MessageSnapshot,
        request: &MoveRequest<Seqnum>,
        dst: &F,
    ) -> Result<MoveResponse, Error> {
        self.moove(
            snapshot,
            &MoveRequest {
                ids: snapshot.seqnum_range_to_uid(&request.ids)?,
            },
            dst,
        )
    }

    /// The RFC 6851 `UID MOVE` command.
    ///
    /// Walks the qualifying messages in ascending UID order and issues one
    /// atomic single-message transfer for each. A failure part-way through
    /// aborts the loop; transfers already made stay made, and the caller is
    /// expected to report the failure rather than pretend nothing happened.
    pub fn moove(
        &mut self,
        snapshot: &MessageSnapshot,
        request: &MoveRequest<Uid>,
        dst: &F,
    ) -> Result<MoveResponse, Error> {
        let targets: Vec<(Seqnum, Uid)> =
            snapshot.qualifying(&request.ids).collect();
        if targets.len() > self.settings.max_move_batch {
            return Err(Error::BatchTooBig);
        }

        let mut response = MoveResponse::default();
        for &(seqnum, uid) in &targets {
            let new_uid = match self.folder.move_message(uid, dst) {
                Ok(new_uid) => new_uid,
                Err(e) => {
                    warn!(
                        "{} Move of {} failed after {} message(s): {}",
                        self.log_prefix,
                        uid.0.get(),
                        response.len(),
                        e
                    );
                    return Err(e);
                },
            };

            response.push(uid, new_uid);
            self.pending_expunge.push(seqnum);
        }

        response.uid_validity = dst.uid_validity()?;

        if !response.is_empty() {
            info!(
                "{} Moved {} message(s) to destination mailbox",
                self.log_prefix,
                response.len()
            );
        }

        Ok(response)
    }

    /// Return the accumulated removal notices, ascending by original
    /// sequence number, clearing the pending list.
    pub fn take_pending_expunge(&mut self) -> Vec<Seqnum> {
        self.pending_expunge.sort_unstable();
        self.pending_expunge.dedup();
        std::mem::take(&mut self.pending_expunge)
    }
}
