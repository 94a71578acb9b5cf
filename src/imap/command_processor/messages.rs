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

use std::borrow::Cow;

use super::defs::*;
use crate::account::mailbox::SelectedMailbox;
use crate::account::model::*;
use crate::account::snapshot::MessageSnapshot;
use crate::storage::MailStore;
use crate::support::error::Error;
use crate::support::safe_name::is_safe_name;

impl<S: MailStore> CommandProcessor<S> {
    pub(super) fn cmd_move(
        &mut self,
        cmd: s::MoveCommand<'_>,
        sender: SendResponse<'_>,
    ) -> CmdResult {
        let snapshot =
            selected!(self)?.snapshot().map_err(map_error!(self))?;
        let messages = parse_seqnum_range(&snapshot, &cmd.messages)?;
        self.do_move(
            &cmd.dst,
            snapshot,
            MoveRequest { ids: messages },
            sender,
            false,
            SelectedMailbox::seqnum_moove,
        )
    }

    pub(super) fn cmd_uid_move(
        &mut self,
        cmd: s::MoveCommand<'_>,
        sender: SendResponse<'_>,
    ) -> CmdResult {
        let snapshot =
            selected!(self)?.snapshot().map_err(map_error!(self))?;
        let messages = parse_uid_range(&snapshot, &cmd.messages)?;
        self.do_move(
            &cmd.dst,
            snapshot,
            MoveRequest { ids: messages },
            sender,
            true,
            SelectedMailbox::moove,
        )
    }

    fn do_move<T>(
        &mut self,
        dst: &str,
        snapshot: MessageSnapshot,
        request: T,
        sender: SendResponse<'_>,
        send_copyuid: bool,
        f: impl FnOnce(
            &mut SelectedMailbox<S::Folder>,
            &MessageSnapshot,
            &T,
            &S::Folder,
        ) -> Result<MoveResponse, Error>,
    ) -> CmdResult {
        let dst = if is_safe_name(dst) {
            self.store.open(dst, false)
        } else {
            Err(Error::UnsafeName)
        }
        .map_err(map_error! {
            self,
            NxMailbox => (No, Some(s::RespTextCode::TryCreate)),
            UnsafeName => (No, None),
        })?;

        let selected = selected!(self)?;
        let response =
            f(selected, &snapshot, &request, &dst).map_err(map_error! {
                self,
                NxMessage => (No, None),
                MailboxFull | BatchTooBig =>
                    (No, Some(s::RespTextCode::Limit)),
            })?;

        if send_copyuid {
            // RFC 6851 recommends sending the COPYUID response in an
            // untagged response before any EXPUNGE responses.
            sender(s::Response::Cond(s::CondResponse {
                cond: s::RespCondType::Ok,
                code: Some(s::RespTextCode::CopyUid(s::CopyUidData {
                    uid_validity: response.uid_validity,
                    from_uids: Cow::Owned(s::uids_to_range_string(
                        &response.from_uids,
                    )),
                    to_uids: Cow::Owned(s::uids_to_range_string(
                        &response.to_uids,
                    )),
                })),
                quip: None,
            }));
        }

        self.flush_pending_expunge(sender);
        success()
    }

    /// Report the removal notices accumulated on the selected mailbox, in
    /// ascending original-sequence-number order.
    fn flush_pending_expunge(&mut self, sender: SendResponse<'_>) {
        if let Some(ref mut selected) = self.selected {
            for seqnum in selected.take_pending_expunge() {
                sender(s::Response::Expunge(seqnum.0.get()));
            }
        }
    }
}
