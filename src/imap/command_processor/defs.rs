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
use std::sync::Arc;

use log::error;

use crate::account::mailbox::SelectedMailbox;
use crate::account::model::*;
use crate::account::snapshot::MessageSnapshot;
use crate::storage::MailStore;
use crate::support::config::Settings;
use crate::support::error::Error;
use crate::support::log_prefix::LogPrefix;
use crate::support::safe_name::is_safe_name;

pub(super) use crate::imap::syntax as s;

/// Receives commands in the raw AST defined in the `syntax` module, and
/// emits responses in that same raw AST model.
///
/// One `CommandProcessor` belongs to one session; the session drives it with
/// one command at a time, so a command always runs to completion before the
/// next begins. The store handle is shared with every other session.
pub struct CommandProcessor<S: MailStore> {
    pub(super) log_prefix: LogPrefix,
    pub(super) settings: Arc<Settings>,
    pub(super) store: S,
    pub(super) selected: Option<SelectedMailbox<S::Folder>>,
}

/// Used just for the convenient `?` operator. We mostly don't distinguish
/// `Ok` from `Err` --- the contained value is sent down the wire.
pub(super) type CmdResult = Result<s::Response<'static>, s::Response<'static>>;

/// Return value from an operation that can either succeed with a value, or
/// fail with an IMAP response.
pub(super) type PartialResult<T> = Result<T, s::Response<'static>>;

/// Callback used to send additional non-tagged responses as they become
/// available.
pub type SendResponse<'a> = &'a mut dyn FnMut(s::Response<'static>);

impl<S: MailStore> CommandProcessor<S> {
    pub fn new(
        log_prefix: LogPrefix,
        settings: Arc<Settings>,
        store: S,
    ) -> Self {
        CommandProcessor {
            log_prefix,
            settings,
            store,
            selected: None,
        }
    }

    pub fn log_prefix(&self) -> &LogPrefix {
        &self.log_prefix
    }

    /// Make `name` the currently selected mailbox.
    ///
    /// This stands in for the session's SELECT handling, which is outside
    /// this crate; MOVE merely requires that *something* is selected.
    pub fn select(&mut self, name: &str) -> Result<(), Error> {
        let folder = if is_safe_name(name) {
            self.store.open(name, false)
        } else {
            Err(Error::UnsafeName)
        }?;

        self.selected = Some(SelectedMailbox::new(
            name.to_owned(),
            folder,
            Arc::clone(&self.settings),
            self.log_prefix.clone(),
        ));
        Ok(())
    }

    pub fn unselect(&mut self) {
        self.selected = None;
        self.log_prefix.clear_mailbox();
    }
}

pub(super) fn success() -> CmdResult {
    Ok(s::Response::Cond(s::CondResponse {
        cond: s::RespCondType::Ok,
        code: None,
        quip: None,
    }))
}

pub(super) fn parse_seqnum_range(
    snapshot: &MessageSnapshot,
    raw: &str,
) -> PartialResult<SeqRange<Seqnum>> {
    let max_seqnum = snapshot.max_seqnum().unwrap_or(Seqnum::MIN);
    let seqrange = SeqRange::parse(raw, max_seqnum).ok_or_else(|| {
        s::Response::Cond(s::CondResponse {
            cond: s::RespCondType::Bad,
            code: Some(s::RespTextCode::Parse),
            quip: Some(Cow::Borrowed("Unparsable sequence set")),
        })
    })?;

    if seqrange.max().unwrap_or(0) > max_seqnum.0.get() {
        // This behaviour is not explicitly described in RFC 3501, but
        // Crispin mentions it a couple times in the mailing list --- if the
        // client requests a seqnum outside the current snapshot, it's a
        // protocol violation and we return BAD.
        return Err(s::Response::Cond(s::CondResponse {
            cond: s::RespCondType::Bad,
            code: None,
            quip: Some(Cow::Borrowed("Message sequence number out of range")),
        }));
    }

    Ok(seqrange)
}

pub(super) fn parse_uid_range(
    snapshot: &MessageSnapshot,
    raw: &str,
) -> PartialResult<SeqRange<Uid>> {
    let max_uid = snapshot.max_uid().unwrap_or(Uid::MIN);
    let seqrange = SeqRange::parse(raw, max_uid).ok_or_else(|| {
        s::Response::Cond(s::CondResponse {
            cond: s::RespCondType::Bad,
            code: Some(s::RespTextCode::Parse),
            quip: Some(Cow::Borrowed("Unparsable sequence set")),
        })
    })?;

    // The client is explicitly allowed to request UIDs out of range, so
    // there's nothing else to validate here.

    Ok(seqrange)
}

pub(super) fn catch_all_error_handling(
    log_prefix: &LogPrefix,
    e: Error,
) -> s::Response<'static> {
    error!("{} Unhandled internal error: {}", log_prefix, e);
    s::Response::Cond(s::CondResponse {
        cond: s::RespCondType::No,
        code: None,
        quip: Some(Cow::Borrowed(
            "Unexpected error; check server logs for details",
        )),
    })
}
