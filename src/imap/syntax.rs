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

//! The raw AST exchanged with the protocol layer.
//!
//! Requests arrive already tokenised: the line reader has split off the tag,
//! recognised the command, and extracted the sequence-set and mailbox-name
//! arguments as strings. Sequence sets are deliberately *not* interpreted at
//! that level, since `*` can only be resolved against the selected mailbox;
//! they travel as strings and are parsed by the command processor.
//!
//! Responses are produced as values whose `Display` form is the exact IMAP
//! wire text, minus the trailing CRLF, which the transport appends.

use std::borrow::Cow;
use std::fmt;

use crate::account::model::Uid;

/// The `MOVE` and `UID MOVE` commands, RFC 6851.
///
/// `move` is a keyword in Rust, so the struct gets the long name.
#[derive(Clone, Debug)]
pub struct MoveCommand<'a> {
    /// The sequence set, uninterpreted.
    pub messages: Cow<'a, str>,
    /// The destination mailbox name.
    pub dst: Cow<'a, str>,
}

#[derive(Clone, Debug)]
pub enum UidCommand<'a> {
    Move(MoveCommand<'a>),
}

#[derive(Clone, Debug)]
pub enum Command<'a> {
    Move(MoveCommand<'a>),
    Uid(UidCommand<'a>),
}

/// A full command line: tag plus command.
#[derive(Clone, Debug)]
pub struct CommandLine<'a> {
    pub tag: Cow<'a, str>,
    pub cmd: Command<'a>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RespCondType {
    Ok,
    No,
    Bad,
}

impl fmt::Display for RespCondType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RespCondType::Ok => write!(f, "OK"),
            RespCondType::No => write!(f, "NO"),
            RespCondType::Bad => write!(f, "BAD"),
        }
    }
}

/// The RFC 4315 `COPYUID` response code data.
///
/// The UID strings are in wire form already. Both may be empty when the
/// command matched no messages, in which case the code still identifies the
/// destination's UIDVALIDITY.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopyUidData<'a> {
    pub uid_validity: u32,
    pub from_uids: Cow<'a, str>,
    pub to_uids: Cow<'a, str>,
}

/// The response codes this crate can attach to a condition response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RespTextCode<'a> {
    /// RFC 3501 `TRYCREATE`
    TryCreate,
    /// RFC 5530 `PARSE`
    Parse,
    /// RFC 5530 `LIMIT`
    Limit,
    /// RFC 4315 `COPYUID`
    CopyUid(CopyUidData<'a>),
}

impl fmt::Display for RespTextCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RespTextCode::TryCreate => write!(f, "TRYCREATE"),
            RespTextCode::Parse => write!(f, "PARSE"),
            RespTextCode::Limit => write!(f, "LIMIT"),
            RespTextCode::CopyUid(ref data) => write!(
                f,
                "COPYUID {} {} {}",
                data.uid_validity, data.from_uids, data.to_uids
            ),
        }
    }
}

/// An `OK`/`NO`/`BAD` response, with optional response code and text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CondResponse<'a> {
    pub cond: RespCondType,
    pub code: Option<RespTextCode<'a>>,
    pub quip: Option<Cow<'a, str>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response<'a> {
    Cond(CondResponse<'a>),
    /// An untagged `EXPUNGE` carrying a sequence number.
    Expunge(u32),
}

impl fmt::Display for Response<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Response::Cond(ref cr) => {
                write!(f, "{}", cr.cond)?;
                if let Some(ref code) = cr.code {
                    write!(f, " [{}]", code)?;
                }
                if let Some(ref quip) = cr.quip {
                    write!(f, " {}", quip)?;
                }
                Ok(())
            },
            Response::Expunge(seqnum) => write!(f, "{} EXPUNGE", seqnum),
        }
    }
}

/// A response with its tag position resolved; `None` renders as `*`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseLine<'a> {
    pub tag: Option<Cow<'a, str>>,
    pub response: Response<'a>,
}

impl fmt::Display for ResponseLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.tag {
            Some(ref tag) => write!(f, "{} {}", tag, self.response),
            None => write!(f, "* {}", self.response),
        }
    }
}

/// Encode an ordered UID list in compact wire form.
///
/// Maximal runs of consecutive ascending values collapse to `low:high`;
/// isolated values stay literal; segments join with commas in the original
/// order. This is not `SeqRange`: a `SeqRange` is a *set* and normalises,
/// whereas this encoding preserves the input order so the two halves of a
/// `COPYUID` stay index-aligned.
pub fn uids_to_range_string(uids: &[Uid]) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let mut ix = 0;
    while ix < uids.len() {
        let start = uids[ix].0.get();
        let mut end = start;
        while ix + 1 < uids.len() && uids[ix + 1].0.get() == end + 1 {
            ix += 1;
            end += 1;
        }

        if !out.is_empty() {
            out.push(',');
        }
        if start == end {
            let _ = write!(out, "{}", start);
        } else {
            let _ = write!(out, "{}:{}", start, end);
        }

        ix += 1;
    }

    out
}
