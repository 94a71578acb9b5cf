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

//! Movemap implements the IMAP `MOVE` and `UID MOVE` commands (RFC 6851)
//! over pluggable mailbox storage.
//!
//! The embedding server supplies the pieces a MOVE does not own: the line
//! reader that tokenises requests, the storage backend (behind the traits in
//! [`storage`]), and the transport that ships response lines. This crate
//! owns everything between: resolving sequence-number or UID range sets
//! against a per-command snapshot of the selected mailbox, issuing one
//! atomic single-message transfer per qualifying message, and assembling the
//! `COPYUID` and `EXPUNGE` responses.
//!
//! Moves are deliberately not transactional across messages. A failure
//! part-way through leaves the messages already moved in the destination
//! and reports the failure to the client, which is expected to re-select
//! and re-synchronise. In exchange, no lock is ever held across more than
//! one message's transfer.

#[cfg(test)]
macro_rules! assert_matches {
    ($expected:pat, $actual:expr) => {
        match $actual {
            $expected => (),
            unexpected => panic!(
                "Expected {} matches {}, got {:?}",
                stringify!($expected),
                stringify!($actual),
                unexpected
            ),
        }
    };
}

pub mod account;
pub mod imap;
pub mod storage;
pub mod support;
