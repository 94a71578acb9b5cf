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

//! The seam between the move engine and the mailbox storage backend.
//!
//! The engine never holds a lock spanning more than one message's move;
//! whatever atomicity `move_message` promises is all the atomicity there
//! is. A long MOVE is therefore observable by other sessions as a sequence
//! of single-message transfers, which is the intended trade-off: no
//! whole-mailbox lock, no cross-message transaction.

use crate::account::model::Uid;
use crate::support::error::Error;

/// A handle on the mailbox store shared by all sessions.
pub trait MailStore {
    type Folder: MailFolder;

    /// Look up the named mailbox.
    ///
    /// If it does not exist and `create` is true, attempt to create it
    /// first. Returns `Error::NxMailbox` if it does not exist and was not
    /// created.
    fn open(&self, name: &str, create: bool)
        -> Result<Self::Folder, Error>;
}

/// A handle on one mailbox within the store.
///
/// All methods take `&self`; implementations do their own locking, scoped to
/// the individual operation.
pub trait MailFolder {
    /// List the UIDs of the messages currently in the mailbox, ascending.
    fn uids(&self) -> Result<Vec<Uid>, Error>;

    /// Return the mailbox's UIDVALIDITY value.
    fn uid_validity(&self) -> Result<u32, Error>;

    /// Atomically transfer one message out of this mailbox and into `dst`,
    /// returning the UID `dst` assigned to it.
    ///
    /// The implementation must remove the message, allocate the destination
    /// UID, and insert the message as one indivisible step with respect to
    /// other sessions. Returns `Error::NxMessage` if `uid` no longer names a
    /// message and `Error::MailboxFull` if `dst` cannot allocate another
    /// UID; in either case nothing has changed.
    fn move_message(&self, uid: Uid, dst: &Self) -> Result<Uid, Error>;
}

#[cfg(test)]
pub(crate) mod memory;
