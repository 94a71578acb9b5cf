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

use crate::account::model::*;
use crate::support::error::Error;

/// A point-in-time view of the messages in the selected mailbox.
///
/// The snapshot is captured once when command processing begins and is used
/// for the whole command: `*` resolves against it, sequence numbers map
/// through it, and selection queries it. It is never re-read mid-command, so
/// the mapping stays stable even while the moves themselves mutate the
/// mailbox underneath it.
///
/// Sequence numbers are indices-plus-one into the UID list.
#[derive(Clone, Debug)]
pub struct MessageSnapshot {
    uids: Vec<Uid>,
}

impl MessageSnapshot {
    /// Create a snapshot over the given UID list.
    ///
    /// The list must be ascending, as the storage listing contract requires.
    pub fn new(uids: Vec<Uid>) -> Self {
        debug_assert!(uids.windows(2).all(|w| w[0] < w[1]));
        MessageSnapshot { uids }
    }

    pub fn len(&self) -> usize {
        self.uids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uids.is_empty()
    }

    /// Return the maximum UID in the snapshot, i.e., the value `*` resolves
    /// to under UID addressing.
    pub fn max_uid(&self) -> Option<Uid> {
        self.uids.last().copied()
    }

    /// Return the maximum sequence number in the snapshot, i.e., the value
    /// `*` resolves to under sequence-number addressing.
    pub fn max_seqnum(&self) -> Option<Seqnum> {
        Seqnum::of(self.uids.len() as u32)
    }

    /// Translate the given sequence number into a UID.
    ///
    /// On failure, return `Error::NxMessage`.
    pub fn seqnum_to_uid(&self, seqnum: Seqnum) -> Result<Uid, Error> {
        self.uids
            .get(seqnum.to_index())
            .copied()
            .ok_or(Error::NxMessage)
    }

    /// Translate the given UID into its sequence number, if the UID is in
    /// the snapshot.
    pub fn uid_to_seqnum(&self, uid: Uid) -> Option<Seqnum> {
        self.uids.binary_search(&uid).ok().map(Seqnum::from_index)
    }

    /// Translate a `SeqRange<Seqnum>` to `SeqRange<Uid>`.
    ///
    /// The first failure from `seqnum_to_uid()` is propagated.
    pub fn seqnum_range_to_uid(
        &self,
        seqnums: &SeqRange<Seqnum>,
    ) -> Result<SeqRange<Uid>, Error> {
        let mut ret = SeqRange::new();
        for seqnum in seqnums.items(u32::MAX) {
            ret.append(self.seqnum_to_uid(seqnum)?);
        }

        Ok(ret)
    }

    /// Return an iterator to the UIDs and sequence numbers within the
    /// snapshot, ascending.
    pub fn seqnums_uids(&self) -> impl Iterator<Item = (Seqnum, Uid)> + '_ {
        self.uids
            .iter()
            .copied()
            .enumerate()
            .map(|(ix, uid)| (Seqnum::from_index(ix), uid))
    }

    /// Return the snapshot messages which qualify under the given UID range
    /// set, in snapshot (ascending UID) order.
    ///
    /// UIDs in the range set which are not present in the snapshot are
    /// silently ignored, as RFC 3501 requires.
    pub fn qualifying<'a>(
        &'a self,
        ids: &'a SeqRange<Uid>,
    ) -> impl Iterator<Item = (Seqnum, Uid)> + 'a {
        self.seqnums_uids().filter(move |&(_, uid)| ids.contains(uid))
    }
}
