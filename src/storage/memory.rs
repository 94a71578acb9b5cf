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

//! An in-memory mailbox store used as the test fixture for everything above
//! the storage seam.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use super::{MailFolder, MailStore};
use crate::account::model::Uid;
use crate::support::error::Error;

#[derive(Clone)]
pub(crate) struct MemStore {
    inner: Arc<Mutex<StoreInner>>,
}

struct StoreInner {
    folders: HashMap<String, FolderInner>,
    next_uid_validity: u32,
}

struct FolderInner {
    uid_validity: u32,
    next_uid: u32,
    /// When set, UIDs at or beyond this value cannot be allocated.
    uid_cap: Option<u32>,
    messages: BTreeMap<u32, String>,
}

#[derive(Clone)]
pub(crate) struct MemFolder {
    inner: Arc<Mutex<StoreInner>>,
    name: String,
}

impl MemStore {
    pub(crate) fn new() -> Self {
        MemStore {
            inner: Arc::new(Mutex::new(StoreInner {
                folders: HashMap::new(),
                next_uid_validity: 1,
            })),
        }
    }

    /// Create a folder with explicit UIDVALIDITY and first UID, for tests
    /// that assert on exact identifier values.
    pub(crate) fn create_with_uids(
        &self,
        name: &str,
        uid_validity: u32,
        next_uid: u32,
    ) {
        let mut inner = self.inner.lock().unwrap();
        inner.folders.insert(
            name.to_owned(),
            FolderInner {
                uid_validity,
                next_uid,
                uid_cap: None,
                messages: BTreeMap::new(),
            },
        );
    }

    /// Seed a message directly at the given UID.
    pub(crate) fn seed(&self, name: &str, uid: u32, content: &str) {
        let mut inner = self.inner.lock().unwrap();
        let folder = inner.folders.get_mut(name).expect("seed: no folder");
        assert!(uid >= folder.next_uid, "seed: UID going backwards");
        folder.messages.insert(uid, content.to_owned());
        folder.next_uid = uid + 1;
    }

    /// Forbid the named folder from allocating UIDs at or beyond `cap`.
    pub(crate) fn set_uid_cap(&self, name: &str, cap: u32) {
        let mut inner = self.inner.lock().unwrap();
        inner.folders.get_mut(name).expect("cap: no folder").uid_cap =
            Some(cap);
    }

    /// Delete a message out from under any snapshot, simulating another
    /// session racing this one.
    pub(crate) fn hard_delete(&self, name: &str, uid: u32) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .folders
            .get_mut(name)
            .expect("delete: no folder")
            .messages
            .remove(&uid);
    }

    pub(crate) fn message(&self, name: &str, uid: u32) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner.folders.get(name)?.messages.get(&uid).cloned()
    }
}

impl MailStore for MemStore {
    type Folder = MemFolder;

    fn open(&self, name: &str, create: bool) -> Result<MemFolder, Error> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.folders.contains_key(name) {
            if !create {
                return Err(Error::NxMailbox);
            }

            let uid_validity = inner.next_uid_validity;
            inner.next_uid_validity += 1;
            inner.folders.insert(
                name.to_owned(),
                FolderInner {
                    uid_validity,
                    next_uid: 1,
                    uid_cap: None,
                    messages: BTreeMap::new(),
                },
            );
        }

        Ok(MemFolder {
            inner: Arc::clone(&self.inner),
            name: name.to_owned(),
        })
    }
}

impl MailFolder for MemFolder {
    fn uids(&self) -> Result<Vec<Uid>, Error> {
        let inner = self.inner.lock().unwrap();
        let folder = inner.folders.get(&self.name).ok_or(Error::NxMailbox)?;
        Ok(folder
            .messages
            .keys()
            .filter_map(|&uid| Uid::of(uid))
            .collect())
    }

    fn uid_validity(&self) -> Result<u32, Error> {
        let inner = self.inner.lock().unwrap();
        let folder = inner.folders.get(&self.name).ok_or(Error::NxMailbox)?;
        Ok(folder.uid_validity)
    }

    fn move_message(&self, uid: Uid, dst: &Self) -> Result<Uid, Error> {
        // One lock guards the whole store, so the remove/allocate/insert
        // triple below is indivisible, which is exactly the contract.
        let mut inner = self.inner.lock().unwrap();

        let src = inner
            .folders
            .get_mut(&self.name)
            .ok_or(Error::NxMailbox)?;
        if !src.messages.contains_key(&uid.0.get()) {
            return Err(Error::NxMessage);
        }

        {
            let dst_folder =
                inner.folders.get(&dst.name).ok_or(Error::NxMailbox)?;
            if dst_folder.uid_cap.map_or(false, |cap| {
                dst_folder.next_uid >= cap
            }) {
                return Err(Error::MailboxFull);
            }
        }

        let content = inner
            .folders
            .get_mut(&self.name)
            .expect("source folder vanished inside lock")
            .messages
            .remove(&uid.0.get())
            .expect("message vanished inside lock");

        let dst_folder = inner
            .folders
            .get_mut(&dst.name)
            .expect("destination folder vanished inside lock");
        let new_uid = dst_folder.next_uid;
        dst_folder.next_uid += 1;
        dst_folder.messages.insert(new_uid, content);

        Ok(Uid::of(new_uid).ok_or(Error::MailboxFull)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn open_and_create() {
        let store = MemStore::new();
        assert_matches!(
            Some(Error::NxMailbox),
            store.open("INBOX", false).err()
        );

        store.open("INBOX", true).unwrap();
        store.open("INBOX", false).unwrap();
    }

    #[test]
    fn move_between_folders() {
        let store = MemStore::new();
        store.create_with_uids("INBOX", 1, 1);
        store.create_with_uids("Archive", 2, 1);
        store.seed("INBOX", 1, "hello");

        let inbox = store.open("INBOX", false).unwrap();
        let archive = store.open("Archive", false).unwrap();

        let new_uid = inbox.move_message(Uid::u(1), &archive).unwrap();
        assert_eq!(Uid::u(1), new_uid);
        assert!(inbox.uids().unwrap().is_empty());
        assert_eq!(vec![Uid::u(1)], archive.uids().unwrap());
        assert_eq!(Some("hello".to_owned()), store.message("Archive", 1));

        assert_matches!(
            Err(Error::NxMessage),
            inbox.move_message(Uid::u(1), &archive)
        );
    }

    #[test]
    fn uid_cap_stops_allocation() {
        let store = MemStore::new();
        store.create_with_uids("INBOX", 1, 1);
        store.create_with_uids("Archive", 2, 1);
        store.seed("INBOX", 1, "a");
        store.set_uid_cap("Archive", 1);

        let inbox = store.open("INBOX", false).unwrap();
        let archive = store.open("Archive", false).unwrap();
        assert_matches!(
            Err(Error::MailboxFull),
            inbox.move_message(Uid::u(1), &archive)
        );
        // Nothing changed
        assert_eq!(vec![Uid::u(1)], inbox.uids().unwrap());
    }
}
