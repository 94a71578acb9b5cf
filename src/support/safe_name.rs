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

/// Determine whether the given mailbox name is "safe".
///
/// This rejects names which are syntactically valid nowhere: the empty name,
/// names containing control characters, and names consisting of or containing
/// the IMAP list wildcards. It does not check whether the storage backend can
/// actually represent the name; the backend rejects what it cannot store.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() < 256
        && !name.chars().any(|c| c.is_control())
        && !name.contains('%')
        && !name.contains('*')
        && name != "."
        && name != ".."
}
