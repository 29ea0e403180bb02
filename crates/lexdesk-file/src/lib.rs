//! lexdesk-file - Filesystem-backed token store.
//!
//! The session is kept in a small JSON file using the same two keys the
//! dashboard keeps in browser storage, `accessToken` and `refreshToken`.

mod store;

pub use store::FileTokenStore;
